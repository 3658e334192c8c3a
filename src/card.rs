//! Cards.

use std::convert::{TryFrom, TryInto};
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}
impl Suit {
    /// Returns an array of all suits, in no particular order.
    pub fn all_suits() -> &'static [Suit] {
        static SUITS: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
        &SUITS
    }

    /// Returns true for hearts and diamonds.
    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}
impl Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sym = match self {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Spades => "♠",
        };
        f.write_str(sym)
    }
}
impl TryFrom<char> for Suit {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Ok(match c.to_ascii_lowercase() {
            'h' => Suit::Hearts,
            'd' => Suit::Diamonds,
            'c' => Suit::Clubs,
            's' => Suit::Spades,
            _ => return Err(()),
        })
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
    Joker,
}
impl Rank {
    /// Returns an array of the thirteen non-joker ranks.
    pub fn natural_ranks() -> &'static [Rank] {
        static RANKS: [Rank; 13] = [
            Rank::Two,
            Rank::Three,
            Rank::Four,
            Rank::Five,
            Rank::Six,
            Rank::Seven,
            Rank::Eight,
            Rank::Nine,
            Rank::Ten,
            Rank::Jack,
            Rank::Queen,
            Rank::King,
            Rank::Ace,
        ];
        &RANKS
    }
}
impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sym = match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "T",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Joker => "🃟",
        };
        f.write_str(sym)
    }
}
impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Ok(match c.to_ascii_lowercase() {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            't' => Rank::Ten,
            'j' => Rank::Jack,
            'q' => Rank::Queen,
            'k' => Rank::King,
            'a' => Rank::Ace,
            'r' => Rank::Joker,
            _ => return Err(()),
        })
    }
}

/// A playing card. Cards have no owner; they move by value between the
/// deck, the discard pile, hands, feet, and books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card suit.
    pub suit: Suit,
    /// Card rank.
    pub rank: Rank,
}
impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.rank == Rank::Joker {
            write!(f, "{}", self.rank)
        } else {
            write!(f, "{}{}", self.rank, self.suit)
        }
    }
}
impl FromStr for Card {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let rank = chars.next().ok_or(())?.try_into()?;
        let suit = chars.next().ok_or(())?.try_into()?;
        if chars.next().is_some() {
            return Err(());
        }
        Ok(Card { suit, rank })
    }
}
impl Card {
    /// Creates a new [`Card`].
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Every deck carries its jokers as spades.
    pub fn joker() -> Self {
        Self::new(Suit::Spades, Rank::Joker)
    }

    /// Twos and jokers are wild.
    pub fn is_wild(self) -> bool {
        matches!(self.rank, Rank::Two | Rank::Joker)
    }

    /// Returns true if the card can fix the rank of a new book. Wild cards
    /// and threes cannot.
    pub fn can_start_book(self) -> bool {
        !self.is_wild() && self.rank != Rank::Three
    }

    /// The card's score contribution.
    pub fn point_value(self) -> i32 {
        match self.rank {
            Rank::Two => 20,
            Rank::Three => {
                if self.suit.is_red() {
                    -100
                } else {
                    0
                }
            }
            Rank::Four | Rank::Five | Rank::Six | Rank::Seven | Rank::Eight => 5,
            Rank::Nine | Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 20,
            Rank::Joker => 50,
        }
    }
}
