//! A deck of cards.

use std::iter::FromIterator;

use delegate::delegate;
use itertools::iproduct;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank, Suit};

/// An ordered stack of cards. Cards are drawn from the top, which is the
/// end of the underlying sequence. Serializes as a bare card array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Card>,
}

impl FromIterator<Card> for Deck {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        let cards = iter.into_iter().collect();
        Self { cards }
    }
}

impl Deck {
    delegate! {
        to self.cards {
            /// The number of cards remaining in the deck.
            pub fn len(&self) -> usize;
            /// Returns true if no cards remain.
            pub fn is_empty(&self) -> bool;
        }
    }

    /// Builds `set_count` standard 52-card sets, each with two jokers.
    pub fn standard(set_count: usize) -> Self {
        let mut cards = Vec::with_capacity(set_count * 54);
        for _ in 0..set_count {
            cards.extend(
                iproduct!(Suit::all_suits(), Rank::natural_ranks())
                    .map(|(&suit, &rank)| Card { suit, rank }),
            );
            cards.push(Card::joker());
            cards.push(Card::joker());
        }
        Self { cards }
    }

    /// Shuffles the deck in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draws exactly `n` cards, in draw order, or `None` if the deck holds
    /// fewer than `n`.
    pub fn deal(&mut self, n: usize) -> Option<Vec<Card>> {
        if self.len() < n {
            return None;
        }
        Some((0..n).map(|_| self.cards.pop().expect("length checked")).collect())
    }

    /// Replaces the deck's contents with the given cards and reshuffles.
    pub fn replenish<R: Rng + ?Sized>(&mut self, cards: Vec<Card>, rng: &mut R) {
        self.cards = cards;
        self.shuffle(rng);
    }
}
