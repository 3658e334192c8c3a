//! Books: melds of same-rank cards.

use serde::Serialize;

use crate::card::{Card, Rank};
use crate::error::ActionError;

/// A meld for exactly one rank. Natural cards must match the book's rank;
/// wild cards are admitted only while they stay a strict minority.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    rank: Rank,
    cards: Vec<Card>,
}

impl Book {
    /// Builds a book from its initial cards. There must be at least three,
    /// and at least one must be able to fix the book's rank. Natural cards
    /// are admitted before wilds, so the wild-minority check always runs
    /// against the final natural count.
    pub fn new(initial_cards: &[Card]) -> Result<Self, ActionError> {
        if initial_cards.len() < 3 {
            return Err(ActionError::TooFewCardsForBook);
        }
        let starter = initial_cards
            .iter()
            .find(|card| card.can_start_book())
            .ok_or(ActionError::NoBookStarter)?;

        let mut book = Book {
            rank: starter.rank,
            cards: Vec::with_capacity(initial_cards.len()),
        };
        for &card in initial_cards.iter().filter(|card| !card.is_wild()) {
            book.add_card(card)?;
        }
        for &card in initial_cards.iter().filter(|card| card.is_wild()) {
            book.add_card(card)?;
        }
        Ok(book)
    }

    /// The rank fixed at creation.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// The member cards, in admission order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The number of cards in the book.
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// The number of wild cards in the book.
    pub fn wild_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_wild()).count()
    }

    /// The number of natural cards in the book.
    pub fn natural_count(&self) -> usize {
        self.cards.len() - self.wild_count()
    }

    /// A book is natural while it contains no wilds.
    pub fn is_natural(&self) -> bool {
        self.wild_count() == 0
    }

    /// A book is complete once it holds seven cards.
    pub fn is_complete(&self) -> bool {
        self.cards.len() >= 7
    }

    /// The summed point values of the member cards. This is what counts
    /// toward the lay-down threshold, complete or not.
    pub fn cards_value(&self) -> i32 {
        self.cards.iter().map(|card| card.point_value()).sum()
    }

    /// The book's score: nothing while incomplete, 500 complete and
    /// natural, 300 complete and mixed.
    pub fn book_value(&self) -> i32 {
        if !self.is_complete() {
            0
        } else if self.is_natural() {
            500
        } else {
            300
        }
    }

    /// Adds a card to the book.
    pub fn add_card(&mut self, card: Card) -> Result<(), ActionError> {
        if card.is_wild() {
            self.add_wild_card(card)
        } else {
            self.add_natural_card(card)
        }
    }

    fn add_wild_card(&mut self, card: Card) -> Result<(), ActionError> {
        if self.wild_count() as isize >= self.natural_count() as isize - 1 {
            return Err(ActionError::TooManyWilds(self.rank));
        }
        self.cards.push(card);
        Ok(())
    }

    fn add_natural_card(&mut self, card: Card) -> Result<(), ActionError> {
        if card.rank != self.rank {
            return Err(ActionError::WrongRankForBook {
                book: self.rank,
                card,
            });
        }
        self.cards.push(card);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use assert_matches::assert_matches;

    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace()
            .map(|c| Card::from_str(c).unwrap())
            .collect()
    }

    #[test]
    fn test_new_requires_three_cards() {
        assert_matches!(
            Book::new(&cards("4h 4d")),
            Err(ActionError::TooFewCardsForBook)
        );
    }

    #[test]
    fn test_new_requires_a_starter() {
        // Wilds and threes can never fix a rank.
        assert_matches!(Book::new(&cards("2h 2d rs")), Err(ActionError::NoBookStarter));
        assert_matches!(Book::new(&cards("3h 3d 3c")), Err(ActionError::NoBookStarter));
    }

    #[test]
    fn test_rank_fixed_by_first_starter() {
        let book = Book::new(&cards("2h 4d 4c")).unwrap();
        assert_eq!(book.rank(), Rank::Four);
        assert_eq!(book.natural_count(), 2);
        assert_eq!(book.wild_count(), 1);
        assert!(!book.is_natural());
    }

    #[test]
    fn test_naturals_must_match_rank() {
        assert_matches!(
            Book::new(&cards("4h 4d 5c")),
            Err(ActionError::WrongRankForBook { book: Rank::Four, .. })
        );
        let mut book = Book::new(&cards("4h 4d 4c")).unwrap();
        assert_matches!(
            book.add_card(Card::from_str("9s").unwrap()),
            Err(ActionError::WrongRankForBook { book: Rank::Four, .. })
        );
        assert_eq!(book.card_count(), 3);
    }

    #[test]
    fn test_wilds_stay_a_strict_minority() {
        // Three naturals admit up to two wilds.
        let mut book = Book::new(&cards("4h 4d 4c 2h")).unwrap();
        book.add_card(Card::from_str("rs").unwrap()).unwrap();
        assert_matches!(
            book.add_card(Card::from_str("2s").unwrap()),
            Err(ActionError::TooManyWilds(Rank::Four))
        );
        assert!(book.wild_count() < book.natural_count());

        // Mostly-wild initial sets are rejected regardless of card order.
        assert_matches!(
            Book::new(&cards("2h 2d 4c")),
            Err(ActionError::TooManyWilds(Rank::Four))
        );
        assert_matches!(
            Book::new(&cards("4c 2h 2d")),
            Err(ActionError::TooManyWilds(Rank::Four))
        );
    }

    #[test]
    fn test_book_values() {
        let incomplete = Book::new(&cards("4h 4d 4c")).unwrap();
        assert_eq!(incomplete.book_value(), 0);
        assert_eq!(incomplete.cards_value(), 15);

        let natural = Book::new(&cards("4h 4d 4c 4s 4h 4d 4c")).unwrap();
        assert!(natural.is_complete());
        assert_eq!(natural.book_value(), 500);

        let mixed = Book::new(&cards("4h 4d 4c 4s 4h 2d 2c")).unwrap();
        assert!(mixed.is_complete());
        assert_eq!(mixed.book_value(), 300);
        assert_eq!(mixed.cards_value(), 5 * 5 + 20 + 20);
    }
}
