//! Player state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::book::Book;
use crate::card::{Card, Rank};
use crate::error::{ActionError, SetupError};
use crate::round::{PerRound, Round};

/// Cards dealt into each of the hand and the foot.
pub const HAND_SIZE: usize = 13;

/// Per-round score breakdown. `in_hand`/`in_foot` are penalties: positive
/// card values count against the player while the cards are still held, and
/// negative values (red threes) deduct as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Points {
    pub in_hand: i32,
    pub in_foot: i32,
    pub in_books: i32,
    pub laid_down: i32,
    pub for_going_out: i32,
}

impl Points {
    /// The round total.
    pub fn total(&self) -> i32 {
        self.in_hand + self.in_foot + self.in_books + self.laid_down + self.for_going_out
    }
}

/// A player: a hand, a foot held in reserve until the hand empties, books
/// per round, and the turn-scoped draw counters.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    name: String,
    hand: Vec<Card>,
    foot: Vec<Card>,
    books: PerRound<BTreeMap<Rank, Book>>,
    points: PerRound<Points>,
    #[serde(skip)]
    cards_drawn_from_deck: u8,
    #[serde(skip)]
    cards_drawn_from_discard_pile: u8,
    #[serde(skip)]
    has_laid_down_this_round: bool,
}

/// Returns `hand` minus `cards`, or fails without side effects if any card
/// is missing. Duplicates must each be present.
fn remove_all(hand: &[Card], cards: &[Card]) -> Result<Vec<Card>, ActionError> {
    let mut rest = hand.to_vec();
    for card in cards {
        let index = rest
            .iter()
            .position(|c| c == card)
            .ok_or(ActionError::CardNotInHand(*card))?;
        rest.remove(index);
    }
    Ok(rest)
}

impl Player {
    /// Creates a new [`Player`] with no cards.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            hand: vec![],
            foot: vec![],
            books: PerRound::default(),
            points: PerRound::default(),
            cards_drawn_from_deck: 0,
            cards_drawn_from_discard_pile: 0,
            has_laid_down_this_round: false,
        }
    }

    /// The player's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The player's hand.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// The player's foot.
    pub fn foot(&self) -> &[Card] {
        &self.foot
    }

    /// The player's books for the specified round.
    pub fn books(&self, round: Round) -> &BTreeMap<Rank, Book> {
        &self.books[round]
    }

    /// The player's score breakdown for the specified round.
    pub fn points(&self, round: Round) -> &Points {
        &self.points[round]
    }

    /// Deals the player in. Both piles must hold exactly [`HAND_SIZE`]
    /// cards.
    pub fn set_hand_and_foot(
        &mut self,
        hand: Vec<Card>,
        foot: Vec<Card>,
    ) -> Result<(), SetupError> {
        if hand.len() != HAND_SIZE || foot.len() != HAND_SIZE {
            return Err(SetupError::WrongDealSize);
        }
        self.hand = hand;
        self.foot = foot;
        Ok(())
    }

    /// A player draws exactly twice per turn, from the deck or the pile.
    pub fn can_draw_from_deck(&self) -> bool {
        self.cards_drawn_from_deck + self.cards_drawn_from_discard_pile < 2
    }

    /// At most one of the two draws may come from the discard pile.
    pub fn can_draw_from_discard_pile(&self) -> bool {
        self.cards_drawn_from_deck < 2 && self.cards_drawn_from_discard_pile < 1
    }

    /// The discard that ends a turn is legal only after both draws.
    pub fn can_end_turn(&self) -> bool {
        self.cards_drawn_from_deck + self.cards_drawn_from_discard_pile == 2
    }

    /// Returns true if the hand is empty.
    pub fn is_hand_empty(&self) -> bool {
        self.hand.is_empty()
    }

    /// Returns true once the foot has been picked up: the reserve is gone,
    /// and emptying the hand again means going out.
    pub fn is_in_foot(&self) -> bool {
        self.foot.is_empty()
    }

    /// Whether the player has opened books this round.
    pub fn has_laid_down_this_round(&self) -> bool {
        self.has_laid_down_this_round
    }

    /// Going out requires a consumed foot plus at least one natural and one
    /// unnatural book this round.
    pub fn can_go_out(&self, round: Round) -> bool {
        self.has_natural_book(round) && self.has_unnatural_book(round) && self.is_in_foot()
    }

    fn has_natural_book(&self, round: Round) -> bool {
        self.books[round].values().any(|book| book.is_natural())
    }

    fn has_unnatural_book(&self, round: Round) -> bool {
        self.books[round].values().any(|book| !book.is_natural())
    }

    /// Takes a drawn deck card into the hand.
    pub fn add_card_to_hand_from_deck(&mut self, card: Card) {
        self.hand.push(card);
        self.cards_drawn_from_deck += 1;
    }

    /// Takes a drawn discard into the hand.
    pub fn add_card_to_hand_from_discard_pile(&mut self, card: Card) {
        self.hand.push(card);
        self.cards_drawn_from_discard_pile += 1;
    }

    /// Removes a card from the hand.
    pub fn remove_card_from_hand(&mut self, card: Card) -> Result<(), ActionError> {
        let index = self
            .hand
            .iter()
            .position(|c| *c == card)
            .ok_or(ActionError::CardNotInHand(card))?;
        self.hand.remove(index);
        Ok(())
    }

    /// Starts a book for the current round from cards in the hand. Fails
    /// whole if the book is malformed, the player already has a book of
    /// that rank, or any card is missing from the hand.
    pub fn start_book(&mut self, cards: &[Card], round: Round) -> Result<(), ActionError> {
        let book = Book::new(cards)?;
        if self.books[round].contains_key(&book.rank()) {
            return Err(ActionError::DuplicateBook(book.rank()));
        }
        self.hand = remove_all(&self.hand, cards)?;
        self.books[round].insert(book.rank(), book);
        Ok(())
    }

    /// Moves cards from the hand into an existing book, all or nothing.
    pub fn add_cards_from_hand_to_book(
        &mut self,
        cards: &[Card],
        book_rank: Rank,
        round: Round,
    ) -> Result<(), ActionError> {
        let mut book = self.books[round]
            .get(&book_rank)
            .ok_or(ActionError::NoSuchBook(book_rank))?
            .clone();
        for &card in cards {
            book.add_card(card)?;
        }
        self.hand = remove_all(&self.hand, cards)?;
        self.books[round].insert(book_rank, book);
        Ok(())
    }

    /// Adds a drawn discard straight into an existing book, bypassing the
    /// hand. Counts as the turn's discard-pile draw.
    pub fn add_card_from_discard_pile_to_book(
        &mut self,
        card: Card,
        book_rank: Rank,
        round: Round,
    ) -> Result<(), ActionError> {
        self.books[round]
            .get_mut(&book_rank)
            .ok_or(ActionError::NoSuchBook(book_rank))?
            .add_card(card)?;
        self.cards_drawn_from_discard_pile += 1;
        Ok(())
    }

    /// Marks the player as having opened this round.
    pub fn laid_down(&mut self) {
        self.has_laid_down_this_round = true;
    }

    /// The foot becomes the hand.
    pub fn pick_up_foot(&mut self) {
        self.hand = std::mem::take(&mut self.foot);
    }

    /// Resets the turn-scoped draw counters.
    pub fn turn_ended(&mut self) {
        self.cards_drawn_from_deck = 0;
        self.cards_drawn_from_discard_pile = 0;
    }

    /// Resets all round-scoped turn state.
    pub fn round_ended(&mut self) {
        self.turn_ended();
        self.has_laid_down_this_round = false;
    }

    /// Recomputes the score breakdown for the specified round from the
    /// current hand, foot, and books. `for_going_out` is left alone.
    pub fn calculate_points(&mut self, round: Round) {
        fn penalty(cards: &[Card]) -> i32 {
            cards
                .iter()
                .map(|card| {
                    let value = card.point_value();
                    if value > 0 {
                        -value
                    } else {
                        value
                    }
                })
                .sum()
        }

        self.points[round].in_hand = penalty(&self.hand);
        self.points[round].in_foot = penalty(&self.foot);
        self.points[round].in_books = self.books[round].values().map(Book::book_value).sum();
        self.points[round].laid_down = self.books[round].values().map(Book::cards_value).sum();
    }

    /// Awards the flat bonus for going out this round.
    pub fn add_bonus_for_going_out(&mut self, round: Round) {
        self.points[round].for_going_out = 100;
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

    fn player_with_hand(hand: &str) -> Player {
        let mut player = Player::new("alice");
        player.hand = cards(hand);
        player
    }

    #[test]
    fn test_set_hand_and_foot_sizes() {
        let mut player = Player::new("alice");
        assert_matches!(
            player.set_hand_and_foot(cards("4h 4d"), cards("5h 5d")),
            Err(SetupError::WrongDealSize)
        );
        let thirteen = vec![Card::from_str("3c").unwrap(); 13];
        player
            .set_hand_and_foot(thirteen.clone(), thirteen)
            .unwrap();
        assert_eq!(player.hand().len(), 13);
        assert_eq!(player.foot().len(), 13);
    }

    #[test]
    fn test_draw_budget() {
        let mut player = Player::new("alice");
        assert!(player.can_draw_from_deck());
        assert!(player.can_draw_from_discard_pile());
        assert!(!player.can_end_turn());

        player.add_card_to_hand_from_deck(Card::from_str("4h").unwrap());
        assert!(player.can_draw_from_deck());
        assert!(player.can_draw_from_discard_pile());

        player.add_card_to_hand_from_deck(Card::from_str("4d").unwrap());
        assert!(!player.can_draw_from_deck());
        assert!(!player.can_draw_from_discard_pile());
        assert!(player.can_end_turn());

        player.turn_ended();
        assert!(player.can_draw_from_deck());
    }

    #[test]
    fn test_one_discard_pile_draw_per_turn() {
        let mut player = Player::new("alice");
        player.add_card_to_hand_from_discard_pile(Card::from_str("4h").unwrap());
        assert!(!player.can_draw_from_discard_pile());
        assert!(player.can_draw_from_deck());
        player.add_card_to_hand_from_deck(Card::from_str("4d").unwrap());
        assert!(player.can_end_turn());
    }

    #[test]
    fn test_start_book_removes_cards_from_hand() {
        let mut player = player_with_hand("4h 4d 4c 9s");
        player.start_book(&cards("4h 4d 4c"), Round::Ninety).unwrap();
        assert_eq!(player.hand(), cards("9s").as_slice());
        assert!(player.books(Round::Ninety).contains_key(&Rank::Four));
    }

    #[test]
    fn test_start_book_rejects_duplicate_rank() {
        let mut player = player_with_hand("4h 4d 4c 4s 4h 4d");
        player.start_book(&cards("4h 4d 4c"), Round::Ninety).unwrap();
        assert_matches!(
            player.start_book(&cards("4s 4h 4d"), Round::Ninety),
            Err(ActionError::DuplicateBook(Rank::Four))
        );
    }

    #[test]
    fn test_start_book_is_atomic_on_missing_card() {
        let mut player = player_with_hand("4h 4d 9s");
        let before = player.hand().to_vec();
        assert_matches!(
            player.start_book(&cards("4h 4d 4c"), Round::Ninety),
            Err(ActionError::CardNotInHand(_))
        );
        assert_eq!(player.hand(), before.as_slice());
        assert!(player.books(Round::Ninety).is_empty());
    }

    #[test]
    fn test_add_cards_to_book_is_atomic() {
        let mut player = player_with_hand("4h 4d 4c 4s 2h 2d");
        player.start_book(&cards("4h 4d 4c"), Round::Ninety).unwrap();
        let before = player.hand().to_vec();
        // The second wild violates the minority rule; nothing may move.
        assert_matches!(
            player.add_cards_from_hand_to_book(&cards("2h 2d"), Rank::Four, Round::Ninety),
            Err(ActionError::TooManyWilds(Rank::Four))
        );
        assert_eq!(player.hand(), before.as_slice());
        assert_eq!(player.books(Round::Ninety)[&Rank::Four].card_count(), 3);

        player
            .add_cards_from_hand_to_book(&cards("4s 2h"), Rank::Four, Round::Ninety)
            .unwrap();
        assert_eq!(player.books(Round::Ninety)[&Rank::Four].card_count(), 5);
        assert_eq!(player.hand(), cards("2d").as_slice());
    }

    #[test]
    fn test_can_go_out_needs_both_book_kinds_and_no_foot() {
        let round = Round::Ninety;
        let mut player = player_with_hand("4h 4d 4c 5h 5d 5c 2s");
        player.start_book(&cards("4h 4d 4c"), round).unwrap();
        assert!(!player.can_go_out(round));

        player.start_book(&cards("5h 5d 5c 2s"), round).unwrap();
        assert!(player.is_hand_empty());
        // Foot untouched so far; a non-empty foot blocks going out.
        player.foot = cards("9s");
        assert!(!player.can_go_out(round));
        player.foot = vec![];
        assert!(player.can_go_out(round));
    }

    #[test]
    fn test_pick_up_foot() {
        let mut player = player_with_hand("");
        player.foot = cards("9s 9h");
        player.pick_up_foot();
        assert_eq!(player.hand(), cards("9s 9h").as_slice());
        assert!(player.is_in_foot());
    }

    #[test]
    fn test_calculate_points_negates_only_positive_values() {
        let round = Round::Ninety;
        let mut player = player_with_hand("ah 3h 3c 9s");
        player.foot = cards("3d 4c");
        player.calculate_points(round);
        // Ace 20 and nine 10 count against; red three deducts as-is,
        // black three is worthless.
        assert_eq!(player.points(round).in_hand, -20 - 100 + 0 - 10);
        assert_eq!(player.points(round).in_foot, -100 - 5);
        assert_eq!(player.points(round).in_books, 0);
        assert_eq!(player.points(round).laid_down, 0);
    }

    #[test]
    fn test_calculate_points_preserves_going_out_bonus() {
        let round = Round::Ninety;
        let mut player = player_with_hand("4h 4d 4c");
        player.add_bonus_for_going_out(round);
        player.calculate_points(round);
        assert_eq!(player.points(round).for_going_out, 100);
    }

    #[test]
    fn test_book_scores_roll_up_into_points() {
        let round = Round::Ninety;
        let mut player = player_with_hand("4h 4d 4c 4s 4h 4d 4c 5h 5d 5c");
        player
            .start_book(&cards("4h 4d 4c 4s 4h 4d 4c"), round)
            .unwrap();
        player.start_book(&cards("5h 5d 5c"), round).unwrap();
        player.calculate_points(round);
        assert_eq!(player.points(round).in_books, 500);
        assert_eq!(player.points(round).laid_down, 7 * 5 + 3 * 5);
    }
}
