//! Game management.
//!
//! A game runs four rounds over four pre-generated decks. Players take
//! turns drawing, building books, and discarding; a round ends when a
//! player goes out or its deck runs dry, and the game ends after the last
//! round. [`Game::apply_action`] is the sole mutation point: an action is
//! either applied in full or rejected with an [`ActionError`] and no
//! observable state change.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::action::{Action, ActionData};
use crate::book::Book;
use crate::card::{Card, Rank};
use crate::deck::Deck;
use crate::error::{ActionError, SetupError};
use crate::player::{Player, HAND_SIZE};
use crate::round::{PerRound, Round};

/// The fewest players a game supports.
pub const MIN_PLAYERS: usize = 2;
/// The most players a game supports.
pub const MAX_PLAYERS: usize = 6;

/// Seed for the RNG that reshuffles a replenished deck. Fixed so that
/// replaying one action log against one set of decks always reproduces the
/// same state.
const REPLENISH_RNG_SEED: u64 = 0x68616e64_666f6f74;

/// A game of hand and foot.
#[derive(Debug)]
pub struct Game {
    /// One deck per round, generated up front.
    decks: PerRound<Deck>,
    /// The discard pile shared by all players for the current round.
    discard_pile: Vec<Card>,
    /// The players, in turn order.
    players: Vec<Player>,
    /// Index of the player whose turn it is.
    turn: usize,
    /// The round in progress, or `None` once the game is over.
    round: Option<Round>,
    /// Reshuffle randomness; see [`REPLENISH_RNG_SEED`].
    rng: StdRng,
}

/// A read-only view of the game for display, in the shape the storage
/// layer persists: the discard pile plus every player's cards, books, and
/// points.
#[derive(Debug, Serialize)]
pub struct GameSnapshot<'a> {
    discard_pile: &'a [Card],
    players: &'a [Player],
}

impl Game {
    /// Creates a new [`Game`] with the specified players and decks, and
    /// deals the first round. Player order fixes turn order and deal
    /// order. Every deck must be able to cover its round's deal.
    pub fn new(player_names: &[String], decks: PerRound<Deck>) -> Result<Self, SetupError> {
        if player_names.len() < MIN_PLAYERS {
            return Err(SetupError::TooFewPlayers);
        }
        if player_names.len() > MAX_PLAYERS {
            return Err(SetupError::TooManyPlayers);
        }
        for (_, deck) in decks.iter() {
            if deck.len() < 2 * HAND_SIZE * player_names.len() {
                return Err(SetupError::IncompleteDeck);
            }
        }

        let mut game = Self {
            decks,
            discard_pile: vec![],
            players: player_names.iter().map(Player::new).collect(),
            turn: 0,
            round: Some(Round::Ninety),
            rng: StdRng::seed_from_u64(REPLENISH_RNG_SEED),
        };
        let round = Round::Ninety;
        for player in &mut game.players {
            deal_to_player(&mut game.decks[round], player)?;
            player.calculate_points(round);
        }
        Ok(game)
    }

    /// The round in progress, or `None` once the game is over.
    pub fn round(&self) -> Option<Round> {
        self.round
    }

    /// The players, in turn order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.turn]
    }

    /// Looks up a player by name.
    pub fn player_named(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    /// The current round's discard pile, bottom first.
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    /// A read-only view for display.
    pub fn snapshot(&self) -> GameSnapshot<'_> {
        GameSnapshot {
            discard_pile: &self.discard_pile,
            players: &self.players,
        }
    }

    /// Applies the specified action, or rejects it with no state change.
    pub fn apply_action(&mut self, action: &Action) -> Result<(), ActionError> {
        let round = self.round.ok_or(ActionError::GameOver)?;
        let index = self
            .players
            .iter()
            .position(|p| p.name() == action.player)
            .ok_or_else(|| ActionError::UnknownPlayer(action.player.clone()))?;
        if index != self.turn {
            return Err(ActionError::NotYourTurn(action.player.clone()));
        }
        debug!(player = %action.player, data = ?action.data, "applying action");

        match &action.data {
            ActionData::DrawFromDeck => self.draw_from_deck(index, round)?,
            ActionData::DrawFromDiscardPileAndAddToBook { book_rank } => {
                self.draw_from_discard_pile_and_add_to_book(index, round, *book_rank)?
            }
            ActionData::DrawFromDiscardPileAndStartBook { cards } => {
                self.draw_from_discard_pile_and_start_book(index, round, cards)?
            }
            ActionData::DiscardCard { card } => self.discard_card(index, round, *card)?,
            ActionData::LayDownInitialBooks { books } => {
                self.lay_down_initial_books(index, round, books)?
            }
            ActionData::DrawFromDiscardPileAndLayDownInitialBooks {
                partial_book,
                books,
            } => self.draw_from_discard_pile_and_lay_down_initial_books(
                index,
                round,
                partial_book,
                books,
            )?,
            ActionData::StartBook { cards } => self.start_book(index, round, cards)?,
            ActionData::AddCardsFromHandToBook { cards, book_rank } => {
                self.add_cards_from_hand_to_book(index, round, cards, *book_rank)?
            }
        }

        // The handler may have ended the round (or the game); keep the
        // actor's score view current for whichever round is now live.
        if let Some(round) = self.round {
            self.players[index].calculate_points(round);
        }
        Ok(())
    }

    fn draw_from_deck(&mut self, index: usize, round: Round) -> Result<(), ActionError> {
        if !self.players[index].can_draw_from_deck() {
            return Err(ActionError::CannotDrawFromDeck);
        }
        if let Some(card) = self.decks[round].draw() {
            self.players[index].add_card_to_hand_from_deck(card);
        }
        if self.decks[round].is_empty() {
            let pile = std::mem::take(&mut self.discard_pile);
            self.decks[round].replenish(pile, &mut self.rng);
            if self.decks[round].is_empty() {
                // Discard pile was empty too; nobody goes out.
                self.end_round(None);
            }
        }
        Ok(())
    }

    fn draw_from_discard_pile_and_add_to_book(
        &mut self,
        index: usize,
        round: Round,
        book_rank: Rank,
    ) -> Result<(), ActionError> {
        let player = &mut self.players[index];
        if !player.can_draw_from_discard_pile() || !player.has_laid_down_this_round() {
            return Err(ActionError::CannotDrawFromDiscardPile);
        }
        let card = *self
            .discard_pile
            .last()
            .ok_or(ActionError::DiscardPileEmpty)?;
        player.add_card_from_discard_pile_to_book(card, book_rank, round)?;
        self.discard_pile.pop();
        Ok(())
    }

    fn draw_from_discard_pile_and_start_book(
        &mut self,
        index: usize,
        round: Round,
        cards: &[Card],
    ) -> Result<(), ActionError> {
        if !self.players[index].can_draw_from_discard_pile() {
            return Err(ActionError::CannotDrawFromDiscardPile);
        }
        let card = *self
            .discard_pile
            .last()
            .ok_or(ActionError::DiscardPileEmpty)?;
        let mut book_cards = cards.to_vec();
        book_cards.push(card);

        // Rehearse on a scratch player so a failure leaves no trace.
        let mut player = self.players[index].clone();
        player.add_card_to_hand_from_discard_pile(card);
        player.start_book(&book_cards, round)?;
        if player.is_hand_empty() && !player.is_in_foot() {
            player.pick_up_foot();
        }

        self.discard_pile.pop();
        self.players[index] = player;
        Ok(())
    }

    fn discard_card(&mut self, index: usize, round: Round, card: Card) -> Result<(), ActionError> {
        let player = &mut self.players[index];
        if !player.can_end_turn() {
            return Err(ActionError::CannotEndTurn);
        }
        if !player.hand().contains(&card) {
            return Err(ActionError::CardNotInHand(card));
        }

        // Decide up front whether this discard goes out, so an unqualified
        // attempt is rejected before the hand or pile change.
        let goes_out = player.hand().len() == 1 && player.is_in_foot();
        if goes_out && !player.can_go_out(round) {
            return Err(ActionError::CannotGoOut);
        }

        player.remove_card_from_hand(card)?;
        self.discard_pile.push(card);

        if goes_out {
            self.end_round(Some(index));
        } else {
            let player = &mut self.players[index];
            if player.is_hand_empty() {
                player.pick_up_foot();
            }
            player.turn_ended();
            self.turn = (self.turn + 1) % self.players.len();
        }
        Ok(())
    }

    fn lay_down_initial_books(
        &mut self,
        index: usize,
        round: Round,
        books_cards: &[Vec<Card>],
    ) -> Result<(), ActionError> {
        if self.players[index].has_laid_down_this_round() {
            return Err(ActionError::AlreadyLaidDown);
        }
        Self::check_points_needed(round, books_cards)?;

        let mut player = self.players[index].clone();
        Self::commit_lay_down(&mut player, round, books_cards)?;
        self.players[index] = player;
        Ok(())
    }

    fn draw_from_discard_pile_and_lay_down_initial_books(
        &mut self,
        index: usize,
        round: Round,
        partial_book: &[Card],
        books_cards: &[Vec<Card>],
    ) -> Result<(), ActionError> {
        let player = &self.players[index];
        if player.has_laid_down_this_round() {
            return Err(ActionError::AlreadyLaidDown);
        }
        if !player.can_draw_from_discard_pile() {
            return Err(ActionError::CannotDrawFromDiscardPile);
        }
        let card = *self
            .discard_pile
            .last()
            .ok_or(ActionError::DiscardPileEmpty)?;

        let mut completed = partial_book.to_vec();
        completed.push(card);
        let mut all_books = books_cards.to_vec();
        all_books.push(completed);
        Self::check_points_needed(round, &all_books)?;

        let mut player = self.players[index].clone();
        player.add_card_to_hand_from_discard_pile(card);
        Self::commit_lay_down(&mut player, round, &all_books)?;

        self.discard_pile.pop();
        self.players[index] = player;
        Ok(())
    }

    /// Validates every candidate book and sums their card values against
    /// the round's threshold, before anything is committed.
    fn check_points_needed(round: Round, books_cards: &[Vec<Card>]) -> Result<(), ActionError> {
        let books = books_cards
            .iter()
            .map(|cards| Book::new(cards))
            .collect::<Result<Vec<_>, _>>()?;
        let points: i32 = books.iter().map(Book::cards_value).sum();
        let needed = round.points_needed();
        if points < needed {
            return Err(ActionError::NotEnoughPoints { needed, points });
        }
        Ok(())
    }

    /// Starts every book on the (scratch) player and marks it laid down.
    fn commit_lay_down(
        player: &mut Player,
        round: Round,
        books_cards: &[Vec<Card>],
    ) -> Result<(), ActionError> {
        for cards in books_cards {
            player.start_book(cards, round)?;
        }
        player.laid_down();
        if player.is_hand_empty() && !player.is_in_foot() {
            player.pick_up_foot();
        }
        Ok(())
    }

    fn start_book(
        &mut self,
        index: usize,
        round: Round,
        cards: &[Card],
    ) -> Result<(), ActionError> {
        let player = &mut self.players[index];
        player.start_book(cards, round)?;
        if player.is_hand_empty() && !player.is_in_foot() {
            player.pick_up_foot();
        }
        Ok(())
    }

    fn add_cards_from_hand_to_book(
        &mut self,
        index: usize,
        round: Round,
        cards: &[Card],
        book_rank: Rank,
    ) -> Result<(), ActionError> {
        let player = &mut self.players[index];
        player.add_cards_from_hand_to_book(cards, book_rank, round)?;
        if player.is_hand_empty() && !player.is_in_foot() {
            player.pick_up_foot();
        }
        Ok(())
    }

    /// Ends the current round, crediting `went_out` with the going-out
    /// bonus if given. Scores are frozen for every player, turn state
    /// resets, and the next round (if any) is dealt from its own deck.
    fn end_round(&mut self, went_out: Option<usize>) {
        let round = self.round.expect("round in progress");
        match went_out {
            Some(index) => {
                self.players[index].add_bonus_for_going_out(round);
                info!(player = %self.players[index].name(), %round, "player went out");
            }
            None => info!(%round, "round ended with an exhausted deck"),
        }
        for player in &mut self.players {
            player.calculate_points(round);
            player.round_ended();
        }
        self.discard_pile.clear();
        self.round = round.next_round();

        if let Some(next) = self.round {
            for player in &mut self.players {
                deal_to_player(&mut self.decks[next], player)
                    .expect("deck sizes validated at setup");
                player.calculate_points(next);
            }
        } else {
            info!("game over");
        }
    }
}

/// Deals a fresh hand and foot to one player.
fn deal_to_player(deck: &mut Deck, player: &mut Player) -> Result<(), SetupError> {
    let hand = deck.deal(HAND_SIZE).ok_or(SetupError::IncompleteDeck)?;
    let foot = deck.deal(HAND_SIZE).ok_or(SetupError::IncompleteDeck)?;
    player.set_hand_and_foot(hand, foot)
}
