//! Error types

use crate::card::{Card, Rank};

/// Structural problems detected at game creation. These always indicate a
/// bug in the caller (a bad seed or player list), never bad user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("not enough players")]
    TooFewPlayers,
    #[error("too many players")]
    TooManyPlayers,
    #[error("initial hand or foot not sized correctly")]
    WrongDealSize,
    #[error("deck has too few cards to deal every round")]
    IncompleteDeck,
}

/// A rule violation while applying an action. The offending action must be
/// rejected in full; the game state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,

    #[error("unknown player {0}")]
    UnknownPlayer(String),

    #[error("it is not {0}'s turn")]
    NotYourTurn(String),

    #[error("cannot draw from the deck")]
    CannotDrawFromDeck,

    #[error("cannot draw from the discard pile")]
    CannotDrawFromDiscardPile,

    #[error("the discard pile is empty")]
    DiscardPileEmpty,

    /// A player may only discard once they have drawn twice.
    #[error("cannot end the turn yet")]
    CannotEndTurn,

    /// Going out requires an empty foot plus a natural and an unnatural book.
    #[error("cannot go out")]
    CannotGoOut,

    #[error("{0} is not in hand")]
    CardNotInHand(Card),

    #[error("not enough cards to start a book")]
    TooFewCardsForBook,

    #[error("none of the given cards can start a book")]
    NoBookStarter,

    #[error("{card} does not match the book of {book}s")]
    WrongRankForBook { book: Rank, card: Card },

    #[error("too many wilds in the book of {0}s to add another")]
    TooManyWilds(Rank),

    #[error("no book of {0}s")]
    NoSuchBook(Rank),

    #[error("already a book of {0}s")]
    DuplicateBook(Rank),

    #[error("already laid down this round")]
    AlreadyLaidDown,

    #[error("not enough points to lay down: {points} of {needed}")]
    NotEnoughPoints { needed: i32, points: i32 },
}

/// Errors from rebuilding a game out of a seed plus an action log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("action {index} rejected: {source}")]
    Action { index: usize, source: ActionError },
}
