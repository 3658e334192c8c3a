//! A rules engine for hand and foot, a canasta variant played over four
//! rounds with separate hand and foot deals.
//!
//! The engine is deliberately split from any transport or storage: a host
//! creates an [`Engine`] for a roster of players, generates an
//! [`InitialState`] (the four shuffled round decks), and then drives the
//! [`Game`] one [`Action`] at a time. Actions and state views serialize
//! with [`serde`], and a persisted initial state plus action log replays
//! to an identical game.

mod action;
mod book;
mod card;
mod deck;
mod engine;
mod error;
mod game;
mod player;
mod round;

pub use self::action::{Action, ActionData};
pub use self::book::Book;
pub use self::card::{Card, Rank, Suit};
pub use self::deck::Deck;
pub use self::engine::{Engine, InitialState, RoundDecks};
pub use self::error::{ActionError, ReplayError, SetupError};
pub use self::game::{Game, GameSnapshot, MAX_PLAYERS, MIN_PLAYERS};
pub use self::player::{Player, Points, HAND_SIZE};
pub use self::round::{PerRound, Round};
