//! Actions

use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank};

/// The payload for each kind of action a player can take. Legality and
/// effects live in [`Game`](crate::Game); the payload only names the intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionData {
    /// Draw the top card of the deck into the hand.
    DrawFromDeck,

    /// Draw the top discard straight into an existing book. Only available
    /// after laying down.
    DrawFromDiscardPileAndAddToBook { book_rank: Rank },

    /// Draw the top discard and start a new book with it plus the given
    /// cards from hand.
    DrawFromDiscardPileAndStartBook { cards: Vec<Card> },

    /// Discard a card from hand, ending the turn (or the round, when the
    /// discard goes out).
    DiscardCard { card: Card },

    /// Open for the round by starting several books at once. Their summed
    /// card values must meet the round's threshold.
    LayDownInitialBooks { books: Vec<Vec<Card>> },

    /// Open for the round, completing one of the books with the top
    /// discard.
    DrawFromDiscardPileAndLayDownInitialBooks {
        partial_book: Vec<Card>,
        books: Vec<Vec<Card>>,
    },

    /// Start a new book from cards in hand.
    StartBook { cards: Vec<Card> },

    /// Add cards from hand to an existing book.
    AddCardsFromHandToBook { cards: Vec<Card>, book_rank: Rank },
}

/// An action taken by a player, as submitted over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the player taking the action.
    pub player: String,
    /// The action payload.
    #[serde(flatten)]
    pub data: ActionData,
}

impl Action {
    /// Creates a new [`Action`].
    pub fn new<S: Into<String>>(player: S, data: ActionData) -> Self {
        Self {
            player: player.into(),
            data,
        }
    }
}
