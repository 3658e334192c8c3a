//! Entry points for hosting a game.
//!
//! The engine owns no state between calls. A host generates an
//! [`InitialState`] once, persists it alongside the growing action log,
//! and rebuilds the [`Game`] at any time by folding the log with
//! [`Engine::replay`]. Replaying the same initial state and log always
//! produces the same game.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::deck::Deck;
use crate::error::{ReplayError, SetupError};
use crate::game::Game;
use crate::round::PerRound;

/// One shuffled deck for each of the four rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundDecks {
    pub ninety: Deck,
    pub one_twenty: Deck,
    pub one_fifty: Deck,
    pub one_eighty: Deck,
}

impl From<RoundDecks> for PerRound<Deck> {
    fn from(decks: RoundDecks) -> Self {
        PerRound::new([
            decks.ninety,
            decks.one_twenty,
            decks.one_fifty,
            decks.one_eighty,
        ])
    }
}

/// Everything random about a game, fixed up front so the rest of it can
/// be replayed from an action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    pub decks: RoundDecks,
}

/// A stateless game factory for a fixed roster of players.
#[derive(Debug, Clone)]
pub struct Engine {
    player_names: Vec<String>,
}

impl Engine {
    /// Creates an engine for the given players, in turn order.
    pub fn new<S: Into<String>>(player_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            player_names: player_names.into_iter().map(Into::into).collect(),
        }
    }

    /// The players, in turn order.
    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    /// Generates a fresh [`InitialState`] using thread-local randomness.
    pub fn generate_initial_state(&self) -> InitialState {
        self.generate_initial_state_with(&mut rand::thread_rng())
    }

    /// Generates a fresh [`InitialState`] from the given source of
    /// randomness. Each round gets its own deck of one card set more than
    /// the player count.
    pub fn generate_initial_state_with<R: Rng + ?Sized>(&self, rng: &mut R) -> InitialState {
        let set_count = self.player_names.len() + 1;
        let mut deck = || {
            let mut deck = Deck::standard(set_count);
            deck.shuffle(rng);
            deck
        };
        InitialState {
            decks: RoundDecks {
                ninety: deck(),
                one_twenty: deck(),
                one_fifty: deck(),
                one_eighty: deck(),
            },
        }
    }

    /// Starts a game from a previously generated [`InitialState`].
    pub fn start_game_with_initial_state(
        &self,
        initial_state: InitialState,
    ) -> Result<Game, SetupError> {
        Game::new(&self.player_names, initial_state.decks.into())
    }

    /// Rebuilds a game by starting from `initial_state` and applying every
    /// action in order. A rejected action reports its position in the log.
    pub fn replay(
        &self,
        initial_state: InitialState,
        actions: &[Action],
    ) -> Result<Game, ReplayError> {
        let mut game = self.start_game_with_initial_state(initial_state)?;
        for (index, action) in actions.iter().enumerate() {
            game.apply_action(action)
                .map_err(|source| ReplayError::Action { index, source })?;
        }
        Ok(game)
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use crate::action::ActionData;
    use crate::error::ActionError;
    use crate::round::Round;

    use super::*;

    #[test]
    fn test_generated_decks_scale_with_player_count() {
        let engine = Engine::new(vec!["a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(7);
        let state = engine.generate_initial_state_with(&mut rng);
        for deck in [
            &state.decks.ninety,
            &state.decks.one_twenty,
            &state.decks.one_fifty,
            &state.decks.one_eighty,
        ] {
            assert_eq!(deck.len(), 4 * 54);
        }
    }

    #[test]
    fn test_generation_is_deterministic_under_a_fixed_rng() {
        let engine = Engine::new(vec!["a", "b"]);
        let state1 = engine.generate_initial_state_with(&mut StdRng::seed_from_u64(7));
        let state2 = engine.generate_initial_state_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(state1, state2);
        let state3 = engine.generate_initial_state_with(&mut StdRng::seed_from_u64(8));
        assert_ne!(state1, state3);
    }

    #[test]
    fn test_start_game_deals_the_first_round() {
        let engine = Engine::new(vec!["a", "b"]);
        let state = engine.generate_initial_state_with(&mut StdRng::seed_from_u64(7));
        let game = engine.start_game_with_initial_state(state).unwrap();
        assert_eq!(game.round(), Some(Round::Ninety));
        for player in game.players() {
            assert_eq!(player.hand().len(), 13);
            assert_eq!(player.foot().len(), 13);
        }
    }

    #[test]
    fn test_replay_reports_the_failing_action_index() {
        let engine = Engine::new(vec!["a", "b"]);
        let state = engine.generate_initial_state_with(&mut StdRng::seed_from_u64(7));
        let actions = vec![
            Action::new("a", ActionData::DrawFromDeck),
            Action::new("b", ActionData::DrawFromDeck),
        ];
        assert_matches!(
            engine.replay(state, &actions),
            Err(ReplayError::Action {
                index: 1,
                source: ActionError::NotYourTurn(_),
            })
        );
    }

    #[test]
    fn test_initial_state_round_trips_through_json() {
        let engine = Engine::new(vec!["a", "b"]);
        let state = engine.generate_initial_state_with(&mut StdRng::seed_from_u64(7));
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.starts_with(r#"{"decks":{"ninety":[{"#));
        let parsed: InitialState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
