//! Round progression.

use std::fmt::Display;
use std::ops::{Index, IndexMut};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One of the four stages of a game, named for the points a player must lay
/// down to open books in it. Rounds get harder as shown: a fresh deal and a
/// higher threshold each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    Ninety,
    OneTwenty,
    OneFifty,
    OneEighty,
}
impl Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Round::Ninety => "ninety",
            Round::OneTwenty => "one_twenty",
            Round::OneFifty => "one_fifty",
            Round::OneEighty => "one_eighty",
        })
    }
}

impl Round {
    /// All four rounds, in play order.
    pub fn all_rounds() -> &'static [Round; 4] {
        static ROUNDS: [Round; 4] = [
            Round::Ninety,
            Round::OneTwenty,
            Round::OneFifty,
            Round::OneEighty,
        ];
        &ROUNDS
    }

    /// The lay-down threshold that gates the first time a player opens
    /// books in this round.
    pub fn points_needed(self) -> i32 {
        match self {
            Round::Ninety => 90,
            Round::OneTwenty => 120,
            Round::OneFifty => 150,
            Round::OneEighty => 180,
        }
    }

    /// The round that follows this one, or `None` after the last.
    pub fn next_round(self) -> Option<Round> {
        match self {
            Round::Ninety => Some(Round::OneTwenty),
            Round::OneTwenty => Some(Round::OneFifty),
            Round::OneFifty => Some(Round::OneEighty),
            Round::OneEighty => None,
        }
    }

    fn ordinal(self) -> usize {
        match self {
            Round::Ninety => 0,
            Round::OneTwenty => 1,
            Round::OneFifty => 2,
            Round::OneEighty => 3,
        }
    }
}

/// Fixed storage with one slot per round. The round set is statically
/// known, so round-keyed state is an array rather than a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerRound<T>([T; 4]);

impl<T> PerRound<T> {
    /// Creates a [`PerRound`] from four values in play order.
    pub fn new(slots: [T; 4]) -> Self {
        Self(slots)
    }

    /// Iterates over `(round, value)` pairs in play order.
    pub fn iter(&self) -> impl Iterator<Item = (Round, &T)> {
        Round::all_rounds().iter().copied().zip(self.0.iter())
    }
}

impl<T> Index<Round> for PerRound<T> {
    type Output = T;

    fn index(&self, round: Round) -> &T {
        &self.0[round.ordinal()]
    }
}

impl<T> IndexMut<Round> for PerRound<T> {
    fn index_mut(&mut self, round: Round) -> &mut T {
        &mut self.0[round.ordinal()]
    }
}

impl<T: Serialize> Serialize for PerRound<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(4))?;
        for (round, value) in self.iter() {
            map.serialize_entry(&round, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_progression() {
        assert_eq!(Round::Ninety.next_round(), Some(Round::OneTwenty));
        assert_eq!(Round::OneTwenty.next_round(), Some(Round::OneFifty));
        assert_eq!(Round::OneFifty.next_round(), Some(Round::OneEighty));
        assert_eq!(Round::OneEighty.next_round(), None);
    }

    #[test]
    fn test_points_needed() {
        let thresholds: Vec<i32> = Round::all_rounds()
            .iter()
            .map(|r| r.points_needed())
            .collect();
        assert_eq!(thresholds, vec![90, 120, 150, 180]);
    }

    #[test]
    fn test_per_round_indexing_and_wire_keys() {
        let mut slots: PerRound<u32> = PerRound::default();
        slots[Round::OneFifty] = 7;
        assert_eq!(slots[Round::OneFifty], 7);
        assert_eq!(slots[Round::Ninety], 0);

        let json = serde_json::to_string(&slots).unwrap();
        assert_eq!(
            json,
            r#"{"ninety":0,"one_twenty":0,"one_fifty":7,"one_eighty":0}"#
        );
    }
}
