use serde::{Deserialize, Serialize};

use crate::{
    round::Round,
    types::{RoundIndex, SeatTally},
    variant::GameVariant,
};

/// Structural or replay problem in a ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A round does not carry the next sequential index.
    #[error("round index {got} out of sequence, expected {expected}")]
    OutOfSequence {
        /// Index the ledger expected.
        expected: RoundIndex,
        /// Index the round carried.
        got: RoundIndex,
    },
    /// A round's tally row has the wrong number of seats.
    #[error("round {index} records {got} tallies for {expected} seats")]
    TallyWidth {
        /// Offending round.
        index: RoundIndex,
        /// Seat count of the match.
        expected: usize,
        /// Tallies recorded.
        got: usize,
    },
    /// Replaying up to a round does not reproduce its recorded tallies.
    #[error("replay diverges from recorded tallies at round {index}")]
    Divergence {
        /// First divergent round.
        index: RoundIndex,
    },
}

/// Ordered scoring history of one match.
///
/// Entries are never edited or reordered; only the most recent one can be
/// retracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    rounds: Vec<Round>,
}

impl Ledger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from persisted rounds, checking their sequence.
    pub fn from_rounds(rounds: Vec<Round>) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        for round in rounds {
            ledger.append(round)?;
        }
        Ok(ledger)
    }

    /// Appends `round`, which must carry [`Ledger::next_index`].
    pub fn append(&mut self, round: Round) -> Result<(), LedgerError> {
        let expected = self.next_index();
        if round.index != expected {
            return Err(LedgerError::OutOfSequence {
                expected,
                got: round.index,
            });
        }
        self.rounds.push(round);
        Ok(())
    }

    /// Appends `round` at the next index, overwriting whatever it carried.
    pub(crate) fn push_next(&mut self, mut round: Round) {
        round.index = self.next_index();
        self.rounds.push(round);
    }

    /// Removes the most recent round. Empty ledgers are left untouched.
    pub fn retract_last(&mut self) -> Option<Round> {
        self.rounds.pop()
    }

    /// Rounds in order.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Most recent round.
    pub fn last(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Number of rounds.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// True when no round was recorded.
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Index the next appended round must carry.
    pub fn next_index(&self) -> RoundIndex {
        RoundIndex::try_from(self.rounds.len()).unwrap_or(RoundIndex::MAX)
    }

    /// Running values recorded by the latest round, or `start` when empty.
    pub fn current_tallies(&self, start: &[SeatTally]) -> Vec<SeatTally> {
        self.last()
            .map(|r| r.tallies_after.clone())
            .unwrap_or_else(|| start.to_vec())
    }

    /// Checks every recorded tally row against a fresh replay.
    pub fn verify(&self, variant: &GameVariant, start: &[SeatTally]) -> Result<(), LedgerError> {
        let policy = variant.policy();
        let mut tallies = start.to_vec();
        for round in &self.rounds {
            if round.tallies_after.len() != start.len() {
                return Err(LedgerError::TallyWidth {
                    index: round.index,
                    expected: start.len(),
                    got: round.tallies_after.len(),
                });
            }
            (policy.apply)(variant, &mut tallies, round.seat, &round.scored);
            if tallies != round.tallies_after {
                return Err(LedgerError::Divergence { index: round.index });
            }
        }
        Ok(())
    }
}

/// Folds `rounds` over `start` with the variant's apply rule.
///
/// Pure: the same inputs always produce the same running values.
pub fn replay(variant: &GameVariant, start: &[SeatTally], rounds: &[Round]) -> Vec<SeatTally> {
    let policy = variant.policy();
    let mut tallies = start.to_vec();
    for round in rounds {
        (policy.apply)(variant, &mut tallies, round.seat, &round.scored);
    }
    tallies
}
