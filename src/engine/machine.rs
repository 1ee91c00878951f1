use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    round::{Round, RoundInput},
    types::{MatchStatus, RoundIndex, SeatIndex},
    variant::{TargetKind, ValidationError, VariantId, Verdict},
};

use super::{result::FinalResult, state::MatchScoringState};

/// Why a submission was refused. State is never mutated on rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The match is completed or already finalized.
    #[error("match is already complete")]
    MatchAlreadyComplete,
    /// A turn-strict variant received input from another seat.
    #[error("seat {seat} submitted out of turn; seat {active} is active")]
    NotActiveTurn {
        /// Seat that submitted.
        seat: SeatIndex,
        /// Seat whose turn it is.
        active: SeatIndex,
    },
    /// The input failed variant validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The variant ends only on its own terminal condition.
    #[error("{variant} matches cannot be ended explicitly")]
    ExplicitEndNotAllowed {
        /// Variant of the match.
        variant: VariantId,
    },
}

/// Accepted state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Round appended; match continues.
    Recorded {
        /// Index of the new round.
        round: RoundIndex,
        /// Seat that scored.
        seat: SeatIndex,
        /// Seat now active.
        next_seat: SeatIndex,
    },
    /// X01 overshoot: nothing appended, turn passed on.
    Bust {
        /// Seat that bust.
        seat: SeatIndex,
        /// Seat now active.
        next_seat: SeatIndex,
    },
    /// Round appended and the terminal condition was met.
    Completed {
        /// Index of the terminal round.
        round: RoundIndex,
        /// Seat that scored it.
        seat: SeatIndex,
        /// Outcome of the match.
        result: FinalResult,
    },
}

impl MatchScoringState {
    /// Validates and applies one submission stamped with the current time.
    pub fn submit(&mut self, seat: SeatIndex, input: &RoundInput) -> Result<Transition, Rejection> {
        self.submit_at(seat, input, now_ms())
    }

    /// Validates and applies one submission with an explicit timestamp.
    pub fn submit_at(
        &mut self,
        seat: SeatIndex,
        input: &RoundInput,
        ts_ms: u64,
    ) -> Result<Transition, Rejection> {
        if self.status != MatchStatus::InProgress {
            return Err(Rejection::MatchAlreadyComplete);
        }
        let seats = self.seats.len();
        if seat >= seats {
            return Err(ValidationError::SeatOutOfRange { seat, seats }.into());
        }

        let policy = self.variant.policy();
        if policy.strict_turns && seat != self.active_seat {
            return Err(Rejection::NotActiveTurn {
                seat,
                active: self.active_seat,
            });
        }

        let mut tallies = self.tallies();
        let scored = match (policy.validate)(&self.variant, &tallies, seat, input)? {
            Verdict::Bust => {
                let next_seat = self.next_seat(seat);
                self.active_seat = next_seat;
                return Ok(Transition::Bust { seat, next_seat });
            }
            Verdict::Accept(scored) => scored,
        };

        (policy.apply)(&self.variant, &mut tallies, seat, &scored);
        let terminal = (policy.target_reached)(&self.variant, &tallies);
        let index = self.ledger.next_index();
        let round = Round {
            index,
            seat,
            scored,
            tallies_after: tallies,
            terminal,
            ts_ms,
        };
        self.ledger.push_next(round);

        if terminal {
            self.status = MatchStatus::Completed;
            self.active_seat = seat;
            let result = self.compute_result();
            return Ok(Transition::Completed {
                round: index,
                seat,
                result,
            });
        }

        let next_seat = self.next_seat(seat);
        self.active_seat = next_seat;
        Ok(Transition::Recorded {
            round: index,
            seat,
            next_seat,
        })
    }

    /// Retracts the latest round and hands the turn back to its seat.
    ///
    /// Returns `None` and changes nothing when the ledger is empty.
    pub fn undo(&mut self) -> Option<Round> {
        let round = self.ledger.retract_last()?;
        self.active_seat = round.seat;
        self.status = MatchStatus::InProgress;
        Some(round)
    }

    /// Ends a match whose rules only finish on request.
    pub fn end_match(&mut self) -> Result<FinalResult, Rejection> {
        if self.status != MatchStatus::InProgress {
            return Err(Rejection::MatchAlreadyComplete);
        }
        if self.variant.target_kind() != TargetKind::MostPoints {
            return Err(Rejection::ExplicitEndNotAllowed {
                variant: self.variant.id(),
            });
        }
        self.status = MatchStatus::Completed;
        Ok(self.compute_result())
    }

    /// Result of a completed match.
    pub fn final_result(&self) -> Option<FinalResult> {
        self.is_complete().then(|| self.compute_result())
    }

    fn compute_result(&self) -> FinalResult {
        let tallies = self.tallies();
        let winners = (self.variant.policy().winners)(&self.variant, &tallies);
        FinalResult::compute(&self.variant, tallies, winners, self.ledger.len())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
