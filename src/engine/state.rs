use crate::{
    core::ledger::{Ledger, LedgerError},
    round::Round,
    types::{MatchStatus, Seat, SeatIndex, SeatTally},
    variant::GameVariant,
};

/// A match could not be built from the given seats or ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Seat count outside the variant's bounds.
    #[error("{variant} needs {min}-{max} seats, got {count}")]
    SeatCount {
        /// Variant id string.
        variant: String,
        /// Seats supplied.
        count: usize,
        /// Fewest seats allowed.
        min: usize,
        /// Most seats allowed.
        max: usize,
    },
    /// A seat's index differs from its position.
    #[error("seat at position {position} carries index {index}")]
    SeatOrder {
        /// Position in the seat list.
        position: usize,
        /// Index the seat carried.
        index: SeatIndex,
    },
    /// The persisted ledger is malformed or does not replay.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Live aggregate of one match.
///
/// Running values are never stored independently: they are the tallies
/// recorded by the latest ledger entry, which always equal a replay of the
/// ledger from the variant's starting values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScoringState {
    pub(crate) variant: GameVariant,
    pub(crate) seats: Vec<Seat>,
    pub(crate) start: Vec<SeatTally>,
    pub(crate) ledger: Ledger,
    pub(crate) active_seat: SeatIndex,
    pub(crate) status: MatchStatus,
}

impl MatchScoringState {
    /// Fresh match with an empty ledger; seat 0 throws first.
    pub fn new(variant: GameVariant, seats: Vec<Seat>) -> Result<Self, StateError> {
        check_seats(&variant, &seats)?;
        let start = (variant.policy().starting_tallies)(&variant, seats.len());
        Ok(Self {
            variant,
            seats,
            start,
            ledger: Ledger::new(),
            active_seat: 0,
            status: MatchStatus::InProgress,
        })
    }

    /// Rebuilds a match from a persisted ledger.
    ///
    /// Every recorded tally row is checked against a replay. The active seat
    /// is `active_marker` when present, else the seat after the last actor.
    /// A terminal last round forces `Completed`.
    pub fn resume(
        variant: GameVariant,
        seats: Vec<Seat>,
        rounds: Vec<Round>,
        active_marker: Option<SeatIndex>,
        status: MatchStatus,
    ) -> Result<Self, StateError> {
        let mut state = Self::new(variant, seats)?;
        let ledger = Ledger::from_rounds(rounds)?;
        ledger.verify(&state.variant, &state.start)?;

        let seat_count = state.seats.len();
        state.active_seat = match active_marker {
            Some(seat) if seat < seat_count => seat,
            _ => ledger
                .last()
                .map(|r| (r.seat + 1) % seat_count)
                .unwrap_or(0),
        };
        state.status = if ledger.last().is_some_and(|r| r.terminal) {
            MatchStatus::Completed
        } else {
            status
        };
        state.ledger = ledger;
        Ok(state)
    }

    /// Resolved ruleset.
    pub fn variant(&self) -> &GameVariant {
        &self.variant
    }

    /// Seats in turn order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Number of seats.
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    /// Round ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Recorded rounds in order.
    pub fn rounds(&self) -> &[Round] {
        self.ledger.rounds()
    }

    /// Running values before any round was played.
    pub fn starting_tallies(&self) -> &[SeatTally] {
        &self.start
    }

    /// Current running value of every seat.
    pub fn tallies(&self) -> Vec<SeatTally> {
        self.ledger.current_tallies(&self.start)
    }

    /// Current running value of `seat`.
    pub fn tally(&self, seat: SeatIndex) -> Option<SeatTally> {
        match self.ledger.last() {
            Some(round) => round.tallies_after.get(seat).copied(),
            None => self.start.get(seat).copied(),
        }
    }

    /// Seat whose turn it is.
    pub fn active_seat(&self) -> SeatIndex {
        self.active_seat
    }

    /// Lifecycle status.
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// True once a terminal condition was reached or the match was ended.
    pub fn is_complete(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub(crate) fn next_seat(&self, seat: SeatIndex) -> SeatIndex {
        (seat + 1) % self.seats.len()
    }
}

fn check_seats(variant: &GameVariant, seats: &[Seat]) -> Result<(), StateError> {
    let bounds = variant.seat_bounds();
    if seats.is_empty() || !bounds.contains(seats.len()) {
        return Err(StateError::SeatCount {
            variant: variant.id().to_string(),
            count: seats.len(),
            min: bounds.min,
            max: bounds.max,
        });
    }
    for (position, seat) in seats.iter().enumerate() {
        if seat.index != position {
            return Err(StateError::SeatOrder {
                position,
                index: seat.index,
            });
        }
    }
    Ok(())
}
