use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use crate::{
    engine::{machine::Transition, result::FinalResult, stats::SeatStats},
    persist::MatchStore,
    round::{Round, RoundInput},
    session::{MatchSession, SessionError},
    snapshot::MatchSnapshot,
    types::SeatIndex,
};

use super::events::ScoreEvent;

/// Failure of a runtime command.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The session refused or failed the command.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The worker has stopped.
    #[error("scorekeeper runtime is no longer running")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_scorekeeper`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Commands buffered before senders wait.
    pub command_queue_bound: usize,
    /// Events retained for slow subscribers.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 64,
            event_capacity: 256,
        }
    }
}

/// Cloneable handle to a running scorekeeper.
///
/// Every call waits for its command to finish, so two submissions never
/// overlap.
#[derive(Clone)]
pub struct ScorekeeperHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ScoreEvent>,
}

enum Command {
    Submit {
        seat: SeatIndex,
        input: RoundInput,
        resp: oneshot::Sender<Result<Transition, RuntimeError>>,
    },
    Undo {
        resp: oneshot::Sender<Result<Option<Round>, RuntimeError>>,
    },
    EndMatch {
        resp: oneshot::Sender<Result<FinalResult, RuntimeError>>,
    },
    Pause {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    RetrySave {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Finalize {
        resp: oneshot::Sender<Result<FinalResult, RuntimeError>>,
    },
    Snapshot {
        resp: oneshot::Sender<MatchSnapshot>,
    },
    Stats {
        resp: oneshot::Sender<Vec<SeatStats>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

/// Moves `session` onto a blocking worker that applies commands in order.
pub fn spawn_scorekeeper<S: MatchStore + 'static>(
    session: MatchSession<S>,
    config: RuntimeConfig,
) -> ScorekeeperHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<ScoreEvent>(config.event_capacity);

    let events_tx_loop = events_tx.clone();
    tokio::task::spawn_blocking(move || {
        let mut session = session;
        while let Some(cmd) = cmd_rx.blocking_recv() {
            if handle_command(cmd, &mut session, &events_tx_loop) {
                break;
            }
        }
        debug!(match_id = session.match_id(), "scorekeeper stopped");
    });

    ScorekeeperHandle { cmd_tx, events_tx }
}

impl ScorekeeperHandle {
    /// Receives every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ScoreEvent> {
        self.events_tx.subscribe()
    }

    /// Submits a round for `seat`; see [`MatchSession::submit_and_persist`].
    pub async fn submit(
        &self,
        seat: SeatIndex,
        input: RoundInput,
    ) -> Result<Transition, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Submit {
            seat,
            input,
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Retracts the latest round.
    pub async fn undo(&self) -> Result<Option<Round>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Undo { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Ends a most-points match.
    pub async fn end_match(&self) -> Result<FinalResult, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::EndMatch { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Saves the match for a later resume.
    pub async fn pause(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Pause { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Writes state that previously failed to save.
    pub async fn retry_save(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::RetrySave { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Writes participant results of a completed match.
    pub async fn finalize(&self) -> Result<FinalResult, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Finalize { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Current state as it would be saved.
    pub async fn snapshot(&self) -> Result<MatchSnapshot, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Per-seat statistics.
    pub async fn stats(&self) -> Result<Vec<SeatStats>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Stats { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Saves any unsaved state and stops the worker.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    async fn send(&self, cmd: Command) -> Result<(), RuntimeError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command<S: MatchStore>(
    cmd: Command,
    session: &mut MatchSession<S>,
    events_tx: &broadcast::Sender<ScoreEvent>,
) -> bool {
    match cmd {
        Command::Submit { seat, input, resp } => {
            let res = session.submit_and_persist(seat, &input);
            match &res {
                Ok(transition) => emit_transition(events_tx, transition),
                Err(err) => {
                    // Applied in memory, so subscribers still see the round.
                    if let SessionError::Unsaved { transition, .. } = err {
                        emit_transition(events_tx, transition);
                    }
                    if err.is_save_failure() {
                        emit_save_failed(events_tx, err);
                    }
                }
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Undo { resp } => {
            let res = session.undo_and_persist();
            match &res {
                Ok(Some(round)) => {
                    let _ = events_tx.send(ScoreEvent::Undone {
                        round: round.index,
                        seat: round.seat,
                    });
                }
                Ok(None) => {}
                Err(err) if err.is_save_failure() => emit_save_failed(events_tx, err),
                Err(_) => {}
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::EndMatch { resp } => {
            let res = session.end_match();
            match &res {
                Ok(result) => {
                    let _ = events_tx.send(ScoreEvent::Completed {
                        winners: result.winners.clone(),
                    });
                }
                Err(err) if err.is_save_failure() => emit_save_failed(events_tx, err),
                Err(_) => {}
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Pause { resp } => {
            let res = session.pause();
            if let Err(err) = &res {
                if err.is_save_failure() {
                    emit_save_failed(events_tx, err);
                }
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::RetrySave { resp } => {
            let res = session.retry_save();
            if let Err(err) = &res {
                emit_save_failed(events_tx, err);
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Finalize { resp } => {
            let res = session.finalize();
            if res.is_ok() {
                let _ = events_tx.send(ScoreEvent::Finalized);
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(MatchSnapshot::capture(session.state()));
        }
        Command::Stats { resp } => {
            let _ = resp.send(session.state().seat_stats());
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(session.retry_save().map_err(RuntimeError::from));
            return true;
        }
    }

    false
}

fn emit_transition(events_tx: &broadcast::Sender<ScoreEvent>, transition: &Transition) {
    let event = match transition {
        Transition::Recorded { round, seat, .. } => ScoreEvent::RoundRecorded {
            round: *round,
            seat: *seat,
        },
        Transition::Bust { seat, next_seat } => ScoreEvent::Bust {
            seat: *seat,
            next_seat: *next_seat,
        },
        Transition::Completed { round, seat, result } => {
            let _ = events_tx.send(ScoreEvent::RoundRecorded {
                round: *round,
                seat: *seat,
            });
            ScoreEvent::Completed {
                winners: result.winners.clone(),
            }
        }
    };
    let _ = events_tx.send(event);
}

fn emit_save_failed(events_tx: &broadcast::Sender<ScoreEvent>, err: &SessionError) {
    let _ = events_tx.send(ScoreEvent::SaveFailed {
        message: err.to_string(),
    });
}
