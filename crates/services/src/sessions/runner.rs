use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, trace, warn};

use quiz_core::model::{Difficulty, QuizResults};
use storage::repository::QuizSummaryId;

use crate::error::{QuizServiceError, SessionError, StateViolation};
use crate::quiz_service::{QuizAttempt, QuizService};

use super::engine::{AdvanceOutcome, AnswerFeedback, QuizSession};
use super::ticker::TickSource;
use super::view::SessionView;

const COMMAND_BUFFER: usize = 32;

type Reply<T> = oneshot::Sender<Result<T, QuizServiceError>>;

enum QuizCommand {
    Start {
        difficulty: Difficulty,
        reply: Reply<SessionView>,
    },
    Submit {
        option: usize,
        reply: Reply<AnswerFeedback>,
    },
    Skip {
        reply: Reply<usize>,
    },
    Advance {
        reply: Reply<AdvanceOutcome>,
    },
    Previous {
        reply: Reply<usize>,
    },
    Results {
        reply: Reply<QuizResults>,
    },
    SummaryId {
        reply: Reply<Option<QuizSummaryId>>,
    },
    Tick {
        generation: u64,
    },
}

/// Task that exclusively owns the current quiz session and its countdown.
///
/// Every mutation, including clock ticks, arrives as a message and is applied in
/// order, so the session is never touched from two places at once. Each started
/// session gets a new generation; ticks tagged with an older generation are dropped.
pub struct QuizRunner {
    service: QuizService,
    rng: StdRng,
    tick_period: Duration,
    attempt: Option<QuizAttempt>,
    ticker: Option<TickSource>,
    generation: u64,
    commands: mpsc::Receiver<QuizCommand>,
    loopback: mpsc::WeakSender<QuizCommand>,
    views: watch::Sender<Option<SessionView>>,
}

impl QuizRunner {
    pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

    /// Spawn the runner on the current tokio runtime and return a handle to it.
    ///
    /// The runner stops once every handle has been dropped.
    #[must_use]
    pub fn spawn(service: QuizService, rng: StdRng, tick_period: Duration) -> QuizHandle {
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (views, view_rx) = watch::channel(None);
        let runner = Self {
            service,
            rng,
            tick_period,
            attempt: None,
            ticker: None,
            generation: 0,
            commands,
            loopback: tx.downgrade(),
            views,
        };
        tokio::spawn(runner.run());
        QuizHandle { tx, views: view_rx }
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                QuizCommand::Start { difficulty, reply } => {
                    let _ = reply.send(self.start(difficulty));
                }
                QuizCommand::Submit { option, reply } => {
                    let result = self.with_session(|s| s.submit_answer(option));
                    let _ = reply.send(result);
                }
                QuizCommand::Skip { reply } => {
                    let result = self.with_session(QuizSession::skip_current);
                    let _ = reply.send(result);
                }
                QuizCommand::Advance { reply } => {
                    let result = self.with_session(QuizSession::advance);
                    if matches!(result, Ok(AdvanceOutcome { is_complete: true, .. })) {
                        self.finish().await;
                    }
                    let _ = reply.send(result);
                }
                QuizCommand::Previous { reply } => {
                    let result = self.with_session(QuizSession::go_to_previous);
                    let _ = reply.send(result);
                }
                QuizCommand::Results { reply } => {
                    let result = self
                        .current()
                        .and_then(|a| a.session().compute_results().map_err(Into::into));
                    let _ = reply.send(result);
                }
                QuizCommand::SummaryId { reply } => {
                    let _ = reply.send(self.current().map(QuizAttempt::summary_id));
                }
                QuizCommand::Tick { generation } => self.on_tick(generation).await,
            }
        }

        self.stop_ticker();
        debug!("quiz runner stopped");
    }

    fn start(&mut self, difficulty: Difficulty) -> Result<SessionView, QuizServiceError> {
        // A failed start leaves the previous session and its countdown untouched.
        let attempt = self.service.start_attempt(difficulty, &mut self.rng)?;

        self.stop_ticker();
        self.generation += 1;
        let generation = self.generation;
        self.ticker = Some(TickSource::spawn(
            self.tick_period,
            self.loopback.clone(),
            move || QuizCommand::Tick { generation },
        ));

        let view = attempt.session().view();
        self.attempt = Some(attempt);
        self.views.send_replace(Some(view.clone()));
        Ok(view)
    }

    fn current(&self) -> Result<&QuizAttempt, QuizServiceError> {
        self.attempt
            .as_ref()
            .ok_or(SessionError::InvalidState(StateViolation::NoSession).into())
    }

    fn with_session<T>(
        &mut self,
        op: impl FnOnce(&mut QuizSession) -> Result<T, SessionError>,
    ) -> Result<T, QuizServiceError> {
        let attempt = self
            .attempt
            .as_mut()
            .ok_or(SessionError::InvalidState(StateViolation::NoSession))?;
        let result = op(attempt.session_mut());
        let view = attempt.session().view();
        self.views.send_replace(Some(view));
        Ok(result?)
    }

    async fn on_tick(&mut self, generation: u64) {
        if generation != self.generation {
            trace!(generation, current = self.generation, "dropping stale tick");
            return;
        }
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        if attempt.session().is_complete() {
            trace!(generation, "dropping tick for completed session");
            return;
        }

        match attempt.session_mut().tick() {
            Ok(outcome) => {
                trace!(time_remaining = outcome.time_remaining, "tick");
                let view = attempt.session().view();
                self.views.send_replace(Some(view));
                if outcome.is_complete {
                    info!("quiz time budget exhausted");
                    self.finish().await;
                }
            }
            Err(err) => warn!(error = %err, "tick rejected"),
        }
    }

    /// Stop the countdown and archive the finished attempt. Archiving is best effort.
    async fn finish(&mut self) {
        self.stop_ticker();
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        if let Err(err) = self.service.archive(attempt).await {
            warn!(error = %err, "failed to archive quiz results");
        }
        let view = attempt.session().view();
        self.views.send_replace(Some(view));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            debug!(generation = self.generation, "stopping countdown");
            ticker.stop();
        }
    }
}

/// Cloneable client for a [`QuizRunner`].
#[derive(Clone)]
pub struct QuizHandle {
    tx: mpsc::Sender<QuizCommand>,
    views: watch::Receiver<Option<SessionView>>,
}

impl QuizHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> QuizCommand,
    ) -> Result<T, QuizServiceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| QuizServiceError::RunnerClosed)?;
        rx.await.map_err(|_| QuizServiceError::RunnerClosed)?
    }

    /// Replace any current session with a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Session` with `EmptyQuestionBank` when no usable
    /// partition exists, or `RunnerClosed` if the runner is gone.
    pub async fn start(&self, difficulty: Difficulty) -> Result<SessionView, QuizServiceError> {
        self.request(|reply| QuizCommand::Start { difficulty, reply })
            .await
    }

    /// # Errors
    ///
    /// Propagates `SessionError` from the engine, or `RunnerClosed`.
    pub async fn submit_answer(&self, option: usize) -> Result<AnswerFeedback, QuizServiceError> {
        self.request(|reply| QuizCommand::Submit { option, reply })
            .await
    }

    /// # Errors
    ///
    /// Propagates `SessionError` from the engine, or `RunnerClosed`.
    pub async fn skip_current(&self) -> Result<usize, QuizServiceError> {
        self.request(|reply| QuizCommand::Skip { reply }).await
    }

    /// Move on; when this completes the session the countdown is stopped and the
    /// attempt archived before the reply is sent.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the engine, or `RunnerClosed`.
    pub async fn advance(&self) -> Result<AdvanceOutcome, QuizServiceError> {
        self.request(|reply| QuizCommand::Advance { reply }).await
    }

    /// # Errors
    ///
    /// Propagates `SessionError` from the engine, or `RunnerClosed`.
    pub async fn go_to_previous(&self) -> Result<usize, QuizServiceError> {
        self.request(|reply| QuizCommand::Previous { reply }).await
    }

    /// # Errors
    ///
    /// Returns `InvalidState` while the session is active, or `RunnerClosed`.
    pub async fn results(&self) -> Result<QuizResults, QuizServiceError> {
        self.request(|reply| QuizCommand::Results { reply }).await
    }

    /// Storage id of the archived attempt, once it has been archived.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no session was started, or `RunnerClosed`.
    pub async fn summary_id(&self) -> Result<Option<QuizSummaryId>, QuizServiceError> {
        self.request(|reply| QuizCommand::SummaryId { reply }).await
    }

    /// Latest published read model.
    #[must_use]
    pub fn snapshot(&self) -> Option<SessionView> {
        self.views.borrow().clone()
    }

    /// Receiver that observes every published read model, including timeouts.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionView>> {
        self.views.clone()
    }
}
