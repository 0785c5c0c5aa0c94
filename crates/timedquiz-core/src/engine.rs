//! Exam engine: the event loop around one session.
//!
//! The loop owns the [`ExamSession`] and the [`CountdownTimer`]. User input and
//! timer messages are handled one at a time, so every state change happens on
//! this loop and nowhere else.

use rand::Rng;
use tokio::sync::mpsc;

use crate::bank::QuestionBank;
use crate::error::QuizError;
use crate::model::ExamSettings;
use crate::report::ExamReport;
use crate::session::{Advance, AdvanceTicket, ExamSession, Expiry, SessionState, Submission};
use crate::timer::{CountdownTimer, TimerEvent};
use crate::traits::Presenter;

/// Inbound user events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamInput {
    /// The user picked the choice at this display index.
    Answer(usize),
    /// The user asked for the next item.
    Advance,
    /// The user abandoned the exam to start over.
    Restart,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum ExamOutcome {
    /// Every item was processed and scored.
    Finished(ExamReport),
    /// The user restarted mid-exam; nothing was scored.
    Restarted { answered: usize },
    /// The input channel closed mid-exam.
    Closed { answered: usize },
}

/// Drives sessions with the configured timing.
pub struct ExamEngine {
    settings: ExamSettings,
}

impl ExamEngine {
    pub fn new(settings: ExamSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExamSettings {
        &self.settings
    }

    /// Create a session of up to `requested` items and show any clamping notice.
    pub fn start<R: Rng + ?Sized>(
        &self,
        bank: &QuestionBank,
        requested: usize,
        rng: &mut R,
        presenter: &dyn Presenter,
    ) -> Result<ExamSession, QuizError> {
        let (session, notice) = ExamSession::start(bank, requested, rng)?;
        if let Some(notice) = notice {
            presenter.render_notice(&notice);
        }
        Ok(session)
    }

    /// Run `session` until it finishes, is restarted, or input closes.
    pub async fn run(
        &self,
        mut session: ExamSession,
        presenter: &dyn Presenter,
        inputs: &mut mpsc::Receiver<ExamInput>,
    ) -> ExamOutcome {
        let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
        let mut timer = CountdownTimer::new(timer_tx);

        self.enter_item(&session, &mut timer, presenter);

        while !session.is_finished() {
            tokio::select! {
                Some(event) = timer_rx.recv() => {
                    self.on_timer(event, &mut session, &mut timer, presenter);
                }
                input = inputs.recv() => match input {
                    Some(ExamInput::Restart) => {
                        timer.cancel_all();
                        tracing::info!(session = %session.id(), "exam restarted");
                        return ExamOutcome::Restarted { answered: answered(&session) };
                    }
                    Some(input) => self.on_input(input, &mut session, &mut timer, presenter),
                    None => {
                        timer.cancel_all();
                        tracing::info!(session = %session.id(), "input closed, exam abandoned");
                        return ExamOutcome::Closed { answered: answered(&session) };
                    }
                },
            }
        }

        timer.cancel_all();
        match ExamReport::from_session(&session, self.settings.pass_threshold) {
            Ok(report) => {
                tracing::info!(
                    session = %session.id(),
                    score = report.score,
                    total = report.total,
                    "exam finished: {:.2}% {}",
                    report.percentage,
                    report.verdict
                );
                presenter.render_result(&report);
                ExamOutcome::Finished(report)
            }
            Err(e) => {
                contract_violation(&e);
                ExamOutcome::Closed {
                    answered: answered(&session),
                }
            }
        }
    }

    fn enter_item(&self, session: &ExamSession, timer: &mut CountdownTimer, presenter: &dyn Presenter) {
        let (Some(token), Some(item)) = (session.active_token(), session.current_item()) else {
            return;
        };
        presenter.render_question(item, session.current_index() + 1, session.len());
        presenter.render_choices(&item.display_choices());
        presenter.render_timer(self.settings.time_limit);
        timer.start(token, self.settings.time_limit, self.settings.tick);
    }

    fn on_timer(
        &self,
        event: TimerEvent,
        session: &mut ExamSession,
        timer: &mut CountdownTimer,
        presenter: &dyn Presenter,
    ) {
        match event {
            TimerEvent::Tick { token, remaining } => {
                if session.record_tick(token) {
                    presenter.render_timer(remaining);
                }
            }
            TimerEvent::Expired { token } => {
                if session.record_tick(token) {
                    presenter.render_timer(0);
                }
                match session.time_expire(token) {
                    Expiry::Expired(ticket) => {
                        timer.stop();
                        if let Some(item) = session.current_item() {
                            presenter.render_locked(item);
                        }
                        timer.schedule_advance(ticket, self.settings.advance_delay);
                    }
                    Expiry::Stale => {}
                }
            }
            TimerEvent::AutoAdvance { ticket } => self.advance(ticket, session, timer, presenter),
        }
    }

    fn on_input(
        &self,
        input: ExamInput,
        session: &mut ExamSession,
        timer: &mut CountdownTimer,
        presenter: &dyn Presenter,
    ) {
        match input {
            ExamInput::Answer(display_index) => {
                if session.state() != SessionState::InProgress {
                    tracing::debug!(display_index, state = %session.state(), "answer ignored");
                    return;
                }
                let choices = session.current_item().map_or(0, |item| item.choice_count());
                if display_index >= choices {
                    tracing::debug!(display_index, choices, "answer out of range ignored");
                    return;
                }

                match session.submit_answer(display_index) {
                    Ok(Submission::Recorded { ticket, .. }) => {
                        timer.stop();
                        if let Some(item) = session.current_item() {
                            presenter.render_locked(item);
                        }
                        if self.settings.auto_advance_after_answer {
                            timer.schedule_advance(ticket, self.settings.advance_delay);
                        }
                    }
                    Ok(Submission::AlreadyLocked) => {}
                    Err(e) => contract_violation(&e),
                }
            }
            ExamInput::Advance => match session.pending_advance() {
                Some(ticket) => self.advance(ticket, session, timer, presenter),
                None => tracing::debug!(state = %session.state(), "advance ignored"),
            },
            ExamInput::Restart => {}
        }
    }

    fn advance(
        &self,
        ticket: AdvanceTicket,
        session: &mut ExamSession,
        timer: &mut CountdownTimer,
        presenter: &dyn Presenter,
    ) {
        match session.advance(ticket) {
            Advance::Next(_) => self.enter_item(session, timer, presenter),
            Advance::Finished => timer.cancel_all(),
            Advance::Suppressed => {}
        }
    }
}

fn answered(session: &ExamSession) -> usize {
    session
        .items()
        .iter()
        .filter(|item| item.user_answer().is_some())
        .count()
}

/// A session rejected a call the engine should never have made.
fn contract_violation(error: &QuizError) {
    tracing::error!("session contract violated: {error}");
    if cfg!(debug_assertions) {
        panic!("session contract violated: {error}");
    }
}
