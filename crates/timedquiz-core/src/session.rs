//! Exam session state machine.
//!
//! An [`ExamSession`] owns its items and walks them strictly in order:
//!
//! ```text
//! InProgress --submit_answer / time_expire--> AwaitingAdvance --advance--> InProgress
//!                                                            \--advance--> Finished
//! ```
//!
//! Timer messages carry an [`ItemToken`] and advances need an
//! [`AdvanceTicket`]. Both name the item they were issued for, so a message
//! that outlived its item is recognised and dropped instead of acting on the
//! next one.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::error::{Notice, QuizError};
use crate::model::{Resolution, SessionQuestion};
use crate::randomizer;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// An item is active, its countdown is running, no answer yet.
    InProgress,
    /// The active item is locked; waiting for the advance.
    AwaitingAdvance,
    /// Every item has been processed.
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::InProgress => write!(f, "in progress"),
            SessionState::AwaitingAdvance => write!(f, "awaiting advance"),
            SessionState::Finished => write!(f, "finished"),
        }
    }
}

/// Identifies the item that was active when a timer was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemToken {
    index: usize,
}

/// Permission to leave a locked item. At most one is outstanding per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    index: usize,
}

/// Outcome of [`ExamSession::submit_answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The answer was recorded and the item locked.
    Recorded { correct: bool, ticket: AdvanceTicket },
    /// The item was already locked; nothing changed.
    AlreadyLocked,
}

/// Outcome of [`ExamSession::time_expire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The active item timed out and is now locked.
    Expired(AdvanceTicket),
    /// The token no longer matches an active item.
    Stale,
}

/// Outcome of [`ExamSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The next item is active.
    Next(ItemToken),
    /// That was the last item.
    Finished,
    /// The ticket was already used or belongs to an earlier item.
    Suppressed,
}

/// One run of the quiz from first item to final score.
#[derive(Debug, Clone)]
pub struct ExamSession {
    id: Uuid,
    items: Vec<SessionQuestion>,
    current: usize,
    score: usize,
    state: SessionState,
    pending_advance: Option<AdvanceTicket>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl ExamSession {
    /// Draw `requested` questions from `bank` and activate the first one.
    ///
    /// Returns the clamping notice alongside the session when the bank holds
    /// fewer questions than requested.
    pub fn start<R: Rng + ?Sized>(
        bank: &QuestionBank,
        requested: usize,
        rng: &mut R,
    ) -> Result<(Self, Option<Notice>), QuizError> {
        let selection = randomizer::select(bank, requested, rng)?;
        Ok((Self::from_items(selection.items), selection.notice))
    }

    /// Build a session over already-annotated items.
    pub fn from_items(items: Vec<SessionQuestion>) -> Self {
        let now = Utc::now();
        let state = if items.is_empty() {
            SessionState::Finished
        } else {
            SessionState::InProgress
        };
        let session = Self {
            id: Uuid::new_v4(),
            items,
            current: 0,
            score: 0,
            state,
            pending_advance: None,
            started_at: now,
            finished_at: (state == SessionState::Finished).then_some(now),
        };
        tracing::debug!(session = %session.id, items = session.items.len(), "session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// Zero-based index of the active item; equals `len()` once finished.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[SessionQuestion] {
        &self.items
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// The item at the current position, unless finished.
    pub fn current_item(&self) -> Option<&SessionQuestion> {
        self.items.get(self.current)
    }

    /// Token for the active item while its countdown should be running.
    pub fn active_token(&self) -> Option<ItemToken> {
        (self.state == SessionState::InProgress).then_some(ItemToken {
            index: self.current,
        })
    }

    /// The outstanding advance ticket, if the active item is locked.
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        self.pending_advance
    }

    /// Count one elapsed countdown tick against the active item.
    ///
    /// Returns `false` and changes nothing when `token` is stale.
    pub fn record_tick(&mut self, token: ItemToken) -> bool {
        if self.active_token() != Some(token) {
            return false;
        }
        self.items[self.current].seconds_used += 1;
        true
    }

    /// Record the user's choice for the active item.
    pub fn submit_answer(&mut self, display_index: usize) -> Result<Submission, QuizError> {
        match self.state {
            SessionState::InProgress => {}
            SessionState::AwaitingAdvance => return Ok(Submission::AlreadyLocked),
            SessionState::Finished => {
                return Err(QuizError::InvalidStateTransition {
                    operation: "submit_answer",
                    state: self.state,
                })
            }
        }

        let item = &mut self.items[self.current];
        if display_index >= item.choice_count() {
            return Err(QuizError::ChoiceOutOfRange {
                index: display_index,
                choices: item.choice_count(),
            });
        }

        debug_assert!(item.user_answer.is_none(), "answer written twice");
        item.user_answer = Some(display_index);
        item.resolution = Resolution::Answered;
        let correct = item.is_correct();
        if correct {
            self.score += 1;
        }

        let ticket = self.lock();
        tracing::debug!(
            session = %self.id,
            item = self.current,
            display_index,
            correct,
            "answer recorded"
        );
        Ok(Submission::Recorded { correct, ticket })
    }

    /// Mark the item named by `token` as timed out.
    pub fn time_expire(&mut self, token: ItemToken) -> Expiry {
        if self.active_token() != Some(token) {
            tracing::debug!(session = %self.id, item = token.index, "stale expiry ignored");
            return Expiry::Stale;
        }

        self.items[self.current].resolution = Resolution::TimedOut;
        let ticket = self.lock();
        tracing::debug!(session = %self.id, item = self.current, "time expired");
        Expiry::Expired(ticket)
    }

    /// Leave the locked item. Only the first use of a ticket has any effect.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> Advance {
        if self.pending_advance != Some(ticket) {
            tracing::debug!(session = %self.id, item = ticket.index, "advance suppressed");
            return Advance::Suppressed;
        }
        self.pending_advance = None;
        self.current += 1;

        if self.current < self.items.len() {
            self.state = SessionState::InProgress;
            tracing::debug!(session = %self.id, item = self.current, "advanced");
            Advance::Next(ItemToken {
                index: self.current,
            })
        } else {
            self.state = SessionState::Finished;
            self.finished_at = Some(Utc::now());
            tracing::debug!(session = %self.id, score = self.score, "session finished");
            Advance::Finished
        }
    }

    fn lock(&mut self) -> AdvanceTicket {
        let ticket = AdvanceTicket {
            index: self.current,
        };
        self.state = SessionState::AwaitingAdvance;
        self.pending_advance = Some(ticket);
        ticket
    }
}
