//! Boundary traits for question sources and presentation.
//!
//! Sources are implemented by the `timedquiz-bank` crate; presenters by
//! whatever front end drives the engine (the terminal UI in `timedquiz-cli`).

use async_trait::async_trait;

use crate::bank::QuestionBank;
use crate::error::Notice;
use crate::model::SessionQuestion;
use crate::report::ExamReport;

// ---------------------------------------------------------------------------
// Question source trait
// ---------------------------------------------------------------------------

/// Somewhere a question bank can be fetched from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable location (path or URL) for messages.
    fn location(&self) -> &str;

    /// Fetch and parse the bank. Called once per exam start, never retried.
    async fn load(&self) -> anyhow::Result<QuestionBank>;
}

// ---------------------------------------------------------------------------
// Presenter trait
// ---------------------------------------------------------------------------

/// Everything the engine shows. Implementations must not call back into the
/// engine; user choices arrive through the engine's input channel instead.
pub trait Presenter: Send + Sync {
    /// A non-blocking notice, e.g. a clamped question count.
    fn render_notice(&self, notice: &Notice);

    /// A newly active item. `position` is 1-based.
    fn render_question(&self, item: &SessionQuestion, position: usize, total: usize);

    /// The selectable choices of the active item, in display order.
    fn render_choices(&self, choices: &[&str]);

    /// Seconds left on the active item's countdown.
    fn render_timer(&self, remaining: u32);

    /// The active item was answered or timed out and no longer accepts input.
    fn render_locked(&self, item: &SessionQuestion);

    /// The scored summary with per-item review.
    fn render_result(&self, report: &ExamReport);
}

/// Presenter that shows nothing.
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn render_notice(&self, _: &Notice) {}
    fn render_question(&self, _: &SessionQuestion, _: usize, _: usize) {}
    fn render_choices(&self, _: &[&str]) {}
    fn render_timer(&self, _: u32) {}
    fn render_locked(&self, _: &SessionQuestion) {}
    fn render_result(&self, _: &ExamReport) {}
}
