//! Core data model types for timedquiz.
//!
//! These are the fundamental types the rest of the system uses to represent
//! questions, session items, and exam settings.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Text shown in a review record when an item has no recorded answer.
pub const NO_ANSWER: &str = "No Answer";

/// A single multiple-choice question as loaded from the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text. May contain newlines.
    pub text: String,
    /// Optional image reference (path or URL) shown with the question.
    #[serde(default)]
    pub image: Option<String>,
    /// Choices in canonical (bank) order.
    pub choices: Vec<String>,
    /// Canonical index of the correct choice.
    pub correct: usize,
}

impl Question {
    /// Text of the correct choice, or `None` when the answer key is out of range.
    pub fn correct_text(&self) -> Option<&str> {
        self.choices.get(self.correct).map(String::as_str)
    }
}

/// How an item was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Still active or not reached yet.
    Pending,
    /// The user picked a choice.
    Answered,
    /// The countdown reached zero first.
    TimedOut,
}

/// A question instance inside one session, with its own shuffled choice order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    pub(crate) question: Question,
    pub(crate) display_order: Vec<usize>,
    pub(crate) correct_display: usize,
    pub(crate) user_answer: Option<usize>,
    pub(crate) resolution: Resolution,
    pub(crate) seconds_used: u32,
}

impl SessionQuestion {
    /// Annotate a copy of `question` with a display order.
    ///
    /// `display_order` must be a permutation of the question's choice indices.
    /// Returns `None` when the correct choice is not among them.
    pub(crate) fn new(question: Question, display_order: Vec<usize>) -> Option<Self> {
        let correct_display = display_order
            .iter()
            .position(|&i| i == question.correct && i < question.choices.len())?;
        Some(Self {
            question,
            display_order,
            correct_display,
            user_answer: None,
            resolution: Resolution::Pending,
            seconds_used: 0,
        })
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn text(&self) -> &str {
        &self.question.text
    }

    pub fn image(&self) -> Option<&str> {
        self.question.image.as_deref()
    }

    /// Canonical choice indices in the order they are shown.
    pub fn display_order(&self) -> &[usize] {
        &self.display_order
    }

    /// Display index of the correct choice.
    pub fn correct_display(&self) -> usize {
        self.correct_display
    }

    /// Display index the user picked, if any.
    pub fn user_answer(&self) -> Option<usize> {
        self.user_answer
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Countdown ticks that elapsed while the item was active.
    pub fn seconds_used(&self) -> u32 {
        self.seconds_used
    }

    pub fn is_correct(&self) -> bool {
        self.user_answer == Some(self.correct_display)
    }

    /// Choice texts in display order.
    pub fn display_choices(&self) -> Vec<&str> {
        self.display_order
            .iter()
            .map(|&i| self.question.choices[i].as_str())
            .collect()
    }

    /// Resolve a display index to its choice text.
    pub fn choice_text(&self, display_index: usize) -> Option<&str> {
        self.display_order
            .get(display_index)
            .map(|&i| self.question.choices[i].as_str())
    }

    pub fn choice_count(&self) -> usize {
        self.display_order.len()
    }
}

/// Pass/fail verdict for a finished exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "Pass"),
            Verdict::Fail => write!(f, "Fail"),
        }
    }
}

/// Timing and scoring knobs for an exam.
#[derive(Debug, Clone)]
pub struct ExamSettings {
    /// Countdown length per item, in ticks.
    pub time_limit: u32,
    /// Wall time of one countdown tick.
    pub tick: Duration,
    /// Pause between a timeout (or answer, if enabled) and the automatic advance.
    pub advance_delay: Duration,
    /// Minimum percentage that counts as a pass.
    pub pass_threshold: f64,
    /// Also auto-advance after a manual answer instead of waiting for input.
    pub auto_advance_after_answer: bool,
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            time_limit: 20,
            tick: Duration::from_secs(1),
            advance_delay: Duration::from_millis(1500),
            pass_threshold: 70.0,
            auto_advance_after_answer: false,
        }
    }
}
