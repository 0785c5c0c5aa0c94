//! Final scoring, verdict, and per-item review.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QuizError;
use crate::model::{Resolution, Verdict, NO_ANSWER};
use crate::session::ExamSession;

/// The scored summary of a finished exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReport {
    /// Session identifier.
    pub id: Uuid,
    /// When the report was produced.
    pub created_at: DateTime<Utc>,
    /// Number of correctly answered items.
    pub score: usize,
    /// Number of items in the session.
    pub total: usize,
    /// Score as a percentage, rounded to two decimals.
    pub percentage: f64,
    /// Threshold the verdict was computed against.
    pub pass_threshold: f64,
    pub verdict: Verdict,
    /// One record per item, in presentation order.
    pub review: Vec<ReviewRecord>,
    /// Mean countdown ticks used per item.
    pub avg_seconds_per_item: f64,
    /// Wall-clock duration of the session in milliseconds.
    pub duration_ms: u64,
}

/// What the user saw and chose for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// 1-based position in the session.
    pub number: usize,
    pub question_text: String,
    pub correct_choice_text: String,
    /// `None` when the item timed out.
    pub user_choice_text: Option<String>,
    pub is_correct: bool,
    pub resolution: Resolution,
    pub seconds_used: u32,
}

impl ReviewRecord {
    /// The user's choice, or "No Answer".
    pub fn user_choice_display(&self) -> &str {
        self.user_choice_text.as_deref().unwrap_or(NO_ANSWER)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `score / total` as a two-decimal percentage; an empty exam scores 0.
pub fn percentage(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(score as f64 / total as f64 * 100.0)
}

pub fn verdict(percentage: f64, pass_threshold: f64) -> Verdict {
    if percentage >= pass_threshold {
        Verdict::Pass
    } else {
        Verdict::Fail
    }
}

impl ExamReport {
    /// Score a finished session.
    pub fn from_session(session: &ExamSession, pass_threshold: f64) -> Result<Self, QuizError> {
        if !session.is_finished() {
            return Err(QuizError::InvalidStateTransition {
                operation: "score",
                state: session.state(),
            });
        }

        let review: Vec<ReviewRecord> = session
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| ReviewRecord {
                number: i + 1,
                question_text: item.text().to_string(),
                correct_choice_text: item
                    .choice_text(item.correct_display())
                    .unwrap_or_default()
                    .to_string(),
                user_choice_text: item
                    .user_answer()
                    .and_then(|d| item.choice_text(d))
                    .map(str::to_string),
                is_correct: item.is_correct(),
                resolution: item.resolution(),
                seconds_used: item.seconds_used(),
            })
            .collect();

        let total = session.len();
        let score = session.score();
        let percentage = percentage(score, total);
        let avg_seconds_per_item = if total == 0 {
            0.0
        } else {
            round2(review.iter().map(|r| f64::from(r.seconds_used)).sum::<f64>() / total as f64)
        };
        let duration_ms = session
            .finished_at()
            .map(|end| (end - session.started_at()).num_milliseconds().max(0) as u64)
            .unwrap_or(0);

        Ok(Self {
            id: session.id(),
            created_at: Utc::now(),
            score,
            total,
            percentage,
            pass_threshold,
            verdict: verdict(percentage, pass_threshold),
            review,
            avg_seconds_per_item,
            duration_ms,
        })
    }

    /// Items the user got wrong or left unanswered.
    pub fn missed(&self) -> impl Iterator<Item = &ReviewRecord> {
        self.review.iter().filter(|r| !r.is_correct)
    }

    /// Write the report as JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}
