//! In-memory question source for tests and library callers.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use timedquiz_core::bank::QuestionBank;
use timedquiz_core::model::Question;
use timedquiz_core::traits::QuestionSource;

/// Serves the same questions on every load.
pub struct FixedSource {
    questions: Vec<Question>,
    load_count: AtomicU32,
}

impl FixedSource {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            load_count: AtomicU32::new(0),
        }
    }

    /// Get the number of loads served.
    pub fn load_count(&self) -> u32 {
        self.load_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuestionSource for FixedSource {
    fn location(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> anyhow::Result<QuestionBank> {
        self.load_count.fetch_add(1, Ordering::Relaxed);
        Ok(QuestionBank::new(self.questions.clone())?)
    }
}
