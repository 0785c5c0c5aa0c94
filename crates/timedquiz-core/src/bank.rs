//! JSON question bank parser.
//!
//! Parses the bank format, rejects records whose answer key cannot be
//! resolved, and reports softer issues as validation warnings.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::QuizError;
use crate::model::Question;
use crate::traits::QuestionSource;

/// On-disk record shape.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    #[serde(default)]
    image: Option<String>,
    answers: Vec<String>,
    correct: i64,
}

/// The canonical, immutable set of questions an exam draws from.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Arc<[Question]>,
}

impl QuestionBank {
    /// Build a bank, rejecting any question whose correct index is not one of
    /// its choices.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if let Some((n, q)) = questions
            .iter()
            .enumerate()
            .find(|(_, q)| q.correct >= q.choices.len())
        {
            return Err(QuizError::InvalidAnswerKey {
                question: n + 1,
                correct: q.correct,
                choices: q.choices.len(),
            });
        }

        Ok(Self {
            questions: questions.into(),
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Parse a bank file from disk.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, &path.display().to_string())
}

/// Parse bank JSON. `origin` only labels error messages.
pub fn parse_bank_str(content: &str, origin: &str) -> Result<QuestionBank> {
    let raw: Vec<RawQuestion> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse question bank JSON: {origin}"))?;

    let questions = raw
        .into_iter()
        .enumerate()
        .map(|(n, q)| {
            let correct = usize::try_from(q.correct)
                .ok()
                .filter(|&c| c < q.answers.len())
                .with_context(|| {
                    format!(
                        "question {} in {origin}: correct index {} outside {} answers",
                        n + 1,
                        q.correct,
                        q.answers.len()
                    )
                })?;
            Ok(Question {
                text: q.question,
                image: q.image.filter(|i| !i.trim().is_empty()),
                choices: q.answers,
                correct,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    QuestionBank::new(questions).with_context(|| format!("invalid question bank: {origin}"))
}

/// Fetch a bank from `source` for a new exam.
///
/// Any failure becomes [`QuizError::LoadFailure`]; an empty bank becomes
/// [`QuizError::NoQuestionsAvailable`].
pub async fn load_from(source: &dyn QuestionSource) -> Result<QuestionBank, QuizError> {
    let bank = source.load().await.map_err(|e| {
        tracing::error!("failed to load questions from {}: {e:#}", source.location());
        QuizError::LoadFailure(format!("{e:#}"))
    })?;

    if bank.is_empty() {
        return Err(QuizError::NoQuestionsAvailable);
    }

    tracing::info!("loaded {} questions from {}", bank.len(), source.location());
    Ok(bank)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// 1-based question number (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Check a parsed bank for issues that do not prevent an exam from running.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "bank contains no questions".into(),
        });
    }

    let mut seen_text = std::collections::HashSet::new();
    for (n, q) in bank.questions().iter().enumerate() {
        let number = Some(n + 1);

        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: number,
                message: "question text is empty".into(),
            });
        } else if !seen_text.insert(q.text.trim()) {
            warnings.push(ValidationWarning {
                question: number,
                message: format!("duplicate question: {}", q.text.trim()),
            });
        }

        if q.choices.len() < 2 {
            warnings.push(ValidationWarning {
                question: number,
                message: format!("only {} answer choice(s)", q.choices.len()),
            });
        }

        let mut seen_choices = std::collections::HashSet::new();
        for choice in &q.choices {
            if !seen_choices.insert(choice.trim()) {
                warnings.push(ValidationWarning {
                    question: number,
                    message: format!("duplicate answer choice: {}", choice.trim()),
                });
            }
        }
    }

    warnings
}
