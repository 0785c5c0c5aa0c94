//! Session randomizer: question selection and per-item choice shuffling.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::QuestionBank;
use crate::error::{Notice, QuizError};
use crate::model::SessionQuestion;

/// Items drawn for one session.
#[derive(Debug, Clone)]
pub struct Selection {
    pub items: Vec<SessionQuestion>,
    pub notice: Option<Notice>,
}

/// Draw `min(requested, bank.len())` distinct questions in uniformly random
/// order and give each an independently shuffled display order.
///
/// The bank itself is left untouched; every item owns a copy of its question.
pub fn select<R: Rng + ?Sized>(
    bank: &QuestionBank,
    requested: usize,
    rng: &mut R,
) -> Result<Selection, QuizError> {
    if bank.is_empty() {
        return Err(QuizError::NoQuestionsAvailable);
    }

    let available = bank.len();
    let notice = (requested > available).then(|| {
        tracing::warn!(requested, available, "requested more questions than available");
        Notice::InsufficientQuestions {
            requested,
            available,
        }
    });

    let mut order: Vec<usize> = (0..available).collect();
    order.shuffle(rng);
    order.truncate(requested.min(available));

    let items = order
        .into_iter()
        .map(|i| {
            let question = bank.questions()[i].clone();
            let (correct, choices) = (question.correct, question.choices.len());
            let display_order = shuffled_indices(choices, rng);
            SessionQuestion::new(question, display_order).ok_or(QuizError::InvalidAnswerKey {
                question: i + 1,
                correct,
                choices,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Selection { items, notice })
}

/// A uniformly random permutation of `0..len`.
pub fn shuffled_indices<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn bank(n: usize) -> QuestionBank {
        QuestionBank::new(
            (0..n)
                .map(|i| Question {
                    text: format!("Question {i}"),
                    image: None,
                    choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct: i % 4,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn empty_bank_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = select(&bank(0), 3, &mut rng).unwrap_err();
        assert!(matches!(err, QuizError::NoQuestionsAvailable));
    }

    #[test]
    fn oversized_request_is_clamped_with_notice() {
        let mut rng = StdRng::seed_from_u64(2);
        let selection = select(&bank(5), 10, &mut rng).unwrap();
        assert_eq!(selection.items.len(), 5);
        assert_eq!(
            selection.notice,
            Some(Notice::InsufficientQuestions {
                requested: 10,
                available: 5
            })
        );
    }

    #[test]
    fn exact_request_has_no_notice() {
        let mut rng = StdRng::seed_from_u64(3);
        let selection = select(&bank(5), 5, &mut rng).unwrap();
        assert_eq!(selection.items.len(), 5);
        assert!(selection.notice.is_none());
    }

    #[test]
    fn selected_questions_are_distinct() {
        let mut rng = StdRng::seed_from_u64(4);
        let selection = select(&bank(30), 12, &mut rng).unwrap();
        let texts: HashSet<_> = selection.items.iter().map(|i| i.text().to_string()).collect();
        assert_eq!(texts.len(), 12);
    }

    #[test]
    fn display_order_is_permutation_and_maps_correct_choice() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = select(&bank(8), 8, &mut rng).unwrap();
            for item in &selection.items {
                let mut sorted = item.display_order().to_vec();
                sorted.sort_unstable();
                assert_eq!(sorted, vec![0, 1, 2, 3]);
                assert_eq!(
                    item.display_order()[item.correct_display()],
                    item.question().correct
                );
            }
        }
    }

    #[test]
    fn bank_is_not_mutated() {
        let original = bank(6);
        let snapshot = original.questions().to_vec();
        let mut rng = StdRng::seed_from_u64(5);
        let _ = select(&original, 6, &mut rng).unwrap();
        assert_eq!(original.questions(), snapshot.as_slice());
    }

    #[test]
    fn every_question_can_lead() {
        let source = bank(4);
        let mut firsts = HashSet::new();
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..200 {
            let selection = select(&source, 1, &mut rng).unwrap();
            firsts.insert(selection.items[0].text().to_string());
        }
        assert_eq!(firsts.len(), 4);
    }

    #[test]
    fn zero_request_yields_no_items() {
        let mut rng = StdRng::seed_from_u64(7);
        let selection = select(&bank(3), 0, &mut rng).unwrap();
        assert!(selection.items.is_empty());
        assert!(selection.notice.is_none());
    }
}
