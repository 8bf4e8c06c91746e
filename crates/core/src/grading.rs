use crate::model::{AnswerSheet, Quiz};

//
// ─── GRADING RESULT ────────────────────────────────────────────────────────────
//

/// Per-question outcome of a graded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingDetail {
    pub question_index: usize,
    pub selected: Option<usize>,
    pub correct_answer: usize,
    pub is_correct: bool,
}

/// The computed outcome of a completed quiz attempt.
///
/// `score` is the rounded percentage `round(correct / total * 100)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingResult {
    pub score: u8,
    pub correct: usize,
    pub total: usize,
    pub details: Vec<GradingDetail>,
}

//
// ─── LOCAL GRADING ─────────────────────────────────────────────────────────────
//

/// Grade an answer sheet against a quiz.
///
/// Pure and deterministic: the same quiz and sheet always produce the same
/// result. An unanswered slot grades as incorrect. The quiz is non-empty by
/// construction, so the percentage denominator is never zero.
#[must_use]
pub fn grade(quiz: &Quiz, answers: &AnswerSheet) -> GradingResult {
    let details: Vec<GradingDetail> = quiz
        .questions()
        .iter()
        .enumerate()
        .map(|(question_index, question)| {
            let selected = answers.selected(question_index);
            GradingDetail {
                question_index,
                selected,
                correct_answer: question.correct_answer(),
                is_correct: selected.is_some_and(|choice| question.is_correct(choice)),
            }
        })
        .collect();

    let correct = details.iter().filter(|detail| detail.is_correct).count();
    let total = quiz.question_count();

    GradingResult {
        score: score_percentage(correct, total),
        correct,
        total,
        details,
    }
}

/// Rounded percentage for `correct` out of `total`.
///
/// `total` is at least 1 for any constructed quiz; a zero total still
/// degrades to 0 rather than dividing.
#[must_use]
pub fn score_percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }

    // Counts are bounded by the question list, far below f64 precision loss.
    #[allow(clippy::cast_precision_loss)]
    let ratio = correct as f64 / total as f64;

    // The rounded value is in 0..=100 by construction.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (ratio * 100.0).round() as u8
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionDraft, QuestionId, QuizId};

    /// Quiz with one question per entry in `correct_answers`, each with
    /// four options.
    fn build_quiz(correct_answers: &[usize]) -> Quiz {
        let questions = correct_answers
            .iter()
            .enumerate()
            .map(|(i, &correct)| {
                QuestionDraft::new(
                    format!("Question {}", i + 1),
                    vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()],
                    correct,
                )
                .validate(QuestionId::new(format!("q{}", i + 1)))
                .unwrap()
            })
            .collect();
        Quiz::new(QuizId::new("1"), "Test", "", questions, false, None).unwrap()
    }

    fn sheet_with(selections: &[usize]) -> AnswerSheet {
        let mut sheet = AnswerSheet::new(selections.len());
        for (i, &choice) in selections.iter().enumerate() {
            sheet.select(i, choice).unwrap();
        }
        sheet
    }

    #[test]
    fn all_correct_scores_100() {
        let quiz = build_quiz(&[0, 2, 1]);
        let result = grade(&quiz, &sheet_with(&[0, 2, 1]));
        assert_eq!(result.score, 100);
        assert_eq!(result.correct, 3);
        assert_eq!(result.total, 3);
        assert!(result.details.iter().all(|d| d.is_correct));
    }

    #[test]
    fn two_of_three_rounds_to_67() {
        let quiz = build_quiz(&[0, 2, 1]);
        let result = grade(&quiz, &sheet_with(&[0, 1, 1]));
        assert_eq!(result.score, 67);
        assert_eq!(result.correct, 2);
        assert!(!result.details[1].is_correct);
        assert_eq!(result.details[1].selected, Some(1));
        assert_eq!(result.details[1].correct_answer, 2);
    }

    #[test]
    fn unanswered_question_grades_as_incorrect() {
        let quiz = build_quiz(&[0, 1]);
        let mut sheet = AnswerSheet::new(2);
        sheet.select(0, 0).unwrap();

        let result = grade(&quiz, &sheet);
        assert_eq!(result.correct, 1);
        assert_eq!(result.score, 50);
        assert_eq!(result.details[1].selected, None);
        assert!(!result.details[1].is_correct);
    }

    #[test]
    fn grading_is_idempotent() {
        let quiz = build_quiz(&[3, 0, 2, 1]);
        let sheet = sheet_with(&[3, 1, 2, 0]);
        assert_eq!(grade(&quiz, &sheet), grade(&quiz, &sheet));
    }

    #[test]
    fn score_percentage_guards_zero_total() {
        assert_eq!(score_percentage(0, 0), 0);
        assert_eq!(score_percentage(1, 3), 33);
        assert_eq!(score_percentage(2, 3), 67);
    }
}
