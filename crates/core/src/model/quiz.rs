use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::{Question, QuestionDraft, QuestionError};

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An ordered set of multiple-choice questions, with optional prior-attempt
/// state carried from the catalog or the remote collaborator.
///
/// A quiz always has at least one question; `Quiz::new` enforces this so
/// grading never sees a zero denominator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: String,
    questions: Vec<Question>,
    completed: bool,
    score: Option<u8>,
}

impl Quiz {
    /// Create a quiz from validated questions.
    ///
    /// A prior `score` outside 0–100 is clamped rather than rejected;
    /// malformed numeric fields from a collaborator degrade to a bounded
    /// value instead of poisoning downstream arithmetic.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` if the question list is empty.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<Question>,
        completed: bool,
        score: Option<u8>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            questions,
            completed,
            score: score.map(|s| s.min(100)),
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Whether a prior attempt completed this quiz.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Score of the prior attempt, when one was recorded (0–100).
    #[must_use]
    pub fn score(&self) -> Option<u8> {
        self.score
    }
}

//
// ─── QUIZ DRAFT (AUTHORING FORM) ───────────────────────────────────────────────
//

/// Unvalidated authoring-form input for a new quiz.
///
/// Validation runs before any network call so a rejected draft never
/// reaches the collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionDraft>,
}

impl QuizDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            questions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_question(mut self, question: QuestionDraft) -> Self {
        self.questions.push(question);
        self
    }

    /// Check the draft against the authoring rules.
    ///
    /// # Errors
    ///
    /// Returns `QuizDraftError` for a blank title, an empty question set,
    /// or the first question that fails its own validation.
    pub fn validate(&self) -> Result<(), QuizDraftError> {
        if self.title.trim().is_empty() {
            return Err(QuizDraftError::EmptyTitle);
        }

        if self.questions.is_empty() {
            return Err(QuizDraftError::NoQuestions);
        }

        for (index, question) in self.questions.iter().enumerate() {
            // Run the per-question rules without consuming the draft.
            question
                .clone()
                .validate(crate::model::ids::QuestionId::new(format!("q{}", index + 1)))
                .map_err(|source| QuizDraftError::Question { index, source })?;
        }

        Ok(())
    }
}

//
// ─── QUIZ VALIDATION ERRORS ────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("quiz must have at least one question")]
    NoQuestions,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizDraftError {
    #[error("quiz title is empty")]
    EmptyTitle,

    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {index} is invalid: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionId;

    fn build_question(id: &str) -> Question {
        QuestionDraft::new(
            "Which property enables flexbox?",
            vec!["display: flex;".to_string(), "flex: true;".to_string()],
            0,
        )
        .validate(QuestionId::new(id))
        .unwrap()
    }

    #[test]
    fn quiz_requires_questions() {
        let err = Quiz::new(
            QuizId::new("1"),
            "CSS Flexbox Mastery",
            "Master the art of CSS Flexbox layouts",
            Vec::new(),
            false,
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuizError::NoQuestions);
    }

    #[test]
    fn prior_score_is_clamped_to_100() {
        let quiz = Quiz::new(
            QuizId::new("1"),
            "CSS Flexbox Mastery",
            "",
            vec![build_question("q1")],
            true,
            Some(250),
        )
        .unwrap();
        assert_eq!(quiz.score(), Some(100));
    }

    #[test]
    fn question_lookup_by_index() {
        let quiz = Quiz::new(
            QuizId::new("1"),
            "CSS Flexbox Mastery",
            "",
            vec![build_question("q1"), build_question("q2")],
            false,
            None,
        )
        .unwrap();
        assert_eq!(quiz.question_count(), 2);
        assert_eq!(quiz.question(1).unwrap().id(), &QuestionId::new("q2"));
        assert!(quiz.question(2).is_none());
    }

    #[test]
    fn draft_rejects_blank_title() {
        let draft = QuizDraft::new("  ", "desc").with_question(QuestionDraft::new(
            "Q?",
            vec!["a".to_string(), "b".to_string()],
            0,
        ));
        assert_eq!(draft.validate().unwrap_err(), QuizDraftError::EmptyTitle);
    }

    #[test]
    fn draft_rejects_empty_question_set() {
        let draft = QuizDraft::new("Title", "desc");
        assert_eq!(draft.validate().unwrap_err(), QuizDraftError::NoQuestions);
    }

    #[test]
    fn draft_reports_first_invalid_question() {
        let draft = QuizDraft::new("Title", "desc")
            .with_question(QuestionDraft::new(
                "Q1?",
                vec!["a".to_string(), "b".to_string()],
                0,
            ))
            .with_question(QuestionDraft::new(
                "Q2?",
                vec!["a".to_string(), "".to_string()],
                0,
            ));
        let err = draft.validate().unwrap_err();
        assert!(matches!(
            err,
            QuizDraftError::Question {
                index: 1,
                source: QuestionError::EmptyOption { index: 1 }
            }
        ));
    }
}
