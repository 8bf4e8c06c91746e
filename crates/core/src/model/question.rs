use thiserror::Error;

use crate::model::ids::QuestionId;

/// Minimum number of answer options a multiple-choice question must carry.
pub const MIN_OPTIONS: usize = 2;

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question input, as it arrives from the authoring form or a
/// collaborator payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(text: impl Into<String>, options: Vec<String>, correct_answer: usize) -> Self {
        Self {
            text: text.into(),
            options,
            correct_answer,
        }
    }

    /// Validate the draft and assign its identifier.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, there are fewer than
    /// [`MIN_OPTIONS`] options, any option is blank, or the correct-answer
    /// index does not point at an option.
    pub fn validate(self, id: QuestionId) -> Result<Question, QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        if self.options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                found: self.options.len(),
            });
        }

        if let Some(index) = self.options.iter().position(|opt| opt.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }

        if self.correct_answer >= self.options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: self.correct_answer,
                option_count: self.options.len(),
            });
        }

        Ok(Question {
            id,
            text: self.text,
            options: self.options,
            correct_answer: self.correct_answer,
        })
    }
}

/// A validated multiple-choice question. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Zero-based index of the canonical correct option.
    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Whether the given selection matches the correct option.
    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("question needs at least {MIN_OPTIONS} options, found {found}")]
    TooFewOptions { found: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct answer index {index} is out of range for {option_count} options")]
    CorrectAnswerOutOfRange { index: usize, option_count: usize },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft::new(
            "What does '===' do?",
            vec![
                "Assigns value".to_string(),
                "Compares value only".to_string(),
                "Compares value and type".to_string(),
            ],
            2,
        )
    }

    #[test]
    fn valid_draft_becomes_question() {
        let question = draft().validate(QuestionId::new("q1")).unwrap();
        assert_eq!(question.id(), &QuestionId::new("q1"));
        assert_eq!(question.option_count(), 3);
        assert_eq!(question.correct_answer(), 2);
        assert!(question.is_correct(2));
        assert!(!question.is_correct(0));
    }

    #[test]
    fn blank_text_rejected() {
        let mut d = draft();
        d.text = "   ".to_string();
        let err = d.validate(QuestionId::new("q1")).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn single_option_rejected() {
        let mut d = draft();
        d.options.truncate(1);
        d.correct_answer = 0;
        let err = d.validate(QuestionId::new("q1")).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { found: 1 });
    }

    #[test]
    fn blank_option_rejected() {
        let mut d = draft();
        d.options[1] = " ".to_string();
        let err = d.validate(QuestionId::new("q1")).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 1 });
    }

    #[test]
    fn correct_index_must_point_at_an_option() {
        let mut d = draft();
        d.correct_answer = 3;
        let err = d.validate(QuestionId::new("q1")).unwrap_err();
        assert!(matches!(
            err,
            QuestionError::CorrectAnswerOutOfRange {
                index: 3,
                option_count: 3
            }
        ));
    }
}
