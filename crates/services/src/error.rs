//! Shared error types for the services crate.

use thiserror::Error;

use catalog::CatalogError;
use course_core::model::{AnswerSheetError, QuizDraftError};

/// Errors emitted by `QuizApiService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizApiError {
    #[error("quiz api request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error("quiz api returned a malformed body: {0}")]
    MalformedBody(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl QuizApiError {
    /// Whether the server reported the requested resource as missing.
    ///
    /// Lets callers render a missing quiz differently from a transient
    /// failure (timeout, 5xx, malformed body) without naming HTTP types.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status(status) if *status == reqwest::StatusCode::NOT_FOUND)
    }
}

/// Errors emitted by a quiz-taking session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("quiz session is already completed")]
    AlreadyCompleted,
    #[error("quiz session is not completed")]
    NotCompleted,
    #[error("a grading submission is already in flight")]
    SubmissionInFlight,
    #[error("not ready for grading: {answered} of {total} questions answered")]
    NotReadyForGrading { answered: usize, total: usize },
    #[error("option {selected} is out of range for question {question_index}")]
    OptionOutOfRange { question_index: usize, selected: usize },
    #[error(transparent)]
    Answers(#[from] AnswerSheetError),
}

/// Errors emitted by `AuthoringService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    #[error(transparent)]
    Draft(#[from] QuizDraftError),
    #[error(transparent)]
    Api(#[from] QuizApiError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors emitted by `QuizFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Api(#[from] QuizApiError),
    #[error(transparent)]
    Session(#[from] QuizSessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_404_status_counts_as_not_found() {
        assert!(QuizApiError::Status(reqwest::StatusCode::NOT_FOUND).is_not_found());
        assert!(!QuizApiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).is_not_found());
        assert!(!QuizApiError::Status(reqwest::StatusCode::UNAUTHORIZED).is_not_found());
        assert!(!QuizApiError::MalformedBody("truncated".to_string()).is_not_found());
    }
}
