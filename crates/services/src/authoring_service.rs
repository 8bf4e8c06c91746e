//! Creating and listing caller-authored quizzes.

use std::sync::Arc;

use tracing::debug;

use course_core::model::{Quiz, QuizDraft};

use crate::error::AuthoringError;
use crate::quiz_api::{QuizApiService, SessionToken};

/// Turns locally assembled drafts into server-backed quizzes.
#[derive(Clone)]
pub struct AuthoringService {
    api: Arc<QuizApiService>,
}

impl AuthoringService {
    #[must_use]
    pub fn new(api: Arc<QuizApiService>) -> Self {
        Self { api }
    }

    /// Validate a draft and send it to the server for creation.
    ///
    /// Validation runs before any network traffic, so a malformed draft
    /// never leaves the process.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Draft` for an invalid draft and
    /// `AuthoringError::Api` when the creation call fails.
    pub async fn create_quiz(
        &self,
        draft: &QuizDraft,
        token: Option<&SessionToken>,
    ) -> Result<Quiz, AuthoringError> {
        draft.validate()?;
        debug!(title = %draft.title, "creating quiz");
        let quiz = self.api.generate_quiz(draft, token).await?;
        Ok(quiz)
    }

    /// List the quizzes saved under the caller's account.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Api` when the listing call fails.
    pub async fn list_saved(&self, token: &SessionToken) -> Result<Vec<Quiz>, AuthoringError> {
        let quizzes = self.api.list_quizzes(token).await?;
        Ok(quizzes)
    }
}
