//! Orchestrates starting and finishing quiz sessions across the catalog
//! and the quiz API.

use std::sync::Arc;

use tracing::debug;

use catalog::{Catalog, CatalogError};
use course_core::grading::GradingResult;
use course_core::model::{Lesson, LessonId, QuizId};
use course_core::time::Clock;

use crate::error::QuizFlowError;
use crate::quiz_api::{AnalyzeRequest, QuizApiService, SessionToken};
use crate::quiz_session::{QuizOrigin, QuizSession};

/// Starts quiz sessions from whichever source holds the quiz and routes
/// grading through the right path when they finish.
#[derive(Clone)]
pub struct QuizFlowService {
    catalog: Catalog,
    api: Arc<QuizApiService>,
    clock: Clock,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(catalog: Catalog, api: Arc<QuizApiService>, clock: Clock) -> Self {
        Self { catalog, api, clock }
    }

    /// Start a session for a standalone practice quiz.
    ///
    /// The catalog is consulted first; a quiz the catalog does not know is
    /// fetched from the server and graded remotely on completion.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError` when neither source can supply the quiz.
    pub async fn start_practice_quiz(&self, id: &QuizId) -> Result<QuizSession, QuizFlowError> {
        match self.catalog.quizzes.get_quiz(id).await {
            Ok(quiz) => Ok(QuizSession::new(quiz, QuizOrigin::Catalog, self.clock.now())),
            Err(CatalogError::NotFound) => {
                debug!(quiz_id = %id, "quiz not in catalog, fetching from server");
                let quiz = self.api.fetch_quiz(id).await?;
                Ok(QuizSession::new(quiz, QuizOrigin::Server, self.clock.now()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Start a session for the quiz embedded in a lesson.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Catalog` when the lesson is unknown.
    pub async fn start_lesson_quiz(&self, id: &LessonId) -> Result<QuizSession, QuizFlowError> {
        let lesson = self.catalog.lessons.get_lesson(id).await?;
        Ok(QuizSession::new(
            lesson.quiz().clone(),
            QuizOrigin::Catalog,
            self.clock.now(),
        ))
    }

    /// Ask the server to analyze a lesson's video and start a session on
    /// the generated quiz.
    ///
    /// With a token the generated quiz is saved under the caller's
    /// account and graded remotely; without one the server returns an
    /// ephemeral quiz that grades locally.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError` when the lesson is unknown or the analysis
    /// call fails.
    pub async fn analyze_and_start(
        &self,
        id: &LessonId,
        token: Option<&SessionToken>,
    ) -> Result<QuizSession, QuizFlowError> {
        let lesson = self.catalog.lessons.get_lesson(id).await?;
        let request = analyze_request(&lesson, token.is_some());
        let analyzed = self.api.analyze_video(&request, token).await?;
        let origin = analyzed_origin(analyzed.persisted);
        Ok(QuizSession::new(analyzed.quiz, origin, self.clock.now()))
    }

    /// Finish a session, grading it through the API client when its quiz
    /// came from the server.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Session` when the session is not ready.
    pub async fn finalize(
        &self,
        session: &mut QuizSession,
        token: Option<&SessionToken>,
    ) -> Result<GradingResult, QuizFlowError> {
        let result = session
            .finalize(self.api.as_ref(), token, self.clock.now())
            .await?;
        Ok(result)
    }
}

/// Grading route for an analyze-generated quiz: only a server-persisted
/// quiz can be graded remotely; an ephemeral one takes the local path.
fn analyzed_origin(persisted: bool) -> QuizOrigin {
    if persisted {
        QuizOrigin::Server
    } else {
        QuizOrigin::Catalog
    }
}

/// Build the analyze request for a lesson. The post-video analysis text
/// is the richer source when present; the catalog description stands in
/// otherwise, matching what the lesson page sends.
fn analyze_request(lesson: &Lesson, save: bool) -> AnalyzeRequest {
    let description = if lesson.analysis().is_empty() {
        lesson.description()
    } else {
        lesson.analysis()
    };
    AnalyzeRequest {
        title: lesson.title().to_string(),
        description: description.to_string(),
        video_url: lesson.video_url().to_string(),
        save,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::sample_catalog;
    use course_core::model::{QuestionDraft, QuestionId, Quiz};
    use course_core::time::{fixed_clock, fixed_now};
    use url::Url;

    fn build_service() -> QuizFlowService {
        let api = QuizApiService::new(crate::quiz_api::QuizApiConfig::new(
            "http://127.0.0.1:9",
        ))
        .unwrap();
        QuizFlowService::new(sample_catalog().unwrap(), Arc::new(api), fixed_clock())
    }

    #[tokio::test]
    async fn catalog_quiz_starts_a_catalog_session() {
        let service = build_service();
        let session = service.start_practice_quiz(&QuizId::new("2")).await.unwrap();

        assert_eq!(session.origin(), QuizOrigin::Catalog);
        assert_eq!(session.quiz().title(), "React Hooks Basics");
        assert_eq!(session.started_at(), fixed_now());
    }

    #[tokio::test]
    async fn unknown_quiz_surfaces_the_server_error() {
        // The API base points at an unroutable port, so the server lookup
        // that follows the catalog miss fails with a transport error.
        let service = build_service();
        let err = service
            .start_practice_quiz(&QuizId::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizFlowError::Api(_)));
    }

    #[tokio::test]
    async fn lesson_quiz_session_uses_the_embedded_quiz() {
        let service = build_service();
        let session = service.start_lesson_quiz(&LessonId::new("1")).await.unwrap();

        assert_eq!(session.origin(), QuizOrigin::Catalog);
        assert_eq!(session.quiz().id().as_str(), "1");
    }

    #[tokio::test]
    async fn unknown_lesson_is_a_catalog_error() {
        let service = build_service();
        let err = service
            .start_lesson_quiz(&LessonId::new("99"))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizFlowError::Catalog(CatalogError::NotFound)));
    }

    fn build_lesson(analysis: &str) -> Lesson {
        let question = QuestionDraft::new(
            "Q?",
            vec!["a".to_string(), "b".to_string()],
            0,
        )
        .validate(QuestionId::new("q1"))
        .unwrap();
        let quiz = Quiz::new(QuizId::new("9"), "Embedded", "", vec![question], false, None)
            .unwrap();
        Lesson::new(
            LessonId::new("9"),
            "Rust Ownership",
            "Moves, borrows, and lifetimes",
            Url::parse("https://youtu.be/abc123").unwrap(),
            "12:00",
            analysis,
            quiz,
            false,
            None,
        )
    }

    #[test]
    fn analyze_request_prefers_the_analysis_text() {
        let lesson = build_lesson("Covered ownership and the borrow checker.");
        let request = analyze_request(&lesson, true);

        assert_eq!(request.title, "Rust Ownership");
        assert_eq!(request.description, "Covered ownership and the borrow checker.");
        assert_eq!(request.video_url, "https://youtu.be/abc123");
        assert!(request.save);
    }

    #[test]
    fn analyze_request_falls_back_to_the_description() {
        let lesson = build_lesson("");
        let request = analyze_request(&lesson, false);

        assert_eq!(request.description, "Moves, borrows, and lifetimes");
        assert!(!request.save);
    }

    #[test]
    fn unsaved_analyzed_quiz_is_graded_locally() {
        assert_eq!(analyzed_origin(false), QuizOrigin::Catalog);
        assert_eq!(analyzed_origin(true), QuizOrigin::Server);
    }

    #[tokio::test]
    async fn analyze_for_unknown_lesson_is_a_catalog_error() {
        let service = build_service();
        let err = service
            .analyze_and_start(&LessonId::new("99"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizFlowError::Catalog(CatalogError::NotFound)));
    }

    #[tokio::test]
    async fn failed_analysis_surfaces_as_an_api_error() {
        // Lesson "1" exists, so the failure comes from the analyze call
        // against the unroutable API, not the catalog lookup.
        let service = build_service();
        let err = service
            .analyze_and_start(&LessonId::new("1"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizFlowError::Api(_)));
    }

    #[tokio::test]
    async fn lesson_session_grades_locally_through_the_flow() {
        let service = build_service();
        let mut session = service.start_lesson_quiz(&LessonId::new("3")).await.unwrap();

        // "3" is CSS Flexbox Mastery: correct answers are 0 then 1.
        session.select_answer(0).unwrap();
        session.select_answer(1).unwrap();

        let result = service.finalize(&mut session, None).await.unwrap();
        assert_eq!(result.score, 100);
        assert!(session.is_completed());
    }
}
