use std::env;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use course_core::grading::{GradingDetail, GradingResult};
use course_core::model::{
    Question, QuestionDraft, QuestionId, Quiz, QuizDraft, QuizId,
};

use crate::error::QuizApiError;
use crate::quiz_session::RemoteGrader;

/// Base URL used when `COURSE_API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Bounded wait applied to every collaborator call so grading can fall
/// back locally instead of hanging on an unreachable server.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct QuizApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl QuizApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("COURSE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let timeout = env::var("COURSE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Self { base_url, timeout }
    }
}

/// Bearer credential for authenticated collaborator calls.
///
/// Passed explicitly into each call rather than read from ambient state,
/// so API functions stay pure given their inputs plus the credential.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the token from `COURSE_API_TOKEN`, ignoring blank values.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let token = env::var("COURSE_API_TOKEN").ok()?;
        if token.trim().is_empty() {
            return None;
        }
        Some(Self(token))
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the credential itself.
        write!(f, "SessionToken(…)")
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// HTTP client for the remote quiz collaborator.
///
/// The collaborator's loosely-typed payloads are deserialized into wire
/// DTOs and validated into domain types before anything downstream sees
/// them; malformed bodies are rejected at this boundary.
#[derive(Clone)]
pub struct QuizApiService {
    client: Client,
    config: QuizApiConfig,
}

impl QuizApiService {
    /// Build a client from the given config.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::Http` if the underlying client cannot be built.
    pub fn new(config: QuizApiConfig) -> Result<Self, QuizApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Build a client from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::Http` if the underlying client cannot be built.
    pub fn from_env() -> Result<Self, QuizApiError> {
        Self::new(QuizApiConfig::from_env())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// List the caller's saved quizzes.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failure, non-success status, or
    /// a malformed body.
    pub async fn list_quizzes(&self, token: &SessionToken) -> Result<Vec<Quiz>, QuizApiError> {
        debug!("listing saved quizzes");
        let request = self
            .client
            .get(self.endpoint("/api/quiz"))
            .bearer_auth(token.as_str());
        let body: QuizListBody = send(request).await?;
        body.quizzes.into_iter().map(QuizPayload::into_quiz).collect()
    }

    /// Create and persist a quiz from a validated authoring draft.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failure, non-success status, or
    /// a malformed body.
    pub async fn generate_quiz(
        &self,
        draft: &QuizDraft,
        token: Option<&SessionToken>,
    ) -> Result<Quiz, QuizApiError> {
        debug!(title = %draft.title, questions = draft.questions.len(), "generating quiz");
        let payload = GenerateRequest::from_draft(draft);
        let request = with_token(
            self.client.post(self.endpoint("/api/quiz/generate")),
            token,
        )
        .json(&payload);
        let body: QuizBody = send(request).await?;
        body.quiz.into_quiz()
    }

    /// Fetch a persisted quiz by its server-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failure, non-success status, or
    /// a malformed body.
    pub async fn fetch_quiz(&self, id: &QuizId) -> Result<Quiz, QuizApiError> {
        debug!(quiz_id = %id, "fetching quiz");
        let request = self
            .client
            .get(self.endpoint(&format!("/api/quiz/{id}")));
        let body: QuizBody = send(request).await?;
        body.quiz.into_quiz()
    }

    /// Submit a completed answer list for server-side grading.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failure, non-success status, or
    /// a malformed body. Callers that must always produce a result fall
    /// back to local grading on any of these.
    pub async fn submit_quiz_answers(
        &self,
        id: &QuizId,
        answers: &[usize],
        token: Option<&SessionToken>,
    ) -> Result<GradingResult, QuizApiError> {
        debug!(quiz_id = %id, answers = answers.len(), "submitting answers for grading");
        let request = with_token(
            self.client
                .post(self.endpoint(&format!("/api/quiz/{id}/submit"))),
            token,
        )
        .json(&SubmitRequest { answers });
        let body: GradingBody = send(request).await?;
        Ok(body.into_result())
    }

    /// Analyze a lesson video and generate (optionally persist) a quiz for it.
    ///
    /// Only persisted quizzes carry a server-assigned id; an anonymous
    /// caller gets an ephemeral quiz that is still fully takeable, graded
    /// locally.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failure, non-success status, or
    /// a malformed body.
    pub async fn analyze_video(
        &self,
        request: &AnalyzeRequest,
        token: Option<&SessionToken>,
    ) -> Result<AnalyzedQuiz, QuizApiError> {
        debug!(title = %request.title, "requesting video analysis");
        let builder = with_token(
            self.client.post(self.endpoint("/api/quiz/analyze")),
            token,
        )
        .json(request);
        let body: QuizBody = send(builder).await?;
        let persisted = body.quiz.has_server_id();
        let quiz = body.quiz.into_ephemeral_quiz()?;
        Ok(AnalyzedQuiz { quiz, persisted })
    }
}

/// Outcome of a video analysis.
#[derive(Debug, Clone)]
pub struct AnalyzedQuiz {
    pub quiz: Quiz,
    /// Whether the server saved the quiz under the caller's account.
    /// Unsaved quizzes carry a session-local id and grade locally.
    pub persisted: bool,
}

#[async_trait]
impl RemoteGrader for QuizApiService {
    async fn submit_answers(
        &self,
        quiz_id: &QuizId,
        answers: &[usize],
        token: Option<&SessionToken>,
    ) -> Result<GradingResult, QuizApiError> {
        self.submit_quiz_answers(quiz_id, answers, token).await
    }
}

fn with_token(builder: RequestBuilder, token: Option<&SessionToken>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token.as_str()),
        None => builder,
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, QuizApiError> {
    let response: Response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(QuizApiError::Status(status));
    }
    Ok(response.json().await?)
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

/// Request body for `/api/quiz/analyze`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub title: String,
    pub description: String,
    pub video_url: String,
    /// Persist the generated quiz under the caller's account.
    pub save: bool,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    answers: &'a [usize],
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    title: String,
    description: String,
    questions: Vec<QuestionRequest>,
}

impl GenerateRequest {
    fn from_draft(draft: &QuizDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            questions: draft
                .questions
                .iter()
                .map(|question| QuestionRequest {
                    question: question.text.clone(),
                    options: question.options.clone(),
                    correct_answer: question.correct_answer,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRequest {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
}

#[derive(Debug, Deserialize)]
struct QuizListBody {
    #[serde(default)]
    quizzes: Vec<QuizPayload>,
}

#[derive(Debug, Deserialize)]
struct QuizBody {
    quiz: QuizPayload,
}

/// Id assigned to an unsaved analyze-generated quiz. It only lives for
/// the session that takes it, so uniqueness against server ids is not
/// required.
const EPHEMERAL_QUIZ_ID: &str = "local";

/// Loosely-typed quiz shape as the collaborator returns it.
///
/// `id` is absent for an unsaved analyze result; every persisted-quiz
/// endpoint returns one.
#[derive(Debug, Deserialize)]
struct QuizPayload {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<QuestionPayload>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    score: Option<f64>,
}

impl QuizPayload {
    fn has_server_id(&self) -> bool {
        self.id.is_some()
    }

    /// Convert a payload from a persisted-quiz endpoint, where a missing
    /// id means the body is malformed.
    fn into_quiz(self) -> Result<Quiz, QuizApiError> {
        if !self.has_server_id() {
            return Err(QuizApiError::MalformedBody(
                "quiz payload is missing its id".to_string(),
            ));
        }
        self.into_ephemeral_quiz()
    }

    /// Convert a payload that may legitimately lack an id, synthesizing a
    /// session-local one when absent.
    fn into_ephemeral_quiz(self) -> Result<Quiz, QuizApiError> {
        let questions: Vec<Question> = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, payload)| payload.into_question(index))
            .collect::<Result<_, _>>()?;

        let id = self.id.unwrap_or_else(|| EPHEMERAL_QUIZ_ID.to_string());
        Quiz::new(
            QuizId::new(id),
            self.title,
            self.description,
            questions,
            self.completed,
            coerce_score(self.score),
        )
        .map_err(|err| QuizApiError::MalformedBody(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    question: String,
    options: Vec<String>,
    correct_answer: usize,
}

impl QuestionPayload {
    fn into_question(self, index: usize) -> Result<Question, QuizApiError> {
        let id = self
            .id
            .unwrap_or_else(|| format!("q{}", index + 1));
        QuestionDraft::new(self.question, self.options, self.correct_answer)
            .validate(QuestionId::new(id))
            .map_err(|err| {
                QuizApiError::MalformedBody(format!("question {index}: {err}"))
            })
    }
}

/// Grading response from `/api/quiz/:id/submit`, trusted verbatim on
/// success apart from numeric coercion.
#[derive(Debug, Deserialize)]
struct GradingBody {
    score: f64,
    correct: usize,
    total: usize,
    #[serde(default)]
    details: Vec<GradingDetailPayload>,
}

impl GradingBody {
    fn into_result(self) -> GradingResult {
        GradingResult {
            score: coerce_score(Some(self.score)).unwrap_or(0),
            correct: self.correct,
            total: self.total,
            details: self
                .details
                .into_iter()
                .map(GradingDetailPayload::into_detail)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradingDetailPayload {
    question_index: usize,
    #[serde(default)]
    selected: Option<usize>,
    correct_answer: usize,
    is_correct: bool,
}

impl GradingDetailPayload {
    fn into_detail(self) -> GradingDetail {
        GradingDetail {
            question_index: self.question_index,
            selected: self.selected,
            correct_answer: self.correct_answer,
            is_correct: self.is_correct,
        }
    }
}

/// Coerce a loose numeric score into the 0–100 domain range; malformed
/// values degrade to a bounded number instead of propagating.
fn coerce_score(score: Option<f64>) -> Option<u8> {
    let value = score?;
    if !value.is_finite() {
        return Some(0);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        Some(value.clamp(0.0, 100.0).round() as u8)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_payload_parses_server_shape() {
        let json = r#"{
            "quiz": {
                "_id": "665f1c2ab3d9e4a1f0c77d12",
                "title": "JavaScript Fundamentals",
                "questions": [
                    {
                        "question": "What does '===' do?",
                        "options": ["Assigns", "Compares value", "Compares value and type"],
                        "correctAnswer": 2
                    }
                ]
            }
        }"#;
        let body: QuizBody = serde_json::from_str(json).unwrap();
        let quiz = body.quiz.into_quiz().unwrap();
        assert_eq!(quiz.id(), &QuizId::new("665f1c2ab3d9e4a1f0c77d12"));
        assert_eq!(quiz.question_count(), 1);
        assert_eq!(quiz.questions()[0].correct_answer(), 2);
        assert!(!quiz.is_completed());
        assert_eq!(quiz.score(), None);
    }

    #[test]
    fn quiz_payload_with_bad_correct_index_is_rejected() {
        let json = r#"{
            "id": "1",
            "title": "Broken",
            "questions": [
                {"question": "Q?", "options": ["a", "b"], "correctAnswer": 5}
            ]
        }"#;
        let payload: QuizPayload = serde_json::from_str(json).unwrap();
        let err = payload.into_quiz().unwrap_err();
        assert!(matches!(err, QuizApiError::MalformedBody(_)));
    }

    #[test]
    fn unsaved_analyze_quiz_without_id_parses_as_ephemeral() {
        // Anonymous analyze calls return a quiz body with no _id; it must
        // still be takeable, just never treated as server-persisted.
        let json = r#"{
            "quiz": {
                "title": "Generated from video",
                "questions": [
                    {"question": "Q?", "options": ["a", "b"], "correctAnswer": 0}
                ]
            }
        }"#;
        let body: QuizBody = serde_json::from_str(json).unwrap();
        assert!(!body.quiz.has_server_id());

        let quiz = body.quiz.into_ephemeral_quiz().unwrap();
        assert_eq!(quiz.id(), &QuizId::new(EPHEMERAL_QUIZ_ID));
        assert_eq!(quiz.question_count(), 1);
    }

    #[test]
    fn persisted_endpoints_reject_a_quiz_without_id() {
        let json = r#"{
            "title": "No id",
            "questions": [
                {"question": "Q?", "options": ["a", "b"], "correctAnswer": 0}
            ]
        }"#;
        let payload: QuizPayload = serde_json::from_str(json).unwrap();
        let err = payload.into_quiz().unwrap_err();
        assert!(matches!(err, QuizApiError::MalformedBody(_)));
    }

    #[test]
    fn quiz_payload_without_questions_is_rejected() {
        let json = r#"{"id": "1", "title": "Empty"}"#;
        let payload: QuizPayload = serde_json::from_str(json).unwrap();
        let err = payload.into_quiz().unwrap_err();
        assert!(matches!(err, QuizApiError::MalformedBody(_)));
    }

    #[test]
    fn grading_body_coerces_loose_score() {
        let json = r#"{
            "score": 66.7,
            "correct": 2,
            "total": 3,
            "details": [
                {"questionIndex": 0, "selected": 0, "correctAnswer": 0, "isCorrect": true},
                {"questionIndex": 1, "selected": 1, "correctAnswer": 2, "isCorrect": false},
                {"questionIndex": 2, "selected": 1, "correctAnswer": 1, "isCorrect": true}
            ]
        }"#;
        let body: GradingBody = serde_json::from_str(json).unwrap();
        let result = body.into_result();
        assert_eq!(result.score, 67);
        assert_eq!(result.correct, 2);
        assert_eq!(result.total, 3);
        assert_eq!(result.details.len(), 3);
        assert!(!result.details[1].is_correct);
    }

    #[test]
    fn generate_request_uses_collaborator_field_names() {
        let draft = QuizDraft::new("Title", "Desc").with_question(QuestionDraft::new(
            "Q?",
            vec!["a".to_string(), "b".to_string()],
            1,
        ));
        let payload = GenerateRequest::from_draft(&draft);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["questions"][0]["correctAnswer"], 1);
        assert_eq!(json["questions"][0]["question"], "Q?");
    }

    #[test]
    fn analyze_request_serializes_camel_case() {
        let request = AnalyzeRequest {
            title: "Lesson".to_string(),
            description: "Desc".to_string(),
            video_url: "https://youtu.be/abc".to_string(),
            save: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["videoUrl"], "https://youtu.be/abc");
        assert_eq!(json["save"], true);
    }

    #[test]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("secret-bearer-token");
        assert_eq!(format!("{token:?}"), "SessionToken(…)");
    }

    #[test]
    fn score_coercion_bounds_malformed_values() {
        assert_eq!(coerce_score(Some(250.0)), Some(100));
        assert_eq!(coerce_score(Some(-3.0)), Some(0));
        assert_eq!(coerce_score(Some(f64::NAN)), Some(0));
        assert_eq!(coerce_score(None), None);
    }
}
