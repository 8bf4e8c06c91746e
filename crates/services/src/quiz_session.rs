use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::warn;

use course_core::grading::{GradingResult, grade};
use course_core::model::{AnswerSheet, Question, Quiz, QuizId};

use crate::error::{QuizApiError, QuizSessionError};
use crate::quiz_api::SessionToken;

//
// ─── REMOTE GRADING SEAM ───────────────────────────────────────────────────────
//

/// Grading collaborator for server-persisted quizzes.
///
/// `QuizApiService` is the production implementation; tests inject fakes
/// to exercise the local-fallback path without a network.
#[async_trait]
pub trait RemoteGrader: Send + Sync {
    /// Submit a completed answer list and return the collaborator's result.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on any transport, status, or body failure.
    async fn submit_answers(
        &self,
        quiz_id: &QuizId,
        answers: &[usize],
        token: Option<&SessionToken>,
    ) -> Result<GradingResult, QuizApiError>;
}

/// Where the session's quiz came from.
///
/// Server-persisted quizzes carry a server-assigned identifier and are
/// graded remotely first; catalog quizzes grade locally without any call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizOrigin {
    Catalog,
    Server,
}

//
// ─── SESSION STATE MACHINE ─────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    InProgress { current: usize },
    Grading,
    Completed(GradingResult),
}

/// Outcome of recording an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// More questions remain; the session advanced to the next one.
    Advanced { next_question: usize },
    /// The last question was answered; the session now awaits grading.
    ReadyForGrading,
}

/// One quiz-taking attempt, stepping through the questions in order.
///
/// `InProgress` → (last answer) → `Grading` → `Completed`. While a grading
/// submission is outstanding no further answers are accepted, and a
/// completed session stays terminal until an explicit [`QuizSession::retake`].
pub struct QuizSession {
    quiz: Quiz,
    origin: QuizOrigin,
    answers: AnswerSheet,
    state: SessionState,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(quiz: Quiz, origin: QuizOrigin, started_at: DateTime<Utc>) -> Self {
        let answers = AnswerSheet::new(quiz.question_count());
        Self {
            quiz,
            origin,
            answers,
            state: SessionState::InProgress { current: 0 },
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn origin(&self) -> QuizOrigin {
        self.origin
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Index of the question currently awaiting an answer.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SessionState::InProgress { current } => Some(current),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|index| self.quiz.question(index))
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed(_))
    }

    /// The grading result, once the session completed.
    #[must_use]
    pub fn result(&self) -> Option<&GradingResult> {
        match &self.state {
            SessionState::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// Record the selected option for the current question and advance.
    ///
    /// Answering the last question moves the session into the grading
    /// state; a finalize call must follow.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionInFlight` while grading is outstanding,
    /// `AlreadyCompleted` after completion, and `OptionOutOfRange` when
    /// the selection does not address an option of the current question.
    pub fn select_answer(&mut self, option: usize) -> Result<SelectOutcome, QuizSessionError> {
        let current = match self.state {
            SessionState::InProgress { current } => current,
            SessionState::Grading => return Err(QuizSessionError::SubmissionInFlight),
            SessionState::Completed(_) => return Err(QuizSessionError::AlreadyCompleted),
        };

        let option_count = self
            .quiz
            .question(current)
            .map_or(0, Question::option_count);
        if option >= option_count {
            return Err(QuizSessionError::OptionOutOfRange {
                question_index: current,
                selected: option,
            });
        }

        self.answers.select(current, option)?;

        if current + 1 < self.quiz.question_count() {
            self.state = SessionState::InProgress { current: current + 1 };
            Ok(SelectOutcome::Advanced {
                next_question: current + 1,
            })
        } else {
            self.state = SessionState::Grading;
            Ok(SelectOutcome::ReadyForGrading)
        }
    }

    /// Grade the session, preferring the remote collaborator for
    /// server-origin quizzes.
    ///
    /// On any remote failure the session falls back to the local
    /// computation in the same call, so the caller always gets a result.
    /// The fallback is deterministic and equals what [`grade`] produces on
    /// the same inputs.
    ///
    /// # Errors
    ///
    /// Returns `NotReadyForGrading` if questions remain unanswered and
    /// `AlreadyCompleted` if the session already finished.
    pub async fn finalize(
        &mut self,
        grader: &dyn RemoteGrader,
        token: Option<&SessionToken>,
        completed_at: DateTime<Utc>,
    ) -> Result<GradingResult, QuizSessionError> {
        self.ensure_ready_for_grading()?;

        let result = match self.origin {
            QuizOrigin::Catalog => grade(&self.quiz, &self.answers),
            QuizOrigin::Server => self.grade_remotely(grader, token).await,
        };

        self.complete(result.clone(), completed_at);
        Ok(result)
    }

    /// Grade the session locally without consulting any collaborator.
    ///
    /// # Errors
    ///
    /// Returns `NotReadyForGrading` if questions remain unanswered and
    /// `AlreadyCompleted` if the session already finished.
    pub fn finalize_local(
        &mut self,
        completed_at: DateTime<Utc>,
    ) -> Result<GradingResult, QuizSessionError> {
        self.ensure_ready_for_grading()?;
        let result = grade(&self.quiz, &self.answers);
        self.complete(result.clone(), completed_at);
        Ok(result)
    }

    /// Reset a completed session for another attempt.
    ///
    /// # Errors
    ///
    /// Returns `NotCompleted` unless the session is in its terminal state.
    pub fn retake(&mut self) -> Result<(), QuizSessionError> {
        if !self.is_completed() {
            return Err(QuizSessionError::NotCompleted);
        }
        self.answers.clear();
        self.state = SessionState::InProgress { current: 0 };
        self.completed_at = None;
        Ok(())
    }

    fn ensure_ready_for_grading(&self) -> Result<(), QuizSessionError> {
        match self.state {
            SessionState::Grading => Ok(()),
            SessionState::Completed(_) => Err(QuizSessionError::AlreadyCompleted),
            SessionState::InProgress { .. } => Err(QuizSessionError::NotReadyForGrading {
                answered: self.answers.answered_count(),
                total: self.quiz.question_count(),
            }),
        }
    }

    async fn grade_remotely(
        &self,
        grader: &dyn RemoteGrader,
        token: Option<&SessionToken>,
    ) -> GradingResult {
        let submission = match self.answers.to_submission() {
            Ok(submission) => submission,
            Err(err) => {
                warn!(quiz_id = %self.quiz.id(), error = %err, "answer sheet not submittable, grading locally");
                return grade(&self.quiz, &self.answers);
            }
        };

        match grader.submit_answers(self.quiz.id(), &submission, token).await {
            Ok(result) => result,
            Err(err) => {
                warn!(quiz_id = %self.quiz.id(), error = %err, "remote grading failed, falling back to local grading");
                grade(&self.quiz, &self.answers)
            }
        }
    }

    fn complete(&mut self, result: GradingResult, completed_at: DateTime<Utc>) {
        self.completed_at = Some(completed_at);
        self.state = SessionState::Completed(result);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", self.quiz.id())
            .field("origin", &self.origin)
            .field("answered", &self.answers.answered_count())
            .field("state", &state_label(&self.state))
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

fn state_label(state: &SessionState) -> &'static str {
    match state {
        SessionState::InProgress { .. } => "in-progress",
        SessionState::Grading => "grading",
        SessionState::Completed(_) => "completed",
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
