#![forbid(unsafe_code)]

pub mod authoring_service;
pub mod dashboard_service;
pub mod error;
pub mod quiz_api;
pub mod quiz_flow;
pub mod quiz_session;

pub use course_core::Clock;

pub use authoring_service::AuthoringService;
pub use dashboard_service::{DashboardOverview, DashboardService, LessonListItem, QuizListItem};
pub use error::{AuthoringError, DashboardError, QuizApiError, QuizFlowError, QuizSessionError};
pub use quiz_api::{AnalyzeRequest, AnalyzedQuiz, QuizApiConfig, QuizApiService, SessionToken};
pub use quiz_flow::QuizFlowService;
pub use quiz_session::{QuizOrigin, QuizSession, RemoteGrader, SelectOutcome};
