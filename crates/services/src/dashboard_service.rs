//! Read-side aggregation for the dashboard: overall progress plus
//! display-ready lesson and quiz rows.

use catalog::Catalog;
use course_core::model::{LessonId, QuizId};
use course_core::progress::{ProgressSummary, compute_overall_progress};

use crate::error::DashboardError;

/// One lesson row on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonListItem {
    pub id: LessonId,
    pub title: String,
    pub duration: String,
    pub watch_progress_pct: f64,
    pub quiz_score: Option<u8>,
    pub completed: bool,
    pub action_label: &'static str,
}

/// One standalone quiz row on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizListItem {
    pub id: QuizId,
    pub title: String,
    pub question_count: usize,
    pub completed: bool,
    pub score: Option<u8>,
    pub action_label: &'static str,
}

/// Everything the dashboard renders in one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub summary: ProgressSummary,
    pub lessons: Vec<LessonListItem>,
    pub quizzes: Vec<QuizListItem>,
}

/// Computes dashboard snapshots from the catalog.
#[derive(Clone)]
pub struct DashboardService {
    catalog: Catalog,
}

impl DashboardService {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Build a full dashboard snapshot from the current catalog state.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Catalog` when either listing fails.
    pub async fn overview(&self) -> Result<DashboardOverview, DashboardError> {
        let lessons = self.catalog.lessons.list_lessons().await?;
        let quizzes = self.catalog.quizzes.list_quizzes().await?;

        let summary = compute_overall_progress(&lessons, &quizzes);

        let lesson_items = lessons
            .iter()
            .map(|lesson| LessonListItem {
                id: lesson.id().clone(),
                title: lesson.title().to_string(),
                duration: lesson.duration().to_string(),
                watch_progress_pct: lesson.effective_watch_progress(),
                quiz_score: lesson.quiz().score(),
                completed: lesson.is_completed(),
                action_label: if lesson.is_completed() { "Review" } else { "Start" },
            })
            .collect();

        let quiz_items = quizzes
            .iter()
            .map(|quiz| QuizListItem {
                id: quiz.id().clone(),
                title: quiz.title().to_string(),
                question_count: quiz.question_count(),
                completed: quiz.is_completed(),
                score: quiz.score(),
                action_label: if quiz.is_completed() { "Retake" } else { "Start Quiz" },
            })
            .collect();

        Ok(DashboardOverview {
            summary,
            lessons: lesson_items,
            quizzes: quiz_items,
        })
    }
}
