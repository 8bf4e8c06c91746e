use url::Url;

use crate::model::ids::LessonId;
use crate::model::quiz::Quiz;

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A video unit with an embedded quiz and watch-progress.
///
/// `video_progress` is a 0–100 percentage; when the catalog does not know
/// it, the completion flag stands in as a 0/100 binary substitute.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    description: String,
    video_url: Url,
    duration: String,
    analysis: String,
    quiz: Quiz,
    completed: bool,
    video_progress: Option<f64>,
}

impl Lesson {
    /// Create a lesson. A watch percentage outside 0–100 is clamped.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        description: impl Into<String>,
        video_url: Url,
        duration: impl Into<String>,
        analysis: impl Into<String>,
        quiz: Quiz,
        completed: bool,
        video_progress: Option<f64>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            video_url,
            duration: duration.into(),
            analysis: analysis.into(),
            quiz,
            completed,
            video_progress: video_progress.map(normalize_progress),
        }
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
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
    pub fn video_url(&self) -> &Url {
        &self.video_url
    }

    /// Human-readable duration label, e.g. "10:24".
    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    /// Post-video analysis text shown after the lesson completes.
    #[must_use]
    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn video_progress(&self) -> Option<f64> {
        self.video_progress
    }

    /// Effective watch percentage: the recorded progress when known,
    /// otherwise 100 for a completed lesson and 0 for anything else.
    #[must_use]
    pub fn effective_watch_progress(&self) -> f64 {
        match self.video_progress {
            Some(pct) => pct,
            None if self.completed => 100.0,
            None => 0.0,
        }
    }

    /// A lesson counts as watched once its effective progress reaches 100.
    #[must_use]
    pub fn is_watched(&self) -> bool {
        self.effective_watch_progress() >= 100.0
    }
}

fn normalize_progress(pct: f64) -> f64 {
    if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
