use std::collections::HashSet;

use crate::model::{Lesson, Quiz, QuizId};

/// Share of a lesson's 100 points earned by watching the video.
pub const LESSON_VIDEO_WEIGHT: f64 = 0.7;
/// Share of a lesson's 100 points earned by the embedded quiz score.
pub const LESSON_QUIZ_WEIGHT: f64 = 0.3;

//
// ─── PROGRESS SUMMARY ──────────────────────────────────────────────────────────
//

/// Aggregate dashboard statistics over the whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSummary {
    /// Weighted overall completion, 0–100.
    pub overall_progress_pct: u8,
    /// Mean score across completed quizzes with a recorded score, 0–100.
    pub average_score_pct: u8,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub completed_quizzes: usize,
    pub total_quizzes: usize,
}

//
// ─── AGGREGATION ───────────────────────────────────────────────────────────────
//

/// Compute the weighted overall progress across lessons and quizzes.
///
/// Each lesson is worth 100 points: the watch percentage earns 70% of them
/// and the embedded quiz score the remaining 30%, with missing values
/// contributing zero. Quizzes embedded in a lesson are excluded from the
/// standalone set so they are not counted twice; each remaining quiz is
/// worth 100 points, earned only when completed with a recorded score.
///
/// The average-score figure and the completed-quiz count run over the full
/// quiz collection, matching what the dashboard displays next to the quiz
/// list. Empty inputs yield an all-zero summary, never NaN or a division
/// by zero.
#[must_use]
pub fn compute_overall_progress(lessons: &[Lesson], quizzes: &[Quiz]) -> ProgressSummary {
    let mut earned_points = 0.0_f64;
    let mut total_points = 0.0_f64;

    for lesson in lessons {
        let watch = lesson.effective_watch_progress();
        let quiz_score = lesson.quiz().score().map_or(0.0, f64::from);
        earned_points += watch * LESSON_VIDEO_WEIGHT + quiz_score * LESSON_QUIZ_WEIGHT;
        total_points += 100.0;
    }

    let linked_quiz_ids: HashSet<&QuizId> = lessons.iter().map(|l| l.quiz().id()).collect();

    for quiz in quizzes {
        if linked_quiz_ids.contains(quiz.id()) {
            continue;
        }
        if quiz.is_completed() {
            earned_points += quiz.score().map_or(0.0, f64::from);
        }
        total_points += 100.0;
    }

    let overall_progress_pct = if total_points > 0.0 {
        round_pct(earned_points / total_points * 100.0)
    } else {
        0
    };

    let completed_scores: Vec<f64> = quizzes
        .iter()
        .filter(|quiz| quiz.is_completed())
        .filter_map(|quiz| quiz.score().map(f64::from))
        .collect();
    let average_score_pct = if completed_scores.is_empty() {
        0
    } else {
        // Length is non-zero here, so the mean is finite.
        #[allow(clippy::cast_precision_loss)]
        let mean = completed_scores.iter().sum::<f64>() / completed_scores.len() as f64;
        round_pct(mean)
    };

    ProgressSummary {
        overall_progress_pct,
        average_score_pct,
        completed_lessons: lessons.iter().filter(|l| l.is_watched()).count(),
        total_lessons: lessons.len(),
        completed_quizzes: quizzes.iter().filter(|q| q.is_completed()).count(),
        total_quizzes: quizzes.len(),
    }
}

/// Round a percentage already bounded to 0–100.
fn round_pct(pct: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        pct.clamp(0.0, 100.0).round() as u8
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
