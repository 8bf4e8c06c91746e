use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use course_core::model::{Lesson, LessonId, Quiz, QuizId};

/// Errors surfaced by catalog adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Read-only lesson source. Lessons and their embedded quizzes are inputs
/// provided by the catalog; the application never writes them back.
#[async_trait]
pub trait LessonCatalog: Send + Sync {
    /// List all lessons in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the backing store is unreachable.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, CatalogError>;

    /// Fetch a lesson by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if missing, or other catalog errors.
    async fn get_lesson(&self, id: &LessonId) -> Result<Lesson, CatalogError>;
}

/// Read-only quiz source for the practice-quiz collection.
#[async_trait]
pub trait QuizCatalog: Send + Sync {
    /// List all quizzes in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the backing store is unreachable.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, CatalogError>;

    /// Fetch a quiz by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if missing, or other catalog errors.
    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, CatalogError>;
}

//
// ─── IN-MEMORY CATALOG ─────────────────────────────────────────────────────────
//

/// Simple in-memory catalog implementation for testing and the bundled
/// sample content. Preserves insertion order so lists render stably.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    lessons: Arc<Mutex<Vec<Lesson>>>,
    quizzes: Arc<Mutex<Vec<Quiz>>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog with a lesson.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Connection` if the catalog lock is poisoned.
    pub fn insert_lesson(&self, lesson: Lesson) -> Result<(), CatalogError> {
        let mut guard = self
            .lessons
            .lock()
            .map_err(|e| CatalogError::Connection(e.to_string()))?;
        guard.push(lesson);
        Ok(())
    }

    /// Seed the catalog with a quiz.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Connection` if the catalog lock is poisoned.
    pub fn insert_quiz(&self, quiz: Quiz) -> Result<(), CatalogError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| CatalogError::Connection(e.to_string()))?;
        guard.push(quiz);
        Ok(())
    }
}

#[async_trait]
impl LessonCatalog for InMemoryCatalog {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, CatalogError> {
        let guard = self
            .lessons
            .lock()
            .map_err(|e| CatalogError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn get_lesson(&self, id: &LessonId) -> Result<Lesson, CatalogError> {
        let guard = self
            .lessons
            .lock()
            .map_err(|e| CatalogError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|lesson| lesson.id() == id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }
}

#[async_trait]
impl QuizCatalog for InMemoryCatalog {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, CatalogError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| CatalogError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, CatalogError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| CatalogError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|quiz| quiz.id() == id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Aggregates lesson and quiz sources behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Catalog {
    pub lessons: Arc<dyn LessonCatalog>,
    pub quizzes: Arc<dyn QuizCatalog>,
}

impl Catalog {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryCatalog::new();
        let lessons: Arc<dyn LessonCatalog> = Arc::new(repo.clone());
        let quizzes: Arc<dyn QuizCatalog> = Arc::new(repo);
        Self { lessons, quizzes }
    }

    /// Wrap a single backend serving both lessons and quizzes.
    #[must_use]
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: LessonCatalog + QuizCatalog + Clone + 'static,
    {
        let lessons: Arc<dyn LessonCatalog> = Arc::new(backend.clone());
        let quizzes: Arc<dyn QuizCatalog> = Arc::new(backend);
        Self { lessons, quizzes }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
