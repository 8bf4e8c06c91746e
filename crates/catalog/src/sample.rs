//! Bundled sample content: three practice quizzes and three video lessons
//! embedding them. This is the static catalog the dashboard and lesson
//! views run against when no remote source is configured.

use thiserror::Error;
use url::Url;

use course_core::model::{
    Lesson, LessonId, Question, QuestionDraft, QuestionError, QuestionId, Quiz, QuizError, QuizId,
};

use crate::repository::{Catalog, CatalogError, InMemoryCatalog};

/// Errors raised while building the sample content.
///
/// These indicate a defect in the bundled data rather than a runtime
/// condition, but they propagate like any other error so callers decide
/// how loudly to fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SampleDataError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("invalid sample video url: {0}")]
    VideoUrl(#[from] url::ParseError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Build a catalog pre-seeded with the sample lessons and quizzes.
///
/// # Errors
///
/// Returns `SampleDataError` if the bundled data fails validation.
pub fn sample_catalog() -> Result<Catalog, SampleDataError> {
    let repo = seed_catalog()?;
    Ok(Catalog::from_backend(repo))
}

/// Seed an `InMemoryCatalog` with the sample content.
///
/// # Errors
///
/// Returns `SampleDataError` if the bundled data fails validation.
pub fn seed_catalog() -> Result<InMemoryCatalog, SampleDataError> {
    let repo = InMemoryCatalog::new();

    let quizzes = sample_quizzes()?;
    let lessons = sample_lessons(&quizzes)?;

    for quiz in quizzes {
        repo.insert_quiz(quiz)?;
    }
    for lesson in lessons {
        repo.insert_lesson(lesson)?;
    }

    Ok(repo)
}

fn question(
    id: &str,
    text: &str,
    options: &[&str],
    correct_answer: usize,
) -> Result<Question, QuestionError> {
    QuestionDraft::new(
        text,
        options.iter().map(ToString::to_string).collect(),
        correct_answer,
    )
    .validate(QuestionId::new(id))
}

fn sample_quizzes() -> Result<Vec<Quiz>, SampleDataError> {
    let javascript = Quiz::new(
        QuizId::new("1"),
        "JavaScript Fundamentals",
        "Test your knowledge of JavaScript basics",
        vec![
            question(
                "q1",
                "What is the correct way to declare a variable in JavaScript?",
                &["var myVar;", "variable myVar;", "v myVar;", "int myVar;"],
                0,
            )?,
            question(
                "q2",
                "Which method is used to parse a string to an integer?",
                &["parseInt()", "parseInteger()", "toInt()", "convertInt()"],
                0,
            )?,
            question(
                "q3",
                "What does '===' operator do?",
                &[
                    "Assigns value",
                    "Compares value only",
                    "Compares value and type",
                    "None of the above",
                ],
                2,
            )?,
        ],
        true,
        Some(85),
    )?;

    let react = Quiz::new(
        QuizId::new("2"),
        "React Hooks Basics",
        "Understanding React Hooks and their usage",
        vec![
            question(
                "q1",
                "Which hook is used for side effects?",
                &["useState", "useEffect", "useContext", "useReducer"],
                1,
            )?,
            question(
                "q2",
                "What does useState return?",
                &[
                    "A value",
                    "A function",
                    "An array with state and setter",
                    "An object",
                ],
                2,
            )?,
            question(
                "q3",
                "When does useEffect run by default?",
                &["On mount only", "On unmount only", "After every render", "Never"],
                2,
            )?,
        ],
        false,
        None,
    )?;

    let css = Quiz::new(
        QuizId::new("3"),
        "CSS Flexbox Mastery",
        "Master the art of CSS Flexbox layouts",
        vec![
            question(
                "q1",
                "Which property is used to enable flexbox?",
                &["display: flex;", "flex: true;", "flexbox: on;", "layout: flex;"],
                0,
            )?,
            question(
                "q2",
                "What does 'justify-content' control?",
                &["Vertical alignment", "Horizontal alignment", "Font size", "Border"],
                1,
            )?,
        ],
        true,
        Some(92),
    )?;

    Ok(vec![javascript, react, css])
}

fn sample_lessons(quizzes: &[Quiz]) -> Result<Vec<Lesson>, SampleDataError> {
    let web_dev = Lesson::new(
        LessonId::new("1"),
        "Introduction to Web Development",
        "Learn the fundamentals of web development",
        Url::parse("https://youtu.be/4WjtQjPQGIs")?,
        "10:24",
        "This lesson covered the core concepts of web development including HTML structure, \
         CSS styling, and JavaScript interactivity. You learned about the Document Object \
         Model (DOM) and how these three technologies work together to create modern web \
         applications.",
        quizzes[0].clone(),
        true,
        Some(100.0),
    );

    let react_patterns = Lesson::new(
        LessonId::new("2"),
        "Advanced React Patterns",
        "Deep dive into React best practices",
        Url::parse("https://youtu.be/iO6px_wz1oc")?,
        "16:56",
        "This advanced lesson explored React Hooks, custom hooks, and performance \
         optimization techniques. You learned how to build reusable components and manage \
         complex state with useReducer and useContext.",
        quizzes[1].clone(),
        false,
        // partially watched
        Some(40.0),
    );

    let modern_css = Lesson::new(
        LessonId::new("3"),
        "Modern CSS Techniques",
        "Master Flexbox and Grid layouts",
        Url::parse("https://youtu.be/0hrJGWrCux0")?,
        "3:22:26",
        "This lesson covered modern CSS layout techniques including Flexbox and CSS Grid. \
         You learned how to create responsive, flexible layouts that adapt to different \
         screen sizes.",
        quizzes[2].clone(),
        true,
        Some(100.0),
    );

    Ok(vec![web_dev, react_patterns, modern_css])
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
