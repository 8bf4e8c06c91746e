mod answers;
mod ids;
mod lesson;
mod question;
mod quiz;

pub use answers::{AnswerSheet, AnswerSheetError};
pub use ids::{LessonId, QuestionId, QuizId};
pub use lesson::Lesson;
pub use question::{MIN_OPTIONS, Question, QuestionDraft, QuestionError};
pub use quiz::{Quiz, QuizDraft, QuizDraftError, QuizError};
