mod course;
mod ids;
mod lesson;
pub mod media;
mod quiz;
mod settings;
mod step;

pub use course::{Course, CourseLesson, LessonFormat};
pub use ids::{CourseId, LessonId, ParseIdError, QuestionId, StepId};
pub use lesson::{Lesson, LessonDraft, LessonError};
pub use media::{MediaKind, MediaUri, MediaValidationError};
pub use quiz::{AnswerKey, QuizAttempt, QuizError, QuizQuestion};
pub use settings::{PlayerSettings, SettingsError};
pub use step::{GlossaryEntry, LessonStep, StepKind};
