use thiserror::Error;

use crate::model::{LessonError, MediaValidationError, QuizError, SettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    MediaValidation(#[from] MediaValidationError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
