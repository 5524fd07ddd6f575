//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::model::{LessonError, QuizError};

/// Coarse classification of every rejection the player can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The media resource failed to load; transport is inert.
    ResourceUnavailable,
    /// A precondition was violated; state is unchanged.
    InvalidOperation,
    /// Quiz submitted with unanswered questions; state is unchanged.
    IncompleteAttempt,
}

/// Errors emitted by `MediaTransportController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
    #[error("media resource is unavailable")]
    ResourceUnavailable,
    #[error("invalid transport operation: {0}")]
    InvalidOperation(&'static str),
}

impl TransportError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::ResourceUnavailable => ErrorKind::ResourceUnavailable,
            TransportError::InvalidOperation(_) => ErrorKind::InvalidOperation,
        }
    }
}

/// Errors emitted by `LessonProgressionEngine`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error("current step is not a quiz")]
    NotAQuizStep,
    #[error("current step has no media")]
    NotAMediaStep,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ProgressionError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProgressionError::Quiz(QuizError::IncompleteAttempt { .. }) => {
                ErrorKind::IncompleteAttempt
            }
            ProgressionError::Transport(err) => err.kind(),
            _ => ErrorKind::InvalidOperation,
        }
    }
}

/// Errors emitted by `CourseBrowser`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("course has no lesson at position {0}")]
    UnknownLesson(usize),
}

/// Errors emitted while loading lesson or course definitions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonLoadError {
    #[error("failed to read lesson file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed lesson definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] LessonError),
}
