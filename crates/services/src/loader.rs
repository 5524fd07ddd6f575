//! Lesson and course definitions from JSON.
//!
//! A lesson file looks like:
//!
//! ```json
//! {
//!   "id": 1,
//!   "title": "Intro to Programming",
//!   "course": "Programming Basics",
//!   "steps": [
//!     { "type": "intro", "id": 1, "title": "Welcome", "text": "..." },
//!     { "type": "video", "id": 2, "title": "...", "source": "https://..." },
//!     { "type": "quiz", "id": 5, "title": "...", "questions": [
//!       { "id": 1, "question": "...", "options": ["a", "b"], "correct": 1 }
//!     ] }
//!   ]
//! }
//! ```

use std::path::Path;

use lesson_core::model::{Course, Lesson, LessonDraft};

use crate::error::LessonLoadError;

/// Parse and validate a lesson definition.
///
/// # Errors
///
/// Returns `LessonLoadError::Json` for malformed input and
/// `LessonLoadError::Invalid` when the lesson breaks a structural rule.
pub fn load_lesson_str(json: &str) -> Result<Lesson, LessonLoadError> {
    let draft: LessonDraft = serde_json::from_str(json)?;
    let lesson = draft.validate()?;
    tracing::debug!(
        lesson = %lesson.id(),
        steps = lesson.step_count(),
        "lesson definition loaded"
    );
    Ok(lesson)
}

/// Read, parse and validate a lesson file.
///
/// # Errors
///
/// Returns `LessonLoadError::Io` if the file cannot be read, otherwise the
/// errors of [`load_lesson_str`].
pub fn load_lesson_file(path: impl AsRef<Path>) -> Result<Lesson, LessonLoadError> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    load_lesson_str(&raw)
}

/// Parse a course outline.
///
/// # Errors
///
/// Returns `LessonLoadError::Json` for malformed input.
pub fn load_course_str(json: &str) -> Result<Course, LessonLoadError> {
    Ok(serde_json::from_str(json)?)
}
