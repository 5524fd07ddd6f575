use lesson_core::model::{Course, CourseLesson};

use crate::error::CatalogError;

/// Picks which lesson of a course to open. Selection is never gated.
#[derive(Debug, Clone)]
pub struct CourseBrowser {
    course: Course,
    selected: usize,
}

impl CourseBrowser {
    #[must_use]
    pub fn new(course: Course) -> Self {
        Self {
            course,
            selected: 0,
        }
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Select the lesson at `index`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownLesson` if the course has no such lesson;
    /// the previous selection is kept.
    pub fn select(&mut self, index: usize) -> Result<&CourseLesson, CatalogError> {
        if index >= self.course.lessons.len() {
            return Err(CatalogError::UnknownLesson(index));
        }
        self.selected = index;
        Ok(&self.course.lessons[index])
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Currently selected lesson; `None` only for a course without lessons.
    #[must_use]
    pub fn selected(&self) -> Option<&CourseLesson> {
        self.course.lessons.get(self.selected)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.course.completed_count()
    }

    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        self.course.completion_percent()
    }
}
