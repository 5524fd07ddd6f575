use serde::{Deserialize, Serialize};

use crate::model::ids::{CourseId, LessonId};

/// Broad format of a lesson as listed in a course outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonFormat {
    Video,
    Audio,
    Interactive,
    Quiz,
}

/// One entry of a course outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseLesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub duration_label: String,
    #[serde(rename = "type", alias = "format")]
    pub format: LessonFormat,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub preview: bool,
}

/// Static course outline used to pick which lesson to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub instructor: String,
    pub lessons: Vec<CourseLesson>,
}

impl Course {
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.completed).count()
    }

    /// Share of completed lessons, rounded to a whole percent.
    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        crate::scoring::rounded_percent(self.completed_count(), self.lessons.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: u64, completed: bool) -> CourseLesson {
        CourseLesson {
            id: LessonId::new(id),
            title: format!("Lesson {id}"),
            duration_label: "15 min".into(),
            format: LessonFormat::Video,
            completed,
            preview: false,
        }
    }

    #[test]
    fn completion_is_rounded_percent() {
        let course = Course {
            id: CourseId::new(1),
            title: "Basics".into(),
            instructor: String::new(),
            lessons: vec![lesson(1, true), lesson(2, true), lesson(3, false)],
        };
        assert_eq!(course.completed_count(), 2);
        assert_eq!(course.completion_percent(), 67);
    }

    #[test]
    fn empty_course_is_zero_percent() {
        let course = Course {
            id: CourseId::new(1),
            title: "Empty".into(),
            instructor: String::new(),
            lessons: Vec::new(),
        };
        assert_eq!(course.completion_percent(), 0);
    }
}
