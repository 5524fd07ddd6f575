use serde::Serialize;

use lesson_core::scoring::rounded_percent;

/// Aggregated view of lesson progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonProgress {
    /// Zero-based index of the active step.
    pub index: usize,
    pub total: usize,
    /// Human label, e.g. "Step 2 of 5".
    pub label: String,
    /// Share of the lesson reached, counting the active step.
    pub percent: u8,
    pub is_first: bool,
    pub is_last: bool,
}

impl LessonProgress {
    #[must_use]
    pub fn new(index: usize, total: usize) -> Self {
        let number = index + 1;
        Self {
            index,
            total,
            label: format!("Step {number} of {total}"),
            percent: rounded_percent(number, total),
            is_first: index == 0,
            is_last: number >= total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_counts_the_active_step() {
        let first = LessonProgress::new(0, 5);
        assert_eq!(first.label, "Step 1 of 5");
        assert_eq!(first.percent, 20);
        assert!(first.is_first);
        assert!(!first.is_last);

        let last = LessonProgress::new(4, 5);
        assert_eq!(last.percent, 100);
        assert!(last.is_last);
    }

    #[test]
    fn single_step_lesson_is_first_and_last() {
        let only = LessonProgress::new(0, 1);
        assert!(only.is_first && only.is_last);
        assert_eq!(only.percent, 100);
    }
}
