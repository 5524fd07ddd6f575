use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::{LessonId, QuestionId, StepId};
use crate::model::step::LessonStep;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson must contain at least one step")]
    NoSteps,

    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("step {0} has an empty title")]
    EmptyStepTitle(StepId),

    #[error("step id {0} is used more than once")]
    DuplicateStep(StepId),

    #[error("interactive step {0} has no glossary entries")]
    EmptyGlossary(StepId),

    #[error("quiz step {0} has no questions")]
    EmptyQuiz(StepId),

    #[error("quiz step {step} repeats question id {question}")]
    DuplicateQuestion { step: StepId, question: QuestionId },

    #[error("question {question} in step {step} needs at least two options")]
    TooFewOptions { step: StepId, question: QuestionId },

    #[error("question {question} in step {step} marks a non-existent option as correct")]
    CorrectOptionOutOfRange { step: StepId, question: QuestionId },
}

//
// ─── DRAFT (unvalidated input) ─────────────────────────────────────────────────
//

/// Lesson definition as supplied by the host, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDraft {
    pub id: LessonId,
    pub title: String,
    #[serde(default, alias = "course")]
    pub course_title: String,
    pub steps: Vec<LessonStep>,
}

impl LessonDraft {
    /// Checks structural invariants and produces an immutable `Lesson`.
    ///
    /// # Errors
    ///
    /// Returns the first `LessonError` found, scanning steps in order.
    pub fn validate(self) -> Result<Lesson, LessonError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        if self.steps.is_empty() {
            return Err(LessonError::NoSteps);
        }

        let mut seen_steps = BTreeSet::new();
        for step in &self.steps {
            if !seen_steps.insert(step.id()) {
                return Err(LessonError::DuplicateStep(step.id()));
            }
            validate_step(step)?;
        }

        Ok(Lesson {
            id: self.id,
            title,
            course_title: self.course_title.trim().to_owned(),
            steps: self.steps,
        })
    }
}

fn validate_step(step: &LessonStep) -> Result<(), LessonError> {
    let id = step.id();
    if step.title().trim().is_empty() {
        return Err(LessonError::EmptyStepTitle(id));
    }

    match step {
        LessonStep::Intro { .. } | LessonStep::Video { .. } | LessonStep::Audio { .. } => Ok(()),
        LessonStep::Interactive { entries, .. } => {
            if entries.is_empty() {
                Err(LessonError::EmptyGlossary(id))
            } else {
                Ok(())
            }
        }
        LessonStep::Quiz { questions, .. } => {
            if questions.is_empty() {
                return Err(LessonError::EmptyQuiz(id));
            }
            let mut seen = BTreeSet::new();
            for question in questions {
                if !seen.insert(question.id) {
                    return Err(LessonError::DuplicateQuestion {
                        step: id,
                        question: question.id,
                    });
                }
                if question.options.len() < 2 {
                    return Err(LessonError::TooFewOptions {
                        step: id,
                        question: question.id,
                    });
                }
                if question.correct_option >= question.options.len() {
                    return Err(LessonError::CorrectOptionOutOfRange {
                        step: id,
                        question: question.id,
                    });
                }
            }
            Ok(())
        }
    }
}

//
// ─── VALIDATED LESSON ──────────────────────────────────────────────────────────
//

/// A validated lesson. The step sequence is fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    course_title: String,
    steps: Vec<LessonStep>,
}

impl Lesson {
    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    #[must_use]
    pub fn steps(&self) -> &[LessonStep] {
        &self.steps
    }

    #[must_use]
    pub fn step(&self, index: usize) -> Option<&LessonStep> {
        self.steps.get(index)
    }

    /// Number of steps; always at least one.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quiz::QuizQuestion;
    use crate::model::step::GlossaryEntry;

    fn intro(id: u64) -> LessonStep {
        LessonStep::Intro {
            id: StepId::new(id),
            title: "Welcome".into(),
            text: "Hello".into(),
            emblem: None,
        }
    }

    fn quiz(id: u64, questions: Vec<QuizQuestion>) -> LessonStep {
        LessonStep::Quiz {
            id: StepId::new(id),
            title: "Quiz".into(),
            questions,
        }
    }

    fn question(id: u64, options: usize, correct: usize) -> QuizQuestion {
        QuizQuestion::new(
            QuestionId::new(id),
            "Q",
            (0..options).map(|i| format!("opt {i}")).collect(),
            correct,
        )
    }

    fn draft(steps: Vec<LessonStep>) -> LessonDraft {
        LessonDraft {
            id: LessonId::new(1),
            title: "Intro to Programming".into(),
            course_title: " Basics ".into(),
            steps,
        }
    }

    #[test]
    fn valid_draft_builds_lesson() {
        let lesson = draft(vec![intro(1), quiz(2, vec![question(1, 4, 1)])])
            .validate()
            .unwrap();
        assert_eq!(lesson.step_count(), 2);
        assert_eq!(lesson.last_index(), 1);
        assert_eq!(lesson.course_title(), "Basics");
        assert!(lesson.step(2).is_none());
    }

    #[test]
    fn empty_lesson_is_rejected() {
        assert_eq!(draft(Vec::new()).validate().unwrap_err(), LessonError::NoSteps);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut d = draft(vec![intro(1)]);
        d.title = "  ".into();
        assert_eq!(d.validate().unwrap_err(), LessonError::EmptyTitle);
    }

    #[test]
    fn duplicate_step_ids_are_rejected() {
        let err = draft(vec![intro(1), intro(1)]).validate().unwrap_err();
        assert_eq!(err, LessonError::DuplicateStep(StepId::new(1)));
    }

    #[test]
    fn quiz_structure_is_checked() {
        let err = draft(vec![quiz(5, Vec::new())]).validate().unwrap_err();
        assert_eq!(err, LessonError::EmptyQuiz(StepId::new(5)));

        let err = draft(vec![quiz(5, vec![question(1, 2, 0), question(1, 2, 0)])])
            .validate()
            .unwrap_err();
        assert!(matches!(err, LessonError::DuplicateQuestion { .. }));

        let err = draft(vec![quiz(5, vec![question(1, 1, 0)])])
            .validate()
            .unwrap_err();
        assert!(matches!(err, LessonError::TooFewOptions { .. }));

        let err = draft(vec![quiz(5, vec![question(1, 3, 3)])])
            .validate()
            .unwrap_err();
        assert!(matches!(err, LessonError::CorrectOptionOutOfRange { .. }));
    }

    #[test]
    fn interactive_step_needs_entries() {
        let step = LessonStep::Interactive {
            id: StepId::new(4),
            title: "Concepts".into(),
            entries: Vec::new(),
        };
        let err = draft(vec![step]).validate().unwrap_err();
        assert_eq!(err, LessonError::EmptyGlossary(StepId::new(4)));

        let ok = LessonStep::Interactive {
            id: StepId::new(4),
            title: "Concepts".into(),
            entries: vec![GlossaryEntry::new("Variable", "Stores data")],
        };
        assert!(draft(vec![ok]).validate().is_ok());
    }
}
