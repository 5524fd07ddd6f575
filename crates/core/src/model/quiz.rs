use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Rejections raised while answering or submitting a quiz.
///
/// Every rejection leaves the attempt unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),

    #[error("option {option} is out of range for question {question}")]
    OptionOutOfRange { question: QuestionId, option: usize },

    #[error("quiz has already been submitted")]
    AlreadySubmitted,

    #[error("quiz is incomplete: {} unanswered question(s)", missing.len())]
    IncompleteAttempt { missing: Vec<QuestionId> },
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: QuestionId,
    #[serde(alias = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(alias = "correct")]
    pub correct_option: usize,
}

impl QuizQuestion {
    #[must_use]
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            options,
            correct_option,
        }
    }
}

//
// ─── ANSWER KEY ───────────────────────────────────────────────────────────────
//

/// Correct option per question, ordered by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    correct: BTreeMap<QuestionId, usize>,
}

impl AnswerKey {
    #[must_use]
    pub fn from_questions(questions: &[QuizQuestion]) -> Self {
        Self {
            correct: questions
                .iter()
                .map(|q| (q.id, q.correct_option))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, usize)> + '_ {
        self.correct.iter().map(|(id, option)| (*id, *option))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.correct.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.correct.is_empty()
    }
}

impl FromIterator<(QuestionId, usize)> for AnswerKey {
    fn from_iter<T: IntoIterator<Item = (QuestionId, usize)>>(iter: T) -> Self {
        Self {
            correct: iter.into_iter().collect(),
        }
    }
}

//
// ─── ATTEMPT ──────────────────────────────────────────────────────────────────
//

/// A learner's answers for one quiz step.
///
/// Partial until every question is answered; frozen once submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    option_counts: BTreeMap<QuestionId, usize>,
    selections: BTreeMap<QuestionId, usize>,
    submitted_at: Option<DateTime<Utc>>,
}

impl QuizAttempt {
    /// Creates an empty, unsubmitted attempt for the given questions.
    #[must_use]
    pub fn for_questions(questions: &[QuizQuestion]) -> Self {
        Self {
            option_counts: questions.iter().map(|q| (q.id, q.options.len())).collect(),
            selections: BTreeMap::new(),
            submitted_at: None,
        }
    }

    /// Records `option` as the answer to `question`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` after submission,
    /// `QuizError::UnknownQuestion` for ids outside this quiz, and
    /// `QuizError::OptionOutOfRange` for an option index past the last option.
    pub fn select(&mut self, question: QuestionId, option: usize) -> Result<(), QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        let Some(&count) = self.option_counts.get(&question) else {
            return Err(QuizError::UnknownQuestion(question));
        };
        if option >= count {
            return Err(QuizError::OptionOutOfRange { question, option });
        }
        self.selections.insert(question, option);
        Ok(())
    }

    #[must_use]
    pub fn selected(&self, question: QuestionId) -> Option<usize> {
        self.selections.get(&question).copied()
    }

    #[must_use]
    pub fn is_answered(&self, question: QuestionId) -> bool {
        self.selections.contains_key(&question)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.selections.len() == self.option_counts.len()
    }

    /// Question ids in `key` that have no selection yet.
    #[must_use]
    pub fn missing(&self, key: &AnswerKey) -> Vec<QuestionId> {
        key.iter()
            .map(|(id, _)| id)
            .filter(|id| !self.selections.contains_key(id))
            .collect()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// Freezes the attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` if frozen already, or
    /// `QuizError::IncompleteAttempt` listing every unanswered question in `key`.
    pub fn submit(&mut self, key: &AnswerKey, at: DateTime<Utc>) -> Result<(), QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        let missing = self.missing(key);
        if !missing.is_empty() {
            return Err(QuizError::IncompleteAttempt { missing });
        }
        self.submitted_at = Some(at);
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
