use serde::Serialize;

use lesson_core::model::{LessonStep, QuestionId};
use lesson_core::scoring::QuizResult;

use super::engine::StepSession;
use super::progress::LessonProgress;
use crate::transport::{MediaResource, TransportView};

/// Label for the forward navigation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NextLabel {
    Next,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView<'a> {
    pub id: QuestionId,
    /// One-based position within the quiz.
    pub number: usize,
    pub prompt: &'a str,
    pub options: &'a [String],
    pub selected: Option<usize>,
    pub answered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResultView {
    pub score: u8,
    pub correct: usize,
    pub total: usize,
    pub message: &'static str,
}

impl From<&QuizResult> for QuizResultView {
    fn from(result: &QuizResult) -> Self {
        Self {
            score: result.score,
            correct: result.correct,
            total: result.total,
            message: result.feedback.message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView<'a> {
    pub questions: Vec<QuestionView<'a>>,
    pub answered: usize,
    pub total: usize,
    /// All questions answered and not yet submitted.
    pub can_submit: bool,
    pub result: Option<QuizResultView>,
}

/// Everything the presentation layer needs to render the active step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionView<'a> {
    pub lesson_title: &'a str,
    pub step: &'a LessonStep,
    pub progress: LessonProgress,
    pub next_label: NextLabel,
    pub quiz: Option<QuizView<'a>>,
    pub transport: Option<TransportView>,
}

impl<'a> ProgressionView<'a> {
    pub(crate) fn build<R: MediaResource>(
        step: &'a LessonStep,
        lesson_title: &'a str,
        progress: LessonProgress,
        session: &StepSession<R>,
    ) -> Self {
        let next_label = if progress.is_last {
            NextLabel::Finish
        } else {
            NextLabel::Next
        };

        let (quiz, transport) = match session {
            StepSession::Static => (None, None),
            StepSession::Media(controller) => (None, Some(controller.view())),
            StepSession::Quiz {
                attempt, result, ..
            } => {
                let questions = step
                    .questions()
                    .unwrap_or_default()
                    .iter()
                    .enumerate()
                    .map(|(i, q)| QuestionView {
                        id: q.id,
                        number: i + 1,
                        prompt: &q.prompt,
                        options: &q.options,
                        selected: attempt.selected(q.id),
                        answered: attempt.is_answered(q.id),
                    })
                    .collect::<Vec<_>>();
                let view = QuizView {
                    answered: attempt.answered_count(),
                    total: questions.len(),
                    can_submit: attempt.is_complete() && !attempt.is_submitted(),
                    result: result.as_ref().map(QuizResultView::from),
                    questions,
                };
                (Some(view), None)
            }
        };

        Self {
            lesson_title,
            step,
            progress,
            next_label,
            quiz,
            transport,
        }
    }
}
