use std::fmt;
use std::mem;

use lesson_core::Clock;
use lesson_core::model::{
    AnswerKey, Lesson, LessonStep, MediaKind, MediaUri, PlayerSettings, QuestionId, QuizAttempt,
};
use lesson_core::scoring::{self, QuizResult};

use super::progress::LessonProgress;
use super::view::ProgressionView;
use crate::error::ProgressionError;
use crate::transport::{
    MediaResource, MediaTransportController, ResourceFactory, TransportNotification,
};

//
// ─── STEP SESSION ──────────────────────────────────────────────────────────────
//

/// State owned by the active step. Replaced wholesale on every transition.
pub(crate) enum StepSession<R: MediaResource> {
    Static,
    Media(MediaTransportController<R>),
    Quiz {
        key: AnswerKey,
        attempt: QuizAttempt,
        result: Option<QuizResult>,
    },
}

impl<R: MediaResource> StepSession<R> {
    fn open<F>(step: &LessonStep, factory: &mut F, settings: &PlayerSettings) -> Self
    where
        F: ResourceFactory<Resource = R>,
    {
        match step {
            LessonStep::Intro { .. } | LessonStep::Interactive { .. } => StepSession::Static,
            LessonStep::Video { source, .. } => {
                Self::media(MediaKind::Video, source, factory, settings)
            }
            LessonStep::Audio { source, .. } => {
                Self::media(MediaKind::Audio, source, factory, settings)
            }
            LessonStep::Quiz { questions, .. } => StepSession::Quiz {
                key: AnswerKey::from_questions(questions),
                attempt: QuizAttempt::for_questions(questions),
                result: None,
            },
        }
    }

    fn media<F>(
        kind: MediaKind,
        source: &MediaUri,
        factory: &mut F,
        settings: &PlayerSettings,
    ) -> Self
    where
        F: ResourceFactory<Resource = R>,
    {
        let resource = factory.create(kind, source);
        let mut controller = MediaTransportController::new(resource, kind, settings);
        controller.bind(source);
        StepSession::Media(controller)
    }

    fn close(self) {
        if let StepSession::Media(controller) = self {
            controller.release();
        }
    }
}

//
// ─── TRANSITION ────────────────────────────────────────────────────────────────
//

/// Outcome of `advance`/`retreat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
    Moved { from: usize, to: usize },
    /// Already at the boundary; nothing changed.
    Unchanged,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Linear walk through a lesson's steps.
///
/// Exactly one step is active. Entering a media step binds a fresh transport
/// controller, entering a quiz step starts an empty attempt, and leaving a step
/// discards whatever it owned. Navigation is never gated on completion.
pub struct LessonProgressionEngine<F: ResourceFactory> {
    lesson: Lesson,
    current: usize,
    session: StepSession<F::Resource>,
    factory: F,
    settings: PlayerSettings,
    clock: Clock,
}

impl<F: ResourceFactory> LessonProgressionEngine<F> {
    /// Opens `lesson` at its first step.
    #[must_use]
    pub fn new(lesson: Lesson, mut factory: F, settings: PlayerSettings, clock: Clock) -> Self {
        let session = match lesson.step(0) {
            Some(step) => StepSession::open(step, &mut factory, &settings),
            None => StepSession::Static,
        };
        tracing::debug!(lesson = %lesson.id(), steps = lesson.step_count(), "lesson opened");
        Self {
            lesson,
            current: 0,
            session,
            factory,
            settings,
            clock,
        }
    }

    // ─── Navigation ────────────────────────────────────────────────────────────

    /// Move to the next step; `Unchanged` on the last step.
    pub fn advance(&mut self) -> StepTransition {
        if self.current >= self.lesson.last_index() {
            return StepTransition::Unchanged;
        }
        self.move_to(self.current + 1)
    }

    /// Move to the previous step; `Unchanged` on the first step.
    pub fn retreat(&mut self) -> StepTransition {
        if self.current == 0 {
            return StepTransition::Unchanged;
        }
        self.move_to(self.current - 1)
    }

    fn move_to(&mut self, index: usize) -> StepTransition {
        let Some(step) = self.lesson.step(index) else {
            return StepTransition::Unchanged;
        };
        let from = self.current;

        // The old step must be fully released before the new one opens.
        mem::replace(&mut self.session, StepSession::Static).close();
        self.session = StepSession::open(step, &mut self.factory, &self.settings);
        self.current = index;

        tracing::debug!(from, to = index, kind = step.kind().as_str(), "step changed");
        StepTransition::Moved { from, to: index }
    }

    // ─── Quiz ──────────────────────────────────────────────────────────────────

    /// Record an answer on the active quiz step.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::NotAQuizStep` off quiz steps, or the
    /// attempt's `QuizError` when the selection is rejected.
    pub fn select_answer(
        &mut self,
        question: QuestionId,
        option: usize,
    ) -> Result<(), ProgressionError> {
        let StepSession::Quiz { attempt, .. } = &mut self.session else {
            return Err(ProgressionError::NotAQuizStep);
        };
        attempt.select(question, option)?;
        Ok(())
    }

    /// Submit and score the active quiz step.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::NotAQuizStep` off quiz steps and
    /// `ProgressionError::Quiz` for incomplete or already submitted attempts.
    pub fn submit_quiz(&mut self) -> Result<QuizResult, ProgressionError> {
        let StepSession::Quiz {
            key,
            attempt,
            result,
        } = &mut self.session
        else {
            return Err(ProgressionError::NotAQuizStep);
        };

        let scored = scoring::submit(attempt, key, self.settings.pass_threshold(), self.clock.now())
            .inspect_err(|err| tracing::warn!(%err, "quiz submission rejected"))?;
        tracing::debug!(score = scored.score, correct = scored.correct, total = scored.total, "quiz submitted");
        *result = Some(scored.clone());
        Ok(scored)
    }

    #[must_use]
    pub fn quiz_attempt(&self) -> Option<&QuizAttempt> {
        match &self.session {
            StepSession::Quiz { attempt, .. } => Some(attempt),
            _ => None,
        }
    }

    #[must_use]
    pub fn quiz_result(&self) -> Option<&QuizResult> {
        match &self.session {
            StepSession::Quiz { result, .. } => result.as_ref(),
            _ => None,
        }
    }

    // ─── Media ─────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn transport(&self) -> Option<&MediaTransportController<F::Resource>> {
        match &self.session {
            StepSession::Media(controller) => Some(controller),
            _ => None,
        }
    }

    /// Controller of the active media step.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::NotAMediaStep` when the active step has no media.
    pub fn transport_mut(
        &mut self,
    ) -> Result<&mut MediaTransportController<F::Resource>, ProgressionError> {
        match &mut self.session {
            StepSession::Media(controller) => Ok(controller),
            _ => Err(ProgressionError::NotAMediaStep),
        }
    }

    /// Drain pending resource events for the active media step.
    pub fn sync_media(&mut self) -> Vec<TransportNotification> {
        match &mut self.session {
            StepSession::Media(controller) => controller.sync(),
            _ => Vec::new(),
        }
    }

    // ─── Queries ───────────────────────────────────────────────────────────────

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.lesson.step_count()
    }

    #[must_use]
    pub fn current_step(&self) -> &LessonStep {
        // `Lesson` always holds at least one step and `current` stays in range.
        &self.lesson.steps()[self.current]
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current >= self.lesson.last_index()
    }

    #[must_use]
    pub fn progress(&self) -> LessonProgress {
        LessonProgress::new(self.current, self.lesson.step_count())
    }

    #[must_use]
    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    #[must_use]
    pub fn view(&self) -> ProgressionView<'_> {
        ProgressionView::build(
            self.current_step(),
            self.lesson.title(),
            self.progress(),
            &self.session,
        )
    }
}

impl<F: ResourceFactory> fmt::Debug for LessonProgressionEngine<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonProgressionEngine")
            .field("lesson_id", &self.lesson.id())
            .field("step_count", &self.lesson.step_count())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProgressionError;
    use crate::transport::InMemoryResourceFactory;
    use lesson_core::model::{
        GlossaryEntry, LessonDraft, LessonId, QuizError, QuizQuestion, StepId,
    };
    use lesson_core::scoring::Feedback;
    use lesson_core::time::{fixed_clock, fixed_now};

    fn question(id: u64, correct: usize) -> QuizQuestion {
        QuizQuestion::new(
            QuestionId::new(id),
            format!("Question {id}"),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct,
        )
    }

    fn lesson() -> Lesson {
        LessonDraft {
            id: LessonId::new(1),
            title: "Intro to Programming".into(),
            course_title: "Programming Basics".into(),
            steps: vec![
                LessonStep::Intro {
                    id: StepId::new(1),
                    title: "Welcome".into(),
                    text: "Why programming matters.".into(),
                    emblem: None,
                },
                LessonStep::Video {
                    id: StepId::new(2),
                    title: "What is programming?".into(),
                    source: MediaUri::parse("https://example.com/intro.mp4").unwrap(),
                    description: String::new(),
                    poster: None,
                },
                LessonStep::Audio {
                    id: StepId::new(3),
                    title: "History of computing".into(),
                    source: MediaUri::parse("https://example.com/history.wav").unwrap(),
                    description: String::new(),
                    narrator: None,
                },
                LessonStep::Interactive {
                    id: StepId::new(4),
                    title: "Key concepts".into(),
                    entries: vec![GlossaryEntry::new("Loop", "Repeated execution")],
                },
                LessonStep::Quiz {
                    id: StepId::new(5),
                    title: "Check yourself".into(),
                    questions: vec![question(1, 1), question(2, 1)],
                },
            ],
        }
        .validate()
        .unwrap()
    }

    fn engine() -> LessonProgressionEngine<InMemoryResourceFactory> {
        LessonProgressionEngine::new(
            lesson(),
            InMemoryResourceFactory::new(),
            PlayerSettings::default(),
            fixed_clock(),
        )
    }

    #[test]
    fn boundaries_are_silent_no_ops() {
        let mut engine = engine();
        assert_eq!(engine.retreat(), StepTransition::Unchanged);
        assert_eq!(engine.current_index(), 0);

        for expected in 1..=4 {
            assert_eq!(
                engine.advance(),
                StepTransition::Moved {
                    from: expected - 1,
                    to: expected
                }
            );
        }
        assert!(engine.is_last());
        assert_eq!(engine.advance(), StepTransition::Unchanged);
        assert_eq!(engine.current_index(), 4);
    }

    #[test]
    fn media_steps_get_fresh_controllers() {
        let mut engine = engine();
        assert!(engine.transport().is_none());

        engine.advance();
        assert_eq!(engine.transport().map(|c| c.kind()), Some(MediaKind::Video));
        engine.advance();
        assert_eq!(engine.transport().map(|c| c.kind()), Some(MediaKind::Audio));
        assert_eq!(engine.transport().map(|c| c.volume()), Some(0.7));

        engine.retreat();
        assert_eq!(engine.factory().created().len(), 3);
        assert_eq!(engine.transport().map(|c| c.position()), Some(0.0));
    }

    #[test]
    fn leaving_a_playing_step_stops_playback() {
        let mut engine = engine();
        engine.advance();
        let resource = engine.factory().latest().cloned().unwrap();
        resource.resolve_metadata(120.0);
        engine.sync_media();
        engine.transport_mut().unwrap().play().unwrap();
        resource.acknowledge_all();
        assert!(!resource.is_paused());

        engine.advance();
        resource.acknowledge_all();
        assert!(resource.is_paused());
    }

    #[test]
    fn quiz_operations_require_a_quiz_step() {
        let mut engine = engine();
        assert_eq!(
            engine.select_answer(QuestionId::new(1), 0).unwrap_err(),
            ProgressionError::NotAQuizStep
        );
        assert_eq!(engine.submit_quiz().unwrap_err(), ProgressionError::NotAQuizStep);
        assert_eq!(
            engine.transport_mut().unwrap_err(),
            ProgressionError::NotAMediaStep
        );
    }

    #[test]
    fn quiz_submission_scores_and_freezes() {
        let mut engine = engine();
        for _ in 0..4 {
            engine.advance();
        }
        engine.select_answer(QuestionId::new(1), 1).unwrap();
        let err = engine.submit_quiz().unwrap_err();
        assert!(matches!(
            err,
            ProgressionError::Quiz(QuizError::IncompleteAttempt { .. })
        ));
        assert!(engine.quiz_result().is_none());

        engine.select_answer(QuestionId::new(2), 0).unwrap();
        let result = engine.submit_quiz().unwrap();
        assert_eq!(result.score, 50);
        assert_eq!(result.feedback, Feedback::Review);
        assert_eq!(result.submitted_at, fixed_now());
        assert_eq!(engine.quiz_result(), Some(&result));

        assert_eq!(
            engine.select_answer(QuestionId::new(2), 1).unwrap_err(),
            ProgressionError::Quiz(QuizError::AlreadySubmitted)
        );
    }

    #[test]
    fn reentering_a_quiz_starts_a_new_attempt() {
        let mut engine = engine();
        for _ in 0..4 {
            engine.advance();
        }
        engine.select_answer(QuestionId::new(1), 1).unwrap();
        engine.retreat();
        engine.advance();
        assert_eq!(engine.quiz_attempt().map(QuizAttempt::answered_count), Some(0));
    }

    #[test]
    fn advancing_is_not_gated_on_completion() {
        let mut engine = engine();
        engine.advance();
        assert!(!engine.transport().unwrap().is_playing());
        assert!(matches!(engine.advance(), StepTransition::Moved { .. }));
        engine.advance();
        engine.advance();
        assert!(engine.quiz_result().is_none());
        assert_eq!(engine.advance(), StepTransition::Unchanged);
        assert!(engine.is_last());
    }
}
