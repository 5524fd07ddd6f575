use lesson_core::model::{Lesson, PlayerSettings, QuestionId, StepKind};
use lesson_core::scoring::Feedback;
use lesson_core::time::fixed_clock;
use services::progression::NextLabel;
use services::{
    InMemoryResourceFactory, LessonProgressionEngine, StepTransition, load_lesson_file,
};

fn fixture() -> Lesson {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/intro_to_programming.json"
    );
    load_lesson_file(path).unwrap()
}

fn engine() -> LessonProgressionEngine<InMemoryResourceFactory> {
    LessonProgressionEngine::new(
        fixture(),
        InMemoryResourceFactory::new().with_auto_duration(120.0),
        PlayerSettings::default(),
        fixed_clock(),
    )
}

#[test]
fn walking_through_a_five_step_lesson() {
    let mut engine = engine();
    assert_eq!(engine.progress().label, "Step 1 of 5");
    assert_eq!(engine.retreat(), StepTransition::Unchanged);

    for _ in 0..4 {
        assert!(matches!(engine.advance(), StepTransition::Moved { .. }));
    }
    assert_eq!(engine.current_index(), 4);
    assert_eq!(engine.current_step().kind(), StepKind::Quiz);
    assert_eq!(engine.progress().percent, 100);
    assert_eq!(engine.view().next_label, NextLabel::Finish);

    assert_eq!(engine.advance(), StepTransition::Unchanged);
    assert_eq!(engine.current_index(), 4);
}

#[test]
fn half_right_quiz_scores_fifty_and_suggests_review() {
    let mut engine = engine();
    for _ in 0..4 {
        engine.advance();
    }

    engine.select_answer(QuestionId::new(1), 1).unwrap();
    engine.select_answer(QuestionId::new(2), 1).unwrap();
    let view = engine.view();
    let quiz = view.quiz.as_ref().unwrap();
    assert!(quiz.can_submit);
    assert_eq!(quiz.answered, 2);

    let result = engine.submit_quiz().unwrap();
    assert_eq!(result.score, 50);
    assert_eq!(result.correct, 1);
    assert_eq!(result.total, 2);
    assert_eq!(result.feedback, Feedback::Review);

    let view = engine.view();
    let shown = view.quiz.and_then(|q| q.result).unwrap();
    assert_eq!(shown.score, 50);
    assert_eq!(shown.message, Feedback::Review.message());
}

#[test]
fn media_steps_start_paused_at_zero_with_kind_volume() {
    let mut engine = engine();
    engine.advance();
    engine.sync_media();

    let video = engine.transport().unwrap();
    assert!(!video.is_playing());
    assert_eq!(video.position(), 0.0);
    assert_eq!(video.duration(), Some(120.0));
    assert_eq!(video.volume(), 1.0);

    engine.advance();
    let audio = engine.transport().unwrap();
    assert_eq!(audio.volume(), 0.7);
    assert_eq!(engine.factory().created().len(), 2);
}

#[test]
fn interactive_and_intro_steps_have_no_transport() {
    let mut engine = engine();
    assert!(engine.transport().is_none());
    assert!(engine.view().transport.is_none());
    for _ in 0..3 {
        engine.advance();
    }
    assert_eq!(engine.current_step().kind(), StepKind::Interactive);
    assert!(engine.transport().is_none());
}
