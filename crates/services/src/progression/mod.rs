mod engine;
mod progress;
mod view;

pub use engine::{LessonProgressionEngine, StepTransition};
pub use progress::LessonProgress;
pub use view::{NextLabel, ProgressionView, QuestionView, QuizResultView, QuizView};
