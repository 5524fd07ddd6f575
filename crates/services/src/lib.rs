#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod loader;
pub mod progression;
pub mod transport;

pub use lesson_core::Clock;

pub use catalog::CourseBrowser;
pub use error::{CatalogError, ErrorKind, LessonLoadError, ProgressionError, TransportError};
pub use loader::{load_course_str, load_lesson_file, load_lesson_str};
pub use progression::{LessonProgress, LessonProgressionEngine, ProgressionView, StepTransition};
pub use transport::{
    InMemoryMediaResource, InMemoryResourceFactory, MediaResource, MediaTransportController,
    ResourceEvent, ResourceFactory, TransportNotification, TransportView,
};
