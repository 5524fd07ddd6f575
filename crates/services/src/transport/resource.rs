use lesson_core::model::{MediaKind, MediaUri};

/// Asynchronous notification raised by a media resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// Playback head moved; raised at the resource's own cadence and after seeks.
    PositionChanged(f64),
    /// Metadata resolved and the total length is known.
    DurationKnown(f64),
    /// Playback reached the end.
    Ended,
    /// The source could not be loaded.
    LoadFailed(String),
}

/// Time-based media element driven by `MediaTransportController`.
///
/// Commands are requests: the resource applies them on its own schedule and
/// reports what actually happened through `poll_event`.
pub trait MediaResource {
    /// Start loading `uri`, discarding any previous source.
    fn load(&mut self, uri: &MediaUri);

    fn play(&mut self);

    fn pause(&mut self);

    /// Whether the resource is currently paused, as far as it knows.
    fn is_paused(&self) -> bool;

    fn set_position(&mut self, seconds: f64);

    fn set_volume(&mut self, volume: f64);

    fn set_muted(&mut self, muted: bool);

    /// Next queued notification, oldest first.
    fn poll_event(&mut self) -> Option<ResourceEvent>;
}

/// Creates resources for the media steps of a lesson.
pub trait ResourceFactory {
    type Resource: MediaResource;

    fn create(&mut self, kind: MediaKind, uri: &MediaUri) -> Self::Resource;
}
