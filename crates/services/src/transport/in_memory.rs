use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lesson_core::model::{MediaKind, MediaUri};

use super::resource::{MediaResource, ResourceEvent, ResourceFactory};

/// Command received by an `InMemoryMediaResource`, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceCommand {
    Load(MediaUri),
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
    Muted(bool),
}

#[derive(Debug)]
struct SimState {
    source: Option<MediaUri>,
    duration: Option<f64>,
    position: f64,
    paused: bool,
    volume: f64,
    muted: bool,
    failed: bool,
    auto_duration: Option<f64>,
    pending: VecDeque<ResourceCommand>,
    events: VecDeque<ResourceEvent>,
    log: Vec<ResourceCommand>,
}

impl SimState {
    fn apply(&mut self, command: ResourceCommand) {
        match command {
            ResourceCommand::Play => {
                if !self.failed && self.source.is_some() {
                    self.paused = false;
                }
            }
            ResourceCommand::Pause => self.paused = true,
            ResourceCommand::Seek(target) => {
                if self.failed {
                    return;
                }
                let upper = self.duration.unwrap_or(f64::MAX);
                self.position = target.clamp(0.0, upper);
                self.events
                    .push_back(ResourceEvent::PositionChanged(self.position));
            }
            ResourceCommand::Load(_) | ResourceCommand::Volume(_) | ResourceCommand::Muted(_) => {}
        }
    }
}

/// Deterministic media resource for tests and headless runs.
///
/// `play`, `pause` and `set_position` are queued and only take effect on
/// `acknowledge_next`/`acknowledge_all`, mimicking a real element that
/// resolves commands asynchronously. Volume and mute apply immediately.
/// Clones share state, so a test can keep a handle to a resource it handed
/// to a controller.
#[derive(Debug, Clone)]
pub struct InMemoryMediaResource {
    state: Arc<Mutex<SimState>>,
}

impl Default for InMemoryMediaResource {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMediaResource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                source: None,
                duration: None,
                position: 0.0,
                paused: true,
                volume: 1.0,
                muted: false,
                failed: false,
                auto_duration: None,
                pending: VecDeque::new(),
                events: VecDeque::new(),
                log: Vec::new(),
            })),
        }
    }

    /// Resolve metadata to `duration` as soon as a source is loaded.
    #[must_use]
    pub fn with_auto_duration(self, duration: f64) -> Self {
        self.state().auto_duration = Some(duration);
        self
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Metadata arrives: the length becomes known.
    pub fn resolve_metadata(&self, duration: f64) {
        let mut state = self.state();
        state.duration = Some(duration);
        state.events.push_back(ResourceEvent::DurationKnown(duration));
    }

    /// The source fails to load; playback stops.
    pub fn fail(&self, reason: impl Into<String>) {
        let mut state = self.state();
        state.failed = true;
        state.paused = true;
        state.pending.clear();
        state
            .events
            .push_back(ResourceEvent::LoadFailed(reason.into()));
    }

    /// Apply the oldest queued command. Returns `false` when nothing was queued.
    pub fn acknowledge_next(&self) -> bool {
        let mut state = self.state();
        match state.pending.pop_front() {
            Some(command) => {
                state.apply(command);
                true
            }
            None => false,
        }
    }

    /// Apply every queued command in order.
    pub fn acknowledge_all(&self) {
        while self.acknowledge_next() {}
    }

    /// Let `seconds` of wall time pass. A playing resource moves forward,
    /// reports its position and raises `Ended` when it reaches the end.
    pub fn advance(&self, seconds: f64) {
        let mut state = self.state();
        if state.paused || state.failed || seconds <= 0.0 {
            return;
        }
        let next = state.position + seconds;
        match state.duration {
            Some(duration) if next >= duration => {
                state.position = duration;
                state.paused = true;
                state.events.push_back(ResourceEvent::PositionChanged(duration));
                state.events.push_back(ResourceEvent::Ended);
            }
            _ => {
                state.position = next;
                state.events.push_back(ResourceEvent::PositionChanged(next));
            }
        }
    }

    /// Queue an arbitrary notification, e.g. a stale position report.
    pub fn emit(&self, event: ResourceEvent) {
        self.state().events.push_back(event);
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.state().position
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.state().volume
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.state().muted
    }

    #[must_use]
    pub fn source(&self) -> Option<MediaUri> {
        self.state().source.clone()
    }

    /// Number of commands still waiting to be acknowledged.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.state().pending.len()
    }

    /// Every command received so far.
    #[must_use]
    pub fn commands(&self) -> Vec<ResourceCommand> {
        self.state().log.clone()
    }
}

impl MediaResource for InMemoryMediaResource {
    fn load(&mut self, uri: &MediaUri) {
        let mut state = self.state();
        state.log.push(ResourceCommand::Load(uri.clone()));
        state.source = Some(uri.clone());
        state.duration = None;
        state.position = 0.0;
        state.paused = true;
        state.failed = false;
        state.pending.clear();
        state.events.clear();
        if let Some(duration) = state.auto_duration {
            state.duration = Some(duration);
            state.events.push_back(ResourceEvent::DurationKnown(duration));
        }
    }

    fn play(&mut self) {
        let mut state = self.state();
        state.log.push(ResourceCommand::Play);
        state.pending.push_back(ResourceCommand::Play);
    }

    fn pause(&mut self) {
        let mut state = self.state();
        state.log.push(ResourceCommand::Pause);
        state.pending.push_back(ResourceCommand::Pause);
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn set_position(&mut self, seconds: f64) {
        let mut state = self.state();
        state.log.push(ResourceCommand::Seek(seconds));
        state.pending.push_back(ResourceCommand::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        let mut state = self.state();
        state.log.push(ResourceCommand::Volume(volume));
        state.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        let mut state = self.state();
        state.log.push(ResourceCommand::Muted(muted));
        state.muted = muted;
    }

    fn poll_event(&mut self) -> Option<ResourceEvent> {
        self.state().events.pop_front()
    }
}

/// Hands out `InMemoryMediaResource`s and keeps a handle to each one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceFactory {
    auto_duration: Option<f64>,
    created: Vec<(MediaKind, InMemoryMediaResource)>,
}

impl InMemoryResourceFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every created resource resolves its metadata to `duration` on load.
    #[must_use]
    pub fn with_auto_duration(mut self, duration: f64) -> Self {
        self.auto_duration = Some(duration);
        self
    }

    /// Resources created so far, oldest first.
    #[must_use]
    pub fn created(&self) -> &[(MediaKind, InMemoryMediaResource)] {
        &self.created
    }

    /// Most recently created resource.
    #[must_use]
    pub fn latest(&self) -> Option<&InMemoryMediaResource> {
        self.created.last().map(|(_, resource)| resource)
    }
}

impl ResourceFactory for InMemoryResourceFactory {
    type Resource = InMemoryMediaResource;

    fn create(&mut self, kind: MediaKind, _uri: &MediaUri) -> Self::Resource {
        let mut resource = InMemoryMediaResource::new();
        if let Some(duration) = self.auto_duration {
            resource = resource.with_auto_duration(duration);
        }
        self.created.push((kind, resource.clone()));
        resource
    }
}
