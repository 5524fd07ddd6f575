use lesson_core::model::{MediaKind, MediaUri, PlayerSettings};

use super::resource::{MediaResource, ResourceEvent};
use super::view::TransportView;
use crate::error::TransportError;

/// A position report within this distance of a pending seek target
/// always acknowledges that seek.
pub const SEEK_TOLERANCE_SECONDS: f64 = 0.25;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Load phase of the bound resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Source requested, metadata not resolved yet.
    Loading,
    /// Duration is known.
    Ready,
    /// Source failed to load; the controller is inert.
    Failed,
}

/// Seek sent to the resource but not yet reflected in a position report.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingSeek {
    target: f64,
    /// Where the resource was heading before this seek: the displayed
    /// position, or the target of the seek it superseded.
    from: f64,
}

impl PendingSeek {
    /// A report acknowledges the seek when it is within tolerance of the
    /// target or lies closer to the target than to where playback came from.
    /// Resources that snap to a keyframe land near, not on, the target.
    fn acknowledged_by(&self, position: f64) -> bool {
        let to_target = (position - self.target).abs();
        to_target <= SEEK_TOLERANCE_SECONDS || to_target <= (position - self.from).abs()
    }
}

/// Notification forwarded to the presentation layer after an event is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportNotification {
    PositionChanged(f64),
    DurationKnown(f64),
    PlaybackEnded,
    LoadFailed(String),
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Play/pause/seek/volume front-end for one media resource.
///
/// Commands update the controller's state synchronously and are forwarded to
/// the resource as requests. Resource events are folded back in through
/// `handle_event`, where the latest command always wins: stale position
/// reports are discarded and a resource still playing after a pause request
/// is told to pause again.
pub struct MediaTransportController<R: MediaResource> {
    resource: R,
    kind: MediaKind,
    source: Option<MediaUri>,
    load_state: LoadState,
    duration: Option<f64>,
    position: f64,
    pending_seek: Option<PendingSeek>,
    playing: bool,
    ended: bool,
    volume: f64,
    muted: bool,
    skip_seconds: f64,
}

impl<R: MediaResource> MediaTransportController<R> {
    /// Wraps `resource` using the default volume and skip step for `kind`.
    #[must_use]
    pub fn new(resource: R, kind: MediaKind, settings: &PlayerSettings) -> Self {
        Self {
            resource,
            kind,
            source: None,
            load_state: LoadState::Loading,
            duration: None,
            position: 0.0,
            pending_seek: None,
            playing: false,
            ended: false,
            volume: settings.default_volume(kind),
            muted: false,
            skip_seconds: settings.skip_seconds(),
        }
    }

    /// Attach to `uri`: position 0, paused, duration unknown.
    ///
    /// Volume and mute carry over and are pushed to the resource.
    pub fn bind(&mut self, uri: &MediaUri) {
        tracing::debug!(kind = %self.kind, %uri, "binding media resource");
        self.source = Some(uri.clone());
        self.load_state = LoadState::Loading;
        self.duration = None;
        self.position = 0.0;
        self.pending_seek = None;
        self.playing = false;
        self.ended = false;
        self.resource.load(uri);
        self.resource.set_volume(self.volume);
        self.resource.set_muted(self.muted);
    }

    // ─── Commands ──────────────────────────────────────────────────────────────

    /// Request playback. A no-op when already playing.
    ///
    /// Playing after the end of a play-through restarts from the beginning.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ResourceUnavailable` if the resource failed to load.
    pub fn play(&mut self) -> Result<(), TransportError> {
        if self.load_state == LoadState::Failed {
            tracing::warn!(kind = %self.kind, "play rejected: resource unavailable");
            return Err(TransportError::ResourceUnavailable);
        }
        if self.playing {
            return Ok(());
        }
        if self.ended {
            self.request_seek(0.0);
        }
        self.playing = true;
        self.resource.play();
        Ok(())
    }

    /// Request a pause. A no-op when already paused.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.resource.pause();
    }

    /// Flip between playing and paused; returns the new `playing` value.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ResourceUnavailable` when asked to play a failed resource.
    pub fn toggle_playback(&mut self) -> Result<bool, TransportError> {
        if self.playing {
            self.pause();
        } else {
            self.play()?;
        }
        Ok(self.playing)
    }

    /// Seek to `target` seconds, clamped to `[0, duration]`.
    ///
    /// Returns the clamped target. The reported position moves once the
    /// resource acknowledges the seek.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidOperation` while the duration is unknown
    /// or for a non-finite target, and `TransportError::ResourceUnavailable`
    /// once the resource has failed.
    pub fn seek(&mut self, target: f64) -> Result<f64, TransportError> {
        let duration = self.seekable_duration()?;
        if !target.is_finite() {
            return Err(TransportError::InvalidOperation("seek target must be finite"));
        }
        let clamped = target.clamp(0.0, duration);
        tracing::debug!(kind = %self.kind, target, clamped, "seek requested");
        self.request_seek(clamped);
        Ok(clamped)
    }

    /// Seek to `fraction` of the duration, e.g. from a click on a progress bar.
    ///
    /// # Errors
    ///
    /// Same as [`seek`](Self::seek); a non-finite fraction is an invalid operation.
    pub fn seek_by_fraction(&mut self, fraction: f64) -> Result<f64, TransportError> {
        let duration = self.seekable_duration()?;
        if !fraction.is_finite() {
            return Err(TransportError::InvalidOperation("seek fraction must be finite"));
        }
        self.seek(fraction.clamp(0.0, 1.0) * duration)
    }

    /// Relative seek from the latest requested position.
    ///
    /// # Errors
    ///
    /// Same as [`seek`](Self::seek).
    pub fn skip(&mut self, delta_seconds: f64) -> Result<f64, TransportError> {
        let from = self.pending_seek().unwrap_or(self.position);
        self.seek(from + delta_seconds)
    }

    /// Skip ahead by the configured step.
    ///
    /// # Errors
    ///
    /// Same as [`seek`](Self::seek).
    pub fn skip_forward(&mut self) -> Result<f64, TransportError> {
        self.skip(self.skip_seconds)
    }

    /// Skip back by the configured step.
    ///
    /// # Errors
    ///
    /// Same as [`seek`](Self::seek).
    pub fn skip_back(&mut self) -> Result<f64, TransportError> {
        self.skip(-self.skip_seconds)
    }

    /// Store a new volume, clamped to `[0, 1]`. Mute state is left alone.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidOperation` for `NaN`.
    pub fn set_volume(&mut self, volume: f64) -> Result<f64, TransportError> {
        if volume.is_nan() {
            return Err(TransportError::InvalidOperation("volume must be a number"));
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.resource.set_volume(self.volume);
        Ok(self.volume)
    }

    /// Flip mute; returns the new `muted` value. Stored volume is kept.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.resource.set_muted(self.muted);
        self.muted
    }

    /// Stop playback and hand the controller back for disposal.
    pub fn release(mut self) {
        tracing::debug!(kind = %self.kind, playing = self.playing, "releasing media resource");
        self.stop();
    }

    fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            self.resource.pause();
        }
        self.pending_seek = None;
    }

    fn seekable_duration(&self) -> Result<f64, TransportError> {
        match (self.duration, self.load_state) {
            (None, _) => Err(TransportError::InvalidOperation("duration is not known yet")),
            (Some(_), LoadState::Failed) => Err(TransportError::ResourceUnavailable),
            (Some(duration), _) => Ok(duration),
        }
    }

    fn request_seek(&mut self, target: f64) {
        let from = self.pending_seek().unwrap_or(self.position);
        self.pending_seek = Some(PendingSeek { target, from });
        self.ended = false;
        self.resource.set_position(target);
    }

    // ─── Events ────────────────────────────────────────────────────────────────

    /// Drain every queued resource event, returning the notifications to forward.
    pub fn sync(&mut self) -> Vec<TransportNotification> {
        let mut out = Vec::new();
        while let Some(event) = self.resource.poll_event() {
            if let Some(notification) = self.handle_event(event) {
                out.push(notification);
            }
        }
        out
    }

    /// Fold one resource event into the controller.
    ///
    /// Returns `None` when the event is stale or a duplicate.
    pub fn handle_event(&mut self, event: ResourceEvent) -> Option<TransportNotification> {
        if self.load_state == LoadState::Failed {
            return None;
        }

        let notification = match event {
            ResourceEvent::LoadFailed(reason) => {
                tracing::warn!(kind = %self.kind, %reason, "media failed to load");
                self.load_state = LoadState::Failed;
                self.playing = false;
                self.pending_seek = None;
                return Some(TransportNotification::LoadFailed(reason));
            }
            ResourceEvent::DurationKnown(duration) => self.on_duration(duration),
            ResourceEvent::PositionChanged(position) => self.on_position(position),
            ResourceEvent::Ended => self.on_ended(),
        };

        self.reconcile();
        notification
    }

    fn on_duration(&mut self, duration: f64) -> Option<TransportNotification> {
        if self.duration.is_some() || !duration.is_finite() || duration < 0.0 {
            tracing::trace!(kind = %self.kind, duration, "ignoring duration report");
            return None;
        }
        self.duration = Some(duration);
        self.load_state = LoadState::Ready;
        self.position = self.position.min(duration);
        Some(TransportNotification::DurationKnown(duration))
    }

    fn on_position(&mut self, reported: f64) -> Option<TransportNotification> {
        if !reported.is_finite() {
            return None;
        }
        let position = match self.duration {
            Some(duration) => reported.clamp(0.0, duration),
            None => reported.max(0.0),
        };

        if let Some(seek) = self.pending_seek {
            if !seek.acknowledged_by(position) {
                tracing::trace!(
                    kind = %self.kind,
                    position,
                    target = seek.target,
                    "discarding stale position"
                );
                return None;
            }
            self.pending_seek = None;
            // A seek that lands short of the end starts a new play-through.
            if self.duration.is_none_or(|duration| position < duration) {
                self.ended = false;
            }
        } else if position < self.position {
            tracing::trace!(kind = %self.kind, position, shown = self.position, "discarding regressing position");
            return None;
        }

        self.position = position;
        Some(TransportNotification::PositionChanged(position))
    }

    fn on_ended(&mut self) -> Option<TransportNotification> {
        if self.ended {
            return None;
        }
        self.ended = true;
        self.playing = false;
        // With a seek in flight the displayed position waits for its acknowledgement.
        if let (Some(duration), None) = (self.duration, self.pending_seek) {
            self.position = duration;
        }
        Some(TransportNotification::PlaybackEnded)
    }

    /// A resource may pause on its own (end of media, stalls), but it must not
    /// keep playing after a pause request.
    fn reconcile(&mut self) {
        if !self.playing && !self.resource.is_paused() {
            tracing::debug!(kind = %self.kind, "resource playing against request; pausing");
            self.resource.pause();
        }
    }

    // ─── Queries ───────────────────────────────────────────────────────────────

    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    #[must_use]
    pub fn source(&self) -> Option<&MediaUri> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Last acknowledged position in seconds.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Seek target still waiting for acknowledgement, if any.
    #[must_use]
    pub fn pending_seek(&self) -> Option<f64> {
        self.pending_seek.map(|seek| seek.target)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Stored volume, independent of mute.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Audible output level: 0 while muted, otherwise the stored volume.
    #[must_use]
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// `position / duration` in `[0, 1]`; 0 while the duration is unknown or zero.
    #[must_use]
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.position / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn view(&self) -> TransportView {
        TransportView::from_controller(self)
    }
}

impl<R: MediaResource> Drop for MediaTransportController<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<R: MediaResource> std::fmt::Debug for MediaTransportController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaTransportController")
            .field("kind", &self.kind)
            .field("load_state", &self.load_state)
            .field("duration", &self.duration)
            .field("position", &self.position)
            .field("pending_seek", &self.pending_seek())
            .field("playing", &self.playing)
            .field("volume", &self.volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
