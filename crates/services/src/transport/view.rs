use serde::Serialize;

use lesson_core::model::MediaKind;
use lesson_core::time::format_mm_ss;

use super::controller::{LoadState, MediaTransportController};
use super::resource::MediaResource;

/// Display-ready snapshot of a transport controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportView {
    pub kind: MediaKind,
    pub elapsed: String,
    pub remaining: String,
    pub total: String,
    pub progress: f64,
    pub progress_percent: u8,
    pub playing: bool,
    pub muted: bool,
    pub volume_percent: u8,
    pub duration_known: bool,
    pub load_failed: bool,
}

impl TransportView {
    #[must_use]
    pub fn from_controller<R: MediaResource>(controller: &MediaTransportController<R>) -> Self {
        let position = controller.position();
        let duration = controller.duration();
        let remaining = duration.map_or(0.0, |d| (d - position).max(0.0));
        let progress = controller.progress();

        Self {
            kind: controller.kind(),
            elapsed: format_mm_ss(position),
            remaining: format_mm_ss(remaining),
            total: format_mm_ss(duration.unwrap_or(0.0)),
            progress,
            progress_percent: to_percent(progress),
            playing: controller.is_playing(),
            muted: controller.is_muted(),
            volume_percent: to_percent(controller.effective_volume()),
            duration_known: duration.is_some(),
            load_failed: controller.load_state() == LoadState::Failed,
        }
    }
}

fn to_percent(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}
