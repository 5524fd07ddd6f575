use thiserror::Error;

use crate::model::media::MediaKind;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("skip seconds must be a positive, finite number")]
    InvalidSkipSeconds,

    #[error("default volume must be in [0, 1], got {0}")]
    InvalidDefaultVolume(f64),

    #[error("pass threshold must be between 0 and 100, got {0}")]
    InvalidPassThreshold(u8),
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunables for the lesson player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSettings {
    skip_seconds: f64,
    video_default_volume: f64,
    audio_default_volume: f64,
    pass_threshold: u8,
}

impl Default for PlayerSettings {
    /// Ten second skips, full-volume video, 70% audio, 80% pass mark.
    fn default() -> Self {
        Self {
            skip_seconds: 10.0,
            video_default_volume: 1.0,
            audio_default_volume: 0.7,
            pass_threshold: 80,
        }
    }
}

impl PlayerSettings {
    /// Creates custom player settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if any value is outside its accepted range.
    pub fn new(
        skip_seconds: f64,
        video_default_volume: f64,
        audio_default_volume: f64,
        pass_threshold: u8,
    ) -> Result<Self, SettingsError> {
        if !skip_seconds.is_finite() || skip_seconds <= 0.0 {
            return Err(SettingsError::InvalidSkipSeconds);
        }
        for volume in [video_default_volume, audio_default_volume] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(SettingsError::InvalidDefaultVolume(volume));
            }
        }
        if pass_threshold > 100 {
            return Err(SettingsError::InvalidPassThreshold(pass_threshold));
        }

        Ok(Self {
            skip_seconds,
            video_default_volume,
            audio_default_volume,
            pass_threshold,
        })
    }

    /// Returns a copy with a different skip interval.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidSkipSeconds` for non-positive values.
    pub fn with_skip_seconds(&self, skip_seconds: f64) -> Result<Self, SettingsError> {
        Self::new(
            skip_seconds,
            self.video_default_volume,
            self.audio_default_volume,
            self.pass_threshold,
        )
    }

    #[must_use]
    pub fn skip_seconds(&self) -> f64 {
        self.skip_seconds
    }

    /// Initial volume for a freshly bound resource of the given kind.
    #[must_use]
    pub fn default_volume(&self, kind: MediaKind) -> f64 {
        match kind {
            MediaKind::Video => self.video_default_volume,
            MediaKind::Audio => self.audio_default_volume,
        }
    }

    /// Minimum score (inclusive) that earns the "excellent" feedback.
    #[must_use]
    pub fn pass_threshold(&self) -> u8 {
        self.pass_threshold
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
