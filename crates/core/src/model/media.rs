use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaValidationError {
    #[error("Media URI cannot be empty.")]
    EmptyMediaUri,

    #[error("Media URI is not a valid URL: {0}")]
    InvalidUrl(String),
}

//
// ─── MEDIA CORE TYPES ──────────────────────────────────────────────────────────
//

/// Kind of time-based media a lesson step plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => f.write_str("video"),
            MediaKind::Audio => f.write_str("audio"),
        }
    }
}

/// Location of a media resource: a remote URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MediaUri {
    FilePath(PathBuf),
    Url(Url),
}

impl MediaUri {
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, MediaValidationError> {
        let p = path.into();
        if p.as_os_str().is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        Ok(MediaUri::FilePath(p))
    }

    pub fn from_url(url: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let s = url.as_ref().trim();
        if s.is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        let u = Url::parse(s).map_err(|err| MediaValidationError::InvalidUrl(err.to_string()))?;
        Ok(MediaUri::Url(u))
    }

    /// Parses free-form input: anything with a `scheme://` prefix is a URL,
    /// everything else is treated as a file path.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        if s.contains("://") {
            Self::from_url(s)
        } else {
            Self::from_file(s)
        }
    }
}

impl fmt::Display for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaUri::FilePath(p) => write!(f, "{}", p.display()),
            MediaUri::Url(u) => f.write_str(u.as_str()),
        }
    }
}

impl TryFrom<String> for MediaUri {
    type Error = MediaValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MediaUri> for String {
    fn from(value: MediaUri) -> Self {
        value.to_string()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        let remote = MediaUri::parse("https://cdn.example.com/intro.mp4").unwrap();
        assert!(matches!(&remote, MediaUri::Url(u) if u.host_str() == Some("cdn.example.com")));
        assert_eq!(remote.to_string(), "https://cdn.example.com/intro.mp4");

        let local = MediaUri::parse("media/bell.wav").unwrap();
        assert_eq!(local, MediaUri::FilePath(PathBuf::from("media/bell.wav")));
    }

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(
            MediaUri::parse("   ").unwrap_err(),
            MediaValidationError::EmptyMediaUri
        );
        assert_eq!(
            MediaUri::from_file("").unwrap_err(),
            MediaValidationError::EmptyMediaUri
        );
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err = MediaUri::parse("http://").unwrap_err();
        assert!(matches!(err, MediaValidationError::InvalidUrl(_)));
    }

    #[test]
    fn media_uri_deserializes_from_string() {
        let uri: MediaUri = serde_json::from_str("\"https://example.com/a.mp3\"").unwrap();
        assert!(matches!(uri, MediaUri::Url(_)));
        let err = serde_json::from_str::<MediaUri>("\"\"");
        assert!(err.is_err());
    }
}
