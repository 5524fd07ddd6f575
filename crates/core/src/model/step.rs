use serde::{Deserialize, Serialize};

use crate::model::ids::StepId;
use crate::model::media::{MediaKind, MediaUri};
use crate::model::quiz::QuizQuestion;

//
// ─── GLOSSARY ──────────────────────────────────────────────────────────────────
//

/// A term/definition pair shown on an interactive step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
}

impl GlossaryEntry {
    #[must_use]
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

//
// ─── STEP KIND ─────────────────────────────────────────────────────────────────
//

/// Discriminant of a `LessonStep`, handy for views and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Intro,
    Video,
    Audio,
    Interactive,
    Quiz,
}

impl StepKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Intro => "intro",
            StepKind::Video => "video",
            StepKind::Audio => "audio",
            StepKind::Interactive => "interactive",
            StepKind::Quiz => "quiz",
        }
    }
}

//
// ─── LESSON STEP ───────────────────────────────────────────────────────────────
//

/// One unit of lesson content.
///
/// Steps are tagged by `type` when deserialized, e.g.
/// `{"type": "video", "id": 2, "title": "...", "source": "https://..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LessonStep {
    Intro {
        id: StepId,
        title: String,
        #[serde(default)]
        text: String,
        #[serde(default)]
        emblem: Option<String>,
    },
    Video {
        id: StepId,
        title: String,
        source: MediaUri,
        #[serde(default)]
        description: String,
        #[serde(default)]
        poster: Option<MediaUri>,
    },
    Audio {
        id: StepId,
        title: String,
        source: MediaUri,
        #[serde(default)]
        description: String,
        #[serde(default)]
        narrator: Option<String>,
    },
    Interactive {
        id: StepId,
        title: String,
        entries: Vec<GlossaryEntry>,
    },
    Quiz {
        id: StepId,
        title: String,
        questions: Vec<QuizQuestion>,
    },
}

impl LessonStep {
    #[must_use]
    pub fn id(&self) -> StepId {
        match self {
            LessonStep::Intro { id, .. }
            | LessonStep::Video { id, .. }
            | LessonStep::Audio { id, .. }
            | LessonStep::Interactive { id, .. }
            | LessonStep::Quiz { id, .. } => *id,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            LessonStep::Intro { title, .. }
            | LessonStep::Video { title, .. }
            | LessonStep::Audio { title, .. }
            | LessonStep::Interactive { title, .. }
            | LessonStep::Quiz { title, .. } => title,
        }
    }

    #[must_use]
    pub fn kind(&self) -> StepKind {
        match self {
            LessonStep::Intro { .. } => StepKind::Intro,
            LessonStep::Video { .. } => StepKind::Video,
            LessonStep::Audio { .. } => StepKind::Audio,
            LessonStep::Interactive { .. } => StepKind::Interactive,
            LessonStep::Quiz { .. } => StepKind::Quiz,
        }
    }

    /// Media kind and source for video/audio steps.
    #[must_use]
    pub fn media(&self) -> Option<(MediaKind, &MediaUri)> {
        match self {
            LessonStep::Video { source, .. } => Some((MediaKind::Video, source)),
            LessonStep::Audio { source, .. } => Some((MediaKind::Audio, source)),
            _ => None,
        }
    }

    /// Questions of a quiz step.
    #[must_use]
    pub fn questions(&self) -> Option<&[QuizQuestion]> {
        match self {
            LessonStep::Quiz { questions, .. } => Some(questions),
            _ => None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
