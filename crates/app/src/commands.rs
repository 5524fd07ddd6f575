use std::fmt;

use lesson_core::model::QuestionId;
use lesson_core::time::format_mm_ss;
use services::{
    InMemoryResourceFactory, LessonProgressionEngine, ProgressionError, StepTransition,
    TransportNotification,
};

/// One line of operator input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Next,
    Prev,
    Play,
    Pause,
    Toggle,
    Seek(f64),
    SeekPercent(f64),
    Forward,
    Back,
    Volume(f64),
    Mute,
    Tick(f64),
    Answer { question: QuestionId, option: usize },
    Submit,
    Status,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str },
    InvalidNumber { command: &'static str, raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw}"),
            CommandError::MissingArgument { command } => {
                write!(f, "{command} requires an argument")
            }
            CommandError::InvalidNumber { command, raw } => {
                write!(f, "invalid {command} argument: {raw}")
            }
        }
    }
}

impl std::error::Error for CommandError {}

fn argument<T: std::str::FromStr>(
    parts: &mut std::str::SplitWhitespace<'_>,
    command: &'static str,
) -> Result<T, CommandError> {
    let raw = parts.next().ok_or(CommandError::MissingArgument { command })?;
    raw.parse().map_err(|_| CommandError::InvalidNumber {
        command,
        raw: raw.to_string(),
    })
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut parts = line.split_whitespace();
        let word = parts.next().ok_or(CommandError::Empty)?;
        let command = match word {
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "play" => Self::Play,
            "pause" => Self::Pause,
            "toggle" | "space" => Self::Toggle,
            "seek" => Self::Seek(argument(&mut parts, "seek")?),
            "seekpct" => Self::SeekPercent(argument(&mut parts, "seekpct")?),
            "fwd" => Self::Forward,
            "back" => Self::Back,
            "vol" => Self::Volume(argument(&mut parts, "vol")?),
            "mute" => Self::Mute,
            "tick" => Self::Tick(argument(&mut parts, "tick").or_else(|err| match err {
                CommandError::MissingArgument { .. } => Ok(1.0),
                other => Err(other),
            })?),
            "answer" => Self::Answer {
                question: argument::<QuestionId>(&mut parts, "answer")?,
                option: argument(&mut parts, "answer")?,
            },
            "submit" => Self::Submit,
            "status" | "s" => Self::Status,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Drives a lesson against simulated media resources.
pub struct Player {
    engine: LessonProgressionEngine<InMemoryResourceFactory>,
}

impl Player {
    pub fn new(engine: LessonProgressionEngine<InMemoryResourceFactory>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &LessonProgressionEngine<InMemoryResourceFactory> {
        &self.engine
    }

    /// Apply `command` and describe the outcome in one or more lines.
    pub fn apply(&mut self, command: Command) -> Result<Vec<String>, ProgressionError> {
        let mut out = Vec::new();
        match command {
            Command::Next => out.push(describe_transition(self.engine.advance())),
            Command::Prev => out.push(describe_transition(self.engine.retreat())),
            Command::Play => self.engine.transport_mut()?.play()?,
            Command::Pause => self.engine.transport_mut()?.pause(),
            Command::Toggle => {
                let playing = self.engine.transport_mut()?.toggle_playback()?;
                out.push(if playing { "playing" } else { "paused" }.to_string());
            }
            Command::Seek(seconds) => {
                let target = self.engine.transport_mut()?.seek(seconds)?;
                out.push(format!("seeking to {}", format_mm_ss(target)));
            }
            Command::SeekPercent(percent) => {
                let target = self.engine.transport_mut()?.seek_by_fraction(percent / 100.0)?;
                out.push(format!("seeking to {}", format_mm_ss(target)));
            }
            Command::Forward => {
                let target = self.engine.transport_mut()?.skip_forward()?;
                out.push(format!("seeking to {}", format_mm_ss(target)));
            }
            Command::Back => {
                let target = self.engine.transport_mut()?.skip_back()?;
                out.push(format!("seeking to {}", format_mm_ss(target)));
            }
            Command::Volume(volume) => {
                let volume = self.engine.transport_mut()?.set_volume(volume)?;
                out.push(format!("volume {}%", (volume * 100.0).round()));
            }
            Command::Mute => {
                let muted = self.engine.transport_mut()?.toggle_mute();
                out.push(if muted { "muted" } else { "unmuted" }.to_string());
            }
            Command::Tick(seconds) => {
                if self.engine.transport().is_some() {
                    if let Some(resource) = self.engine.factory().latest() {
                        resource.acknowledge_all();
                        resource.advance(seconds);
                    }
                }
            }
            Command::Answer { question, option } => {
                self.engine.select_answer(question, option)?;
                out.push(format!("question {question}: option {option} selected"));
            }
            Command::Submit => {
                let result = self.engine.submit_quiz()?;
                out.push(format!(
                    "score {}% ({} of {} correct)",
                    result.score, result.correct, result.total
                ));
                out.push(result.feedback.message().to_string());
            }
            Command::Status => out.push(self.status()),
            Command::Quit => {}
        }
        out.extend(self.pump());
        Ok(out)
    }

    /// Let the simulated resource answer outstanding commands, then fold its
    /// events into the controller.
    fn pump(&mut self) -> Vec<String> {
        if self.engine.transport().is_none() {
            return Vec::new();
        }
        if let Some(resource) = self.engine.factory().latest() {
            resource.acknowledge_all();
        }
        self.engine
            .sync_media()
            .into_iter()
            .filter_map(|note| match note {
                TransportNotification::PositionChanged(_) => None,
                TransportNotification::DurationKnown(d) => {
                    Some(format!("duration {}", format_mm_ss(d)))
                }
                TransportNotification::PlaybackEnded => Some("playback ended".to_string()),
                TransportNotification::LoadFailed(reason) => {
                    Some(format!("media failed to load: {reason}"))
                }
            })
            .collect()
    }

    pub fn status(&self) -> String {
        serde_json::to_string_pretty(&self.engine.view())
            .unwrap_or_else(|err| format!("failed to render view: {err}"))
    }
}

fn describe_transition(transition: StepTransition) -> String {
    match transition {
        StepTransition::Moved { to, .. } => format!("moved to step {}", to + 1),
        StepTransition::Unchanged => "no step in that direction".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::PlayerSettings;
    use lesson_core::time::fixed_clock;
    use services::load_lesson_str;

    const LESSON: &str = include_str!("../lessons/intro_to_programming.json");

    fn player() -> Player {
        let lesson = load_lesson_str(LESSON).unwrap();
        let engine = LessonProgressionEngine::new(
            lesson,
            InMemoryResourceFactory::new().with_auto_duration(120.0),
            PlayerSettings::default(),
            fixed_clock(),
        );
        Player::new(engine)
    }

    //
    // ─── PARSING ───────────────────────────────────────────────────────────────────
    //

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(Command::parse("seek 42.5"), Ok(Command::Seek(42.5)));
        assert_eq!(
            Command::parse("answer 2 0"),
            Ok(Command::Answer {
                question: QuestionId::new(2),
                option: 0
            })
        );
        assert_eq!(Command::parse("tick"), Ok(Command::Tick(1.0)));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("vol loud"),
            Err(CommandError::InvalidNumber {
                command: "vol",
                raw: "loud".into()
            })
        );
        assert_eq!(
            Command::parse("seek"),
            Err(CommandError::MissingArgument { command: "seek" })
        );
        assert!(matches!(Command::parse("rewind"), Err(CommandError::Unknown(_))));
        assert_eq!(
            Command::parse("answer first 1"),
            Err(CommandError::InvalidNumber {
                command: "answer",
                raw: "first".into()
            })
        );
    }

    //
    // ─── PLAYER ────────────────────────────────────────────────────────────────────
    //

    #[test]
    fn media_commands_need_a_media_step() {
        let mut player = player();
        assert_eq!(
            player.apply(Command::Play).unwrap_err(),
            ProgressionError::NotAMediaStep
        );
    }

    #[test]
    fn playing_and_ticking_moves_the_position() {
        let mut player = player();
        player.apply(Command::Next).unwrap();
        player.apply(Command::Play).unwrap();
        player.apply(Command::Tick(5.0)).unwrap();

        let transport = player.engine().transport().unwrap();
        assert!(transport.is_playing());
        assert_eq!(transport.position(), 5.0);
    }

    #[test]
    fn seek_percent_is_applied_on_next_pump() {
        let mut player = player();
        player.apply(Command::Next).unwrap();
        let lines = player.apply(Command::SeekPercent(50.0)).unwrap();
        assert_eq!(lines, vec!["seeking to 01:00".to_string()]);
        assert_eq!(player.engine().transport().unwrap().position(), 60.0);
    }

    #[test]
    fn quiz_session_reports_score_and_feedback() {
        let mut player = player();
        for _ in 0..4 {
            player.apply(Command::Next).unwrap();
        }
        player.apply(Command::parse("answer 1 1").unwrap()).unwrap();
        player.apply(Command::parse("answer 2 1").unwrap()).unwrap();
        let lines = player.apply(Command::Submit).unwrap();
        assert_eq!(lines[0], "score 50% (1 of 2 correct)");
        assert!(lines[1].starts_with("Good effort"));
    }

    #[test]
    fn status_renders_the_view_as_json() {
        let player = player();
        let status: serde_json::Value = serde_json::from_str(&player.status()).unwrap();
        assert_eq!(status["progress"]["label"], "Step 1 of 5");
        assert_eq!(status["lesson_title"], "Intro to Programming");
    }
}
