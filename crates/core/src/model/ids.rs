use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a `u64` identifier newtype. Ids serialize as bare numbers so
/// lesson files can write `"id": 3`.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub fn new(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a lesson within its course.
    LessonId
);
numeric_id!(
    /// Identifier of a step, unique within its lesson.
    StepId
);
numeric_id!(
    /// Identifier of a quiz question, unique within its quiz step.
    QuestionId
);
numeric_id!(
    /// Identifier of a course outline.
    CourseId
);

/// Raised when operator input does not name a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a question id: {:?}", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(QuestionId::new)
            .map_err(|_| ParseIdError { raw: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_parses_with_surrounding_whitespace() {
        let id: QuestionId = " 12 ".parse().unwrap();
        assert_eq!(id, QuestionId::new(12));
    }

    #[test]
    fn invalid_question_id_echoes_input() {
        let err = "x".parse::<QuestionId>().unwrap_err();
        assert_eq!(err.to_string(), "not a question id: \"x\"");
        assert!("-1".parse::<QuestionId>().is_err());
    }

    #[test]
    fn ids_display_as_bare_numbers() {
        assert_eq!(LessonId::new(7).to_string(), "7");
        assert_eq!(format!("{:?}", CourseId::new(3)), "CourseId(3)");
        assert_eq!(format!("{:?}", StepId::new(9)), "StepId(9)");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&QuestionId::new(4)).unwrap();
        assert_eq!(json, "4");
        let back: QuestionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QuestionId::new(4));
    }
}
