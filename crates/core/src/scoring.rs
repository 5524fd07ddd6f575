use chrono::{DateTime, Utc};

use crate::model::{AnswerKey, QuizAttempt, QuizError};

//
// ─── PERCENT ───────────────────────────────────────────────────────────────────
//

/// `100 * part / whole`, rounded half-up to a whole percent.
///
/// Returns 0 when `whole` is zero; `part` larger than `whole` saturates at 100.
///
/// ```
/// # use lesson_core::scoring::rounded_percent;
/// assert_eq!(rounded_percent(1, 2), 50);
/// assert_eq!(rounded_percent(1, 8), 13);
/// assert_eq!(rounded_percent(2, 3), 67);
/// ```
#[must_use]
pub fn rounded_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u128;
    let whole = whole as u128;
    let percent = (200 * part + whole) / (2 * whole);
    u8::try_from(percent).unwrap_or(100)
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Number of keyed questions whose selection matches the key.
#[must_use]
pub fn correct_count(attempt: &QuizAttempt, key: &AnswerKey) -> usize {
    key.iter()
        .filter(|(question, correct)| attempt.selected(*question) == Some(*correct))
        .count()
}

/// Percentage of keyed questions answered correctly, in `0..=100`.
///
/// Selections for questions absent from the key are ignored, so adding a
/// correct answer never lowers the score.
#[must_use]
pub fn score(attempt: &QuizAttempt, key: &AnswerKey) -> u8 {
    rounded_percent(correct_count(attempt, key), key.len())
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Qualitative verdict shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Score reached the pass threshold.
    Excellent,
    /// Score fell short; the learner is nudged to revisit the material.
    Review,
}

impl Feedback {
    #[must_use]
    pub fn for_score(score: u8, pass_threshold: u8) -> Self {
        if score >= pass_threshold {
            Feedback::Excellent
        } else {
            Feedback::Review
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Feedback::Excellent => "Excellent! You understand the material well.",
            Feedback::Review => "Good effort! It's worth reviewing the material once more.",
        }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Outcome of a submitted quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub score: u8,
    pub correct: usize,
    pub total: usize,
    pub feedback: Feedback,
    pub submitted_at: DateTime<Utc>,
}

/// Freezes `attempt` and scores it against `key`.
///
/// # Errors
///
/// Returns `QuizError::IncompleteAttempt` when any keyed question is unanswered
/// and `QuizError::AlreadySubmitted` for a frozen attempt. The attempt is left
/// untouched in both cases.
pub fn submit(
    attempt: &mut QuizAttempt,
    key: &AnswerKey,
    pass_threshold: u8,
    at: DateTime<Utc>,
) -> Result<QuizResult, QuizError> {
    attempt.submit(key, at)?;
    let score = score(attempt, key);
    Ok(QuizResult {
        score,
        correct: correct_count(attempt, key),
        total: key.len(),
        feedback: Feedback::for_score(score, pass_threshold),
        submitted_at: at,
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, QuizQuestion};
    use crate::time::fixed_now;

    fn questions(correct: &[usize]) -> Vec<QuizQuestion> {
        correct
            .iter()
            .enumerate()
            .map(|(i, c)| {
                QuizQuestion::new(
                    QuestionId::new(i as u64 + 1),
                    format!("Q{}", i + 1),
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    *c,
                )
            })
            .collect()
    }

    #[test]
    fn half_correct_scores_fifty() {
        let qs = questions(&[1, 1]);
        let key = AnswerKey::from_questions(&qs);
        let mut attempt = QuizAttempt::for_questions(&qs);
        attempt.select(QuestionId::new(1), 1).unwrap();
        attempt.select(QuestionId::new(2), 0).unwrap();

        let result = submit(&mut attempt, &key, 80, fixed_now()).unwrap();
        assert_eq!(result.score, 50);
        assert_eq!(result.correct, 1);
        assert_eq!(result.total, 2);
        assert_eq!(result.feedback, Feedback::Review);
        assert!(attempt.is_submitted());
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(5, 8), 63);
        assert_eq!(rounded_percent(3, 3), 100);
        assert_eq!(rounded_percent(0, 3), 0);
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(rounded_percent(4, 3), 100);
    }

    #[test]
    fn score_is_monotonic_in_correct_answers() {
        let qs = questions(&[0, 1, 2, 3, 0, 1, 2]);
        let key = AnswerKey::from_questions(&qs);
        let mut attempt = QuizAttempt::for_questions(&qs);
        for q in &qs {
            attempt.select(q.id, (q.correct_option + 1) % 4).unwrap();
        }

        let mut previous = score(&attempt, &key);
        assert_eq!(previous, 0);
        for q in &qs {
            attempt.select(q.id, q.correct_option).unwrap();
            let next = score(&attempt, &key);
            assert!(next >= previous, "{next} < {previous}");
            previous = next;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn feedback_switches_at_threshold() {
        assert_eq!(Feedback::for_score(80, 80), Feedback::Excellent);
        assert_eq!(Feedback::for_score(79, 80), Feedback::Review);
        assert_ne!(Feedback::Excellent.message(), Feedback::Review.message());
    }

    #[test]
    fn incomplete_submission_is_rejected_without_change() {
        let qs = questions(&[1, 1]);
        let key = AnswerKey::from_questions(&qs);
        let mut attempt = QuizAttempt::for_questions(&qs);
        attempt.select(QuestionId::new(1), 1).unwrap();
        let before = attempt.clone();

        let err = submit(&mut attempt, &key, 80, fixed_now()).unwrap_err();
        assert!(matches!(err, QuizError::IncompleteAttempt { .. }));
        assert_eq!(attempt, before);
    }

    #[test]
    fn empty_key_scores_zero() {
        let attempt = QuizAttempt::for_questions(&[]);
        assert_eq!(score(&attempt, &AnswerKey::default()), 0);
    }
}
