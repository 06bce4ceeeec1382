use thiserror::Error;

use crate::generator::Question;

/// Why a submission was not scored. None of these consume the question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("Type an answer first")]
    Empty,
    #[error("Finish the number before submitting")]
    Incomplete,
    #[error("That is not a number")]
    Invalid,
}

/// How typed input is cleaned, parsed and judged.
pub trait AnswerContract {
    /// Whether `ch` may be typed into the answer box at all.
    fn accepts(&self, ch: char) -> bool;
    fn sanitize(&self, raw: &str) -> String;
    fn parse(&self, input: &str) -> Result<i64, AnswerError>;

    fn is_correct<K>(&self, question: &Question<K>, value: i64) -> bool {
        question.correct_answer == value
    }

    fn format_expected<K>(&self, question: &Question<K>) -> String {
        question.correct_answer.to_string()
    }

    /// Sanitize then parse.
    fn read(&self, raw: &str) -> Result<i64, AnswerError> {
        self.parse(&self.sanitize(raw))
    }
}

/// Whole-number answers, optionally with a leading minus sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumericAnswer {
    pub signed: bool,
}

impl NumericAnswer {
    pub fn unsigned() -> Self {
        Self { signed: false }
    }

    pub fn signed() -> Self {
        Self { signed: true }
    }
}

impl AnswerContract for NumericAnswer {
    fn accepts(&self, ch: char) -> bool {
        ch.is_ascii_digit() || (self.signed && ch == '-')
    }

    fn sanitize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let mut out = String::with_capacity(trimmed.len());
        for ch in trimmed.chars() {
            if ch.is_ascii_digit() {
                out.push(ch);
            } else if ch == '-' && self.signed && out.is_empty() {
                out.push(ch);
            }
        }
        out
    }

    fn parse(&self, input: &str) -> Result<i64, AnswerError> {
        if input.is_empty() {
            return Err(AnswerError::Empty);
        }
        let digits = input.strip_prefix('-').unwrap_or(input);
        if digits.is_empty() {
            return Err(AnswerError::Incomplete);
        }
        if !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(AnswerError::Invalid);
        }
        if input.starts_with('-') && !self.signed {
            return Err(AnswerError::Invalid);
        }
        input.parse::<i64>().map_err(|_| AnswerError::Invalid)
    }
}
