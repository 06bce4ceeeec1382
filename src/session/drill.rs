use std::time::Instant;

use crate::generator::Question;
use crate::subject::answer::AnswerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    TimedOut,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }

    /// Wrong answers wait for the learner so they can read the solution.
    pub fn auto_advances(self) -> bool {
        matches!(self, Verdict::Correct | Verdict::TimedOut)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    AwaitingAnswer,
    Answered(Verdict),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { expected: String },
    TimedOut { expected: String },
    Rejected(AnswerError),
}

/// State of one drill run. Created at session start, dropped at its end.
pub struct DrillState<K> {
    pub question_count: u32,
    pub time_limit_seconds: u32,
    /// 1-based.
    pub current_index: u32,
    pub question: Question<K>,
    pub answer_text: String,
    pub feedback: Option<Feedback>,
    pub time_left_seconds: u32,
    pub turn: Turn,
    pub question_started_at: Instant,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub timed_out_count: u32,
    pub total_elapsed_ms: u64,
    pub promotions: u32,
    pub demotions: u32,
}

impl<K> DrillState<K> {
    pub fn new(
        question: Question<K>,
        question_count: u32,
        time_limit_seconds: u32,
        now: Instant,
    ) -> Self {
        Self {
            question_count,
            time_limit_seconds,
            current_index: 1,
            question,
            answer_text: String::new(),
            feedback: None,
            time_left_seconds: time_limit_seconds,
            turn: Turn::AwaitingAnswer,
            question_started_at: now,
            correct_count: 0,
            wrong_count: 0,
            timed_out_count: 0,
            total_elapsed_ms: 0,
            promotions: 0,
            demotions: 0,
        }
    }

    /// Swaps in the next question and resets the per-question fields.
    pub fn load_question(&mut self, question: Question<K>, now: Instant) {
        self.question = question;
        self.answer_text.clear();
        self.feedback = None;
        self.time_left_seconds = self.time_limit_seconds;
        self.turn = Turn::AwaitingAnswer;
        self.question_started_at = now;
    }

    pub fn is_awaiting(&self) -> bool {
        self.turn == Turn::AwaitingAnswer
    }

    pub fn is_answered(&self) -> bool {
        !self.is_awaiting()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self.turn {
            Turn::Answered(verdict) => Some(verdict),
            Turn::AwaitingAnswer => None,
        }
    }

    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.question_started_at)
            .as_millis() as u64
    }

    pub fn record(&mut self, verdict: Verdict, elapsed_ms: u64) {
        match verdict {
            Verdict::Correct => self.correct_count += 1,
            Verdict::Incorrect => self.wrong_count += 1,
            Verdict::TimedOut => {
                self.wrong_count += 1;
                self.timed_out_count += 1;
            }
        }
        self.total_elapsed_ms += elapsed_ms;
        self.turn = Turn::Answered(verdict);
    }

    pub fn answered_count(&self) -> u32 {
        self.correct_count + self.wrong_count
    }

    /// Whole percent, 0 before the first answer.
    pub fn accuracy_pct(&self) -> u32 {
        let total = self.answered_count();
        if total == 0 {
            return 0;
        }
        (self.correct_count as f64 * 100.0 / total as f64).round() as u32
    }

    pub fn average_ms(&self) -> f64 {
        let total = self.answered_count();
        if total == 0 {
            return 0.0;
        }
        self.total_elapsed_ms as f64 / total as f64
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index >= self.question_count
    }
}
