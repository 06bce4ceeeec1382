use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::stats::AnswerResult;
use crate::session::drill::{DrillState, Verdict};

/// What the learner sees after a single answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<K> {
    pub question_id: String,
    pub skill: K,
    pub verdict: Verdict,
    pub result: AnswerResult,
    pub expected: String,
    pub level_before: u32,
    pub level_after: u32,
}

impl<K> Outcome<K> {
    pub fn timed_out(&self) -> bool {
        self.verdict == Verdict::TimedOut
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: String,
    pub correct: u32,
    pub wrong: u32,
    pub timed_out: u32,
    pub accuracy_pct: u32,
    pub average_ms: f64,
    pub promotions: u32,
    pub demotions: u32,
    pub finished_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn from_drill<K>(drill: &DrillState<K>, mode: &str) -> Self {
        Self {
            mode: mode.to_string(),
            correct: drill.correct_count,
            wrong: drill.wrong_count,
            timed_out: drill.timed_out_count,
            accuracy_pct: drill.accuracy_pct(),
            average_ms: drill.average_ms(),
            promotions: drill.promotions,
            demotions: drill.demotions,
            finished_at: Utc::now(),
        }
    }

    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }
}
