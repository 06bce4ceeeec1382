use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::leveling::{DEMOTE_STREAK, PROMOTE_STREAK};

/// Number of recent results kept per skill.
pub const HISTORY_LIMIT: usize = 12;

/// A practice category drilled independently, with its own level and history.
///
/// `all()` fixes the enumeration order, which doubles as the tie-break order
/// for skill selection. `key()` is the stable id written to disk.
pub trait SkillKey: Copy + Ord + Hash + Debug + Serialize + DeserializeOwned + 'static {
    fn all() -> &'static [Self];
    fn key(self) -> &'static str;
    fn label(self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.key() == key)
    }
}

/// One answered (or timed-out) question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub correct: bool,
    pub elapsed_ms: u64,
}

impl AnswerResult {
    pub fn correct(elapsed_ms: u64) -> Self {
        Self {
            correct: true,
            elapsed_ms,
        }
    }

    pub fn wrong(elapsed_ms: u64) -> Self {
        Self {
            correct: false,
            elapsed_ms,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStats {
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub mistake_streak: u32,
    /// Oldest first, never longer than [`HISTORY_LIMIT`].
    #[serde(default)]
    pub history: Vec<AnswerResult>,
}

fn default_level() -> u32 {
    1
}

static FRESH: SkillStats = SkillStats::fresh();

impl SkillStats {
    pub const fn fresh() -> Self {
        Self {
            level: 1,
            streak: 0,
            mistake_streak: 0,
            history: Vec::new(),
        }
    }

    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|r| r.correct).count()
    }

    /// Fraction of correct answers in the window; 0 for an empty window.
    pub fn accuracy(&self) -> f64 {
        accuracy(self)
    }

    pub fn average_ms(&self) -> f64 {
        average_ms(self)
    }

    fn normalize(&mut self, max_level: u32) {
        self.level = self.level.clamp(1, max_level.max(1));
        // A slow answer can leave the streak at the threshold without a
        // promotion; a demotion always clears the mistake streak.
        self.streak = self.streak.min(PROMOTE_STREAK);
        if self.mistake_streak >= DEMOTE_STREAK {
            self.mistake_streak = 0;
        }
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }
}

impl Default for SkillStats {
    fn default() -> Self {
        Self::fresh()
    }
}

pub fn accuracy(stats: &SkillStats) -> f64 {
    if stats.history.is_empty() {
        return 0.0;
    }
    stats.correct_count() as f64 / stats.history.len() as f64
}

pub fn average_ms(stats: &SkillStats) -> f64 {
    if stats.history.is_empty() {
        return 0.0;
    }
    let total: f64 = stats.history.iter().map(|r| r.elapsed_ms as f64).sum();
    total / stats.history.len() as f64
}

/// Per-skill stats covering every skill of `K` exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(serialize = "K: SkillKey", deserialize = "K: SkillKey")
)]
pub struct Stats<K: SkillKey> {
    skills: BTreeMap<K, SkillStats>,
}

impl<K: SkillKey> Stats<K> {
    pub fn fresh() -> Self {
        Self {
            skills: K::all()
                .iter()
                .map(|&skill| (skill, SkillStats::fresh()))
                .collect(),
        }
    }

    pub fn get(&self, skill: K) -> &SkillStats {
        self.skills.get(&skill).unwrap_or(&FRESH)
    }

    pub fn level(&self, skill: K) -> u32 {
        self.get(skill).level
    }

    pub(crate) fn replace(&mut self, skill: K, stats: SkillStats) {
        self.skills.insert(skill, stats);
    }

    /// Iterates in skill enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &SkillStats)> + '_ {
        K::all().iter().map(move |&skill| (skill, self.get(skill)))
    }

    /// Repairs data restored from disk: adds missing skills, clamps levels
    /// into `[1, max_level]` and trims histories to the window.
    pub fn normalized(mut self, max_level: u32) -> Self {
        for &skill in K::all() {
            self.skills
                .entry(skill)
                .or_default()
                .normalize(max_level);
        }
        self
    }
}

impl<K: SkillKey> Default for Stats<K> {
    fn default() -> Self {
        Self::fresh()
    }
}
