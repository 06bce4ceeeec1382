use crate::engine::stats::{AnswerResult, HISTORY_LIMIT, SkillStats};

/// Consecutive fast correct answers needed to move up a level.
pub const PROMOTE_STREAK: u32 = 3;
/// Consecutive misses that move a skill back down.
pub const DEMOTE_STREAK: u32 = 2;

const TARGET_CEILING_MS: i64 = 6000;
const TARGET_FLOOR_MS: i64 = 2400;
const TARGET_STEP_MS: i64 = 300;

/// Expected answer time for a level: 6s at the start, 300ms less per level,
/// never below 2.4s.
pub fn target_ms(level: u32) -> u64 {
    let raw = TARGET_CEILING_MS - level as i64 * TARGET_STEP_MS;
    raw.clamp(TARGET_FLOOR_MS, TARGET_CEILING_MS) as u64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelChange {
    Promoted,
    Demoted,
    Unchanged,
}

impl LevelChange {
    pub fn between(before: u32, after: u32) -> Self {
        match after.cmp(&before) {
            std::cmp::Ordering::Greater => LevelChange::Promoted,
            std::cmp::Ordering::Less => LevelChange::Demoted,
            std::cmp::Ordering::Equal => LevelChange::Unchanged,
        }
    }
}

/// Folds one result into a skill's stats and returns the new stats.
///
/// Promotion needs `PROMOTE_STREAK` correct answers in a row with the last
/// one inside the target time of the level being left; demotion needs
/// `DEMOTE_STREAK` misses in a row. Either level change resets its counter.
/// At the level bounds the counter still resets even though the level stays.
pub fn apply_result(stats: &SkillStats, result: &AnswerResult, max_level: u32) -> SkillStats {
    let mut history = Vec::with_capacity(HISTORY_LIMIT);
    let keep_from = (stats.history.len() + 1).saturating_sub(HISTORY_LIMIT);
    history.extend_from_slice(&stats.history[keep_from..]);
    history.push(*result);

    let mut level = stats.level.clamp(1, max_level.max(1));
    let mut streak = if result.correct {
        stats.streak.saturating_add(1)
    } else {
        0
    };
    let mut mistake_streak = if result.correct {
        0
    } else {
        stats.mistake_streak.saturating_add(1)
    };

    if result.correct && streak >= PROMOTE_STREAK && result.elapsed_ms <= target_ms(level) {
        level = (level + 1).min(max_level.max(1));
        streak = 0;
    }

    if !result.correct && mistake_streak >= DEMOTE_STREAK {
        level = level.saturating_sub(1).max(1);
        mistake_streak = 0;
    }

    SkillStats {
        level,
        streak,
        mistake_streak,
        history,
    }
}
