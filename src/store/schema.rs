use serde::{Deserialize, Serialize};

use crate::engine::stats::{SkillKey, Stats};
use crate::session::mode::Mode;

pub const SESSION_FILE: &str = "session.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// The persisted session blob: `{ "stats": {...}, "mode": "mixed" }`.
///
/// Both fields fall back to their defaults when absent so an older or
/// hand-edited file still loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "K: SkillKey", deserialize = "K: SkillKey"))]
pub struct SessionData<K: SkillKey> {
    #[serde(default)]
    pub stats: Stats<K>,
    #[serde(default)]
    pub mode: Mode<K>,
}

impl<K: SkillKey> Default for SessionData<K> {
    fn default() -> Self {
        Self {
            stats: Stats::fresh(),
            mode: Mode::Mixed,
        }
    }
}
