pub mod arithmetic;
pub mod level_table;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One drill turn. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question<K> {
    /// Only used to tell one question instance from the next.
    pub id: String,
    pub skill: K,
    pub level: u32,
    pub display_text: String,
    pub correct_answer: i64,
}

/// Millisecond timestamp plus a random suffix.
pub fn question_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rng.r#gen();
    format!("{millis:x}-{suffix:08x}")
}
