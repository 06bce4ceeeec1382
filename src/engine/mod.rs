pub mod leveling;
pub mod selector;
pub mod stats;
