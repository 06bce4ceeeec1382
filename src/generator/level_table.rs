use std::collections::BTreeMap;

use crate::engine::stats::SkillKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSpec {
    pub min_a: i64,
    pub max_a: i64,
    pub min_b: i64,
    pub max_b: i64,
    pub allow_negative_result: bool,
}

impl LevelSpec {
    pub const fn new(min_a: i64, max_a: i64, min_b: i64, max_b: i64) -> Self {
        Self {
            min_a,
            max_a,
            min_b,
            max_b,
            allow_negative_result: false,
        }
    }

    pub const fn signed(self) -> Self {
        Self {
            allow_negative_result: true,
            ..self
        }
    }
}

const FALLBACK: LevelSpec = LevelSpec::new(1, 5, 1, 5);

/// Per-level change applied to the last authored level when extrapolating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Growth {
    pub min_a: i64,
    pub max_a: i64,
    pub min_b: i64,
    pub max_b: i64,
}

/// Authored levels for one skill plus the step used beyond them.
pub struct SkillLevels<'a> {
    pub authored: &'a [LevelSpec],
    pub growth: Growth,
}

/// Operand ranges for every skill and level, computed once up front.
#[derive(Clone, Debug)]
pub struct LevelTable<K: SkillKey> {
    max_level: u32,
    levels: BTreeMap<K, Vec<LevelSpec>>,
}

impl<K: SkillKey> LevelTable<K> {
    pub fn build(max_level: u32, define: impl Fn(K) -> SkillLevels<'static>) -> Self {
        let max_level = max_level.max(1);
        let levels = K::all()
            .iter()
            .map(|&skill| (skill, extrapolate(&define(skill), max_level as usize)))
            .collect();
        Self { max_level, levels }
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Spec for `level`, clamped into `[1, max_level]`. Never fails.
    pub fn get(&self, skill: K, level: u32) -> &LevelSpec {
        let Some(specs) = self.levels.get(&skill) else {
            return &FALLBACK;
        };
        let index = (level.max(1) as usize - 1).min(specs.len().saturating_sub(1));
        specs.get(index).unwrap_or(&FALLBACK)
    }
}

fn extrapolate(levels: &SkillLevels<'_>, max_level: usize) -> Vec<LevelSpec> {
    let mut specs: Vec<LevelSpec> = levels.authored.iter().take(max_level).copied().collect();
    let mut last = specs.last().copied().unwrap_or(FALLBACK);
    let g = levels.growth;
    while specs.len() < max_level {
        let min_a = (last.min_a + g.min_a).max(0);
        let min_b = (last.min_b + g.min_b).max(0);
        last = LevelSpec {
            min_a,
            max_a: (last.max_a + g.max_a).max(min_a),
            min_b,
            max_b: (last.max_b + g.max_b).max(min_b),
            allow_negative_result: last.allow_negative_result,
        };
        specs.push(last);
    }
    specs
}
