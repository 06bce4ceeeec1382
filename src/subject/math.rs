use rand::rngs::SmallRng;

use crate::engine::stats::Stats;
use crate::generator::Question;
use crate::generator::arithmetic::{self, MathSkill};
use crate::generator::level_table::{LevelSpec, LevelTable};
use crate::settings::{self, SettingControl, Settings};
use crate::subject::Subject;
use crate::subject::answer::NumericAnswer;

/// Add/sub/mul/div drills over the precomputed level table.
pub struct MathSubject {
    table: LevelTable<MathSkill>,
}

impl MathSubject {
    pub fn new() -> Self {
        Self {
            table: arithmetic::math_level_table(),
        }
    }

    pub fn level_spec(&self, skill: MathSkill, level: u32) -> &LevelSpec {
        self.table.get(skill, level)
    }

    /// Negative results need the user setting and a level that unlocks them.
    pub fn allows_negative(&self, settings: &Settings, skill: MathSkill, level: u32) -> bool {
        settings.allow_negative && self.level_spec(skill, level).allow_negative_result
    }
}

impl Default for MathSubject {
    fn default() -> Self {
        Self::new()
    }
}

impl Subject for MathSubject {
    type Skill = MathSkill;
    type Answer = NumericAnswer;

    fn max_level(&self) -> u32 {
        self.table.max_level()
    }

    fn create_question(
        &self,
        skill: MathSkill,
        level: u32,
        settings: &Settings,
        _stats: &Stats<MathSkill>,
        rng: &mut SmallRng,
    ) -> Question<MathSkill> {
        let level = level.clamp(1, self.max_level());
        let spec = self.level_spec(skill, level);
        let allow_negative = self.allows_negative(settings, skill, level);
        arithmetic::generate_question(skill, level, spec, allow_negative, rng)
    }

    fn answer_contract(&self, settings: &Settings) -> NumericAnswer {
        if settings.allow_negative {
            NumericAnswer::signed()
        } else {
            NumericAnswer::unsigned()
        }
    }

    fn setting_controls(&self) -> Vec<SettingControl> {
        let mut controls = settings::core_controls();
        controls.push(settings::ALLOW_NEGATIVE);
        controls
    }
}
