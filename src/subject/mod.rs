pub mod answer;
pub mod math;

use rand::rngs::SmallRng;

use crate::engine::leveling;
use crate::engine::selector;
use crate::engine::stats::{self, AnswerResult, SkillKey, SkillStats, Stats};
use crate::generator::Question;
use crate::settings::{SettingControl, Settings};
use crate::subject::answer::AnswerContract;

/// A pluggable drill subject. The session machine only talks to this trait.
///
/// The default methods route to the shared engine; a subject overrides them
/// only when it levels or selects differently.
pub trait Subject {
    type Skill: SkillKey;
    type Answer: AnswerContract;

    fn skills(&self) -> &'static [Self::Skill] {
        Self::Skill::all()
    }

    fn skill_label(&self, skill: Self::Skill) -> &'static str {
        skill.label()
    }

    fn max_level(&self) -> u32;

    fn default_stats(&self) -> Stats<Self::Skill> {
        Stats::fresh()
    }

    fn create_question(
        &self,
        skill: Self::Skill,
        level: u32,
        settings: &Settings,
        stats: &Stats<Self::Skill>,
        rng: &mut SmallRng,
    ) -> Question<Self::Skill>;

    fn format_question(&self, question: &Question<Self::Skill>) -> String {
        format!("{} = ?", question.display_text)
    }

    fn apply_result(&self, stats: &SkillStats, result: &AnswerResult) -> SkillStats {
        leveling::apply_result(stats, result, self.max_level())
    }

    fn accuracy(&self, stats: &SkillStats) -> f64 {
        stats::accuracy(stats)
    }

    fn average_ms(&self, stats: &SkillStats) -> f64 {
        stats::average_ms(stats)
    }

    fn target_ms(&self, level: u32) -> u64 {
        leveling::target_ms(level)
    }

    fn weakest_skill(&self, stats: &Stats<Self::Skill>) -> Self::Skill {
        selector::weakest_skill(stats)
    }

    fn pick_skill(&self, stats: &Stats<Self::Skill>, rng: &mut SmallRng) -> Self::Skill {
        selector::pick_skill(stats, rng)
    }

    fn answer_contract(&self, settings: &Settings) -> Self::Answer;

    fn setting_controls(&self) -> Vec<SettingControl>;
}
