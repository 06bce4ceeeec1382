use rand::Rng;

use crate::engine::stats::{SkillKey, SkillStats, Stats};

/// Score given to a skill that has no answers yet.
pub const NO_DATA_PRIOR: f64 = 0.55;
/// Smallest pick weight, so mastered skills still come up now and then.
pub const MIN_PICK_WEIGHT: f64 = 0.15;

pub fn skill_score(stats: &SkillStats) -> f64 {
    if stats.history.is_empty() {
        NO_DATA_PRIOR
    } else {
        stats.accuracy()
    }
}

pub fn pick_weight(stats: &SkillStats) -> f64 {
    (1.0 - skill_score(stats)).max(MIN_PICK_WEIGHT)
}

/// Lowest-scoring skill; ties go to the skill listed first.
pub fn weakest_skill<K: SkillKey>(stats: &Stats<K>) -> K {
    let mut weakest: Option<(K, f64)> = None;
    for (skill, skill_stats) in stats.iter() {
        let score = skill_score(skill_stats);
        match weakest {
            Some((_, best)) if score >= best => {}
            _ => weakest = Some((skill, score)),
        }
    }
    weakest.map(|(skill, _)| skill).unwrap_or_else(|| K::all()[0])
}

/// Roulette draw weighted toward weaker skills.
pub fn pick_skill<K: SkillKey, R: Rng + ?Sized>(stats: &Stats<K>, rng: &mut R) -> K {
    let weights: Vec<(K, f64)> = stats.iter().map(|(k, s)| (k, pick_weight(s))).collect();
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let fallback = K::all()[0];
    if total <= 0.0 {
        return fallback;
    }

    let mut roll = rng.gen_range(0.0..total);
    for (skill, weight) in weights {
        if roll < weight {
            return skill;
        }
        roll -= weight;
    }
    fallback
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::engine::leveling::apply_result;
    use crate::engine::stats::AnswerResult;
    use crate::engine::stats::tests::Color;

    fn with_history(stats: &mut Stats<Color>, skill: Color, results: &[AnswerResult]) {
        let updated = results
            .iter()
            .fold(stats.get(skill).clone(), |s, r| apply_result(&s, r, 20));
        stats.replace(skill, updated);
    }

    #[test]
    fn test_weakest_defaults_to_first_listed() {
        let stats: Stats<Color> = Stats::fresh();
        assert_eq!(weakest_skill(&stats), Color::Red);
    }

    #[test]
    fn test_weakest_prefers_low_accuracy() {
        let mut stats: Stats<Color> = Stats::fresh();
        with_history(&mut stats, Color::Red, &[AnswerResult::correct(1000)]);
        with_history(
            &mut stats,
            Color::Blue,
            &[AnswerResult::correct(1000), AnswerResult::wrong(1000)],
        );
        // Green has no data (0.55), Blue has 0.5.
        assert_eq!(weakest_skill(&stats), Color::Blue);
    }

    #[test]
    fn test_fresh_skill_beats_a_perfect_one() {
        let mut stats: Stats<Color> = Stats::fresh();
        with_history(&mut stats, Color::Red, &[AnswerResult::correct(1000)]);
        with_history(&mut stats, Color::Blue, &[AnswerResult::correct(1000)]);
        assert_eq!(weakest_skill(&stats), Color::Green);
    }

    #[test]
    fn test_pick_weight_floor() {
        let mut perfect = SkillStats::fresh();
        perfect.history = vec![AnswerResult::correct(500); 4];
        assert!((pick_weight(&perfect) - MIN_PICK_WEIGHT).abs() < f64::EPSILON);
        assert!((pick_weight(&SkillStats::fresh()) - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_accuracy_makes_every_skill_selectable() {
        let mut stats: Stats<Color> = Stats::fresh();
        for &skill in Color::all() {
            with_history(&mut stats, skill, &[AnswerResult::wrong(1000)]);
            assert!((pick_weight(stats.get(skill)) - 1.0).abs() < f64::EPSILON);
        }

        let mut rng = SmallRng::seed_from_u64(7);
        let mut seen: HashMap<Color, usize> = HashMap::new();
        for _ in 0..600 {
            *seen.entry(pick_skill(&stats, &mut rng)).or_default() += 1;
        }
        for &skill in Color::all() {
            let count = seen.get(&skill).copied().unwrap_or(0);
            assert!(count > 100, "{skill:?} picked only {count} times");
        }
    }

    #[test]
    fn test_weaker_skills_are_picked_more_often() {
        let mut stats: Stats<Color> = Stats::fresh();
        let perfect = vec![AnswerResult::correct(800); 6];
        let poor = vec![AnswerResult::wrong(800); 6];
        with_history(&mut stats, Color::Red, &perfect);
        with_history(&mut stats, Color::Green, &perfect);
        with_history(&mut stats, Color::Blue, &poor);

        let mut rng = SmallRng::seed_from_u64(42);
        let blue = (0..1000)
            .filter(|_| pick_skill(&stats, &mut rng) == Color::Blue)
            .count();
        // Blue weight 1.0 against 0.15 + 0.15: expected share ~77%.
        assert!(blue > 650, "blue picked {blue} times");
        assert!(blue < 950, "blue picked {blue} times");
    }
}
