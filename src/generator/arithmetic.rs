use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::stats::SkillKey;
use crate::generator::level_table::{Growth, LevelSpec, LevelTable, SkillLevels};
use crate::generator::{Question, question_id};

pub const MAX_LEVEL: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MathSkill {
    #[serde(rename = "add")]
    Add,
    #[serde(rename = "sub")]
    Sub,
    #[serde(rename = "mul")]
    Mul,
    #[serde(rename = "div")]
    Div,
}

impl SkillKey for MathSkill {
    fn all() -> &'static [Self] {
        &[MathSkill::Add, MathSkill::Sub, MathSkill::Mul, MathSkill::Div]
    }

    fn key(self) -> &'static str {
        match self {
            MathSkill::Add => "add",
            MathSkill::Sub => "sub",
            MathSkill::Mul => "mul",
            MathSkill::Div => "div",
        }
    }

    fn label(self) -> &'static str {
        match self {
            MathSkill::Add => "Addition",
            MathSkill::Sub => "Subtraction",
            MathSkill::Mul => "Multiplication",
            MathSkill::Div => "Division",
        }
    }
}

impl MathSkill {
    pub fn symbol(self) -> &'static str {
        match self {
            MathSkill::Add => "+",
            MathSkill::Sub => "-",
            MathSkill::Mul => "x",
            MathSkill::Div => "÷",
        }
    }
}

const ADD_LEVELS: &[LevelSpec] = &[
    LevelSpec::new(1, 5, 1, 5),
    LevelSpec::new(1, 9, 1, 9),
    LevelSpec::new(5, 20, 1, 9),
    LevelSpec::new(10, 30, 5, 20),
    LevelSpec::new(10, 50, 10, 50),
];

const SUB_LEVELS: &[LevelSpec] = &[
    LevelSpec::new(1, 5, 1, 5),
    LevelSpec::new(1, 9, 1, 9),
    LevelSpec::new(5, 20, 1, 9),
    LevelSpec::new(10, 30, 5, 20).signed(),
    LevelSpec::new(10, 50, 10, 50).signed(),
];

const MUL_LEVELS: &[LevelSpec] = &[
    LevelSpec::new(1, 5, 1, 5),
    LevelSpec::new(2, 9, 2, 5),
    LevelSpec::new(2, 9, 2, 9),
    LevelSpec::new(2, 12, 2, 12),
    LevelSpec::new(5, 15, 2, 12),
];

// For division `a` is the divisor range and `b` the quotient range.
const DIV_LEVELS: &[LevelSpec] = &[
    LevelSpec::new(1, 5, 1, 5),
    LevelSpec::new(2, 9, 1, 9),
    LevelSpec::new(2, 10, 2, 10),
    LevelSpec::new(2, 12, 2, 12),
    LevelSpec::new(3, 15, 2, 15),
];

fn skill_levels(skill: MathSkill) -> SkillLevels<'static> {
    match skill {
        MathSkill::Add | MathSkill::Sub => SkillLevels {
            authored: if skill == MathSkill::Add {
                ADD_LEVELS
            } else {
                SUB_LEVELS
            },
            growth: Growth {
                min_a: 5,
                max_a: 25,
                min_b: 5,
                max_b: 25,
            },
        },
        MathSkill::Mul => SkillLevels {
            authored: MUL_LEVELS,
            growth: Growth {
                min_a: 1,
                max_a: 2,
                min_b: 0,
                max_b: 1,
            },
        },
        MathSkill::Div => SkillLevels {
            authored: DIV_LEVELS,
            growth: Growth {
                min_a: 0,
                max_a: 1,
                min_b: 0,
                max_b: 1,
            },
        },
    }
}

pub fn math_level_table() -> LevelTable<MathSkill> {
    LevelTable::build(MAX_LEVEL, skill_levels)
}

/// Draws operands from `spec` and builds the question for `skill`.
///
/// Subtraction keeps the drawn order only when `allow_negative` is set;
/// otherwise the larger operand goes first. Division always has an exact
/// integer quotient.
pub fn generate_question<R: Rng + ?Sized>(
    skill: MathSkill,
    level: u32,
    spec: &LevelSpec,
    allow_negative: bool,
    rng: &mut R,
) -> Question<MathSkill> {
    let a = rng.gen_range(spec.min_a..=spec.max_a);
    let b = rng.gen_range(spec.min_b..=spec.max_b);

    let (left, right, answer) = match skill {
        MathSkill::Add => (a, b, a + b),
        MathSkill::Sub => {
            let (left, right) = if allow_negative || a >= b { (a, b) } else { (b, a) };
            (left, right, left - right)
        }
        MathSkill::Mul => (a, b, a * b),
        MathSkill::Div => {
            let divisor = a.max(1);
            (divisor * b, divisor, b)
        }
    };

    Question {
        id: question_id(rng),
        skill,
        level,
        display_text: format!("{left} {} {right}", skill.symbol()),
        correct_answer: answer,
    }
}
