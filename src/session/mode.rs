use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::engine::stats::SkillKey;

const MIXED_KEY: &str = "mixed";

/// Which skill a session drills: one fixed skill, or a fresh pick per question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode<K> {
    Skill(K),
    Mixed,
}

impl<K: SkillKey> Mode<K> {
    pub fn key(self) -> &'static str {
        match self {
            Mode::Skill(skill) => skill.key(),
            Mode::Mixed => MIXED_KEY,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        if key == MIXED_KEY {
            Some(Mode::Mixed)
        } else {
            K::from_key(key).map(Mode::Skill)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Skill(skill) => skill.label(),
            Mode::Mixed => "Mixed",
        }
    }
}

impl<K: SkillKey> Default for Mode<K> {
    fn default() -> Self {
        Mode::Mixed
    }
}

impl<K: SkillKey> Serialize for Mode<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de, K: SkillKey> Deserialize<'de> for Mode<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ModeVisitor<K>(PhantomData<K>);

        impl<K: SkillKey> Visitor<'_> for ModeVisitor<K> {
            type Value = Mode<K>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a skill key or \"{MIXED_KEY}\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Mode<K>, E> {
                Mode::from_key(value).ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_str(ModeVisitor(PhantomData))
    }
}
