use serde::{Deserialize, Serialize};

/// Per-user drill settings, persisted as JSON. Every field is optional on
/// read; call [`normalize`] afterwards since bounds can move between releases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub question_count: u32,
    pub time_limit_seconds: u32,
    pub allow_negative: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            question_count: 10,
            time_limit_seconds: 15,
            allow_negative: false,
        }
    }
}

/// Describes one adjustable setting: bounds, step and how to read/write it.
#[derive(Clone, Copy)]
pub struct SettingControl {
    pub id: &'static str,
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub get: fn(&Settings) -> i64,
    pub set: fn(&mut Settings, i64),
    pub format: Option<fn(i64) -> String>,
}

impl SettingControl {
    pub fn value(&self, settings: &Settings) -> i64 {
        (self.get)(settings)
    }

    pub fn apply(&self, settings: &mut Settings, value: i64) {
        (self.set)(settings, value.clamp(self.min, self.max));
    }

    /// Moves the value to the next multiple of `step` up (`direction > 0`)
    /// or down, so off-grid values such as 3 snap back onto the grid.
    pub fn nudge(&self, settings: &mut Settings, direction: i64) {
        let step = self.step.max(1);
        let value = self.value(settings);
        let next = if direction > 0 {
            (value.div_euclid(step) + 1) * step
        } else if direction < 0 {
            ((value + step - 1).div_euclid(step) - 1) * step
        } else {
            value
        };
        self.apply(settings, next);
    }

    pub fn display(&self, settings: &Settings) -> String {
        let value = self.value(settings);
        match self.format {
            Some(format) => format(value),
            None => value.to_string(),
        }
    }
}

impl std::fmt::Debug for SettingControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingControl")
            .field("id", &self.id)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .finish()
    }
}

pub const QUESTION_COUNT: SettingControl = SettingControl {
    id: "questionCount",
    label: "Questions per session",
    min: 1,
    max: 50,
    step: 5,
    get: |s| s.question_count as i64,
    set: |s, v| s.question_count = v as u32,
    format: None,
};

pub const TIME_LIMIT: SettingControl = SettingControl {
    id: "timeLimitSeconds",
    label: "Time limit",
    min: 5,
    max: 60,
    step: 5,
    get: |s| s.time_limit_seconds as i64,
    set: |s, v| s.time_limit_seconds = v as u32,
    format: Some(format_seconds),
};

pub const ALLOW_NEGATIVE: SettingControl = SettingControl {
    id: "allowNegative",
    label: "Negative answers",
    min: 0,
    max: 1,
    step: 1,
    get: |s| s.allow_negative as i64,
    set: |s, v| s.allow_negative = v != 0,
    format: Some(format_on_off),
};

fn format_seconds(value: i64) -> String {
    format!("{value}s")
}

fn format_on_off(value: i64) -> String {
    let label = if value != 0 { "On" } else { "Off" };
    label.to_string()
}

/// Controls every subject shares.
pub fn core_controls() -> Vec<SettingControl> {
    vec![QUESTION_COUNT, TIME_LIMIT]
}

/// Re-clamps every controlled field into its bounds.
pub fn normalize(settings: &mut Settings, controls: &[SettingControl]) {
    for control in controls {
        let value = control.value(settings);
        control.apply(settings, value);
    }
}
