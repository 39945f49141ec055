//! User-editable session settings.
//!
//! Values arrive as raw text from the UI or CLI. Anything non-numeric or
//! not strictly positive is rejected here, before it can reach the engine,
//! and the previous value stays in effect.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use super::Phase;
use crate::error::ValidationError;

pub const DEFAULT_WORK_DURATION: u32 = 25 * 60;
pub const DEFAULT_BREAK_DURATION: u32 = 5 * 60;
pub const DEFAULT_TARGET_POMODORO_COUNT: u32 = 4;

/// Durations are whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub work_duration: u32,
    pub break_duration: u32,
    pub target_pomodoro_count: u32,
    #[serde(default)]
    pub auto_chain: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_DURATION,
            break_duration: DEFAULT_BREAK_DURATION,
            target_pomodoro_count: DEFAULT_TARGET_POMODORO_COUNT,
            auto_chain: false,
        }
    }
}

impl SessionConfig {
    /// Build a config, rejecting any zero value.
    pub fn new(
        work_duration: u32,
        break_duration: u32,
        target_pomodoro_count: u32,
        auto_chain: bool,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            work_duration,
            break_duration,
            target_pomodoro_count,
            auto_chain,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            (Setting::WorkDuration, self.work_duration),
            (Setting::BreakDuration, self.break_duration),
            (Setting::TargetPomodoroCount, self.target_pomodoro_count),
        ];
        for (setting, value) in checks {
            if value == 0 {
                return Err(setting.invalid(&value.to_string(), "must be greater than zero"));
            }
        }
        Ok(())
    }

    /// Configured length of a phase, in seconds.
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::Break => self.break_duration,
        }
    }
}

/// A single editable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    WorkDuration,
    BreakDuration,
    TargetPomodoroCount,
    AutoChain,
}

impl Setting {
    pub fn key(&self) -> &'static str {
        match self {
            Setting::WorkDuration => "work_duration",
            Setting::BreakDuration => "break_duration",
            Setting::TargetPomodoroCount => "target_pomodoro_count",
            Setting::AutoChain => "auto_chain",
        }
    }

    fn invalid(&self, value: &str, reason: &str) -> ValidationError {
        ValidationError::InvalidSettingValue {
            field: self.key().to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A validated edit, ready to hand to the session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingEdit {
    WorkDuration(NonZeroU32),
    BreakDuration(NonZeroU32),
    TargetPomodoroCount(NonZeroU32),
    AutoChain(bool),
}

impl SettingEdit {
    /// Parse raw user text for `setting`.
    pub fn parse(setting: Setting, raw: &str) -> Result<Self, ValidationError> {
        match setting {
            Setting::WorkDuration => parse_positive(setting, raw).map(SettingEdit::WorkDuration),
            Setting::BreakDuration => parse_positive(setting, raw).map(SettingEdit::BreakDuration),
            Setting::TargetPomodoroCount => {
                parse_positive(setting, raw).map(SettingEdit::TargetPomodoroCount)
            }
            Setting::AutoChain => parse_switch(setting, raw).map(SettingEdit::AutoChain),
        }
    }
}

fn parse_positive(setting: Setting, raw: &str) -> Result<NonZeroU32, ValidationError> {
    let trimmed = raw.trim();
    let value = i64::from_str(trimmed).map_err(|_| setting.invalid(raw, "not a whole number"))?;
    if value <= 0 {
        return Err(setting.invalid(raw, "must be greater than zero"));
    }
    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| setting.invalid(raw, "too large"))
}

fn parse_switch(setting: Setting, raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(setting.invalid(raw, "expected on or off")),
    }
}
