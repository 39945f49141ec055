use serde::{Deserialize, Serialize};
use std::fmt;

use super::SessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn next(&self) -> Phase {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Work => f.write_str("work"),
            Phase::Break => f.write_str("break"),
        }
    }
}

/// Observable session state. Also the persisted record shape.
///
/// `remaining_secs` always lies in `[0, phase_duration]`. `phase_duration`
/// is the length the current phase started with; it only differs from the
/// configured duration when the setting was edited while that phase was
/// running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub remaining_secs: f64,
    #[serde(default)]
    pub phase_duration: u32,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub completed_pomodoro_count: u32,
}

impl SessionState {
    /// Fresh session: paused at the start of a focus phase.
    pub fn initial(config: &SessionConfig) -> Self {
        Self {
            phase: Phase::Work,
            remaining_secs: f64::from(config.work_duration),
            phase_duration: config.work_duration,
            running: false,
            completed_pomodoro_count: 0,
        }
    }

    /// Normalize a state read back from storage.
    ///
    /// Sessions never resume across a reload, so `running` is forced off.
    /// Out-of-range or non-finite countdowns are pulled back into range.
    pub fn restored(mut self, config: &SessionConfig) -> Self {
        self.running = false;
        if self.phase_duration == 0 {
            self.phase_duration = config.duration_of(self.phase);
        }
        let max = f64::from(self.phase_duration);
        self.remaining_secs = if self.remaining_secs.is_finite() {
            self.remaining_secs.clamp(0.0, max)
        } else {
            max
        };
        self
    }

    /// Fraction of the current phase already elapsed, `0.0 ..= 1.0`.
    pub fn progress(&self) -> f64 {
        if self.phase_duration == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_secs / f64::from(self.phase_duration)).clamp(0.0, 1.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// Format seconds as `MM:SS`, rounding partial seconds up so the display
/// only shows `00:00` once the countdown has actually finished.
pub fn format_clock(secs: f64) -> String {
    let whole = if secs.is_finite() && secs > 0.0 {
        secs.ceil() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
