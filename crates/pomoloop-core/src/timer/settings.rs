use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// Phase durations and the long-break cadence.
///
/// All four values are whole positive integers. Zero is never applied:
/// [`TimerSettings::sanitize`] coerces it back to the field default, and
/// deserialization fills missing fields from the same defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Focus phase duration in minutes.
    #[serde(default = "default_focus_min")]
    pub focus_min: u32,
    /// Short break duration in minutes.
    #[serde(default = "default_short_break_min")]
    pub short_break_min: u32,
    /// Long break duration in minutes.
    #[serde(default = "default_long_break_min")]
    pub long_break_min: u32,
    /// Completed focus phases required before a long break.
    #[serde(default = "default_pomos_before_long")]
    pub pomos_before_long: u32,
}

fn default_focus_min() -> u32 {
    25
}
fn default_short_break_min() -> u32 {
    5
}
fn default_long_break_min() -> u32 {
    15
}
fn default_pomos_before_long() -> u32 {
    4
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_min: default_focus_min(),
            short_break_min: default_short_break_min(),
            long_break_min: default_long_break_min(),
            pomos_before_long: default_pomos_before_long(),
        }
    }
}

impl TimerSettings {
    /// Coerce non-positive fields to their defaults.
    pub fn sanitize(self) -> Self {
        Self {
            focus_min: positive_or(self.focus_min, default_focus_min()),
            short_break_min: positive_or(self.short_break_min, default_short_break_min()),
            long_break_min: positive_or(self.long_break_min, default_long_break_min()),
            pomos_before_long: positive_or(self.pomos_before_long, default_pomos_before_long()),
        }
    }

    /// Full configured duration of the given phase.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_for(&self, phase: Phase) -> Duration {
        let minutes = match phase {
            Phase::Focus => self.focus_min,
            Phase::ShortBreak => self.short_break_min,
            Phase::LongBreak => self.long_break_min,
        };
        Duration::from_secs(u64::from(minutes).saturating_mul(60))
    }
}

fn positive_or(value: u32, fallback: u32) -> u32 {
    if value == 0 {
        fallback
    } else {
        value
    }
}
