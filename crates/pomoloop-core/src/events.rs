use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerSettings};

/// Sound/visual cue selector emitted on every phase transition.
///
/// The engine never plays audio or touches a display; a collaborator maps
/// the cue to whatever medium it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationCue {
    FocusStarted,
    ShortBreakStarted,
    LongBreakStarted,
}

/// Every state change in the engine produces an Event.
///
/// Hosts render them, and treat `PhaseCompleted`/`SettingsApplied` as the
/// request to write the persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran out and the rotation moved on.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        cue: NotificationCue,
        completed_pomodoros: u64,
        pomos_since_long: u32,
        at: DateTime<Utc>,
    },
    /// Manual phase override (e.g. seeding the initial phase on load).
    PhaseChanged {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        settings: TimerSettings,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        is_running: bool,
        remaining_ms: u64,
        total_ms: u64,
        display: String,
        completed_pomodoros: u64,
        pomos_since_long: u32,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&NotificationCue::FocusStarted).unwrap(),
            "\"focus-started\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationCue::ShortBreakStarted).unwrap(),
            "\"short-break-started\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationCue::LongBreakStarted).unwrap(),
            "\"long-break-started\""
        );
    }

    #[test]
    fn event_carries_type_tag() {
        let event = Event::TimerPaused {
            remaining_ms: 1000,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerPaused");
        assert_eq!(json["remaining_ms"], 1000);
    }

    #[test]
    fn phase_completed_roundtrip() {
        let event = Event::PhaseCompleted {
            completed: Phase::Focus,
            next: Phase::LongBreak,
            cue: NotificationCue::LongBreakStarted,
            completed_pomodoros: 4,
            pomos_since_long: 0,
            at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        match parsed {
            Event::PhaseCompleted { cue, next, .. } => {
                assert_eq!(cue, NotificationCue::LongBreakStarted);
                assert_eq!(next, Phase::LongBreak);
            }
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
    }
}
