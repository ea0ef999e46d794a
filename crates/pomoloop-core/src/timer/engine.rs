//! Cycle engine implementation.
//!
//! The engine is an elapsed-time-delta state machine. It does not use
//! internal threads or timers - the host is responsible for calling
//! `tick()` periodically (nominally once a second; the interval is a
//! scheduling hint, not a timing source).
//!
//! Each tick subtracts the real elapsed time since the previous tick, so
//! scheduling jitter, throttling, or missed invocations never lose or
//! gain countdown time. Time is anchored to `std::time::Instant`: the
//! anchor is monotonic within a run and immune to system clock jumps.
//!
//! ## Phase rotation
//!
//! ```text
//! Focus -> ShortBreak -> Focus -> ... -> Focus -> LongBreak -> Focus
//! ```
//!
//! The rotation is autonomous: when a phase runs out mid-tick, the engine
//! advances, refills the countdown, and keeps running. No terminal state.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CycleEngine::new(TimerSettings::default());
//! engine.start();
//! // In a loop:
//! engine.tick(); // Returns Some(Event::PhaseCompleted) on transition
//! ```

use std::time::{Duration, Instant};

use chrono::Utc;

use super::phase::Phase;
use super::settings::TimerSettings;
use crate::events::{Event, NotificationCue};
use crate::storage::PersistedRecord;

/// Core cycle engine: countdown clock plus phase scheduler.
///
/// Owns the whole mutable cycle state. Hosts may read it through the
/// accessors but mutate it only through the command methods.
#[derive(Debug, Clone)]
pub struct CycleEngine {
    settings: TimerSettings,
    phase: Phase,
    /// Time left in the current phase. Sub-millisecond precision is kept
    /// internally so arbitrary tick partitions sum exactly; display
    /// accessors floor at the boundary.
    remaining: Duration,
    is_running: bool,
    completed_pomodoros: u64,
    /// Completed focus phases since the last long break,
    /// in `0..settings.pomos_before_long`.
    pomos_since_long: u32,
    /// Monotonic anchor of the previous tick. `Some` exactly while running.
    last_tick: Option<Instant>,
}

impl CycleEngine {
    /// Create a stopped engine in the focus phase at full duration.
    pub fn new(settings: TimerSettings) -> Self {
        let settings = settings.sanitize();
        Self {
            phase: Phase::Focus,
            remaining: settings.duration_for(Phase::Focus),
            is_running: false,
            completed_pomodoros: 0,
            pomos_since_long: 0,
            last_tick: None,
            settings,
        }
    }

    /// Seed settings and counters from a persisted record.
    ///
    /// Phase and remaining time are never restored: a fresh session always
    /// starts in focus at full duration.
    pub fn from_record(record: &PersistedRecord) -> Self {
        let mut engine = Self::new(record.settings);
        engine.completed_pomodoros = record.completed_pomodoros;
        engine.pomos_since_long = record.pomos_since_long.min(engine.settings.pomos_before_long);
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn remaining_ms(&self) -> u64 {
        u64::try_from(self.remaining.as_millis()).unwrap_or(u64::MAX)
    }

    /// Full configured duration of the current phase, in milliseconds.
    pub fn total_ms(&self) -> u64 {
        let total = self.settings.duration_for(self.phase);
        u64::try_from(total.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn completed_pomodoros(&self) -> u64 {
        self.completed_pomodoros
    }

    pub fn pomos_since_long(&self) -> u32 {
        self.pomos_since_long
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Remaining time as `MM:SS`, whole seconds floored, never negative.
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }

    /// Snapshot of settings and counters for the storage collaborator.
    pub fn persisted_record(&self) -> PersistedRecord {
        PersistedRecord {
            settings: self.settings,
            completed_pomodoros: self.completed_pomodoros,
            pomos_since_long: self.pomos_since_long,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            is_running: self.is_running,
            remaining_ms: self.remaining_ms(),
            total_ms: self.total_ms(),
            display: self.display(),
            completed_pomodoros: self.completed_pomodoros,
            pomos_since_long: self.pomos_since_long,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown. Guaranteed no-op while already running, so a
    /// double start can never double the decrement rate.
    pub fn start(&mut self) -> Option<Event> {
        self.start_at(Instant::now())
    }

    /// Stop the countdown. `remaining` retains its value as of the last
    /// tick; the sub-interval since then is dropped.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        self.last_tick = None;
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms(),
            at: Utc::now(),
        })
    }

    /// Pause, then refill the current phase to its full duration.
    /// The phase itself is unchanged.
    pub fn reset(&mut self) -> Event {
        self.pause();
        self.remaining = self.settings.duration_for(self.phase);
        Event::TimerReset {
            phase: self.phase,
            remaining_ms: self.remaining_ms(),
            at: Utc::now(),
        }
    }

    /// Advance the countdown by the real time elapsed since the previous
    /// tick. Returns `Some(Event::PhaseCompleted)` when the phase ran out
    /// and the rotation advanced; the host persists the record on that
    /// event. No-op while stopped.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(Instant::now())
    }

    /// Replace the settings and refill the current phase at its new full
    /// duration. Partially elapsed time is discarded, not prorated.
    pub fn apply_settings(&mut self, new: TimerSettings) -> Event {
        self.apply_settings_at(new, Instant::now())
    }

    /// Manual phase override (e.g. seeding the phase on initial load).
    /// Refills the countdown for the new phase; counters are untouched.
    pub fn set_phase(&mut self, phase: Phase) -> Event {
        self.set_phase_at(phase, Instant::now())
    }

    // ── Clock-injected variants (exercised directly by tests) ────────

    pub(crate) fn start_at(&mut self, now: Instant) -> Option<Event> {
        if self.is_running {
            return None;
        }
        self.is_running = true;
        self.last_tick = Some(now);
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_ms: self.remaining_ms(),
            at: Utc::now(),
        })
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        let anchor = self.last_tick?;
        // Saturates to zero if `now` is not after the anchor, so the
        // countdown can never move backwards.
        let delta = now.duration_since(anchor);
        self.last_tick = Some(now);
        if delta >= self.remaining {
            self.remaining = Duration::ZERO;
            return Some(self.phase_ended());
        }
        self.remaining -= delta;
        None
    }

    pub(crate) fn apply_settings_at(&mut self, new: TimerSettings, now: Instant) -> Event {
        self.settings = new.sanitize();
        self.remaining = self.settings.duration_for(self.phase);
        if self.is_running {
            self.last_tick = Some(now);
        }
        Event::SettingsApplied {
            settings: self.settings,
            remaining_ms: self.remaining_ms(),
            at: Utc::now(),
        }
    }

    pub(crate) fn set_phase_at(&mut self, phase: Phase, now: Instant) -> Event {
        self.phase = phase;
        self.remaining = self.settings.duration_for(phase);
        if self.is_running {
            self.last_tick = Some(now);
        }
        Event::PhaseChanged {
            phase,
            remaining_ms: self.remaining_ms(),
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Advance the rotation after the current phase ran out.
    ///
    /// The cue for an expiring focus phase is chosen from the
    /// post-increment counter value, so it always names the phase
    /// actually entered. The caller has already re-anchored `last_tick`,
    /// and `is_running` stays true: refilling `remaining` here is the
    /// start of the new phase, which also makes a stray immediate re-tick
    /// harmless.
    fn phase_ended(&mut self) -> Event {
        let completed = self.phase;
        let (next, cue) = match self.phase {
            Phase::Focus => {
                self.completed_pomodoros += 1;
                self.pomos_since_long += 1;
                if self.pomos_since_long >= self.settings.pomos_before_long {
                    self.pomos_since_long = 0;
                    (Phase::LongBreak, NotificationCue::LongBreakStarted)
                } else {
                    (Phase::ShortBreak, NotificationCue::ShortBreakStarted)
                }
            }
            Phase::ShortBreak | Phase::LongBreak => {
                (Phase::Focus, NotificationCue::FocusStarted)
            }
        };
        self.phase = next;
        self.remaining = self.settings.duration_for(next);
        Event::PhaseCompleted {
            completed,
            next,
            cue,
            completed_pomodoros: self.completed_pomodoros,
            pomos_since_long: self.pomos_since_long,
            at: Utc::now(),
        }
    }
}

/// Format a duration as `MM:SS`, whole seconds floored.
/// Minutes widen past two digits rather than wrapping.
fn format_clock(remaining: Duration) -> String {
    let total_seconds = remaining.as_secs();
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
