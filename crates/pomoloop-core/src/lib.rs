//! # Pomoloop Core Library
//!
//! Core business logic for the Pomoloop Pomodoro timer. The CLI binary
//! is a thin host over this library; any other frontend drives the same
//! engine the same way.
//!
//! ## Architecture
//!
//! - **Cycle Engine**: A monotonic-clock state machine that requires the
//!   caller to periodically invoke `tick()` for progress updates. Ticks
//!   subtract real elapsed time, so irregular tick delivery never skews
//!   the countdown.
//! - **Storage**: SQLite-backed persistence of a single flat record
//!   (settings plus completion counters)
//! - **Events**: Every state change surfaces as a serializable [`Event`]
//!   for hosts to render, persist, or notify on
//!
//! ## Key Components
//!
//! - [`CycleEngine`]: Countdown and phase-rotation state machine
//! - [`Database`]: Cycle record persistence
//! - [`TimerSettings`]: Phase durations and long-break cadence

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{CoreError, Result, SettingsError, StorageError};
pub use events::{Event, NotificationCue};
pub use storage::{Database, PersistedRecord};
pub use timer::{CycleEngine, Phase, TimerSettings};
