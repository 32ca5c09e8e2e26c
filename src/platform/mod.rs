//! Platform abstraction layer
//!
//! Wall-clock time and the one-second countdown timers live here so the
//! state machine can be driven by a real clock in the browser and by a
//! hand-advanced clock in tests.

pub mod time;
pub mod timer;

pub use time::{Clock, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use time::MonotonicClock;
#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
pub use timer::{TimerId, TimerQueue};
