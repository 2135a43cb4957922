//! Telemetry inputs from the host simulator.
//!
//! The host owns data-source lookup and the flight loop. Once per tick it
//! hands the session a [`Tick`] with its timing values and a
//! [`TelemetryProvider`] that yields the current [`TelemetrySnapshot`].
//!
//! ```text
//! Host flight loop ──► Tick + TelemetryProvider ──► LandingSession
//!                                                   ├── FlightPhaseDetector
//!                                                   └── FlightHistory (TelemetrySample)
//! ```

mod sample;
mod snapshot;

pub use sample::TelemetrySample;
pub use snapshot::{TelemetrySnapshot, FLYING_AGL_THRESHOLD_M};

use serde::{Deserialize, Serialize};

/// Timing values supplied by the host with every flight-loop invocation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tick {
    /// Seconds since the previous invocation.
    pub elapsed_since_last_call: f32,
    /// Simulation time in seconds, monotonic within a session.
    pub elapsed_time: f32,
}

impl Tick {
    /// Create a new tick.
    pub fn new(elapsed_since_last_call: f32, elapsed_time: f32) -> Self {
        Self {
            elapsed_since_last_call,
            elapsed_time,
        }
    }
}

/// Source of per-tick telemetry.
///
/// Implemented by the host binding (dataref lookups) and by trace replay.
/// Returning `None` means the data is unavailable this tick; the session
/// skips the tick entirely.
pub trait TelemetryProvider {
    /// Read the current telemetry.
    fn read(&mut self) -> Option<TelemetrySnapshot>;
}

impl TelemetryProvider for Option<TelemetrySnapshot> {
    fn read(&mut self) -> Option<TelemetrySnapshot> {
        *self
    }
}

impl TelemetryProvider for TelemetrySnapshot {
    fn read(&mut self) -> Option<TelemetrySnapshot> {
        Some(*self)
    }
}
