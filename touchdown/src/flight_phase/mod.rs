//! Flight phase detection.
//!
//! Watches per-tick telemetry for the airborne/landed transition and turns
//! it into [`PhaseEvent`]s for the presentation layer.
//!
//! # State Machine
//!
//! ```text
//!            (silent)
//! Unknown ──────────────► Flying ◄──── FlyingEvent ────┐
//!    │                      │                          │
//!    │ (silent)             └──── LandedEvent ───► Landed
//!    └──────────────────────────────────────────────►
//! ```
//!
//! `Unknown` is only ever the initial state. While `Flying`, a heartbeat
//! `FlyingEvent` is emitted once per second. Nothing happens during the
//! settle-down window right after activation.

mod detector;
mod events;

pub use detector::{
    DetectorUpdate, FlightPhaseDetector, FLYING_HEARTBEAT_PERIOD_SECS,
    LANDING_HEADING_THRESHOLD_DEG, SETTLE_DOWN_PERIOD_SECS,
};
pub use events::{FlyingEvent, LandedEvent, PhaseEvent, PhaseEventSink};

/// Detected flight phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightPhase {
    /// No telemetry evaluated yet since activation.
    #[default]
    Unknown,

    /// Airborne.
    ///
    /// Condition: no gear force outside replay, or AGL > 0.25 m.
    Flying,

    /// On the ground.
    Landed,
}

impl FlightPhase {
    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            FlightPhase::Unknown => "waiting for telemetry",
            FlightPhase::Flying => "airborne",
            FlightPhase::Landed => "on the ground",
        }
    }
}

impl std::fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlightPhase::Unknown => write!(f, "unknown"),
            FlightPhase::Flying => write!(f, "flying"),
            FlightPhase::Landed => write!(f, "landed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_phase_display() {
        assert_eq!(format!("{}", FlightPhase::Unknown), "unknown");
        assert_eq!(format!("{}", FlightPhase::Flying), "flying");
        assert_eq!(format!("{}", FlightPhase::Landed), "landed");
    }

    #[test]
    fn test_flight_phase_description() {
        assert_eq!(FlightPhase::Flying.description(), "airborne");
        assert_eq!(FlightPhase::Landed.description(), "on the ground");
    }

    #[test]
    fn test_default_phase_is_unknown() {
        assert_eq!(FlightPhase::default(), FlightPhase::Unknown);
    }
}
