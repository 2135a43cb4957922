//! Threshold-based flying/landed detector.

use tracing::{debug, info};

use super::{FlightPhase, PhaseEvent};
use crate::flight_history::FlightHistory;
use crate::geo::heading_delta;
use crate::telemetry::{TelemetrySnapshot, Tick};

/// Seconds after the first tick during which telemetry is ignored.
///
/// Readings right after a scenario or aircraft load are unreliable.
pub const SETTLE_DOWN_PERIOD_SECS: f32 = 3.0;

/// Interval between heartbeat flying events while airborne (seconds).
pub const FLYING_HEARTBEAT_PERIOD_SECS: f32 = 1.0;

/// Heading deviation from the landing heading treated as a new departure.
pub const LANDING_HEADING_THRESHOLD_DEG: f32 = 15.0;

/// Result of a settled detector update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorUpdate {
    /// Event to forward to the presentation layer, if any.
    pub event: Option<PhaseEvent>,
    /// Airborne verdict for this tick; tags the recorded sample.
    pub flying: bool,
}

/// Detects flying/landed transitions from instantaneous telemetry.
///
/// # Settle-down
///
/// The first tick only records the start time. Until
/// [`SETTLE_DOWN_PERIOD_SECS`] of simulation time have passed, `update`
/// returns `None` and the phase does not move.
#[derive(Debug)]
pub struct FlightPhaseDetector {
    /// Current detected phase.
    phase: FlightPhase,

    /// Simulation time of the first tick since (re)activation.
    first_tick_time: Option<f32>,

    /// Time accumulated since the last flying event.
    since_flying_report: f32,

    /// Settle-down window (seconds).
    pub(crate) settle_down_period: f32,

    /// Heartbeat period (seconds).
    pub(crate) heartbeat_period: f32,
}

impl FlightPhaseDetector {
    /// Create a detector in the `Unknown` phase.
    pub fn new() -> Self {
        Self {
            phase: FlightPhase::Unknown,
            first_tick_time: None,
            since_flying_report: 0.0,
            settle_down_period: SETTLE_DOWN_PERIOD_SECS,
            heartbeat_period: FLYING_HEARTBEAT_PERIOD_SECS,
        }
    }

    /// Get the current flight phase.
    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// Whether the settle-down window has passed.
    pub fn is_settled(&self, tick: Tick) -> bool {
        self.first_tick_time
            .is_some_and(|first| tick.elapsed_time - first >= self.settle_down_period)
    }

    /// Feed one tick of telemetry.
    ///
    /// # Returns
    ///
    /// `None` while settling down. Otherwise the airborne verdict and an
    /// optional event: a transition event, or a heartbeat while flying.
    pub fn update(&mut self, tick: Tick, snapshot: &TelemetrySnapshot) -> Option<DetectorUpdate> {
        if self.first_tick_time.is_none() {
            self.first_tick_time = Some(tick.elapsed_time);
            debug!(time = tick.elapsed_time, "Detector activated, settling down");
            return None;
        }
        if !self.is_settled(tick) {
            return None;
        }

        let flying = snapshot.is_flying();
        let event = match self.transition(flying, snapshot) {
            Some(event) => Some(event),
            None if self.phase == FlightPhase::Flying => self.heartbeat(tick, snapshot),
            None => None,
        };

        Some(DetectorUpdate { event, flying })
    }

    /// Whether the aircraft has turned away from the recorded landing.
    ///
    /// True when airborne and the heading deviates from the landing sample
    /// in `history` by more than [`LANDING_HEADING_THRESHOLD_DEG`], which
    /// means a go-around or crosswind departure. The caller owns the reset.
    pub fn heading_guard_tripped(&self, snapshot: &TelemetrySnapshot, history: &FlightHistory) -> bool {
        if !snapshot.is_flying() {
            return false;
        }
        history.landing().is_some_and(|landing| {
            heading_delta(snapshot.heading, landing.heading) > LANDING_HEADING_THRESHOLD_DEG
        })
    }

    /// Back to `Unknown` with the settle-down window re-armed.
    pub fn reset(&mut self) {
        self.phase = FlightPhase::Unknown;
        self.first_tick_time = None;
        self.since_flying_report = 0.0;
    }

    fn transition(&mut self, flying: bool, snapshot: &TelemetrySnapshot) -> Option<PhaseEvent> {
        match (self.phase, flying) {
            (FlightPhase::Unknown, _) => {
                self.phase = if flying {
                    FlightPhase::Flying
                } else {
                    FlightPhase::Landed
                };
                debug!(phase = %self.phase, "Initial flight phase");
                None
            }
            (FlightPhase::Flying, false) => {
                self.phase = FlightPhase::Landed;
                info!(
                    from = %FlightPhase::Flying,
                    to = %FlightPhase::Landed,
                    ground_speed = snapshot.ground_speed,
                    vertical_speed = snapshot.vertical_speed,
                    g_force = snapshot.vertical_accel,
                    "Flight phase transition"
                );
                Some(PhaseEvent::landed(snapshot))
            }
            (FlightPhase::Landed, true) => {
                self.phase = FlightPhase::Flying;
                self.since_flying_report = 0.0;
                info!(
                    from = %FlightPhase::Landed,
                    to = %FlightPhase::Flying,
                    ground_speed = snapshot.ground_speed,
                    vertical_speed = snapshot.vertical_speed,
                    agl = snapshot.agl,
                    "Flight phase transition"
                );
                Some(PhaseEvent::flying(snapshot))
            }
            _ => None,
        }
    }

    fn heartbeat(&mut self, tick: Tick, snapshot: &TelemetrySnapshot) -> Option<PhaseEvent> {
        self.since_flying_report += tick.elapsed_since_last_call;
        if self.since_flying_report < self.heartbeat_period {
            return None;
        }
        self.since_flying_report = 0.0;
        Some(PhaseEvent::flying(snapshot))
    }

    /// Force a specific phase (for testing).
    #[cfg(test)]
    pub fn set_phase(&mut self, phase: FlightPhase) {
        self.phase = phase;
        self.first_tick_time = Some(f32::MIN);
    }
}

impl Default for FlightPhaseDetector {
    fn default() -> Self {
        Self::new()
    }
}
