//! Phase-change events and the sink that receives them.

use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetrySnapshot;

/// Motion summary reported while airborne.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlyingEvent {
    /// Ground speed (m/s).
    pub ground_speed: f32,
    /// Vertical speed (m/s).
    pub vertical_speed: f32,
    /// Height above ground (m).
    pub agl: f32,
}

/// Motion summary captured at touchdown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandedEvent {
    /// Ground speed (m/s).
    pub ground_speed: f32,
    /// Vertical speed (m/s).
    pub vertical_speed: f32,
    /// Normal acceleration (m/s²).
    pub g_force: f32,
}

/// Event emitted by the flight phase detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhaseEvent {
    /// Took off, or heartbeat while airborne.
    Flying(FlyingEvent),
    /// Touched down.
    Landed(LandedEvent),
}

impl PhaseEvent {
    pub(crate) fn flying(snapshot: &TelemetrySnapshot) -> Self {
        PhaseEvent::Flying(FlyingEvent {
            ground_speed: snapshot.ground_speed,
            vertical_speed: snapshot.vertical_speed,
            agl: snapshot.agl,
        })
    }

    pub(crate) fn landed(snapshot: &TelemetrySnapshot) -> Self {
        PhaseEvent::Landed(LandedEvent {
            ground_speed: snapshot.ground_speed,
            vertical_speed: snapshot.vertical_speed,
            g_force: snapshot.vertical_accel,
        })
    }
}

/// Receiver of phase events (the presentation layer).
pub trait PhaseEventSink {
    /// Handle a phase event.
    fn on_event(&mut self, event: &PhaseEvent);

    /// Forget everything shown so far (user "clear" command).
    fn clear(&mut self) {}
}

/// Collects events in memory. Handy for hosts that poll and for tests.
impl PhaseEventSink for Vec<PhaseEvent> {
    fn on_event(&mut self, event: &PhaseEvent) {
        self.push(*event);
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}
