//! Raw per-tick telemetry readings.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// AGL above which the aircraft counts as flying regardless of gear forces.
pub const FLYING_AGL_THRESHOLD_M: f32 = 0.25;

/// Point-in-time telemetry readings from the simulator.
///
/// Field units are SI except `msl`, which the simulator reports in feet
/// and which is only ever displayed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySnapshot {
    /// Whether the simulator is replaying a recorded flight.
    pub in_replay: bool,
    /// Gear/ground contact force (newtons). Zero when no wheel touches.
    pub ground_contact_force: f32,
    /// Ground speed (m/s).
    pub ground_speed: f32,
    /// Vertical speed (m/s, negative descending).
    pub vertical_speed: f32,
    /// Normal acceleration reported at touchdown (m/s²).
    pub vertical_accel: f32,
    /// Height above ground level (m).
    pub agl: f32,
    /// Indicated altitude above mean sea level (ft).
    pub msl: f32,
    /// Latitude (degrees).
    pub lat: f64,
    /// Longitude (degrees).
    pub lon: f64,
    /// True heading (degrees, 0-360).
    pub heading: f32,
}

impl TelemetrySnapshot {
    /// Whether these readings describe an airborne aircraft.
    ///
    /// Wheels off the ground (zero gear force, outside replay) or clearly
    /// above the ground. The AGL term covers gear-up landings and aircraft
    /// without a usable gear force reading.
    pub fn is_flying(&self) -> bool {
        (!self.in_replay && self.ground_contact_force == 0.0) || self.agl > FLYING_AGL_THRESHOLD_M
    }

    /// Current position.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snapshot(in_replay: bool, force: f32, agl: f32) -> TelemetrySnapshot {
        TelemetrySnapshot {
            in_replay,
            ground_contact_force: force,
            agl,
            ..Default::default()
        }
    }

    #[test]
    fn test_airborne_without_gear_force() {
        assert!(snapshot(false, 0.0, 0.0).is_flying());
        assert!(snapshot(false, 0.0, 300.0).is_flying());
    }

    #[test]
    fn test_on_ground_with_gear_force() {
        assert!(!snapshot(false, 1500.0, 0.1).is_flying());
        assert!(!snapshot(false, -20.0, 0.25).is_flying());
    }

    #[test]
    fn test_replay_ignores_gear_force() {
        // Gear forces are meaningless during replay, only AGL counts
        assert!(!snapshot(true, 0.0, 0.1).is_flying());
        assert!(snapshot(true, 0.0, 0.3).is_flying());
    }

    #[test]
    fn test_high_agl_is_flying_even_with_force() {
        assert!(snapshot(false, 800.0, 0.26).is_flying());
    }

    proptest! {
        #[test]
        fn prop_never_flying_when_loaded_and_low(
            force in prop_oneof![-1.0e5f32..-1.0e-3, 1.0e-3f32..1.0e5],
            agl in -5.0f32..=FLYING_AGL_THRESHOLD_M,
            in_replay in any::<bool>(),
        ) {
            prop_assert!(!snapshot(in_replay, force, agl).is_flying());
        }

        #[test]
        fn prop_always_flying_above_threshold(
            force in -1.0e5f32..1.0e5,
            agl in (FLYING_AGL_THRESHOLD_M + 1.0e-3)..10_000.0f32,
            in_replay in any::<bool>(),
        ) {
            prop_assert!(snapshot(in_replay, force, agl).is_flying());
        }
    }
}
