//! Time-stamped telemetry samples stored in the flight history.

use serde::{Deserialize, Serialize};

use super::TelemetrySnapshot;
use crate::geo::GeoPoint;

/// Per-field tolerance below which two samples count as the same reading.
const SAMPLE_DIFFERENCE_EPSILON: f64 = 1e-6;

/// One recorded telemetry sample.
///
/// `flying` is the detector's verdict at the moment the sample was taken,
/// not when it was appended.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Simulation time (seconds).
    pub time: f32,
    /// Ground speed (m/s).
    pub ground_speed: f32,
    /// Vertical speed (m/s).
    pub vertical_speed: f32,
    /// Height above ground (m).
    pub agl: f32,
    /// Indicated altitude (ft, display only).
    pub msl: f32,
    /// Latitude (degrees).
    pub lat: f64,
    /// Longitude (degrees).
    pub lon: f64,
    /// True heading (degrees).
    pub heading: f32,
    /// Whether the aircraft was airborne.
    pub flying: bool,
}

impl TelemetrySample {
    /// Capture a sample from raw readings.
    pub fn from_snapshot(time: f32, snapshot: &TelemetrySnapshot, flying: bool) -> Self {
        Self {
            time,
            ground_speed: snapshot.ground_speed,
            vertical_speed: snapshot.vertical_speed,
            agl: snapshot.agl,
            msl: snapshot.msl,
            lat: snapshot.lat,
            lon: snapshot.lon,
            heading: snapshot.heading,
            flying,
        }
    }

    /// Sample position.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Whether `other` carries different telemetry.
    ///
    /// Time is ignored. Any tracked field moving by more than the epsilon,
    /// or a change of the flying flag, counts as a difference.
    pub fn differs_from(&self, other: &TelemetrySample) -> bool {
        let exceeds = |a: f64, b: f64| (a - b).abs() > SAMPLE_DIFFERENCE_EPSILON;

        exceeds(self.ground_speed as f64, other.ground_speed as f64)
            || exceeds(self.vertical_speed as f64, other.vertical_speed as f64)
            || exceeds(self.agl as f64, other.agl as f64)
            || exceeds(self.msl as f64, other.msl as f64)
            || exceeds(self.lat, other.lat)
            || exceeds(self.lon, other.lon)
            || exceeds(self.heading as f64, other.heading as f64)
            || self.flying != other.flying
    }
}
