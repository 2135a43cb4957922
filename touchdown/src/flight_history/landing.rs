//! Snapshot of the most recent touchdown.

use crate::flight_phase::LANDING_HEADING_THRESHOLD_DEG;
use crate::geo::{haversine_distance_m, heading_delta};
use crate::telemetry::TelemetrySample;

/// Copy of the ground sample taken at the most recent touchdown.
///
/// Outlives history resets so a go-around can still be compared against
/// the runway it left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingFix(TelemetrySample);

impl LandingFix {
    pub(crate) fn new(sample: TelemetrySample) -> Self {
        Self(sample)
    }

    /// The touchdown sample.
    pub fn sample(&self) -> &TelemetrySample {
        &self.0
    }

    /// Heading at touchdown (degrees).
    pub fn heading(&self) -> f32 {
        self.0.heading
    }

    /// Great-circle distance from the touchdown point (meters).
    pub fn distance_to(&self, lat: f64, lon: f64) -> f64 {
        haversine_distance_m(self.0.lat, self.0.lon, lat, lon)
    }

    /// Whether `heading` is strictly within the landing heading guard.
    pub fn is_heading_near(&self, heading: f32) -> bool {
        heading_delta(self.0.heading, heading) < LANDING_HEADING_THRESHOLD_DEG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix_at(heading: f32) -> LandingFix {
        LandingFix::new(TelemetrySample {
            lat: 47.0,
            lon: 8.0,
            heading,
            ..Default::default()
        })
    }

    #[test]
    fn test_heading_guard_boundary() {
        let fix = fix_at(90.0);
        assert!(fix.is_heading_near(90.0));
        assert!(fix.is_heading_near(104.5));
        assert!(fix.is_heading_near(75.5));
        assert!(!fix.is_heading_near(105.0));
        assert!(!fix.is_heading_near(120.0));
    }

    #[test]
    fn test_heading_guard_wraps_north() {
        let fix = fix_at(355.0);
        assert!(fix.is_heading_near(5.0));
        assert!(!fix.is_heading_near(20.0));
    }

    #[test]
    fn test_distance_from_touchdown() {
        let fix = fix_at(0.0);
        assert_eq!(fix.distance_to(47.0, 8.0), 0.0);
        assert!(fix.distance_to(47.01, 8.0) > 1000.0);
    }
}
