//! Flight path projection onto the glide slope.
//!
//! Paths are lazy iterators over the flight history. Each one yields an
//! anchor point first, then walks the history away from it, stopping at
//! the first sample that breaks the heading guard or leaves the frame.
//! Points closer than [`POINT_DIFFERENCE_THRESHOLD`] to the previously
//! emitted one are skipped, so dense taxi data collapses into a few
//! vertices.

use std::fmt;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use super::geometry::Point;
use super::{GlideSlope, POINT_DIFFERENCE_THRESHOLD};
use crate::flight_history::FlightHistory;
use crate::flight_phase::LANDING_HEADING_THRESHOLD_DEG;
use crate::geo::{heading_delta, GeoPoint};
use crate::telemetry::TelemetrySample;

/// Which path the projector produced for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    /// Nothing to draw.
    #[default]
    Idle,
    /// Pre- and post-landing paths around a recorded landing.
    Landing,
    /// Approach towards the previous touchdown point.
    Approach,
}

impl PathMode {
    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Landing => "landing",
            Self::Approach => "approach",
        }
    }
}

impl fmt::Display for PathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Points to draw for one frame.
///
/// In approach mode the approach trace is carried in `pre_landing`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlidePath {
    pub pre_landing: Vec<Point>,
    pub post_landing: Vec<Point>,
    pub mode: PathMode,
}

impl GlidePath {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.pre_landing.is_empty() && self.post_landing.is_empty()
    }
}

/// Distance trend towards the previous touchdown point across frames.
///
/// The approach trace is only drawn while the aircraft keeps closing in on
/// the reference distance. Equal distances (a paused sim) re-arm the
/// reference; moving away drops it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ApproachTrend {
    reference_distance: Option<f64>,
}

impl ApproachTrend {
    /// Trend without a reference distance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current distance from the touchdown point.
    ///
    /// Returns `true` when the approach should be drawn this frame.
    pub fn observe(&mut self, distance: f64) -> bool {
        match self.reference_distance {
            Some(reference) if distance < reference => true,
            Some(reference) if distance > reference => {
                debug!(
                    distance = distance,
                    reference = reference,
                    "Moving away from touchdown point, approach trace suspended"
                );
                self.reference_distance = None;
                false
            }
            _ => {
                self.reference_distance = Some(distance);
                false
            }
        }
    }

    /// Forget the reference distance.
    pub fn reset(&mut self) {
        self.reference_distance = None;
    }

    /// Distance seen on the last arming frame.
    pub fn reference_distance(&self) -> Option<f64> {
        self.reference_distance
    }
}

/// Lazy sequence of window points along a recorded path.
#[derive(Debug, Clone)]
pub struct PathPoints<I> {
    glide_slope: GlideSlope,
    samples: I,
    /// Distances are measured from here.
    origin: GeoPoint,
    /// Heading the guard compares against.
    heading: f32,
    /// Mirror around the landing point (post-landing rollout).
    mirror: bool,
    anchor: Option<Point>,
    last: Point,
    finished: bool,
}

impl<I> PathPoints<I> {
    fn new(
        glide_slope: GlideSlope,
        samples: I,
        origin: GeoPoint,
        heading: f32,
        mirror: bool,
        anchor: Point,
    ) -> Self {
        Self {
            glide_slope,
            samples,
            origin,
            heading,
            mirror,
            anchor: Some(anchor),
            last: anchor,
            finished: false,
        }
    }
}

impl<'s, I> Iterator for PathPoints<I>
where
    I: Iterator<Item = &'s TelemetrySample>,
{
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if let Some(anchor) = self.anchor.take() {
            self.last = anchor;
            return Some(anchor);
        }
        if self.finished {
            return None;
        }

        for sample in self.samples.by_ref() {
            if heading_delta(self.heading, sample.heading) >= LANDING_HEADING_THRESHOLD_DEG {
                trace!(heading = sample.heading, "Path stopped at heading guard");
                break;
            }

            let distance = self.origin.distance_to(&sample.position());
            let mut point = self.glide_slope.world_to_window(distance, sample.agl);
            if self.mirror {
                point = point.mirrored_x(self.glide_slope.slope().left);
            }
            if !self.glide_slope.frame().contains(point) {
                trace!(point = %point, "Path left the frame");
                break;
            }

            if point.differs_from(&self.last, POINT_DIFFERENCE_THRESHOLD) {
                self.last = point;
                return Some(point);
            }
        }

        self.finished = true;
        None
    }
}

impl<'s, I> FusedIterator for PathPoints<I> where I: Iterator<Item = &'s TelemetrySample> {}

impl GlideSlope {
    /// Path flown before the landing, walking back in time.
    ///
    /// Starts at the landing point (bottom left of the slope). `None` when
    /// no landing is recorded.
    pub fn pre_landing_path<'s>(
        &self,
        history: &'s FlightHistory,
    ) -> Option<PathPoints<impl Iterator<Item = &'s TelemetrySample> + 's>> {
        let landing = history.landing()?;
        let samples = history.before_landing()?;
        Some(PathPoints::new(
            *self,
            samples,
            landing.position(),
            landing.heading,
            false,
            self.slope().bottom_left(),
        ))
    }

    /// Rollout after the landing, walking forward in time and mirrored to
    /// the left of the landing point.
    pub fn post_landing_path<'s>(
        &self,
        history: &'s FlightHistory,
    ) -> Option<PathPoints<impl Iterator<Item = &'s TelemetrySample> + 's>> {
        let landing = history.landing()?;
        let samples = history.from_landing()?;
        Some(PathPoints::new(
            *self,
            samples,
            landing.position(),
            landing.heading,
            true,
            self.slope().bottom_left(),
        ))
    }

    /// Approach towards the previous touchdown point, newest sample first.
    ///
    /// Only while no landing is recorded, the latest heading is near the
    /// previous touchdown heading, and `trend` says the aircraft is still
    /// closing in.
    pub fn approach_path<'s>(
        &self,
        history: &'s FlightHistory,
        trend: &mut ApproachTrend,
    ) -> Option<PathPoints<impl Iterator<Item = &'s TelemetrySample> + 's>> {
        if history.landing_index().is_some() {
            return None;
        }
        let fix = history.last_landing()?;
        let last = history.last()?;
        if !fix.is_heading_near(last.heading) {
            return None;
        }
        if !trend.observe(fix.distance_to(last.lat, last.lon)) {
            return None;
        }

        let mut samples = history.iter().rev();
        let newest = samples.next()?;
        let anchor = self.world_to_window(fix.distance_to(newest.lat, newest.lon), newest.agl);
        Some(PathPoints::new(
            *self,
            samples,
            fix.sample().position(),
            fix.heading(),
            false,
            anchor,
        ))
    }

    /// Everything to draw for one frame.
    pub fn compute_path(&self, history: &FlightHistory, trend: &mut ApproachTrend) -> GlidePath {
        if history.landing_index().is_some() {
            trend.reset();
            let pre_landing: Vec<Point> = self
                .pre_landing_path(history)
                .map(Iterator::collect)
                .unwrap_or_default();
            let post_landing: Vec<Point> = self
                .post_landing_path(history)
                .map(Iterator::collect)
                .unwrap_or_default();
            return GlidePath {
                pre_landing,
                post_landing,
                mode: PathMode::Landing,
            };
        }

        match self.approach_path(history, trend) {
            Some(points) => GlidePath {
                pre_landing: points.collect(),
                post_landing: Vec::new(),
                mode: PathMode::Approach,
            },
            None => GlidePath::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight_history::HistoryConfig;
    use crate::geo::EARTH_RADIUS_M;
    use crate::glide_slope::{distance_to_height, GlideSlopeConfig, Rect};

    const LANDING_LAT: f64 = 47.0;
    const LANDING_LON: f64 = 8.0;

    fn glide_slope() -> GlideSlope {
        let config = GlideSlopeConfig {
            runway_distance_m: 926.0,
            approach_distance_m: 1852.0,
            ..Default::default()
        };
        GlideSlope::new(Rect::from_size(400.0, 300.0), &config)
    }

    /// Sample `distance` meters south of the landing point (negative is north).
    fn sample_at(time: f32, distance: f64, agl: f32, heading: f32, flying: bool) -> TelemetrySample {
        TelemetrySample {
            time,
            ground_speed: 60.0,
            vertical_speed: if flying { -3.0 } else { 0.0 },
            agl,
            msl: 1000.0 + agl * 3.28,
            lat: LANDING_LAT - (distance / EARTH_RADIUS_M).to_degrees(),
            lon: LANDING_LON,
            heading,
            flying,
        }
    }

    /// Approach on the nominal slope from `start` meters out, every `step`
    /// meters, with headings from `heading_at`.
    fn fly_approach(
        history: &mut FlightHistory,
        start: f64,
        step: f64,
        heading_at: impl Fn(f64) -> f32,
    ) -> f32 {
        let mut time = 0.0;
        let mut distance = start;
        while distance > 0.0 {
            let agl = distance_to_height(distance as f32);
            history.append(sample_at(time, distance, agl, heading_at(distance), true));
            time += 1.0;
            distance -= step;
        }
        time
    }

    /// Touchdown at the landing point followed by a rollout to `rollout`
    /// meters past it.
    fn land_and_roll(history: &mut FlightHistory, mut time: f32, rollout: f64, step: f64) {
        history.append(sample_at(time, 0.0, 0.0, 0.0, false));
        let mut distance = step;
        while distance <= rollout {
            time += 1.0;
            history.append(sample_at(time, -distance, 0.0, 0.0, false));
            distance += step;
        }
    }

    fn landed_history(rollout: f64) -> FlightHistory {
        let mut history = FlightHistory::with_config(HistoryConfig::unbounded());
        let time = fly_approach(&mut history, 1800.0, 45.0, |_| 0.0);
        land_and_roll(&mut history, time, rollout, 30.0);
        history
    }

    #[test]
    fn test_no_landing_no_landing_paths() {
        let gs = glide_slope();
        let mut history = FlightHistory::with_config(HistoryConfig::unbounded());
        fly_approach(&mut history, 900.0, 45.0, |_| 0.0);

        assert!(gs.pre_landing_path(&history).is_none());
        assert!(gs.post_landing_path(&history).is_none());
    }

    #[test]
    fn test_pre_landing_path_walks_back_from_landing_point() {
        let gs = glide_slope();
        let history = landed_history(300.0);

        let points: Vec<Point> = gs
            .pre_landing_path(&history)
            .map(Iterator::collect)
            .unwrap_or_default();

        assert!(points.len() > 10);
        assert_eq!(points[0], gs.slope().bottom_left());
        for pair in points.windows(2) {
            assert!(pair[1].x > pair[0].x, "path should move away from the runway");
        }
        assert!(points.iter().all(|p| gs.frame().contains(*p)));
    }

    #[test]
    fn test_pre_landing_path_follows_slope() {
        let gs = glide_slope();
        let history = landed_history(0.0);
        let slope = gs.slope();

        let points: Vec<Point> = gs
            .pre_landing_path(&history)
            .map(Iterator::collect)
            .unwrap_or_default();

        // On-slope samples project onto the center line.
        for p in &points[1..] {
            let expected_y = slope.bottom + (p.x - slope.left) * slope.height() / slope.width();
            assert!((p.y - expected_y).abs() < 0.5, "{p} off the slope line");
        }
    }

    #[test]
    fn test_post_landing_path_is_mirrored() {
        let gs = glide_slope();
        let history = landed_history(600.0);
        let slope_left = gs.slope().left;

        let points: Vec<Point> = gs
            .post_landing_path(&history)
            .map(Iterator::collect)
            .unwrap_or_default();

        assert!(points.len() > 1);
        assert_eq!(points[0], gs.slope().bottom_left());
        for p in &points[1..] {
            assert!(p.x < slope_left);
            assert_eq!(p.y, gs.slope().bottom);
        }
    }

    #[test]
    fn test_path_stops_at_frame_edge() {
        let gs = glide_slope();
        let history = landed_history(1500.0);

        let points: Vec<Point> = gs
            .post_landing_path(&history)
            .map(Iterator::collect)
            .unwrap_or_default();

        assert!(points.iter().all(|p| gs.frame().contains(*p)));
        let leftmost = points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        assert!(leftmost >= gs.frame().left);
        // 1500 m of rollout would reach well past the left edge.
        assert!(leftmost < gs.frame().left + 20.0);
    }

    #[test]
    fn test_heading_guard_truncates_pre_landing_walk() {
        let gs = glide_slope();
        let mut history = FlightHistory::with_config(HistoryConfig::unbounded());
        // Turned onto final at 900 m; the older samples further out are
        // back on the runway heading but must not be drawn.
        let time = fly_approach(&mut history, 1800.0, 45.0, |distance| {
            if distance > 1500.0 {
                0.0
            } else if distance > 900.0 {
                15.0
            } else {
                0.0
            }
        });
        land_and_roll(&mut history, time, 0.0, 30.0);

        let points: Vec<Point> = gs
            .pre_landing_path(&history)
            .map(Iterator::collect)
            .unwrap_or_default();

        let limit = gs.world_to_window_x(900.0) + 0.01;
        assert!(points.len() > 1);
        assert!(points.iter().all(|p| p.x <= limit));
    }

    #[test]
    fn test_dense_samples_are_decimated() {
        let gs = glide_slope();
        let mut history = FlightHistory::with_config(HistoryConfig::unbounded());
        let time = fly_approach(&mut history, 90.0, 45.0, |_| 0.0);
        land_and_roll(&mut history, time, 40.0, 0.2);
        assert!(history.len() > 150);

        let points: Vec<Point> = gs
            .post_landing_path(&history)
            .map(Iterator::collect)
            .unwrap_or_default();

        assert!(points.len() < 20);
        for pair in points.windows(2) {
            assert!(pair[1].differs_from(&pair[0], POINT_DIFFERENCE_THRESHOLD));
        }
    }

    #[test]
    fn test_path_is_restartable() {
        let gs = glide_slope();
        let history = landed_history(300.0);

        let first: Vec<Point> = gs
            .pre_landing_path(&history)
            .map(Iterator::collect)
            .unwrap_or_default();
        let second: Vec<Point> = gs
            .pre_landing_path(&history)
            .map(Iterator::collect)
            .unwrap_or_default();

        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_path_landing_mode() {
        let gs = glide_slope();
        let history = landed_history(300.0);
        let mut trend = ApproachTrend::new();
        trend.observe(500.0);

        let path = gs.compute_path(&history, &mut trend);

        assert_eq!(path.mode, PathMode::Landing);
        assert!(!path.pre_landing.is_empty());
        assert!(!path.post_landing.is_empty());
        assert_eq!(trend.reference_distance(), None);
    }

    #[test]
    fn test_compute_path_idle_without_history() {
        let gs = glide_slope();
        let history = FlightHistory::new();
        let mut trend = ApproachTrend::new();

        let path = gs.compute_path(&history, &mut trend);

        assert_eq!(path.mode, PathMode::Idle);
        assert!(path.is_empty());
    }

    #[test]
    fn test_approach_mode_after_reset() {
        let gs = glide_slope();
        let mut history = landed_history(300.0);
        history.reset();
        let mut trend = ApproachTrend::new();

        history.append(sample_at(100.0, 1500.0, distance_to_height(1500.0), 0.0, true));
        history.append(sample_at(101.0, 1450.0, distance_to_height(1450.0), 0.0, true));

        // First frame only establishes the trend.
        let path = gs.compute_path(&history, &mut trend);
        assert_eq!(path.mode, PathMode::Idle);
        assert!(trend.reference_distance().is_some());

        history.append(sample_at(102.0, 1400.0, distance_to_height(1400.0), 0.0, true));
        let path = gs.compute_path(&history, &mut trend);

        assert_eq!(path.mode, PathMode::Approach);
        assert!(path.post_landing.is_empty());
        let newest = gs.world_to_window(1400.0, distance_to_height(1400.0));
        assert!((path.pre_landing[0].x - newest.x).abs() < 0.01);
        assert!((path.pre_landing[0].y - newest.y).abs() < 0.01);
        assert_eq!(path.pre_landing.len(), 3);
    }

    #[test]
    fn test_approach_mode_suspended_when_moving_away() {
        let gs = glide_slope();
        let mut history = landed_history(300.0);
        history.reset();
        let mut trend = ApproachTrend::new();

        history.append(sample_at(100.0, 1400.0, distance_to_height(1400.0), 0.0, true));
        gs.compute_path(&history, &mut trend);

        history.append(sample_at(101.0, 1450.0, distance_to_height(1450.0), 0.0, true));
        let path = gs.compute_path(&history, &mut trend);

        assert_eq!(path.mode, PathMode::Idle);
        assert_eq!(trend.reference_distance(), None);
    }

    #[test]
    fn test_approach_mode_requires_runway_heading() {
        let gs = glide_slope();
        let mut history = landed_history(300.0);
        history.reset();
        let mut trend = ApproachTrend::new();

        history.append(sample_at(100.0, 1500.0, distance_to_height(1500.0), 40.0, true));
        gs.compute_path(&history, &mut trend);
        history.append(sample_at(101.0, 1450.0, distance_to_height(1450.0), 40.0, true));
        let path = gs.compute_path(&history, &mut trend);

        assert_eq!(path.mode, PathMode::Idle);
        assert_eq!(trend.reference_distance(), None);
    }

    #[test]
    fn test_approach_trend() {
        let mut trend = ApproachTrend::new();

        assert!(!trend.observe(100.0));
        assert_eq!(trend.reference_distance(), Some(100.0));
        assert!(!trend.observe(100.0));
        assert!(trend.observe(90.0));
        // Reference stays put while closing in.
        assert_eq!(trend.reference_distance(), Some(100.0));
        assert!(trend.observe(95.0));

        assert!(!trend.observe(110.0));
        assert_eq!(trend.reference_distance(), None);
        assert!(!trend.observe(105.0));
        assert_eq!(trend.reference_distance(), Some(105.0));

        trend.reset();
        assert_eq!(trend.reference_distance(), None);
    }
}
