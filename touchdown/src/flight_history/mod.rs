//! Flight history around the most recent landing.
//!
//! Keeps an ordered, append-only record of telemetry samples from the
//! first airborne sample onwards, remembers where the landing happened,
//! and keeps a copy of the most recent touchdown sample that survives
//! resets.
//!
//! # Append rules
//!
//! Applied in this order to every incoming sample:
//!
//! 1. **Pre-flight filter**: nothing is recorded until the first airborne
//!    sample.
//! 2. **Coalescing**: a sample carrying the same telemetry as the last
//!    stored one only advances that sample's time.
//! 3. **Discontinuity reset**: an AGL jump of more than 5 m against the
//!    last stored sample means the situation was reloaded or the aircraft
//!    repositioned. The history is cleared first.
//! 4. **Landing capture**: the first airborne→ground transition sets the
//!    landing index. Every such transition refreshes the landing fix.
//!
//! With a track-distance cap configured, the oldest samples are dropped
//! once the approach gets longer than the cap. Once a landing is recorded
//! the approach is frozen until the next reset: taxiing never evicts it,
//! and the landing sample itself is never dropped.

mod landing;

pub use landing::LandingFix;

use std::collections::VecDeque;

use tracing::{debug, info, trace};

use crate::geo::NM_TO_METERS;
use crate::telemetry::TelemetrySample;

/// AGL change between consecutive samples treated as a reload (meters).
pub const AGL_DISCONTINUITY_THRESHOLD_M: f32 = 5.0;

/// Default cap on stored track length (3 nm).
pub const DEFAULT_MAX_TRACK_DISTANCE_M: f64 = 3.0 * NM_TO_METERS;

/// Configuration for the flight history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    /// Maximum cumulative distance covered by stored samples, or `None`
    /// for an unbounded history.
    pub max_track_distance_m: Option<f64>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_track_distance_m: Some(DEFAULT_MAX_TRACK_DISTANCE_M),
        }
    }
}

impl HistoryConfig {
    /// No cap on stored track length.
    pub fn unbounded() -> Self {
        Self {
            max_track_distance_m: None,
        }
    }

    /// Cap that keeps at least `distance_m` of track.
    ///
    /// Never below the default cap.
    pub fn covering(distance_m: f64) -> Self {
        Self {
            max_track_distance_m: Some(distance_m.max(DEFAULT_MAX_TRACK_DISTANCE_M)),
        }
    }
}

/// What [`FlightHistory::append`] did with a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Dropped by the pre-flight filter.
    Skipped,
    /// Merged into the last stored sample (time advanced).
    Coalesced,
    /// Stored as a new sample.
    Appended,
    /// History cleared by an AGL discontinuity. `stored` tells whether the
    /// sample then became the first entry (it does not if it is a ground
    /// sample, as the pre-flight filter applies again).
    Restarted {
        /// Whether the sample was stored after the reset.
        stored: bool,
    },
}

/// Recorded flight history.
///
/// External code can read samples but never splice them; all mutation goes
/// through [`append`](Self::append) and [`reset`](Self::reset).
#[derive(Debug)]
pub struct FlightHistory {
    /// Stored samples (oldest first).
    samples: VecDeque<TelemetrySample>,
    /// Index of the first ground sample after flight.
    landing_index: Option<usize>,
    /// Most recent touchdown. Survives resets.
    last_landing: Option<LandingFix>,
    /// Sum of great-circle distances between consecutive samples (meters).
    track_distance_m: f64,
    /// Configuration.
    config: HistoryConfig,
}

impl Default for FlightHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightHistory {
    /// Create a new flight history with default configuration.
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            samples: VecDeque::new(),
            landing_index: None,
            last_landing: None,
            track_distance_m: 0.0,
            config,
        }
    }

    /// Record a sample.
    pub fn append(&mut self, sample: TelemetrySample) -> AppendOutcome {
        if self.samples.is_empty() && !sample.flying {
            return AppendOutcome::Skipped;
        }

        let mut restarted = false;
        if let Some(last) = self.samples.back_mut() {
            if !sample.differs_from(last) {
                last.time = sample.time;
                return AppendOutcome::Coalesced;
            }

            let agl_jump = (sample.agl - last.agl).abs();
            if agl_jump > AGL_DISCONTINUITY_THRESHOLD_M {
                info!(
                    agl_jump = agl_jump,
                    samples = self.samples.len(),
                    "AGL discontinuity, resetting flight history"
                );
                self.reset();
                restarted = true;
                if !sample.flying {
                    return AppendOutcome::Restarted { stored: false };
                }
            }
        }

        if let Some(last) = self.samples.back() {
            if last.flying && !sample.flying {
                if self.landing_index.is_none() {
                    self.landing_index = Some(self.samples.len());
                    info!(
                        index = self.samples.len(),
                        ground_speed = sample.ground_speed,
                        vertical_speed = sample.vertical_speed,
                        heading = sample.heading,
                        "Landing captured"
                    );
                }
                self.last_landing = Some(LandingFix::new(sample));
            }
            self.track_distance_m += last.position().distance_to(&sample.position());
        }

        trace!(
            time = sample.time,
            agl = sample.agl,
            flying = sample.flying,
            "Sample recorded"
        );
        self.samples.push_back(sample);
        self.enforce_track_cap();

        if restarted {
            AppendOutcome::Restarted { stored: true }
        } else {
            AppendOutcome::Appended
        }
    }

    /// Clear all samples and the landing index.
    ///
    /// The landing fix is kept so the approach to the same runway can
    /// still be drawn after a go-around.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.samples.shrink_to_fit();
        self.landing_index = None;
        self.track_distance_m = 0.0;
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate samples oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TelemetrySample> + ExactSizeIterator {
        self.samples.iter()
    }

    /// Sample at `index`.
    pub fn get(&self, index: usize) -> Option<&TelemetrySample> {
        self.samples.get(index)
    }

    /// Index of the landing sample since the last reset.
    pub fn landing_index(&self) -> Option<usize> {
        self.landing_index
    }

    /// Landing sample since the last reset.
    pub fn landing(&self) -> Option<&TelemetrySample> {
        self.samples.get(self.landing_index?)
    }

    /// Samples before the landing, newest first.
    pub fn before_landing(&self) -> Option<impl Iterator<Item = &TelemetrySample>> {
        let index = self.landing_index?;
        Some(self.samples.range(..index).rev())
    }

    /// Samples from the landing onwards, oldest first.
    pub fn from_landing(&self) -> Option<impl Iterator<Item = &TelemetrySample>> {
        let index = self.landing_index?;
        Some(self.samples.range(index..))
    }

    /// Most recent sample.
    pub fn last(&self) -> Option<&TelemetrySample> {
        self.samples.back()
    }

    /// Most recent touchdown, possibly from before the last reset.
    pub fn last_landing(&self) -> Option<&LandingFix> {
        self.last_landing.as_ref()
    }

    /// Whether `heading` is within the guard of the most recent touchdown.
    ///
    /// False when no touchdown has been recorded.
    pub fn is_heading_near_last_landing(&self, heading: f32) -> bool {
        self.last_landing
            .as_ref()
            .is_some_and(|fix| fix.is_heading_near(heading))
    }

    /// Distance from the most recent touchdown (meters).
    ///
    /// `None` when no touchdown has been recorded.
    pub fn distance_from_last_landing(&self, lat: f64, lon: f64) -> Option<f64> {
        self.last_landing
            .as_ref()
            .map(|fix| fix.distance_to(lat, lon))
    }

    /// Cumulative track length covered by the stored samples (meters).
    pub fn track_distance(&self) -> f64 {
        self.track_distance_m
    }

    /// Current configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Replace the configuration and apply a changed cap right away.
    pub fn set_config(&mut self, config: HistoryConfig) {
        if config != self.config {
            debug!(
                max_track_distance_m = ?config.max_track_distance_m,
                "Flight history configuration changed"
            );
            self.config = config;
            self.enforce_track_cap();
        }
    }

    /// Drop the oldest samples while the capped track is too long.
    ///
    /// Only the approach counts against the cap. Once a landing is recorded
    /// the samples up to it are frozen: the ground run after touchdown never
    /// evicts approach samples.
    fn enforce_track_cap(&mut self) {
        let Some(cap) = self.config.max_track_distance_m else {
            return;
        };
        if let Some(index) = self.landing_index {
            // Capped only at the moment of capture, while the landing
            // sample is still the newest.
            if index + 1 != self.samples.len() {
                return;
            }
        }

        let mut dropped = 0usize;
        while self.track_distance_m > cap && self.samples.len() > 1 {
            if self.landing_index == Some(0) {
                break;
            }
            let Some(oldest) = self.samples.pop_front() else {
                break;
            };
            if let Some(next) = self.samples.front() {
                self.track_distance_m -= oldest.position().distance_to(&next.position());
            }
            if let Some(index) = self.landing_index.as_mut() {
                *index -= 1;
            }
            dropped += 1;
        }

        if dropped > 0 {
            self.track_distance_m = track_length(self.samples.iter());
            debug!(
                dropped = dropped,
                track_distance_m = self.track_distance_m,
                "Trimmed flight history to track cap"
            );
        }
    }
}

/// Sum of great-circle distances between consecutive samples (meters).
fn track_length<'a, I>(samples: I) -> f64
where
    I: Iterator<Item = &'a TelemetrySample> + Clone,
{
    samples
        .clone()
        .zip(samples.skip(1))
        .map(|(a, b)| a.position().distance_to(&b.position()))
        .sum()
}
