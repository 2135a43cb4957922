//! Landing session: one detector, one history, one approach trend.
//!
//! The session is the single owner of all mutable landing state. The host
//! drives it from its flight loop and redraw callbacks:
//!
//! ```text
//! flight loop ──► on_tick ──► FlightPhaseDetector ──► PhaseEventSink
//!                   │
//!                   ├── heading guard (reset history on go-around)
//!                   └── FlightHistory::append
//!
//! redraw ───────► glide_path ──► GlideSlope::compute_path ──► GlidePath
//! ```

use tracing::{debug, info, trace};

use crate::flight_history::{AppendOutcome, FlightHistory, HistoryConfig};
use crate::flight_phase::{FlightPhase, FlightPhaseDetector, PhaseEventSink};
use crate::glide_slope::{ApproachTrend, GlidePath, GlideSlope, GlideSlopeConfig, Rect};
use crate::telemetry::{TelemetryProvider, TelemetrySample, Tick};

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The provider had no telemetry.
    NoTelemetry,
    /// Still inside the settle-down window.
    Settling,
    /// Telemetry was processed and offered to the history.
    Recorded(AppendOutcome),
}

/// Landing analysis for one plugin activation.
#[derive(Debug)]
pub struct LandingSession {
    detector: FlightPhaseDetector,
    history: FlightHistory,
    trend: ApproachTrend,
    config: GlideSlopeConfig,
}

impl LandingSession {
    /// Create a session.
    pub fn new(config: GlideSlopeConfig, history_config: HistoryConfig) -> Self {
        debug!(
            runway_distance_m = config.runway_distance_m,
            approach_distance_m = config.approach_distance_m,
            max_track_distance_m = ?history_config.max_track_distance_m,
            "Landing session created"
        );
        Self {
            detector: FlightPhaseDetector::new(),
            history: FlightHistory::with_config(history_config),
            trend: ApproachTrend::new(),
            config,
        }
    }

    /// Create a session whose history covers the whole overlay.
    pub fn with_config(config: GlideSlopeConfig) -> Self {
        let history_config = HistoryConfig::covering(config.view_distance_m());
        Self::new(config, history_config)
    }

    /// Process one flight-loop tick.
    pub fn on_tick<P, S>(&mut self, tick: Tick, provider: &mut P, sink: &mut S) -> TickOutcome
    where
        P: TelemetryProvider + ?Sized,
        S: PhaseEventSink + ?Sized,
    {
        let Some(snapshot) = provider.read() else {
            trace!(time = tick.elapsed_time, "No telemetry this tick");
            return TickOutcome::NoTelemetry;
        };

        let Some(update) = self.detector.update(tick, &snapshot) else {
            return TickOutcome::Settling;
        };

        if let Some(event) = &update.event {
            sink.on_event(event);
        }

        if self.detector.heading_guard_tripped(&snapshot, &self.history) {
            info!(
                heading = snapshot.heading,
                samples = self.history.len(),
                "Heading deviated from landing, resetting flight history"
            );
            self.history.reset();
        }

        let sample = TelemetrySample::from_snapshot(tick.elapsed_time, &snapshot, update.flying);
        TickOutcome::Recorded(self.history.append(sample))
    }

    /// User "clear" command: drop the recorded flight and the sink's log.
    pub fn clear<S>(&mut self, sink: &mut S)
    where
        S: PhaseEventSink + ?Sized,
    {
        info!(samples = self.history.len(), "Clearing flight history");
        self.history.reset();
        sink.clear();
    }

    /// Overlay laid out in `frame` with the session's configuration.
    pub fn glide_slope(&self, frame: Rect) -> GlideSlope {
        GlideSlope::new(frame, &self.config)
    }

    /// Path points for one redraw.
    pub fn glide_path(&mut self, frame: Rect) -> GlidePath {
        let glide_slope = self.glide_slope(frame);
        glide_slope.compute_path(&self.history, &mut self.trend)
    }

    /// Plugin disable/enable cycle.
    ///
    /// The detector goes back to `Unknown` and settles down again; the
    /// history is cleared.
    pub fn reactivate(&mut self) {
        info!("Landing session reactivated");
        self.detector.reset();
        self.history.reset();
        self.trend.reset();
    }

    /// Apply reloaded settings.
    ///
    /// A history cap shorter than the new overlay is widened to cover it.
    pub fn set_config(&mut self, config: GlideSlopeConfig) {
        let view_distance = config.view_distance_m();
        let too_short = self
            .history
            .config()
            .max_track_distance_m
            .is_some_and(|cap| cap < view_distance);
        if too_short {
            self.history
                .set_config(HistoryConfig::covering(view_distance));
        }
        self.config = config;
    }

    /// Overlay reference distances in use.
    pub fn config(&self) -> &GlideSlopeConfig {
        &self.config
    }

    /// Current detected flight phase.
    pub fn phase(&self) -> FlightPhase {
        self.detector.phase()
    }

    /// Recorded flight history.
    pub fn history(&self) -> &FlightHistory {
        &self.history
    }
}

impl Default for LandingSession {
    fn default() -> Self {
        Self::with_config(GlideSlopeConfig::default())
    }
}
