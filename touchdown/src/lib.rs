//! Touchdown - Landing analysis for X-Plane
//!
//! This library detects takeoffs and landings from per-tick simulator
//! telemetry, records the flight around the most recent landing, and
//! projects it onto a side view of a nominal 3° glide slope.
//!
//! # Architecture
//!
//! ```text
//! Host flight loop ──► LandingSession::on_tick
//!                        ├── FlightPhaseDetector ──► PhaseEventSink (LandingLog)
//!                        └── FlightHistory
//!
//! Host redraw ───────► LandingSession::glide_path ──► GlideSlope ──► GlidePath
//! ```
//!
//! The host owns the simulator bindings: it supplies a [`telemetry::Tick`]
//! and a [`telemetry::TelemetryProvider`] every flight-loop invocation and
//! draws the returned points. Nothing here blocks or spawns threads.

pub mod flight_history;
pub mod flight_phase;
pub mod geo;
pub mod glide_slope;
pub mod landing_log;
pub mod logging;
pub mod session;
pub mod settings;
pub mod telemetry;
pub mod trace;

pub use flight_history::{FlightHistory, HistoryConfig};
pub use flight_phase::{FlightPhase, FlightPhaseDetector, PhaseEvent, PhaseEventSink};
pub use glide_slope::{GlidePath, GlideSlope, GlideSlopeConfig};
pub use landing_log::LandingLog;
pub use session::{LandingSession, TickOutcome};
pub use settings::Settings;
pub use telemetry::{TelemetryProvider, TelemetrySample, TelemetrySnapshot, Tick};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
