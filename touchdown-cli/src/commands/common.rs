//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use console::style;
use touchdown::glide_slope::{GlidePath, Rect};
use touchdown::settings::LoadedSettings;
use touchdown::trace::{read_trace, TraceRecord};
use touchdown::{LandingLog, LandingSession, Settings, TickOutcome};

use crate::error::CliError;

/// Settings together with the file they came from.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// File that was read, if any.
    pub path: Option<PathBuf>,
    pub loaded: LoadedSettings,
}

/// Load settings from an explicit file or the default location.
///
/// An explicitly named file must exist. Without one the default location is
/// tried and defaults are used when it is absent.
pub fn load_settings(explicit: Option<&Path>) -> Result<ResolvedSettings, CliError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Settings file not found: {}",
                path.display()
            )));
        }
        let loaded = Settings::load(path)?;
        return Ok(ResolvedSettings {
            path: Some(path.to_path_buf()),
            loaded,
        });
    }

    match Settings::default_path() {
        Some(path) => {
            let loaded = Settings::load(&path)?;
            Ok(ResolvedSettings {
                path: Some(path),
                loaded,
            })
        }
        None => Ok(ResolvedSettings {
            path: None,
            loaded: LoadedSettings {
                settings: Settings::default(),
                warnings: Vec::new(),
                found: false,
            },
        }),
    }
}

/// Print ignored settings lines to stderr.
pub fn print_setting_warnings(settings: &ResolvedSettings) {
    for warning in &settings.loaded.warnings {
        eprintln!("{} {}", style("warning:").yellow().bold(), warning);
    }
}

/// Overlay frame for a window of the given size.
pub fn overlay_frame(width: u32, height: u32) -> Result<Rect, CliError> {
    if width == 0 || height == 0 {
        return Err(CliError::Config(format!(
            "Overlay size must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(Rect::from_size(width as f32, height as f32))
}

/// Outcome of feeding a trace through a landing session.
#[derive(Debug)]
pub struct Replay {
    pub session: LandingSession,
    pub log: LandingLog,
    /// Flight-loop invocations replayed.
    pub ticks: usize,
    /// Ticks without telemetry.
    pub gaps: usize,
    /// Ticks that added or merged a history sample.
    pub recorded: usize,
    /// Result of the redraw after the last tick with telemetry.
    pub path: GlidePath,
}

/// Feed every record of a trace through a fresh session.
///
/// The overlay in `frame` is redrawn after every tick that carried
/// telemetry, the way the simulator redraws between flight-loop calls.
/// The approach trace depends on the distance trend across redraws, so a
/// single redraw at the end would never show it.
pub fn replay_records(records: &[TraceRecord], settings: &Settings, frame: Rect) -> Replay {
    let mut session = LandingSession::with_config(settings.glide_slope);
    let mut log = LandingLog::new();
    let mut path = GlidePath::default();
    let mut gaps = 0;
    let mut recorded = 0;

    for record in records {
        let mut provider = *record;
        match session.on_tick(record.tick, &mut provider, &mut log) {
            TickOutcome::NoTelemetry => {
                gaps += 1;
                continue;
            }
            TickOutcome::Settling => {}
            TickOutcome::Recorded(_) => recorded += 1,
        }
        path = session.glide_path(frame);
    }

    tracing::info!(
        ticks = records.len(),
        gaps,
        recorded,
        stored = session.history().len(),
        phase = %session.phase(),
        mode = %path.mode,
        "Trace replayed"
    );

    Replay {
        session,
        log,
        ticks: records.len(),
        gaps,
        recorded,
        path,
    }
}

/// Read a trace file and replay it.
pub fn replay_trace(path: &Path, settings: &Settings, frame: Rect) -> Result<Replay, CliError> {
    let records = read_trace(path)?;
    if records.is_empty() {
        return Err(CliError::Config(format!(
            "Trace {} contains no records",
            path.display()
        )));
    }
    Ok(replay_records(&records, settings, frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use touchdown::geo::EARTH_RADIUS_M;
    use touchdown::glide_slope::PathMode;
    use touchdown::{TelemetrySnapshot, Tick};

    const LAT: f64 = 47.0;
    const RUNWAY_HEADING: f32 = 90.0;
    /// Snapshots in `landing_then_go_around` up to the end of the rollout.
    const LANDING_TICKS: usize = 40;

    fn frame() -> Rect {
        overlay_frame(800, 600).unwrap()
    }

    /// Longitude `meters` east of the touchdown point.
    fn lon_east(meters: f64) -> f64 {
        8.0 + (meters / (EARTH_RADIUS_M * LAT.to_radians().cos())).to_degrees()
    }

    fn airborne(east: f64, agl: f32, heading: f32) -> TelemetrySnapshot {
        TelemetrySnapshot {
            ground_speed: 60.0,
            vertical_speed: -3.0,
            agl,
            lat: LAT,
            lon: lon_east(east),
            heading,
            ..Default::default()
        }
    }

    fn on_ground(east: f64) -> TelemetrySnapshot {
        TelemetrySnapshot {
            ground_contact_force: 5000.0,
            ground_speed: 50.0,
            vertical_speed: -1.0,
            lat: LAT,
            lon: lon_east(east),
            heading: RUNWAY_HEADING,
            ..Default::default()
        }
    }

    /// Half-second ticks, one per snapshot.
    fn flight(snapshots: &[TelemetrySnapshot]) -> Vec<TraceRecord> {
        snapshots
            .iter()
            .enumerate()
            .map(|(i, snapshot)| TraceRecord::new(Tick::new(0.5, i as f32 * 0.5), Some(*snapshot)))
            .collect()
    }

    /// Short final, touchdown and rollout, then a climb that turns crosswind.
    fn landing_then_go_around() -> Vec<TelemetrySnapshot> {
        let mut snapshots = Vec::new();
        for i in 0..36 {
            let distance = 1080.0 - 30.0 * i as f64;
            snapshots.push(airborne(-distance, distance as f32 * 0.0524, RUNWAY_HEADING));
        }
        for i in 0..4 {
            snapshots.push(on_ground(30.0 * i as f64));
        }
        for i in 0..4 {
            snapshots.push(airborne(120.0 + 30.0 * i as f64, 1.0 + 3.0 * i as f32, RUNWAY_HEADING));
        }
        snapshots.push(airborne(240.0, 13.0, RUNWAY_HEADING + 40.0));
        snapshots
    }

    #[test]
    fn test_explicit_missing_settings_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.ini");

        let result = load_settings(Some(&missing));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_explicit_settings_file_is_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("touchdown.ini");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "runway_distance = 0.25 nm").unwrap();
        writeln!(file, "bogus = 1").unwrap();

        let resolved = load_settings(Some(&path)).unwrap();
        assert_eq!(resolved.path.as_deref(), Some(path.as_path()));
        assert!(resolved.loaded.found);
        assert_eq!(resolved.loaded.settings.glide_slope.runway_distance_m, 463.0);
        assert_eq!(resolved.loaded.warnings.len(), 1);
    }

    #[test]
    fn test_overlay_frame_rejects_zero_size() {
        assert!(overlay_frame(0, 600).is_err());
        assert!(overlay_frame(800, 0).is_err());

        let frame = overlay_frame(800, 600).unwrap();
        assert_eq!(frame.width(), 800.0);
        assert_eq!(frame.height(), 600.0);
    }

    #[test]
    fn test_empty_trace_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.jsonl");
        std::fs::write(&path, "# nothing recorded\n").unwrap();

        let result = replay_trace(&path, &Settings::default(), overlay_frame(800, 600).unwrap());
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_replay_counts_gaps() {
        let snapshot = TelemetrySnapshot {
            ground_speed: 60.0,
            agl: 100.0,
            lat: 47.0,
            lon: 8.0,
            heading: 90.0,
            ..Default::default()
        };
        let records = vec![
            TraceRecord::new(Tick::new(0.5, 0.5), None),
            TraceRecord::new(Tick::new(0.5, 1.0), Some(snapshot)),
            TraceRecord::new(Tick::new(0.5, 1.5), None),
        ];

        let replay = replay_records(&records, &Settings::default(), frame());
        assert_eq!(replay.ticks, 3);
        assert_eq!(replay.gaps, 2);
    }

    #[test]
    fn test_replay_ending_after_landing_shows_landing_path() {
        let records = flight(&landing_then_go_around()[..LANDING_TICKS]);

        let replay = replay_records(&records, &Settings::default(), frame());

        assert_eq!(replay.path.mode, PathMode::Landing);
        assert!(replay.path.pre_landing.len() > 1);
    }

    #[test]
    fn test_replay_shows_approach_after_go_around() {
        let mut snapshots = landing_then_go_around();
        // Back on final: closing in on the touchdown point on runway heading.
        for i in 0..20 {
            let east = -3000.0 + 60.0 * i as f64;
            snapshots.push(airborne(east, 160.0 - 3.0 * i as f32, RUNWAY_HEADING));
        }

        let replay = replay_records(&flight(&snapshots), &Settings::default(), frame());

        assert_eq!(replay.session.history().landing_index(), None);
        assert!(replay.session.history().last_landing().is_some());
        assert_eq!(replay.path.mode, PathMode::Approach);
        assert!(!replay.path.pre_landing.is_empty());
    }
}
