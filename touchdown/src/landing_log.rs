//! Text log of takeoffs and landings.
//!
//! [`LandingLog`] is the reference [`PhaseEventSink`]: it turns phase events
//! into the short lines shown in the landing log window.
//!
//! ```text
//! Flying:     Vy=-500 fpm  Vg=120.5 kts  AGL=12.3 ft
//! ...
//! Landed:   Vy=-180.2 fpm  Vg=110.1 kts  G=1.2 m/sec^2    GREAT LANDING
//! ```

use std::collections::VecDeque;
use std::fmt;

use tracing::info;

use crate::flight_phase::{FlyingEvent, LandedEvent, PhaseEvent, PhaseEventSink};
use crate::geo::{meters_to_feet, ms_to_fpm, ms_to_knots, round_off};

/// Maximum number of lines kept.
pub const MAX_LOG_LINES: usize = 100;

/// Height above which a flight counts as a real flight, not a hop (meters).
pub const REALLY_FLYING_AGL_M: f32 = 10.0;

/// Touchdown rating by vertical speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LandingQuality {
    Excellent,
    Great,
    Good,
    Acceptable,
    Hard,
    Bad,
    AnySurvivors,
    Crashed,
}

impl LandingQuality {
    /// Rate a touchdown by its vertical speed (m/s, either sign).
    pub fn from_vertical_speed(vertical_speed: f32) -> Self {
        let vy = vertical_speed.abs();
        if vy < 0.25 {
            Self::Excellent
        } else if vy < 0.5 {
            Self::Great
        } else if vy < 1.0 {
            Self::Good
        } else if vy < 1.5 {
            Self::Acceptable
        } else if vy < 2.0 {
            Self::Hard
        } else if vy < 2.5 {
            Self::Bad
        } else if vy < 3.0 {
            Self::AnySurvivors
        } else {
            Self::Crashed
        }
    }

    /// Rating text appended to the landing line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT LANDING",
            Self::Great => "GREAT LANDING",
            Self::Good => "GOOD LANDING",
            Self::Acceptable => "ACCEPTABLE LANDING",
            Self::Hard => "HARD LANDING",
            Self::Bad => "BAD LANDING",
            Self::AnySurvivors => "ANY SURVIVORS?",
            Self::Crashed => "R.I.P.",
        }
    }
}

impl fmt::Display for LandingQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Bounded log of flight events.
#[derive(Debug, Default)]
pub struct LandingLog {
    lines: VecDeque<String>,
    /// Flying events since the last landing.
    flying_events: u32,
    /// Climbed past [`REALLY_FLYING_AGL_M`] since the last landing.
    really_flying: bool,
}

impl LandingLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logged lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of logged lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing is logged.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn push(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > MAX_LOG_LINES {
            self.lines.pop_front();
        }
    }

    fn on_flying(&mut self, event: &FlyingEvent) {
        self.flying_events += 1;
        if self.flying_events > 1 {
            if !self.really_flying && event.agl >= REALLY_FLYING_AGL_M {
                self.really_flying = true;
                self.push("...".to_string());
            }
            return;
        }

        self.push(format!(
            "Flying:     Vy={} fpm  Vg={} kts  AGL={} ft",
            round_off(ms_to_fpm(event.vertical_speed)),
            round_off(ms_to_knots(event.ground_speed)),
            round_off(meters_to_feet(event.agl)),
        ));
    }

    fn on_landed(&mut self, event: &LandedEvent) {
        let was_really_flying = self.really_flying;
        self.really_flying = false;
        self.flying_events = 0;

        let mut line = format!(
            "Landed:   Vy={} fpm  Vg={} kts  G={} m/sec^2",
            round_off(ms_to_fpm(event.vertical_speed)),
            round_off(ms_to_knots(event.ground_speed)),
            round_off(event.g_force),
        );
        if was_really_flying {
            let quality = LandingQuality::from_vertical_speed(event.vertical_speed);
            info!(
                vertical_speed = event.vertical_speed,
                quality = %quality,
                "Landing rated"
            );
            line.push_str("    ");
            line.push_str(quality.label());
        }
        self.push(line);
    }
}

impl PhaseEventSink for LandingLog {
    fn on_event(&mut self, event: &PhaseEvent) {
        match event {
            PhaseEvent::Flying(flying) => self.on_flying(flying),
            PhaseEvent::Landed(landed) => self.on_landed(landed),
        }
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}
