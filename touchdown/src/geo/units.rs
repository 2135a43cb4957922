//! Unit conversions for display and settings.
//!
//! The core works in SI throughout. These helpers exist for the edges:
//! settings files accept distances in several units and the landing log
//! shows knots, feet and feet per minute.

use std::str::FromStr;

use thiserror::Error;

/// Feet to meters.
pub const FT_TO_METERS: f64 = 0.3048;
/// Nautical miles to meters.
pub const NM_TO_METERS: f64 = 1852.0;
/// Statute miles to meters.
pub const MI_TO_METERS: f64 = 1609.34;
/// Kilometers to meters.
pub const KM_TO_METERS: f64 = 1000.0;

const MS_TO_KNOTS: f32 = 1.94384;
const MS_TO_FPM: f32 = 196.8504;
const METERS_TO_FEET: f32 = 3.28084;

/// Meters per second to knots.
#[inline]
pub fn ms_to_knots(meters_per_second: f32) -> f32 {
    meters_per_second * MS_TO_KNOTS
}

/// Meters per second to feet per minute.
#[inline]
pub fn ms_to_fpm(meters_per_second: f32) -> f32 {
    meters_per_second * MS_TO_FPM
}

/// Meters to feet.
#[inline]
pub fn meters_to_feet(meters: f32) -> f32 {
    meters * METERS_TO_FEET
}

/// Round to one decimal place.
#[inline]
pub fn round_off(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Unit token accepted after a distance value in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    /// Meters (the default when no token is given).
    #[default]
    Meters,
    /// Nautical miles (`nm`).
    NauticalMiles,
    /// Feet (`ft`).
    Feet,
    /// Statute miles (`mi`).
    StatuteMiles,
    /// Kilometers (`km`).
    Kilometers,
}

/// An unrecognised unit token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown distance unit '{0}'")]
pub struct UnknownUnit(pub String);

impl DistanceUnit {
    /// Meters per one of this unit.
    pub fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::NauticalMiles => NM_TO_METERS,
            DistanceUnit::Feet => FT_TO_METERS,
            DistanceUnit::StatuteMiles => MI_TO_METERS,
            DistanceUnit::Kilometers => KM_TO_METERS,
        }
    }

    /// Convert a value in this unit to meters.
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    /// The settings-file token.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::NauticalMiles => "nm",
            DistanceUnit::Feet => "ft",
            DistanceUnit::StatuteMiles => "mi",
            DistanceUnit::Kilometers => "km",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" => Ok(DistanceUnit::Meters),
            "nm" => Ok(DistanceUnit::NauticalMiles),
            "ft" => Ok(DistanceUnit::Feet),
            "mi" => Ok(DistanceUnit::StatuteMiles),
            "km" => Ok(DistanceUnit::Kilometers),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
