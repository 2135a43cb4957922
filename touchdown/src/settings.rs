//! Settings file loader.
//!
//! Settings live in a small INI file. All keys go in the general section
//! (before any `[section]` header):
//!
//! ```ini
//! # Overlay reference distances
//! runway_distance = 0.5 nm
//! approach_distance = 3 nm
//! vertical_grid = 0.5 nm
//! horizontal_grid = 100 ft
//! log_level = info
//! ```
//!
//! The `=` is optional: `runway_distance 0.5 nm` is read the same way.
//! Distances take an optional unit token (`nm`, `ft`, `mi`, `km`, `m`) and
//! default to meters. A bad line never fails the load: it is reported as a
//! [`SettingWarning`] and the previous value is kept.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, ParseError, ParseOption};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};

use crate::geo::{DistanceUnit, UnknownUnit};
use crate::glide_slope::GlideSlopeConfig;

/// Directory under the user configuration directory.
pub const SETTINGS_DIR_NAME: &str = "touchdown";

/// Settings file name.
pub const SETTINGS_FILE_NAME: &str = "touchdown.ini";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that prevent reading a settings file at all.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Invalid settings file {path}: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Why a single setting was ignored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingValueError {
    #[error("missing value")]
    MissingValue,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error(transparent)]
    UnknownUnit(#[from] UnknownUnit),

    #[error("unexpected text '{0}' after unit")]
    TrailingText(String),

    #[error("distance must be positive, got {0}")]
    NonPositive(f64),

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),

    #[error("unknown setting")]
    UnknownKey,

    #[error("settings must be in the general section, found [{0}]")]
    UnexpectedSection(String),

    #[error("not a 'key = value' line")]
    MalformedLine,
}

/// A setting that was ignored while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingWarning {
    pub key: String,
    pub value: String,
    pub error: SettingValueError,
}

impl fmt::Display for SettingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "Invalid setting '{}': {}, ignored", self.key, self.error)
        } else {
            write!(
                f,
                "Invalid setting '{} = {}': {}, ignored",
                self.key, self.value, self.error
            )
        }
    }
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Overlay reference distances (meters).
    pub glide_slope: GlideSlopeConfig,
    /// Default tracing level (`RUST_LOG` still wins).
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            glide_slope: GlideSlopeConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Result of loading a settings file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// Lines that were ignored.
    pub warnings: Vec<SettingWarning>,
    /// Whether the file existed. Defaults are used when it did not.
    pub found: bool,
}

impl Settings {
    /// `<config dir>/touchdown/touchdown.ini`, if the platform has a
    /// configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Load settings from `path`.
    ///
    /// A missing file is not an error: defaults are returned with
    /// `found == false`.
    pub fn load(path: &Path) -> Result<LoadedSettings, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Settings file not found, assuming defaults");
                return Ok(LoadedSettings {
                    settings: Settings::default(),
                    warnings: Vec::new(),
                    found: false,
                });
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut loaded = Self::parse(&content).map_err(|source| SettingsError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
        loaded.found = true;

        info!(
            path = %path.display(),
            ignored = loaded.warnings.len(),
            "Settings loaded"
        );
        Ok(loaded)
    }

    /// Parse settings file content on top of the defaults.
    ///
    /// Lines that are neither INI nor `key value` pairs are reported as
    /// warnings and skipped before the INI parser sees them.
    pub fn parse(content: &str) -> Result<LoadedSettings, ParseError> {
        let (normalized, mut warnings) = normalize(content);
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(&normalized, options)?;

        let mut settings = Settings::default();

        for (section, properties) in ini.iter() {
            for (key, value) in properties.iter() {
                let result = match section {
                    None => settings.apply(key, value),
                    Some(name) => Err(SettingValueError::UnexpectedSection(name.to_string())),
                };

                match result {
                    Ok(()) => debug!(key = key, value = value, "Setting applied"),
                    Err(error) => {
                        let warning = SettingWarning {
                            key: key.to_string(),
                            value: value.to_string(),
                            error,
                        };
                        warn!("{}", warning);
                        warnings.push(warning);
                    }
                }
            }
        }

        Ok(LoadedSettings {
            settings,
            warnings,
            found: true,
        })
    }

    /// Apply one `key = value` line.
    ///
    /// On error the current value is left unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), SettingValueError> {
        match key {
            "runway_distance" => self.glide_slope.runway_distance_m = parse_distance(value)?,
            "approach_distance" => self.glide_slope.approach_distance_m = parse_distance(value)?,
            "vertical_grid" => self.glide_slope.vertical_grid_m = parse_distance(value)?,
            "horizontal_grid" => self.glide_slope.horizontal_grid_m = parse_distance(value)?,
            "log_level" => self.log_level = parse_log_level(value)?,
            _ => return Err(SettingValueError::UnknownKey),
        }
        Ok(())
    }
}

/// Rewrite settings content into INI form.
///
/// `key value` lines gain an `=`. Lines that fit neither form (an unclosed
/// section header, a key without value or an empty key) are dropped and
/// returned as warnings.
fn normalize(content: &str) -> (String, Vec<SettingWarning>) {
    let mut normalized = String::with_capacity(content.len());
    let mut rejected = Vec::new();

    for line in content.lines().map(str::trim) {
        let accepted = if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            Some(line.to_string())
        } else if line.starts_with('[') {
            line.ends_with(']').then(|| line.to_string())
        } else if let Some(separator) = line.find(|c: char| c == '=' || c == ':') {
            (!line[..separator].trim().is_empty()).then(|| line.to_string())
        } else {
            line.split_once(char::is_whitespace)
                .map(|(key, value)| format!("{} = {}", key, value.trim()))
        };

        match accepted {
            Some(line) => {
                normalized.push_str(&line);
                normalized.push('\n');
            }
            None => {
                let warning = SettingWarning {
                    key: line.to_string(),
                    value: String::new(),
                    error: SettingValueError::MalformedLine,
                };
                warn!("{}", warning);
                rejected.push(warning);
            }
        }
    }

    (normalized, rejected)
}

/// Parse a distance with an optional unit token into meters.
///
/// # Examples
///
/// ```
/// use touchdown::settings::parse_distance;
///
/// assert_eq!(parse_distance("0.5 nm"), Ok(926.0));
/// assert_eq!(parse_distance("120"), Ok(120.0));
/// ```
pub fn parse_distance(value: &str) -> Result<f64, SettingValueError> {
    let mut tokens = value.split_whitespace();

    let number = tokens.next().ok_or(SettingValueError::MissingValue)?;
    let magnitude = f64::from_str(number)
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SettingValueError::InvalidNumber(number.to_string()))?;

    let unit = match tokens.next() {
        Some(token) => DistanceUnit::from_str(token)?,
        None => DistanceUnit::Meters,
    };

    if let Some(extra) = tokens.next() {
        return Err(SettingValueError::TrailingText(extra.to_string()));
    }

    let meters = unit.to_meters(magnitude);
    if meters <= 0.0 {
        return Err(SettingValueError::NonPositive(meters));
    }
    Ok(meters)
}

fn parse_log_level(value: &str) -> Result<String, SettingValueError> {
    let level = value.trim().to_ascii_lowercase();
    LevelFilter::from_str(&level)
        .map(|_| level.clone())
        .map_err(|_| SettingValueError::InvalidLogLevel(value.to_string()))
}
