//! Settings command - shows the resolved overlay settings.

use console::style;

use super::common::ResolvedSettings;
use crate::error::CliError;

/// Run the settings command.
pub fn run(settings: &ResolvedSettings) -> Result<(), CliError> {
    match (&settings.path, settings.loaded.found) {
        (Some(path), true) => println!("{} {}", style("Settings file:").bold(), path.display()),
        (Some(path), false) => println!(
            "{} {} (not found, using defaults)",
            style("Settings file:").bold(),
            path.display()
        ),
        (None, _) => println!(
            "{} none (no configuration directory, using defaults)",
            style("Settings file:").bold()
        ),
    }
    println!();

    for line in describe(settings) {
        println!("  {}", line);
    }

    if !settings.loaded.warnings.is_empty() {
        println!();
        println!("{}", style("Ignored lines").yellow().bold());
        for warning in &settings.loaded.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}

/// One `name = value` line per resolved setting, distances in meters.
fn describe(settings: &ResolvedSettings) -> Vec<String> {
    let resolved = &settings.loaded.settings;
    let gs = &resolved.glide_slope;
    vec![
        format!("runway_distance   = {} m", gs.runway_distance_m),
        format!("approach_distance = {} m", gs.approach_distance_m),
        format!("vertical_grid     = {} m", gs.vertical_grid_m),
        format!("horizontal_grid   = {} m", gs.horizontal_grid_m),
        format!("log_level         = {}", resolved.log_level),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchdown::settings::LoadedSettings;
    use touchdown::Settings;

    #[test]
    fn test_describe_defaults() {
        let settings = ResolvedSettings {
            path: None,
            loaded: LoadedSettings {
                settings: Settings::default(),
                warnings: Vec::new(),
                found: false,
            },
        };

        let lines = describe(&settings);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "runway_distance   = 926 m");
        assert_eq!(lines[1], "approach_distance = 5556 m");
        assert_eq!(lines[4], "log_level         = info");
    }
}
