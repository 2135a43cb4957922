//! Replay command - prints the landing log and glide path of a trace.

use std::path::PathBuf;

use console::style;

use super::common::{overlay_frame, print_setting_warnings, replay_trace, ResolvedSettings};
use crate::error::CliError;

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub trace: PathBuf,
    pub width: u32,
    pub height: u32,
    pub settings: ResolvedSettings,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    print_setting_warnings(&args.settings);
    let frame = overlay_frame(args.width, args.height)?;
    let replay = replay_trace(&args.trace, &args.settings.loaded.settings, frame)?;
    let glide_slope = replay.session.glide_slope(frame);
    let path = &replay.path;

    println!("{}", style("Landing log").bold());
    if replay.log.is_empty() {
        println!("  (empty)");
    }
    for line in replay.log.lines() {
        println!("  {}", line);
    }
    println!();

    let history = replay.session.history();
    println!("{}", style("Summary").bold());
    println!("  Ticks:          {}", replay.ticks);
    println!("  No telemetry:   {}", replay.gaps);
    println!("  Recorded:       {}", replay.recorded);
    println!("  Stored samples: {}", history.len());
    println!("  Phase:          {}", replay.session.phase());
    match history.last_landing() {
        Some(fix) => println!(
            "  Touchdown:      {} heading {:.0}",
            fix.sample().position(),
            fix.heading()
        ),
        None => println!("  Touchdown:      none"),
    }
    println!();

    println!(
        "{} ({}, frame {})",
        style("Glide path").bold(),
        path.mode,
        glide_slope.frame()
    );
    print_points("Before touchdown", &path.pre_landing);
    print_points("After touchdown", &path.post_landing);

    if let Some(last) = history.last() {
        println!();
        for line in glide_slope.info_lines(last) {
            println!("  {}", line);
        }
    }

    Ok(())
}

fn print_points(label: &str, points: &[touchdown::glide_slope::Point]) {
    println!("  {}: {} points", label, points.len());
    for point in points {
        println!("    {}", point);
    }
}
