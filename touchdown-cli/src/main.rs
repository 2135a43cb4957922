//! Touchdown CLI - Command-line interface
//!
//! Replays recorded X-Plane telemetry traces through the landing analysis
//! library: prints the landing log and glide path, renders the glide slope
//! overlay, and shows the resolved settings.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use touchdown::logging::{default_log_dir, init_logging, LoggingConfig};

use commands::common::load_settings;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "touchdown")]
#[command(version, about = "Landing analysis and glide slope overlay for X-Plane telemetry")]
struct Cli {
    /// Directory for the log file
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overlay options shared by replay and render.
#[derive(Debug, Clone, Args)]
struct OverlayArgs {
    /// Settings file (defaults to the user configuration directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Overlay width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Overlay height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a telemetry trace and print the landing log and glide path
    Replay {
        /// JSON-lines telemetry trace
        trace: PathBuf,

        #[command(flatten)]
        overlay: OverlayArgs,
    },

    /// Replay a telemetry trace and render the glide slope overlay as PNG
    Render {
        /// JSON-lines telemetry trace
        trace: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        overlay: OverlayArgs,
    },

    /// Show the resolved settings
    Settings {
        /// Settings file (defaults to the user configuration directory)
        path: Option<PathBuf>,
    },
}

impl Commands {
    fn settings_path(&self) -> Option<&PathBuf> {
        match self {
            Commands::Replay { overlay, .. } | Commands::Render { overlay, .. } => {
                overlay.settings.as_ref()
            }
            Commands::Settings { path } => path.as_ref(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(cli.command.settings_path().map(PathBuf::as_path))?;

    let logging = LoggingConfig {
        log_dir: cli.log_dir.unwrap_or_else(default_log_dir),
        default_level: settings.loaded.settings.log_level.clone(),
        stderr: cli.verbose,
        ..Default::default()
    };
    let _guard = init_logging(&logging)?;
    tracing::info!(version = touchdown::VERSION, "Touchdown CLI started");

    match cli.command {
        Commands::Replay { trace, overlay } => commands::replay::run(commands::replay::ReplayArgs {
            trace,
            width: overlay.width,
            height: overlay.height,
            settings,
        }),
        Commands::Render {
            trace,
            output,
            overlay,
        } => commands::render::run(commands::render::RenderArgs {
            trace,
            output,
            width: overlay.width,
            height: overlay.height,
            settings,
        }),
        Commands::Settings { .. } => commands::settings::run(&settings),
    }
}
