//! sky_sign — command-line entry point.

use std::path::Path;

use sky_sign::app::{run_live, run_replay, InputMode, LiveOptions};
use sky_sign::cli::{Cli, Command};
use sky_sign::config::SkySignConfig;
use sky_sign::error::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "sky_sign=info,hand_gesture=info,ink_engine=info";
const VERBOSE_FILTER: &str = "sky_sign=debug,hand_gesture=debug,ink_engine=debug";

fn main() {
    let cli = Cli::parse_args();

    let default_filter = if cli.verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if let Err(e) = run(cli.command) {
        error!(error = %e, "sky_sign failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        #[cfg(feature = "leap")]
        Command::Live { config, out, replay, record, leap } => {
            let input = match (leap, replay) {
                (true, Some(_)) => {
                    return Err(sky_sign::error::SkySignError::Config("--leap and --replay are mutually exclusive".into()))
                }
                (true, None)       => InputMode::Leap,
                (false, Some(p))   => InputMode::Replay(p),
                (false, None)      => InputMode::Simulated,
            };
            let cfg = load_config(config.as_deref())?;
            run_live(&cfg, LiveOptions { input, out, record })
        }
        #[cfg(not(feature = "leap"))]
        Command::Live { config, out, replay, record } => {
            let input = replay.map_or(InputMode::Simulated, InputMode::Replay);
            let cfg = load_config(config.as_deref())?;
            run_live(&cfg, LiveOptions { input, out, record })
        }
        Command::Replay { input, config, svg, png } => {
            let cfg = load_config(config.as_deref())?;
            let summary = run_replay(&cfg, &input, svg.as_deref(), png.as_deref())?;
            println!(
                "{} frames, {} strokes, {} saves, {} clears",
                summary.frames, summary.strokes, summary.saves, summary.clears
            );
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SkySignConfig> {
    let cfg = SkySignConfig::load_or_default(path)?;
    match path {
        Some(p) => info!(path = %p.display(), "configuration loaded"),
        None    => info!("using default configuration"),
    }
    Ok(cfg)
}
