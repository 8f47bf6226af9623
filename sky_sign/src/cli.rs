//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sky_sign", version, about = "Sign in the air: hand gestures to SVG/PNG signatures")]
pub struct Cli {
    /// Debug-level logging (RUST_LOG still wins).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the preview window and track a hand.
    Live {
        /// TOML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for saved signatures (overrides `[output] dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Drive the session from a JSON-lines recording instead of the mouse.
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Record every landmark frame to a JSON-lines file.
        #[arg(long)]
        record: Option<PathBuf>,

        /// Use a LeapMotion controller.
        #[cfg(feature = "leap")]
        #[arg(long)]
        leap: bool,
    },

    /// Run a recording headlessly and write the resulting signature.
    Replay {
        /// JSON-lines recording.
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the final signature as SVG.
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Write the final signature as PNG.
        #[arg(long)]
        png: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
