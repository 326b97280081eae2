//! CLI interface for Shimmer

use clap::{Args, Parser, Subcommand, ValueEnum};
use shimmer::fx::Viewport;
use shimmer::synth::Cue;
use std::path::PathBuf;

/// Procedural UI sound cues and ambient particle effects
#[derive(Parser)]
#[command(name = "shimmer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults are used when it does not exist)
    #[arg(short, long, global = true, default_value = "shimmer.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a sound cue on the output device
    Cue {
        /// click, hover or notification
        cue: Cue,
    },

    /// Render a sound cue to a WAV file
    Render {
        /// click, hover or notification
        cue: Cue,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show an effect in the terminal (c/h/n play cues, m toggles mount)
    Watch {
        effect: Effect,

        #[command(flatten)]
        viewport: ViewportArgs,
    },

    /// Run an effect headless and print its counters as JSON
    Simulate {
        effect: Effect,

        #[command(flatten)]
        viewport: ViewportArgs,

        /// How long to keep the effect mounted, in milliseconds
        #[arg(short, long, default_value = "10000")]
        duration_ms: u64,

        /// Frame length in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Pace frames against the wall clock instead of virtual time
        #[arg(long)]
        realtime: bool,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check,

    /// Generate an example configuration file
    Init,
}

/// Which field to mount
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Effect {
    /// Floating particle field over the viewport
    Particles,
    /// Falling glyph rain
    Rain,
}

/// Simulated display used for device classification and stage size
#[derive(Args, Clone, Debug)]
pub struct ViewportArgs {
    /// Viewport width in px
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Viewport height in px
    #[arg(long, default_value = "800")]
    pub height: u32,

    /// User agent string for the mobile heuristic
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl ViewportArgs {
    pub fn to_viewport(&self) -> Viewport {
        let viewport = Viewport::new(self.width, self.height);
        match &self.user_agent {
            Some(ua) => viewport.with_user_agent(ua.clone()),
            None => viewport,
        }
    }
}
