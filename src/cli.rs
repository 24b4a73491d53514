use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use voicepulse::dsp::pitch::PitchMethod;

#[derive(Parser)]
#[command(name = "voicepulse")]
#[command(about = "Energy, tension and clarity readings from a short voice recording")]
pub struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/voicepulse/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a mono WAV recording
    Analyze {
        /// Path to the WAV file
        path: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Pitch estimator: yin, autocorrelation or mcleod
        #[arg(long)]
        method: Option<PitchMethod>,

        /// Average multi-channel files down to mono instead of rejecting them
        #[arg(long)]
        downmix: bool,
    },

    /// Analyze a synthesized sine tone (no recording needed)
    Tone {
        /// Tone frequency in Hz
        #[arg(long, default_value_t = 220.0)]
        freq: f32,

        /// Peak amplitude (0.0-1.0)
        #[arg(long, default_value_t = 0.5)]
        amplitude: f32,

        /// Duration in seconds
        #[arg(long, default_value_t = 30.0)]
        seconds: f32,

        #[arg(long, default_value_t = 16000)]
        sample_rate: u32,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Pitch estimator: yin, autocorrelation or mcleod
        #[arg(long)]
        method: Option<PitchMethod>,
    },

    /// Show the result reported when a recording can't be obtained
    Fallback {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the insight rules in evaluation order
    Rules,

    /// Show where the config file is read from
    Paths,
}
