mod cli;
mod report;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::{debug, error};
use tracing_subscriber::filter::LevelFilter;

use cli::{Cli, Command};
use voicepulse::audio::wav;
use voicepulse::config::{self, AppConfig, OutputFormat};
use voicepulse::{analysis, paths, util, AnalysisResult, AudioBuffer};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            config::load_config_from(path)?
        }
        None => config::load_config()?,
    };

    init_tracing(cli.verbose, app_config.output.log_level.as_deref());

    let default_json = app_config.output.format == OutputFormat::Json;

    match cli.command {
        Command::Analyze {
            path,
            json,
            method,
            downmix,
        } => {
            let mut analysis_config = app_config.analysis.clone();
            if let Some(m) = method {
                analysis_config.pitch_method = m;
            }

            let buffer = match wav::load_buffer(&path, downmix) {
                Ok(buffer) => buffer,
                Err(err) => {
                    // No buffer means the pipeline never runs; show the
                    // conservative result and still report the failure.
                    error!("{err:#}");
                    report::render(&AnalysisResult::fallback(), json || default_json)?;
                    return Err(err);
                }
            };

            debug!(peak_db = util::peak_db(&buffer.samples), "input level");

            let result = analysis::analyze(buffer, &analysis_config)
                .with_context(|| format!("Failed to analyze {}", path.display()))?;
            report::render(&result, json || default_json)
        }

        Command::Tone {
            freq,
            amplitude,
            seconds,
            sample_rate,
            json,
            method,
        } => {
            let mut analysis_config = app_config.analysis.clone();
            if let Some(m) = method {
                analysis_config.pitch_method = m;
            }

            let samples = util::sine_tone(freq, amplitude, sample_rate, seconds);
            let buffer = AudioBuffer::new(samples, sample_rate);

            let result = analysis::analyze(buffer, &analysis_config)
                .with_context(|| format!("Failed to analyze {freq} Hz tone"))?;
            report::render(&result, json || default_json)
        }

        Command::Fallback { json } => report::render(&AnalysisResult::fallback(), json || default_json),

        Command::Rules => {
            report::terminal::print_rules();
            Ok(())
        }

        Command::Paths => {
            print_paths(cli.config.as_deref(), &app_config);
            Ok(())
        }
    }
}

/// Install a stderr fmt subscriber. `-v` flags win over the config's
/// `log_level`; the default is warnings only.
fn init_tracing(verbose: u8, configured: Option<&str>) {
    let level = match verbose {
        0 => configured
            .and_then(|s| LevelFilter::from_str(s).ok())
            .unwrap_or(LevelFilter::WARN),
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// The config file a run reads: `--config` when given, else the default.
fn active_config_file(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(paths::config_file, Path::to_path_buf)
}

fn print_paths(explicit: Option<&Path>, app_config: &AppConfig) {
    let file = active_config_file(explicit);
    let status = if explicit.is_some() {
        style("(from --config)").green()
    } else if file.exists() {
        style("(found)").green()
    } else {
        style("(not found, using defaults)").yellow()
    };
    println!("  Config:  {} {}", style(file.display()).cyan(), status);
    println!(
        "  Pitch:   {} ({:.0}-{:.0} Hz)",
        app_config.analysis.pitch_method,
        app_config.analysis.pitch_floor_hz,
        app_config.analysis.pitch_ceiling_hz
    );
}
