use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dsp::framing::{DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE};
use crate::dsp::pitch::{PitchConfig, PitchMethod};
use crate::error::AnalysisError;

/// Application configuration, loaded from config.toml.
///
/// Every struct carries `#[serde(default)]`, so a partial file only
/// overrides what it names and a missing file means factory settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

/// Parameters of the analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Frame length in samples.
    pub frame_size: usize,
    /// Hop between frame starts in samples.
    pub hop_size: usize,
    pub pitch_floor_hz: f32,
    pub pitch_ceiling_hz: f32,
    /// Difference-function threshold for the YIN estimator.
    pub yin_threshold: f32,
    pub pitch_method: PitchMethod,
    /// Voicing threshold for the autocorrelation estimator.
    pub autocorrelation_min_correlation: f32,
    pub mcleod_power_threshold: f64,
    pub mcleod_clarity_threshold: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// One of error, warn, info, debug, trace. `-v` flags take precedence.
    pub log_level: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let pitch = PitchConfig::default();
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            pitch_floor_hz: pitch.pitch_floor_hz,
            pitch_ceiling_hz: pitch.pitch_ceiling_hz,
            yin_threshold: pitch.yin_threshold,
            pitch_method: pitch.method,
            autocorrelation_min_correlation: pitch.min_correlation,
            mcleod_power_threshold: pitch.mcleod_power_threshold,
            mcleod_clarity_threshold: pitch.mcleod_clarity_threshold,
        }
    }
}

impl AnalysisConfig {
    /// Reject settings that can't produce a frame grid or a pitch band.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size < 2 || self.hop_size == 0 {
            return Err(AnalysisError::InvalidFraming {
                frame_size: self.frame_size,
                hop_size: self.hop_size,
            });
        }
        if !(self.pitch_floor_hz > 0.0 && self.pitch_floor_hz < self.pitch_ceiling_hz) {
            return Err(AnalysisError::InvalidPitchBand {
                floor_hz: self.pitch_floor_hz,
                ceiling_hz: self.pitch_ceiling_hz,
            });
        }
        Ok(())
    }
}

/// Bridge from the user-facing config to the pitch tracker's parameters.
impl From<&AnalysisConfig> for PitchConfig {
    fn from(cfg: &AnalysisConfig) -> Self {
        PitchConfig {
            pitch_floor_hz: cfg.pitch_floor_hz,
            pitch_ceiling_hz: cfg.pitch_ceiling_hz,
            yin_threshold: cfg.yin_threshold,
            method: cfg.pitch_method,
            min_correlation: cfg.autocorrelation_min_correlation,
            mcleod_power_threshold: cfg.mcleod_power_threshold,
            mcleod_clarity_threshold: cfg.mcleod_clarity_threshold,
        }
    }
}

/// Load config from `path`. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    config
        .analysis
        .validate()
        .with_context(|| format!("Invalid [analysis] settings in {}", path.display()))?;

    Ok(config)
}

/// Load config from $XDG_CONFIG_HOME/voicepulse/config.toml.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&crate::paths::config_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.analysis.frame_size, 1024);
        assert_eq!(cfg.analysis.hop_size, 512);
        assert_eq!(cfg.analysis.pitch_floor_hz, 50.0);
        assert_eq!(cfg.analysis.pitch_ceiling_hz, 600.0);
        assert_eq!(cfg.analysis.yin_threshold, 0.15);
        assert_eq!(cfg.analysis.pitch_method, PitchMethod::Yin);
        assert_eq!(cfg.output.format, OutputFormat::Text);
        assert!(cfg.analysis.validate().is_ok());
    }

    #[test]
    fn parse_partial_toml() {
        // Only some fields given; the rest fall back to defaults
        let toml_str = r#"
[analysis]
pitch_floor_hz = 70.0
pitch_method = "autocorrelation"
"#;
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.analysis.pitch_floor_hz, 70.0);
        assert_eq!(cfg.analysis.pitch_method, PitchMethod::Autocorrelation);
        assert_eq!(cfg.analysis.pitch_ceiling_hz, 600.0);
        assert_eq!(cfg.analysis.frame_size, 1024);
    }

    #[test]
    fn parse_output_section() {
        let toml_str = r#"
[output]
format = "json"
log_level = "debug"
"#;
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert_eq!(cfg.output.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn pitch_config_conversion() {
        let cfg = AnalysisConfig {
            pitch_ceiling_hz: 400.0,
            pitch_method: PitchMethod::Mcleod,
            ..AnalysisConfig::default()
        };
        let pitch_cfg: PitchConfig = (&cfg).into();
        assert_eq!(pitch_cfg.pitch_floor_hz, 50.0);
        assert_eq!(pitch_cfg.pitch_ceiling_hz, 400.0);
        assert_eq!(pitch_cfg.method, PitchMethod::Mcleod);
    }

    #[test]
    fn validate_rejects_zero_hop() {
        let cfg = AnalysisConfig {
            hop_size: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(AnalysisError::InvalidFraming { hop_size: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_inverted_band() {
        let cfg = AnalysisConfig {
            pitch_floor_hz: 600.0,
            pitch_ceiling_hz: 50.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(AnalysisError::InvalidPitchBand { .. })
        ));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.analysis.frame_size, 1024);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analysis]\nhop_size = 256\n").unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.analysis.hop_size, 256);
    }

    #[test]
    fn load_rejects_invalid_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analysis]\nframe_size = 0\n").unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analysis\n").unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn roundtrip_toml() {
        let cfg = AppConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let loaded: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded.analysis.pitch_floor_hz, cfg.analysis.pitch_floor_hz);
        assert_eq!(loaded.analysis.pitch_method, cfg.analysis.pitch_method);
    }
}
