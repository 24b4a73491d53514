use std::path::PathBuf;
use std::sync::OnceLock;

/// Config location for voicepulse.
///
///   Linux:  $XDG_CONFIG_HOME/voicepulse  (~/.config/voicepulse)
///   macOS:  ~/Library/Application Support/voicepulse
///
/// No data directory: the tool never writes to disk.
static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Root config directory.
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voicepulse")
    })
}

/// Config file path: <config_dir>/config.toml
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
