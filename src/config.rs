//! Configuration file handling for glyphcast.
//!
//! Loads configuration from `<config dir>/glyphcast/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file structure for glyphcast.
/// Every field is optional; command-line flags override anything set here.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Preset name: standard, detailed, blocks, minimal
    pub charset: Option<String>,
    /// Custom ramp, darkest first; overrides `charset`
    pub chars: Option<String>,
    pub color: Option<bool>,
    pub invert: Option<bool>,
    pub invert_color: Option<bool>,
    pub brightness: Option<f32>,
    pub scale: Option<f32>,
    pub edges: Option<bool>,
    pub aspect_ratio: Option<f32>,
    /// nearest or bilinear
    pub filter: Option<String>,
    pub block_width: Option<u32>,
    pub block_height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlaybackConfig {
    pub fit: Option<bool>,
    pub delay_ms: Option<u64>,
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// Without an explicit path the default location is used and a missing
    /// file yields the default config. An explicit path must exist. A file
    /// that exists but cannot be read or parsed is an error either way.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some();
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !explicit && !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    AlreadyExists {
        path: PathBuf,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::AlreadyExists { path } => {
                write!(f, "Config file already exists: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::AlreadyExists { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("glyphcast").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/glyphcast/config.toml")
        })
}

/// Commented default config written by `glyphcast config init`.
pub const DEFAULT_CONFIG: &str = r#"# glyphcast configuration
# Command-line flags override these settings.

[render]
# Character set: standard, detailed, blocks, minimal
charset = "standard"
# Custom ramp, darkest to brightest (overrides charset)
# chars = " .:-=+*#%@"
# 24-bit ANSI color output
color = false
# Invert brightness (for light terminals)
invert = false
# Invert emitted colors
invert_color = false
# Brightness multiplier
brightness = 1.0
# Source pixels per output column
scale = 1.0
# Select glyphs by edge strength instead of brightness
edges = false
# Height-to-width ratio of a terminal cell
aspect_ratio = 2.0
# Resampling filter: nearest, bilinear
filter = "nearest"
# Pixels behind each glyph
block_width = 1
block_height = 1

[playback]
# Fit frames to the terminal
fit = false
# Fixed delay between frames in milliseconds (default: from the source)
# delay_ms = 100
"#;

/// Write [`DEFAULT_CONFIG`] to `path`, refusing to overwrite an existing file.
pub fn init(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    let io_error = |source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    };

    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(io_error)?;
    Ok(())
}
