//! Error types for every stage of the conversion pipeline.
//!
//! Each stage has its own error enum so callers can decide how fatal a
//! failure is: a [`ResizeError`] only drops one frame during playback, while
//! everything else ends the run.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Failure to obtain pixels from an input.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The image or GIF could not be decoded.
    #[error("Failed to load '{path}': {reason}")]
    Decode { path: String, reason: String },

    /// A remote input could not be downloaded.
    #[error("Failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// FFmpeg (or ffprobe) is not installed.
    #[error("{tool} not found. Install FFmpeg to play video files")]
    ToolNotFound { tool: &'static str },

    /// The video decoder could not be started or stopped unexpectedly.
    #[error("Failed to decode video '{path}': {reason}")]
    Video { path: String, reason: String },
}

/// Failure to resample a buffer.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ResizeError {
    /// Scale factor or aspect ratio is not a positive finite number.
    #[error("Invalid resize factors (scale {scale}, aspect ratio {aspect_ratio})")]
    InvalidScale { scale: f32, aspect_ratio: f32 },

    /// The requested target has no pixels.
    #[error("Resize target is empty ({width}x{height})")]
    EmptyTarget { width: u32, height: u32 },

    /// The requested target is too large to allocate.
    #[error("Resize target {width}x{height} exceeds the pixel limit")]
    TooLarge { width: u32, height: u32 },

    /// The source buffer does not hold `width * height * channels` bytes.
    #[error("Source buffer holds {actual} bytes, expected {expected}")]
    CorruptBuffer { expected: usize, actual: usize },
}

/// Failure to deliver rendered text.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// The output file could not be created or written.
    #[error("Failed to write output file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the terminal failed.
    #[error("Failed to write to terminal: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Invalid run parameters.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Input image path required")]
    MissingInput,

    #[error("Character ramp must not be empty")]
    EmptyRamp,

    #[error("Scale must be a positive number, got {0}")]
    NonPositiveScale(f32),

    #[error("Aspect ratio must be a positive number, got {0}")]
    NonPositiveAspectRatio(f32),

    #[error("Brightness must not be negative, got {0}")]
    NegativeBrightness(f32),

    #[error("Block size must be at least 1x1, got {width}x{height}")]
    EmptyBlock { width: u32, height: u32 },

    #[error("Invalid block size '{0}'. Use WIDTHxHEIGHT (e.g., 2x4)")]
    BlockFormat(String),
}

/// Top-level error returned by [`crate::app::run`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Resize(#[from] ResizeError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Whether the binary should print usage help alongside this error.
    pub fn wants_usage(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}
