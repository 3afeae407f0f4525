//! Run parameters shared by every pipeline stage.

use std::path::PathBuf;
use std::time::Duration;

use crate::ascii::{BlockSize, Filter, Ramp, DEFAULT_CHAR_ASPECT_RATIO};
use crate::error::ValidationError;

/// Everything that controls one run. Immutable once validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    /// Input path or URL as given on the command line.
    pub input: String,
    /// Output file; `None` writes to the terminal.
    pub output: Option<PathBuf>,
    /// Glyphs ordered from darkest to brightest.
    pub ramp: Ramp,
    /// Emit 24-bit ANSI foreground colors.
    pub color: bool,
    /// Map bright values to the start of the ramp.
    pub invert: bool,
    /// Replace each emitted color channel with `255 - channel`.
    pub invert_color: bool,
    /// Multiplier applied to brightness or edge magnitude.
    pub brightness: f32,
    /// Source pixels per output column.
    pub scale: f32,
    /// Select glyphs by Sobel edge magnitude instead of brightness.
    pub edges: bool,
    /// Height-to-width stretch of one glyph cell; rows are divided by it.
    pub aspect_ratio: f32,
    /// Size the output to the terminal instead of using `scale`.
    pub auto_fit: bool,
    /// Pixel footprint behind each glyph.
    pub block: BlockSize,
    pub filter: Filter,
    /// Fixed delay between frames; `None` derives it from the source.
    pub frame_delay: Option<Duration>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: None,
            ramp: Ramp::default(),
            color: false,
            invert: false,
            invert_color: false,
            brightness: 1.0,
            scale: 1.0,
            edges: false,
            aspect_ratio: DEFAULT_CHAR_ASPECT_RATIO,
            auto_fit: false,
            block: BlockSize::PIXEL,
            filter: Filter::Nearest,
            frame_delay: None,
        }
    }
}

impl RenderParams {
    /// Check the constraints the pipeline relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.input.trim().is_empty() {
            return Err(ValidationError::MissingInput);
        }
        if self.ramp.is_empty() {
            return Err(ValidationError::EmptyRamp);
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ValidationError::NonPositiveScale(self.scale));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ValidationError::NonPositiveAspectRatio(self.aspect_ratio));
        }
        if !(self.brightness.is_finite() && self.brightness >= 0.0) {
            return Err(ValidationError::NegativeBrightness(self.brightness));
        }
        if self.block.width == 0 || self.block.height == 0 {
            return Err(ValidationError::EmptyBlock {
                width: self.block.width,
                height: self.block.height,
            });
        }
        Ok(())
    }
}

/// Parse a block size written as `WIDTHxHEIGHT` (e.g. `2x4`).
pub fn parse_block_size(s: &str) -> Result<BlockSize, ValidationError> {
    let format_error = || ValidationError::BlockFormat(s.to_string());

    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(format_error)?;
    let width: u32 = w.trim().parse().map_err(|_| format_error())?;
    let height: u32 = h.trim().parse().map_err(|_| format_error())?;

    if width == 0 || height == 0 {
        return Err(ValidationError::EmptyBlock { width, height });
    }
    Ok(BlockSize { width, height })
}
