//! Dimension calculation for aspect-ratio-correct ASCII rendering.

/// Default terminal character aspect ratio.
/// Terminal characters are typically ~2x taller than wide, so output rows
/// are divided by this factor.
pub const DEFAULT_CHAR_ASPECT_RATIO: f32 = 2.0;

/// Smallest scale factor auto-fit will use (at most 1000x upscaling).
pub const MIN_FIT_SCALE: f32 = 0.001;

/// Largest scale factor auto-fit will use.
pub const MAX_FIT_SCALE: f32 = 10_000.0;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

impl TerminalSize {
    /// Size used when the terminal cannot be queried.
    pub const FALLBACK: TerminalSize = TerminalSize {
        width: 80,
        height: 24,
    };
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Output dimensions for a scale factor and character aspect ratio.
///
/// `width = floor(src_width / scale)` and
/// `height = floor(src_height / scale / aspect_ratio)`, each clamped to at
/// least 1. Callers must pass positive finite factors.
pub fn scaled_dimensions(
    src_width: u32,
    src_height: u32,
    scale: f32,
    aspect_ratio: f32,
) -> (u64, u64) {
    let scale = scale as f64;
    let width = (src_width as f64 / scale).floor();
    let height = (src_height as f64 / scale / aspect_ratio as f64).floor();
    // `as u64` saturates on huge values; the resampler rejects those
    (width.max(1.0) as u64, height.max(1.0) as u64)
}

/// Scale factor that fits an image inside a terminal.
///
/// Takes the larger of the width-bound and height-bound factors so the
/// result fits both dimensions, then clamps into
/// [`MIN_FIT_SCALE`, `MAX_FIT_SCALE`]. Degenerate inputs (zero-sized
/// terminal or image, non-finite aspect) clamp instead of failing.
pub fn fit_scale(src_width: u32, src_height: u32, terminal: TerminalSize, aspect_ratio: f32) -> f32 {
    let cells_w = terminal.width.max(1) as f32;
    let cells_h = terminal.height.max(1) as f32;

    let scale_w = src_width as f32 / cells_w;
    let scale_h = src_height as f32 / (cells_h * aspect_ratio);
    let scale = scale_w.max(scale_h);

    if scale.is_nan() {
        return MIN_FIT_SCALE;
    }
    scale.clamp(MIN_FIT_SCALE, MAX_FIT_SCALE)
}
