//! Resampling buffers to character-grid resolution.

use super::dimensions::{fit_scale, scaled_dimensions, TerminalSize};
use crate::buffer::ImageBuffer;
use crate::error::ResizeError;

/// Largest target buffer the resampler will allocate, in pixels.
pub const MAX_TARGET_PIXELS: u64 = 1 << 26;

/// Sampling algorithm used when resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Copy the closest source pixel.
    #[default]
    Nearest,
    /// Blend the four surrounding source pixels.
    Bilinear,
}

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Nearest => "nearest",
            Filter::Bilinear => "bilinear",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nearest" => Some(Filter::Nearest),
            "bilinear" => Some(Filter::Bilinear),
            _ => None,
        }
    }
}

/// Resize by a scale factor with character aspect-ratio correction.
///
/// Destination pixel `(x, y)` samples source `(x * scale, y * scale * aspect_ratio)`,
/// clamped to the source bounds. The source is left untouched.
///
/// # Errors
/// Returns [`ResizeError`] when the factors are not positive and finite, the
/// source violates the buffer invariant, or the target is empty or too large.
pub fn resize(
    buffer: &ImageBuffer,
    scale: f32,
    aspect_ratio: f32,
    filter: Filter,
) -> Result<ImageBuffer, ResizeError> {
    if !(scale.is_finite() && scale > 0.0 && aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return Err(ResizeError::InvalidScale {
            scale,
            aspect_ratio,
        });
    }
    if !buffer.is_consistent() {
        return Err(ResizeError::CorruptBuffer {
            expected: buffer.expected_len(),
            actual: buffer.data.len(),
        });
    }
    if buffer.width == 0 || buffer.height == 0 {
        return Err(ResizeError::EmptyTarget {
            width: buffer.width,
            height: buffer.height,
        });
    }

    let (width, height) = scaled_dimensions(buffer.width, buffer.height, scale, aspect_ratio);
    if width.saturating_mul(height) > MAX_TARGET_PIXELS {
        return Err(ResizeError::TooLarge {
            width: width.min(u32::MAX as u64) as u32,
            height: height.min(u32::MAX as u64) as u32,
        });
    }
    let (width, height) = (width as u32, height as u32);

    let step_x = scale as f64;
    let step_y = scale as f64 * aspect_ratio as f64;

    let resized = match filter {
        Filter::Nearest => sample_nearest(buffer, width, height, step_x, step_y),
        Filter::Bilinear => sample_bilinear(buffer, width, height, step_x, step_y),
    };

    log::trace!(
        "Resized {}x{} -> {}x{} ({})",
        buffer.width,
        buffer.height,
        width,
        height,
        filter.name()
    );
    Ok(resized)
}

/// Resize so the result fits inside a terminal of the given size.
pub fn resize_to_fit(
    buffer: &ImageBuffer,
    terminal: TerminalSize,
    aspect_ratio: f32,
    filter: Filter,
) -> Result<ImageBuffer, ResizeError> {
    let scale = fit_scale(buffer.width, buffer.height, terminal, aspect_ratio);
    resize(buffer, scale, aspect_ratio, filter)
}

fn sample_nearest(
    src: &ImageBuffer,
    width: u32,
    height: u32,
    step_x: f64,
    step_y: f64,
) -> ImageBuffer {
    let channels = src.channels as usize;
    let mut out = ImageBuffer::new(width, height, src.channels);

    for y in 0..height {
        let src_y = ((y as f64 * step_y) as u32).min(src.height - 1) as usize;
        for x in 0..width {
            let src_x = ((x as f64 * step_x) as u32).min(src.width - 1) as usize;
            let from = (src_y * src.width as usize + src_x) * channels;
            let to = (y as usize * width as usize + x as usize) * channels;
            out.data[to..to + channels].copy_from_slice(&src.data[from..from + channels]);
        }
    }

    out
}

fn sample_bilinear(
    src: &ImageBuffer,
    width: u32,
    height: u32,
    step_x: f64,
    step_y: f64,
) -> ImageBuffer {
    let channels = src.channels as usize;
    let src_w = src.width as usize;
    let max_x = (src.width - 1) as f64;
    let max_y = (src.height - 1) as f64;
    let mut out = ImageBuffer::new(width, height, src.channels);

    for y in 0..height {
        let fy = (y as f64 * step_y).min(max_y);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(src.height as usize - 1);
        let ty = fy - y0 as f64;

        for x in 0..width {
            let fx = (x as f64 * step_x).min(max_x);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(src_w - 1);
            let tx = fx - x0 as f64;

            let to = (y as usize * width as usize + x as usize) * channels;
            for c in 0..channels {
                let at = |px: usize, py: usize| src.data[(py * src_w + px) * channels + c] as f64;
                let top = at(x0, y0) * (1.0 - tx) + at(x1, y0) * tx;
                let bottom = at(x0, y1) * (1.0 - tx) + at(x1, y1) * tx;
                let value = top * (1.0 - ty) + bottom * ty;
                out.data[to + c] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_ramp(width: u32, height: u32) -> ImageBuffer {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 7]);
            }
        }
        ImageBuffer::from_raw(width, height, 3, data).unwrap()
    }

    #[test]
    fn test_resize_dimensions() {
        let src = rgb_ramp(40, 30);
        let out = resize(&src, 2.0, 2.0, Filter::Nearest).unwrap();
        assert_eq!((out.width, out.height), (20, 7));
        assert!(out.is_consistent());
    }

    #[test]
    fn test_resize_nearest_picks_scaled_source() {
        let src = rgb_ramp(8, 8);
        let out = resize(&src, 2.0, 1.0, Filter::Nearest).unwrap();
        assert_eq!(out.rgb(3, 1), crate::buffer::Rgb::new(6, 2, 7));
    }

    #[test]
    fn test_resize_applies_aspect_to_rows() {
        let src = rgb_ramp(4, 8);
        let out = resize(&src, 1.0, 2.0, Filter::Nearest).unwrap();
        assert_eq!((out.width, out.height), (4, 4));
        // Row 1 samples source row 2
        assert_eq!(out.rgb(0, 1).g, 2);
    }

    #[test]
    fn test_resize_leaves_source_untouched() {
        let src = rgb_ramp(6, 6);
        let before = src.clone();
        let _ = resize(&src, 0.5, 2.0, Filter::Bilinear).unwrap();
        assert_eq!(src, before);
    }

    #[test]
    fn test_resize_keeps_channel_count() {
        let src = ImageBuffer::new(10, 10, 4);
        let out = resize(&src, 3.0, 1.0, Filter::Nearest).unwrap();
        assert_eq!(out.channels, 4);
        assert_eq!(out.data.len(), 3 * 3 * 4);
    }

    #[test]
    fn test_resize_rejects_bad_factors() {
        let src = rgb_ramp(4, 4);
        assert!(matches!(
            resize(&src, 0.0, 2.0, Filter::Nearest),
            Err(ResizeError::InvalidScale { .. })
        ));
        assert!(matches!(
            resize(&src, 1.0, -2.0, Filter::Nearest),
            Err(ResizeError::InvalidScale { .. })
        ));
        assert!(matches!(
            resize(&src, f32::NAN, 1.0, Filter::Nearest),
            Err(ResizeError::InvalidScale { .. })
        ));
    }

    #[test]
    fn test_resize_rejects_corrupt_buffer() {
        let src = ImageBuffer {
            width: 4,
            height: 4,
            channels: 3,
            data: vec![0; 10],
        };
        assert_eq!(
            resize(&src, 1.0, 1.0, Filter::Nearest),
            Err(ResizeError::CorruptBuffer {
                expected: 48,
                actual: 10
            })
        );
    }

    #[test]
    fn test_resize_rejects_empty_source() {
        let src = ImageBuffer::new(0, 5, 3);
        assert!(matches!(
            resize(&src, 1.0, 1.0, Filter::Nearest),
            Err(ResizeError::EmptyTarget { .. })
        ));
    }

    #[test]
    fn test_resize_rejects_huge_target() {
        let src = rgb_ramp(100, 100);
        assert!(matches!(
            resize(&src, 0.000_01, 1.0, Filter::Nearest),
            Err(ResizeError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_bilinear_blends_neighbours() {
        // 2x1 black/white, upscaled 2x horizontally
        let src = ImageBuffer::from_raw(2, 1, 1, vec![0, 200]).unwrap();
        let out = resize(&src, 0.5, 2.0, Filter::Bilinear).unwrap();
        assert_eq!((out.width, out.height), (4, 1));
        assert_eq!(out.data, vec![0, 100, 200, 200]);
    }

    #[test]
    fn test_resize_to_fit_fits_terminal() {
        let src = rgb_ramp(200, 100);
        let terminal = TerminalSize {
            width: 50,
            height: 20,
        };
        let out = resize_to_fit(&src, terminal, 2.0, Filter::Nearest).unwrap();
        assert!(out.width <= 50);
        assert!(out.height <= 20);
        assert_eq!(out.width, 50);
    }

    #[test]
    fn test_filter_names() {
        assert_eq!(Filter::from_name("Bilinear"), Some(Filter::Bilinear));
        assert_eq!(Filter::from_name(Filter::Nearest.name()), Some(Filter::Nearest));
        assert_eq!(Filter::from_name("lanczos"), None);
    }
}
