//! RGB to grayscale conversion using ITU-R BT.601 luminance formula.

use crate::buffer::{ImageBuffer, Rgb};

/// Luminance of one RGB triplet: Y = 0.299*R + 0.587*G + 0.114*B.
///
/// Integer math with coefficients scaled by 1000 (299 + 587 + 114 = 1000),
/// truncated. Pure white maps to exactly 255.
#[inline]
pub fn luminance(rgb: Rgb) -> u8 {
    let luminance = (299 * rgb.r as u32 + 587 * rgb.g as u32 + 114 * rgb.b as u32) / 1000;
    luminance as u8
}

/// Convert a buffer to one luminance byte per pixel, row-major.
///
/// Channels beyond the buffer's channel count read as 0, so a single-channel
/// buffer contributes only its first channel through the red weight.
pub fn to_grayscale(buffer: &ImageBuffer) -> Vec<u8> {
    let mut gray = Vec::with_capacity(buffer.pixel_count());

    if buffer.has_color() && buffer.is_consistent() {
        // Fast path over interleaved bytes
        let channels = buffer.channels as usize;
        for px in buffer.data.chunks_exact(channels) {
            gray.push(luminance(Rgb::new(px[0], px[1], px[2])));
        }
    } else {
        for y in 0..buffer.height {
            for x in 0..buffer.width {
                gray.push(luminance(buffer.rgb(x, y)));
            }
        }
    }

    gray
}
