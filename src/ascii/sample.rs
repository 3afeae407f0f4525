//! Per-cell sampling: averages pixels (or edge magnitudes) over a block.

use super::edges::EdgeMap;
use super::grayscale::luminance;
use crate::buffer::{ImageBuffer, Rgb};

/// Size of the pixel footprint behind one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSize {
    pub width: u32,
    pub height: u32,
}

impl BlockSize {
    /// One glyph per pixel.
    pub const PIXEL: BlockSize = BlockSize {
        width: 1,
        height: 1,
    };

    pub fn is_pixel(&self) -> bool {
        *self == Self::PIXEL
    }

    /// Grid of glyph cells covering a `width x height` image. Partial blocks at
    /// the right and bottom edges still get a cell.
    pub fn grid(&self, width: u32, height: u32) -> (u32, u32) {
        let bw = self.width.max(1);
        let bh = self.height.max(1);
        (width.div_ceil(bw), height.div_ceil(bh))
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self::PIXEL
    }
}

/// What drives glyph selection for a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intensity {
    /// Mean BT.601 luminance, 0-255.
    Brightness(f32),
    /// Mean normalized Sobel magnitude, 0-255.
    Edge(f32),
}

impl Intensity {
    pub fn value(&self) -> f32 {
        match self {
            Intensity::Brightness(v) | Intensity::Edge(v) => *v,
        }
    }
}

/// Aggregate of the pixels behind one glyph. Built per cell and dropped as
/// soon as the glyph is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub intensity: Intensity,
    /// Truncated mean color; `None` when color is off or the source has
    /// fewer than three channels.
    pub color: Option<Rgb>,
    pub count: u32,
}

impl Sample {
    /// A single-pixel brightness sample.
    pub fn brightness(value: f32, color: Option<Rgb>) -> Self {
        Self {
            intensity: Intensity::Brightness(value),
            color,
            count: 1,
        }
    }

    /// A single-pixel edge sample.
    pub fn edge(magnitude: f32, color: Option<Rgb>) -> Self {
        Self {
            intensity: Intensity::Edge(magnitude),
            color,
            count: 1,
        }
    }
}

/// Aggregate the block whose top-left glyph cell is `(cell_x, cell_y)`.
///
/// The footprint is clipped at the image edges. When `edges` is present the
/// sample carries the mean edge magnitude, otherwise the mean brightness.
/// A footprint with no pixels inside the image yields `count == 0`.
pub fn sample_block(
    buffer: &ImageBuffer,
    cell_x: u32,
    cell_y: u32,
    block: BlockSize,
    edges: Option<&EdgeMap>,
    with_color: bool,
) -> Sample {
    let bw = block.width.max(1);
    let bh = block.height.max(1);
    let start_x = cell_x.saturating_mul(bw);
    let start_y = cell_y.saturating_mul(bh);
    let end_x = start_x.saturating_add(bw).min(buffer.width);
    let end_y = start_y.saturating_add(bh).min(buffer.height);

    let mut brightness_sum = 0u64;
    let mut edge_sum = 0f32;
    let mut sum_r = 0u64;
    let mut sum_g = 0u64;
    let mut sum_b = 0u64;
    let mut count = 0u32;

    for y in start_y..end_y {
        for x in start_x..end_x {
            let rgb = buffer.rgb(x, y);
            match edges {
                Some(map) => edge_sum += map.get(x, y),
                None => brightness_sum += luminance(rgb) as u64,
            }
            sum_r += rgb.r as u64;
            sum_g += rgb.g as u64;
            sum_b += rgb.b as u64;
            count += 1;
        }
    }

    let intensity = match (edges, count) {
        (_, 0) => Intensity::Brightness(0.0),
        (Some(_), n) => Intensity::Edge(edge_sum / n as f32),
        (None, n) => Intensity::Brightness(brightness_sum as f32 / n as f32),
    };

    let color = (with_color && buffer.has_color() && count > 0).then(|| {
        let n = count as u64;
        Rgb::new((sum_r / n) as u8, (sum_g / n) as u8, (sum_b / n) as u8)
    });

    Sample {
        intensity,
        color,
        count,
    }
}
