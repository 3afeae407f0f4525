//! Raw pixel buffers and the still-image decoder.

use image::DynamicImage;

use crate::error::LoadError;
use crate::fetch::{self, InputLocation};

/// An RGB color triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise `255 - c`.
    pub fn inverted(self) -> Self {
        Self {
            r: 255 - self.r,
            g: 255 - self.g,
            b: 255 - self.b,
        }
    }
}

/// An in-memory image: `width * height` pixels of `channels` interleaved bytes.
///
/// Valid channel counts are 1 (gray), 3 (RGB) and 4 (RGBA). Pixel data is
/// row-major, top-left first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a zero-filled buffer.
    pub fn new(width: u32, height: u32, channels: u8) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self {
            width,
            height,
            channels,
            data: vec![0; len],
        }
    }

    /// Wrap existing pixel data. Returns `None` when the length does not
    /// match `width * height * channels` or the channel count is unsupported.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Option<Self> {
        let buffer = Self {
            width,
            height,
            channels,
            data,
        };
        buffer.is_consistent().then_some(buffer)
    }

    /// Expected data length for the declared dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Whether the data length and channel count satisfy the buffer invariant.
    pub fn is_consistent(&self) -> bool {
        matches!(self.channels, 1 | 3 | 4) && self.data.len() == self.expected_len()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the buffer carries color (at least R, G and B).
    pub fn has_color(&self) -> bool {
        self.channels >= 3
    }

    /// Read the RGB triplet at `(x, y)`.
    ///
    /// Missing channels read as 0, and out-of-range coordinates or truncated
    /// data yield black.
    pub fn rgb(&self, x: u32, y: u32) -> Rgb {
        if x >= self.width || y >= self.height {
            return Rgb::default();
        }
        let channels = self.channels as usize;
        let idx = (y as usize * self.width as usize + x as usize) * channels;
        let channel = |offset: usize| -> u8 {
            if offset < channels {
                self.data.get(idx + offset).copied().unwrap_or(0)
            } else {
                0
            }
        };
        Rgb::new(channel(0), channel(1), channel(2))
    }
}

impl From<DynamicImage> for ImageBuffer {
    /// Convert a decoded image, keeping alpha when present.
    ///
    /// Gray images are widened to RGB so they render at their real brightness.
    fn from(image: DynamicImage) -> Self {
        if image.color().has_alpha() {
            let rgba = image.into_rgba8();
            let (width, height) = (rgba.width(), rgba.height());
            Self {
                width,
                height,
                channels: 4,
                data: rgba.into_raw(),
            }
        } else {
            let rgb = image.into_rgb8();
            let (width, height) = (rgb.width(), rgb.height());
            Self {
                width,
                height,
                channels: 3,
                data: rgb.into_raw(),
            }
        }
    }
}

/// Decode a still image from a file path or URL.
pub fn decode(location: &InputLocation) -> Result<ImageBuffer, LoadError> {
    let image = match location {
        InputLocation::Path(path) => image::open(path).map_err(|e| LoadError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?,
        InputLocation::Url(url) => {
            let bytes = fetch::fetch_bytes(url)?;
            image::load_from_memory(&bytes).map_err(|e| LoadError::Decode {
                path: url.clone(),
                reason: e.to_string(),
            })?
        }
    };

    let buffer = ImageBuffer::from(image);
    log::debug!(
        "Decoded {} ({}x{}, {} channels)",
        location,
        buffer.width,
        buffer.height,
        buffer.channels
    );
    Ok(buffer)
}
