//! Sobel edge detection.

use super::grayscale::to_grayscale;
use crate::buffer::ImageBuffer;

/// Horizontal-gradient kernel (responds to vertical edges).
const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Vertical-gradient kernel (responds to horizontal edges).
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Per-pixel gradient magnitudes normalized into `[0, 255]`.
///
/// Computed once per frame and read by the glyph mapper; the border pixels
/// are always 0 since the kernel is never applied out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap {
    pub width: u32,
    pub height: u32,
    values: Vec<f32>,
}

impl EdgeMap {
    /// A map with every magnitude at 0.
    pub fn zeroed(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width as usize * height as usize],
        }
    }

    /// Magnitude at `(x, y)`, or 0 outside the map.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.values[y as usize * self.width as usize + x as usize]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Largest magnitude in the map (0 for an empty map).
    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    /// Rescale so the strongest edge becomes 255. A flat map stays all zero.
    fn normalize(&mut self) {
        let max = self.max();
        if max > 0.0 {
            for value in &mut self.values {
                *value = *value / max * 255.0;
            }
        }
    }
}

/// Apply the Sobel operator to a buffer.
///
/// The buffer is converted to grayscale with BT.601 weights first. Buffers
/// with fewer than three channels are treated as black (every magnitude 0).
///
/// The Sobel kernels used are:
/// ```text
/// Gx:          Gy:
/// [-1  0  1]   [-1 -2 -1]
/// [-2  0  2]   [ 0  0  0]
/// [-1  0  1]   [ 1  2  1]
/// ```
///
/// Magnitude is `sqrt(gx² + gy²)`, then the whole map is normalized by its
/// maximum.
pub fn detect(buffer: &ImageBuffer) -> EdgeMap {
    let mut map = EdgeMap::zeroed(buffer.width, buffer.height);

    if !buffer.has_color() {
        log::warn!(
            "Edge detection needs an RGB image, got {} channel(s); treating pixels as black",
            buffer.channels
        );
        return map;
    }

    let (width, height) = (buffer.width as usize, buffer.height as usize);
    if width < 3 || height < 3 {
        return map;
    }

    let gray = to_grayscale(buffer);

    // Interior pixels only (skip 1-pixel border)
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut gx: i32 = 0;
            let mut gy: i32 = 0;

            for ky in 0..3 {
                for kx in 0..3 {
                    let idx = (y + ky - 1) * width + (x + kx - 1);
                    let val = gray[idx] as i32;
                    gx += val * SOBEL_X[ky][kx];
                    gy += val * SOBEL_Y[ky][kx];
                }
            }

            map.values[y * width + x] = ((gx * gx + gy * gy) as f32).sqrt();
        }
    }

    map.normalize();
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_buffer(width: u32, height: u32, pixels: &[u8]) -> ImageBuffer {
        let data = pixels.iter().flat_map(|&v| [v, v, v]).collect();
        ImageBuffer::from_raw(width, height, 3, data).unwrap()
    }

    #[test]
    fn test_uniform_image_has_no_edges() {
        let buffer = gray_buffer(3, 3, &[128; 9]);
        let map = detect(&buffer);
        assert_eq!(map.len(), 9);
        assert!(map.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_vertical_step_is_normalized_to_255() {
        // Left column black, rest white
        #[rustfmt::skip]
        let buffer = gray_buffer(4, 3, &[
            0, 255, 255, 255,
            0, 255, 255, 255,
            0, 255, 255, 255,
        ]);
        let map = detect(&buffer);
        // Pixel (1,1) sits on the step: gx = 4 * 255, gy = 0
        assert_eq!(map.get(1, 1), 255.0);
        // Pixel (2,1) sees only white
        assert_eq!(map.get(2, 1), 0.0);
    }

    #[test]
    fn test_border_is_zero() {
        #[rustfmt::skip]
        let buffer = gray_buffer(5, 4, &[
            0, 200, 10, 255, 3,
            90, 0, 255, 0, 180,
            255, 30, 0, 77, 0,
            1, 255, 60, 0, 240,
        ]);
        let map = detect(&buffer);
        for x in 0..5 {
            assert_eq!(map.get(x, 0), 0.0);
            assert_eq!(map.get(x, 3), 0.0);
        }
        for y in 0..4 {
            assert_eq!(map.get(0, y), 0.0);
            assert_eq!(map.get(4, y), 0.0);
        }
        assert!(map.max() > 0.0);
    }

    #[test]
    fn test_values_stay_in_range() {
        #[rustfmt::skip]
        let buffer = gray_buffer(4, 4, &[
            0, 255, 0, 255,
            255, 0, 255, 0,
            0, 255, 0, 255,
            255, 0, 255, 0,
        ]);
        let map = detect(&buffer);
        assert!(map.values().iter().all(|&v| (0.0..=255.0).contains(&v)));
        assert!((map.max() - 255.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_channel_buffer_is_all_zero() {
        let buffer = ImageBuffer::from_raw(3, 3, 1, vec![0, 255, 0, 255, 0, 255, 0, 255, 0]).unwrap();
        let map = detect(&buffer);
        assert_eq!(map.len(), 9);
        assert_eq!(map.max(), 0.0);
    }

    #[test]
    fn test_tiny_images_keep_full_length() {
        let buffer = gray_buffer(2, 1, &[0, 255]);
        let map = detect(&buffer);
        assert_eq!(map.len(), 2);
        assert_eq!(map.max(), 0.0);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let map = EdgeMap::zeroed(2, 2);
        assert_eq!(map.get(9, 9), 0.0);
    }
}
