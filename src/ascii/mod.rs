//! Pixel-to-glyph pipeline stages.
//!
//! 1. **Resampling** - scale to character-grid resolution with aspect correction
//! 2. **Edge detection** - optional Sobel magnitude map
//! 3. **Sampling** - per-cell brightness/edge/color aggregates
//! 4. **Glyph mapping** - ramp lookup plus optional color
//!
//! Frame assembly lives in [`crate::render`].

mod charset;
mod dimensions;
mod edges;
mod grayscale;
mod mapping;
mod resample;
mod sample;

pub use charset::{
    CharSet, Ramp, BLOCKS_CHARSET, DETAILED_CHARSET, MINIMAL_CHARSET, STANDARD_CHARSET,
};
pub use dimensions::{
    fit_scale, scaled_dimensions, TerminalSize, DEFAULT_CHAR_ASPECT_RATIO, MAX_FIT_SCALE,
    MIN_FIT_SCALE,
};
pub use edges::{detect as detect_edges, EdgeMap};
pub use grayscale::{luminance, to_grayscale};
pub use mapping::{ramp_index, select_glyph, selection_value, Glyph};
pub use resample::{resize, resize_to_fit, Filter, MAX_TARGET_PIXELS};
pub use sample::{sample_block, BlockSize, Intensity, Sample};
