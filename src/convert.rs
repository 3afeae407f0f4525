//! The per-frame pipeline: resize, optional edge detection, glyph rendering.

use crate::ascii::{detect_edges, resize, resize_to_fit, TerminalSize};
use crate::buffer::ImageBuffer;
use crate::error::ResizeError;
use crate::params::RenderParams;
use crate::render::{render_frame, AsciiFrame};
use crate::terminal;

/// Convert one decoded frame to a glyph grid.
///
/// In auto-fit mode the terminal is queried on every call so playback
/// follows window resizes; the bottom row is left free for the cursor.
pub fn convert(buffer: ImageBuffer, params: &RenderParams) -> Result<AsciiFrame, ResizeError> {
    let target = if params.auto_fit {
        Some(fit_target(terminal::query_size()))
    } else {
        None
    };
    convert_with_size(buffer, params, target)
}

/// Same as [`convert`] with an explicit fit target instead of a terminal query.
///
/// `fit` is only consulted in auto-fit mode. It counts character cells, so in
/// block mode the pixel target is scaled up by the block size.
pub fn convert_with_size(
    buffer: ImageBuffer,
    params: &RenderParams,
    fit: Option<TerminalSize>,
) -> Result<AsciiFrame, ResizeError> {
    let resized = match (params.auto_fit, fit) {
        (true, Some(size)) => {
            let pixels = TerminalSize {
                width: size.width.saturating_mul(u16::try_from(params.block.width).unwrap_or(u16::MAX)),
                height: size.height.saturating_mul(u16::try_from(params.block.height).unwrap_or(u16::MAX)),
            };
            resize_to_fit(&buffer, pixels, params.aspect_ratio, params.filter)?
        }
        _ => resize(&buffer, params.scale, params.aspect_ratio, params.filter)?,
    };
    drop(buffer);

    // Computed fresh for this frame and dropped with it
    let edges = params.edges.then(|| detect_edges(&resized));

    Ok(render_frame(&resized, params, edges.as_ref()))
}

/// Terminal area available to a fitted frame.
pub fn fit_target(size: TerminalSize) -> TerminalSize {
    TerminalSize {
        width: size.width.max(1),
        height: size.height.saturating_sub(1).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::BlockSize;

    fn gray(width: u32, height: u32, value: u8) -> ImageBuffer {
        ImageBuffer::from_raw(width, height, 3, vec![value; (width * height * 3) as usize]).unwrap()
    }

    #[test]
    fn test_convert_applies_scale_and_aspect() {
        let params = RenderParams {
            scale: 2.0,
            ..RenderParams::default()
        };
        let frame = convert(gray(20, 20, 255), &params).unwrap();
        assert_eq!((frame.width, frame.height), (10, 5));
    }

    #[test]
    fn test_convert_with_fit_target() {
        let params = RenderParams {
            auto_fit: true,
            ..RenderParams::default()
        };
        let size = TerminalSize {
            width: 10,
            height: 10,
        };
        let frame = convert_with_size(gray(100, 40, 0), &params, Some(size)).unwrap();
        assert_eq!((frame.width, frame.height), (10, 2));
    }

    #[test]
    fn test_fit_with_blocks_fills_terminal() {
        let params = RenderParams {
            auto_fit: true,
            aspect_ratio: 1.0,
            block: BlockSize {
                width: 2,
                height: 4,
            },
            ..RenderParams::default()
        };
        let size = TerminalSize {
            width: 10,
            height: 5,
        };
        let frame = convert_with_size(gray(200, 200, 255), &params, Some(size)).unwrap();
        assert_eq!((frame.width, frame.height), (10, 5));
    }

    #[test]
    fn test_fit_target_reserves_prompt_row() {
        assert_eq!(
            fit_target(TerminalSize {
                width: 80,
                height: 24
            }),
            TerminalSize {
                width: 80,
                height: 23
            }
        );
        assert_eq!(
            fit_target(TerminalSize {
                width: 0,
                height: 1
            }),
            TerminalSize {
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn test_convert_edges_flat_image() {
        let params = RenderParams {
            edges: true,
            aspect_ratio: 1.0,
            ..RenderParams::default()
        };
        let frame = convert(gray(3, 3, 90), &params).unwrap();
        assert!(frame.glyphs.iter().all(|g| g.ch == ' '));
    }

    #[test]
    fn test_convert_propagates_resize_error() {
        let params = RenderParams::default();
        let corrupt = ImageBuffer {
            width: 4,
            height: 4,
            channels: 3,
            data: vec![0; 5],
        };
        assert!(matches!(
            convert(corrupt, &params),
            Err(ResizeError::CorruptBuffer { .. })
        ));
    }
}
