//! Animated GIF decoding.

use std::fs::File;
use std::io::{BufReader, Cursor};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Frame, Frames};

use super::FrameSource;
use crate::buffer::ImageBuffer;
use crate::error::LoadError;
use crate::fetch::{self, InputLocation};

/// Streams the frames of an animated GIF, decoding one at a time.
pub struct GifSource {
    name: String,
    frames: Option<Frames<'static>>,
    /// First frame, read ahead to learn the frame delay
    pending: Option<Frame>,
    fps: f64,
}

impl GifSource {
    /// Open a GIF from a file path or URL.
    pub fn open(location: &InputLocation) -> Result<Self, LoadError> {
        let name = location.to_string();
        let decode_error = |e: image::ImageError| LoadError::Decode {
            path: name.clone(),
            reason: e.to_string(),
        };

        let frames = match location {
            InputLocation::Path(path) => {
                let file = File::open(path).map_err(|e| LoadError::Decode {
                    path: name.clone(),
                    reason: e.to_string(),
                })?;
                GifDecoder::new(BufReader::new(file))
                    .map_err(decode_error)?
                    .into_frames()
            }
            InputLocation::Url(url) => {
                let bytes = fetch::fetch_bytes(url)?;
                GifDecoder::new(Cursor::new(bytes))
                    .map_err(decode_error)?
                    .into_frames()
            }
        };

        Self::from_frames(name, frames)
    }

    /// Decode a GIF held in memory.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, LoadError> {
        let name = name.into();
        let frames = GifDecoder::new(Cursor::new(bytes))
            .map_err(|e| LoadError::Decode {
                path: name.clone(),
                reason: e.to_string(),
            })?
            .into_frames();
        Self::from_frames(name, frames)
    }

    fn from_frames(name: String, mut frames: Frames<'static>) -> Result<Self, LoadError> {
        let pending = match frames.next() {
            Some(frame) => Some(frame.map_err(|e| LoadError::Decode {
                path: name.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        let fps = pending.as_ref().map(frame_rate).unwrap_or(0.0);
        log::debug!("Opened GIF {} ({:.2} fps)", name, fps);

        Ok(Self {
            name,
            frames: Some(frames),
            pending,
            fps,
        })
    }
}

/// Frames per second implied by a frame's delay, 0.0 when the delay is 0.
fn frame_rate(frame: &Frame) -> f64 {
    let (numer, denom) = frame.delay().numer_denom_ms();
    if numer == 0 || denom == 0 {
        return 0.0;
    }
    1000.0 * denom as f64 / numer as f64
}

fn to_buffer(frame: Frame) -> ImageBuffer {
    let rgba = frame.into_buffer();
    let (width, height) = (rgba.width(), rgba.height());
    ImageBuffer {
        width,
        height,
        channels: 4,
        data: rgba.into_raw(),
    }
}

impl FrameSource for GifSource {
    fn next_frame(&mut self) -> Result<Option<ImageBuffer>, LoadError> {
        if let Some(frame) = self.pending.take() {
            return Ok(Some(to_buffer(frame)));
        }

        let Some(frames) = self.frames.as_mut() else {
            return Ok(None);
        };

        match frames.next() {
            Some(Ok(frame)) => Ok(Some(to_buffer(frame))),
            Some(Err(e)) => Err(LoadError::Decode {
                path: self.name.clone(),
                reason: e.to_string(),
            }),
            None => {
                self.frames = None;
                Ok(None)
            }
        }
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    fn close(&mut self) {
        self.pending = None;
        self.frames = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, RgbaImage};

    fn encode_gif(frames: &[[u8; 4]], delay_ms: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            for color in frames {
                let image = RgbaImage::from_pixel(4, 2, image::Rgba(*color));
                let frame = Frame::from_parts(image, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
                encoder.encode_frame(frame).unwrap();
            }
        }
        bytes
    }

    #[test]
    fn test_decodes_every_frame() {
        let bytes = encode_gif(&[[255, 0, 0, 255], [0, 0, 255, 255], [0, 255, 0, 255]], 50);
        let mut source = GifSource::from_bytes("anim.gif", bytes).unwrap();

        let mut count = 0;
        while let Some(frame) = source.next_frame().unwrap() {
            assert_eq!((frame.width, frame.height, frame.channels), (4, 2, 4));
            assert!(frame.is_consistent());
            count += 1;
        }
        assert_eq!(count, 3);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_fps_from_first_delay() {
        let bytes = encode_gif(&[[0, 0, 0, 255], [255, 255, 255, 255]], 50);
        let source = GifSource::from_bytes("anim.gif", bytes).unwrap();
        assert!((source.fps() - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_delay_is_unknown_rate() {
        let bytes = encode_gif(&[[0, 0, 0, 255]], 0);
        let source = GifSource::from_bytes("anim.gif", bytes).unwrap();
        assert_eq!(source.fps(), 0.0);
    }

    #[test]
    fn test_close_stops_stream() {
        let bytes = encode_gif(&[[0, 0, 0, 255], [9, 9, 9, 255]], 10);
        let mut source = GifSource::from_bytes("anim.gif", bytes).unwrap();
        source.close();
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = GifSource::from_bytes("bad.gif", b"not a gif".to_vec());
        assert!(matches!(result, Err(LoadError::Decode { .. })));
    }
}
