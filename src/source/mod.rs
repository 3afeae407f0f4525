//! Frame sources: anything that yields a sequence of decoded frames.
//!
//! - [`GifSource`] - animated GIFs via the `image` crate
//! - [`VideoSource`] - any FFmpeg-readable video, streamed as raw RGB
//! - [`SingleFrame`] - a still image as a one-frame sequence

mod gif;
mod video;

pub use gif::GifSource;
pub use video::{parse_frame_rate, parse_probe_output, VideoInfo, VideoSource};

use crate::buffer::{self, ImageBuffer};
use crate::error::LoadError;
use crate::fetch::{InputKind, InputLocation};

/// A decoder handle yielding frames in presentation order.
pub trait FrameSource {
    /// The next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<ImageBuffer>, LoadError>;

    /// Native frame rate, or 0.0 when unknown.
    fn fps(&self) -> f64;

    /// Release the decode handle. Later `next_frame` calls return `None`.
    fn close(&mut self) {}
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<ImageBuffer>, LoadError> {
        (**self).next_frame()
    }

    fn fps(&self) -> f64 {
        (**self).fps()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// A still image presented once.
#[derive(Debug)]
pub struct SingleFrame {
    frame: Option<ImageBuffer>,
}

impl SingleFrame {
    pub fn new(frame: ImageBuffer) -> Self {
        Self { frame: Some(frame) }
    }
}

impl FrameSource for SingleFrame {
    fn next_frame(&mut self) -> Result<Option<ImageBuffer>, LoadError> {
        Ok(self.frame.take())
    }

    fn fps(&self) -> f64 {
        0.0
    }

    fn close(&mut self) {
        self.frame = None;
    }
}

/// Open the right decoder for an input.
pub fn open(location: &InputLocation) -> Result<Box<dyn FrameSource>, LoadError> {
    match location.kind() {
        InputKind::Gif => Ok(Box::new(GifSource::open(location)?)),
        InputKind::Video => Ok(Box::new(VideoSource::spawn(location)?)),
        InputKind::Still => Ok(Box::new(SingleFrame::new(buffer::decode(location)?))),
    }
}
