//! glyphcast library crate.
//!
//! Converts images, animated GIFs and video frames to ASCII/ANSI text.
//! This module exposes every pipeline stage for the binary and for
//! integration testing.

pub mod app;
pub mod ascii;
pub mod buffer;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod output;
pub mod params;
pub mod playback;
pub mod render;
pub mod source;
pub mod terminal;

pub use buffer::{ImageBuffer, Rgb};
pub use error::{AppError, LoadError, OutputError, ResizeError, ValidationError};
pub use params::RenderParams;
pub use render::{render, render_frame, AsciiFrame};
