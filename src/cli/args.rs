//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{CharacterSet, FilterArg};
use crate::ascii::BlockSize;
use crate::params::parse_block_size;

/// Render images, GIFs and videos as ASCII art in the terminal
#[derive(Parser, Debug)]
#[command(name = "glyphcast")]
#[command(version, about = "Render images, GIFs and video as ASCII art", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image, GIF or video file (or http(s) URL)
    #[arg(value_name = "INPUT")]
    pub path: Option<String>,

    /// Input file or URL (same as the positional INPUT)
    #[arg(short, long, conflicts_with = "path")]
    pub input: Option<String>,

    /// Write the rendered text to a file instead of the terminal
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Custom character ramp, darkest to brightest (overrides --charset)
    #[arg(short = 'c', long)]
    pub chars: Option<String>,

    /// Built-in character set
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Emit 24-bit ANSI colors
    #[arg(long)]
    pub color: bool,

    /// Plain text output even if the config enables color
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Invert brightness (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Do not invert brightness
    #[arg(long, conflicts_with = "invert")]
    pub no_invert: bool,

    /// Invert emitted colors
    #[arg(long)]
    pub invert_color: bool,

    /// Do not invert emitted colors
    #[arg(long, conflicts_with = "invert_color")]
    pub no_invert_color: bool,

    /// Brightness multiplier (default: 1.0)
    #[arg(short, long, allow_negative_numbers = true)]
    pub brightness: Option<f32>,

    /// Source pixels per output column (default: 1.0)
    #[arg(short, long, allow_negative_numbers = true)]
    pub scale: Option<f32>,

    /// Select glyphs by edge strength (Sobel) instead of brightness
    #[arg(long)]
    pub edges: bool,

    /// Select glyphs by brightness even if the config enables edges
    #[arg(long, conflicts_with = "edges")]
    pub no_edges: bool,

    /// Height-to-width ratio of a terminal cell (default: 2.0)
    #[arg(long, allow_negative_numbers = true)]
    pub aspect_ratio: Option<f32>,

    /// Fit the output to the terminal size
    #[arg(long, conflicts_with = "original_size")]
    pub fit: bool,

    /// Use --scale even if the config enables fitting
    #[arg(long)]
    pub original_size: bool,

    /// Fixed delay between animation frames in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay: Option<u64>,

    /// Pixels behind each glyph, as WIDTHxHEIGHT (e.g. 2x4)
    #[arg(long, value_name = "WxH", value_parser = parse_block_arg)]
    pub block: Option<BlockSize>,

    /// Block width in pixels
    #[arg(long, conflicts_with = "block")]
    pub block_width: Option<u32>,

    /// Block height in pixels
    #[arg(long, conflicts_with = "block")]
    pub block_height: Option<u32>,

    /// Resampling filter
    #[arg(long)]
    pub filter: Option<FilterArg>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// The input from either the positional argument or `--input`.
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref().or(self.path.as_deref())
    }

    /// `--color` / `--no-color`, or `None` when neither was given.
    pub fn color(&self) -> Option<bool> {
        switch(self.color, self.no_color)
    }

    pub fn invert(&self) -> Option<bool> {
        switch(self.invert, self.no_invert)
    }

    pub fn invert_color(&self) -> Option<bool> {
        switch(self.invert_color, self.no_invert_color)
    }

    pub fn edges(&self) -> Option<bool> {
        switch(self.edges, self.no_edges)
    }
}

/// Resolve a `--flag` / `--no-flag` pair (clap rejects both at once).
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn parse_block_arg(s: &str) -> Result<BlockSize, String> {
    parse_block_size(s).map_err(|e| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
