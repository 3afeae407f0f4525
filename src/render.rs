//! Frame assembly: glyph grids and their ANSI text form.

use std::fmt::Write as _;

use crate::ascii::{sample_block, select_glyph, EdgeMap, Glyph};
use crate::buffer::{ImageBuffer, Rgb};
use crate::params::RenderParams;

/// ANSI reset, emitted at the end of every colored row.
pub const ANSI_RESET: &str = "\x1b[0m";

/// A rendered character grid.
///
/// Holds one [`Glyph`] per cell in row-major order, plus the grid size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsciiFrame {
    pub glyphs: Vec<Glyph>,
    /// Width in characters
    pub width: u32,
    /// Height in characters
    pub height: u32,
}

impl AsciiFrame {
    /// Whether any cell carries a color.
    pub fn has_color(&self) -> bool {
        self.glyphs.iter().any(|g| g.color.is_some())
    }

    /// Rows of glyphs, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Glyph]> {
        self.glyphs.chunks(self.width.max(1) as usize)
    }

    /// Plain characters only, rows joined by newlines (no trailing newline).
    pub fn to_plain_string(&self) -> String {
        if self.width == 0 || self.height == 0 {
            return String::new();
        }
        self.rows()
            .map(|row| row.iter().map(|g| g.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Append one row as text, without the trailing newline.
    ///
    /// A 24-bit foreground escape (`ESC[38;2;R;G;Bm`) precedes each change of
    /// color; runs of the same color share one escape. `colored` is
    /// [`AsciiFrame::has_color`], computed once per frame by the caller; when
    /// set the row ends with [`ANSI_RESET`].
    pub fn write_row(&self, row: usize, colored: bool, out: &mut String) {
        let width = self.width as usize;
        let start = row * width;
        let Some(cells) = self.glyphs.get(start..start + width) else {
            return;
        };

        let mut current: Option<Rgb> = None;
        for glyph in cells {
            if let Some(rgb) = glyph.color {
                if current != Some(rgb) {
                    let _ = write!(out, "\x1b[38;2;{};{};{}m", rgb.r, rgb.g, rgb.b);
                    current = Some(rgb);
                }
            }
            out.push(glyph.ch);
        }
        if colored {
            out.push_str(ANSI_RESET);
        }
    }

    /// The full text blob: every row followed by a newline.
    pub fn to_ansi_string(&self) -> String {
        let colored = self.has_color();
        let mut out = String::with_capacity(self.glyphs.len() * 2 + self.height as usize);
        for row in 0..self.height as usize {
            self.write_row(row, colored, &mut out);
            out.push('\n');
        }
        out
    }
}

/// Map every cell of an (already resized) buffer to a glyph.
///
/// `edges` must be the map for this exact buffer; when it is `None` glyphs
/// are chosen by brightness.
pub fn render_frame(buffer: &ImageBuffer, params: &RenderParams, edges: Option<&EdgeMap>) -> AsciiFrame {
    let (cols, rows) = params.block.grid(buffer.width, buffer.height);
    let with_color = params.color && buffer.has_color();

    let mut glyphs = Vec::with_capacity(cols as usize * rows as usize);
    for cy in 0..rows {
        for cx in 0..cols {
            let sample = sample_block(buffer, cx, cy, params.block, edges, with_color);
            glyphs.push(select_glyph(&sample, params));
        }
    }

    AsciiFrame {
        glyphs,
        width: cols,
        height: rows,
    }
}

/// Render a buffer straight to its text blob.
pub fn render(buffer: &ImageBuffer, params: &RenderParams, edges: Option<&EdgeMap>) -> String {
    render_frame(buffer, params, edges).to_ansi_string()
}
