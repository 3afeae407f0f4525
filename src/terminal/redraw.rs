//! In-place frame presentation for playback.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};

use crate::render::AsciiFrame;

/// Redraws frames over the previous one from the top-left corner.
///
/// Remembers the last presented size so that when a frame is narrower or
/// shorter than its predecessor the stale columns and rows get cleared.
/// Rows end in `\r\n` because the terminal is in raw mode during playback.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Redraw {
    prev_width: u32,
    prev_height: u32,
}

impl Redraw {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the last presented frame, `(0, 0)` before the first.
    pub fn previous_size(&self) -> (u32, u32) {
        (self.prev_width, self.prev_height)
    }

    /// Move home, write the frame and clear whatever the previous frame left
    /// outside it, then flush.
    pub fn present<W: Write>(&mut self, out: &mut W, frame: &AsciiFrame) -> io::Result<()> {
        let narrower = frame.width < self.prev_width;
        let shorter = frame.height < self.prev_height;

        crossterm::queue!(out, MoveTo(0, 0))?;

        let colored = frame.has_color();
        let mut line = String::with_capacity(frame.width as usize * 2);
        for row in 0..frame.height as usize {
            line.clear();
            frame.write_row(row, colored, &mut line);
            out.write_all(line.as_bytes())?;
            if narrower {
                crossterm::queue!(out, Clear(ClearType::UntilNewLine))?;
            }
            out.write_all(b"\r\n")?;
        }

        if shorter {
            crossterm::queue!(out, Clear(ClearType::FromCursorDown))?;
        }
        out.flush()?;

        self.prev_width = frame.width;
        self.prev_height = frame.height;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::Glyph;

    const HOME: &str = "\x1b[1;1H";
    const CLEAR_LINE: &str = "\x1b[K";
    const CLEAR_DOWN: &str = "\x1b[J";

    fn frame(width: u32, height: u32, ch: char) -> AsciiFrame {
        AsciiFrame {
            glyphs: vec![Glyph { ch, color: None }; (width * height) as usize],
            width,
            height,
        }
    }

    fn present(redraw: &mut Redraw, f: &AsciiFrame) -> String {
        let mut out = Vec::new();
        redraw.present(&mut out, f).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_first_frame_has_no_clears() {
        let mut redraw = Redraw::new();
        let out = present(&mut redraw, &frame(2, 2, '#'));
        assert_eq!(out, format!("{}##\r\n##\r\n", HOME));
        assert_eq!(redraw.previous_size(), (2, 2));
    }

    #[test]
    fn test_narrower_frame_clears_each_line() {
        let mut redraw = Redraw::new();
        present(&mut redraw, &frame(4, 2, '#'));
        let out = present(&mut redraw, &frame(2, 2, '.'));
        assert_eq!(out, format!("{h}..{c}\r\n..{c}\r\n", h = HOME, c = CLEAR_LINE));
        assert!(!out.contains(CLEAR_DOWN));
    }

    #[test]
    fn test_shorter_frame_clears_below() {
        let mut redraw = Redraw::new();
        present(&mut redraw, &frame(2, 3, '#'));
        let out = present(&mut redraw, &frame(2, 1, '.'));
        assert_eq!(out, format!("{}..\r\n{}", HOME, CLEAR_DOWN));
    }

    #[test]
    fn test_growing_frame_needs_no_clear() {
        let mut redraw = Redraw::new();
        present(&mut redraw, &frame(1, 1, '#'));
        let out = present(&mut redraw, &frame(3, 2, '#'));
        assert!(!out.contains(CLEAR_LINE));
        assert!(!out.contains(CLEAR_DOWN));
    }

    #[test]
    fn test_colored_frame_resets_every_row() {
        let mut redraw = Redraw::new();
        let mut colored = frame(1, 2, '#');
        colored.glyphs[0].color = Some(crate::buffer::Rgb::new(1, 2, 3));
        let out = present(&mut redraw, &colored);
        assert_eq!(
            out,
            format!("{}\x1b[38;2;1;2;3m#\x1b[0m\r\n#\x1b[0m\r\n", HOME)
        );
    }
}
