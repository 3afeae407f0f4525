//! Terminal size query.

use crate::ascii::TerminalSize;

/// Current terminal size in character cells.
///
/// Falls back to 80x24 when stdout is not a terminal or the query fails.
pub fn query_size() -> TerminalSize {
    match crossterm::terminal::size() {
        Ok((width, height)) if width > 0 && height > 0 => TerminalSize { width, height },
        Ok((width, height)) => {
            log::debug!(
                "Terminal reported {}x{}, using {}x{}",
                width,
                height,
                TerminalSize::FALLBACK.width,
                TerminalSize::FALLBACK.height
            );
            TerminalSize::FALLBACK
        }
        Err(e) => {
            log::debug!("Terminal size unavailable ({}), using fallback", e);
            TerminalSize::FALLBACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_size_is_never_empty() {
        let size = query_size();
        assert!(size.width > 0);
        assert!(size.height > 0);
    }
}
