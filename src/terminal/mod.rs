//! Terminal management module - playback screen guard, size query, and redraw.

mod redraw;
mod screen;
mod size;

// Re-export public types from submodules
pub use redraw::Redraw;
pub use screen::{is_stop_key, AnsiScreen, Screen, ScreenGuard};
pub use size::query_size;
