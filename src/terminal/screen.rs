//! Playback screen state with guaranteed, panic-safe restoration.

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Static flag to track if the playback screen is active (for panic handler)
pub(crate) static SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);

/// An output that can switch into and out of playback mode.
///
/// `enter` switches to the alternate screen, hides the cursor and captures
/// the mouse; `leave` reverses all three.
pub trait Screen: Write {
    fn enter(&mut self) -> io::Result<()>;

    fn leave(&mut self) -> io::Result<()>;

    /// Pause for `timeout` between frames. Returns `true` when the user asked
    /// to stop playback in the meantime.
    fn wait(&mut self, timeout: Duration) -> io::Result<bool> {
        thread::sleep(timeout);
        Ok(false)
    }

    /// Whether this screen is the process's real terminal, which the panic
    /// hook must restore.
    fn owns_terminal(&self) -> bool {
        false
    }
}

/// A [`Screen`] that drives any writer with ANSI sequences via crossterm.
///
/// On the real terminal playback also runs in raw mode, so mouse reports and
/// keystrokes are not echoed over the frames. Ctrl+C, `q` and Esc then arrive
/// as key events and stop playback from [`Screen::wait`].
pub struct AnsiScreen<W: Write> {
    out: W,
    owns_terminal: bool,
    /// Whether this screen switched the terminal into raw mode
    raw: bool,
}

impl<W: Write> AnsiScreen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            owns_terminal: false,
            raw: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl AnsiScreen<Stdout> {
    /// The process's standard output terminal.
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            owns_terminal: true,
            raw: false,
        }
    }
}

impl<W: Write> Write for AnsiScreen<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Screen for AnsiScreen<W> {
    fn enter(&mut self) -> io::Result<()> {
        if self.owns_terminal {
            match enable_raw_mode() {
                Ok(()) => self.raw = true,
                Err(e) => log::warn!("Could not enable raw mode: {}", e),
            }
        }
        crossterm::execute!(self.out, EnterAlternateScreen, Hide, EnableMouseCapture)
    }

    fn leave(&mut self) -> io::Result<()> {
        let result = crossterm::execute!(self.out, DisableMouseCapture, Show, LeaveAlternateScreen);
        if self.raw {
            self.raw = false;
            discard_pending_input();
            disable_raw_mode()?;
        }
        result
    }

    fn wait(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.raw {
            thread::sleep(timeout);
            return Ok(false);
        }

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(false);
            }
            // Mouse and resize events are read and dropped
            if let Event::Key(key) = event::read()? {
                if is_stop_key(&key) {
                    return Ok(true);
                }
            }
        }
    }

    fn owns_terminal(&self) -> bool {
        self.owns_terminal
    }
}

/// Guard that enters playback mode on creation and leaves it exactly once,
/// on [`ScreenGuard::release`] or on drop, whichever comes first.
///
/// Mode changes are best-effort: failures are logged and never abort
/// playback.
pub struct ScreenGuard<S: Screen> {
    screen: S,
    /// Whether this guard is responsible for cleanup
    active: bool,
}

impl<S: Screen> ScreenGuard<S> {
    /// Enter playback mode and return a guard that will restore it.
    pub fn enter(mut screen: S) -> Self {
        if screen.owns_terminal() {
            install_panic_hook();
            SCREEN_ACTIVE.store(true, Ordering::SeqCst);
        }

        if let Err(e) = screen.enter() {
            log::warn!("Could not switch terminal to playback mode: {}", e);
        }

        Self {
            screen,
            active: true,
        }
    }

    /// Access the screen for drawing.
    pub fn screen(&mut self) -> &mut S {
        &mut self.screen
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Leave playback mode now. Later calls and the drop are no-ops.
    pub fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Err(e) = self.screen.leave() {
            log::warn!("Could not restore terminal state: {}", e);
        }
        if self.screen.owns_terminal() {
            SCREEN_ACTIVE.store(false, Ordering::SeqCst);
        }
    }
}

impl<S: Screen> Drop for ScreenGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Keys that end playback: Ctrl+C, `q` and Esc.
pub fn is_stop_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

/// Drop queued input (mouse reports, keys) so it never reaches the shell.
fn discard_pending_input() {
    while let Ok(true) = event::poll(Duration::ZERO) {
        if event::read().is_err() {
            break;
        }
    }
}

/// Install a panic hook that restores the terminal before the panic message
/// is printed.
pub(crate) fn install_panic_hook() {
    // Only install once
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if SCREEN_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = crossterm::execute!(
                io::stdout(),
                DisableMouseCapture,
                Show,
                LeaveAlternateScreen,
            );
            let _ = disable_raw_mode();
        }

        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Screen that counts mode switches.
    struct CountingScreen {
        enters: Rc<Cell<u32>>,
        leaves: Rc<Cell<u32>>,
        fail: bool,
    }

    impl Write for CountingScreen {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Screen for CountingScreen {
        fn enter(&mut self) -> io::Result<()> {
            self.enters.set(self.enters.get() + 1);
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "not a tty"));
            }
            Ok(())
        }

        fn leave(&mut self) -> io::Result<()> {
            self.leaves.set(self.leaves.get() + 1);
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "not a tty"));
            }
            Ok(())
        }
    }

    fn counting(fail: bool) -> (CountingScreen, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let enters = Rc::new(Cell::new(0));
        let leaves = Rc::new(Cell::new(0));
        let screen = CountingScreen {
            enters: enters.clone(),
            leaves: leaves.clone(),
            fail,
        };
        (screen, enters, leaves)
    }

    #[test]
    fn test_guard_leaves_on_drop() {
        let (screen, enters, leaves) = counting(false);
        let guard = ScreenGuard::enter(screen);
        assert_eq!(enters.get(), 1);
        assert_eq!(leaves.get(), 0);
        drop(guard);
        assert_eq!(leaves.get(), 1);
    }

    #[test]
    fn test_release_then_drop_leaves_once() {
        let (screen, _, leaves) = counting(false);
        let mut guard = ScreenGuard::enter(screen);
        guard.release();
        assert!(!guard.is_active());
        guard.release();
        drop(guard);
        assert_eq!(leaves.get(), 1);
    }

    #[test]
    fn test_failures_are_not_fatal() {
        let (screen, enters, leaves) = counting(true);
        let guard = ScreenGuard::enter(screen);
        assert!(guard.is_active());
        drop(guard);
        assert_eq!(enters.get(), 1);
        assert_eq!(leaves.get(), 1);
    }

    #[test]
    fn test_ansi_screen_sequences() {
        let mut screen = AnsiScreen::new(Vec::new());
        screen.enter().unwrap();
        screen.leave().unwrap();
        let out = String::from_utf8(screen.into_inner()).unwrap();
        assert!(out.contains("\x1b[?1049h"), "enter alternate screen");
        assert!(out.contains("\x1b[?25l"), "hide cursor");
        assert!(out.contains("\x1b[?25h"), "show cursor");
        assert!(out.contains("\x1b[?1049l"), "leave alternate screen");
        // Teardown reverses the order of Init
        assert!(out.find("\x1b[?25h").unwrap() < out.find("\x1b[?1049l").unwrap());
    }

    #[test]
    fn test_stop_keys() {
        assert!(is_stop_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(is_stop_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_stop_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));

        assert!(!is_stop_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_stop_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::ALT)));
        assert!(!is_stop_key(&KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)));
    }

    #[test]
    fn test_stop_key_release_is_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(!is_stop_key(&key));
    }

    #[test]
    fn test_non_terminal_screen_stays_cooked() {
        let mut screen = AnsiScreen::new(Vec::new());
        screen.enter().unwrap();
        assert!(!screen.raw);
        let start = Instant::now();
        assert!(!screen.wait(Duration::from_millis(5)).unwrap());
        assert!(start.elapsed() >= Duration::from_millis(5));
        screen.leave().unwrap();
    }

    #[test]
    fn test_panic_hook_installation() {
        install_panic_hook();
        install_panic_hook(); // Second call should be no-op
    }
}
