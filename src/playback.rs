//! Paced playback of multi-frame sources on a terminal screen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::ascii::TerminalSize;
use crate::convert::{convert_with_size, fit_target};
use crate::error::{AppError, OutputError};
use crate::params::RenderParams;
use crate::source::FrameSource;
use crate::terminal::{self, Redraw, Screen, ScreenGuard};

/// Delay used when neither an explicit delay nor a frame rate is known.
pub const FALLBACK_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Global flag for handling Ctrl+C, SIGTERM and SIGHUP across the application
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C or a termination signal has been received.
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler, which also catches SIGTERM and SIGHUP.
///
/// Playback and export stop at the next frame boundary, so the terminal is
/// restored before the process exits.
/// This should be called once at program startup.
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        INTERRUPTED.store(true, Ordering::SeqCst);
    })
}

/// Time between presented frames: the explicit delay when set, otherwise
/// `1000 / fps` ms, or 100 ms when the rate is unknown or not positive.
pub fn target_delay(explicit: Option<Duration>, fps: f64) -> Duration {
    if let Some(delay) = explicit {
        return delay;
    }
    if fps.is_finite() && fps > 0.0 {
        Duration::from_secs_f64(1.0 / fps)
    } else {
        FALLBACK_FRAME_DELAY
    }
}

/// Summary of a playback run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Frames written to the screen
    pub frames: u64,
    /// Frames dropped after a resize failure
    pub skipped: u64,
    /// Whether playback ended on a stop key or signal rather than end of stream
    pub interrupted: bool,
}

/// Drives a [`FrameSource`] onto a [`Screen`].
pub struct Playback<'a> {
    params: &'a RenderParams,
    fit_size: Option<TerminalSize>,
    stop: &'a AtomicBool,
}

impl<'a> Playback<'a> {
    pub fn new(params: &'a RenderParams) -> Self {
        Self {
            params,
            fit_size: None,
            stop: &INTERRUPTED,
        }
    }

    /// Fit frames to this area instead of querying the terminal each frame.
    pub fn with_fit_size(mut self, size: TerminalSize) -> Self {
        self.fit_size = Some(size);
        self
    }

    /// Stop at the next frame boundary once `flag` is set, instead of on Ctrl+C.
    pub fn with_stop_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.stop = flag;
        self
    }

    /// Play every frame of `source` on `screen`.
    ///
    /// The screen is switched into playback mode first and always restored
    /// afterwards, and the source is closed, whether the stream ends, a frame
    /// fails to decode, or the terminal write fails.
    pub fn run<S, F>(&self, screen: S, source: &mut F) -> Result<PlaybackStats, AppError>
    where
        S: Screen,
        F: FrameSource + ?Sized,
    {
        let delay = target_delay(self.params.frame_delay, source.fps());
        log::debug!("Playback frame delay: {:?}", delay);

        let mut guard = ScreenGuard::enter(screen);
        let result = self.drain(guard.screen(), source, delay);

        // Leave the screen first: closing a decoder can block
        guard.release();
        source.close();

        if let Ok(stats) = &result {
            log::info!(
                "Playback finished: {} frames, {} skipped",
                stats.frames,
                stats.skipped
            );
        }
        result
    }

    fn drain<S, F>(&self, screen: &mut S, source: &mut F, delay: Duration) -> Result<PlaybackStats, AppError>
    where
        S: Screen,
        F: FrameSource + ?Sized,
    {
        let mut stats = PlaybackStats::default();
        let mut redraw = Redraw::new();
        let mut last_presented: Option<Instant> = None;
        let mut index: u64 = 0;

        loop {
            if self.stop.load(Ordering::SeqCst) {
                log::info!("Playback interrupted");
                stats.interrupted = true;
                break;
            }

            let next = match source.next_frame() {
                Ok(next) => next,
                // The decoder saw the same signal and quit mid-frame
                Err(e) if self.stop.load(Ordering::SeqCst) => {
                    log::debug!("Decoder stopped after interrupt: {}", e);
                    log::info!("Playback interrupted");
                    stats.interrupted = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            let Some(buffer) = next else {
                break;
            };
            index += 1;

            let frame = match convert_with_size(buffer, self.params, self.fit()) {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Skipping frame {}: {}", index, e);
                    stats.skipped += 1;
                    continue;
                }
            };

            let remaining = last_presented
                .map(|previous| delay.saturating_sub(previous.elapsed()))
                .unwrap_or(Duration::ZERO);
            if screen.wait(remaining).map_err(OutputError::Terminal)? {
                log::info!("Playback stopped by user");
                stats.interrupted = true;
                break;
            }

            redraw
                .present(screen, &frame)
                .map_err(OutputError::Terminal)?;
            last_presented = Some(Instant::now());
            stats.frames += 1;
        }

        Ok(stats)
    }

    fn fit(&self) -> Option<TerminalSize> {
        if !self.params.auto_fit {
            return None;
        }
        Some(
            self.fit_size
                .unwrap_or_else(|| fit_target(terminal::query_size())),
        )
    }
}
