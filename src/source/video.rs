//! Video decoding through an FFmpeg child process.
//!
//! `ffprobe` reports the stream geometry and frame rate, then `ffmpeg`
//! streams raw `rgb24` frames on its stdout which are read one at a time.

use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::FrameSource;
use crate::buffer::ImageBuffer;
use crate::error::LoadError;
use crate::fetch::InputLocation;

/// How long FFmpeg gets to exit after SIGINT before it is killed.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Stream properties reported by ffprobe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// 0.0 when the container does not declare a rate
    pub fps: f64,
}

impl VideoInfo {
    /// Bytes in one `rgb24` frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Parse ffprobe's `width,height,r_frame_rate` CSV line.
pub fn parse_probe_output(output: &str) -> Option<VideoInfo> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let mut fields = line.trim().split(',');
    let width = fields.next()?.trim().parse().ok()?;
    let height = fields.next()?.trim().parse().ok()?;
    let fps = fields.next().map(parse_frame_rate).unwrap_or(0.0);
    if width == 0 || height == 0 {
        return None;
    }
    Some(VideoInfo { width, height, fps })
}

/// Parse an FFmpeg rate such as `30000/1001` or `25`. Unparsable or
/// degenerate rates give 0.0.
pub fn parse_frame_rate(rate: &str) -> f64 {
    let rate = rate.trim();
    let value = match rate.split_once('/') {
        Some((num, den)) => match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            (Ok(num), Ok(den)) if den != 0.0 => num / den,
            _ => 0.0,
        },
        None => rate.parse().unwrap_or(0.0),
    };
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn input_arg(location: &InputLocation) -> OsString {
    match location {
        InputLocation::Path(path) => path.as_os_str().to_owned(),
        InputLocation::Url(url) => OsString::from(url),
    }
}

fn spawn_error(tool: &'static str, path: &str, e: io::Error) -> LoadError {
    if e.kind() == io::ErrorKind::NotFound {
        LoadError::ToolNotFound { tool }
    } else {
        LoadError::Video {
            path: path.to_string(),
            reason: format!("failed to spawn {}: {}", tool, e),
        }
    }
}

/// Query the first video stream of an input.
pub fn probe(location: &InputLocation) -> Result<VideoInfo, LoadError> {
    let path = location.to_string();
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "csv=p=0",
        ])
        .arg(input_arg(location))
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error("ffprobe", &path, e))?;

    if !output.status.success() {
        return Err(LoadError::Video {
            path,
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&stdout).ok_or_else(|| LoadError::Video {
        path,
        reason: "no video stream found".to_string(),
    })
}

/// A running FFmpeg decoder.
pub struct VideoSource {
    path: String,
    info: VideoInfo,
    child: Child,
    stdout: Option<ChildStdout>,
    /// Handle for the stderr reader thread
    stderr_thread: Option<JoinHandle<Vec<String>>>,
    frames_read: u64,
}

impl VideoSource {
    /// Probe the input and start decoding it.
    pub fn spawn(location: &InputLocation) -> Result<Self, LoadError> {
        let info = probe(location)?;
        let path = location.to_string();

        let mut command = Command::new("ffmpeg");
        command
            .args(["-loglevel", "error", "-nostdin", "-i"])
            .arg(input_arg(location))
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group: a Ctrl+C at the terminal reaches only us, and
        // shutdown() decides how FFmpeg stops
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| spawn_error("ffmpeg", &path, e))?;

        // Spawn a thread to read stderr
        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let reader = BufReader::new(stderr);
                let mut lines = Vec::new();
                for line in reader.lines() {
                    match line {
                        Ok(l) => {
                            log::debug!("[ffmpeg] {}", l);
                            lines.push(l);
                        }
                        Err(_) => break,
                    }
                }
                lines
            })
        });

        log::info!(
            "Decoding {} ({}x{} @ {:.2} fps)",
            path,
            info.width,
            info.height,
            info.fps
        );

        Ok(Self {
            path,
            info,
            stdout: child.stdout.take(),
            child,
            stderr_thread,
            frames_read: 0,
        })
    }

    /// Collected stderr output, once the process has finished.
    fn take_stderr_output(&mut self) -> Vec<String> {
        self.stderr_thread
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default()
    }

    /// The stream ended: report a decoder failure, or `None` on a clean exit.
    fn finish(&mut self) -> Result<Option<ImageBuffer>, LoadError> {
        self.stdout = None;
        let status = self.child.wait().map_err(|e| LoadError::Video {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        let stderr = self.take_stderr_output();

        if status.success() {
            log::debug!("{}: {} frames decoded", self.path, self.frames_read);
            return Ok(None);
        }

        let reason = match stderr.last() {
            Some(line) => line.clone(),
            None => format!("ffmpeg exited with {}", status),
        };
        Err(LoadError::Video {
            path: self.path.clone(),
            reason,
        })
    }

    /// Ask FFmpeg to stop, killing it if it does not exit in time.
    fn shutdown(&mut self) {
        if !matches!(self.child.try_wait(), Ok(None)) {
            return;
        }

        // Send SIGINT (equivalent to Ctrl+C) to FFmpeg
        #[cfg(unix)]
        {
            unsafe {
                let pid = self.child.id() as i32;
                libc::kill(pid, libc::SIGINT);
            }
        }

        #[cfg(not(unix))]
        {
            let _ = self.child.kill();
        }

        let start = Instant::now();
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if start.elapsed() > SHUTDOWN_TIMEOUT => {
                    log::warn!("ffmpeg did not exit after SIGINT, killing it");
                    let _ = self.child.kill();
                    let _ = self.child.wait();
                    break;
                }
                Ok(None) => thread::sleep(Duration::from_millis(50)),
                Err(e) => {
                    log::warn!("Failed to wait for ffmpeg: {}", e);
                    break;
                }
            }
        }
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Result<Option<ImageBuffer>, LoadError> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut data = vec![0u8; self.info.frame_len()];
        match stdout.read_exact(&mut data) {
            Ok(()) => {
                self.frames_read += 1;
                Ok(Some(ImageBuffer {
                    width: self.info.width,
                    height: self.info.height,
                    channels: 3,
                    data,
                }))
            }
            // A trailing partial frame is dropped with the rest of the stream
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => self.finish(),
            Err(e) => Err(LoadError::Video {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn fps(&self) -> f64 {
        self.info.fps
    }

    fn close(&mut self) {
        // Closing the pipe first unblocks an FFmpeg stuck writing a frame
        self.stdout = None;
        self.shutdown();
        let _ = self.take_stderr_output();
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        self.close();
    }
}
