//! Delivery of rendered text to stdout or a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::OutputError;

/// Write a rendered blob to `path`, or to stdout when no path is given.
///
/// Files are created or truncated.
pub fn write_text(blob: &str, path: Option<&Path>) -> Result<(), OutputError> {
    match path {
        Some(path) => {
            std::fs::write(path, blob).map_err(|source| OutputError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("Wrote {} bytes to {}", blob.len(), path.display());
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(blob.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Sequential frame writer for exporting animations to a file.
///
/// Frames are separated by one empty line.
pub struct FrameFile {
    path: PathBuf,
    writer: BufWriter<File>,
    frames: u64,
}

impl FrameFile {
    pub fn create(path: &Path) -> Result<Self, OutputError> {
        let file = File::create(path).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            frames: 0,
        })
    }

    /// Append one frame blob.
    pub fn write_frame(&mut self, blob: &str) -> Result<(), OutputError> {
        let path = &self.path;
        let write_error = |source| OutputError::Write {
            path: path.clone(),
            source,
        };
        if self.frames > 0 {
            self.writer.write_all(b"\n").map_err(write_error)?;
        }
        self.writer.write_all(blob.as_bytes()).map_err(write_error)?;
        self.frames += 1;
        Ok(())
    }

    /// Flush everything to disk.
    pub fn finish(mut self) -> Result<u64, OutputError> {
        self.writer.flush().map_err(|source| OutputError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Wrote {} frames to {}", self.frames, self.path.display());
        Ok(self.frames)
    }
}
