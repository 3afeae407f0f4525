//! Input locations (local paths or URLs) and remote downloads.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::LoadError;

/// Timeout for downloading a remote input.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Video container extensions handed to FFmpeg.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "webm", "mov", "avi", "m4v", "flv", "wmv", "mpg", "mpeg",
];

/// Where an input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLocation {
    Path(PathBuf),
    Url(String),
}

/// What kind of decoder an input needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Still,
    Gif,
    Video,
}

impl InputLocation {
    /// Interpret a CLI argument: `http://` and `https://` are URLs, anything
    /// else is a filesystem path.
    pub fn parse(input: &str) -> Self {
        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            InputLocation::Url(input.to_string())
        } else {
            InputLocation::Path(PathBuf::from(input))
        }
    }

    /// Lower-cased file extension, ignoring any URL query or fragment.
    pub fn extension(&self) -> Option<String> {
        let name = match self {
            InputLocation::Path(path) => path.to_string_lossy().into_owned(),
            InputLocation::Url(url) => url
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_string(),
        };
        Path::new(&name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Pick the decoder from the extension.
    pub fn kind(&self) -> InputKind {
        match self.extension().as_deref() {
            Some("gif") => InputKind::Gif,
            Some(ext) if VIDEO_EXTENSIONS.contains(&ext) => InputKind::Video,
            _ => InputKind::Still,
        }
    }
}

impl fmt::Display for InputLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputLocation::Path(path) => write!(f, "{}", path.display()),
            InputLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Download a remote input into memory.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let fetch_error = |reason: String| LoadError::Fetch {
        url: url.to_string(),
        reason,
    };

    log::info!("Downloading {}", url);

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| fetch_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(fetch_error(format!(
            "server responded with status {}",
            response.status()
        )));
    }

    let bytes = response.bytes().map_err(|e| fetch_error(e.to_string()))?;
    log::debug!("Downloaded {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}
