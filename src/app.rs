//! Run modes: still image, animation playback, animation export.

use std::path::Path;

use crate::buffer;
use crate::convert::convert;
use crate::error::AppError;
use crate::fetch::{InputKind, InputLocation};
use crate::output::{self, FrameFile};
use crate::params::RenderParams;
use crate::playback::{self, Playback};
use crate::source::{self, FrameSource};
use crate::terminal::AnsiScreen;

/// Render the configured input.
///
/// Still images produce one frame on stdout or in the output file. GIFs and
/// videos play in the terminal, or are exported frame by frame when an output
/// file is set.
pub fn run(params: &RenderParams) -> Result<(), AppError> {
    params.validate()?;

    let location = InputLocation::parse(&params.input);
    let kind = location.kind();
    log::debug!("Input {} is {:?}", location, kind);

    match kind {
        InputKind::Still => {
            let buffer = buffer::decode(&location)?;
            let frame = convert(buffer, params)?;
            output::write_text(&frame.to_ansi_string(), params.output.as_deref())?;
        }
        InputKind::Gif | InputKind::Video => {
            let mut source = source::open(&location)?;
            match params.output.as_deref() {
                Some(path) => {
                    export(&mut source, params, path)?;
                }
                None => {
                    let stats = Playback::new(params).run(AnsiScreen::stdout(), &mut source)?;
                    if stats.skipped > 0 {
                        log::warn!("{} frames could not be rendered", stats.skipped);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Render every frame of `source` into a text file, without pacing.
///
/// Frames that fail to resize are skipped. Ctrl+C or a termination signal
/// ends the export early, keeping the frames written so far. Returns the
/// number written.
pub fn export<F>(source: &mut F, params: &RenderParams, path: &Path) -> Result<u64, AppError>
where
    F: FrameSource + ?Sized,
{
    let mut file = FrameFile::create(path)?;
    let result = write_frames(source, params, &mut file);
    source.close();
    result?;
    Ok(file.finish()?)
}

fn write_frames<F>(source: &mut F, params: &RenderParams, file: &mut FrameFile) -> Result<(), AppError>
where
    F: FrameSource + ?Sized,
{
    let mut index: u64 = 0;
    loop {
        if playback::interrupted() {
            log::info!("Export interrupted after {} frames", index);
            break;
        }
        let Some(buffer) = source.next_frame()? else {
            break;
        };
        index += 1;
        match convert(buffer, params) {
            Ok(frame) => file.write_frame(&frame.to_ansi_string())?,
            Err(e) => log::warn!("Skipping frame {}: {}", index, e),
        }
    }
    Ok(())
}
