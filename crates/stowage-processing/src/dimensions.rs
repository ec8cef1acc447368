//! Image dimension probing.

use image::ImageReader;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Render dimensions the way they are stored on a file record.
pub fn format_dimensions(width: u32, height: u32) -> String {
    format!("{}x{}", width, height)
}

/// Read width and height from an encoded image without decoding pixel data.
pub fn dimensions_from_bytes(data: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Same as [`dimensions_from_bytes`] for a file on disk.
pub fn dimensions_from_path(path: &Path) -> Option<(u32, u32)> {
    ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Input for [`probe_dimensions`].
#[derive(Clone, Debug)]
pub enum ImageInput {
    Bytes(bytes::Bytes),
    Path(PathBuf),
}

/// Probe dimensions off the async runtime. Returns `"WxH"`, or `None` when the
/// content is not a readable image.
pub async fn probe_dimensions(input: ImageInput) -> Option<String> {
    // header parsing is blocking I/O for paths and CPU work for bytes
    let probed = tokio::task::spawn_blocking(move || match input {
        ImageInput::Bytes(data) => dimensions_from_bytes(&data),
        ImageInput::Path(path) => dimensions_from_path(&path),
    })
    .await;

    match probed {
        Ok(Some((width, height))) => Some(format_dimensions(width, height)),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Image dimension probe task failed");
            None
        }
    }
}
