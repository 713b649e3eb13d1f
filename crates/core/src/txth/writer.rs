//! Reading and writing descriptor files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::loop_window::LoopWindow;
use crate::staging::{sidecar_path, StagedFile};
use crate::wave::ContainerHeader;

use super::error::TxthError;
use super::types::{split_line, TxthDescriptor, KEY_LOOP_END, KEY_LOOP_START};

/// File extension of descriptors.
pub const DESCRIPTOR_EXTENSION: &str = "txth";

/// Descriptor path for an output stream (`song.raw` -> `song.raw.txth`).
pub fn descriptor_path(output: &Path) -> PathBuf {
    sidecar_path(output, DESCRIPTOR_EXTENSION)
}

/// Writes `descriptor` to the staging path of `path` without replacing it yet.
pub async fn stage_descriptor(
    path: &Path,
    descriptor: &TxthDescriptor,
) -> Result<StagedFile, TxthError> {
    StagedFile::write(path, descriptor.render().as_bytes())
        .await
        .map_err(|e| TxthError::io(path, e))
}

/// Writes a complete descriptor for an encoded stream.
pub async fn write_descriptor(
    path: &Path,
    encoded: &ContainerHeader,
    total_samples: u64,
    window: LoopWindow,
) -> Result<TxthDescriptor, TxthError> {
    let descriptor = TxthDescriptor::from_header(encoded, total_samples, window);
    let staged = stage_descriptor(path, &descriptor).await?;
    staged.commit().await.map_err(|e| TxthError::io(path, e))?;
    info!("Created txth file {:?}", path);
    Ok(descriptor)
}

/// Reads and parses an existing descriptor.
pub async fn read_descriptor(path: &Path) -> Result<TxthDescriptor, TxthError> {
    let text = read_text(path).await?;
    TxthDescriptor::parse(&text)
}

/// Rewrites only the loop lines of an existing descriptor.
///
/// Every other line keeps its text and position. A loop key missing from the
/// file is appended so the result is always a complete descriptor; other
/// missing keys abort the update and leave the file as it was.
pub async fn update_loop_points(path: &Path, window: LoopWindow) -> Result<(), TxthError> {
    let original = read_text(path).await?;
    let updated = replace_loop_lines(&original, window);

    TxthDescriptor::parse(&updated)?;

    let staged = StagedFile::write(path, updated.as_bytes())
        .await
        .map_err(|e| TxthError::io(path, e))?;
    staged.commit().await.map_err(|e| TxthError::io(path, e))?;

    info!(
        "Updated loop points in {:?}: {} - {}",
        path, window.start_sample, window.end_sample
    );
    Ok(())
}

async fn read_text(path: &Path) -> Result<String, TxthError> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(TxthError::Missing {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(TxthError::io(path, e)),
    }
}

fn replace_loop_lines(original: &str, window: LoopWindow) -> String {
    let start_line = format!("{} = {}", KEY_LOOP_START, window.start_sample);
    let end_line = format!("{} = {}", KEY_LOOP_END, window.end_sample);
    let mut saw_start = false;
    let mut saw_end = false;
    let mut out = String::with_capacity(original.len() + 32);

    for line in original.lines() {
        match split_line(line).map(|(key, _)| key) {
            Some(KEY_LOOP_START) => {
                out.push_str(&start_line);
                saw_start = true;
            }
            Some(KEY_LOOP_END) => {
                out.push_str(&end_line);
                saw_end = true;
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }

    if !saw_start {
        out.push_str(&start_line);
        out.push('\n');
    }
    if !saw_end {
        out.push_str(&end_line);
        out.push('\n');
    }
    out
}
