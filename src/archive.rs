use crate::errors::{AppError, AppResult};
use polars::prelude::*;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Extracts the first CSV member from a ZIP archive held in memory.
///
/// The bulk-download service packs exactly one CSV of award records per
/// archive; the first member whose name contains `.csv` is taken.
///
/// # Errors
///
/// Returns `ArchiveError` if the bytes are not a readable ZIP archive or
/// no member name contains `.csv`.
pub fn extract_csv(bytes: &[u8]) -> AppResult<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::ArchiveError(format!("Failed to read ZIP archive: {e}")))?;

    for i in 0..archive.len() {
        let mut member = archive.by_index(i).map_err(|e| {
            AppError::ArchiveError(format!("Failed to read member {i} from ZIP archive: {e}"))
        })?;
        let name = member.name().to_string();
        if !name.contains(".csv") {
            continue;
        }

        debug!(member = %name, "Extracting CSV member");
        let mut contents = Vec::with_capacity(member.size() as usize);
        member.read_to_end(&mut contents).map_err(|e| {
            AppError::ArchiveError(format!("Failed to extract {name} from ZIP archive: {e}"))
        })?;
        return Ok((name, contents));
    }

    warn!(members = archive.len(), "Archive contains no CSV member");
    Err(AppError::ArchiveError(format!(
        "Archive contains no CSV member ({} member(s) present)",
        archive.len()
    )))
}

/// Parses a downloaded award archive into a DataFrame.
///
/// Schema inference runs over the whole file rather than a leading sample,
/// so wide numeric columns that switch type late in the file do not fail
/// the parse.
///
/// # Errors
///
/// Returns `ArchiveError` if no CSV member exists or the CSV cannot be
/// parsed. Callers can therefore tell a bad archive apart from the network
/// failures reported as `NetworkError` by the download step.
pub fn dataframe_from_archive(bytes: &[u8]) -> AppResult<DataFrame> {
    let (name, csv) = extract_csv(bytes)?;

    let df = CsvReadOptions::default()
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(csv))
        .finish()
        .map_err(|e| AppError::ArchiveError(format!("Failed to parse CSV member {name}: {e}")))?;

    debug!(rows = df.height(), columns = df.width(), "Parsed award table");
    Ok(df)
}

/// Writes the still-zipped archive bytes verbatim to the destination path.
///
/// The file is written to a temporary `.part` sibling and renamed when
/// complete, so a crash mid-write never leaves a truncated archive at the
/// destination.
pub async fn save_archive(bytes: &[u8], destination: &Path) -> AppResult<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::IoError(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let tmp_path = destination.with_extension("part");
    let mut file = fs::File::create(&tmp_path).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to create temp file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;
    file.write_all(bytes).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to write to temp file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;
    file.flush().await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to flush temp file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;

    // Ensure the file is closed before renaming
    drop(file);

    fs::rename(&tmp_path, destination).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to rename temp file {} to {}: {}",
            tmp_path.display(),
            destination.display(),
            e
        ))
    })?;

    Ok(())
}
