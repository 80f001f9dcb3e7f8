//! `@path` interpreter: file contents or a one-level directory listing.

use std::io::{self, ErrorKind};
use std::path::Path;

use interlink_protocol::{CommandKind, DirEntry, PathOutput};
use tokio::fs;
use tracing::debug;

use super::strip_sigil;

/// Resolve `@path` relative to the host's working directory.
///
/// Resolution failures come back as [`PathOutput::Error`], never as `Err`.
/// File content is decoded as UTF-8 with replacement; binary files are not
/// special-cased.
pub async fn process_at_command(text: &str) -> PathOutput {
    let target = strip_sigil(text, CommandKind::At).trim();

    match resolve(target).await {
        Ok(output) => output,
        Err(e) => {
            debug!(path = %target, error = %e, "Path reference did not resolve");
            PathOutput::Error {
                path: target.to_string(),
                error: describe_error(target, &e),
            }
        }
    }
}

async fn resolve(target: &str) -> io::Result<PathOutput> {
    let metadata = fs::metadata(target).await?;

    if metadata.is_dir() {
        return Ok(PathOutput::Directory {
            path: target.to_string(),
            files: list_directory(target).await?,
        });
    }

    if !metadata.is_file() {
        return Ok(PathOutput::Error {
            path: target.to_string(),
            error: format!("Not a regular file or directory: {}", target),
        });
    }

    let bytes = fs::read(target).await?;
    Ok(PathOutput::File {
        path: target.to_string(),
        extension: extension_of(target),
        size: bytes.len() as u64,
        content: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Immediate entries of `dir`, sorted by name.
async fn list_directory(dir: &str) -> io::Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        // Follows symlinks; dangling links count as non-directories.
        let is_directory = fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        files.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_directory,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

fn extension_of(target: &str) -> String {
    Path::new(target)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

fn describe_error(target: &str, error: &io::Error) -> String {
    match error.kind() {
        ErrorKind::NotFound => format!("File or directory not found: {}", target),
        ErrorKind::PermissionDenied => format!("Permission denied: {}", target),
        _ => format!("Failed to read {}: {}", target, error),
    }
}
