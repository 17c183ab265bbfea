//! Static file serving module
//!
//! Maps request paths onto the asset directory and reads files from disk.

use crate::http::mime;
use crate::logger;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of probing the filesystem for a request path
#[derive(Debug)]
pub enum FileOutcome {
    Found {
        path: PathBuf,
        content: Vec<u8>,
        content_type: &'static str,
    },
    /// Nothing on disk answers this path
    Missing,
    /// The file exists (or might) but could not be read
    Failed(io::Error),
}

/// Join a request path onto the asset root, resolving `.` and `..` segments
///
/// Returns `None` when the path climbs above the root.
pub fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    Some(path)
}

/// Read the file behind `request_path`, making exactly one read attempt
pub async fn probe(root: &Path, request_path: &str) -> FileOutcome {
    let Some(path) = resolve_path(root, request_path) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return FileOutcome::Missing;
    };

    match fs::read(&path).await {
        Ok(content) => {
            let content_type = mime::content_type_for(&path);
            FileOutcome::Found {
                path,
                content,
                content_type,
            }
        }
        // File not found is common (404 or proxy), no need to log it
        Err(e) if e.kind() == io::ErrorKind::NotFound => FileOutcome::Missing,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                path.display(),
                e
            ));
            FileOutcome::Failed(e)
        }
    }
}
