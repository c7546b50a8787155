use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use scan_logging::{scan_debug, scan_warn};
use thiserror::Error;
use walkdir::WalkDir;

/// Rough method declaration: an access modifier, a return type, a name and an
/// opening parenthesis.
static METHOD_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(public|private|protected)\s+\w+\s+\w+\s*\(")
        .unwrap_or_else(|err| panic!("invalid method pattern: {err}"))
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalEstimate {
    pub files: u64,
    pub lines: u64,
    pub methods: u64,
}

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Counts files, lines and method-looking declarations under `root` without
/// contacting the server. Unreadable or non-UTF-8 files are skipped.
pub fn estimate_directory(root: &Path) -> Result<LocalEstimate, EstimateError> {
    if !root.is_dir() {
        return Err(EstimateError::NotADirectory(root.to_path_buf()));
    }

    let mut estimate = LocalEstimate::default();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                scan_warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let content = match fs::read_to_string(entry.path()) {
            Ok(content) => content,
            Err(err) => {
                scan_debug!("skipping {:?}: {}", entry.path(), err);
                continue;
            }
        };
        estimate.files += 1;
        estimate.lines += content.matches('\n').count() as u64 + 1;
        estimate.methods += METHOD_DECLARATION.find_iter(&content).count() as u64;
    }
    Ok(estimate)
}
