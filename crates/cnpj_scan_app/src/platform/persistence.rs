use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use cnpj_scan_engine::AtomicFileWriter;
use scan_logging::{scan_error, scan_info, scan_warn};
use serde::{Deserialize, Serialize};

pub const STATE_FILENAME: &str = ".cnpj_scan_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    last_directory: Option<String>,
    /// RFC 3339 time of the last save.
    #[serde(default)]
    saved_at: Option<String>,
}

/// The directory analysed last time, if one was saved under `state_dir`.
pub fn load_last_directory(state_dir: &Path) -> Option<String> {
    let path = state_dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            scan_warn!("Failed to read persisted state from {:?}: {}", path, err);
            return None;
        }
    };

    match ron::from_str::<PersistedState>(&content) {
        Ok(state) => state.last_directory.filter(|dir| !dir.trim().is_empty()),
        Err(err) => {
            scan_warn!("Failed to parse persisted state from {:?}: {}", path, err);
            None
        }
    }
}

pub fn save_last_directory(state_dir: &Path, directory: &str) {
    let state = PersistedState {
        last_directory: Some(directory.to_string()),
        saved_at: Some(Utc::now().to_rfc3339()),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&state, pretty) {
        Ok(text) => text,
        Err(err) => {
            scan_error!("Failed to serialize persisted state: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(state_dir));
    match writer.write(STATE_FILENAME, &content) {
        Ok(path) => scan_info!("Remembered last directory in {:?}", path),
        Err(err) => scan_error!(
            "Failed to write persisted state to {:?}: {}",
            state_dir,
            err
        ),
    }
}
