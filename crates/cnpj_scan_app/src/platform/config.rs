//! Settings resolution: built-in defaults, then `.cnpj_scan.ron`, then the
//! `CNPJ_SCAN_SERVER` environment variable, then command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cnpj_scan_core::simulator::SimulatorConfig;
use cnpj_scan_engine::ClientSettings;
use scan_logging::scan_info;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILENAME: &str = ".cnpj_scan.ron";
pub const SERVER_ENV: &str = "CNPJ_SCAN_SERVER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Optional overrides read from the config file. Missing fields keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_download_bytes: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_base_delay_ms: Option<u64>,
    pub tick_interval_ms: Option<u64>,
    pub simulation_duration_ms: Option<u64>,
    pub fallback_total: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub simulator: SimulatorConfig,
}

/// Reads `{dir}/.cnpj_scan.ron`; a missing file yields no overrides.
pub fn load_file_config(dir: &Path) -> Result<FileConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    let parsed = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    scan_info!("Loaded settings from {:?}", path);
    Ok(parsed)
}

pub fn resolve(
    file: FileConfig,
    env_server: Option<String>,
    cli_server: Option<String>,
) -> AppConfig {
    let mut config = AppConfig::default();
    let client = &mut config.client;
    let simulator = &mut config.simulator;

    if let Some(url) = file.server_url {
        client.base_url = url;
    }
    if let Some(secs) = file.connect_timeout_secs {
        client.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.request_timeout_secs {
        client.request_timeout = Duration::from_secs(secs);
    }
    if let Some(bytes) = file.max_download_bytes {
        client.max_download_bytes = bytes;
    }
    if let Some(attempts) = file.retry_attempts {
        client.retry.max_attempts = attempts;
    }
    if let Some(ms) = file.retry_base_delay_ms {
        client.retry.base_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = file.tick_interval_ms {
        simulator.tick_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = file.simulation_duration_ms {
        simulator.target_duration = Duration::from_millis(ms);
    }
    if let Some(total) = file.fallback_total {
        simulator.fallback_total = total;
    }

    let non_blank = |url: &String| !url.trim().is_empty();
    if let Some(url) = cli_server.filter(non_blank).or(env_server.filter(non_blank)) {
        client.base_url = url;
    }
    config
}

/// Full resolution against the working directory and the process environment.
pub fn load(dir: &Path, cli_server: Option<String>) -> Result<AppConfig, ConfigError> {
    let file = load_file_config(dir)?;
    let env_server = std::env::var(SERVER_ENV).ok();
    Ok(resolve(file, env_server, cli_server))
}
