use std::path::{Path, PathBuf};

use cnpj_scan_core::{AnalysisReport, DirectoryStats, ImpactFinding};
use futures_util::StreamExt;
use scan_logging::{scan_debug, scan_info};
use serde::Deserialize;
use url::Url;

use crate::persist::AtomicFileWriter;
use crate::retry::{retry_with_backoff, StatusSink};
use crate::{ClientError, ClientSettings, FailureKind};

const DIRECTORY_FIELD: &str = "directory";

/// The analysis server's HTTP contract.
#[async_trait::async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Single attempt at `/pre-analyze`.
    async fn pre_analyze(&self, directory: &str) -> Result<DirectoryStats, ClientError>;

    /// `/analyze` through the retry policy; retries are reported to `sink`.
    async fn analyze(
        &self,
        directory: &str,
        sink: &dyn StatusSink,
    ) -> Result<AnalysisReport, ClientError>;

    /// Saves `/download/{excel_file}` into `dest_dir`, returning the file path.
    async fn download_report(
        &self,
        excel_file: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    data: Vec<ImpactFinding>,
    #[serde(default)]
    excel_file: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestAnalysisClient {
    settings: ClientSettings,
    base: Url,
    http: reqwest::Client,
}

impl ReqwestAnalysisClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let mut base = Url::parse(&settings.base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            http,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    /// POSTs the directory form and returns the body of a 2xx response.
    async fn post_directory(&self, url: Url, directory: &str) -> Result<Vec<u8>, ClientError> {
        let response = self
            .http
            .post(url)
            .form(&[(DIRECTORY_FIELD, directory)])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl AnalysisClient for ReqwestAnalysisClient {
    async fn pre_analyze(&self, directory: &str) -> Result<DirectoryStats, ClientError> {
        let url = self.endpoint("pre-analyze")?;
        scan_info!("Pre-analysis of {} via {}", directory, url);
        let body = self.post_directory(url, directory).await?;
        if let Ok(ErrorBody { error }) = serde_json::from_slice::<ErrorBody>(&body) {
            return Err(ClientError::new(FailureKind::Application, error));
        }
        serde_json::from_slice(&body)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }

    async fn analyze(
        &self,
        directory: &str,
        sink: &dyn StatusSink,
    ) -> Result<AnalysisReport, ClientError> {
        let url = self.endpoint("analyze")?;
        scan_info!("Analysis of {} via {}", directory, url);
        let body = retry_with_backoff(&self.settings.retry, sink, |attempt| {
            scan_debug!("POST {} attempt {}", url, attempt);
            self.post_directory(url.clone(), directory)
        })
        .await?;

        let parsed: AnalyzeBody = serde_json::from_slice(&body)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?;
        if let Some(error) = parsed.error {
            return Err(ClientError::new(FailureKind::Application, error));
        }
        scan_info!("Analysis returned {} findings", parsed.data.len());
        Ok(AnalysisReport {
            findings: parsed.data,
            excel_file: parsed.excel_file,
        })
    }

    async fn download_report(
        &self,
        excel_file: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, ClientError> {
        let filename = Path::new(excel_file)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| *name == excel_file)
            .ok_or_else(|| {
                ClientError::new(
                    FailureKind::InvalidUrl,
                    format!("invalid report name {excel_file:?}"),
                )
            })?;

        let mut url = self.endpoint("download/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::new(FailureKind::InvalidUrl, "base url cannot have paths"))?
            .pop_if_empty()
            .push(filename);

        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
        let path = writer
            .write(filename, &bytes)
            .map_err(|err| ClientError::new(FailureKind::Io, err.to_string()))?;
        scan_info!("Saved report to {:?} ({} bytes)", path, bytes.len());
        Ok(path)
    }
}

fn status_error(status: reqwest::StatusCode, body: &[u8]) -> ClientError {
    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { error }) => format!("HTTP status {}: {}", status.as_u16(), error),
        Err(_) => format!("HTTP status {}", status.as_u16()),
    };
    ClientError::new(FailureKind::HttpStatus(status.as_u16()), message)
}

fn too_large(max_bytes: u64, actual: u64) -> ClientError {
    ClientError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_connect() {
        return ClientError::new(FailureKind::Connect, err.to_string());
    }
    if err.is_decode() || err.is_body() {
        return ClientError::new(FailureKind::Decode, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
