use std::time::Duration;

use crate::RetryPolicy;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Per request. The full analysis runs an LLM over every file, so this is generous.
    pub request_timeout: Duration,
    pub max_download_bytes: u64,
    /// Applied to `/analyze` only; pre-analysis is a single attempt.
    pub retry: RetryPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30 * 60),
            max_download_bytes: 50 * 1024 * 1024,
            retry: RetryPolicy::default(),
        }
    }
}
