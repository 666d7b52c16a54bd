use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::api::ApiError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Config {
    /// Server origin, with or without the trailing `/api`.
    pub api_url: Url,
    /// Local store location; `None` means the platform data directory.
    pub db_path: Option<PathBuf>,
    pub poll_interval: Duration,
}

impl Config {
    pub fn new(api_url: &str) -> Result<Self, ApiError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| ApiError::Config(format!("invalid API url '{}': {}", api_url, e)))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "API url must be http or https, got '{}'",
                api_url.scheme()
            )));
        }
        Ok(Self {
            api_url,
            db_path: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        self.db_path = path;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Base every endpoint path is appended to, always ending in `/api`.
    pub fn api_root(&self) -> String {
        let base = self.api_url.as_str().trim_end_matches('/');
        if base.ends_with("/api") {
            base.to_string()
        } else {
            format!("{}/api", base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_appends_api_once() {
        assert_eq!(
            Config::new("https://example.com").unwrap().api_root(),
            "https://example.com/api"
        );
        assert_eq!(
            Config::new("https://example.com/api/").unwrap().api_root(),
            "https://example.com/api"
        );
        assert_eq!(
            Config::new("http://10.0.2.2:8000/v2").unwrap().api_root(),
            "http://10.0.2.2:8000/v2/api"
        );
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(Config::new("not a url"), Err(ApiError::Config(_))));
        assert!(matches!(Config::new("ftp://example.com"), Err(ApiError::Config(_))));
    }
}
