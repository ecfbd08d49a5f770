use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_READ_RETRIES: u32 = 1;
pub const DEFAULT_STALE_SECS: u64 = 5 * 60;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    pub api_url: String,
    pub page_size: u32,
    /// Extra attempts for list/get before the failure reaches the page.
    pub read_retries: u32,
    /// How long a successful read is served from cache without refetching.
    pub stale_time: Duration,
    pub http_timeout: Duration,
    /// Overrides the location of the persisted client storage file.
    pub storage_path: Option<PathBuf>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            read_retries: DEFAULT_READ_RETRIES,
            stale_time: Duration::from_secs(DEFAULT_STALE_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            storage_path: None,
        }
    }
}

impl FrontendConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Values that are
    /// missing, blank or unparseable fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key).and_then(|raw| {
                let trimmed = raw.trim().to_string();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed)
                }
            })
        };

        let api_url = read("POSTS_API_URL").unwrap_or(defaults.api_url);
        let page_size = read("POSTS_PAGE_SIZE")
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(defaults.page_size);
        let read_retries = read("POSTS_READ_RETRIES")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(defaults.read_retries);
        let stale_time = read("POSTS_STALE_SECS")
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.stale_time);
        let http_timeout = read("POSTS_HTTP_TIMEOUT_SECS")
            .and_then(|raw| raw.parse().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);
        let storage_path = read("POSTS_STORAGE_PATH").map(PathBuf::from);

        Self {
            api_url,
            page_size,
            read_retries,
            stale_time,
            http_timeout,
            storage_path,
        }
    }
}
