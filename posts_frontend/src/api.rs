use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{StatusCode, Url};

use crate::config::{FrontendConfig, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_READ_RETRIES};
use crate::error::ApiError;
use crate::models::{CreatePostInput, Post, PostsPage, UpdatePostInput};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    read_retries: u32,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(
            base_url.into(),
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            DEFAULT_READ_RETRIES,
        )
    }

    pub fn from_config(config: &FrontendConfig) -> Result<Self> {
        Self::build(
            config.api_url.clone(),
            config.http_timeout,
            config.read_retries,
        )
    }

    fn build(base_url: String, timeout: Duration, read_retries: u32) -> Result<Self> {
        let base = sanitize_base_url(base_url)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
            read_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    /// Fetches one page of posts, newest id first.
    pub fn list_posts(&self, page: u32, limit: u32) -> Result<PostsPage, ApiError> {
        self.with_read_retry("list posts", || {
            let url = self.url("/posts")?;
            let response = self
                .client
                .get(url)
                .query(&[
                    ("_page", page.to_string()),
                    ("_limit", limit.to_string()),
                    ("_sort", "id".to_string()),
                    ("_order", "desc".to_string()),
                ])
                .send()?;
            let response = check_status(response, None)?;
            let total = parse_total_count(response.headers());
            let posts: Vec<Post> = response.json()?;
            Ok(PostsPage { posts, total })
        })
    }

    pub fn get_post(&self, id: u64) -> Result<Post, ApiError> {
        self.with_read_retry("get post", || {
            let url = self.url(&format!("/posts/{id}"))?;
            let response = self.client.get(url).send()?;
            let response = check_status(response, Some(id))?;
            Ok(response.json()?)
        })
    }

    pub fn create_post(&self, input: &CreatePostInput) -> Result<Post, ApiError> {
        let url = self.url("/posts")?;
        let response = self.client.post(url).json(input).send()?;
        let response = check_status(response, None)?;
        Ok(response.json()?)
    }

    pub fn update_post(&self, input: &UpdatePostInput) -> Result<Post, ApiError> {
        let url = self.url(&format!("/posts/{}", input.id))?;
        let response = self.client.put(url).json(input).send()?;
        let response = check_status(response, Some(input.id))?;
        Ok(response.json()?)
    }

    pub fn delete_post(&self, id: u64) -> Result<(), ApiError> {
        let url = self.url(&format!("/posts/{id}"))?;
        let response = self.client.delete(url).send()?;
        check_status(response, Some(id))?;
        Ok(())
    }

    fn with_read_retry<T>(
        &self,
        operation: &str,
        mut call: impl FnMut() -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut attempt = 0;
        loop {
            match call() {
                Err(err) if err.is_retryable() && attempt < self.read_retries => {
                    attempt += 1;
                    warn!(
                        "{operation} failed ({err}), retrying ({attempt}/{})",
                        self.read_retries
                    );
                }
                other => return other,
            }
        }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("request url {raw}");
        Url::parse(&raw).map_err(|err| ApiError::Unknown(format!("invalid URL {raw}: {err}")))
    }
}

fn check_status(response: Response, id: Option<u64>) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(ApiError::NotFound {
                resource: "post",
                id,
            });
        }
    }
    let body = response.text().unwrap_or_default();
    Err(ApiError::from_status(status, body))
}

/// Reads the collection size from the list response; anything unusable is 0.
pub fn parse_total_count(headers: &HeaderMap) -> u64 {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}
