//! GitHub REST API source client

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::FETCH_TIMEOUT_MS;
use crate::source::client::SourceClient;
use crate::source::error::FetchError;
use crate::source::types::{FileEntry, Release, RepoHandle};

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Response from the Git trees API
#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<FileEntry>,
    #[serde(default)]
    truncated: bool,
}

/// Source client backed by the GitHub REST API
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    /// Creates a new GitHubClient against a custom base URL
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| FetchError::Configuration(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("hacs-lifecycle/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client for api.github.com
    pub fn github(token: Option<&str>) -> Result<Self, FetchError> {
        Self::new(
            DEFAULT_BASE_URL,
            token,
            Duration::from_millis(FETCH_TIMEOUT_MS),
        )
    }

    async fn get(&self, url: &str, accept: &'static str) -> Result<Response, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).header(ACCEPT, accept).send().await?;
        Ok(response)
    }
}

/// Map non-success statuses onto fetch errors
fn check_status(response: Response, subject: &str) -> Result<Response, FetchError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(subject.to_string()));
    }

    let exhausted = status == StatusCode::FORBIDDEN
        && response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");

    if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(FetchError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("GitHub API returned status {} for {}", status, subject);
        return Err(FetchError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}

/// Trees are addressed by ref name, without the `tags/` namespace
fn ref_name(git_ref: &str) -> &str {
    git_ref.strip_prefix("tags/").unwrap_or(git_ref)
}

#[async_trait::async_trait]
impl SourceClient for GitHubClient {
    async fn get_repository(&self, full_name: &str) -> Result<RepoHandle, FetchError> {
        let url = format!("{}/repos/{}", self.base_url, full_name);
        let response = check_status(self.get(&url, JSON_MEDIA_TYPE).await?, full_name)?;

        response.json().await.map_err(|e| {
            warn!("Failed to parse repository response for {}: {}", full_name, e);
            FetchError::InvalidResponse(e.to_string())
        })
    }

    async fn get_tree(
        &self,
        full_name: &str,
        git_ref: &str,
    ) -> Result<Vec<FileEntry>, FetchError> {
        let url = format!(
            "{}/repos/{}/git/trees/{}?recursive=1",
            self.base_url,
            full_name,
            ref_name(git_ref)
        );
        let response = check_status(self.get(&url, JSON_MEDIA_TYPE).await?, full_name)?;

        let tree: TreeResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse tree response for {}: {}", full_name, e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        if tree.truncated {
            warn!("Tree listing for {}@{} was truncated", full_name, git_ref);
        }

        Ok(tree.tree)
    }

    async fn get_manifest(
        &self,
        full_name: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Option<String>, FetchError> {
        let url = format!(
            "{}/repos/{}/contents/{}?ref={}",
            self.base_url,
            full_name,
            path,
            ref_name(git_ref)
        );

        match check_status(self.get(&url, RAW_MEDIA_TYPE).await?, path) {
            Ok(response) => Ok(Some(response.text().await?)),
            Err(FetchError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_latest_release(&self, full_name: &str) -> Result<Option<Release>, FetchError> {
        let url = format!("{}/repos/{}/releases/latest", self.base_url, full_name);

        match check_status(self.get(&url, JSON_MEDIA_TYPE).await?, full_name) {
            Ok(response) => response.json().await.map(Some).map_err(|e| {
                warn!("Failed to parse release response for {}: {}", full_name, e);
                FetchError::InvalidResponse(e.to_string())
            }),
            Err(FetchError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
