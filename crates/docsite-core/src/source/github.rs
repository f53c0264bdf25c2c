use crate::config::SourceConfig;
use crate::source::DocumentSource;
use crate::{Branch, Error, Result, TreeEntry};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Document source backed by the GitHub contents API and raw file host.
pub struct GitHubSource {
    client: Client,
    owner: String,
    repo: String,
    docs_path: String,
    api_base: String,
    raw_base: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

impl GitHubSource {
    /// Creates a source for `owner/repo` rooted at `docs_path` with the
    /// public GitHub endpoints and a 30s timeout.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        docs_path: impl Into<String>,
    ) -> Result<Self> {
        let defaults = SourceConfig::default();
        Ok(Self {
            client: build_client(Duration::from_secs(defaults.timeout_secs))?,
            owner: owner.into(),
            repo: repo.into(),
            docs_path: docs_path.into(),
            api_base: defaults.api_base,
            raw_base: defaults.raw_base,
            token: None,
        })
    }

    /// Creates a source from configuration, reading the token from the
    /// environment variable named by `token_env`.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        Ok(Self {
            client: build_client(Duration::from_secs(config.timeout_secs))?,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            docs_path: config.docs_path.clone(),
            api_base: config.api_base.clone(),
            raw_base: config.raw_base.clone(),
            token,
        })
    }

    /// Overrides the contents API base URL (primarily for tests).
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Overrides the raw content base URL (primarily for tests).
    #[must_use]
    pub fn with_raw_base(mut self, base: impl Into<String>) -> Self {
        self.raw_base = base.into();
        self
    }

    /// Sends `Authorization: Bearer <token>` with API requests.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(base)
            .map_err(|e| Error::Config(format!("Invalid base URL '{base}': {e}")))?;
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("Base URL '{base}' cannot be a base")))?
            .pop_if_empty()
            .extend(segments.iter().flat_map(|s| s.split('/')).filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn contents_url(&self, path: &str, branch: &Branch) -> Result<Url> {
        let mut url = Self::endpoint(
            &self.api_base,
            &["repos", &self.owner, &self.repo, "contents", path],
        )?;
        url.query_pairs_mut().append_pair("ref", branch.name());
        Ok(url)
    }

    fn raw_url(&self, path: &str, branch: &Branch) -> Result<Url> {
        Self::endpoint(
            &self.raw_base,
            &[&self.owner, &self.repo, branch.name(), path],
        )
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("docsite/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(Error::Network)
}

fn unavailable(url: &Url, err: &reqwest::Error) -> Error {
    Error::SourceUnavailable(format!("request to {url} failed: {err}"))
}

#[async_trait]
impl DocumentSource for GitHubSource {
    fn root_path(&self) -> &str {
        &self.docs_path
    }

    async fn list_dir(&self, path: &str, branch: &Branch) -> Result<Vec<TreeEntry>> {
        let url = self.contents_url(path, branch)?;
        debug!(%url, "listing directory");

        let mut request = self.client.get(url.clone()).header(ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|e| unavailable(&url, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::SourceUnavailable(format!(
                "GitHub API error: {} for {path}",
                status.as_u16()
            )));
        }

        let body = response.text().await.map_err(|e| unavailable(&url, &e))?;
        // A body that is not a listing means the API is not answering usefully.
        let items: Vec<ContentItem> = serde_json::from_str(&body).map_err(|e| {
            Error::SourceUnavailable(format!("Unexpected contents listing for {path}: {e}"))
        })?;

        Ok(items
            .into_iter()
            .filter(|item| item.kind == "dir" || item.kind == "file")
            .map(|item| TreeEntry {
                is_dir: item.kind == "dir",
                name: item.name,
                path: item.path,
            })
            .collect())
    }

    async fn fetch_raw(&self, path: &str, branch: &Branch) -> Result<String> {
        let url = self.raw_url(path, branch)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| unavailable(&url, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::SourceUnavailable(format!(
                "Failed to fetch {path}: {}",
                status.as_u16()
            )));
        }

        let content = response.text().await.map_err(|e| unavailable(&url, &e))?;
        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}
