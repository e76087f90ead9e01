//! GitHub contents API client for reading the agenda repository.

use agenda_shared::{DirectoryEntry, DocumentSource};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!("agenda-publisher/", env!("CARGO_PKG_VERSION"));

/// Directory listing entry as returned by the contents API
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
}

/// File payload as returned by the contents API
#[derive(Debug, Deserialize)]
struct FileContent {
    content: String,
    encoding: String,
}

/// Read-only client for one repository
pub struct GithubContentsClient {
    http: Client,
    api_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GithubContentsClient {
    pub fn new(
        http: Client,
        api_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token: None,
        }
    }

    /// Authenticate requests, which raises the API rate limit
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self
            .http
            .get(self.contents_url(path))
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, GITHUB_ACCEPT);

        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .get(path)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", path))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("GitHub returned {} for {}: {}", status, path, body.trim());
        }

        response
            .json()
            .await
            .with_context(|| format!("Unexpected response body for {}", path))
    }
}

#[async_trait]
impl DocumentSource for GithubContentsClient {
    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>> {
        let entries: Vec<ContentEntry> = self.fetch(path).await?;
        tracing::debug!("Listed {} entries under {}", entries.len(), path);

        Ok(entries
            .into_iter()
            .map(|entry| DirectoryEntry::new(entry.name))
            .collect())
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let file: FileContent = self.fetch(path).await?;
        decode_content(&file).with_context(|| format!("Failed to decode {}", path))
    }
}

fn decode_content(file: &FileContent) -> Result<Vec<u8>> {
    if file.encoding != "base64" {
        bail!("unsupported content encoding '{}'", file.encoding);
    }

    // The API wraps base64 content at 60 columns
    let compact: String = file
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}
