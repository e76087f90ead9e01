use agenda_shared::ObjectStore;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};

const BLOB_TYPE_HEADER: &str = "x-ms-blob-type";
const BLOCK_BLOB: &str = "BlockBlob";

/// A single Azure Blob Storage container, accessed through a SAS token.
pub struct AzureBlobStore {
    http: Client,
    account_url: String,
    container: String,
    sas_token: String,
}

impl AzureBlobStore {
    pub fn new(
        http: Client,
        account_url: impl Into<String>,
        container: impl Into<String>,
        sas_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            account_url: account_url.into().trim_end_matches('/').to_string(),
            container: container.into(),
            sas_token: sas_token.into().trim_start_matches('?').to_string(),
        }
    }

    fn blob_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}?{}",
            self.account_url, self.container, key, self.sas_token
        )
    }

    async fn check(&self, response: Response, action: &str, key: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        bail!(
            "Blob storage returned {} when {} {}/{}: {}",
            status,
            action,
            self.container,
            key,
            body.trim()
        );
    }
}

#[async_trait]
impl ObjectStore for AzureBlobStore {
    async fn read_text(&self, key: &str) -> Result<String> {
        let response = self
            .http
            .get(self.blob_url(key))
            .send()
            .await
            .with_context(|| format!("Failed to request blob {}", key))?;

        self.check(response, "reading", key)
            .await?
            .text()
            .await
            .with_context(|| format!("Failed to read blob body {}", key))
    }

    async fn write_text(&self, key: &str, content: &str, content_type: &str) -> Result<()> {
        let response = self
            .http
            .put(self.blob_url(key))
            .header(BLOB_TYPE_HEADER, BLOCK_BLOB)
            .header(CONTENT_TYPE, content_type)
            .body(content.to_string())
            .send()
            .await
            .with_context(|| format!("Failed to upload blob {}", key))?;

        self.check(response, "writing", key).await?;
        tracing::debug!("Uploaded {} bytes to {}/{}", content.len(), self.container, key);
        Ok(())
    }
}
