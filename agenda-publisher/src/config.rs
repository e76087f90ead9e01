use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use agenda_shared::SourceRepo;

/// Where the template is read from and the page is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Azure Blob Storage, authorized with a SAS token
    Azure {
        account_url: String,
        sas_token: String,
        container: String,
    },
    /// A directory on local disk, one subdirectory per container
    Local { root: PathBuf, container: String },
}

#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub repo: SourceRepo,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub storage: StorageConfig,
    pub publish_interval: Duration,
}

impl PublisherConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let repo = SourceRepo::new(
            var_or("AGENDA_REPO_OWNER", "tc39"),
            var_or("AGENDA_REPO_NAME", "agendas"),
            var_or("AGENDA_REPO_BRANCH", "master"),
        );

        let container = var_or("STORAGE_CONTAINER", "site");
        let storage = match lookup("STORAGE_DIR").filter(|v| !v.is_empty()) {
            Some(dir) => StorageConfig::Local {
                root: PathBuf::from(dir),
                container,
            },
            None => StorageConfig::Azure {
                account_url: lookup("AZURE_STORAGE_ACCOUNT_URL")
                    .context("AZURE_STORAGE_ACCOUNT_URL must be set (or STORAGE_DIR)")?,
                sas_token: lookup("AZURE_STORAGE_SAS_TOKEN")
                    .context("AZURE_STORAGE_SAS_TOKEN must be set (or STORAGE_DIR)")?,
                container,
            },
        };

        let interval_secs: u64 = var_or("PUBLISH_INTERVAL_SECS", "3600")
            .parse()
            .context("PUBLISH_INTERVAL_SECS must be a valid number")?;
        if interval_secs == 0 {
            anyhow::bail!("PUBLISH_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            repo,
            github_api_url: var_or("GITHUB_API_URL", "https://api.github.com"),
            github_token: lookup("GITHUB_TOKEN").filter(|v| !v.is_empty()),
            storage,
            publish_interval: Duration::from_secs(interval_secs),
        })
    }
}
