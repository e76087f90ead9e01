//! Object store backends for the template and the published page.

mod azure;
mod local;

pub use azure::AzureBlobStore;
pub use local::LocalDirStore;

use agenda_shared::ObjectStore;
use reqwest::Client;
use std::sync::Arc;

use crate::config::StorageConfig;

/// Build the store selected by the configuration
pub fn from_config(config: &StorageConfig, http: Client) -> Arc<dyn ObjectStore> {
    match config {
        StorageConfig::Azure {
            account_url,
            sas_token,
            container,
        } => {
            tracing::info!("Using Azure Blob container '{}' at {}", container, account_url);
            Arc::new(AzureBlobStore::new(
                http,
                account_url.clone(),
                container.clone(),
                sas_token.clone(),
            ))
        }
        StorageConfig::Local { root, container } => {
            tracing::info!(
                "Using local directory store at {}/{}",
                root.display(),
                container
            );
            Arc::new(LocalDirStore::new(root, container))
        }
    }
}
