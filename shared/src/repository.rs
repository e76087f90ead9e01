//! Collaborator traits for the two external systems the pipeline talks to.
//!
//! Implementations live in the publisher binary (GitHub, Azure Blob, local
//! disk) and in [`crate::memory`] for tests. Errors are plain `anyhow`
//! errors: the pipeline treats every I/O failure the same way.

use anyhow::Result;
use async_trait::async_trait;

/// One entry of a repository directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Read-only access to the agenda repository.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List the entries directly under `path` (e.g. `2024`).
    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>>;

    /// Fetch the decoded content of the file at `path` (e.g. `2024/06.md`).
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;
}

/// Object storage holding the page template and the published page.
///
/// A store is bound to a single container when it is constructed, so
/// callers only ever address objects by key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn read_text(&self, key: &str) -> Result<String>;

    /// Replace the object at `key` with `content`.
    async fn write_text(&self, key: &str, content: &str, content_type: &str) -> Result<()>;
}
