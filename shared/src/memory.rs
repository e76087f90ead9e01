//! In-memory implementations of the collaborator traits.
//!
//! Used by the test suites and handy for dry runs that should not touch the
//! network.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use crate::repository::{DirectoryEntry, DocumentSource, ObjectStore};

/// A fake agenda repository holding files keyed by their full path.
#[derive(Debug, Default)]
pub struct InMemoryDocuments {
    files: BTreeMap<String, Vec<u8>>,
    failing: HashSet<String>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, e.g. `with_file("2024/06.md", "...")`
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Make every request for `path` (directory or file) fail
    pub fn with_failure(mut self, path: impl Into<String>) -> Self {
        self.failing.insert(path.into());
        self
    }

    fn check(&self, path: &str) -> Result<()> {
        if self.failing.contains(path) {
            bail!("simulated repository failure for {}", path);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocuments {
    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>> {
        self.check(path)?;

        let prefix = format!("{}/", path.trim_end_matches('/'));
        let mut names: Vec<String> = Vec::new();
        for file in self.files.keys() {
            if let Some(rest) = file.strip_prefix(&prefix) {
                let name = rest.split('/').next().unwrap_or(rest);
                if names.last().map(String::as_str) != Some(name) {
                    names.push(name.to_string());
                }
            }
        }

        // Mirror the contents API, which answers 404 for unknown directories
        if names.is_empty() {
            bail!("directory not found: {}", path);
        }

        Ok(names.into_iter().map(DirectoryEntry::new).collect())
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.check(path)?;
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("file not found: {}", path))
    }
}

/// An object as last written to an [`InMemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content: String,
    pub content_type: String,
}

/// A fake single-container object store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    fail_writes: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key.into(),
                StoredObject {
                    content: content.into(),
                    content_type: "text/plain".to_string(),
                },
            );
        self
    }

    /// Reject every write, leaving stored objects untouched
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn read_text(&self, key: &str) -> Result<String> {
        self.get(key)
            .map(|object| object.content)
            .ok_or_else(|| anyhow!("object not found: {}", key))
    }

    async fn write_text(&self, key: &str, content: &str, content_type: &str) -> Result<()> {
        if self.fail_writes {
            bail!("simulated storage failure writing {}", key);
        }

        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key.to_string(),
                StoredObject {
                    content: content.to_string(),
                    content_type: content_type.to_string(),
                },
            );
        Ok(())
    }
}
