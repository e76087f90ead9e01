use agenda_shared::ObjectStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Stores objects as files under `{root}/{container}/{key}`.
///
/// Content types are not persisted.
pub struct LocalDirStore {
    dir: PathBuf,
}

impl LocalDirStore {
    pub fn new(root: impl AsRef<Path>, container: &str) -> Self {
        Self {
            dir: root.as_ref().join(container),
        }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl ObjectStore for LocalDirStore {
    async fn read_text(&self, key: &str) -> Result<String> {
        let path = self.object_path(key);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    async fn write_text(&self, key: &str, content: &str, _content_type: &str) -> Result<()> {
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_write_then_read() {
        let root = tempfile::tempdir().expect("create temp dir");
        let store = LocalDirStore::new(root.path(), "site");

        assert_ok!(store.write_text("index.html", "<p>first</p>", "text/html").await);
        assert_ok!(store.write_text("index.html", "<p>second</p>", "text/html").await);

        let text = assert_ok!(store.read_text("index.html").await);
        assert_eq!(text, "<p>second</p>");
        assert!(root.path().join("site").join("index.html").exists());
    }

    #[tokio::test]
    async fn test_missing_object_is_error() {
        let root = tempfile::tempdir().expect("create temp dir");
        let store = LocalDirStore::new(root.path(), "site");
        assert_err!(store.read_text("template.html").await);
    }
}
