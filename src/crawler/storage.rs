//! Crawl results on disk

use super::StorageError;
use crate::export::{StructuredExport, to_json};
use crate::links::host_of;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

/// Writes structured exports into a results directory
#[derive(Debug, Clone)]
pub struct ResultsStore {
    base_path: PathBuf,
}

impl ResultsStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File name for a crawl of `seed_url`: `crawl_<host>_<8 hex chars>.json`
    fn file_name(seed_url: &str) -> Result<String, StorageError> {
        let host = host_of(seed_url).ok_or_else(|| StorageError::InvalidUrl(seed_url.to_string()))?;
        // Ports would put a colon in the file name
        let host = host.replace(':', "_");
        let id = uuid::Uuid::new_v4().simple().to_string();
        Ok(format!("crawl_{}_{}.json", host, &id[..8]))
    }

    /// Write `export` as pretty UTF-8 JSON and return the file path
    #[instrument(skip(self, export), fields(dir = %self.base_path.display()))]
    pub async fn save(
        &self,
        seed_url: &str,
        export: &StructuredExport,
    ) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.base_path.join(Self::file_name(seed_url)?);
        let json = to_json(export, true)?;
        fs::write(&path, json).await?;

        debug!("Wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::PageResult;
    use crate::export::create_structured_export;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_writes_named_file() {
        let dir = tempdir().unwrap();
        let store = ResultsStore::new(dir.path().join("results"));
        let mut page = PageResult::failed("https://example.com/", "x");
        page.success = true;
        page.error = None;
        page.title = "Café menu".to_string();
        let export = create_structured_export(&[page]);

        let path = store.save("https://example.com/", &export).await.unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("crawl_example.com_"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "crawl_example.com_".len() + 8 + ".json".len());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Café menu"));
        assert!(written.contains("\n  \"metadata\""));
    }

    #[tokio::test]
    async fn test_port_is_file_name_safe() {
        let dir = tempdir().unwrap();
        let store = ResultsStore::new(dir.path());
        let export = create_structured_export(&[PageResult::failed("http://localhost:8080/", "x")]);

        let path = store.save("http://localhost:8080/", &export).await.unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("crawl_localhost_8080_"));
    }

    #[tokio::test]
    async fn test_invalid_seed_url() {
        let dir = tempdir().unwrap();
        let store = ResultsStore::new(dir.path());
        let export = create_structured_export(&[]);

        let err = store.save("not a url", &export).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidUrl(_)));
    }
}
