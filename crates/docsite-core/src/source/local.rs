use crate::source::DocumentSource;
use crate::{Branch, Error, Result, TreeEntry};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Document source reading checked-out branches from disk.
///
/// Layout: `<root>/<branch>/<docs_path>/...`, one directory per branch.
pub struct LocalSource {
    root: PathBuf,
    docs_path: String,
}

impl LocalSource {
    /// Read `<root>/<branch>/<docs_path>`.
    pub fn new(root: impl Into<PathBuf>, docs_path: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            docs_path: docs_path.into(),
        }
    }

    fn resolve(&self, path: &str, branch: &Branch) -> Result<PathBuf> {
        let mut full = self.root.join(branch.name());
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment == ".." || segment == "." {
                return Err(Error::SourceUnavailable(format!(
                    "refusing relative segment in '{path}'"
                )));
            }
            full.push(segment);
        }
        Ok(full)
    }
}

fn unavailable(path: &Path, err: &std::io::Error) -> Error {
    Error::SourceUnavailable(format!("{}: {err}", path.display()))
}

#[async_trait]
impl DocumentSource for LocalSource {
    fn root_path(&self) -> &str {
        &self.docs_path
    }

    async fn list_dir(&self, path: &str, branch: &Branch) -> Result<Vec<TreeEntry>> {
        let dir = self.resolve(path, branch)?;
        let mut reader = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| unavailable(&dir, &e))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| unavailable(&dir, &e))? {
            let file_type = entry.file_type().await.map_err(|e| unavailable(&dir, &e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let child_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{}/{name}", path.trim_end_matches('/'))
            };
            entries.push(TreeEntry {
                name,
                path: child_path,
                is_dir: file_type.is_dir(),
            });
        }

        // Match the contents API, which lists entries by name.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn fetch_raw(&self, path: &str, branch: &Branch) -> Result<String> {
        let file = self.resolve(path, branch)?;
        tokio::fs::read_to_string(&file)
            .await
            .map_err(|e| unavailable(&file, &e))
    }
}
