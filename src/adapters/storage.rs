use crate::domain::ports::Storage;
use crate::utils::error::{FixError, Result};
use std::path::{Path, PathBuf};

/// 以 `base_path` 為根目錄的本機檔案系統
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(self.resolve(path))
            .await
            .map_err(|e| FixError::file(path, e))
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| FixError::file(path, e))?;
            }
        }

        tokio::fs::write(&full_path, data)
            .await
            .map_err(|e| FixError::file(path, e))
    }

    async fn list_files(&self, dir: &str, extension: &str) -> Result<Vec<String>> {
        let mut found = Vec::new();
        let mut pending = vec![PathBuf::from(dir)];

        while let Some(relative) = pending.pop() {
            let display = relative.to_string_lossy().into_owned();
            let mut entries = tokio::fs::read_dir(self.resolve(&display))
                .await
                .map_err(|e| FixError::file(display.clone(), e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| FixError::file(display.clone(), e))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| FixError::file(display.clone(), e))?;
                let child = relative.join(entry.file_name());

                if file_type.is_dir() {
                    pending.push(child);
                } else if file_type.is_file() && has_extension(&child, extension) {
                    found.push(child.to_string_lossy().into_owned());
                }
            }
        }

        found.sort();
        Ok(found)
    }
}
