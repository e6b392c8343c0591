use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use super::types::{DerivedArtifact, Namespace, RawAsset};
use crate::image_pipeline::{PipelineError, RawFormat, Result};

/// Name-addressed storage for uploads and their derived files, rooted at a data directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    directory: PathBuf,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            directory: dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.directory
    }

    #[inline]
    pub fn namespace_dir(&self, namespace: Namespace) -> PathBuf {
        self.directory.join(namespace.dir_name())
    }

    /// Creates both namespace directories if absent.
    pub async fn init(&self) -> Result<()> {
        for namespace in Namespace::ALL {
            let dir = self.namespace_dir(namespace);
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| storage_error("create", &dir, e))?;
        }
        info!("Asset store ready @ {:?}", &self.directory);
        Ok(())
    }

    /// Stores an upload byte-for-byte under `<uuid>_<filename>`.
    pub async fn save_original(&self, data: &[u8], original_filename: &str) -> Result<RawAsset> {
        let filename = sanitize_filename(original_filename);
        let format = RawFormat::from_filename(&filename)
            .ok_or_else(|| PipelineError::UnsupportedFormat(original_filename.to_string()))?;

        let id = format!("{}_{}", Uuid::new_v4(), filename);
        let path = self.write(Namespace::Originals, &id, data).await?;

        Ok(RawAsset {
            id,
            original_filename: filename,
            format,
            path,
        })
    }

    /// Stores a derived file. An existing file of the same name is replaced.
    pub async fn save_derived(&self, data: &[u8], name: &str) -> Result<DerivedArtifact> {
        let path = self.write(Namespace::Derived, name, data).await?;
        Ok(DerivedArtifact {
            name: name.to_string(),
            path,
        })
    }

    pub async fn read(&self, namespace: Namespace, name: &str) -> Result<Vec<u8>> {
        let path = self.lookup_path(namespace, name)?;

        debug!("Retrieving file @ {:?}", &path);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(ref e) if e.kind() == ErrorKind::NotFound => Err(not_found(namespace, name)),
            Err(other) => Err(storage_error("read", &path, other)),
        }
    }

    /// Path of an existing entry.
    pub async fn resolve(&self, namespace: Namespace, name: &str) -> Result<PathBuf> {
        let path = self.lookup_path(namespace, name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(not_found(namespace, name)),
            Err(ref e) if e.kind() == ErrorKind::NotFound => Err(not_found(namespace, name)),
            Err(other) => Err(storage_error("inspect", &path, other)),
        }
    }

    pub async fn exists(&self, namespace: Namespace, name: &str) -> bool {
        self.resolve(namespace, name).await.is_ok()
    }

    /// Deletes everything in both namespaces and recreates them empty.
    pub async fn clear_all(&self) -> Result<()> {
        for namespace in Namespace::ALL {
            let dir = self.namespace_dir(namespace);
            debug!("Purging {:?}", &dir);

            match tokio::fs::remove_dir_all(&dir).await {
                Ok(()) => {}
                Err(ref e) if e.kind() == ErrorKind::NotFound => {}
                Err(other) => return Err(storage_error("remove", &dir, other)),
            }

            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| storage_error("create", &dir, e))?;
        }

        info!("Cleared all uploaded and derived files");
        Ok(())
    }

    async fn write(&self, namespace: Namespace, name: &str, data: &[u8]) -> Result<PathBuf> {
        if !is_valid_name(name) {
            return Err(PipelineError::StorageError(format!(
                "invalid {} file name '{}'",
                namespace, name
            )));
        }

        let store_in = self.namespace_dir(namespace);
        let path = store_in.join(name);

        debug!("Storing {} bytes @ {:?}", data.len(), &path);
        match tokio::fs::write(&path, data).await {
            Ok(()) => Ok(path),
            Err(ref e) if e.kind() == ErrorKind::NotFound => {
                tokio::fs::create_dir_all(&store_in)
                    .await
                    .map_err(|e| storage_error("create", &store_in, e))?;
                tokio::fs::write(&path, data)
                    .await
                    .map_err(|e| storage_error("write", &path, e))?;
                Ok(path)
            }
            Err(other) => Err(storage_error("write", &path, other)),
        }
    }

    fn lookup_path(&self, namespace: Namespace, name: &str) -> Result<PathBuf> {
        if !is_valid_name(name) {
            return Err(not_found(namespace, name));
        }
        Ok(self.namespace_dir(namespace).join(name))
    }
}

/// A name must be exactly one normal path component.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Keeps the last path component of a client-supplied filename.
pub fn sanitize_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    match cleaned.trim() {
        "." | ".." => String::new(),
        other => other.to_string(),
    }
}

fn not_found(namespace: Namespace, name: &str) -> PipelineError {
    PipelineError::NotFound(format!("{} file '{}' not found", namespace, name))
}

fn storage_error(action: &str, path: &Path, err: std::io::Error) -> PipelineError {
    PipelineError::StorageError(format!("failed to {} {:?}: {}", action, path, err))
}
