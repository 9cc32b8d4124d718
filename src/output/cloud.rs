//! Destination storage
//!
//! Parses the configured destination URI into an object store and manages
//! the dataset's data files under it. S3 is the production target; plain
//! filesystem paths are accepted for local runs and tests.

use crate::error::{Error, Result};
use bytes::Bytes;
use chrono::Utc;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;
use tracing::debug;

/// Destination dataset location parsed from the configured URI
#[derive(Debug, Clone)]
pub struct CloudDestination {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket
    prefix: String,
    /// Original URI, reported back as the output location
    location: String,
    /// URI scheme for logging
    scheme: String,
}

impl CloudDestination {
    /// Parse a destination URI and create the appropriate object store.
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `/local/path/` or `./path/` - Local filesystem
    pub fn parse(uri: &str) -> Result<Self> {
        if uri.starts_with("s3://") {
            Self::parse_s3(uri)
        } else {
            Self::parse_local(uri)
        }
    }

    fn parse_s3(uri: &str) -> Result<Self> {
        let without_scheme = uri
            .strip_prefix("s3://")
            .ok_or_else(|| Error::storage_write(uri, "invalid s3 URI"))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].to_string(),
            ),
            None => (without_scheme, String::new()),
        };

        if bucket.is_empty() {
            return Err(Error::storage_write(uri, "destination URI has no bucket"));
        }

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::storage_write(uri, format!("failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: prefix.trim_end_matches('/').to_string(),
            location: uri.to_string(),
            scheme: "s3".to_string(),
        })
    }

    fn parse_local(path: &str) -> Result<Self> {
        let fs_path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(fs_path).map_err(|e| {
            Error::storage_write(path, format!("failed to create directory: {e}"))
        })?;

        let store = LocalFileSystem::new_with_prefix(fs_path)
            .map_err(|e| Error::storage_write(path, format!("failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            location: path.to_string(),
            scheme: "file".to_string(),
        })
    }

    /// The original destination URI
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Unique data file name for one commit.
    ///
    /// Timestamped to the nanosecond so appended commits never collide.
    pub fn data_file_name(table: &str) -> String {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%9fZ");
        format!("{table}-{stamp}.snappy.parquet")
    }

    fn resolve(&self, filename: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(filename)
        } else {
            ObjectPath::from(format!("{}/{filename}", self.prefix))
        }
    }

    /// Write a data file into the dataset
    pub async fn put_data_file(&self, filename: &str, data: Bytes) -> Result<String> {
        let path = self.resolve(filename);

        self.store.put(&path, data.into()).await.map_err(|e| {
            Error::storage_write(&self.location, format!("failed to write {path}: {e}"))
        })?;

        Ok(format!("{}://{path}", self.scheme))
    }

    /// List the parquet data files currently in the dataset
    pub async fn list_data_files(&self) -> Result<Vec<ObjectPath>> {
        let prefix = (!self.prefix.is_empty()).then(|| ObjectPath::from(self.prefix.as_str()));

        let objects: Vec<_> = self
            .store
            .list(prefix.as_ref())
            .try_collect()
            .await
            .map_err(|e| {
                Error::storage_write(&self.location, format!("failed to list dataset: {e}"))
            })?;

        Ok(objects
            .into_iter()
            .map(|meta| meta.location)
            .filter(|path| path.extension() == Some("parquet"))
            .collect())
    }

    /// Remove superseded data files after an overwrite commit
    pub async fn remove_data_files(&self, files: &[ObjectPath]) -> Result<()> {
        for path in files {
            debug!(%path, "removing superseded data file");
            self.store.delete(path).await.map_err(|e| {
                Error::storage_write(&self.location, format!("failed to delete {path}: {e}"))
            })?;
        }
        Ok(())
    }
}
