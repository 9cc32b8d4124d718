//! Error types for json2lake
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Errors fall into four families, one per pipeline stage: configuration,
//! event decoding, source data, and commit (storage or catalog). The family
//! determines retry guidance via [`Error::is_retryable`] and shows up in
//! structured logs via [`Error::stage`].

use thiserror::Error;

/// The main error type for json2lake
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Missing required environment variables: {missing:?}")]
    Config { missing: Vec<String> },

    #[error("Invalid write mode '{value}', expected 'append' or 'overwrite'")]
    InvalidWriteMode { value: String },

    // ============================================================================
    // Event Errors
    // ============================================================================
    #[error("Malformed S3 notification: {message}")]
    MalformedEvent { message: String },

    // ============================================================================
    // Source Data Errors
    // ============================================================================
    #[error("Source object not found: {location}")]
    ObjectNotFound { location: String },

    #[error("Invalid source document at {location}: {message}")]
    InvalidDocument { location: String, message: String },

    #[error("Source document at {location} has an empty 'items' list")]
    EmptyDocument { location: String },

    // ============================================================================
    // Commit Errors
    // ============================================================================
    #[error("Storage write to {location} failed: {message}")]
    StorageWrite { location: String, message: String },

    #[error("Catalog registration of {table} failed: {message}")]
    CatalogSync { table: String, message: String },

    // ============================================================================
    // Plumbing
    // ============================================================================
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error listing every missing key
    pub fn config(missing: Vec<String>) -> Self {
        Self::Config { missing }
    }

    /// Create a malformed event error
    pub fn malformed_event(message: impl Into<String>) -> Self {
        Self::MalformedEvent {
            message: message.into(),
        }
    }

    /// Create an object-not-found error
    pub fn not_found(location: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            location: location.into(),
        }
    }

    /// Create an invalid document error
    pub fn invalid_document(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error
    pub fn storage_write(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a catalog sync error
    pub fn catalog_sync(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CatalogSync {
            table: table.into(),
            message: message.into(),
        }
    }

    /// The pipeline stage this error originated from, for log context
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Config { .. } | Error::InvalidWriteMode { .. } => "config",
            Error::MalformedEvent { .. } => "event",
            Error::ObjectNotFound { .. }
            | Error::InvalidDocument { .. }
            | Error::EmptyDocument { .. } => "source",
            Error::StorageWrite { .. } => "storage",
            Error::CatalogSync { .. } => "catalog",
            Error::ObjectStore(_)
            | Error::Arrow(_)
            | Error::Parquet(_)
            | Error::Other(_) => "internal",
        }
    }

    /// Check if re-running the invocation can plausibly succeed.
    ///
    /// A missing source object may be a transient visibility gap, and a
    /// storage write that failed left no catalog side effect behind. All
    /// other families fail identically on retry (bad config, bad data) or
    /// need manual reconciliation (catalog out of sync with landed data).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ObjectNotFound { .. } | Error::StorageWrite { .. }
        )
    }
}

/// Result type alias for json2lake
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config(vec!["s3_cleansed_layer".to_string()]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: [\"s3_cleansed_layer\"]"
        );

        let err = Error::not_found("s3://bucket/key.json");
        assert_eq!(err.to_string(), "Source object not found: s3://bucket/key.json");

        let err = Error::catalog_sync("db.table", "access denied");
        assert_eq!(
            err.to_string(),
            "Catalog registration of db.table failed: access denied"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::not_found("s3://b/k").is_retryable());
        assert!(Error::storage_write("s3://b/out", "timeout").is_retryable());

        assert!(!Error::config(vec![]).is_retryable());
        assert!(!Error::malformed_event("no records").is_retryable());
        assert!(!Error::invalid_document("s3://b/k", "items missing").is_retryable());
        assert!(!Error::EmptyDocument {
            location: "s3://b/k".to_string()
        }
        .is_retryable());
        assert!(!Error::catalog_sync("db.t", "stale").is_retryable());
    }

    #[test]
    fn test_stage() {
        assert_eq!(Error::config(vec![]).stage(), "config");
        assert_eq!(
            Error::InvalidWriteMode {
                value: "upsert".to_string()
            }
            .stage(),
            "config"
        );
        assert_eq!(Error::malformed_event("x").stage(), "event");
        assert_eq!(Error::not_found("s3://b/k").stage(), "source");
        assert_eq!(Error::storage_write("s3://b", "x").stage(), "storage");
        assert_eq!(Error::catalog_sync("db.t", "x").stage(), "catalog");
        assert_eq!(Error::Other("x".to_string()).stage(), "internal");
    }
}
