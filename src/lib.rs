//! # json2lake
//!
//! Serverless JSON-to-Parquet ingestion with Glue catalog registration.
//!
//! One invocation per created object: an S3 notification names a raw JSON
//! document, its nested `items` records are flattened into tabular rows, and
//! the rows are committed as Snappy Parquet at the cleansed-layer destination
//! and registered in the Glue Data Catalog.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                         handler                            │
//! │  config → event → source/flatten → output/catalog → 200    │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬──────────┬──────┴──────┬────────────┬───────────┐
//! │  config  │  event   │   source    │   output   │  catalog  │
//! ├──────────┼──────────┼─────────────┼────────────┼───────────┤
//! │ env keys │ S3 event │ fetch JSON  │ Arrow      │ Glue      │
//! │ validate │ unescape │ items[]     │ Parquet    │ create/   │
//! │ mode     │ key      │ flatten     │ put+prune  │ update    │
//! └──────────┴──────────┴─────────────┴────────────┴───────────┘
//! ```
//!
//! Every stage returns a typed [`error::Error`] carrying its stage and
//! cause; any failure short-circuits the invocation and is surfaced to the
//! hosting runtime, which owns retry and dead-letter policy.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Common types and type aliases
pub mod types;

/// Invocation configuration resolved from the environment
pub mod config;

/// S3 notification decoding
pub mod event;

/// Source object loading and `items` extraction
pub mod source;

/// Nested record flattening
pub mod flatten;

/// Parquet serialization and destination storage
pub mod output;

/// Glue Data Catalog registration
pub mod catalog;

/// Invocation orchestration
pub mod handler;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::InvocationConfig;
pub use error::{Error, Result};
pub use event::SourceObjectRef;
pub use handler::{handle, InvocationResponse};
pub use types::{WriteMode, WriteResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
