//! Common types used throughout json2lake
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Write Mode
// ============================================================================

/// How a commit treats data already present at the destination.
///
/// Fixed for the lifetime of a deployment, never negotiated per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Add new files; existing data and catalog partitions are untouched
    Append,
    /// Replace existing data under the destination path
    Overwrite,
}

impl FromStr for WriteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(WriteMode::Append),
            "overwrite" => Ok(WriteMode::Overwrite),
            other => Err(Error::InvalidWriteMode {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Append => write!(f, "append"),
            WriteMode::Overwrite => write!(f, "overwrite"),
        }
    }
}

// ============================================================================
// Write Result
// ============================================================================

/// Outcome of a successful commit to storage and catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    /// Number of rows serialized into the committed file
    pub rows_written: usize,
    /// Destination dataset URI the rows were committed under
    pub output_location: String,
}
