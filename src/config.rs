//! Invocation configuration
//!
//! Materializes the runtime configuration from the process environment once
//! per invocation and threads it explicitly through the pipeline. There is no
//! global configuration object and no defaulting: every key must be present,
//! and a resolve failure reports every missing key at once.

use crate::error::{Error, Result};
use crate::types::WriteMode;

/// Environment key for the destination dataset URI
pub const ENV_DESTINATION: &str = "s3_cleansed_layer";
/// Environment key for the catalog database name
pub const ENV_DATABASE: &str = "glue_catalog_db_name";
/// Environment key for the catalog table name
pub const ENV_TABLE: &str = "glue_catalog_table_name";
/// Environment key for the write mode
pub const ENV_WRITE_MODE: &str = "write_data_operation";

/// Resolved runtime configuration, immutable for the invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    /// Destination dataset URI (e.g. `s3://bucket/cleansed/`)
    pub destination: String,
    /// Catalog database name
    pub database: String,
    /// Catalog table name
    pub table: String,
    /// Commit semantics at the destination
    pub write_mode: WriteMode,
}

impl InvocationConfig {
    /// Resolve the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration through an arbitrary key lookup.
    ///
    /// Missing or empty values are collected across all required keys so a
    /// single failure names everything that must be fixed. An unrecognized
    /// write mode is rejected here, before any collaborator is contacted.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |key: &str| {
            let value = lookup(key).filter(|v| !v.is_empty());
            if value.is_none() {
                missing.push(key.to_string());
            }
            value.unwrap_or_default()
        };

        let destination = require(ENV_DESTINATION);
        let database = require(ENV_DATABASE);
        let table = require(ENV_TABLE);
        let write_mode = require(ENV_WRITE_MODE);

        if !missing.is_empty() {
            return Err(Error::config(missing));
        }

        Ok(Self {
            destination,
            database,
            table,
            write_mode: write_mode.parse()?,
        })
    }

    /// Fully qualified `database.table` identifier, for logs and errors
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            (ENV_DESTINATION, "s3://lake/cleansed/"),
            (ENV_DATABASE, "analytics"),
            (ENV_TABLE, "raw_items"),
            (ENV_WRITE_MODE, "append"),
        ])
    }

    #[test]
    fn test_resolve_complete() {
        let vars = full_env();
        let config = InvocationConfig::resolve(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.destination, "s3://lake/cleansed/");
        assert_eq!(config.database, "analytics");
        assert_eq!(config.table, "raw_items");
        assert_eq!(config.write_mode, WriteMode::Append);
        assert_eq!(config.qualified_table(), "analytics.raw_items");
    }

    #[test]
    fn test_resolve_reports_all_missing_keys() {
        let vars = env(&[(ENV_DATABASE, "analytics")]);
        let err = InvocationConfig::resolve(|k| vars.get(k).cloned()).unwrap_err();

        match err {
            Error::Config { missing } => {
                assert_eq!(
                    missing,
                    vec![
                        ENV_DESTINATION.to_string(),
                        ENV_TABLE.to_string(),
                        ENV_WRITE_MODE.to_string(),
                    ]
                );
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_empty_environment() {
        let err = InvocationConfig::resolve(|_| None).unwrap_err();

        match err {
            Error::Config { missing } => assert_eq!(
                missing,
                vec![
                    ENV_DESTINATION.to_string(),
                    ENV_DATABASE.to_string(),
                    ENV_TABLE.to_string(),
                    ENV_WRITE_MODE.to_string(),
                ]
            ),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_empty_value_counts_as_missing() {
        let mut vars = full_env();
        vars.insert(ENV_TABLE.to_string(), String::new());
        let err = InvocationConfig::resolve(|k| vars.get(k).cloned()).unwrap_err();

        match err {
            Error::Config { missing } => assert_eq!(missing, vec![ENV_TABLE.to_string()]),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_rejects_unknown_write_mode() {
        let mut vars = full_env();
        vars.insert(ENV_WRITE_MODE.to_string(), "upsert".to_string());
        let err = InvocationConfig::resolve(|k| vars.get(k).cloned()).unwrap_err();

        assert!(matches!(err, Error::InvalidWriteMode { value } if value == "upsert"));
    }
}
