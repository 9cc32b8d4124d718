//! Record flattening
//!
//! Projects nested JSON records into flat rows with dot-joined column names.
//! Pure functions, no storage dependency: `{"a": {"b": 1}}` flattens to a
//! single column `a.b` with value `1`. Arrays are carried through unchanged,
//! so list-typed fields survive as list columns instead of exploding into
//! per-index columns.

use crate::types::{JsonObject, JsonValue};

/// Column name used when a record is a bare scalar or array instead of an
/// object. Keeps a malformed-but-parseable row in the batch rather than
/// aborting it.
pub const SCALAR_COLUMN: &str = "value";

/// Flatten a batch of records, one flat row per input record.
///
/// The output column set is the union of flattened keys across all records;
/// rows simply omit keys they do not have, which downstream schema inference
/// turns into nulls.
pub fn flatten_records(records: &[JsonValue]) -> Vec<JsonObject> {
    records.iter().map(flatten_record).collect()
}

/// Flatten a single record into a flat row.
///
/// Flattening an already-flat record is a no-op.
pub fn flatten_record(record: &JsonValue) -> JsonObject {
    let mut row = JsonObject::new();
    match record {
        JsonValue::Object(map) => {
            for (key, value) in map {
                flatten_into(&mut row, key, value);
            }
        }
        other => {
            row.insert(SCALAR_COLUMN.to_string(), other.clone());
        }
    }
    row
}

fn flatten_into(row: &mut JsonObject, path: &str, value: &JsonValue) {
    match value {
        JsonValue::Object(map) => {
            for (key, nested) in map {
                flatten_into(row, &format!("{path}.{key}"), nested);
            }
        }
        leaf => {
            row.insert(path.to_string(), leaf.clone());
        }
    }
}
