//! Output module
//!
//! Commits a batch of flat rows as a columnar dataset: Arrow schema
//! inference, Parquet serialization, the destination storage write, and
//! catalog registration, in that order.

mod cloud;
mod schema;
mod writer;

pub use cloud::CloudDestination;
pub use schema::{infer_schema, rows_to_arrow};
pub use writer::{to_parquet_bytes, ParquetWriterConfig};

use crate::catalog;
use crate::config::InvocationConfig;
use crate::error::{Error, Result};
use crate::types::{JsonObject, WriteMode, WriteResult};
use tracing::info;

/// Persist flat rows at the destination and register the table.
///
/// For `overwrite`, the new data file lands before superseded files are
/// removed, so the dataset is never observable as empty mid-commit. The
/// catalog is registered last: a storage failure leaves the catalog
/// untouched, while a catalog failure means landed data awaiting
/// registration. The two are reported as distinct errors.
pub async fn commit(
    rows: &[JsonObject],
    config: &InvocationConfig,
    glue: &aws_sdk_glue::Client,
) -> Result<WriteResult> {
    if rows.is_empty() {
        return Err(Error::Other("no rows to commit".to_string()));
    }

    let schema = infer_schema(rows)?;
    if schema.fields().is_empty() {
        return Err(Error::Other("rows have no columns to commit".to_string()));
    }

    let batch = rows_to_arrow(rows, &schema)?;
    let data = to_parquet_bytes(&batch, &ParquetWriterConfig::default())?;

    let destination = CloudDestination::parse(&config.destination)?;

    let superseded = match config.write_mode {
        WriteMode::Overwrite => destination.list_data_files().await?,
        WriteMode::Append => Vec::new(),
    };

    let filename = CloudDestination::data_file_name(&config.table);
    let written = destination.put_data_file(&filename, data).await?;
    info!(file = %written, rows = batch.num_rows(), "data file written");

    if !superseded.is_empty() {
        destination.remove_data_files(&superseded).await?;
        info!(files = superseded.len(), "superseded data files removed");
    }

    catalog::register_table(glue, config, &schema).await?;

    Ok(WriteResult {
        rows_written: batch.num_rows(),
        output_location: destination.location().to_string(),
    })
}
