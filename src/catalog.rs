//! Metadata catalog registration
//!
//! Registers or updates the destination table in the AWS Glue Data Catalog
//! so query engines see committed data immediately. The table is declared
//! external with a Parquet storage descriptor pointing at the destination
//! URI; columns are derived from the committed Arrow schema.

use crate::config::InvocationConfig;
use crate::error::{Error, Result};
use arrow::datatypes::{DataType, Schema};
use aws_sdk_glue::error::DisplayErrorContext;
use aws_sdk_glue::operation::get_table::GetTableError;
use aws_sdk_glue::types::{Column, SerDeInfo, StorageDescriptor, TableInput};
use aws_sdk_glue::Client;
use tracing::info;

const PARQUET_INPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.parquet.MapredParquetInputFormat";
const PARQUET_OUTPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.parquet.MapredParquetOutputFormat";
const PARQUET_SERDE: &str = "org.apache.hadoop.hive.ql.io.parquet.serde.ParquetHiveSerDe";

/// Register the destination table, creating it if absent and updating its
/// definition otherwise.
pub async fn register_table(
    glue: &Client,
    config: &InvocationConfig,
    schema: &Schema,
) -> Result<()> {
    let table = config.qualified_table();
    let input = table_input(config, schema)?;

    let existing = glue
        .get_table()
        .database_name(&config.database)
        .name(&config.table)
        .send()
        .await;

    match existing {
        Ok(_) => {
            glue.update_table()
                .database_name(&config.database)
                .table_input(input)
                .send()
                .await
                .map_err(|e| {
                    Error::catalog_sync(&table, DisplayErrorContext(e).to_string())
                })?;
            info!(%table, "updated catalog table definition");
        }
        Err(err)
            if err
                .as_service_error()
                .is_some_and(GetTableError::is_entity_not_found_exception) =>
        {
            glue.create_table()
                .database_name(&config.database)
                .table_input(input)
                .send()
                .await
                .map_err(|e| {
                    Error::catalog_sync(&table, DisplayErrorContext(e).to_string())
                })?;
            info!(%table, "created catalog table");
        }
        Err(err) => {
            return Err(Error::catalog_sync(
                &table,
                DisplayErrorContext(err).to_string(),
            ));
        }
    }

    Ok(())
}

/// Build the table definition sent to the catalog
fn table_input(config: &InvocationConfig, schema: &Schema) -> Result<TableInput> {
    let table = config.qualified_table();

    let columns = schema
        .fields()
        .iter()
        .map(|field| {
            Column::builder()
                .name(field.name())
                .r#type(glue_type(field.data_type()))
                .build()
                .map_err(|e| Error::catalog_sync(&table, e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let descriptor = StorageDescriptor::builder()
        .location(&config.destination)
        .input_format(PARQUET_INPUT_FORMAT)
        .output_format(PARQUET_OUTPUT_FORMAT)
        .serde_info(
            SerDeInfo::builder()
                .serialization_library(PARQUET_SERDE)
                .build(),
        )
        .set_columns(Some(columns))
        .build();

    TableInput::builder()
        .name(&config.table)
        .table_type("EXTERNAL_TABLE")
        .parameters("classification", "parquet")
        .storage_descriptor(descriptor)
        .build()
        .map_err(|e| Error::catalog_sync(&table, e.to_string()))
}

/// Map an Arrow data type to the Glue/Hive type name
fn glue_type(data_type: &DataType) -> String {
    match data_type {
        DataType::Boolean => "boolean".to_string(),
        DataType::Int64 => "bigint".to_string(),
        DataType::Float64 => "double".to_string(),
        DataType::List(field) => format!("array<{}>", glue_type(field.data_type())),
        DataType::Struct(fields) => {
            let members: Vec<String> = fields
                .iter()
                .map(|f| format!("{}:{}", f.name(), glue_type(f.data_type())))
                .collect();
            format!("struct<{}>", members.join(","))
        }
        // Null columns and anything exotic land as strings
        _ => "string".to_string(),
    }
}
