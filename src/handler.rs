//! Invocation handling
//!
//! Orchestrates one invocation end to end: resolve configuration, decode the
//! notification, load and flatten the source records, commit. The stages run
//! strictly in order and any failure short-circuits the rest; errors are
//! logged with stage context here, then returned to the hosting runtime,
//! which owns retry and dead-letter policy.

use crate::config::InvocationConfig;
use crate::error::Result;
use crate::event::SourceObjectRef;
use crate::{flatten, output, source};
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::LambdaEvent;
use object_store::ObjectStore;
use serde::Serialize;
use tracing::{error, info};

/// Structured response returned to the invoking runtime on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResponse {
    /// HTTP-style status code, always 200 on the success path
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Human-readable summary naming the processed object key
    pub body: String,
    /// Destination dataset URI the rows were committed under
    pub output_location: String,
    /// Number of rows committed
    pub processed_rows: usize,
}

/// Lambda entry point for one S3 notification
pub async fn handle(
    event: LambdaEvent<S3Event>,
    glue: &aws_sdk_glue::Client,
) -> Result<InvocationResponse> {
    let outcome = process(event.payload, glue).await;

    if let Err(e) = &outcome {
        error!(
            stage = e.stage(),
            retryable = e.is_retryable(),
            error = %e,
            "invocation failed"
        );
    }

    outcome
}

async fn process(event: S3Event, glue: &aws_sdk_glue::Client) -> Result<InvocationResponse> {
    let config = InvocationConfig::from_env()?;
    info!(
        destination = %config.destination,
        table = %config.qualified_table(),
        mode = %config.write_mode,
        "resolved invocation configuration"
    );

    let object = SourceObjectRef::from_event(&event)?;
    info!(source = %object.uri(), "processing file");

    let store = source::store_for_bucket(&object.bucket)?;
    run_pipeline(&config, &object, store.as_ref(), glue).await
}

/// Run the transform stages against an already-resolved configuration,
/// object reference, and source store.
pub async fn run_pipeline(
    config: &InvocationConfig,
    object: &SourceObjectRef,
    store: &dyn ObjectStore,
    glue: &aws_sdk_glue::Client,
) -> Result<InvocationResponse> {
    let items = source::fetch_items(store, object).await?;
    let rows = flatten::flatten_records(&items);

    let result = output::commit(&rows, config, glue).await?;
    info!(
        rows = result.rows_written,
        location = %result.output_location,
        "data committed"
    );

    Ok(InvocationResponse {
        status_code: 200,
        body: format!("Successfully processed {}", object.key),
        output_location: result.output_location,
        processed_rows: result.rows_written,
    })
}
