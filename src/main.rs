//! json2lake Lambda bootstrap
//!
//! Wires the shared AWS clients and hands every S3 notification to the
//! invocation handler.

use aws_lambda_events::event::s3::S3Event;
use json2lake::handler;
use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .json()
        .init();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let glue = aws_sdk_glue::Client::new(&aws_config);

    run(service_fn(|event: LambdaEvent<S3Event>| async {
        handler::handle(event, &glue).await.map_err(LambdaError::from)
    }))
    .await
}
