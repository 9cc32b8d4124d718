//! Source object loading
//!
//! Fetches the raw JSON document named by the notification and extracts its
//! `items` list. The source contract is strict: the object must exist, must
//! parse as JSON, and must carry a non-empty top-level `items` array.
//! Anything else halts the invocation before any write happens.

use crate::error::{Error, Result};
use crate::event::SourceObjectRef;
use crate::types::JsonValue;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;
use tracing::info;

/// Build an S3 client scoped to the notification's bucket.
///
/// Credentials and region come from the execution environment, the same way
/// the destination store resolves them.
pub fn store_for_bucket(bucket: &str) -> Result<Arc<dyn ObjectStore>> {
    let store = AmazonS3Builder::from_env()
        .with_bucket_name(bucket)
        .build()?;
    Ok(Arc::new(store))
}

/// Fetch the source document and return its `items` records.
pub async fn fetch_items(
    store: &dyn ObjectStore,
    object: &SourceObjectRef,
) -> Result<Vec<JsonValue>> {
    let location = object.uri();
    let path = ObjectPath::from(object.key.as_str());

    let body = match store.get(&path).await {
        Ok(result) => result.bytes().await?,
        Err(object_store::Error::NotFound { .. }) => {
            return Err(Error::not_found(location));
        }
        Err(e) => return Err(e.into()),
    };

    let document: JsonValue = serde_json::from_slice(&body)
        .map_err(|e| Error::invalid_document(&location, format!("not valid JSON: {e}")))?;

    let items = extract_items(&document, &location)?;
    info!(rows = items.len(), %location, "extracted items from source document");
    Ok(items)
}

/// Pull the `items` array out of a parsed document.
///
/// An empty list is rejected: committing zero rows would register a table
/// over no data, so it is surfaced as a data defect instead.
fn extract_items(document: &JsonValue, location: &str) -> Result<Vec<JsonValue>> {
    let items = document
        .get("items")
        .ok_or_else(|| Error::invalid_document(location, "missing top-level 'items' field"))?;

    let records = items
        .as_array()
        .ok_or_else(|| Error::invalid_document(location, "'items' is not an array"))?;

    if records.is_empty() {
        return Err(Error::EmptyDocument {
            location: location.to_string(),
        });
    }

    Ok(records.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use object_store::memory::InMemory;
    use serde_json::json;

    fn object() -> SourceObjectRef {
        SourceObjectRef {
            bucket: "landing".to_string(),
            key: "raw/items.json".to_string(),
        }
    }

    async fn store_with(body: &str) -> InMemory {
        let store = InMemory::new();
        store
            .put(
                &ObjectPath::from("raw/items.json"),
                Bytes::from(body.to_string()).into(),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_fetch_items_returns_records() {
        let store = store_with(r#"{"items": [{"a": 1}, {"a": 2}]}"#).await;
        let items = fetch_items(&store, &object()).await.unwrap();

        assert_eq!(items, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let store = InMemory::new();
        let err = fetch_items(&store, &object()).await.unwrap_err();

        assert!(
            matches!(&err, Error::ObjectNotFound { location } if location == "s3://landing/raw/items.json")
        );
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unparseable_body_is_invalid_document() {
        let store = store_with("this is not json").await;
        let err = fetch_items(&store, &object()).await.unwrap_err();

        assert!(matches!(err, Error::InvalidDocument { .. }));
    }

    #[tokio::test]
    async fn test_missing_items_field_is_invalid_document() {
        let store = store_with(r#"{"records": []}"#).await;
        let err = fetch_items(&store, &object()).await.unwrap_err();

        assert!(
            matches!(&err, Error::InvalidDocument { message, .. } if message.contains("items"))
        );
    }

    #[tokio::test]
    async fn test_non_array_items_is_invalid_document() {
        let store = store_with(r#"{"items": {"a": 1}}"#).await;
        let err = fetch_items(&store, &object()).await.unwrap_err();

        assert!(
            matches!(&err, Error::InvalidDocument { message, .. } if message.contains("not an array"))
        );
    }

    #[tokio::test]
    async fn test_empty_items_is_rejected() {
        let store = store_with(r#"{"items": []}"#).await;
        let err = fetch_items(&store, &object()).await.unwrap_err();

        assert!(matches!(err, Error::EmptyDocument { .. }));
        assert!(!err.is_retryable());
    }
}
