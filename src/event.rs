//! S3 notification decoding
//!
//! Extracts the source object location from the inbound notification. The
//! event source escapes special characters in object keys the way HTML forms
//! do, so keys are percent-plus decoded (UTF-8) before use.

use crate::error::{Error, Result};
use aws_lambda_events::event::s3::S3Event;
use percent_encoding::percent_decode_str;
use tracing::warn;

/// Location of the source object named by the notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceObjectRef {
    /// Bucket the object lives in
    pub bucket: String,
    /// Decoded object key
    pub key: String,
}

impl SourceObjectRef {
    /// Decode the first record of an S3 notification.
    ///
    /// One invocation handles one object: notifications carrying more than
    /// one record are truncated to the first, with a warning for the rest.
    pub fn from_event(event: &S3Event) -> Result<Self> {
        let record = event
            .records
            .first()
            .ok_or_else(|| Error::malformed_event("notification carries no records"))?;

        if event.records.len() > 1 {
            warn!(
                dropped = event.records.len() - 1,
                "multi-record notification, only the first record is processed"
            );
        }

        let bucket = record
            .s3
            .bucket
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::malformed_event("record is missing the bucket name"))?;

        let raw_key = record
            .s3
            .object
            .key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::malformed_event("record is missing the object key"))?;

        Ok(Self {
            bucket,
            key: decode_key(&raw_key)?,
        })
    }

    /// Full `s3://bucket/key` URI, for logs and errors
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

/// Undo percent-plus escaping applied to object keys by the event source
fn decode_key(raw: &str) -> Result<String> {
    let unplussed = raw.replace('+', " ");
    percent_decode_str(&unplussed)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| Error::malformed_event(format!("object key is not valid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_lambda_events::event::s3::{S3Bucket, S3Entity, S3EventRecord, S3Object};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn record(bucket: Option<&str>, key: Option<&str>) -> S3EventRecord {
        S3EventRecord {
            s3: S3Entity {
                bucket: S3Bucket {
                    name: bucket.map(String::from),
                    ..Default::default()
                },
                object: S3Object {
                    key: key.map(String::from),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn event(records: Vec<S3EventRecord>) -> S3Event {
        S3Event { records }
    }

    #[test]
    fn test_decode_simple_event() {
        let event = event(vec![record(Some("landing"), Some("raw/2024/items.json"))]);
        let object = SourceObjectRef::from_event(&event).unwrap();

        assert_eq!(object.bucket, "landing");
        assert_eq!(object.key, "raw/2024/items.json");
        assert_eq!(object.uri(), "s3://landing/raw/2024/items.json");
    }

    #[test_case("my+file.json", "my file.json"; "plus becomes space")]
    #[test_case("a%3Db.json", "a=b.json"; "percent escape")]
    #[test_case("caf%C3%A9/items.json", "café/items.json"; "utf8 escape")]
    #[test_case("plain.json", "plain.json"; "no escaping")]
    fn test_key_unescaping(escaped: &str, expected: &str) {
        let event = event(vec![record(Some("landing"), Some(escaped))]);
        let object = SourceObjectRef::from_event(&event).unwrap();
        assert_eq!(object.key, expected);
    }

    #[test]
    fn test_invalid_utf8_key_is_malformed() {
        let event = event(vec![record(Some("landing"), Some("bad%FF.json"))]);
        let err = SourceObjectRef::from_event(&event).unwrap_err();
        assert!(matches!(err, Error::MalformedEvent { .. }));
    }

    #[test]
    fn test_empty_notification_is_malformed() {
        let err = SourceObjectRef::from_event(&event(vec![])).unwrap_err();
        assert!(matches!(err, Error::MalformedEvent { .. }));
    }

    #[test]
    fn test_missing_bucket_or_key_is_malformed() {
        let no_bucket = event(vec![record(None, Some("k.json"))]);
        assert!(SourceObjectRef::from_event(&no_bucket).is_err());

        let no_key = event(vec![record(Some("landing"), None)]);
        assert!(SourceObjectRef::from_event(&no_key).is_err());
    }

    #[test]
    fn test_multi_record_notification_truncates_to_first() {
        let event = event(vec![
            record(Some("landing"), Some("first.json")),
            record(Some("landing"), Some("second.json")),
        ]);
        let object = SourceObjectRef::from_event(&event).unwrap();
        assert_eq!(object.key, "first.json");
    }
}
