// Typed record <-> `Document` conversion shared by the recipe store and
// the shopping-list aggregator.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;
use crate::store::{Document, StoreError, StoredDocument};

pub(crate) fn to_document<T: Serialize>(collection: &str, record: &T) -> Result<Document, CoreError> {
    match serde_json::to_value(record).map_err(StoreError::from)? {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::MalformedRecord {
            collection: collection.into(),
            reason: format!("record encoded as {other}, expected an object"),
        }),
    }
}

pub(crate) fn from_document<T: DeserializeOwned>(
    collection: &str,
    stored: StoredDocument,
) -> Result<T, CoreError> {
    let key = stored.id;
    serde_json::from_value(Value::Object(stored.doc)).map_err(|e| CoreError::MalformedRecord {
        collection: collection.into(),
        reason: format!("document {key}: {e}"),
    })
}
