use crate::db::Document;
use crate::error::Error;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub mod accounts;
pub mod issues;
pub mod machines;

/// Serialize a model into a store document
pub(crate) fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::Serialization("Expected an object document".to_string()).into()),
        Err(e) => Err(Error::Serialization(format!("Failed to serialize document: {}", e)).into()),
    }
}

/// Deserialize a store document back into a model
pub(crate) fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T> {
    serde_json::from_value(Value::Object(doc))
        .map_err(|e| Error::Serialization(format!("Failed to deserialize document: {}", e)).into())
}
