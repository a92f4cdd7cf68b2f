use serde_json::{Map, Value};

/// Unique document identifier (UUID v4 string)
pub type DocumentId = String;

/// Document body: a JSON object of arbitrarily nested values
pub type Document = Map<String, Value>;

/// Generate a fresh document id
pub fn new_document_id() -> DocumentId {
    uuid::Uuid::new_v4().to_string()
}

/// Convert an arbitrary JSON value into a document, rejecting non-objects
pub fn document_from_value(value: Value) -> Option<Document> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
