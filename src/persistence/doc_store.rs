use std::sync::Arc;

use crate::error::DocdbError;
use crate::models::{Document, DocumentId};
use crate::persistence::kv::{Durability, KvStore};
use crate::Result;

/// Primary document collection: `id -> JSON bytes`.
pub struct DocStore {
    store: Arc<dyn KvStore>,
    durability: Durability,
}

/// Raw entry yielded while scanning the collection.
///
/// The body is left undecoded so callers can choose how to treat bad bytes.
pub struct RawDocument {
    pub id: DocumentId,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn decode(&self) -> Result<Document> {
        serde_json::from_slice(&self.bytes).map_err(DocdbError::Decode)
    }
}

impl DocStore {
    pub fn new(store: Arc<dyn KvStore>, durability: Durability) -> Self {
        Self { store, durability }
    }

    /// Persist a document under `id`.
    pub fn put_document(&self, id: &str, doc: &Document) -> Result<()> {
        let payload = serde_json::to_vec(doc).map_err(DocdbError::Decode)?;
        self.store.set(id.as_bytes(), &payload, self.durability)
    }

    pub fn get_document(&self, id: &str) -> Result<Document> {
        let Some(bytes) = self.store.get(id.as_bytes())? else {
            return Err(DocdbError::DocumentNotFound(id.to_string()));
        };
        serde_json::from_slice(&bytes).map_err(DocdbError::Decode)
    }

    pub fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.store.get(id.as_bytes())?.is_some())
    }

    /// Iterate every stored document in id order.
    pub fn scan(&self) -> impl Iterator<Item = Result<RawDocument>> + '_ {
        self.store.scan().map(|kv| {
            let (key, bytes) = kv?;
            let id = String::from_utf8(key).map_err(|e| {
                DocdbError::Storage(format!("document key is not valid UTF-8: {}", e))
            })?;
            Ok(RawDocument { id, bytes })
        })
    }

    pub fn count(&self) -> Result<usize> {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document_from_value;
    use crate::persistence::MemoryStore;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        document_from_value(value).unwrap()
    }

    fn store() -> (Arc<MemoryStore>, DocStore) {
        let kv = Arc::new(MemoryStore::new());
        let docs = DocStore::new(kv.clone(), Durability::Sync);
        (kv, docs)
    }

    #[test]
    fn test_put_and_get_document() {
        let (_kv, docs) = store();
        let body = doc(json!({"a": 1, "b": {"c": "x"}}));

        docs.put_document("id-1", &body).unwrap();
        assert_eq!(docs.get_document("id-1").unwrap(), body);
        assert!(docs.exists("id-1").unwrap());
        assert_eq!(docs.count().unwrap(), 1);
    }

    #[test]
    fn test_missing_document() {
        let (_kv, docs) = store();
        let err = docs.get_document("nope").unwrap_err();
        assert!(matches!(err, DocdbError::DocumentNotFound(id) if id == "nope"));
    }

    #[test]
    fn test_corrupt_document_is_decode_error() {
        let (kv, docs) = store();
        kv.set(b"bad", b"{not json", Durability::Sync).unwrap();

        assert!(matches!(
            docs.get_document("bad").unwrap_err(),
            DocdbError::Decode(_)
        ));

        let raw: Vec<RawDocument> = docs.scan().collect::<Result<_>>().unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].id, "bad");
        assert!(raw[0].decode().is_err());
    }
}
