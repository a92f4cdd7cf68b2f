//! Persistence primitives: the ordered key/value abstraction, its fjall and
//! in-memory backends, and the primary document collection.

mod doc_store;
mod fjall_store;
mod kv;

pub use doc_store::{DocStore, RawDocument};
pub use fjall_store::{open_database, FjallStore};
pub use kv::{Durability, KvPair, KvStore, MemoryStore};
