use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::Result;

/// Whether a write must reach stable storage before it is acknowledged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Durability {
    /// Flush and fsync before returning
    Sync,
    /// Leave the write in OS/engine buffers
    Buffered,
}

impl Durability {
    pub fn from_config(durable_writes: bool) -> Self {
        if durable_writes {
            Durability::Sync
        } else {
            Durability::Buffered
        }
    }
}

/// Key/value pair yielded by [`KvStore::scan`]
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Byte-keyed, byte-valued ordered store.
///
/// Both the primary document collection and the path-value index sit on top
/// of this trait. `scan` yields entries in ascending key order.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn set(&self, key: &[u8], value: &[u8], durability: Durability) -> Result<()>;

    fn remove(&self, key: &[u8], durability: Durability) -> Result<()>;

    fn scan(&self) -> Box<dyn Iterator<Item = Result<KvPair>> + '_>;

    /// Number of stored keys
    fn len(&self) -> Result<usize> {
        let mut count = 0;
        for kv in self.scan() {
            kv?;
            count += 1;
        }
        Ok(count)
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// In-memory ordered store.
///
/// Durability flags are accepted and ignored.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8], _durability: Durability) -> Result<()> {
        self.entries.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &[u8], _durability: Durability) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn scan(&self) -> Box<dyn Iterator<Item = Result<KvPair>> + '_> {
        // Snapshot so callers never hold the lock across their own store calls
        let snapshot: Vec<KvPair> = self
            .entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Box::new(snapshot.into_iter().map(Ok))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }
}
