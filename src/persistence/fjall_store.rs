use std::path::Path;

use fjall::{Database, Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::error::DocdbError;
use crate::persistence::kv::{Durability, KvPair, KvStore};
use crate::Result;

/// Open (or create) the fjall database that hosts every keyspace.
pub fn open_database(base_dir: &Path) -> Result<Database> {
    std::fs::create_dir_all(base_dir).map_err(DocdbError::Io)?;
    Database::builder(base_dir)
        .open()
        .map_err(|e| DocdbError::Storage(format!("failed to open fjall database: {}", e)))
}

/// A single fjall keyspace exposed through [`KvStore`].
#[derive(Clone)]
pub struct FjallStore {
    name: String,
    db: Database,
    keyspace: Keyspace,
}

impl FjallStore {
    pub fn open(db: &Database, name: &str) -> Result<Self> {
        let keyspace = db
            .keyspace(name, || KeyspaceCreateOptions::default())
            .map_err(|e| DocdbError::Storage(format!("failed to open {} keyspace: {}", name, e)))?;

        Ok(Self {
            name: name.to_string(),
            db: db.clone(),
            keyspace,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn persist(&self, durability: Durability) -> Result<()> {
        if durability == Durability::Sync {
            self.db
                .persist(PersistMode::SyncAll)
                .map_err(|e| DocdbError::Storage(format!("failed to sync {}: {}", self.name, e)))?;
        }
        Ok(())
    }
}

impl KvStore for FjallStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self
            .keyspace
            .get(key)
            .map_err(|e| DocdbError::Storage(e.to_string()))?
            .map(|val| val.as_ref().to_vec()))
    }

    fn set(&self, key: &[u8], value: &[u8], durability: Durability) -> Result<()> {
        self.keyspace
            .insert(key, value)
            .map_err(|e| DocdbError::Storage(e.to_string()))?;
        self.persist(durability)
    }

    fn remove(&self, key: &[u8], durability: Durability) -> Result<()> {
        self.keyspace
            .remove(key)
            .map_err(|e| DocdbError::Storage(e.to_string()))?;
        self.persist(durability)
    }

    fn scan(&self) -> Box<dyn Iterator<Item = Result<KvPair>> + '_> {
        let iter = self.keyspace.iter().filter_map(move |kv| {
            let key = match kv.key() {
                Ok(key) => key.as_ref().to_vec(),
                Err(e) => return Some(Err(DocdbError::Storage(e.to_string()))),
            };
            // A key removed between the iterator step and the read is skipped
            match self.keyspace.get(&key) {
                Ok(Some(val)) => Some(Ok((key, val.as_ref().to_vec()))),
                Ok(None) => None,
                Err(e) => Some(Err(DocdbError::Storage(e.to_string()))),
            }
        });
        Box::new(iter)
    }
}
