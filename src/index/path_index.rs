//! Inverted index from `path=value` strings to the ids of the documents that
//! contain them.
//!
//! Each entry is one key in the index store holding a bincode-encoded
//! [`IdSet`]. Updates are read-modify-write cycles; concurrent writers on the
//! same key are serialized through a striped lock table so no id is lost.

use std::collections::BTreeSet;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::index::flatten::flatten;
use crate::models::{Document, DocumentId};
use crate::persistence::{Durability, KvStore};
use crate::Result;

/// Set of document ids stored under one path-value
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSet {
    ids: BTreeSet<DocumentId>,
}

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id, returning false if it was already present
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentId> {
        self.ids.iter()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl IntoIterator for IdSet {
    type Item = DocumentId;
    type IntoIter = std::collections::btree_set::IntoIter<DocumentId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl FromIterator<DocumentId> for IdSet {
    fn from_iter<I: IntoIterator<Item = DocumentId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Path-value inverted index over a [`KvStore`]
pub struct PathIndex {
    store: Arc<dyn KvStore>,
    durability: Durability,
    stripes: Vec<Mutex<()>>,
    hasher: RandomState,
}

impl PathIndex {
    pub fn new(store: Arc<dyn KvStore>, durability: Durability, lock_stripes: usize) -> Self {
        let stripes = (0..lock_stripes.max(1)).map(|_| Mutex::new(())).collect();
        Self {
            store,
            durability,
            stripes,
            hasher: RandomState::new(),
        }
    }

    fn stripe_for(&self, path_value: &str) -> &Mutex<()> {
        let slot = self.hasher.hash_one(path_value) as usize % self.stripes.len();
        &self.stripes[slot]
    }

    /// Merge `id` into the entry of every path-value of `doc`.
    ///
    /// Stops at the first read or write failure; entries already merged stay
    /// merged. Returns the number of entries that gained the id.
    pub fn add_to_index(&self, id: &str, doc: &Document) -> Result<usize> {
        let mut added = 0;
        for path_value in flatten(doc) {
            if self.merge_id(&path_value, id)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove `id` from the entry of every path-value of `doc`.
    ///
    /// Entries left empty are deleted. Returns the number of entries touched.
    pub fn remove_from_index(&self, id: &str, doc: &Document) -> Result<usize> {
        let mut removed = 0;
        for path_value in flatten(doc) {
            if self.retract_id(&path_value, id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Add `id` to a single entry, returning false when it was already there.
    pub fn merge_id(&self, path_value: &str, id: &str) -> Result<bool> {
        let _guard = self.stripe_for(path_value).lock();

        let mut ids = self.read_entry(path_value)?;
        if !ids.insert(id) {
            return Ok(false);
        }
        self.store
            .set(path_value.as_bytes(), &ids.encode()?, self.durability)?;
        Ok(true)
    }

    fn retract_id(&self, path_value: &str, id: &str) -> Result<bool> {
        let _guard = self.stripe_for(path_value).lock();

        let mut ids = self.read_entry(path_value)?;
        if !ids.remove(id) {
            return Ok(false);
        }
        if ids.is_empty() {
            self.store.remove(path_value.as_bytes(), self.durability)?;
        } else {
            self.store
                .set(path_value.as_bytes(), &ids.encode()?, self.durability)?;
        }
        Ok(true)
    }

    /// Ids of the documents containing `path_value`; empty when unknown.
    pub fn lookup(&self, path_value: &str) -> Result<IdSet> {
        self.read_entry(path_value)
    }

    fn read_entry(&self, path_value: &str) -> Result<IdSet> {
        match self.store.get(path_value.as_bytes())? {
            Some(bytes) => IdSet::decode(&bytes),
            None => Ok(IdSet::new()),
        }
    }

    /// Number of distinct path-values in the index
    pub fn entry_count(&self) -> Result<usize> {
        self.store.len()
    }
}
