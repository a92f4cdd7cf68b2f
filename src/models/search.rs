use serde::{Deserialize, Serialize};

use super::document::{Document, DocumentId};

/// One document returned by a search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocumentId,
    pub body: Document,
}

/// How a search found its candidates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Equality predicates were resolved through the path-value index
    Index,
    /// Every stored document was run through the matcher
    FullScan,
}

impl SearchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Index => "index",
            SearchStrategy::FullScan => "full_scan",
        }
    }
}

/// Search results with the strategy that produced them
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub strategy: SearchStrategy,
}

impl SearchOutcome {
    pub fn count(&self) -> usize {
        self.hits.len()
    }
}

/// Summary of a reindex pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReindexReport {
    /// Documents whose path-values were merged into the index
    pub indexed: u64,
    /// Documents skipped because their stored bytes did not decode
    pub skipped: u64,
}
