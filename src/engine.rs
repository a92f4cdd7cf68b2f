//! Document database: primary collection, path-value index and the search
//! strategy that combines them.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::error::{DocdbError, Result};
use crate::index::PathIndex;
use crate::metrics::DocdbMetrics;
use crate::models::*;
use crate::persistence::{open_database, DocStore, Durability, FjallStore, KvStore, MemoryStore};
use crate::query::{parse_query, Query, QueryPlan};

pub struct DocDb {
    docs: DocStore,
    index: PathIndex,
    metrics: DocdbMetrics,
    verify_index_hits: bool,
}

impl DocDb {
    /// Open the on-disk database under `config.data_dir`.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let db = open_database(&config.data_dir)?;
        let docs = FjallStore::open(&db, config.docs_keyspace())?;
        let index = FjallStore::open(&db, config.index_keyspace())?;
        info!(data_dir = ?config.data_dir, "Opened document store");
        Self::with_stores(Arc::new(docs), Arc::new(index), config)
    }

    /// Database backed by in-memory stores; contents are lost on drop.
    pub fn in_memory(config: &StoreConfig) -> Result<Self> {
        Self::with_stores(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            config,
        )
    }

    pub fn with_stores(
        docs: Arc<dyn KvStore>,
        index: Arc<dyn KvStore>,
        config: &StoreConfig,
    ) -> Result<Self> {
        let durability = Durability::from_config(config.durable_writes);
        let metrics = DocdbMetrics::new()
            .map_err(|e| DocdbError::Internal(format!("failed to create metrics: {}", e)))?;

        let db = Self {
            docs: DocStore::new(docs, durability),
            index: PathIndex::new(index, durability, config.index_lock_stripes),
            metrics,
            verify_index_hits: config.verify_index_hits,
        };
        db.metrics.set_total_documents(db.docs.count()? as u64);
        Ok(db)
    }

    pub fn metrics(&self) -> &DocdbMetrics {
        &self.metrics
    }

    pub fn path_index(&self) -> &PathIndex {
        &self.index
    }

    /// Store a new document and index it, returning its id.
    ///
    /// The document is written first. If indexing then fails the document
    /// stays stored but unindexed until the next reindex; the failure is
    /// logged and the call still succeeds.
    pub fn add_document(&self, body: Value) -> Result<DocumentId> {
        let doc = document_from_value(body).ok_or_else(|| {
            DocdbError::InvalidDocument("document must be a JSON object".to_string())
        })?;

        let id = new_document_id();
        self.docs.put_document(&id, &doc)?;
        self.metrics.record_added();

        if let Err(e) = self.index.add_to_index(&id, &doc) {
            error!(doc_id = %id, error = %e, "Failed to index document");
            self.metrics.record_index_failure();
        }

        debug!(doc_id = %id, "Added document");
        Ok(id)
    }

    pub fn get_document(&self, id: &str) -> Result<Document> {
        self.docs.get_document(id)
    }

    pub fn document_count(&self) -> Result<usize> {
        self.docs.count()
    }

    /// Parse `query_text` and run it.
    ///
    /// With `allow_index` false the index is never consulted.
    pub fn search(&self, query_text: &str, allow_index: bool) -> Result<SearchOutcome> {
        let start = Instant::now();
        let result = parse_query(query_text).and_then(|query| self.search_query(&query, allow_index));

        match &result {
            Ok(outcome) => {
                self.metrics
                    .record_search(outcome.strategy, start.elapsed().as_secs_f64());
            }
            Err(_) => self.metrics.record_search_error(),
        }
        result
    }

    /// Run an already parsed query.
    ///
    /// Equality terms are intersected through the index. When that yields
    /// candidates, only those documents are fetched and (if range terms
    /// exist) checked by the matcher. When it yields nothing, or the index
    /// cannot be used, every stored document goes through the matcher.
    pub fn search_query(&self, query: &Query, allow_index: bool) -> Result<SearchOutcome> {
        let plan = QueryPlan::new(query);

        if allow_index && plan.can_use_index() {
            let candidates = self.index_candidates(&plan)?;
            if !candidates.is_empty() {
                debug!(
                    candidates = candidates.len(),
                    has_range = plan.has_range(),
                    "Searching with index"
                );
                let verify = plan.has_range() || self.verify_index_hits;
                let hits = self.fetch_candidates(query, candidates, verify)?;
                return Ok(SearchOutcome {
                    hits,
                    strategy: SearchStrategy::Index,
                });
            }
            debug!("Index produced no candidates, falling back to full scan");
        }

        self.full_scan(query)
    }

    /// Ids present in the entry of every equality predicate.
    fn index_candidates(&self, plan: &QueryPlan<'_>) -> Result<Vec<DocumentId>> {
        let required = plan.equality_count();
        let mut counts: BTreeMap<DocumentId, usize> = BTreeMap::new();

        for path_value in plan.path_values() {
            for id in self.index.lookup(path_value)? {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        Ok(counts
            .into_iter()
            .filter(|(_, count)| *count == required)
            .map(|(id, _)| id)
            .collect())
    }

    fn fetch_candidates(
        &self,
        query: &Query,
        candidates: Vec<DocumentId>,
        verify: bool,
    ) -> Result<Vec<SearchHit>> {
        let mut hits = Vec::with_capacity(candidates.len());
        for id in candidates {
            let body = match self.docs.get_document(&id) {
                Ok(body) => body,
                Err(DocdbError::DocumentNotFound(_)) => {
                    warn!(doc_id = %id, "Index references a missing document");
                    continue;
                }
                Err(e) => return Err(e),
            };
            if !verify || query.matches(&body) {
                hits.push(SearchHit { id, body });
            }
        }
        Ok(hits)
    }

    fn full_scan(&self, query: &Query) -> Result<SearchOutcome> {
        let mut hits = Vec::new();
        for raw in self.docs.scan() {
            let raw = raw?;
            let body = raw.decode()?;
            if query.matches(&body) {
                hits.push(SearchHit { id: raw.id, body });
            }
        }
        Ok(SearchOutcome {
            hits,
            strategy: SearchStrategy::FullScan,
        })
    }

    /// Re-run indexing for every stored document.
    ///
    /// Documents whose bytes do not decode are logged and skipped. Any store
    /// failure aborts the pass.
    pub fn reindex(&self) -> Result<ReindexReport> {
        let start = Instant::now();
        let mut report = ReindexReport::default();

        for raw in self.docs.scan() {
            let raw = raw?;
            match raw.decode() {
                Ok(doc) => {
                    self.index.add_to_index(&raw.id, &doc)?;
                    report.indexed += 1;
                }
                Err(e) => {
                    warn!(doc_id = %raw.id, error = %e, "Unable to parse stored document, skipping");
                    report.skipped += 1;
                }
            }
        }

        self.metrics
            .set_total_documents(report.indexed + report.skipped);
        info!(
            indexed = report.indexed,
            skipped = report.skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Reindex complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::KvPair;
    use serde_json::json;

    fn db() -> DocDb {
        DocDb::in_memory(&StoreConfig::default()).unwrap()
    }

    fn ids(outcome: &SearchOutcome) -> Vec<String> {
        let mut ids: Vec<String> = outcome.hits.iter().map(|h| h.id.clone()).collect();
        ids.sort();
        ids
    }

    /// Index store whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    impl KvStore for ReadOnlyStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
            self.0.get(key)
        }

        fn set(&self, _key: &[u8], _value: &[u8], _durability: Durability) -> Result<()> {
            Err(DocdbError::Storage("read-only store".to_string()))
        }

        fn remove(&self, _key: &[u8], _durability: Durability) -> Result<()> {
            Err(DocdbError::Storage("read-only store".to_string()))
        }

        fn scan(&self) -> Box<dyn Iterator<Item = Result<KvPair>> + '_> {
            self.0.scan()
        }
    }

    #[test]
    fn test_add_and_get() {
        let db = db();
        let id = db.add_document(json!({"a": 1, "b": {"c": 2}})).unwrap();

        let doc = db.get_document(&id).unwrap();
        assert_eq!(Value::Object(doc), json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(db.document_count().unwrap(), 1);
        assert!(db.path_index().lookup("b.c=2").unwrap().contains(&id));
    }

    #[test]
    fn test_add_rejects_non_objects() {
        let db = db();
        let err = db.add_document(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, DocdbError::InvalidDocument(_)));
        assert_eq!(db.document_count().unwrap(), 0);
    }

    #[test]
    fn test_get_missing_document() {
        assert!(matches!(
            db().get_document("missing").unwrap_err(),
            DocdbError::DocumentNotFound(_)
        ));
    }

    #[test]
    fn test_equality_search_uses_index() {
        let db = db();
        let id = db.add_document(json!({"a": 1, "b": {"c": 2}})).unwrap();
        db.add_document(json!({"a": 1, "b": {"c": 3}})).unwrap();

        let outcome = db.search("b.c:2", true).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::Index);
        assert_eq!(ids(&outcome), vec![id]);
    }

    #[test]
    fn test_intersection_of_equality_terms() {
        let db = db();
        let both = db.add_document(json!({"a": 1, "b": 2})).unwrap();
        db.add_document(json!({"a": 1, "b": 3})).unwrap();
        db.add_document(json!({"a": 2, "b": 2})).unwrap();

        let outcome = db.search("a:1 b:2", true).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::Index);
        assert_eq!(ids(&outcome), vec![both]);
    }

    #[test]
    fn test_index_candidates_are_checked_against_range_terms() {
        let db = db();
        let cheap = db.add_document(json!({"kind": "book", "price": 5})).unwrap();
        db.add_document(json!({"kind": "book", "price": 50})).unwrap();

        let outcome = db.search("kind:book price:<10", true).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::Index);
        assert_eq!(ids(&outcome), vec![cheap]);
    }

    #[test]
    fn test_range_only_query_scans() {
        let db = db();
        db.add_document(json!({"n": 1})).unwrap();
        let big = db.add_document(json!({"n": 10})).unwrap();

        let outcome = db.search("n:>5", true).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::FullScan);
        assert_eq!(ids(&outcome), vec![big]);
    }

    #[test]
    fn test_no_index_candidates_falls_back_to_scan() {
        let db = db();
        db.add_document(json!({"a": 1})).unwrap();

        let outcome = db.search("a:2", true).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::FullScan);
        assert_eq!(outcome.count(), 0);
    }

    #[test]
    fn test_skip_index_forces_scan() {
        let db = db();
        let id = db.add_document(json!({"a": 1})).unwrap();

        let outcome = db.search("a:1", false).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::FullScan);
        assert_eq!(ids(&outcome), vec![id]);
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let db = db();
        db.add_document(json!({"a": 1})).unwrap();
        db.add_document(json!({"b": 2})).unwrap();

        let outcome = db.search("", true).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::FullScan);
        assert_eq!(outcome.count(), 2);
    }

    #[test]
    fn test_dotted_document_keys_do_not_leak_through_index() {
        let db = db();
        db.add_document(json!({"a.b": 1})).unwrap();
        let nested = db.add_document(json!({"a": {"b": 1}})).unwrap();

        let indexed = db.search("a.b:1", true).unwrap();
        let scanned = db.search("a.b:1", false).unwrap();
        assert_eq!(ids(&indexed), vec![nested]);
        assert_eq!(ids(&indexed), ids(&scanned));
    }

    #[test]
    fn test_unverified_index_hits_trust_the_index() {
        let db = DocDb::in_memory(&StoreConfig::default().with_verify_index_hits(false)).unwrap();
        db.add_document(json!({"a.b": 1})).unwrap();

        // The flattened key collides with the nested path and is accepted as is
        let outcome = db.search("a.b:1", true).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::Index);
        assert_eq!(outcome.count(), 1);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let db = db();
        assert!(matches!(
            db.search("a1", true).unwrap_err(),
            DocdbError::QueryParse(_)
        ));
        assert_eq!(db.metrics().search_errors.get(), 1.0);
    }

    #[test]
    fn test_index_failure_keeps_document() {
        let config = StoreConfig::default();
        let db = DocDb::with_stores(
            Arc::new(MemoryStore::new()),
            Arc::new(ReadOnlyStore(MemoryStore::new())),
            &config,
        )
        .unwrap();

        let id = db.add_document(json!({"a": 1})).unwrap();
        assert!(db.get_document(&id).is_ok());
        assert_eq!(db.metrics().index_failures.get(), 1.0);

        // Unindexed documents are still found by the scan fallback
        let outcome = db.search("a:1", true).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::FullScan);
        assert_eq!(ids(&outcome), vec![id]);
    }

    #[test]
    fn test_reindex_recovers_missing_entries_and_skips_bad_documents() {
        let docs = Arc::new(MemoryStore::new());
        docs.set(b"good", br#"{"a":{"b":1}}"#, Durability::Sync).unwrap();
        docs.set(b"bad", b"not json", Durability::Sync).unwrap();

        let db = DocDb::with_stores(docs, Arc::new(MemoryStore::new()), &StoreConfig::default())
            .unwrap();
        assert!(db.path_index().lookup("a.b=1").unwrap().is_empty());

        let report = db.reindex().unwrap();
        assert_eq!(report, ReindexReport { indexed: 1, skipped: 1 });
        assert!(db.path_index().lookup("a.b=1").unwrap().contains("good"));

        // Running it again changes nothing
        db.reindex().unwrap();
        assert_eq!(db.path_index().lookup("a.b=1").unwrap().len(), 1);
    }

    #[test]
    fn test_full_scan_surfaces_corrupt_documents() {
        let docs = Arc::new(MemoryStore::new());
        docs.set(b"bad", b"not json", Durability::Sync).unwrap();
        let db = DocDb::with_stores(docs, Arc::new(MemoryStore::new()), &StoreConfig::default())
            .unwrap();

        assert!(matches!(
            db.search("a:1", false).unwrap_err(),
            DocdbError::Decode(_)
        ));
    }

    #[test]
    fn test_dangling_index_entries_are_skipped() {
        let db = db();
        db.path_index().merge_id("a=1", "ghost").unwrap();
        let real = db.add_document(json!({"a": 1})).unwrap();

        let outcome = db.search("a:1", true).unwrap();
        assert_eq!(outcome.strategy, SearchStrategy::Index);
        assert_eq!(ids(&outcome), vec![real]);
    }
}
