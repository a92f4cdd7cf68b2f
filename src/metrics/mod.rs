use prometheus::{Counter, CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry};
use std::sync::Arc;

use crate::models::SearchStrategy;

/// Prometheus metrics for the document store
#[derive(Clone)]
pub struct DocdbMetrics {
    // Counters
    pub documents_added: Counter,
    pub index_failures: Counter,
    pub searches_total: CounterVec,
    pub search_errors: Counter,

    // Gauges
    pub total_documents: Gauge,

    // Histograms
    pub search_latency: HistogramVec,

    registry: Arc<Registry>,
}

impl DocdbMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let documents_added = Counter::with_opts(Opts::new(
            "docdb_documents_added_total",
            "Total number of documents added",
        ))?;
        registry.register(Box::new(documents_added.clone()))?;

        let index_failures = Counter::with_opts(Opts::new(
            "docdb_index_failures_total",
            "Documents stored without a complete index update",
        ))?;
        registry.register(Box::new(index_failures.clone()))?;

        let searches_total = CounterVec::new(
            Opts::new("docdb_searches_total", "Total number of searches by strategy"),
            &["strategy"],
        )?;
        registry.register(Box::new(searches_total.clone()))?;

        let search_errors = Counter::with_opts(Opts::new(
            "docdb_search_errors_total",
            "Total number of failed searches",
        ))?;
        registry.register(Box::new(search_errors.clone()))?;

        let total_documents = Gauge::with_opts(Opts::new(
            "docdb_documents",
            "Number of documents in the primary collection",
        ))?;
        registry.register(Box::new(total_documents.clone()))?;

        let search_latency = HistogramVec::new(
            HistogramOpts::new("docdb_search_latency_seconds", "Search latency by strategy")
                .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]),
            &["strategy"],
        )?;
        registry.register(Box::new(search_latency.clone()))?;

        Ok(Self {
            documents_added,
            index_failures,
            searches_total,
            search_errors,
            total_documents,
            search_latency,
            registry: Arc::new(registry),
        })
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn record_added(&self) {
        self.documents_added.inc();
        self.total_documents.inc();
    }

    pub fn record_index_failure(&self) {
        self.index_failures.inc();
    }

    pub fn record_search(&self, strategy: SearchStrategy, duration_secs: f64) {
        self.searches_total
            .with_label_values(&[strategy.as_str()])
            .inc();
        self.search_latency
            .with_label_values(&[strategy.as_str()])
            .observe(duration_secs);
    }

    pub fn record_search_error(&self) {
        self.search_errors.inc();
    }

    pub fn set_total_documents(&self, count: u64) {
        self.total_documents.set(count as f64);
    }

    /// Render all metrics in the Prometheus text format
    pub fn encode_text(&self) -> Result<Vec<u8>, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}
