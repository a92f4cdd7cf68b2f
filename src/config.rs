use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DOCS_KEYSPACE: &str = "docs";
const INDEX_KEYSPACE: &str = "path_index";

/// Storage configuration for the document collection and its index
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    /// Fsync every document and index write before acknowledging it
    pub durable_writes: bool,
    /// Number of lock slots guarding index read-modify-write cycles
    pub index_lock_stripes: usize,
    /// Run the matcher over index hits even when the query has no range terms
    pub verify_index_hits: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./docdb.data"),
            durable_writes: true,
            index_lock_stripes: 64,
            verify_index_hits: true,
        }
    }
}

impl StoreConfig {
    /// Create a store configuration rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_durable_writes(mut self, durable: bool) -> Self {
        self.durable_writes = durable;
        self
    }

    /// Set the number of index lock stripes (clamped to at least one)
    pub fn with_lock_stripes(mut self, stripes: usize) -> Self {
        self.index_lock_stripes = stripes.max(1);
        self
    }

    pub fn with_verify_index_hits(mut self, verify: bool) -> Self {
        self.verify_index_hits = verify;
        self
    }

    pub fn docs_keyspace(&self) -> &'static str {
        DOCS_KEYSPACE
    }

    pub fn index_keyspace(&self) -> &'static str {
        INDEX_KEYSPACE
    }
}

/// HTTP server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub reindex_on_startup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            reindex_on_startup: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            bind_addr: format!("{}:{}", host, port),
            ..Default::default()
        }
    }

    pub fn with_reindex_on_startup(mut self, reindex: bool) -> Self {
        self.reindex_on_startup = reindex;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let store = StoreConfig::default();
        assert!(store.durable_writes);
        assert_eq!(store.index_lock_stripes, 64);
        assert!(store.verify_index_hits);
        assert_eq!(store.data_dir, PathBuf::from("./docdb.data"));

        let server = ServerConfig::default();
        assert_eq!(server.bind_addr, "0.0.0.0:8080");
        assert!(server.reindex_on_startup);
    }

    #[test]
    fn test_store_config_builder() {
        let config = StoreConfig::new("/tmp/db")
            .with_durable_writes(false)
            .with_lock_stripes(0)
            .with_verify_index_hits(false);

        assert_eq!(config.data_dir, PathBuf::from("/tmp/db"));
        assert!(!config.durable_writes);
        assert_eq!(config.index_lock_stripes, 1);
        assert!(!config.verify_index_hits);
        assert_ne!(config.docs_keyspace(), config.index_keyspace());
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::new("127.0.0.1", 9000).with_reindex_on_startup(false);
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert!(!config.reindex_on_startup);
    }
}
