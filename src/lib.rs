pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod persistence;
pub mod query;

pub use api::{create_router, AppState};
pub use config::{ServerConfig, StoreConfig};
pub use engine::DocDb;
pub use error::{DocdbError, Result};
pub use metrics::DocdbMetrics;
pub use models::*;
pub use query::{parse_query, Query};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
