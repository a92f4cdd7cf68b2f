use anyhow::Result;
use clap::Parser;
use docdb::{DocDb, ServerConfig, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "docdb")]
#[command(about = "JSON document store with path-value indexing", long_about = None)]
struct Args {
    /// Data directory for documents and the index
    #[arg(long, env = "DOCDB_DATA_DIR", default_value = "./docdb.data")]
    data_dir: PathBuf,

    /// HTTP API host
    #[arg(long, env = "DOCDB_BIND_HOST", default_value = "0.0.0.0")]
    bind_host: String,

    /// HTTP API port
    #[arg(long, env = "DOCDB_HTTP_PORT", default_value = "8080")]
    http_port: u16,

    /// Acknowledge writes before they are fsynced
    #[arg(long, env = "DOCDB_NO_DURABLE_WRITES")]
    no_durable_writes: bool,

    /// Lock stripes serializing index entry updates (1 = single global lock)
    #[arg(long, env = "DOCDB_INDEX_LOCK_STRIPES", default_value = "64")]
    index_lock_stripes: usize,

    /// Skip rebuilding the index from the stored documents at startup
    #[arg(long, env = "DOCDB_SKIP_REINDEX")]
    skip_reindex: bool,

    /// Keep everything in memory instead of under --data-dir
    #[arg(long, env = "DOCDB_IN_MEMORY")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting docdb v{}", docdb::VERSION);

    let store_config = StoreConfig::new(args.data_dir.clone())
        .with_durable_writes(!args.no_durable_writes)
        .with_lock_stripes(args.index_lock_stripes);
    let server_config = ServerConfig::new(&args.bind_host, args.http_port)
        .with_reindex_on_startup(!args.skip_reindex);

    info!("Store configuration:");
    info!("  Data directory: {:?}", store_config.data_dir);
    info!("  Durable writes: {}", store_config.durable_writes);
    info!("  Index lock stripes: {}", store_config.index_lock_stripes);
    info!("  In memory: {}", args.in_memory);

    let db = if args.in_memory {
        DocDb::in_memory(&store_config)?
    } else {
        DocDb::open(&store_config)?
    };
    let db = Arc::new(db);

    if server_config.reindex_on_startup {
        info!("Indexing DB...");
        let report = db.reindex()?;
        info!(
            "Done indexing: {} documents indexed, {} skipped",
            report.indexed, report.skipped
        );
    }

    let app = docdb::create_router(docdb::AppState::new(db));
    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    info!("HTTP API server listening on {}", server_config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received shutdown signal, gracefully shutting down");
        })
        .await?;

    Ok(())
}
