//! Legacy Vault server

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use legacy_vault::{
    config::Args,
    db::{DocumentStore, MemoryStore, MongoStore},
    logging, server, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, args.log_format)?;

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Legacy Vault");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("Page: {:?}, margin {}pt", args.page_size, args.page_margin);
    info!("======================================");

    let store: Arc<dyn DocumentStore> = match &args.mongodb_uri {
        Some(uri) => match MongoStore::connect(uri, &args.mongodb_db).await {
            Ok(store) => {
                info!("MongoDB connected successfully");
                Arc::new(store)
            }
            Err(e) if args.dev_mode => {
                warn!("MongoDB connection failed (dev mode, using in-memory store): {}", e);
                Arc::new(MemoryStore::new())
            }
            Err(e) => {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            warn!("No MONGODB_URI configured; records are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let state = Arc::new(AppState::new(args, store)?);
    server::run(state).await?;

    Ok(())
}
