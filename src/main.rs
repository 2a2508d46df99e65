use anyhow::Result;
use easy_share::{
    config::{self, StoreBackend},
    services::{
        assets::AssetServer, disk_store::DiskObjectStore, memory_store::MemoryObjectStore,
        object_store::SharedStore,
    },
    state::{AppState, UploadSettings},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{fs, io::ErrorKind, path::Path, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + migrate flag ---
    let (cfg, migrate) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting easy-share with config: {:?}", cfg);

    if migrate {
        let db = connect_sqlite(&cfg.database_url).await?;
        DiskObjectStore::migrate(&db).await?;
        tracing::info!("Database migration complete.");
        return Ok(()); // exit after migration
    }

    // --- Initialize object store ---
    let store: SharedStore = match cfg.backend {
        StoreBackend::Disk => {
            if !Path::new(&cfg.storage_dir).exists() {
                fs::create_dir_all(&cfg.storage_dir)?;
                tracing::info!("Created storage directory at {}", cfg.storage_dir);
            }
            let db = connect_sqlite(&cfg.database_url).await?;
            DiskObjectStore::migrate(&db).await?;
            Arc::new(DiskObjectStore::new(Arc::new(db), cfg.storage_dir.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory object store; uploads are lost on restart");
            Arc::new(MemoryObjectStore::new())
        }
    };

    if !Path::new(&cfg.assets_dir).join("index.html").exists() {
        tracing::warn!("No index.html under {}; static pages will 404", cfg.assets_dir);
    }

    // --- Build router ---
    let state = AppState::new(
        store,
        AssetServer::new(cfg.assets_dir.clone()),
        UploadSettings::from_config(&cfg),
    );
    let app = easy_share::app(state);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the SQLite pool, creating the database file and its parent
/// directory when missing.
async fn connect_sqlite(db_url: &str) -> Result<sqlx::SqlitePool> {
    let db_path = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .trim_start_matches("file:");
    tracing::debug!("Interpreted SQLite path => {}", db_path);

    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            tracing::info!("Created missing directory {:?}", parent);
        }
    }

    let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}
