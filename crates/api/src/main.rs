use std::net::SocketAddr;
use std::sync::Arc;

use fintrack_api::config::{BlobBackend, ServerConfig};
use fintrack_api::router::build_app_router;
use fintrack_api::services::auth::seed_default_admin;
use fintrack_api::state::AppState;
use fintrack_api::storage::{BlobStore, MemoryBlobStore, S3BlobStore};
use fintrack_db::repositories::{MemoryStore, Repositories};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fintrack_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let (pool, repos) = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = fintrack_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            fintrack_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            fintrack_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let repos = Repositories::postgres(pool.clone());
            (Some(pool), repos)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store; data is lost on exit");
            (None, Repositories::in_memory(Arc::new(MemoryStore::new())))
        }
    };

    // --- Blob storage ---
    let blobs: Arc<dyn BlobStore> = match config.blob.backend {
        BlobBackend::S3 => Arc::new(
            S3BlobStore::from_env(config.blob.bucket.clone(), config.blob.public_base_url.clone())
                .await,
        ),
        BlobBackend::Memory => Arc::new(MemoryBlobStore::new(config.blob.public_base_url.clone())),
    };
    tracing::info!(backend = blobs.backend_name(), "Blob store ready");

    // --- Default administrator ---
    if let Some(admin) = &config.default_admin {
        if let Err(e) = seed_default_admin(&repos, admin).await {
            tracing::error!(error = %e, "Failed to seed default administrator");
        }
    }

    // --- App state and router ---
    let state = AppState::new(config.clone(), pool, repos, blobs);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
