//! Vitrine - paginated project gallery dashboard
//!
//! Authenticates users against a hosted users table and serves a paginated
//! gallery of project records from a second hosted table, with an embedded
//! detail view for the selected project.

pub mod access;
pub mod app;
pub mod auth;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod io;
pub mod loader;
pub mod pagination;
pub mod record;
pub mod routes;
pub mod session;

pub use config::{load_config, Config};
pub use error::{Result, VitrineError};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::app::App;
use crate::backend::TableClient;
use crate::io::ReqwestHttpClient;
use crate::loader::DataLoader;
use crate::routes::AppState;
use crate::session::SessionStore;

/// Run the vitrine service with the given (secret-resolved) configuration
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::default());
    let cancel = CancellationToken::new();

    let (auth_url, auth_key) = config.auth_backend.coordinates("auth")?;
    let auth_client = TableClient::connect(auth_url, auth_key, Arc::clone(&http));
    let users_table = config.auth_backend.table.as_deref().unwrap_or("users");

    let (data_url, data_key) = config.data_backend.coordinates("data")?;
    let data_client = TableClient::connect(data_url, data_key, Arc::clone(&http));
    let data_table = config
        .data_backend
        .table
        .as_deref()
        .unwrap_or("alura_gemini");

    let loader = DataLoader::new(
        data_client,
        data_table,
        Duration::from_secs(config.gallery.cache_ttl_seconds),
    );

    let state = AppState {
        app: Arc::new(App::new(
            auth_client,
            users_table,
            loader,
            config.gallery.page_size,
        )),
        sessions: SessionStore::new_handle(),
        gallery: config.gallery.clone(),
    };

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    let router = routes::build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| VitrineError::Config(format!("Failed to bind port {}: {}", addr.port(), e)))?;
    tracing::info!("Vitrine listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("Vitrine stopped");
    Ok(())
}
