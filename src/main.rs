//! Game catalog binary entrypoint wiring configuration, the SQLite store and the HTTP layer.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use game_catalog::{
    config::AppConfig,
    dao::catalog_store::{
        CatalogStore,
        sqlite::{SqliteCatalogStore, SqliteConfig},
    },
    routes,
    state::{AppState, SessionRegistry, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();

    let sqlite_config =
        SqliteConfig::from_url(&config.database_url).context("parsing database url")?;
    let store = SqliteCatalogStore::connect(sqlite_config)
        .await
        .context("opening catalog database")?;
    CatalogStore::seed_reference_data(
        &store,
        config.reference_data.genres.clone(),
        config.reference_data.platforms.clone(),
    )
    .await
    .context("seeding genres and platforms")?;

    let sessions = SessionRegistry::with_ttl(config.session_ttl());
    let app_state = AppState::with_sessions(Arc::new(store), sessions);
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, database = %config.database_url, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
