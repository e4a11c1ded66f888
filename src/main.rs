//! Gif Battle Back binary entrypoint wiring REST, SSE, and storage layers.

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gif_battle_back::{
    config::AppConfig,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    spawn_storage_supervisor(app_state.clone());

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick a storage backend from the environment and supervise its connection
/// in the background. `GAME_STORE` selects explicitly (`mongo` or `couch`);
/// otherwise the presence of `COUCH_URL` selects CouchDB, defaulting to
/// MongoDB.
fn spawn_storage_supervisor(state: SharedState) {
    let backend = env::var("GAME_STORE").unwrap_or_else(|_| {
        if env::var("COUCH_URL").is_ok() {
            "couch".into()
        } else {
            "mongo".into()
        }
    });

    match backend.as_str() {
        #[cfg(feature = "mongo-store")]
        "mongo" => {
            use gif_battle_back::dao::game_store::GameStore;
            use gif_battle_back::dao::game_store::mongodb::{MongoGameStore, config::MongoConfig};
            use gif_battle_back::services::storage_supervisor;
            use std::sync::Arc;

            let config = MongoConfig::from_env();
            info!(backend = "mongo", "starting storage supervisor");
            tokio::spawn(storage_supervisor::run(state, move || {
                let config = config.clone();
                async move {
                    let store = MongoGameStore::connect(config).await?;
                    Ok(Arc::new(store) as Arc<dyn GameStore>)
                }
            }));
        }
        #[cfg(feature = "couch-store")]
        "couch" => {
            use gif_battle_back::dao::game_store::GameStore;
            use gif_battle_back::dao::game_store::couchdb::{CouchGameStore, config::CouchConfig};
            use gif_battle_back::services::storage_supervisor;
            use std::sync::Arc;

            let config = CouchConfig::from_env();
            info!(backend = "couch", "starting storage supervisor");
            tokio::spawn(storage_supervisor::run(state, move || {
                let config = config.clone();
                async move {
                    let store = CouchGameStore::connect(config).await?;
                    Ok(Arc::new(store) as Arc<dyn GameStore>)
                }
            }));
        }
        other => {
            tracing::error!(
                backend = other,
                "unknown or disabled storage backend; staying in degraded mode"
            );
        }
    }
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

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
