//! Midnight Back binary entrypoint wiring REST, SSE, and MongoDB layers.

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_config = AppConfig::load();
    let app_state = AppState::new(app_config);

    #[cfg(feature = "mongo-store")]
    {
        let mongo_uri =
            env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let mongo_db = env::var("MONGO_DB").ok();
        tokio::spawn(supervisor::run(app_state.clone(), mongo_uri, mongo_db));
    }
    #[cfg(not(feature = "mongo-store"))]
    tracing::warn!("built without a storage backend; wishes are unavailable");

    tokio::spawn(services::countdown_service::run(app_state.clone()));
    tokio::spawn(services::viewer_service::run(app_state.clone()));
    tokio::spawn(services::health_service::run_status_broadcaster(
        app_state.clone(),
    ));

    // Build the HTTP router once the shared state is ready.
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

#[cfg(feature = "mongo-store")]
mod supervisor {
    //! Background supervision of the MongoDB connection.

    use std::{sync::Arc, time::Duration};

    use tokio::time::sleep;
    use tracing::{info, warn};

    use crate::{
        dao::{
            models::SettingsEntity,
            relay_store::{
                RelayStore,
                mongodb::{MongoConfig, MongoRelayStore},
            },
        },
        services::settings_service,
        state::SharedState,
    };

    /// Supervise the MongoDB connection: retry in the background and toggle
    /// degraded mode when connectivity changes.
    pub async fn run(state: SharedState, uri: String, db_name: Option<String>) {
        let initial_delay = Duration::from_millis(1000);
        let mut delay = initial_delay;
        let max_delay = Duration::from_secs(10);

        loop {
            if let Some(store) = state.relay_store().await {
                match store.health_check().await {
                    Ok(()) => {
                        // Healthy connection: reset the retry backoff and avoid
                        // hammering the database with pings.
                        delay = initial_delay;
                        sleep(Duration::from_secs(5)).await;
                    }
                    Err(err) => {
                        // Existing connection failed: drop it, flip to degraded
                        // mode, and retry with exponential backoff.
                        warn!(error = %err, "MongoDB ping failed; entering degraded mode");
                        state.clear_relay_store().await;
                        sleep(delay).await;
                        delay = (delay * 2).min(max_delay);
                    }
                }
                continue;
            }

            match connect_and_adopt(&state, &uri, db_name.as_deref()).await {
                Ok(()) => {
                    info!("connected to MongoDB; leaving degraded mode");
                    delay = initial_delay;
                }
                Err(err) => {
                    warn!(error = %err, "MongoDB connection attempt failed");
                    sleep(delay).await;
                    delay = (delay * 2).min(max_delay);
                }
            }
        }
    }

    /// Connect, read back the settings row, and install the store.
    ///
    /// The stored row becomes the new command baseline via `reseed`, so
    /// one-shot fields written while we were away never replay as effects.
    async fn connect_and_adopt(
        state: &SharedState,
        uri: &str,
        db_name: Option<&str>,
    ) -> anyhow::Result<()> {
        let config = MongoConfig::from_uri(uri, db_name).await?;
        let store = MongoRelayStore::connect(config).await?;

        let entity = match RelayStore::load_settings(&store).await? {
            Some(entity) => entity,
            None => {
                let entity = SettingsEntity::default();
                RelayStore::save_settings(&store, entity.clone()).await?;
                entity
            }
        };

        settings_service::reseed(state, entity.into_record()).await;
        state.install_relay_store(Arc::new(store)).await;
        Ok(())
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: state::SharedState) -> Router<()> {
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
