mod auth;
mod config;
mod dispatcher;
mod errors;
mod extractors;
mod handlers;
mod models;
mod operator;
mod platform;
mod registry;
mod state;
mod store;
mod types;

use std::{process::ExitCode, sync::Arc};

use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::Config,
    dispatcher::Dispatcher,
    operator::Operator,
    platform::{DiscordClient, PlatformClient},
    registry::Registry,
    state::AppState,
    store::JsonFileStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Refusing to start: {}. Set it in the environment or in .env.", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("{:?}", config);
    if config.api_token.is_none() {
        tracing::warn!("API_TOKEN is not set; operator and event routes will reject every request");
    }

    let platform: Arc<dyn PlatformClient> =
        match DiscordClient::new(&config.discord_token, &config.api_base, config.platform_timeout) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::error!("Refusing to start: {}", e);
                return ExitCode::FAILURE;
            }
        };

    let store = Arc::new(JsonFileStore::new(&config.data_file));
    tracing::info!("Reaction-role bindings live in {}", store.path().display());
    let registry = Arc::new(Registry::open(store));

    let (signals_tx, signals_rx) = mpsc::channel(config.event_buffer);
    let dispatcher = Arc::new(Dispatcher::new(
        registry.clone(),
        platform.clone(),
        config.platform_timeout,
    ));
    let dispatcher_task = dispatcher.spawn(signals_rx);

    let operator = Arc::new(Operator::new(
        registry.clone(),
        platform,
        config.platform_timeout,
        config.reaction_delay,
    ));

    let app_state = AppState {
        operator,
        registry,
        signals: signals_tx,
        api_token: config.api_token.as_deref().map(Arc::from),
        started_at: chrono::Utc::now(),
    };
    let app = handlers::router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    // The router held the last signal sender; the dispatcher drains and stops.
    let _ = dispatcher_task.await;
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
