mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use ecocore_api::{AppState, AppStateInner};
use ecocore_gateway::{Dispatcher, connection, ticker};
use ecocore_telemetry::TelemetryStore;

use crate::config::Config;

#[derive(Clone)]
struct WsState {
    dispatcher: Dispatcher,
    store: Arc<TelemetryStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecocore=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Arc::new(ecocore_db::Database::open(&config.db_path)?);

    // Shared state
    let store = Arc::new(TelemetryStore::new());
    let dispatcher = Dispatcher::new();
    let app_state: AppState = Arc::new(AppStateInner {
        db: db.clone(),
        store: store.clone(),
        dispatcher: dispatcher.clone(),
        jwt_secret: config.jwt_secret.clone(),
        token_ttl: chrono::Duration::hours(config.token_ttl_hours),
    });

    // Tick loop: mutate, broadcast, persist
    tokio::spawn(ticker::run(
        store.clone(),
        dispatcher.clone(),
        db,
        Duration::from_secs(config.tick_secs),
    ));

    // Routes
    let ws_route = Router::new()
        .route("/ws", get(ws_upgrade))
        .with_state(WsState { dispatcher, store });

    let app = Router::new()
        .route("/", get(|| async { "ECO-CORE backend is running" }))
        .merge(ecocore_api::routes(app_state))
        .merge(ws_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("ECO-CORE server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_upgrade(State(state): State<WsState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| connection::handle_connection(socket, state.dispatcher, state.store))
}
