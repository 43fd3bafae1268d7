// Framework bootstrap for the survival server runtime.

use crate::domain::tuning::Tuning;
use crate::domain::worldgen::{WorldGenConfig, generate_world};
use crate::frameworks::config;
use crate::interface_adapters::net::{
    ConnectionRegistry, outbound_dispatcher, status_handler, ws_handler,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::game::{LoopTiming, world_task};
use crate::use_cases::{GameWorld, Outbound, WorldStats};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc, time::Instant};
use tokio::sync::{mpsc, watch};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    // build state
    let state = build_state(config::world_seed());
    // Start the Web Server
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/status", get(status_handler))
        .with_state(state);

    tracing::info!(%address, "listening");
    // Launchers wait for this line on stdout.
    println!("Survival server listening on {address}");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::new(config::http_host(), config::http_port());

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state(seed: Option<u64>) -> Arc<AppState> {
    // Generation finishes before the listener serves anything.
    let started = Instant::now();
    let world = generate_world(seed, Tuning::default(), &WorldGenConfig::default());
    tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "world ready");

    let game = GameWorld::new(world);
    let (input_tx, input_rx) = mpsc::channel(config::INPUT_CHANNEL_CAPACITY);
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Outbound>();
    let (stats_tx, stats_rx) = watch::channel(WorldStats::default());
    let connections = Arc::new(ConnectionRegistry::new());

    // The world task owns all game state; the dispatcher owns serialization.
    tokio::spawn(world_task(
        game,
        input_rx,
        outbound_tx,
        stats_tx,
        LoopTiming {
            tick: config::TICK_INTERVAL,
            janitor: config::JANITOR_INTERVAL,
            ability: config::ABILITY_SPAWN_INTERVAL,
        },
    ));
    tokio::spawn(outbound_dispatcher(outbound_rx, connections.clone()));

    Arc::new(AppState {
        input_tx,
        connections,
        stats_rx,
    })
}
