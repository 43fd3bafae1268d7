use crate::interface_adapters::net::ConnectionRegistry;
use crate::use_cases::{GameEvent, WorldStats};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

pub struct AppState {
    // Commands flowing from the network into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Per-connection outbound queues fed by the dispatcher.
    pub connections: Arc<ConnectionRegistry>,
    // Latest counters published by the world task.
    pub stats_rx: watch::Receiver<WorldStats>,
}
