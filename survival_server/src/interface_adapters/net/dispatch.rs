use crate::domain::WorldEvent;
use crate::interface_adapters::protocol::ServerMessage;
use crate::use_cases::{ConnId, Outbound, Recipients};

use axum::extract::ws::Utf8Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, error, info};

/// Open sockets and their outbound queues.
#[derive(Default)]
pub struct ConnectionRegistry {
    conns: RwLock<HashMap<ConnId, mpsc::UnboundedSender<Utf8Bytes>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection and returns the queue its socket task drains.
    pub async fn register(&self, conn_id: ConnId) -> mpsc::UnboundedReceiver<Utf8Bytes> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.conns.write().await.insert(conn_id, tx);
        rx
    }

    pub async fn unregister(&self, conn_id: ConnId) {
        self.conns.write().await.remove(&conn_id);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.conns.read().await.len()
    }

    /// Queues one frame for every matching connection. Returns how many got it.
    pub async fn deliver(&self, recipients: Recipients, bytes: Utf8Bytes) -> usize {
        let conns = self.conns.read().await;
        let send = |tx: &mpsc::UnboundedSender<Utf8Bytes>| tx.send(bytes.clone()).is_ok();
        match recipients {
            Recipients::Only(conn_id) => conns.get(&conn_id).map(send).unwrap_or(false) as usize,
            Recipients::All => conns.values().filter(|tx| send(*tx)).count(),
            Recipients::AllExcept(skip) => conns
                .iter()
                .filter(|(id, _)| **id != skip)
                .filter(|(_, tx)| send(*tx))
                .count(),
        }
    }
}

pub fn encode(event: WorldEvent) -> Result<Utf8Bytes, serde_json::Error> {
    let msg = ServerMessage::from(event);
    serde_json::to_string(&msg).map(Utf8Bytes::from)
}

pub async fn outbound_dispatcher(
    mut outbound_rx: mpsc::UnboundedReceiver<Outbound>,
    connections: Arc<ConnectionRegistry>,
) {
    // Serialize each event once and fan the shared bytes out.
    while let Some(Outbound { recipients, event }) = outbound_rx.recv().await {
        let bytes = match encode(event) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = ?e, "failed to serialize outbound event");
                continue;
            }
        };
        let delivered = connections.deliver(recipients, bytes).await;
        if delivered == 0 {
            debug!(?recipients, "outbound event had no live recipients");
        }
    }
    info!("outbound channel closed; dispatcher exiting");
}
