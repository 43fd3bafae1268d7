// Boots the real server once per test binary and hands out its address.
#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::{
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Global base URL used by all tests after the server publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    // Run initialization exactly once even if multiple tests call this function.
    SERVER_READY.get_or_init(|| {
        // Local one-time slot where the server thread publishes its selected URL.
        let published_url = Arc::new(OnceLock::<String>::new());
        // Clone so the spawned thread can write into the same shared slot.
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            // The server thread owns its own Tokio runtime.
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                // Capture the address the OS assigned.
                let addr = listener.local_addr().expect("get local addr");
                // Publish the base URL before world generation starts.
                let _ = published_url_thread.set(format!("http://{}", addr));
                // Generate the world, then serve until the test process exits.
                survival_server::run(listener).await.expect("server failed");
            });
        });
        // Block until the URL is published and the port accepts connections.
        wait_for_server_url_and_readiness(published_url);
    });

    // Every test in this binary shares the same server.
    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Wait for URL publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    // Poll until the server thread publishes the base URL.
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        // Avoid a tight loop while waiting for the background thread.
        std::thread::sleep(Duration::from_millis(10));
    };

    // Persist the URL globally so every test gets the same endpoint.
    let _ = SERVER_URL.set(base_url.clone());

    // Strip the scheme so we can use host:port for raw TCP readiness checks.
    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Retry for a while to avoid racing the server bind.
    for _ in 0..500 {
        // Successful connect means the socket is accepting connections.
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    // Fail fast if startup never reached an accepting state.
    panic!("server did not become ready in time");
}

// Open a WebSocket to the shared server.
pub async fn connect() -> Ws {
    let base_url = ensure_server();
    let ws_url = format!("{}/ws", base_url.replacen("http://", "ws://", 1));
    let (ws, _) = tokio_tungstenite::connect_async(ws_url)
        .await
        .expect("websocket handshake");
    ws
}

// Send one JSON text frame.
pub async fn send_json(ws: &mut Ws, value: Value) {
    ws.send(Message::text(value.to_string()))
        .await
        .expect("send message");
}

/// Reads frames until one with the given `type` arrives; other traffic is skipped.
pub async fn next_of_type(ws: &mut Ws, kind: &str) -> Value {
    let wait = async {
        loop {
            let msg = ws
                .next()
                .await
                .expect("socket closed early")
                .expect("websocket error");
            if let Message::Text(text) = msg {
                let value: Value = serde_json::from_str(text.as_str()).expect("server sent json");
                if value["type"] == kind {
                    return value;
                }
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {kind}"))
}

// Register with a stable id and wait for the `init` reply.
pub async fn register(ws: &mut Ws, persistent_id: &str) -> Value {
    send_json(
        ws,
        serde_json::json!({"type": "register", "persistentId": persistent_id, "name": persistent_id}),
    )
    .await;
    next_of_type(ws, "init").await
}
