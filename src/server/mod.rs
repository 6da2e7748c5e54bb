//! Viewer Web Server
//!
//! HTTP and WebSocket server for canvas viewers, sharing one TCP
//! listener:
//!
//! - `GET /health` - health check endpoint
//! - `GET /canvas/{surface_id}` - HTML page with the live viewer shell
//! - `GET /ws/{surface_id}` - WebSocket endpoint for real-time updates
//!
//! The server is thin I/O around the store: WebSocket connections become
//! [`Subscriber`] handles registered with the store's broadcaster, and a
//! periodic keep-alive task pings them and prunes the dead, never on the
//! update/render/broadcast critical path.

pub mod page;
pub mod ws;

use std::net::SocketAddr;
use std::sync::Arc;

use futures::StreamExt;
use parking_lot::RwLock;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::broadcast::Subscriber;
use crate::config::CanvasConfig;
use crate::render::render_components;
use crate::store::SurfaceStore;

use self::page::canvas_page;
use self::ws::WsSubscriber;

/// Maximum bytes of HTTP request head we will buffer
const MAX_REQUEST_HEAD: usize = 8192;

/// HTTP and WebSocket server for canvas viewers
pub struct CanvasWebServer {
    config: CanvasConfig,
    store: Arc<SurfaceStore>,
    /// Live viewer connections, tracked for keep-alive pings
    ws_clients: Arc<RwLock<Vec<Arc<WsSubscriber>>>>,
    tasks: Vec<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl CanvasWebServer {
    /// Create a server bound to the store it serves
    #[must_use]
    pub fn new(config: CanvasConfig, store: Arc<SurfaceStore>) -> Self {
        Self {
            config,
            store,
            ws_clients: Arc::new(RwLock::new(Vec::new())),
            tasks: Vec::new(),
            local_addr: None,
        }
    }

    /// Start the listener and keep-alive tasks
    ///
    /// If the port is already in use (another instance is serving), the
    /// web server does not start but the rest of the process continues to
    /// work against the existing instance.
    pub async fn start(&mut self) -> std::io::Result<()> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = match TcpListener::bind(&bind_addr).await {
            Ok(listener) => listener,
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::warn!(
                    addr = %bind_addr,
                    "Port already in use - another canvas instance is running. \
                     Continuing without web server."
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.local_addr = listener.local_addr().ok();

        let store = Arc::clone(&self.store);
        let ws_clients = Arc::clone(&self.ws_clients);
        self.tasks.push(tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        tracing::debug!(peer = %peer, "Connection accepted");
                        let store = Arc::clone(&store);
                        let ws_clients = Arc::clone(&ws_clients);
                        tokio::spawn(async move {
                            handle_connection(store, ws_clients, stream).await;
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                    }
                }
            }
        }));

        let store = Arc::clone(&self.store);
        let ws_clients = Arc::clone(&self.ws_clients);
        let interval = self.config.ping_interval;
        self.tasks.push(tokio::spawn(async move {
            ping_loop(store, ws_clients, interval).await;
        }));

        tracing::info!(addr = %bind_addr, "Canvas web server started");
        Ok(())
    }

    /// Address the listener actually bound to (useful with port 0)
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Stop the listener and keep-alive tasks
    pub async fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        tracing::info!("Canvas web server stopped");
    }
}

impl Drop for CanvasWebServer {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Periodically ping viewer connections and prune the dead
async fn ping_loop(
    store: Arc<SurfaceStore>,
    ws_clients: Arc<RwLock<Vec<Arc<WsSubscriber>>>>,
    interval: std::time::Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let clients: Vec<Arc<WsSubscriber>> = ws_clients.read().clone();
        if clients.is_empty() {
            continue;
        }
        tracing::debug!(clients = clients.len(), "Pinging viewer connections");

        for client in &clients {
            if client.is_closed() {
                continue;
            }
            if let Err(e) = client.ping().await {
                tracing::debug!(error = %e, "Failed to ping viewer");
            }
        }

        ws_clients.write().retain(|c| !c.is_closed());
        store.broadcaster().prune_closed();
    }
}

/// Route one accepted TCP connection
///
/// The request head is peeked (not consumed) to decide between the
/// WebSocket upgrade path, which hands the untouched stream to the
/// WebSocket handshake, and plain HTTP handling.
async fn handle_connection(
    store: Arc<SurfaceStore>,
    ws_clients: Arc<RwLock<Vec<Arc<WsSubscriber>>>>,
    stream: TcpStream,
) {
    let path = match peek_request_path(&stream).await {
        Some(path) => path,
        None => return,
    };

    if let Some(surface_id) = path.strip_prefix("/ws/") {
        let surface_id = surface_id.to_string();
        handle_websocket(store, ws_clients, stream, surface_id).await;
    } else {
        handle_http(store, stream, &path).await;
    }
}

/// Peek the request line without consuming bytes from the stream
async fn peek_request_path(stream: &TcpStream) -> Option<String> {
    let mut buf = [0u8; 1024];
    for _ in 0..32 {
        let n = stream.peek(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        let head = String::from_utf8_lossy(&buf[..n]);
        if head.contains("\r\n") || n == buf.len() {
            // "GET /path HTTP/1.1"
            let line = head.split("\r\n").next().unwrap_or_default();
            let mut parts = line.split_whitespace();
            let method = parts.next()?;
            let path = parts.next()?;
            if method != "GET" {
                // Unsupported methods fall through to the 404 route.
                return Some(String::new());
            }
            return Some(path.to_string());
        }
        tokio::task::yield_now().await;
    }
    None
}

/// Handle a WebSocket viewer connection for a surface
async fn handle_websocket(
    store: Arc<SurfaceStore>,
    ws_clients: Arc<RwLock<Vec<Arc<WsSubscriber>>>>,
    stream: TcpStream,
    surface_id: String,
) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws_stream) => ws_stream,
        Err(e) => {
            tracing::warn!(error = %e, "WebSocket handshake failed");
            return;
        }
    };
    let (sink, mut receiver) = ws_stream.split();
    let subscriber = Arc::new(WsSubscriber::new(sink));
    let handle: Arc<dyn Subscriber> = Arc::clone(&subscriber) as Arc<dyn Subscriber>;

    // subscribe() pushes the surface's current rendered state.
    if !store.subscribe(&surface_id, Arc::clone(&handle)).await {
        tracing::warn!(surface_id = %surface_id, "WebSocket for unknown surface rejected");
        subscriber.close_with(4004, "Surface not found").await;
        return;
    }
    ws_clients.write().push(Arc::clone(&subscriber));
    tracing::info!(surface_id = %surface_id, "WebSocket connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                // Viewer messages (e.g. user interactions) are not used yet.
                tracing::debug!(surface_id = %surface_id, data = %text, "Viewer message");
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(surface_id = %surface_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    subscriber.mark_closed();
    store.unsubscribe(&surface_id, &handle);
    ws_clients.write().retain(|c| !Arc::ptr_eq(c, &subscriber));
    tracing::info!(surface_id = %surface_id, "WebSocket disconnected");
}

/// Handle a plain HTTP request
async fn handle_http(store: Arc<SurfaceStore>, mut stream: TcpStream, path: &str) {
    if let Err(e) = consume_request_head(&mut stream).await {
        tracing::debug!(error = %e, "Failed to read request head");
        return;
    }

    let response = match path {
        "/health" => http_response("200 OK", "application/json", "{\"status\":\"ok\"}"),
        _ if path.starts_with("/canvas/") => {
            let surface_id = &path["/canvas/".len()..];
            match store.get_surface_info(surface_id) {
                Some(info) => {
                    let initial_html = store
                        .get_surface(surface_id)
                        .filter(|state| !state.components.is_empty())
                        .and_then(|state| {
                            render_components(&state.components, &state.data_model).ok()
                        })
                        .unwrap_or_default();
                    http_response("200 OK", "text/html; charset=utf-8", &canvas_page(&info, &initial_html))
                }
                None => http_response(
                    "404 Not Found",
                    "text/plain",
                    &format!("Surface not found: {surface_id}"),
                ),
            }
        }
        _ => http_response("404 Not Found", "text/plain", "Not Found"),
    };

    if let Err(e) = stream.write_all(response.as_bytes()).await {
        tracing::debug!(error = %e, "Failed to write response");
    }
    let _ = stream.shutdown().await;
}

/// Read and discard the request head (we only route on the path)
async fn consume_request_head(stream: &mut TcpStream) -> std::io::Result<()> {
    let mut head = Vec::with_capacity(512);
    let mut byte = [0u8; 1];
    while head.len() < MAX_REQUEST_HEAD {
        let n = stream.read(&mut byte).await?;
        if n == 0 {
            break;
        }
        head.push(byte[0]);
        if head.ends_with(b"\r\n\r\n") {
            break;
        }
    }
    Ok(())
}

/// Build a minimal HTTP/1.1 response
fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}
