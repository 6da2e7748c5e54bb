//! WebSocket Subscriber
//!
//! Wraps the write half of an accepted WebSocket connection as a
//! [`Subscriber`] so the broadcaster can fan events out to it without
//! knowing anything about the transport. A send failure flips the closed
//! flag; the read half (owned by the connection task) and the keep-alive
//! task both treat that as a disconnect.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::stream::SplitSink;
use futures::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::broadcast::{PushEvent, Subscriber, TransportError};

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// A viewer connection's push channel
pub struct WsSubscriber {
    sink: Mutex<WsSink>,
    closed: AtomicBool,
}

impl WsSubscriber {
    /// Wrap the write half of an accepted WebSocket
    #[must_use]
    pub fn new(sink: WsSink) -> Self {
        Self {
            sink: Mutex::new(sink),
            closed: AtomicBool::new(false),
        }
    }

    /// Mark this subscriber as disconnected
    ///
    /// Called by the connection task when the read half ends.
    pub fn mark_closed(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Close the connection with an application close code
    pub async fn close_with(&self, code: u16, reason: &str) {
        self.mark_closed();
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: reason.to_string().into(),
        };
        let mut sink = self.sink.lock().await;
        let _ = sink.send(Message::Close(Some(frame))).await;
        let _ = sink.close().await;
    }

    /// Send a keep-alive ping frame
    pub async fn ping(&self) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let mut sink = self.sink.lock().await;
        sink.send(Message::Ping(Vec::new().into()))
            .await
            .map_err(|e| {
                self.mark_closed();
                TransportError::SendFailed(e.to_string())
            })
    }
}

#[async_trait]
impl Subscriber for WsSubscriber {
    async fn send(&self, event: &PushEvent) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let json = serde_json::to_string(event)
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(json.into())).await.map_err(|e| {
            self.mark_closed();
            TransportError::SendFailed(e.to_string())
        })
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        self.mark_closed();
        let mut sink = self.sink.lock().await;
        let _ = sink.send(Message::Close(None)).await;
        let _ = sink.close().await;
    }
}
