//! Broadcast Fan-Out
//!
//! Delivers rendered markup and lifecycle events to every live subscriber
//! of a surface. Fan-out is best-effort: a send failure on one handle logs
//! a warning, removes that handle from the subscriber set, and never
//! affects delivery to the others.
//!
//! # Design Philosophy
//!
//! The broadcaster depends only on the [`Subscriber`] capability (send an
//! event, report closed-ness, close), never on a concrete transport type.
//! The transport layer (WebSocket, test channels) owns the other side of
//! each handle; the broadcaster never outlives it. Handles are collected
//! under the lock and sent outside it, so slow subscribers never block
//! concurrent store mutations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Events pushed to subscribers, serialized verbatim onto the transport
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushEvent {
    /// Full re-render of the surface's current state
    #[serde(rename = "html")]
    Html {
        /// The rendered markup
        html: String,
    },
    /// Sent once, immediately before all subscribers are closed
    #[serde(rename = "deleteSurface")]
    DeleteSurface {
        /// Id of the surface being deleted
        #[serde(rename = "surfaceId")]
        surface_id: String,
    },
}

/// Errors from a subscriber transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The send could not be completed
    #[error("send failed: {0}")]
    SendFailed(String),
    /// The subscriber channel is closed
    #[error("subscriber channel closed")]
    Closed,
}

/// A live push channel attached to one surface
///
/// Implementations wrap a concrete transport (a WebSocket connection, a
/// test channel). A failed send is treated as a disconnect by the
/// broadcaster, never as a fatal error for the surface.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Deliver an event to this subscriber
    async fn send(&self, event: &PushEvent) -> Result<(), TransportError>;

    /// Whether the underlying channel is already closed
    fn is_closed(&self) -> bool;

    /// Close the underlying channel
    async fn close(&self);
}

/// Result of a publish operation
#[derive(Clone, Copy, Debug, Default)]
pub struct BroadcastResult {
    /// Number of subscribers that received the event
    pub successful: usize,
    /// Number of subscribers that failed and were pruned
    pub failed: usize,
}

impl BroadcastResult {
    /// Check if every recipient received the event
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Fan-out registry: surface id -> set of subscriber handles
///
/// Cloning is cheap and shares the underlying registry, the same pattern
/// a store and a web server use to share one subscriber set.
#[derive(Clone, Default)]
pub struct Broadcaster {
    inner: Arc<RwLock<HashMap<String, Vec<Arc<dyn Subscriber>>>>>,
}

impl Broadcaster {
    /// Create an empty broadcaster
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a subscriber to a surface
    pub fn subscribe(&self, surface_id: &str, handle: Arc<dyn Subscriber>) {
        let mut inner = self.inner.write();
        inner.entry(surface_id.to_string()).or_default().push(handle);
        tracing::debug!(surface_id = %surface_id, "Subscriber attached");
    }

    /// Detach a specific subscriber from a surface
    pub fn unsubscribe(&self, surface_id: &str, handle: &Arc<dyn Subscriber>) {
        let mut inner = self.inner.write();
        if let Some(handles) = inner.get_mut(surface_id) {
            handles.retain(|h| !Arc::ptr_eq(h, handle));
            if handles.is_empty() {
                inner.remove(surface_id);
            }
            tracing::debug!(surface_id = %surface_id, "Subscriber detached");
        }
    }

    /// Number of live subscribers for a surface
    #[must_use]
    pub fn count(&self, surface_id: &str) -> usize {
        self.inner
            .read()
            .get(surface_id)
            .map_or(0, |handles| handles.len())
    }

    /// Publish an event to every subscriber of a surface
    ///
    /// Zero subscribers is a no-op, not an error. Handles that fail to
    /// accept the event are pruned from the set.
    pub async fn publish(&self, surface_id: &str, event: &PushEvent) -> BroadcastResult {
        // Collect handles outside the lock so sends never hold it.
        let handles: Vec<Arc<dyn Subscriber>> = {
            let inner = self.inner.read();
            match inner.get(surface_id) {
                Some(handles) => handles.clone(),
                None => return BroadcastResult::default(),
            }
        };

        let mut result = BroadcastResult::default();
        let mut dead: Vec<Arc<dyn Subscriber>> = Vec::new();

        for handle in &handles {
            match handle.send(event).await {
                Ok(()) => result.successful += 1,
                Err(e) => {
                    tracing::warn!(surface_id = %surface_id, error = %e, "Failed to send to subscriber");
                    result.failed += 1;
                    dead.push(Arc::clone(handle));
                }
            }
        }

        if !dead.is_empty() {
            let mut inner = self.inner.write();
            if let Some(handles) = inner.get_mut(surface_id) {
                handles.retain(|h| !dead.iter().any(|d| Arc::ptr_eq(h, d)));
            }
        }

        result
    }

    /// Remove and return every subscriber of a surface
    ///
    /// Used when a surface closes: the caller publishes the deletion event
    /// first, then detaches and closes the handles.
    #[must_use]
    pub fn detach_all(&self, surface_id: &str) -> Vec<Arc<dyn Subscriber>> {
        self.inner.write().remove(surface_id).unwrap_or_default()
    }

    /// Drop subscribers whose channel reports closed
    ///
    /// Returns the number of handles removed. Called by the keep-alive
    /// task, off the mutation critical path.
    pub fn prune_closed(&self) -> usize {
        let mut inner = self.inner.write();
        let mut removed = 0;
        inner.retain(|surface_id, handles| {
            let before = handles.len();
            handles.retain(|h| !h.is_closed());
            let pruned = before - handles.len();
            if pruned > 0 {
                removed += pruned;
                tracing::debug!(surface_id = %surface_id, pruned = pruned, "Pruned closed subscribers");
            }
            !handles.is_empty()
        });
        removed
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Broadcaster")
            .field("surfaces", &inner.len())
            .field(
                "subscribers",
                &inner.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}
