//! Device Cursor Tracking
//!
//! Tracks which surface is "current" for each external display device and
//! implements previous/next/latest navigation over a device's
//! chronologically ordered surface list. Cursors are persisted
//! independently of surface content as a single JSON object mapping
//! device id to surface id; entries referencing surfaces that no longer
//! exist are pruned on load.
//!
//! The tracker owns only the cursor map. The store composes
//! `current-surface` lookups from [`CursorTracker::get`] plus its own
//! surface index, and supplies the ordered surface list that navigation
//! operates over.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::surface::Surface;

/// Navigation direction over a device's surface history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    /// Move one surface back in creation order
    Previous,
    /// Move one surface forward in creation order
    Next,
    /// Jump to the newest surface unconditionally
    Latest,
}

impl NavDirection {
    /// Parse a direction name as used in requests
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "previous" => Some(Self::Previous),
            "next" => Some(Self::Next),
            "latest" => Some(Self::Latest),
            _ => None,
        }
    }
}

/// Per-device cursor state: device id -> current surface id
#[derive(Clone)]
pub struct CursorTracker {
    cursors: Arc<RwLock<HashMap<String, String>>>,
    /// Cursor file path; None disables persistence
    path: Option<PathBuf>,
}

impl CursorTracker {
    /// Create a tracker, persisting to the given file when set
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            cursors: Arc::new(RwLock::new(HashMap::new())),
            path,
        }
    }

    /// Load persisted cursors, pruning entries whose surface is gone
    ///
    /// A missing or malformed cursor file is logged and skipped; the
    /// tracker starts empty in that case.
    pub async fn load<F>(&self, surface_exists: F)
    where
        F: Fn(&str) -> bool,
    {
        let Some(path) = &self.path else {
            return;
        };
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::error!(path = ?path, error = %e, "Failed to read device cursors");
                return;
            }
        };
        match serde_json::from_str::<HashMap<String, String>>(&contents) {
            Ok(mut loaded) => {
                loaded.retain(|_, surface_id| surface_exists(surface_id));
                tracing::debug!(count = loaded.len(), "Loaded device cursors");
                *self.cursors.write() = loaded;
            }
            Err(e) => {
                tracing::error!(path = ?path, error = %e, "Failed to parse device cursors");
            }
        }
    }

    /// The surface id a device's cursor points at, if set
    #[must_use]
    pub fn get(&self, device_id: &str) -> Option<String> {
        self.cursors.read().get(device_id).cloned()
    }

    /// Point a device's cursor at a surface and persist
    pub async fn set(&self, device_id: &str, surface_id: &str) {
        self.cursors
            .write()
            .insert(device_id.to_string(), surface_id.to_string());
        self.persist().await;
    }

    /// Navigate a device's cursor over its ordered surface list
    ///
    /// `surfaces` must be the device's surfaces in ascending creation
    /// order. Returns the new current surface, or None when navigation is
    /// not possible: empty list, `previous` with no cursor, or the cursor
    /// already at the relevant boundary. Boundaries never wrap. On a
    /// successful move the cursor is updated and persisted.
    pub async fn navigate(
        &self,
        device_id: &str,
        direction: NavDirection,
        surfaces: &[Surface],
    ) -> Option<Surface> {
        if surfaces.is_empty() {
            tracing::warn!(device_id = %device_id, "No surfaces found for device");
            return None;
        }

        let current_id = self.get(device_id);
        let position = current_id
            .as_deref()
            .and_then(|id| surfaces.iter().position(|s| s.surface_id == id));

        let target = match direction {
            NavDirection::Latest => surfaces.last(),
            NavDirection::Previous => match (&current_id, position) {
                (None, _) => None,
                (Some(_), Some(idx)) if idx > 0 => surfaces.get(idx - 1),
                (Some(_), _) => {
                    tracing::debug!(device_id = %device_id, "Already at oldest surface");
                    None
                }
            },
            NavDirection::Next => match (&current_id, position) {
                (None, _) => surfaces.last(),
                (Some(_), Some(idx)) if idx + 1 < surfaces.len() => surfaces.get(idx + 1),
                (Some(_), _) => {
                    tracing::debug!(device_id = %device_id, "Already at newest surface");
                    None
                }
            },
        }?
        .clone();

        self.cursors
            .write()
            .insert(device_id.to_string(), target.surface_id.clone());
        self.persist().await;

        tracing::info!(
            device_id = %device_id,
            surface_id = %target.surface_id,
            direction = ?direction,
            "Navigated device cursor"
        );
        Some(target)
    }

    /// Write the cursor map to disk; failures are logged and absorbed
    async fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let snapshot = self.cursors.read().clone();
        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize device cursors");
                return;
            }
        };
        if let Err(e) = tokio::fs::write(path, json).await {
            tracing::error!(path = ?path, error = %e, "Failed to persist device cursors");
        } else {
            tracing::debug!("Persisted device cursors");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CanvasSize;
    use chrono::Utc;

    fn surface(id: &str) -> Surface {
        Surface {
            surface_id: id.to_string(),
            name: None,
            device_id: Some("tv".to_string()),
            size: CanvasSize::default(),
            local_url: format!("http://localhost:8080/canvas/{id}"),
            ws_url: format!("ws://localhost:8080/ws/{id}"),
            created_at: Utc::now(),
            connected_clients: 0,
        }
    }

    fn abc() -> Vec<Surface> {
        vec![surface("a"), surface("b"), surface("c")]
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(NavDirection::parse("previous"), Some(NavDirection::Previous));
        assert_eq!(NavDirection::parse("NEXT"), Some(NavDirection::Next));
        assert_eq!(NavDirection::parse("latest"), Some(NavDirection::Latest));
        assert_eq!(NavDirection::parse("sideways"), None);
    }

    #[tokio::test]
    async fn test_previous_at_oldest_is_noop() {
        let tracker = CursorTracker::new(None);
        tracker.set("tv", "a").await;
        let result = tracker.navigate("tv", NavDirection::Previous, &abc()).await;
        assert!(result.is_none());
        assert_eq!(tracker.get("tv"), Some("a".to_string()));
    }

    #[tokio::test]
    async fn test_next_at_newest_is_noop() {
        let tracker = CursorTracker::new(None);
        tracker.set("tv", "c").await;
        let result = tracker.navigate("tv", NavDirection::Next, &abc()).await;
        assert!(result.is_none());
        assert_eq!(tracker.get("tv"), Some("c".to_string()));
    }

    #[tokio::test]
    async fn test_unset_cursor_next_goes_to_latest() {
        let tracker = CursorTracker::new(None);
        let result = tracker.navigate("tv", NavDirection::Next, &abc()).await;
        assert_eq!(result.unwrap().surface_id, "c");
        assert_eq!(tracker.get("tv"), Some("c".to_string()));
    }

    #[tokio::test]
    async fn test_unset_cursor_previous_is_noop() {
        let tracker = CursorTracker::new(None);
        let result = tracker.navigate("tv", NavDirection::Previous, &abc()).await;
        assert!(result.is_none());
        assert_eq!(tracker.get("tv"), None);
    }

    #[tokio::test]
    async fn test_step_navigation() {
        let tracker = CursorTracker::new(None);
        tracker.set("tv", "b").await;

        let prev = tracker.navigate("tv", NavDirection::Previous, &abc()).await;
        assert_eq!(prev.unwrap().surface_id, "a");

        let next = tracker.navigate("tv", NavDirection::Next, &abc()).await;
        assert_eq!(next.unwrap().surface_id, "b");
    }

    #[tokio::test]
    async fn test_latest_jumps_unconditionally() {
        let tracker = CursorTracker::new(None);
        tracker.set("tv", "a").await;
        let result = tracker.navigate("tv", NavDirection::Latest, &abc()).await;
        assert_eq!(result.unwrap().surface_id, "c");
    }

    #[tokio::test]
    async fn test_empty_surface_list_is_noop() {
        let tracker = CursorTracker::new(None);
        let result = tracker.navigate("tv", NavDirection::Latest, &[]).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_persistence_roundtrip_with_stale_prune() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_device_cursors.json");

        let tracker = CursorTracker::new(Some(path.clone()));
        tracker.set("tv", "a").await;
        tracker.set("bedroom", "gone").await;

        let reloaded = CursorTracker::new(Some(path));
        reloaded.load(|surface_id| surface_id == "a").await;
        assert_eq!(reloaded.get("tv"), Some("a".to_string()));
        assert_eq!(reloaded.get("bedroom"), None);
    }

    #[tokio::test]
    async fn test_load_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_device_cursors.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let tracker = CursorTracker::new(Some(path));
        tracker.load(|_| true).await;
        assert_eq!(tracker.get("tv"), None);
    }
}
