//! Surface Store
//!
//! Owns the authoritative mutable state of every canvas surface: creation,
//! incremental component merges, data-model patches, close, listing, and
//! the persistence round-trip. Every successful mutation re-renders the
//! surface and hands the markup to the broadcaster for fan-out.
//!
//! # Consistency
//!
//! In-memory mutation happens entirely under a short write lock that is
//! never held across an await. Persistence and broadcast operate on a
//! snapshot cloned under that lock, so two logically concurrent updates
//! serialize their mutations but may interleave their I/O: a subscriber
//! always observes *some* consistent surface state, not necessarily the
//! one the most recent caller intended. This eventual visibility is a
//! deliberate property of the design; do not "fix" it by holding locks
//! across persistence or sends.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{json, Map, Value};

use crate::broadcast::{Broadcaster, PushEvent, Subscriber};
use crate::component::{normalize_component, validate_components, Component};
use crate::config::CanvasConfig;
use crate::cursor::{CursorTracker, NavDirection};
use crate::error::StoreError;
use crate::render::render_components;
use crate::surface::{new_surface_id, CanvasSize, Surface, SurfaceState};

/// Outcome of a successful surface mutation
#[derive(Clone, Debug, Default)]
pub struct UpdateSummary {
    /// Total components on the surface after the mutation
    pub component_count: usize,
    /// Validation warnings collected from the incoming batch
    pub warnings: Vec<String>,
    /// Number of subscribers that received the re-rendered markup
    pub delivered: usize,
}

/// Manages canvas surfaces and their state
///
/// Constructed once at process start and shared by reference with the
/// transport layer; there is no ambient/static state. All mutation goes
/// through this type.
pub struct SurfaceStore {
    config: CanvasConfig,
    surfaces: RwLock<HashMap<String, SurfaceState>>,
    /// Surfaces whose root component was synthesized by the store rather
    /// than supplied by the caller; those roots are refreshed on every
    /// merge so they keep referencing all top-level components
    synthetic_roots: RwLock<HashSet<String>>,
    broadcaster: Broadcaster,
    cursors: CursorTracker,
}

impl SurfaceStore {
    /// Create a store with the given configuration
    ///
    /// Creates the persistence directory when persistence is enabled; a
    /// failure there degrades to in-memory operation.
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        let cursors_file = config
            .persistence_enabled
            .then(|| config.cursors_file());
        if config.persistence_enabled {
            if let Err(e) = std::fs::create_dir_all(&config.persistence_path) {
                tracing::error!(
                    path = ?config.persistence_path,
                    error = %e,
                    "Failed to create persistence directory"
                );
            }
        }
        Self {
            cursors: CursorTracker::new(cursors_file),
            config,
            surfaces: RwLock::new(HashMap::new()),
            synthetic_roots: RwLock::new(HashSet::new()),
            broadcaster: Broadcaster::new(),
        }
    }

    /// Load persisted surfaces and device cursors from disk
    pub async fn initialize(&self) {
        if self.config.persistence_enabled {
            self.load_persisted_surfaces().await;
            let live: HashSet<String> = self.surfaces.read().keys().cloned().collect();
            self.cursors.load(|id| live.contains(id)).await;
        }
        tracing::info!(
            surfaces = self.surfaces.read().len(),
            "Surface store initialized"
        );
    }

    /// The store's configuration
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The broadcaster shared with the transport layer
    #[must_use]
    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    // ------------------------------------------------------------------
    // Surface lifecycle
    // ------------------------------------------------------------------

    /// Create a new canvas surface
    ///
    /// Allocates a creation-time-sortable id, seeds the size from config
    /// when none is given, points the device's cursor at the new surface
    /// when a device is given, and persists immediately.
    pub async fn create_surface(
        &self,
        name: Option<String>,
        size: Option<CanvasSize>,
        device_id: Option<String>,
    ) -> Surface {
        let surface_id = new_surface_id();
        let size = size.unwrap_or_else(|| self.config.default_size.clone());
        let state = SurfaceState::new(surface_id.clone(), name, device_id.clone(), size);
        let snapshot = state.clone();

        self.surfaces.write().insert(surface_id.clone(), state);

        if let Some(device_id) = &device_id {
            self.cursors.set(device_id, &surface_id).await;
        }
        self.persist_surface(&snapshot).await;

        tracing::info!(
            surface_id = %surface_id,
            name = ?snapshot.name,
            device_id = ?device_id,
            size = %snapshot.size.preset.name(),
            "Created surface"
        );
        self.project(&snapshot)
    }

    /// Merge a batch of component definitions into a surface
    ///
    /// Incoming components are normalized and validated (warnings never
    /// block the update), then merged by id: existing ids are overwritten,
    /// new ids appended, ids absent from the batch left untouched. After
    /// the merge the root invariant is enforced. Persists, re-renders, and
    /// broadcasts.
    pub async fn update_components(
        &self,
        surface_id: &str,
        components: Vec<Value>,
    ) -> Result<UpdateSummary, StoreError> {
        let normalized: Vec<Value> = components.iter().map(normalize_component).collect();

        let warnings = validate_components(&normalized);
        for warning in &warnings {
            tracing::warn!(surface_id = %surface_id, "Component validation: {warning}");
        }

        let mut incoming: Vec<Component> = Vec::with_capacity(normalized.len());
        for value in normalized {
            match serde_json::from_value::<Component>(value) {
                Ok(comp) => incoming.push(comp),
                Err(e) => {
                    tracing::warn!(surface_id = %surface_id, error = %e, "Skipping malformed component");
                }
            }
        }
        let incoming_count = incoming.len();

        let snapshot = {
            let mut surfaces = self.surfaces.write();
            let state = surfaces
                .get_mut(surface_id)
                .ok_or_else(|| StoreError::SurfaceNotFound(surface_id.to_string()))?;

            let caller_supplied_root = incoming.iter().any(|c| c.id == "root");
            let mut synthetic_roots = self.synthetic_roots.write();
            if caller_supplied_root {
                synthetic_roots.remove(surface_id);
            } else if synthetic_roots.contains(surface_id) {
                // Drop the previously synthesized wrapper so it can be
                // rebuilt over the merged set.
                state.components.retain(|c| c.id != "root");
            }

            for comp in incoming {
                if comp.id.is_empty() {
                    continue;
                }
                match state.components.iter_mut().find(|c| c.id == comp.id) {
                    Some(existing) => *existing = comp,
                    None => state.components.push(comp),
                }
            }

            if ensure_root_component(&mut state.components) {
                synthetic_roots.insert(surface_id.to_string());
            }

            state.touch();
            state.clone()
        };

        self.persist_surface(&snapshot).await;
        let delivered = self.render_and_broadcast(&snapshot).await;

        tracing::debug!(
            surface_id = %surface_id,
            total = snapshot.components.len(),
            incoming = incoming_count,
            "Updated components"
        );
        Ok(UpdateSummary {
            component_count: snapshot.components.len(),
            warnings,
            delivered,
        })
    }

    /// Set a value in a surface's data model at a JSON-pointer path
    ///
    /// Intermediate mappings are created as needed. Re-renders and
    /// re-broadcasts only when the surface already has components.
    pub async fn update_data_model(
        &self,
        surface_id: &str,
        path: &str,
        value: Value,
    ) -> Result<UpdateSummary, StoreError> {
        if path.is_empty() || path.trim_matches('/').is_empty() {
            return Err(StoreError::InvalidPath(
                "cannot replace the data model root".to_string(),
            ));
        }

        let snapshot = {
            let mut surfaces = self.surfaces.write();
            let state = surfaces
                .get_mut(surface_id)
                .ok_or_else(|| StoreError::SurfaceNotFound(surface_id.to_string()))?;
            set_pointer(&mut state.data_model, path, value);
            state.touch();
            state.clone()
        };

        self.persist_surface(&snapshot).await;
        let delivered = if snapshot.components.is_empty() {
            0
        } else {
            self.render_and_broadcast(&snapshot).await
        };

        tracing::debug!(surface_id = %surface_id, path = %path, "Updated data model");
        Ok(UpdateSummary {
            component_count: snapshot.components.len(),
            warnings: Vec::new(),
            delivered,
        })
    }

    /// Close and delete a surface
    ///
    /// Broadcasts a deletion event, detaches and closes every subscriber,
    /// then removes the surface from memory and persisted storage.
    pub async fn close_surface(&self, surface_id: &str) -> Result<(), StoreError> {
        if !self.surfaces.read().contains_key(surface_id) {
            return Err(StoreError::SurfaceNotFound(surface_id.to_string()));
        }

        let event = PushEvent::DeleteSurface {
            surface_id: surface_id.to_string(),
        };
        self.broadcaster.publish(surface_id, &event).await;

        let detached = self.broadcaster.detach_all(surface_id);
        for handle in detached {
            handle.close().await;
        }

        self.surfaces.write().remove(surface_id);
        self.synthetic_roots.write().remove(surface_id);
        self.delete_persisted_surface(surface_id).await;

        tracing::info!(surface_id = %surface_id, "Closed surface");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    /// List surfaces, optionally filtered by device, in creation order
    #[must_use]
    pub fn list_surfaces(&self, device_id: Option<&str>) -> Vec<Surface> {
        let mut surfaces: Vec<Surface> = self
            .surfaces
            .read()
            .values()
            .filter(|state| match device_id {
                Some(device_id) => state.device_id.as_deref() == Some(device_id),
                None => true,
            })
            .map(|state| self.project(state))
            .collect();
        // Ids are timestamp-prefixed, so id order is chronological order.
        surfaces.sort_by(|a, b| a.surface_id.cmp(&b.surface_id));
        surfaces
    }

    /// A surface's full state, if it exists
    #[must_use]
    pub fn get_surface(&self, surface_id: &str) -> Option<SurfaceState> {
        self.surfaces.read().get(surface_id).cloned()
    }

    /// A surface's info projection (no component/data payload)
    #[must_use]
    pub fn get_surface_info(&self, surface_id: &str) -> Option<Surface> {
        self.surfaces
            .read()
            .get(surface_id)
            .map(|state| self.project(state))
    }

    // ------------------------------------------------------------------
    // Device navigation
    // ------------------------------------------------------------------

    /// The current surface for a device
    ///
    /// Follows the device cursor when set; otherwise falls back to the
    /// device's latest surface without moving the cursor.
    #[must_use]
    pub fn current_surface(&self, device_id: &str) -> Option<Surface> {
        match self.cursors.get(device_id) {
            Some(surface_id) => self.get_surface_info(&surface_id),
            None => self.list_surfaces(Some(device_id)).into_iter().last(),
        }
    }

    /// Navigate a device's cursor over its surface history
    pub async fn navigate(&self, device_id: &str, direction: NavDirection) -> Option<Surface> {
        let surfaces = self.list_surfaces(Some(device_id));
        self.cursors.navigate(device_id, direction, &surfaces).await
    }

    /// Explicitly point a device's cursor at a surface
    pub async fn set_device_cursor(
        &self,
        device_id: &str,
        surface_id: &str,
    ) -> Result<(), StoreError> {
        if !self.surfaces.read().contains_key(surface_id) {
            return Err(StoreError::SurfaceNotFound(surface_id.to_string()));
        }
        self.cursors.set(device_id, surface_id).await;
        tracing::info!(device_id = %device_id, surface_id = %surface_id, "Set device cursor");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Subscribers
    // ------------------------------------------------------------------

    /// Attach a subscriber to a surface
    ///
    /// Returns false when the surface does not exist. On attach the
    /// surface's current rendered state is pushed to just this subscriber
    /// so the viewer never starts blank.
    pub async fn subscribe(&self, surface_id: &str, handle: Arc<dyn Subscriber>) -> bool {
        let snapshot = {
            let surfaces = self.surfaces.read();
            match surfaces.get(surface_id) {
                Some(state) => state.clone(),
                None => return false,
            }
        };
        self.broadcaster.subscribe(surface_id, Arc::clone(&handle));

        if !snapshot.components.is_empty() {
            match render_components(&snapshot.components, &snapshot.data_model) {
                Ok(html) => {
                    if let Err(e) = handle.send(&PushEvent::Html { html }).await {
                        tracing::warn!(surface_id = %surface_id, error = %e, "Failed to send initial state");
                    }
                }
                Err(e) => {
                    tracing::warn!(surface_id = %surface_id, error = %e, "Initial render failed");
                }
            }
        }
        true
    }

    /// Detach a subscriber from a surface
    pub fn unsubscribe(&self, surface_id: &str, handle: &Arc<dyn Subscriber>) {
        self.broadcaster.unsubscribe(surface_id, handle);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Build the info projection for a surface state
    fn project(&self, state: &SurfaceState) -> Surface {
        let (local_url, ws_url) = self.config.surface_urls(&state.surface_id);
        Surface {
            surface_id: state.surface_id.clone(),
            name: state.name.clone(),
            device_id: state.device_id.clone(),
            size: state.size.clone(),
            local_url,
            ws_url,
            created_at: state.created_at,
            connected_clients: self.broadcaster.count(&state.surface_id),
        }
    }

    /// Render a snapshot and broadcast the markup to its subscribers
    ///
    /// A render failure aborts only this broadcast cycle: it is logged,
    /// nothing is sent, and the surface state stays valid for the next
    /// update.
    async fn render_and_broadcast(&self, snapshot: &SurfaceState) -> usize {
        match render_components(&snapshot.components, &snapshot.data_model) {
            Ok(html) => {
                let result = self
                    .broadcaster
                    .publish(&snapshot.surface_id, &PushEvent::Html { html })
                    .await;
                result.successful
            }
            Err(e) => {
                tracing::warn!(
                    surface_id = %snapshot.surface_id,
                    error = %e,
                    "Render failed; skipping broadcast"
                );
                0
            }
        }
    }

    /// Write a surface record to disk; failures degrade to in-memory
    async fn persist_surface(&self, state: &SurfaceState) {
        if !self.config.persistence_enabled {
            return;
        }
        let path = self
            .config
            .persistence_path
            .join(format!("{}.json", state.surface_id));
        let json = match serde_json::to_string_pretty(state) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(surface_id = %state.surface_id, error = %e, "Failed to serialize surface");
                return;
            }
        };
        if let Err(e) = tokio::fs::write(&path, json).await {
            tracing::error!(path = ?path, error = %e, "Failed to persist surface");
        } else {
            tracing::debug!(surface_id = %state.surface_id, "Persisted surface");
        }
    }

    /// Remove a surface record from disk
    async fn delete_persisted_surface(&self, surface_id: &str) {
        if !self.config.persistence_enabled {
            return;
        }
        let path = self
            .config
            .persistence_path
            .join(format!("{surface_id}.json"));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(surface_id = %surface_id, "Deleted persisted surface"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = ?path, error = %e, "Failed to delete persisted surface");
            }
        }
    }

    /// Load every surface record from the persistence directory
    ///
    /// Malformed records are logged and skipped rather than aborting
    /// startup. Files with a leading underscore (the cursor record) are
    /// not surface records.
    async fn load_persisted_surfaces(&self) {
        let mut entries = match tokio::fs::read_dir(&self.config.persistence_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::error!(
                    path = ?self.config.persistence_path,
                    error = %e,
                    "Failed to read persistence directory"
                );
                return;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('_') || !name.ends_with(".json") {
                continue;
            }
            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(e) => {
                    tracing::error!(path = ?path, error = %e, "Failed to read surface record");
                    continue;
                }
            };
            match serde_json::from_str::<SurfaceState>(&contents) {
                Ok(state) => {
                    tracing::debug!(surface_id = %state.surface_id, "Loaded surface");
                    self.surfaces.write().insert(state.surface_id.clone(), state);
                }
                Err(e) => {
                    tracing::error!(path = ?path, error = %e, "Failed to load surface record");
                }
            }
        }
    }
}

impl std::fmt::Debug for SurfaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceStore")
            .field("surfaces", &self.surfaces.read().len())
            .field("broadcaster", &self.broadcaster)
            .finish()
    }
}

/// Enforce the root-presence invariant on a merged component set
///
/// Viewers require a component with id `"root"` to start rendering. When
/// none exists, every top-level (currently-unreferenced) component is
/// wrapped in a synthesized centered Column. Returns true when a wrapper
/// was synthesized.
fn ensure_root_component(components: &mut Vec<Component>) -> bool {
    if components.iter().any(|c| c.id == "root") {
        return false;
    }

    let referenced: HashSet<&str> = components
        .iter()
        .flat_map(|c| c.children.iter().map(String::as_str))
        .collect();
    let child_ids: Vec<String> = components
        .iter()
        .filter(|c| !c.id.is_empty() && !referenced.contains(c.id.as_str()))
        .map(|c| c.id.clone())
        .collect();

    let root = Component {
        id: "root".to_string(),
        kind: "Column".to_string(),
        children: child_ids,
        style: style_map(&[
            ("justifyContent", json!("center")),
            ("alignItems", json!("center")),
            ("height", json!("100%")),
            ("width", json!("100%")),
        ]),
        fields: Map::new(),
    };

    tracing::debug!(
        wrapped = components.len(),
        "Auto-wrapped components in root Column"
    );
    components.insert(0, root);
    true
}

/// Build a style map from key/value pairs
fn style_map(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// Set a value in a nested mapping using a slash-delimited pointer path
///
/// Missing intermediate segments are created as empty mappings; a scalar
/// in an intermediate position is replaced by a mapping.
fn set_pointer(root: &mut Map<String, Value>, path: &str, value: Value) {
    let trimmed = path.trim_matches('/');
    let parts: Vec<&str> = trimmed.split('/').collect();
    let Some((last, intermediate)) = parts.split_last() else {
        return;
    };

    let mut current = root;
    for part in intermediate {
        let entry = current
            .entry((*part).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert((*last).to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SurfaceStore {
        SurfaceStore::new(CanvasConfig::for_testing())
    }

    fn text_component(id: &str, text: &str) -> Value {
        json!({"id": id, "component": "Text", "text": text})
    }

    #[tokio::test]
    async fn test_create_and_get_surface() {
        let store = store();
        let surface = store
            .create_surface(Some("test".to_string()), None, None)
            .await;

        assert!(surface.local_url.contains("localhost:8080"));
        assert!(surface.ws_url.starts_with("ws://"));

        let state = store.get_surface(&surface.surface_id).unwrap();
        assert_eq!(state.name.as_deref(), Some("test"));
        assert!(state.components.is_empty());
    }

    #[tokio::test]
    async fn test_create_surface_updates_device_cursor() {
        let store = store();
        let surface = store
            .create_surface(None, None, Some("tv".to_string()))
            .await;
        assert_eq!(
            store.current_surface("tv").unwrap().surface_id,
            surface.surface_id
        );
    }

    #[tokio::test]
    async fn test_list_surfaces_sorted_and_filtered() {
        let store = store();
        let a = store.create_surface(None, None, Some("tv".to_string())).await;
        let b = store.create_surface(None, None, None).await;

        let all = store.list_surfaces(None);
        assert_eq!(all.len(), 2);
        assert!(all[0].surface_id <= all[1].surface_id);

        let for_tv = store.list_surfaces(Some("tv"));
        assert_eq!(for_tv.len(), 1);
        assert_eq!(for_tv[0].surface_id, a.surface_id);
        assert_ne!(for_tv[0].surface_id, b.surface_id);
    }

    #[tokio::test]
    async fn test_update_components_merges_by_id() {
        let store = store();
        let surface = store.create_surface(None, None, None).await;
        let id = &surface.surface_id;

        store
            .update_components(
                id,
                vec![
                    json!({"id": "root", "component": "Column", "children": ["t1", "t2"]}),
                    text_component("t1", "one"),
                    text_component("t2", "two"),
                ],
            )
            .await
            .unwrap();

        // Update only t1; t2 and root must be untouched.
        store
            .update_components(id, vec![text_component("t1", "updated")])
            .await
            .unwrap();

        let state = store.get_surface(id).unwrap();
        assert_eq!(state.components.len(), 3);
        let t1 = state.components.iter().find(|c| c.id == "t1").unwrap();
        assert_eq!(t1.str_field("text"), Some("updated"));
        let t2 = state.components.iter().find(|c| c.id == "t2").unwrap();
        assert_eq!(t2.str_field("text"), Some("two"));
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let store = store();
        let surface = store.create_surface(None, None, None).await;
        let id = &surface.surface_id;
        let batch = vec![text_component("t1", "x"), text_component("t2", "y")];

        store.update_components(id, batch.clone()).await.unwrap();
        let once = store.get_surface(id).unwrap().components;

        store.update_components(id, batch).await.unwrap();
        let twice = store.get_surface(id).unwrap().components;

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_root_auto_wrap_references_unreferenced_ids() {
        let store = store();
        let surface = store.create_surface(None, None, None).await;
        let id = &surface.surface_id;

        store
            .update_components(
                id,
                vec![
                    json!({"id": "card", "component": "Card", "children": ["t1"]}),
                    text_component("t1", "nested"),
                ],
            )
            .await
            .unwrap();

        let state = store.get_surface(id).unwrap();
        let roots: Vec<_> = state.components.iter().filter(|c| c.id == "root").collect();
        assert_eq!(roots.len(), 1);
        // Only "card" is top-level; "t1" is already referenced by it.
        assert_eq!(roots[0].children, vec!["card"]);
    }

    #[tokio::test]
    async fn test_synthesized_root_tracks_later_additions() {
        let store = store();
        let surface = store.create_surface(None, None, None).await;
        let id = &surface.surface_id;

        store
            .update_components(id, vec![text_component("t1", "one")])
            .await
            .unwrap();
        store
            .update_components(id, vec![text_component("t2", "two")])
            .await
            .unwrap();

        let state = store.get_surface(id).unwrap();
        let root = state.components.iter().find(|c| c.id == "root").unwrap();
        assert_eq!(root.children, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_caller_root_wins_over_synthesized() {
        let store = store();
        let surface = store.create_surface(None, None, None).await;
        let id = &surface.surface_id;

        store
            .update_components(id, vec![text_component("t1", "one")])
            .await
            .unwrap();
        store
            .update_components(
                id,
                vec![json!({"id": "root", "component": "Row", "children": ["t1"]})],
            )
            .await
            .unwrap();

        let state = store.get_surface(id).unwrap();
        let root = state.components.iter().find(|c| c.id == "root").unwrap();
        assert_eq!(root.kind, "Row");

        // A later rootless update leaves the caller's root alone.
        store
            .update_components(id, vec![text_component("t2", "two")])
            .await
            .unwrap();
        let state = store.get_surface(id).unwrap();
        let root = state.components.iter().find(|c| c.id == "root").unwrap();
        assert_eq!(root.kind, "Row");
        assert_eq!(root.children, vec!["t1"]);
    }

    #[tokio::test]
    async fn test_update_unknown_surface_is_not_found() {
        let store = store();
        let err = store
            .update_components("nonexistent", vec![])
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::SurfaceNotFound("nonexistent".to_string()));
    }

    #[tokio::test]
    async fn test_update_collects_warnings_without_rejecting() {
        let store = store();
        let surface = store.create_surface(None, None, None).await;

        let summary = store
            .update_components(
                &surface.surface_id,
                vec![json!({"id": "b1", "component": "Box", "props": {"padding": 8}})],
            )
            .await
            .unwrap();
        assert_eq!(summary.warnings.len(), 1);

        let state = store.get_surface(&surface.surface_id).unwrap();
        let b1 = state.components.iter().find(|c| c.id == "b1").unwrap();
        assert_eq!(b1.style["padding"], 8);
    }

    #[tokio::test]
    async fn test_update_data_model_creates_intermediates() {
        let store = store();
        let surface = store.create_surface(None, None, None).await;
        let id = &surface.surface_id;

        store
            .update_data_model(id, "/user/name", json!("Alice"))
            .await
            .unwrap();
        store
            .update_data_model(id, "/user/age", json!(30))
            .await
            .unwrap();

        let state = store.get_surface(id).unwrap();
        assert_eq!(state.data_model["user"]["name"], "Alice");
        assert_eq!(state.data_model["user"]["age"], 30);
    }

    #[tokio::test]
    async fn test_update_data_model_rejects_root_path() {
        let store = store();
        let surface = store.create_surface(None, None, None).await;

        for path in ["", "/", "//"] {
            let err = store
                .update_data_model(&surface.surface_id, path, json!({}))
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::InvalidPath(_)), "path {path:?}");
        }
    }

    #[tokio::test]
    async fn test_close_surface_removes_state() {
        let store = store();
        let surface = store.create_surface(None, None, None).await;
        let id = surface.surface_id.clone();

        store.close_surface(&id).await.unwrap();
        assert!(store.get_surface(&id).is_none());

        let err = store.close_surface(&id).await.unwrap_err();
        assert_eq!(err, StoreError::SurfaceNotFound(id));
    }

    #[tokio::test]
    async fn test_set_device_cursor_requires_existing_surface() {
        let store = store();
        let err = store.set_device_cursor("tv", "ghost").await.unwrap_err();
        assert_eq!(err, StoreError::SurfaceNotFound("ghost".to_string()));

        let surface = store.create_surface(None, None, None).await;
        store
            .set_device_cursor("tv", &surface.surface_id)
            .await
            .unwrap();
        assert_eq!(
            store.current_surface("tv").unwrap().surface_id,
            surface.surface_id
        );
    }

    #[test]
    fn test_set_pointer_replaces_scalar_intermediates() {
        let mut map = Map::new();
        set_pointer(&mut map, "/a", json!(1));
        set_pointer(&mut map, "/a/b", json!(2));
        assert_eq!(map["a"]["b"], 2);
    }
}
