//! Canvas Core - Agent-Driven Surface Rendering
//!
//! This crate lets an external controller (an AI agent or similar
//! automated client) declare and incrementally mutate a tree of UI
//! components plus a nested data model, and see the result as
//! live-updating HTML on connected viewers (browsers, cast receivers).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    External Controller                           │
//! │        component update requests / data patch requests           │
//! └───────────────────────────┬──────────────────────────────────────┘
//!                             │
//! ┌───────────────────────────▼──────────────────────────────────────┐
//! │                       SurfaceStore                               │
//! │   merge-update · data patch · persistence · lifecycle            │
//! │        │                │                    │                   │
//! │  ┌─────▼─────┐   ┌──────▼───────┐   ┌────────▼────────┐         │
//! │  │ Renderer  │   │ CursorTracker│   │   Broadcaster   │         │
//! │  │ (pure)    │   │ (per device) │   │ (fan-out, prune)│         │
//! │  └───────────┘   └──────────────┘   └────────┬────────┘         │
//! └──────────────────────────────────────────────┼──────────────────┘
//!                                                │
//! ┌──────────────────────────────────────────────▼──────────────────┐
//! │                     CanvasWebServer                             │
//! │     /canvas/{id} page shell  ·  /ws/{id} live subscribers       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`SurfaceStore`]: owns every surface's authoritative state
//! - [`render_components`]: pure (components, data model) -> HTML
//! - [`CursorTracker`]: per-device "current surface" navigation
//! - [`Broadcaster`]: best-effort fan-out to [`Subscriber`] handles
//! - [`CanvasWebServer`]: HTTP page shell + WebSocket push channel
//!
//! # Consistency Model
//!
//! All in-memory mutation is applied atomically under short locks that
//! are never held across await points; persistence writes and subscriber
//! sends are the only suspension points and operate on snapshots. Two
//! concurrent updates to one surface serialize their mutations but may
//! interleave their I/O, so viewers observe *some* consistent state:
//! eventual, not linearizable, visibility. See `SurfaceStore` docs.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod broadcast;
pub mod component;
pub mod config;
pub mod cursor;
pub mod error;
pub mod render;
pub mod server;
pub mod store;
pub mod surface;

// Re-exports for convenience
pub use broadcast::{BroadcastResult, Broadcaster, PushEvent, Subscriber, TransportError};
pub use component::{
    is_valid_tag, normalize_component, validate_components, Component, ComponentKind,
};
pub use config::{default_config_path, load_config_from_path, CanvasConfig, CanvasToml, ConfigError};
pub use cursor::{CursorTracker, NavDirection};
pub use error::{RenderError, StoreError};
pub use render::render_components;
pub use server::CanvasWebServer;
pub use store::{SurfaceStore, UpdateSummary};
pub use surface::{new_surface_id, CanvasSize, SizePreset, Surface, SurfaceState};
