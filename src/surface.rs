//! Surface State
//!
//! Core data types for canvas surfaces: size descriptors, the persisted
//! per-surface state record, and the lightweight projection handed to
//! external callers.
//!
//! # Design Philosophy
//!
//! A surface is a named, independently addressable canvas holding one
//! component tree and one data model. The [`SurfaceState`] record is owned
//! exclusively by the store and mutated only through its update operations;
//! everything else sees the [`Surface`] projection, which carries viewer
//! URLs and the live subscriber count but no component/data payload.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::component::Component;

/// Predefined canvas size presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizePreset {
    /// 1920x1080 (16:9) - Full HD TV
    #[serde(rename = "tv_1080p")]
    Tv1080p,
    /// 3840x2160 (16:9) - 4K TV
    #[serde(rename = "tv_4k")]
    Tv4k,
    /// 390x844 (9:19.5) - phone portrait
    #[serde(rename = "phone")]
    Phone,
    /// 1024x768 (4:3) - tablet
    #[serde(rename = "tablet")]
    Tablet,
    /// 1080x1080 (1:1) - square
    #[serde(rename = "square")]
    Square,
    /// Fit to viewport
    #[serde(rename = "auto")]
    Auto,
    /// Custom dimensions
    #[serde(rename = "custom")]
    Custom,
}

impl SizePreset {
    /// Parse a preset name as used in configuration and requests
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "tv_1080p" => Some(Self::Tv1080p),
            "tv_4k" => Some(Self::Tv4k),
            "phone" => Some(Self::Phone),
            "tablet" => Some(Self::Tablet),
            "square" => Some(Self::Square),
            "auto" => Some(Self::Auto),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Canonical name of this preset
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tv1080p => "tv_1080p",
            Self::Tv4k => "tv_4k",
            Self::Phone => "phone",
            Self::Tablet => "tablet",
            Self::Square => "square",
            Self::Auto => "auto",
            Self::Custom => "custom",
        }
    }

    /// Fixed dimensions for this preset, if any
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Tv1080p => Some((1920, 1080)),
            Self::Tv4k => Some((3840, 2160)),
            Self::Phone => Some((390, 844)),
            Self::Tablet => Some((1024, 768)),
            Self::Square => Some((1080, 1080)),
            Self::Auto | Self::Custom => None,
        }
    }
}

/// Canvas size configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSize {
    /// Width in pixels (None = auto)
    pub width: Option<u32>,
    /// Height in pixels (None = auto)
    pub height: Option<u32>,
    /// The preset this size was derived from
    pub preset: SizePreset,
    /// How viewers scale the canvas: fit, fill, stretch, none
    #[serde(default = "default_scale_mode")]
    pub scale_mode: String,
}

fn default_scale_mode() -> String {
    "fit".to_string()
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::from_preset(SizePreset::Auto)
    }
}

impl CanvasSize {
    /// Create a size from a preset
    #[must_use]
    pub fn from_preset(preset: SizePreset) -> Self {
        let (width, height) = match preset.dimensions() {
            Some((w, h)) => (Some(w), Some(h)),
            None => (None, None),
        };
        Self {
            width,
            height,
            preset,
            scale_mode: default_scale_mode(),
        }
    }

    /// Create a size from a preset name (e.g. `"tv_1080p"`)
    #[must_use]
    pub fn from_preset_name(name: &str) -> Option<Self> {
        SizePreset::parse(name).map(Self::from_preset)
    }

    /// Aspect ratio (width/height), or None when auto-sized
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if h > 0 => Some(f64::from(w) / f64::from(h)),
            _ => None,
        }
    }

    /// CSS width value for viewer pages
    #[must_use]
    pub fn css_width(&self) -> String {
        match self.width {
            Some(w) => format!("{w}px"),
            None => "100%".to_string(),
        }
    }

    /// CSS height value for viewer pages
    #[must_use]
    pub fn css_height(&self) -> String {
        match self.height {
            Some(h) => format!("{h}px"),
            None => "100%".to_string(),
        }
    }
}

/// Persisted state of a canvas surface
///
/// This is the full authoritative record: one JSON file per surface when
/// persistence is enabled, indented and human-diffable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceState {
    /// Unique, creation-time-sortable surface id
    pub surface_id: String,
    /// Optional friendly name
    #[serde(default)]
    pub name: Option<String>,
    /// Associated device (display) for this surface
    #[serde(default)]
    pub device_id: Option<String>,
    /// Canvas size configuration
    #[serde(default)]
    pub size: CanvasSize,
    /// Flat component set, keyed by component id
    #[serde(default)]
    pub components: Vec<Component>,
    /// Nested data model bound into components at render time
    #[serde(default)]
    pub data_model: Map<String, serde_json::Value>,
    /// When the surface was created
    pub created_at: DateTime<Utc>,
    /// When the surface was last mutated
    pub updated_at: DateTime<Utc>,
}

impl SurfaceState {
    /// Create a fresh surface state with no components or data
    #[must_use]
    pub fn new(
        surface_id: String,
        name: Option<String>,
        device_id: Option<String>,
        size: CanvasSize,
    ) -> Self {
        let now = Utc::now();
        Self {
            surface_id,
            name,
            device_id,
            size,
            components: Vec::new(),
            data_model: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the last-mutated timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A canvas surface with connection info
///
/// Projection of [`SurfaceState`] without the component/data payload,
/// plus viewer URLs and runtime subscriber count.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    /// Unique surface id
    pub surface_id: String,
    /// Optional friendly name
    pub name: Option<String>,
    /// Associated device (display) for this surface
    pub device_id: Option<String>,
    /// Canvas size configuration
    pub size: CanvasSize,
    /// URL of the HTTP viewer page for this surface
    pub local_url: String,
    /// WebSocket URL for real-time updates
    pub ws_url: String,
    /// When the surface was created
    pub created_at: DateTime<Utc>,
    /// Number of live subscribers (runtime state, not persisted)
    #[serde(default)]
    pub connected_clients: usize,
}

/// Generate a unique, timestamp-based surface id
///
/// Format: `YYYYMMDD-HHMMSS-xxxx` where `xxxx` is a per-process monotonic
/// sequence number in hex, so ids created within the same second still
/// sort in creation order. Lexicographic order over these ids is
/// creation-time order, which surface listing and cursor navigation rely
/// on (single-writer model: ids are only ever minted by one process at a
/// time).
#[must_use]
pub fn new_surface_id() -> String {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);
    let seq = SEQUENCE.fetch_add(1, Ordering::SeqCst);
    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    format!("{timestamp}-{seq:04x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_dimensions() {
        let size = CanvasSize::from_preset(SizePreset::Tv1080p);
        assert_eq!(size.width, Some(1920));
        assert_eq!(size.height, Some(1080));
        assert_eq!(size.css_width(), "1920px");
        assert_eq!(size.aspect_ratio(), Some(16.0 / 9.0));
    }

    #[test]
    fn test_auto_preset_has_no_dimensions() {
        let size = CanvasSize::from_preset(SizePreset::Auto);
        assert_eq!(size.width, None);
        assert_eq!(size.css_width(), "100%");
        assert_eq!(size.css_height(), "100%");
        assert_eq!(size.aspect_ratio(), None);
    }

    #[test]
    fn test_preset_parse_roundtrip() {
        for name in ["tv_1080p", "tv_4k", "phone", "tablet", "square", "auto", "custom"] {
            let preset = SizePreset::parse(name).unwrap();
            assert_eq!(preset.name(), name);
        }
        assert!(SizePreset::parse("cinema").is_none());
    }

    #[test]
    fn test_surface_ids_sort_in_creation_order() {
        let a = new_surface_id();
        let b = new_surface_id();
        let c = new_surface_id();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_size_serialization_uses_camel_case() {
        let size = CanvasSize::from_preset(SizePreset::Phone);
        let json = serde_json::to_value(&size).unwrap();
        assert_eq!(json["preset"], "phone");
        assert_eq!(json["scaleMode"], "fit");
        assert_eq!(json["width"], 390);
    }

    #[test]
    fn test_surface_state_serialization_shape() {
        let state = SurfaceState::new(
            "20250101-120000-abcd".to_string(),
            Some("dashboard".to_string()),
            None,
            CanvasSize::default(),
        );
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["surfaceId"], "20250101-120000-abcd");
        assert!(json.get("dataModel").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
