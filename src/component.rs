//! Canvas Components
//!
//! One component is one node of a surface's UI tree, addressed by a unique
//! id within that surface. Components arrive from external controllers as
//! loose JSON objects; this module owns the closed set of supported kinds,
//! the alias/correction table for common naming mistakes, and the
//! normalization + validation pass every incoming batch goes through
//! before it is merged into a surface.
//!
//! # Design Philosophy
//!
//! Controllers build trees incrementally and imperfectly. Normalization
//! corrects what it safely can (case, known aliases, the legacy `props`
//! field) and validation reports the rest as warnings: an update is never
//! rejected for a malformed component, it is merged as-is and the renderer
//! deals with it at render time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The closed set of supported component kinds
///
/// The renderer dispatches over this enum with an exhaustive match, so an
/// unsupported type is a parse failure at the enum boundary rather than a
/// lookup miss inside the dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Vertical flex container
    Column,
    /// Horizontal flex container
    Row,
    /// CSS grid container
    Grid,
    /// Generic block container
    Box,
    /// Emphasized container with card chrome
    Card,
    /// Flexible spacer
    Spacer,
    /// Horizontal or vertical rule
    Divider,
    /// Text content, data-bindable
    Text,
    /// Image with optional alt text
    Image,
    /// Icon or emoji glyph
    Icon,
    /// Avatar with image, initials, or name fallback
    Avatar,
    /// List of child components or data-model items
    List,
    /// Table with headers and data-model rows
    Table,
    /// Progress bar (0-100)
    Progress,
    /// Alias kind for progress bars
    ProgressBar,
    /// Pill badge
    Badge,
    /// Loading spinner
    Spinner,
}

impl ComponentKind {
    /// Every supported kind, in canonical declaration order
    pub const ALL: [ComponentKind; 17] = [
        Self::Column,
        Self::Row,
        Self::Grid,
        Self::Box,
        Self::Card,
        Self::Spacer,
        Self::Divider,
        Self::Text,
        Self::Image,
        Self::Icon,
        Self::Avatar,
        Self::List,
        Self::Table,
        Self::Progress,
        Self::ProgressBar,
        Self::Badge,
        Self::Spinner,
    ];

    /// Parse a canonical PascalCase type tag
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "Column" => Some(Self::Column),
            "Row" => Some(Self::Row),
            "Grid" => Some(Self::Grid),
            "Box" => Some(Self::Box),
            "Card" => Some(Self::Card),
            "Spacer" => Some(Self::Spacer),
            "Divider" => Some(Self::Divider),
            "Text" => Some(Self::Text),
            "Image" => Some(Self::Image),
            "Icon" => Some(Self::Icon),
            "Avatar" => Some(Self::Avatar),
            "List" => Some(Self::List),
            "Table" => Some(Self::Table),
            "Progress" => Some(Self::Progress),
            "ProgressBar" => Some(Self::ProgressBar),
            "Badge" => Some(Self::Badge),
            "Spinner" => Some(Self::Spinner),
            _ => None,
        }
    }

    /// Canonical type tag for this kind
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Column => "Column",
            Self::Row => "Row",
            Self::Grid => "Grid",
            Self::Box => "Box",
            Self::Card => "Card",
            Self::Spacer => "Spacer",
            Self::Divider => "Divider",
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Icon => "Icon",
            Self::Avatar => "Avatar",
            Self::List => "List",
            Self::Table => "Table",
            Self::Progress => "Progress",
            Self::ProgressBar => "ProgressBar",
            Self::Badge => "Badge",
            Self::Spinner => "Spinner",
        }
    }
}

/// Check whether a tag names a supported component kind
#[must_use]
pub fn is_valid_tag(tag: &str) -> bool {
    ComponentKind::parse(tag).is_some()
}

/// Comma-separated sorted list of valid tags, for log messages
fn valid_tags_list() -> String {
    let mut tags: Vec<&str> = ComponentKind::ALL.iter().map(ComponentKind::tag).collect();
    tags.sort_unstable();
    tags.join(", ")
}

/// Map a lowercased tag to its canonical correction
///
/// Covers lowercase spellings of every valid kind plus common mistakes
/// observed from external controllers.
fn alias_for(lower: &str) -> Option<&'static str> {
    match lower {
        // Lowercase versions
        "column" => Some("Column"),
        "row" => Some("Row"),
        "grid" => Some("Grid"),
        "box" => Some("Box"),
        "card" => Some("Card"),
        "spacer" => Some("Spacer"),
        "divider" => Some("Divider"),
        "text" => Some("Text"),
        "image" => Some("Image"),
        "icon" => Some("Icon"),
        "avatar" => Some("Avatar"),
        "list" => Some("List"),
        "table" => Some("Table"),
        "progress" => Some("Progress"),
        "progressbar" => Some("ProgressBar"),
        "badge" => Some("Badge"),
        "spinner" => Some("Spinner"),
        // Common mistakes
        "rectangle" | "rect" | "container" | "div" | "view" => Some("Box"),
        "span" | "label" | "paragraph" | "p" => Some("Text"),
        "img" | "picture" | "photo" => Some("Image"),
        "vstack" | "stack" => Some("Column"),
        "hstack" | "flex" | "flexbox" => Some("Row"),
        _ => None,
    }
}

/// One node of a surface's component tree
///
/// Stored flat in the surface, keyed by [`Component::id`]; tree shape is
/// reconstructed at render time by following [`Component::children`]
/// references. The type tag is kept as a string because validation
/// tolerates unknown tags; the renderer converts to [`ComponentKind`]
/// and reports `UnknownComponentType` only when the node is reachable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique id within the surface
    #[serde(default)]
    pub id: String,
    /// Component type tag (canonical after normalization)
    #[serde(rename = "component", default)]
    pub kind: String,
    /// Ordered child component ids; forward references are tolerated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    /// Inline style overrides, camelCase CSS keys
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub style: Map<String, Value>,
    /// Type-specific fields (text, src, items, value, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Component {
    /// Look up a type-specific field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Look up a type-specific string field
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Normalize a raw component definition to fix common mistakes
///
/// - Corrects known aliases and lowercase spellings to canonical tags
/// - Upgrades unknown tags to PascalCase when that yields a valid tag
/// - Migrates the legacy `props` field to `style`
///
/// Corrections are logged; an unknown tag that survives all corrections
/// is logged at error level but kept as-is.
#[must_use]
pub fn normalize_component(raw: &Value) -> Value {
    let mut normalized = raw.clone();
    let Some(obj) = normalized.as_object_mut() else {
        return normalized;
    };

    let tag = obj
        .get("component")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if !tag.is_empty() {
        if let Some(correct) = alias_for(&tag.to_ascii_lowercase()) {
            if tag != correct {
                tracing::warn!(from = %tag, to = %correct, "Component type normalized");
            }
            obj.insert("component".to_string(), Value::String(correct.to_string()));
        } else if !is_valid_tag(&tag) {
            let mut chars = tag.chars();
            let pascal = match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            };
            if is_valid_tag(&pascal) {
                tracing::warn!(from = %tag, to = %pascal, "Component type normalized");
                obj.insert("component".to_string(), Value::String(pascal));
            } else {
                tracing::error!(
                    tag = %tag,
                    valid = %valid_tags_list(),
                    "Unknown component type"
                );
            }
        }
    }

    if obj.contains_key("props") && !obj.contains_key("style") {
        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        tracing::warn!(component = %id, "'props' converted to 'style'");
        if let Some(props) = obj.remove("props") {
            obj.insert("style".to_string(), props);
        }
    }

    normalized
}

/// Validate normalized components, returning warning messages
///
/// Warnings never block an update; they are surfaced to the caller and
/// logged so a controller can correct itself on the next batch.
#[must_use]
pub fn validate_components(components: &[Value]) -> Vec<String> {
    let mut warnings = Vec::new();

    for comp in components {
        let id = comp
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let tag = comp
            .get("component")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if comp.get("id").and_then(Value::as_str).unwrap_or_default().is_empty() {
            warnings.push("Component missing 'id' field".to_string());
        }

        if tag.is_empty() {
            warnings.push(format!("Component '{id}' missing 'component' field"));
        } else if !is_valid_tag(tag) {
            warnings.push(format!("Component '{id}' has invalid type '{tag}'"));
        }

        if comp.get("props").is_some() {
            warnings.push(format!("Component '{id}' uses 'props' instead of 'style'"));
        }
    }

    warnings
}
