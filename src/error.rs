//! Error Types
//!
//! Typed error taxonomy for the canvas core. Errors here are either
//! surfaced to the immediate caller (`StoreError::SurfaceNotFound`) or
//! confined to a single render/broadcast cycle (`RenderError`). Nothing
//! in this crate escalates to a process-fatal condition: persistence and
//! transport failures are logged and absorbed at their call sites.

use thiserror::Error;

/// Errors raised by the renderer
///
/// Any render error aborts the entire render: no partial markup is ever
/// produced. The store treats a render failure as a no-broadcast condition
/// for that cycle; the surface state itself remains intact.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// No component with id `"root"` was found
    #[error("no root component found for rendering")]
    MissingRoot,

    /// A component reachable from the root has a type outside the
    /// supported set
    #[error("unknown component type '{tag}' on component '{id}'")]
    UnknownComponentType {
        /// Id of the offending component
        id: String,
        /// The unrecognized type tag
        tag: String,
    },
}

/// Errors raised by surface store operations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The operation referenced a surface that does not exist
    #[error("surface not found: {0}")]
    SurfaceNotFound(String),

    /// A data-model patch targeted an unwritable path
    #[error("invalid data model path: {0}")]
    InvalidPath(String),
}
