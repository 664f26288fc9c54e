//! Display objects: the payload of the 2D scene graph.

use std::any::Any;

use crate::geometry::{degrees_to_radians, radians_to_degrees, Vector};
use crate::tree::Labeled;

// ---------------------------------------------------------------------------
// DisplayKind
// ---------------------------------------------------------------------------

/// What a display object is. The set is closed: stage rendering matches it
/// exhaustively, so adding a kind is a compile-time obligation on the
/// renderer dispatch, not a runtime fallthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayKind {
    /// A grouping node whose children render beneath it.
    Container,
    /// A leaf referencing a bitmap or vector image by source URL.
    Image { url: String },
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// A display-object filter.
///
/// Filters are carried as data but not yet applied: rendering an object that
/// has any fails with an explicit not-implemented error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    Blur { radius: f64 },
}

// ---------------------------------------------------------------------------
// DisplayObject
// ---------------------------------------------------------------------------

/// A node of the 2D scene graph.
///
/// Position, rotation, and scale use the object's center as the registration
/// point. Rotation is stored in radians; the degree accessors are a unit
/// conversion over the same value, not a separate field.
pub struct DisplayObject {
    pub kind: DisplayKind,
    /// Identifier used by path resolution.
    pub id: Option<String>,
    pub position: Vector,
    /// Rotation in radians.
    pub rotation: f64,
    /// Non-uniform scale.
    pub scale: Vector,
    /// Opacity ratio, 0 to 1 inclusive.
    pub opacity: f64,
    pub visible: bool,
    pub filters: Vec<Filter>,
    /// Arbitrary data attached by the developer.
    pub meta: Option<Box<dyn Any>>,
}

impl DisplayObject {
    fn new(kind: DisplayKind) -> Self {
        Self {
            kind,
            id: None,
            position: Vector::ZERO,
            rotation: 0.0,
            scale: Vector::ONE,
            opacity: 1.0,
            visible: true,
            filters: Vec::new(),
            meta: None,
        }
    }

    /// Create a container object.
    pub fn container() -> Self {
        Self::new(DisplayKind::Container)
    }

    /// Create an image object with the given source URL.
    pub fn image(url: impl Into<String>) -> Self {
        Self::new(DisplayKind::Image { url: url.into() })
    }

    /// Set the path identifier (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the position (builder).
    pub fn with_position(mut self, position: Vector) -> Self {
        self.position = position;
        self
    }

    /// Set the scale (builder).
    pub fn with_scale(mut self, scale: Vector) -> Self {
        self.scale = scale;
        self
    }

    /// Set the opacity (builder).
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the visibility (builder).
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Rotation in degrees, a converted view of the radian value.
    pub fn rotation_degrees(&self) -> f64 {
        radians_to_degrees(self.rotation)
    }

    /// Set the rotation from degrees.
    pub fn set_rotation_degrees(&mut self, degrees: f64) {
        self.rotation = degrees_to_radians(degrees);
    }
}

impl Labeled for DisplayObject {
    fn label(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl std::fmt::Debug for DisplayObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayObject")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("opacity", &self.opacity)
            .field("visible", &self.visible)
            .field("filters", &self.filters)
            .field("meta", &self.meta.as_ref().map(|_| ".."))
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
