//! The opaque drawing boundary used by stage rendering.
//!
//! The scene graph does not rasterize anything itself. It drives a
//! [`RenderBackend`]: offscreen surfaces are created per display object,
//! shapes (groups and sprites) are drawn onto them carrying the composed
//! inherited properties, child surfaces are read back as pixels and
//! composited bottom-up. The backend decides what a surface or a sprite
//! actually is.

use crate::geometry::Vector;

// ---------------------------------------------------------------------------
// Inherited
// ---------------------------------------------------------------------------

/// Properties a display object inherits from its ancestors, fully composed.
///
/// Position and rotation accumulate additively, scale and opacity
/// multiplicatively. Visibility carries the node's own flag only; it is not
/// masked by ancestor visibility (the ancestor's own group already carries
/// its flag, so a culling backend hides the subtree).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inherited {
    pub position: Vector,
    pub rotation: f64,
    pub scale: Vector,
    pub opacity: f64,
    pub visible: bool,
}

impl Inherited {
    /// The identity: no offset, no rotation, unit scale, opaque, visible.
    pub const IDENTITY: Inherited = Inherited {
        position: Vector::ZERO,
        rotation: 0.0,
        scale: Vector::ONE,
        opacity: 1.0,
        visible: true,
    };
}

// ---------------------------------------------------------------------------
// SurfaceId / PixelData
// ---------------------------------------------------------------------------

/// Backend-allocated handle to an offscreen drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// A rasterized pixel buffer read back from a surface.
///
/// The byte layout is backend-defined; the scene graph only moves buffers
/// between surfaces and the presenting canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelData {
    pub size: Vector,
    pub bytes: Vec<u8>,
}

impl PixelData {
    /// An empty buffer of the given size.
    pub fn empty(size: Vector) -> Self {
        Self {
            size,
            bytes: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// RenderBackend
// ---------------------------------------------------------------------------

/// The drawing operations stage rendering is written against.
///
/// Object-safe so stages can hold `Box<dyn RenderBackend>` or borrow
/// `&mut dyn RenderBackend` from the embedding.
pub trait RenderBackend {
    /// Allocate an offscreen surface with the given pixel dimensions.
    fn create_surface(&mut self, size: Vector) -> SurfaceId;

    /// Draw an empty group shape carrying the inherited properties.
    fn draw_group(&mut self, surface: SurfaceId, inherited: &Inherited);

    /// Draw a sprite anchored at a source URL, offset from the surface
    /// origin, carrying the inherited properties.
    fn draw_sprite(&mut self, surface: SurfaceId, url: &str, offset: Vector, inherited: &Inherited);

    /// Composite an already-rasterized buffer onto a surface at its origin.
    fn composite(&mut self, surface: SurfaceId, pixels: &PixelData);

    /// Read a surface back as pixels, consuming the surface.
    fn rasterize(&mut self, surface: SurfaceId) -> PixelData;
}

// ===========================================================================
// Tests
// ===========================================================================
