//! Operation-logging render backend for testing render recursion.

use std::collections::HashMap;

use crate::geometry::Vector;
use crate::render::{Inherited, PixelData, RenderBackend, SurfaceId};

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    CreateSurface {
        surface: SurfaceId,
        size: Vector,
    },
    DrawGroup {
        surface: SurfaceId,
        inherited: Inherited,
    },
    DrawSprite {
        surface: SurfaceId,
        url: String,
        offset: Vector,
        inherited: Inherited,
    },
    /// `source` is the surface whose rasterized pixels were composited.
    Composite {
        surface: SurfaceId,
        source: SurfaceId,
    },
    Rasterize {
        surface: SurfaceId,
    },
}

/// A [`RenderBackend`] that draws nothing and records every call.
///
/// Rasterized buffers carry their source surface id in the byte payload, so
/// composites can be traced back to the surface they came from.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    ops: Vec<RenderOp>,
    sizes: HashMap<SurfaceId, Vector>,
    next_surface: u64,
}

impl RecordingRenderer {
    /// Create a renderer with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded operations, oldest first.
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Forget all recorded operations.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl RenderBackend for RecordingRenderer {
    fn create_surface(&mut self, size: Vector) -> SurfaceId {
        self.next_surface += 1;
        let surface = SurfaceId(self.next_surface);
        self.sizes.insert(surface, size);
        self.ops.push(RenderOp::CreateSurface { surface, size });
        surface
    }

    fn draw_group(&mut self, surface: SurfaceId, inherited: &Inherited) {
        self.ops.push(RenderOp::DrawGroup {
            surface,
            inherited: *inherited,
        });
    }

    fn draw_sprite(
        &mut self,
        surface: SurfaceId,
        url: &str,
        offset: Vector,
        inherited: &Inherited,
    ) {
        self.ops.push(RenderOp::DrawSprite {
            surface,
            url: url.to_owned(),
            offset,
            inherited: *inherited,
        });
    }

    fn composite(&mut self, surface: SurfaceId, pixels: &PixelData) {
        let source = pixels
            .bytes
            .first_chunk::<8>()
            .map(|bytes| SurfaceId(u64::from_le_bytes(*bytes)))
            .unwrap_or(SurfaceId(0));
        self.ops.push(RenderOp::Composite { surface, source });
    }

    fn rasterize(&mut self, surface: SurfaceId) -> PixelData {
        self.ops.push(RenderOp::Rasterize { surface });
        PixelData {
            size: self.sizes.remove(&surface).unwrap_or(Vector::ZERO),
            bytes: surface.0.to_le_bytes().to_vec(),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
