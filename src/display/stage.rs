//! Stage: owns a scene, fits it to the available screen, renders it.

use tracing::{debug, trace};

use crate::geometry::Vector;
use crate::render::{Inherited, PixelData, RenderBackend};
use crate::tree::{NodeId, Tree};
use crate::ui::native::{ElementId, NativeBackend, ResizeListenerId};

use super::object::{DisplayKind, DisplayObject};

// ---------------------------------------------------------------------------
// Fit / options
// ---------------------------------------------------------------------------

/// Stage's fit mode.
///
/// - `None` — no scaling of the stage is done.
/// - `Optimal` — the stage is scaled to fit the screen using an optimal
///   scale ratio, preserving aspect without cropping.
/// - `All` — the stage takes all space available in the screen, without
///   additional scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    None,
    Optimal,
    All,
}

/// Where the stage's canvas comes from. The two are mutually exclusive by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMount {
    /// Use an existing canvas element.
    Canvas(ElementId),
    /// Create a canvas inside the given container element.
    Container(ElementId),
}

/// Configuration for [`Stage::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct StageOptions {
    /// Fit mode.
    pub fit: Fit,
    /// Initial stage logical size.
    pub size: Vector,
    /// Canvas mount point.
    pub mount: StageMount,
    /// A CSS background for the canvas.
    pub background: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from stage rendering.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Raised when a rendered display object carries filters; distinct from
    /// any precondition violation.
    #[error("display object filters are not implemented")]
    FiltersNotImplemented,
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// A 2D display stage.
///
/// Two states: **detached** (initial) and **attached**. Rendering and
/// resizing are no-ops while detached. The stage owns its scene tree and the
/// root container; drawing goes through a [`RenderBackend`] and presentation
/// through the canvas element of a [`NativeBackend`].
#[derive(Debug)]
pub struct Stage {
    scene: Tree<DisplayObject>,
    root: NodeId,
    fit: Fit,
    size: Vector,
    canvas: ElementId,
    attached: bool,
    did_initial_render: bool,
    resize_listener: Option<ResizeListenerId>,
    last_resize_size: Vector,
    last_resize_scale: f64,
}

impl Stage {
    /// Create a detached stage.
    ///
    /// With [`StageMount::Container`] a canvas element is created and
    /// appended to the container; with [`StageMount::Canvas`] the given
    /// canvas is used as-is.
    pub fn new(options: StageOptions, native: &mut dyn NativeBackend) -> Self {
        let canvas = match options.mount {
            StageMount::Canvas(canvas) => canvas,
            StageMount::Container(container) => {
                let canvas = native.create_element(crate::ui::native::Tag::Canvas);
                native.insert_child(container, usize::MAX, canvas);
                canvas
            }
        };
        if let Some(background) = &options.background {
            native.set_background(canvas, background);
        }

        let mut scene = Tree::new();
        let root = scene.insert(DisplayObject::container());

        Self {
            scene,
            root,
            fit: options.fit,
            size: options.size,
            canvas,
            attached: false,
            did_initial_render: false,
            resize_listener: None,
            last_resize_size: Vector::ZERO,
            last_resize_scale: 0.0,
        }
    }

    /// The root container of the scene.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The scene tree.
    pub fn scene(&self) -> &Tree<DisplayObject> {
        &self.scene
    }

    /// Mutable access to the scene tree.
    pub fn scene_mut(&mut self) -> &mut Tree<DisplayObject> {
        &mut self.scene
    }

    /// The canvas element used by this stage.
    pub fn canvas(&self) -> ElementId {
        self.canvas
    }

    /// The stage's logical size. Overwritten by [`Fit::All`] resizes.
    pub fn size(&self) -> Vector {
        self.size
    }

    /// The stage's fit mode.
    pub fn fit(&self) -> Fit {
        self.fit
    }

    /// Whether the stage is attached to the document.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Size computed by the last resize.
    pub fn last_resize_size(&self) -> Vector {
        self.last_resize_size
    }

    /// Scale ratio computed by the last resize.
    pub fn last_resize_scale(&self) -> f64 {
        self.last_resize_scale
    }

    /// Attach the stage to the document, registering its resize listener.
    /// Idempotent if already attached.
    pub fn attach_to_document(&mut self, native: &mut dyn NativeBackend) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.resize_listener = Some(native.add_resize_listener());
        debug!("stage attached to document");
    }

    /// Detach the stage from the document, removing its canvas element and
    /// resize listener. Idempotent if already detached.
    pub fn detach_from_document(&mut self, native: &mut dyn NativeBackend) {
        if !self.attached {
            return;
        }
        self.attached = false;
        native.remove_element(self.canvas);
        if let Some(listener) = self.resize_listener.take() {
            native.remove_resize_listener(listener);
        }
        debug!("stage detached from document");
    }

    /// Recompute the resize size/scale from the fit mode, typically in
    /// response to a window resize. No-op while detached.
    ///
    /// If an initial render has already happened, a render is triggered
    /// immediately so the displayed frame stays consistent with the new
    /// size.
    pub fn resize(
        &mut self,
        native: &mut dyn NativeBackend,
        renderer: &mut dyn RenderBackend,
    ) -> Result<(), StageError> {
        if !self.attached {
            return Ok(());
        }

        match self.fit {
            Fit::None => {
                self.last_resize_size = self.size;
                self.last_resize_scale = 1.0;
            }
            Fit::Optimal => {
                let screen_size = native.viewport_size(self.canvas);
                // Take the optimal scale ratio.
                let ratios = screen_size.divide(self.size);
                let optimal_ratio = ratios.x.min(ratios.y);
                self.last_resize_size = self.size * optimal_ratio;
                self.last_resize_scale = optimal_ratio;
            }
            Fit::All => {
                let screen_size = native.viewport_size(self.canvas);
                self.size = screen_size;
                self.last_resize_size = screen_size;
                self.last_resize_scale = 1.0;
            }
        }

        native.set_canvas_size(self.canvas, self.last_resize_size);
        trace!(
            size = ?self.last_resize_size,
            scale = self.last_resize_scale,
            "stage resized"
        );

        if self.did_initial_render {
            self.render(native, renderer)?;
        }
        Ok(())
    }

    /// Render the stage. No-op while detached.
    pub fn render(
        &mut self,
        native: &mut dyn NativeBackend,
        renderer: &mut dyn RenderBackend,
    ) -> Result<(), StageError> {
        if !self.attached {
            return Ok(());
        }
        self.did_initial_render = true;
        native.clear_canvas(self.canvas);

        let root_object = self.scene.get(self.root).expect("stage root must exist");
        let inherited = compose_inherited(&Inherited::IDENTITY, root_object);
        let pixels = self.render_object(renderer, self.root, &inherited)?;
        native.present(self.canvas, &pixels);
        trace!("stage rendered");
        Ok(())
    }

    /// Render one display object into a fresh offscreen surface: children
    /// first (composited bottom-up), then the object's own shape, then the
    /// surface is read back as pixels for the caller to composite.
    fn render_object(
        &self,
        renderer: &mut dyn RenderBackend,
        id: NodeId,
        inherited: &Inherited,
    ) -> Result<PixelData, StageError> {
        let object = self.scene.get(id).expect("display object must exist");
        if !object.filters.is_empty() {
            return Err(StageError::FiltersNotImplemented);
        }

        let surface = renderer.create_surface(self.last_resize_size);

        for &child in self.scene.children(id) {
            let child_object = self.scene.get(child).expect("display child must exist");
            let child_inherited = compose_inherited(inherited, child_object);
            let child_pixels = self.render_object(renderer, child, &child_inherited)?;
            renderer.composite(surface, &child_pixels);
        }

        match &object.kind {
            DisplayKind::Container => renderer.draw_group(surface, inherited),
            DisplayKind::Image { url } => {
                renderer.draw_sprite(surface, url, Vector::ZERO, inherited)
            }
        }

        Ok(renderer.rasterize(surface))
    }
}

/// Combine the parent-inherited properties with a node's own.
///
/// Visibility carries the node's own flag; it is deliberately not masked by
/// the ancestor value.
fn compose_inherited(previous: &Inherited, node: &DisplayObject) -> Inherited {
    Inherited {
        position: previous.position + node.position,
        rotation: previous.rotation + node.rotation,
        scale: previous.scale.multiply(node.scale),
        opacity: previous.opacity * node.opacity,
        visible: node.visible,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HeadlessDocument, RecordingRenderer, RenderOp};
    use crate::ui::native::Tag;

    fn canvas_in_body(doc: &mut HeadlessDocument) -> ElementId {
        let canvas = doc.create_element(Tag::Canvas);
        let body = doc.body();
        doc.insert_child(body, 0, canvas);
        canvas
    }

    fn attached_stage(
        fit: Fit,
        size: Vector,
        doc: &mut HeadlessDocument,
    ) -> Stage {
        let canvas = canvas_in_body(doc);
        let mut stage = Stage::new(
            StageOptions {
                fit,
                size,
                mount: StageMount::Canvas(canvas),
                background: None,
            },
            doc,
        );
        stage.attach_to_document(doc);
        stage
    }

    // ── compose_inherited ────────────────────────────────────────────

    #[test]
    fn inherited_composition() {
        let parent = Inherited {
            position: Vector::new(10.0, 20.0),
            rotation: 0.5,
            scale: Vector::new(2.0, 2.0),
            opacity: 0.5,
            visible: false,
        };
        let child = DisplayObject::container()
            .with_position(Vector::new(1.0, 2.0))
            .with_scale(Vector::new(0.5, 3.0))
            .with_opacity(0.5);

        let composed = compose_inherited(&parent, &child);
        assert_eq!(composed.position, Vector::new(11.0, 22.0));
        assert_eq!(composed.rotation, 0.5);
        assert_eq!(composed.scale, Vector::new(1.0, 6.0));
        assert_eq!(composed.opacity, 0.25);
        // The node's own flag, not masked by the invisible parent.
        assert!(composed.visible);
    }

    // ── construction / mounting ──────────────────────────────────────

    #[test]
    fn container_mount_creates_canvas() {
        let mut doc = HeadlessDocument::new();
        let holder = doc.create_element(Tag::Div);
        let body = doc.body();
        doc.insert_child(body, 0, holder);

        let stage = Stage::new(
            StageOptions {
                fit: Fit::None,
                size: Vector::new(100.0, 100.0),
                mount: StageMount::Container(holder),
                background: Some("#000".to_owned()),
            },
            &mut doc,
        );

        assert_eq!(doc.children_of(holder), vec![stage.canvas()]);
        assert_eq!(
            doc.element(stage.canvas()).unwrap().background.as_deref(),
            Some("#000")
        );
        assert!(!stage.is_attached());
    }

    // ── attach / detach state machine ────────────────────────────────

    #[test]
    fn attach_registers_one_listener_idempotently() {
        let mut doc = HeadlessDocument::new();
        let mut stage = attached_stage(Fit::None, Vector::new(10.0, 10.0), &mut doc);
        assert!(stage.is_attached());
        assert_eq!(doc.resize_listener_count(), 1);

        stage.attach_to_document(&mut doc);
        assert_eq!(doc.resize_listener_count(), 1);
    }

    #[test]
    fn detach_removes_canvas_then_listener() {
        let mut doc = HeadlessDocument::new();
        let mut stage = attached_stage(Fit::None, Vector::new(10.0, 10.0), &mut doc);
        stage.detach_from_document(&mut doc);

        assert!(!stage.is_attached());
        assert_eq!(doc.resize_listener_count(), 0);
        assert!(doc.parent_of(stage.canvas()).is_none());

        let log = doc.op_log();
        let removed_at = log
            .iter()
            .position(|op| op.starts_with("remove_element"))
            .unwrap();
        let unlistened_at = log
            .iter()
            .position(|op| op.starts_with("remove_resize_listener"))
            .unwrap();
        assert!(removed_at < unlistened_at);

        // Idempotent.
        stage.detach_from_document(&mut doc);
        assert_eq!(doc.resize_listener_count(), 0);
    }

    #[test]
    fn render_and_resize_are_noops_while_detached() {
        let mut doc = HeadlessDocument::new();
        let mut renderer = RecordingRenderer::new();
        let canvas = canvas_in_body(&mut doc);
        let mut stage = Stage::new(
            StageOptions {
                fit: Fit::Optimal,
                size: Vector::new(100.0, 100.0),
                mount: StageMount::Canvas(canvas),
                background: None,
            },
            &mut doc,
        );

        stage.resize(&mut doc, &mut renderer).unwrap();
        stage.render(&mut doc, &mut renderer).unwrap();
        assert!(renderer.ops().is_empty());
        assert_eq!(stage.last_resize_size(), Vector::ZERO);
    }

    // ── resize / fit modes ───────────────────────────────────────────

    #[test]
    fn fit_none_uses_logical_size() {
        let mut doc = HeadlessDocument::new();
        let mut renderer = RecordingRenderer::new();
        let mut stage = attached_stage(Fit::None, Vector::new(700.0, 570.0), &mut doc);

        stage.resize(&mut doc, &mut renderer).unwrap();
        assert_eq!(stage.last_resize_size(), Vector::new(700.0, 570.0));
        assert_eq!(stage.last_resize_scale(), 1.0);
    }

    #[test]
    fn fit_optimal_takes_minimum_ratio() {
        let mut doc = HeadlessDocument::new();
        doc.set_viewport(Vector::new(350.0, 285.0));
        let mut renderer = RecordingRenderer::new();
        let mut stage = attached_stage(Fit::Optimal, Vector::new(700.0, 570.0), &mut doc);

        stage.resize(&mut doc, &mut renderer).unwrap();
        assert_eq!(stage.last_resize_scale(), 0.5);
        assert_eq!(stage.last_resize_size(), Vector::new(350.0, 285.0));
        // Logical size is untouched.
        assert_eq!(stage.size(), Vector::new(700.0, 570.0));
        assert_eq!(
            doc.element(stage.canvas()).unwrap().canvas_size,
            Some(Vector::new(350.0, 285.0))
        );
    }

    #[test]
    fn fit_optimal_prefers_the_cramped_axis() {
        let mut doc = HeadlessDocument::new();
        doc.set_viewport(Vector::new(1000.0, 100.0));
        let mut renderer = RecordingRenderer::new();
        let mut stage = attached_stage(Fit::Optimal, Vector::new(200.0, 200.0), &mut doc);

        stage.resize(&mut doc, &mut renderer).unwrap();
        assert_eq!(stage.last_resize_scale(), 0.5);
        assert_eq!(stage.last_resize_size(), Vector::new(100.0, 100.0));
    }

    #[test]
    fn fit_all_overwrites_logical_size() {
        let mut doc = HeadlessDocument::new();
        doc.set_viewport(Vector::new(800.0, 600.0));
        let mut renderer = RecordingRenderer::new();
        let mut stage = attached_stage(Fit::All, Vector::new(123.0, 456.0), &mut doc);

        stage.resize(&mut doc, &mut renderer).unwrap();
        assert_eq!(stage.size(), Vector::new(800.0, 600.0));
        assert_eq!(stage.last_resize_size(), Vector::new(800.0, 600.0));
        assert_eq!(stage.last_resize_scale(), 1.0);
    }

    #[test]
    fn resize_after_initial_render_rerenders() {
        let mut doc = HeadlessDocument::new();
        let mut renderer = RecordingRenderer::new();
        let mut stage = attached_stage(Fit::None, Vector::new(10.0, 10.0), &mut doc);

        stage.resize(&mut doc, &mut renderer).unwrap();
        assert!(renderer.ops().is_empty());

        stage.render(&mut doc, &mut renderer).unwrap();
        let after_first_render = renderer.ops().len();

        stage.resize(&mut doc, &mut renderer).unwrap();
        assert!(renderer.ops().len() > after_first_render);
    }

    // ── render recursion ─────────────────────────────────────────────

    #[test]
    fn render_composites_children_bottom_up() {
        let mut doc = HeadlessDocument::new();
        let mut renderer = RecordingRenderer::new();
        let mut stage = attached_stage(Fit::None, Vector::new(64.0, 64.0), &mut doc);

        let sprite = stage
            .scene_mut()
            .insert(DisplayObject::image("hero.png"));
        let root = stage.root();
        stage.scene_mut().add_child(root, sprite);

        stage.resize(&mut doc, &mut renderer).unwrap();
        stage.render(&mut doc, &mut renderer).unwrap();

        let ops = renderer.ops();
        // Root surface first, then the child's; the child is rasterized and
        // composited onto the root before the root's own group is drawn.
        let root_surface = match &ops[0] {
            RenderOp::CreateSurface { surface, size } => {
                assert_eq!(*size, Vector::new(64.0, 64.0));
                *surface
            }
            other => panic!("expected CreateSurface, got {other:?}"),
        };
        let child_surface = match &ops[1] {
            RenderOp::CreateSurface { surface, .. } => *surface,
            other => panic!("expected CreateSurface, got {other:?}"),
        };
        assert!(matches!(
            &ops[2],
            RenderOp::DrawSprite { surface, url, .. }
                if *surface == child_surface && url == "hero.png"
        ));
        assert!(matches!(
            &ops[3],
            RenderOp::Rasterize { surface } if *surface == child_surface
        ));
        assert!(matches!(
            &ops[4],
            RenderOp::Composite { surface, source }
                if *surface == root_surface && *source == child_surface
        ));
        assert!(matches!(
            &ops[5],
            RenderOp::DrawGroup { surface, .. } if *surface == root_surface
        ));
        assert!(matches!(
            &ops[6],
            RenderOp::Rasterize { surface } if *surface == root_surface
        ));

        // The root buffer was presented on the canvas after a clear.
        let record = doc.element(stage.canvas()).unwrap();
        assert_eq!(record.cleared, 1);
        assert_eq!(record.presented.len(), 1);
    }

    #[test]
    fn render_composes_inherited_properties() {
        let mut doc = HeadlessDocument::new();
        let mut renderer = RecordingRenderer::new();
        let mut stage = attached_stage(Fit::None, Vector::new(64.0, 64.0), &mut doc);

        let root = stage.root();
        {
            let scene = stage.scene_mut();
            let object = scene.get_mut(root).unwrap();
            object.position = Vector::new(5.0, 5.0);
            object.opacity = 0.5;

            let sprite = scene.insert(
                DisplayObject::image("a.png")
                    .with_position(Vector::new(2.0, 3.0))
                    .with_opacity(0.5),
            );
            scene.add_child(root, sprite);
        }

        stage.render(&mut doc, &mut renderer).unwrap();

        let sprite_op = renderer
            .ops()
            .iter()
            .find_map(|op| match op {
                RenderOp::DrawSprite { inherited, .. } => Some(*inherited),
                _ => None,
            })
            .unwrap();
        assert_eq!(sprite_op.position, Vector::new(7.0, 8.0));
        assert_eq!(sprite_op.opacity, 0.25);
    }

    #[test]
    fn child_visibility_is_not_masked_by_ancestor() {
        let mut doc = HeadlessDocument::new();
        let mut renderer = RecordingRenderer::new();
        let mut stage = attached_stage(Fit::None, Vector::new(64.0, 64.0), &mut doc);

        let root = stage.root();
        {
            let scene = stage.scene_mut();
            scene.get_mut(root).unwrap().visible = false;
            let sprite = scene.insert(DisplayObject::image("a.png"));
            scene.add_child(root, sprite);
        }

        stage.render(&mut doc, &mut renderer).unwrap();

        let group_visible = renderer
            .ops()
            .iter()
            .find_map(|op| match op {
                RenderOp::DrawGroup { inherited, .. } => Some(inherited.visible),
                _ => None,
            })
            .unwrap();
        let sprite_visible = renderer
            .ops()
            .iter()
            .find_map(|op| match op {
                RenderOp::DrawSprite { inherited, .. } => Some(inherited.visible),
                _ => None,
            })
            .unwrap();
        assert!(!group_visible);
        assert!(sprite_visible);
    }

    #[test]
    fn filters_are_an_explicit_not_implemented_error() {
        let mut doc = HeadlessDocument::new();
        let mut renderer = RecordingRenderer::new();
        let mut stage = attached_stage(Fit::None, Vector::new(64.0, 64.0), &mut doc);

        let root = stage.root();
        stage
            .scene_mut()
            .get_mut(root)
            .unwrap()
            .filters
            .push(crate::display::object::Filter::Blur { radius: 2.0 });

        let err = stage.render(&mut doc, &mut renderer).unwrap_err();
        assert!(matches!(err, StageError::FiltersNotImplemented));
    }

    #[test]
    fn scene_paths_resolve_from_root() {
        let mut doc = HeadlessDocument::new();
        let mut stage = attached_stage(Fit::None, Vector::new(10.0, 10.0), &mut doc);

        let root = stage.root();
        let scene = stage.scene_mut();
        let foo = scene.insert(DisplayObject::container().with_id("foo"));
        scene.add_child(root, foo);

        assert_eq!(scene.resolve(root, "foo"), Some(foo));
        assert_eq!(scene.resolve(root, "foo/.."), Some(root));
        assert_eq!(scene.resolve(root, "nonexistent/.."), None);
    }
}
