//! The user interface control tree.
//!
//! [`Ui`] owns the control tree, the native document backend, the drawing
//! backend, the input action map, and the process-scoped reverse index from
//! native elements back to controls. Every structural mutation keeps the
//! native element tree, embedded stages, and theme classes synchronized; see
//! [`Ui::add_child`] and [`Ui::remove_child`] for the hook ordering.

pub mod control;
pub mod focus;
pub mod native;
pub mod theme;

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::display::{Stage, StageError, StageMount, StageOptions};
use crate::input::{Input, InputError};
use crate::render::RenderBackend;
use crate::tree::Tree;

pub use control::{
    ButtonEvents, ButtonLevel, ControlData, ControlId, ControlKind, StageContainerOptions,
};
pub use focus::{FocusDirection, FocusNeighbors};
pub use native::{ElementId, MouseEvent, NativeBackend, NativeEvent, Tag};
pub use theme::{slate_theme, Theme, ThemeOptions};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from control-tree operations.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// Theme resolution reached the root without finding a theme.
    #[error("no theme is set on any ancestor up to the root")]
    UnthemedRoot,
    /// Heading titles support levels 1 through 4 only.
    #[error("heading title level must span from 1 to 4 (inclusive), got {0}")]
    InvalidHeadingLevel(u8),
    /// A focus-neighbor directive pointed at nothing.
    #[error("the {direction} focus neighbor path {path:?} resolves to no control")]
    FocusNeighborUnresolved {
        direction: FocusDirection,
        path: String,
    },
    /// A stage operation was requested on a control without a stage.
    #[error("control is not a stage container")]
    NotAStageContainer,
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    Input(#[from] InputError),
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// The user interface: control tree, backends, input, reverse index.
///
/// Constructing a `Ui` bootstraps the application root: the single
/// [`ControlKind::Application`] control, bound to an element appended to the
/// document body and carrying the built-in theme so theme resolution always
/// succeeds for attached subtrees. `Application` controls cannot be created
/// any other way.
pub struct Ui<N: NativeBackend, R: RenderBackend> {
    controls: Tree<ControlData>,
    root: ControlId,
    native: N,
    renderer: R,
    /// Reverse index from native element identity to the owning control.
    /// Populated at control construction and never removed.
    element_index: HashMap<ElementId, ControlId>,
    input: Input,
}

impl<N: NativeBackend, R: RenderBackend> Ui<N, R> {
    /// Bootstrap the user interface on the given backends.
    ///
    /// Seeds the input map with [`Input::default_ui_map`] so focus
    /// navigation actions resolve out of the box.
    pub fn new(mut native: N, renderer: R) -> Self {
        let theme = Rc::new(slate_theme(&mut native));

        let element = native.create_element(Tag::Div);
        let body = native.body();
        native.insert_child(body, usize::MAX, element);

        let mut controls = Tree::new();
        let mut data = ControlData::new(ControlKind::Application, element);
        data.theme = Some(theme);
        let root = controls.insert(data);

        let mut element_index = HashMap::new();
        element_index.insert(element, root);

        let mut input = Input::new();
        input.set_map(Input::default_ui_map());

        let mut ui = Self {
            controls,
            root,
            native,
            renderer,
            element_index,
            input,
        };
        ui.apply_theme(root)
            .expect("the application root carries the built-in theme");
        ui
    }

    /// The application root control.
    pub fn root(&self) -> ControlId {
        self.root
    }

    /// The native document backend.
    pub fn native(&self) -> &N {
        &self.native
    }

    /// Mutable access to the native document backend.
    pub fn native_mut(&mut self) -> &mut N {
        &mut self.native
    }

    /// The drawing backend.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The input action map.
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Mutable access to the input action map.
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    // -----------------------------------------------------------------------
    // Control construction
    // -----------------------------------------------------------------------

    fn register(&mut self, kind: ControlKind) -> ControlId {
        let element = self.native.create_element(kind.tag());
        let control = self.controls.insert(ControlData::new(kind, element));
        self.element_index.insert(element, control);
        control
    }

    /// Create a primary-level button with the given text.
    pub fn create_button(&mut self, text: &str) -> ControlId {
        let control = self.register(ControlKind::Button {
            level: ButtonLevel::Primary,
            events: ButtonEvents::default(),
        });
        self.set_text(control, text);
        control
    }

    /// Create a label with the given text.
    pub fn create_label(&mut self, text: &str) -> ControlId {
        let control = self.register(ControlKind::Label);
        self.set_text(control, text);
        control
    }

    /// Create a heading title. `level` must span from 1 to 4 (inclusive).
    pub fn create_heading_title(&mut self, level: u8, text: &str) -> Result<ControlId, UiError> {
        if !(1..=4).contains(&level) {
            return Err(UiError::InvalidHeadingLevel(level));
        }
        let control = self.register(ControlKind::HeadingTitle { level });
        self.set_text(control, text);
        Ok(control)
    }

    /// Create a subtitle with the given text.
    pub fn create_subtitle(&mut self, text: &str) -> ControlId {
        let control = self.register(ControlKind::Subtitle);
        self.set_text(control, text);
        control
    }

    /// Create a paragraph with the given text.
    pub fn create_paragraph(&mut self, text: &str) -> ControlId {
        let control = self.register(ControlKind::Paragraph);
        self.set_text(control, text);
        control
    }

    /// Create a control embedding a 2D display stage. The control's native
    /// element is the stage's canvas.
    pub fn create_stage_container(&mut self, options: StageContainerOptions) -> ControlId {
        let element = self.native.create_element(Tag::Canvas);
        let stage = Stage::new(
            StageOptions {
                fit: options.fit,
                size: options.size,
                mount: StageMount::Canvas(element),
                background: options.background,
            },
            &mut self.native,
        );
        let control = self
            .controls
            .insert(ControlData::new(ControlKind::StageContainer { stage }, element));
        self.element_index.insert(element, control);
        control
    }

    // -----------------------------------------------------------------------
    // Tree mutation
    // -----------------------------------------------------------------------

    /// Attach `child` as the last child of `parent`.
    ///
    /// See [`add_child_at`](Self::add_child_at) for the synchronization
    /// steps.
    pub fn add_child(&mut self, parent: ControlId, child: ControlId) {
        let index = self.controls.child_count(parent);
        self.add_child_at(parent, index, child);
    }

    /// Attach `child` at `index` within `parent`'s children.
    ///
    /// In order: the child is detached from any prior parent (with full
    /// removal semantics), spliced into the child list, its native element
    /// inserted at the matching position, its embedded stage attached to the
    /// document, and, if the new parent resolves a theme, that theme is
    /// re-applied to the whole attached subtree so it never displays stale
    /// or absent styling. No-op if `child` is already a child of `parent`.
    pub fn add_child_at(&mut self, parent: ControlId, index: usize, child: ControlId) {
        if self.controls.parent(child) == Some(parent) {
            return;
        }
        if let Some(old_parent) = self.controls.parent(child) {
            self.remove_child(old_parent, child);
        }

        self.controls.add_child_at(parent, index, child);
        let index = self
            .controls
            .child_index(parent, child)
            .expect("child was just attached");
        let parent_element = self.element_of(parent);
        let child_element = self.element_of(child);
        self.native.insert_child(parent_element, index, child_element);

        self.attach_stage(child);

        if let Some(theme) = self.resolved_theme(parent) {
            self.cascade_theme(child, &theme);
        }
        debug!(?parent, ?child, index, "control attached");
    }

    /// Detach `child` from `parent`.
    ///
    /// The embedded stage (stage containers) is detached from the document
    /// first, before the native element is removed, so its resize listener
    /// tears down cleanly. Returns `false` if `child` is not a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: ControlId, child: ControlId) -> bool {
        if self.controls.child_index(parent, child).is_none() {
            return false;
        }
        self.detach_stage(child);
        let element = self.element_of(child);
        self.native.remove_element(element);
        self.controls.remove_child(parent, child);
        debug!(?parent, ?child, "control detached");
        true
    }

    /// Detach the child at `index` from `parent`.
    pub fn remove_child_at(&mut self, parent: ControlId, index: usize) -> Option<ControlId> {
        let child = self.controls.get_child_at(parent, index)?;
        self.remove_child(parent, child);
        Some(child)
    }

    /// Detach every child of `parent`, returning them in their former order.
    pub fn remove_all_children(&mut self, parent: ControlId) -> Vec<ControlId> {
        let children: Vec<ControlId> = self.controls.children(parent).to_vec();
        for &child in &children {
            self.remove_child(parent, child);
        }
        children
    }

    /// Exchange the positions of two children, mirroring the order in the
    /// native element tree. Returns `false` if either is not a child of
    /// `parent`.
    pub fn swap_children(&mut self, parent: ControlId, a: ControlId, b: ControlId) -> bool {
        let (Some(index_a), Some(index_b)) = (
            self.controls.child_index(parent, a),
            self.controls.child_index(parent, b),
        ) else {
            return false;
        };
        self.controls.swap_children(parent, a, b);

        let parent_element = self.element_of(parent);
        let element_a = self.element_of(a);
        let element_b = self.element_of(b);
        self.native.remove_element(element_a);
        self.native.remove_element(element_b);
        let (first, first_index, second, second_index) = if index_a < index_b {
            (element_b, index_a, element_a, index_b)
        } else {
            (element_a, index_b, element_b, index_a)
        };
        self.native.insert_child(parent_element, first_index, first);
        self.native.insert_child(parent_element, second_index, second);
        true
    }

    /// Delete a control and its subtree from the tree, detaching it first.
    ///
    /// Reverse-index entries are intentionally not removed. The application
    /// root cannot be destroyed.
    pub fn destroy(&mut self, control: ControlId) -> bool {
        debug_assert!(control != self.root, "the application root cannot be destroyed");
        if let Some(parent) = self.controls.parent(control) {
            self.remove_child(parent, control);
        }
        self.controls.remove(control).is_some()
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Resolve a control path against `start`.
    pub fn resolve(&self, start: ControlId, path: &str) -> Option<ControlId> {
        self.controls.resolve(start, path)
    }

    /// The parent of a control.
    pub fn parent(&self, control: ControlId) -> Option<ControlId> {
        self.controls.parent(control)
    }

    /// The children of a control.
    pub fn children(&self, control: ControlId) -> &[ControlId] {
        self.controls.children(control)
    }

    /// Number of children of a control.
    pub fn child_count(&self, control: ControlId) -> usize {
        self.controls.child_count(control)
    }

    /// The child at `index`.
    pub fn get_child_at(&self, control: ControlId, index: usize) -> Option<ControlId> {
        self.controls.get_child_at(control, index)
    }

    /// The index of `child` within `parent`'s children.
    pub fn child_index(&self, parent: ControlId, child: ControlId) -> Option<usize> {
        self.controls.child_index(parent, child)
    }

    /// A control's payload.
    pub fn get(&self, control: ControlId) -> Option<&ControlData> {
        self.controls.get(control)
    }

    /// Set a control's path identifier.
    pub fn set_id(&mut self, control: ControlId, id: Option<String>) {
        if let Some(data) = self.controls.get_mut(control) {
            data.id = id;
        }
    }

    /// Hit-test a raw native element back to its owning control.
    pub fn control_from_element(&self, element: ElementId) -> Option<ControlId> {
        self.element_index.get(&element).copied()
    }

    fn element_of(&self, control: ControlId) -> ElementId {
        self.controls
            .get(control)
            .expect("control must exist")
            .element
    }

    // -----------------------------------------------------------------------
    // Text / state passthrough
    // -----------------------------------------------------------------------

    /// Set a control's text content.
    pub fn set_text(&mut self, control: ControlId, text: &str) {
        let element = self.element_of(control);
        self.native.set_text(element, text);
    }

    /// A control's text content.
    pub fn text(&self, control: ControlId) -> String {
        self.native.text(self.element_of(control))
    }

    /// Set a control's disabled state.
    pub fn set_disabled(&mut self, control: ControlId, disabled: bool) {
        let element = self.element_of(control);
        self.native.set_disabled(element, disabled);
    }

    /// A control's disabled state.
    pub fn is_disabled(&self, control: ControlId) -> bool {
        self.native.is_disabled(self.element_of(control))
    }

    /// Whether the control's kind can receive focus.
    pub fn focusable(&self, control: ControlId) -> bool {
        self.controls
            .get(control)
            .is_some_and(|data| data.kind.focusable())
    }

    // -----------------------------------------------------------------------
    // Buttons
    // -----------------------------------------------------------------------

    /// A button's emphasis level.
    pub fn button_level(&self, control: ControlId) -> Option<ButtonLevel> {
        match self.controls.get(control)?.kind {
            ControlKind::Button { level, .. } => Some(level),
            _ => None,
        }
    }

    /// Change a button's emphasis level, re-applying its theme class.
    pub fn set_button_level(&mut self, control: ControlId, level: ButtonLevel) {
        if let Some(data) = self.controls.get_mut(control) {
            if let ControlKind::Button { level: current, .. } = &mut data.kind {
                *current = level;
            } else {
                return;
            }
        } else {
            return;
        }
        self.apply_single_theme(control);
    }

    /// A button's mouse event emitters.
    pub fn button_events_mut(&mut self, control: ControlId) -> Option<&mut ButtonEvents> {
        match &mut self.controls.get_mut(control)?.kind {
            ControlKind::Button { events, .. } => Some(events),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    /// The embedded stage of a stage container.
    pub fn stage(&self, control: ControlId) -> Option<&Stage> {
        match &self.controls.get(control)?.kind {
            ControlKind::StageContainer { stage } => Some(stage),
            _ => None,
        }
    }

    /// Mutable access to the embedded stage's scene tree.
    pub fn scene_mut(
        &mut self,
        control: ControlId,
    ) -> Option<&mut Tree<crate::display::DisplayObject>> {
        match &mut self.controls.get_mut(control)?.kind {
            ControlKind::StageContainer { stage } => Some(stage.scene_mut()),
            _ => None,
        }
    }

    /// Render a stage container's stage.
    pub fn render_stage(&mut self, control: ControlId) -> Result<(), UiError> {
        let Ui {
            controls,
            native,
            renderer,
            ..
        } = self;
        let data = controls
            .get_mut(control)
            .ok_or(UiError::NotAStageContainer)?;
        match &mut data.kind {
            ControlKind::StageContainer { stage } => Ok(stage.render(native, renderer)?),
            _ => Err(UiError::NotAStageContainer),
        }
    }

    /// Resize a stage container's stage.
    pub fn resize_stage(&mut self, control: ControlId) -> Result<(), UiError> {
        let Ui {
            controls,
            native,
            renderer,
            ..
        } = self;
        let data = controls
            .get_mut(control)
            .ok_or(UiError::NotAStageContainer)?;
        match &mut data.kind {
            ControlKind::StageContainer { stage } => Ok(stage.resize(native, renderer)?),
            _ => Err(UiError::NotAStageContainer),
        }
    }

    fn attach_stage(&mut self, control: ControlId) {
        let Ui {
            controls, native, ..
        } = self;
        if let Some(data) = controls.get_mut(control) {
            if let ControlKind::StageContainer { stage } = &mut data.kind {
                stage.attach_to_document(native);
            }
        }
    }

    fn detach_stage(&mut self, control: ControlId) {
        let Ui {
            controls, native, ..
        } = self;
        if let Some(data) = controls.get_mut(control) {
            if let ControlKind::StageContainer { stage } = &mut data.kind {
                stage.detach_from_document(native);
            }
        }
    }

    fn resize_stages(&mut self) -> Result<(), UiError> {
        for control in self.controls.walk_depth_first(self.root) {
            let Ui {
                controls,
                native,
                renderer,
                ..
            } = self;
            if let Some(data) = controls.get_mut(control) {
                if let ControlKind::StageContainer { stage } = &mut data.kind {
                    stage.resize(native, renderer)?;
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Themes
    // -----------------------------------------------------------------------

    /// Assign a theme to a control and cascade it over the subtree.
    pub fn set_theme(&mut self, control: ControlId, theme: Rc<Theme>) -> Result<(), UiError> {
        if let Some(data) = self.controls.get_mut(control) {
            data.theme = Some(theme);
        }
        self.apply_theme(control)
    }

    /// Resolve the control's theme and cascade it over the subtree.
    ///
    /// Walks from the control upward until a theme reference is found; the
    /// resolved theme is recorded on the control. Reaching the root without
    /// one is fatal; once any control is attached under a themed root this
    /// cannot happen, as the application always carries the built-in theme.
    pub fn apply_theme(&mut self, control: ControlId) -> Result<(), UiError> {
        let theme = self
            .resolved_theme(control)
            .ok_or(UiError::UnthemedRoot)?;
        if let Some(data) = self.controls.get_mut(control) {
            data.theme = Some(Rc::clone(&theme));
        }
        self.cascade_theme(control, &theme);
        Ok(())
    }

    /// The theme governing a control: its own, or the nearest ancestor's.
    pub fn resolved_theme(&self, control: ControlId) -> Option<Rc<Theme>> {
        let mut current = Some(control);
        while let Some(id) = current {
            if let Some(theme) = self.controls.get(id).and_then(|data| data.theme.clone()) {
                return Some(theme);
            }
            current = self.controls.parent(id);
        }
        None
    }

    /// Depth-first class assignment of `theme` over the subtree at `start`.
    fn cascade_theme(&mut self, start: ControlId, theme: &Theme) {
        for control in self.controls.walk_depth_first(start) {
            let Some(data) = self.controls.get(control) else {
                continue;
            };
            let class = format!("{}{}", theme.class_prefix(), data.kind.theme_class());
            let element = data.element;
            self.native.set_class(element, &class);
        }
        debug!(prefix = theme.class_prefix(), "theme cascade applied");
    }

    /// Re-apply the resolved theme's class to a single control, leaving the
    /// subtree untouched. No-op while no theme resolves (a control not yet
    /// attached under a themed root).
    fn apply_single_theme(&mut self, control: ControlId) {
        let Some(theme) = self.resolved_theme(control) else {
            return;
        };
        let Some(data) = self.controls.get(control) else {
            return;
        };
        let class = format!("{}{}", theme.class_prefix(), data.kind.theme_class());
        let element = data.element;
        self.native.set_class(element, &class);
    }

    // -----------------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------------

    /// Give a control keyboard focus.
    pub fn focus(&mut self, control: ControlId) {
        let element = self.element_of(control);
        self.native.focus(element);
    }

    /// The control owning the focused native element, if any.
    pub fn focused_control(&self) -> Option<ControlId> {
        let element = self.native.focused_element()?;
        self.control_from_element(element)
    }

    /// Set a control's focus-neighbor directives.
    pub fn set_focus_neighbors(&mut self, control: ControlId, neighbors: FocusNeighbors) {
        if let Some(data) = self.controls.get_mut(control) {
            data.focus_neighbors = neighbors;
        }
    }

    /// A control's focus-neighbor directives.
    pub fn focus_neighbors(&self, control: ControlId) -> Option<&FocusNeighbors> {
        self.controls.get(control).map(|data| &data.focus_neighbors)
    }

    pub(crate) fn native_focused_element(&self) -> Option<ElementId> {
        self.native.focused_element()
    }

    pub(crate) fn native_focus_next(&mut self, from: ElementId) {
        self.native.focus_next(from);
    }

    pub(crate) fn native_focus_previous(&mut self, from: ElementId) {
        self.native.focus_previous(from);
    }

    // -----------------------------------------------------------------------
    // Event dispatch
    // -----------------------------------------------------------------------

    /// Feed a native event into the tree.
    ///
    /// Key events update the input pressed-state and run focus navigation;
    /// mouse events are routed through the reverse index to button emitters;
    /// window resizes are forwarded to every attached embedded stage.
    pub fn dispatch(&mut self, event: NativeEvent) -> Result<(), UiError> {
        match event {
            NativeEvent::KeyDown { key, modifiers } => {
                self.input.key_down(key, modifiers);
                self.navigate_focus()?;
            }
            NativeEvent::KeyUp { key } => self.input.key_up(key),
            NativeEvent::Click { element, mouse } => {
                self.emit_button_event(element, |events| &mut events.on_pressed, mouse);
            }
            NativeEvent::MouseDown { element, mouse } => {
                self.emit_button_event(element, |events| &mut events.on_mouse_down, mouse);
            }
            NativeEvent::MouseUp { element, mouse } => {
                self.emit_button_event(element, |events| &mut events.on_mouse_up, mouse);
            }
            NativeEvent::MouseOver { element, mouse } => {
                self.emit_button_event(element, |events| &mut events.on_mouse_over, mouse);
            }
            NativeEvent::MouseOut { element, mouse } => {
                self.emit_button_event(element, |events| &mut events.on_mouse_out, mouse);
            }
            // Native focus state is tracked by the backend itself.
            NativeEvent::FocusIn { .. } | NativeEvent::FocusOut { .. } => {}
            NativeEvent::Resize => self.resize_stages()?,
        }
        Ok(())
    }

    fn emit_button_event(
        &mut self,
        element: ElementId,
        select: fn(&mut ButtonEvents) -> &mut crate::event::EventEmitter<MouseEvent>,
        mouse: MouseEvent,
    ) {
        let Some(control) = self.control_from_element(element) else {
            return;
        };
        if let Some(data) = self.controls.get_mut(control) {
            if let ControlKind::Button { events, .. } = &mut data.kind {
                select(events).emit(&mouse);
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
