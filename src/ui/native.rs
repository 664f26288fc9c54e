//! The opaque native document boundary.
//!
//! Controls are bound to native elements; stages present through native
//! canvases. All of that goes through [`NativeBackend`], so the control tree
//! never touches a concrete document implementation. Input from the native
//! layer arrives as [`NativeEvent`] values, decoupled from any event source.

use crate::geometry::Vector;
use crate::input::{Key, Modifiers};
use crate::render::PixelData;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Identity of a native element. Allocated by the backend; hashable so the
/// reverse element→control index can key on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Handle to a registered document stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StylesheetId(pub u64);

/// Handle to a registered window-resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResizeListenerId(pub u64);

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// Native element tag names the toolkit creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    Button,
    Span,
    /// `h1` through `h4`.
    Heading(u8),
    Paragraph,
    Canvas,
}

impl Tag {
    /// The tag name as it appears in the document.
    pub fn name(&self) -> String {
        match self {
            Tag::Div => "div".to_owned(),
            Tag::Button => "button".to_owned(),
            Tag::Span => "span".to_owned(),
            Tag::Heading(level) => format!("h{level}"),
            Tag::Paragraph => "p".to_owned(),
            Tag::Canvas => "canvas".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// NativeEvent
// ---------------------------------------------------------------------------

/// A mouse event as delivered by the native layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Pointer position relative to the target element's origin.
    pub offset: Vector,
    pub modifiers: Modifiers,
}

/// An event from the native layer, fed into [`Ui::dispatch`](crate::ui::Ui::dispatch).
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    KeyDown { key: Key, modifiers: Modifiers },
    KeyUp { key: Key },
    Click { element: ElementId, mouse: MouseEvent },
    MouseDown { element: ElementId, mouse: MouseEvent },
    MouseUp { element: ElementId, mouse: MouseEvent },
    MouseOver { element: ElementId, mouse: MouseEvent },
    MouseOut { element: ElementId, mouse: MouseEvent },
    FocusIn { element: ElementId },
    FocusOut { element: ElementId },
    Resize,
}

// ---------------------------------------------------------------------------
// NativeBackend
// ---------------------------------------------------------------------------

/// Operations the toolkit performs against the native document.
///
/// Object-safe, so stages can borrow it as `&mut dyn NativeBackend` per
/// call. Implementations decide what an element actually is: a DOM node, a
/// test record, anything with identity and ordered children.
pub trait NativeBackend {
    /// Create a detached element with the given tag.
    fn create_element(&mut self, tag: Tag) -> ElementId;

    /// The document body element.
    fn body(&self) -> ElementId;

    /// Insert `child` into `parent`'s child list at `index` (clamped to the
    /// current length). A child attached elsewhere is moved.
    fn insert_child(&mut self, parent: ElementId, index: usize, child: ElementId);

    /// Detach an element (and its subtree) from its parent, if any.
    fn remove_element(&mut self, element: ElementId);

    /// Replace the element's CSS class attribute.
    fn set_class(&mut self, element: ElementId, class: &str);

    /// Replace the element's text content.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// The element's text content.
    fn text(&self, element: ElementId) -> String;

    /// Set the element's disabled state.
    fn set_disabled(&mut self, element: ElementId, disabled: bool);

    /// The element's disabled state.
    fn is_disabled(&self, element: ElementId) -> bool;

    /// Set the element's CSS background.
    fn set_background(&mut self, element: ElementId, background: &str);

    /// Register a stylesheet with the document for later removal.
    fn register_stylesheet(&mut self, css: &str) -> StylesheetId;

    /// Remove a previously registered stylesheet.
    fn unregister_stylesheet(&mut self, stylesheet: StylesheetId);

    /// Give an element keyboard focus.
    fn focus(&mut self, element: ElementId);

    /// The element currently holding keyboard focus.
    fn focused_element(&self) -> Option<ElementId>;

    /// Move focus to the next focusable element after `from` in document
    /// order.
    fn focus_next(&mut self, from: ElementId);

    /// Move focus to the previous focusable element before `from` in
    /// document order.
    fn focus_previous(&mut self, from: ElementId);

    /// Set a canvas element's pixel dimensions.
    fn set_canvas_size(&mut self, canvas: ElementId, size: Vector);

    /// Clear a canvas element's pixels.
    fn clear_canvas(&mut self, canvas: ElementId);

    /// Present a rasterized buffer on a canvas element.
    fn present(&mut self, canvas: ElementId, pixels: &PixelData);

    /// The size available to `element`: its parent's box, or zero when the
    /// element has no parent.
    fn viewport_size(&self, element: ElementId) -> Vector;

    /// Register a window-resize listener.
    fn add_resize_listener(&mut self) -> ResizeListenerId;

    /// Remove a window-resize listener.
    fn remove_resize_listener(&mut self, listener: ResizeListenerId);

    /// Begin loading an image by URL. Completion is reported by the
    /// embedding, not by this trait.
    fn load_image(&mut self, url: &str);
}

// ===========================================================================
// Tests
// ===========================================================================
