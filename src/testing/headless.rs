//! In-memory native document for headless tests.

use std::collections::{BTreeMap, HashMap};

use crate::geometry::Vector;
use crate::render::PixelData;
use crate::ui::native::{
    ElementId, NativeBackend, ResizeListenerId, StylesheetId, Tag,
};

/// State of one headless element.
#[derive(Debug, Clone)]
pub struct ElementRecord {
    pub tag: Tag,
    pub class: String,
    pub text: String,
    pub disabled: bool,
    pub background: Option<String>,
    pub canvas_size: Option<Vector>,
    /// Number of canvas clears.
    pub cleared: usize,
    /// Buffers presented on this canvas, oldest first.
    pub presented: Vec<PixelData>,
    pub children: Vec<ElementId>,
    pub parent: Option<ElementId>,
}

impl ElementRecord {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            class: String::new(),
            text: String::new(),
            disabled: false,
            background: None,
            canvas_size: None,
            cleared: 0,
            presented: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

/// A [`NativeBackend`] backed by plain maps, with an operation log for
/// asserting side-effect ordering.
///
/// The element with id 0 is the document body. The viewport reported to
/// attached elements defaults to 800x600 and can be changed with
/// [`set_viewport`](Self::set_viewport).
#[derive(Debug)]
pub struct HeadlessDocument {
    elements: HashMap<ElementId, ElementRecord>,
    body: ElementId,
    next_element: u64,
    next_stylesheet: u64,
    next_listener: u64,
    stylesheets: BTreeMap<StylesheetId, String>,
    resize_listeners: Vec<ResizeListenerId>,
    focused: Option<ElementId>,
    viewport: Vector,
    images: Vec<String>,
    ops: Vec<String>,
}

impl HeadlessDocument {
    /// Create a document containing only the body element.
    pub fn new() -> Self {
        let body = ElementId(0);
        let mut elements = HashMap::new();
        elements.insert(body, ElementRecord::new(Tag::Div));
        Self {
            elements,
            body,
            next_element: 0,
            next_stylesheet: 0,
            next_listener: 0,
            stylesheets: BTreeMap::new(),
            resize_listeners: Vec::new(),
            focused: None,
            viewport: Vector::new(800.0, 600.0),
            images: Vec::new(),
            ops: Vec::new(),
        }
    }

    /// Change the reported viewport size.
    pub fn set_viewport(&mut self, viewport: Vector) {
        self.viewport = viewport;
    }

    /// A recorded element.
    pub fn element(&self, element: ElementId) -> Option<&ElementRecord> {
        self.elements.get(&element)
    }

    /// The children of an element, in document order.
    pub fn children_of(&self, element: ElementId) -> Vec<ElementId> {
        self.elements
            .get(&element)
            .map(|record| record.children.clone())
            .unwrap_or_default()
    }

    /// The parent of an element.
    pub fn parent_of(&self, element: ElementId) -> Option<ElementId> {
        self.elements.get(&element).and_then(|record| record.parent)
    }

    /// Number of live resize listeners.
    pub fn resize_listener_count(&self) -> usize {
        self.resize_listeners.len()
    }

    /// Number of registered stylesheets.
    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.len()
    }

    /// Text of every registered stylesheet, in registration order.
    pub fn stylesheet_texts(&self) -> Vec<&str> {
        self.stylesheets.values().map(String::as_str).collect()
    }

    /// URLs whose loading was started, oldest first.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// The side-effect log, oldest first.
    pub fn op_log(&self) -> &[String] {
        &self.ops
    }

    fn detach(&mut self, element: ElementId) {
        let Some(parent) = self
            .elements
            .get(&element)
            .and_then(|record| record.parent)
        else {
            return;
        };
        if let Some(record) = self.elements.get_mut(&parent) {
            record.children.retain(|&child| child != element);
        }
        if let Some(record) = self.elements.get_mut(&element) {
            record.parent = None;
        }
    }
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeBackend for HeadlessDocument {
    fn create_element(&mut self, tag: Tag) -> ElementId {
        self.next_element += 1;
        let element = ElementId(self.next_element);
        self.elements.insert(element, ElementRecord::new(tag));
        element
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn insert_child(&mut self, parent: ElementId, index: usize, child: ElementId) {
        self.detach(child);
        if let Some(record) = self.elements.get_mut(&parent) {
            let index = index.min(record.children.len());
            record.children.insert(index, child);
            self.ops
                .push(format!("insert_child #{} #{} @{index}", parent.0, child.0));
        }
        if let Some(record) = self.elements.get_mut(&child) {
            record.parent = Some(parent);
        }
    }

    fn remove_element(&mut self, element: ElementId) {
        self.ops.push(format!("remove_element #{}", element.0));
        self.detach(element);
    }

    fn set_class(&mut self, element: ElementId, class: &str) {
        self.ops.push(format!("set_class #{} {class}", element.0));
        if let Some(record) = self.elements.get_mut(&element) {
            record.class = class.to_owned();
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(record) = self.elements.get_mut(&element) {
            record.text = text.to_owned();
        }
    }

    fn text(&self, element: ElementId) -> String {
        self.elements
            .get(&element)
            .map(|record| record.text.clone())
            .unwrap_or_default()
    }

    fn set_disabled(&mut self, element: ElementId, disabled: bool) {
        if let Some(record) = self.elements.get_mut(&element) {
            record.disabled = disabled;
        }
    }

    fn is_disabled(&self, element: ElementId) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|record| record.disabled)
    }

    fn set_background(&mut self, element: ElementId, background: &str) {
        if let Some(record) = self.elements.get_mut(&element) {
            record.background = Some(background.to_owned());
        }
    }

    fn register_stylesheet(&mut self, css: &str) -> StylesheetId {
        self.next_stylesheet += 1;
        let id = StylesheetId(self.next_stylesheet);
        self.stylesheets.insert(id, css.to_owned());
        self.ops.push(format!("register_stylesheet #{}", id.0));
        id
    }

    fn unregister_stylesheet(&mut self, stylesheet: StylesheetId) {
        self.stylesheets.remove(&stylesheet);
        self.ops
            .push(format!("unregister_stylesheet #{}", stylesheet.0));
    }

    fn focus(&mut self, element: ElementId) {
        self.focused = Some(element);
        self.ops.push(format!("focus #{}", element.0));
    }

    fn focused_element(&self) -> Option<ElementId> {
        self.focused
    }

    fn focus_next(&mut self, from: ElementId) {
        self.ops.push(format!("focus_next #{}", from.0));
    }

    fn focus_previous(&mut self, from: ElementId) {
        self.ops.push(format!("focus_previous #{}", from.0));
    }

    fn set_canvas_size(&mut self, canvas: ElementId, size: Vector) {
        if let Some(record) = self.elements.get_mut(&canvas) {
            record.canvas_size = Some(size);
        }
    }

    fn clear_canvas(&mut self, canvas: ElementId) {
        self.ops.push(format!("clear_canvas #{}", canvas.0));
        if let Some(record) = self.elements.get_mut(&canvas) {
            record.cleared += 1;
        }
    }

    fn present(&mut self, canvas: ElementId, pixels: &PixelData) {
        self.ops.push(format!("present #{}", canvas.0));
        if let Some(record) = self.elements.get_mut(&canvas) {
            record.presented.push(pixels.clone());
        }
    }

    fn viewport_size(&self, element: ElementId) -> Vector {
        if self.parent_of(element).is_some() {
            self.viewport
        } else {
            Vector::ZERO
        }
    }

    fn add_resize_listener(&mut self) -> ResizeListenerId {
        self.next_listener += 1;
        let listener = ResizeListenerId(self.next_listener);
        self.resize_listeners.push(listener);
        self.ops.push(format!("add_resize_listener #{}", listener.0));
        listener
    }

    fn remove_resize_listener(&mut self, listener: ResizeListenerId) {
        self.resize_listeners.retain(|&l| l != listener);
        self.ops
            .push(format!("remove_resize_listener #{}", listener.0));
    }

    fn load_image(&mut self, url: &str) {
        self.images.push(url.to_owned());
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_exists_up_front() {
        let doc = HeadlessDocument::new();
        assert!(doc.element(doc.body()).is_some());
        assert!(doc.parent_of(doc.body()).is_none());
    }

    #[test]
    fn insert_and_reinsert_moves_elements() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let a = doc.create_element(Tag::Div);
        let b = doc.create_element(Tag::Div);
        doc.insert_child(body, 0, a);
        doc.insert_child(body, 0, b);
        assert_eq!(doc.children_of(body), vec![b, a]);

        // Moving a under b detaches it from the body first.
        doc.insert_child(b, 0, a);
        assert_eq!(doc.children_of(body), vec![b]);
        assert_eq!(doc.parent_of(a), Some(b));
    }

    #[test]
    fn remove_detaches_but_keeps_record() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let a = doc.create_element(Tag::Span);
        doc.insert_child(body, 0, a);
        doc.remove_element(a);
        assert!(doc.parent_of(a).is_none());
        assert!(doc.element(a).is_some());
    }

    #[test]
    fn viewport_requires_a_parent() {
        let mut doc = HeadlessDocument::new();
        doc.set_viewport(Vector::new(100.0, 50.0));
        let detached = doc.create_element(Tag::Canvas);
        assert_eq!(doc.viewport_size(detached), Vector::ZERO);

        let body = doc.body();
        doc.insert_child(body, 0, detached);
        assert_eq!(doc.viewport_size(detached), Vector::new(100.0, 50.0));
    }

    #[test]
    fn stylesheets_register_and_unregister() {
        let mut doc = HeadlessDocument::new();
        let id = doc.register_stylesheet(".x {}");
        assert_eq!(doc.stylesheet_count(), 1);
        assert_eq!(doc.stylesheet_texts(), vec![".x {}"]);
        doc.unregister_stylesheet(id);
        assert_eq!(doc.stylesheet_count(), 0);
    }

    #[test]
    fn resize_listeners_count() {
        let mut doc = HeadlessDocument::new();
        let a = doc.add_resize_listener();
        let _b = doc.add_resize_listener();
        assert_eq!(doc.resize_listener_count(), 2);
        doc.remove_resize_listener(a);
        assert_eq!(doc.resize_listener_count(), 1);
    }

    #[test]
    fn op_log_records_ordering() {
        let mut doc = HeadlessDocument::new();
        let a = doc.create_element(Tag::Div);
        let body = doc.body();
        doc.insert_child(body, 0, a);
        doc.remove_element(a);
        let log = doc.op_log();
        assert!(log[0].starts_with("insert_child"));
        assert!(log[1].starts_with("remove_element"));
    }
}
