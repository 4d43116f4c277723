//! In-memory host document
//!
//! Arena-backed reference implementation of the host capabilities. Used by
//! the test suites and by embedders that bridge a platform without a real
//! document tree. Element rects are page coordinates; hit-testing offsets
//! the query point by the current scroll position and picks the most
//! recently inserted containing element (painter's order).

use std::collections::HashMap;

use touchdnd_core::DropEffect;

use crate::events::{DragEvent, DragEventKind};
use crate::geometry::{Point, Rect, Viewport};
use crate::host::{DragImageFeedback, HostDocument, SnapbackOutcome};
use crate::ElementId;

type Handler = Box<dyn FnMut(&mut DragEvent<'_>)>;

#[derive(Debug)]
struct MemoryElement {
    parent: Option<ElementId>,
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    rect: Rect,
}

/// Arena of parent-linked elements plus a scrollable viewport.
///
/// The element created at construction time is the document body; its rect
/// spans the whole scrollable area so hit-tests over empty space resolve to
/// it, the way `elementFromPoint` does in a real document.
pub struct MemoryDocument {
    nodes: Vec<MemoryElement>,
    viewport: Viewport,
    listeners: HashMap<(ElementId, DragEventKind), Vec<Handler>>,
    dispatched: Vec<(DragEventKind, ElementId)>,
}

impl MemoryDocument {
    pub fn new(client_width: f64, client_height: f64) -> Self {
        let body = MemoryElement {
            parent: None,
            tag: "body".to_string(),
            attributes: Vec::new(),
            classes: Vec::new(),
            rect: Rect::from_xywh(0.0, 0.0, client_width, client_height),
        };
        Self {
            nodes: vec![body],
            viewport: Viewport::new(client_width, client_height),
            listeners: HashMap::new(),
            dispatched: Vec::new(),
        }
    }

    /// Insert an element; `parent` defaults to the body
    pub fn insert_element(&mut self, tag: &str, parent: Option<ElementId>, rect: Rect) -> ElementId {
        let parent = parent.unwrap_or_else(|| self.body());
        let id = ElementId::new(self.nodes.len() as u32);
        self.nodes.push(MemoryElement {
            parent: Some(parent),
            tag: tag.to_string(),
            attributes: Vec::new(),
            classes: Vec::new(),
            rect,
        });
        id
    }

    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            if let Some(attr) = node.attributes.iter_mut().find(|(n, _)| n == name) {
                attr.1 = value.to_string();
            } else {
                node.attributes.push((name.to_string(), value.to_string()));
            }
        }
    }

    pub fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attributes.retain(|(n, _)| n != name);
        }
    }

    pub fn set_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(node) = self.node_mut(element) {
            node.rect = rect;
        }
    }

    /// Grow the scrollable area beyond the client size
    pub fn set_scroll_size(&mut self, width: f64, height: f64) {
        self.viewport.scroll_width = width;
        self.viewport.scroll_height = height;
        // the body keeps covering the whole scrollable area
        let body = self.body();
        if let Some(node) = self.node_mut(body) {
            node.rect = Rect::from_xywh(0.0, 0.0, width, height);
        }
    }

    pub fn classes(&self, element: ElementId) -> &[String] {
        self.node(element).map(|n| n.classes.as_slice()).unwrap_or(&[])
    }

    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.classes(element).iter().any(|c| c == class)
    }

    pub fn add_listener(
        &mut self,
        element: ElementId,
        kind: DragEventKind,
        handler: impl FnMut(&mut DragEvent<'_>) + 'static,
    ) {
        self.listeners
            .entry((element, kind))
            .or_default()
            .push(Box::new(handler));
    }

    /// Every dispatched event in order, for assertions
    pub fn dispatched(&self) -> &[(DragEventKind, ElementId)] {
        &self.dispatched
    }

    /// Dispatched events of one kind, in order
    pub fn dispatched_of(&self, kind: DragEventKind) -> Vec<ElementId> {
        self.dispatched
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, el)| *el)
            .collect()
    }

    fn node(&self, element: ElementId) -> Option<&MemoryElement> {
        self.nodes.get(element.raw() as usize)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut MemoryElement> {
        self.nodes.get_mut(element.raw() as usize)
    }
}

impl HostDocument for MemoryDocument {
    fn body(&self) -> ElementId {
        ElementId::new(0)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).and_then(|n| n.parent)
    }

    fn tag_name(&self, element: ElementId) -> &str {
        self.node(element).map(|n| n.tag.as_str()).unwrap_or("")
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<&str> {
        self.node(element)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn element_from_point(&self, point: Point) -> Option<ElementId> {
        let x = point.x + self.viewport.scroll_left;
        let y = point.y + self.viewport.scroll_top;
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, node)| node.rect.contains_point(x, y))
            .map(|(index, _)| ElementId::new(index as u32))
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_viewport_by(&mut self, dx: f64, dy: f64) {
        self.viewport.scroll_by(dx, dy);
    }

    fn dispatch(&mut self, event: &mut DragEvent<'_>) {
        tracing::trace!("dispatching {} at element {}", event.kind.name(), event.target.raw());
        self.dispatched.push((event.kind, event.target));

        // bubble from the target up; preventDefault does not stop propagation
        let mut current = Some(event.target);
        while let Some(el) = current {
            let key = (el, event.kind);
            if let Some(mut handlers) = self.listeners.remove(&key) {
                for handler in handlers.iter_mut() {
                    handler(&mut *event);
                }
                // keep any listeners a handler registered meanwhile
                if let Some(added) = self.listeners.remove(&key) {
                    handlers.extend(added);
                }
                self.listeners.insert(key, handlers);
            }
            current = self.node(el).and_then(|n| n.parent);
        }
    }
}

/// Feedback double recording every instruction the engine issues.
///
/// `transitioning_snapback` makes `snapback` report a running transition so
/// tests can exercise the deferred-finalization path.
#[derive(Default)]
pub struct RecordingFeedback {
    pub created_for: Option<ElementId>,
    pub extra_class: Option<String>,
    pub translations: Vec<Point>,
    pub operations: Vec<DropEffect>,
    pub snapbacks: u32,
    pub removed: bool,
    pub transitioning_snapback: bool,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DragImageFeedback for RecordingFeedback {
    fn create(&mut self, _doc: &mut dyn HostDocument, source: ElementId, extra_class: Option<&str>) {
        self.created_for = Some(source);
        self.extra_class = extra_class.map(|c| c.to_string());
    }

    fn translate(&mut self, page: Point) {
        self.translations.push(page);
    }

    fn set_operation(&mut self, operation: DropEffect) {
        self.operations.push(operation);
    }

    fn snapback(&mut self, _doc: &mut dyn HostDocument, _source: ElementId) -> SnapbackOutcome {
        self.snapbacks += 1;
        if self.transitioning_snapback {
            SnapbackOutcome::Transitioning
        } else {
            SnapbackOutcome::Finished
        }
    }

    fn remove(&mut self) {
        self.removed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use touchdnd_core::{DataTransfer, DragDataStore};

    #[test]
    fn test_hit_test_topmost() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let below = doc.insert_element("div", None, Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
        let above = doc.insert_element("div", None, Rect::from_xywh(40.0, 40.0, 20.0, 20.0));

        assert_eq!(doc.element_from_point(Point::new(50.0, 50.0)), Some(above));
        assert_eq!(doc.element_from_point(Point::new(10.0, 10.0)), Some(below));
        assert_eq!(doc.element_from_point(Point::new(500.0, 500.0)), Some(doc.body()));
        assert_eq!(doc.element_from_point(Point::new(900.0, 500.0)), None);
    }

    #[test]
    fn test_hit_test_honors_scroll() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        doc.set_scroll_size(2000.0, 600.0);
        let far = doc.insert_element("div", None, Rect::from_xywh(1000.0, 0.0, 100.0, 100.0));

        assert_ne!(doc.element_from_point(Point::new(50.0, 50.0)), Some(far));
        doc.scroll_viewport_by(1000.0, 0.0);
        assert_eq!(doc.element_from_point(Point::new(50.0, 50.0)), Some(far));
    }

    #[test]
    fn test_dispatch_bubbles_to_ancestors() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let outer = doc.insert_element("div", None, Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
        let inner = doc.insert_element("span", Some(outer), Rect::from_xywh(0.0, 0.0, 10.0, 10.0));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let on_inner = Rc::clone(&seen);
        doc.add_listener(inner, DragEventKind::DragOver, move |_| {
            on_inner.borrow_mut().push("inner");
        });
        let on_outer = Rc::clone(&seen);
        doc.add_listener(outer, DragEventKind::DragOver, move |ev| {
            on_outer.borrow_mut().push("outer");
            ev.prevent_default();
        });

        let mut transfer = DataTransfer::new(Rc::new(RefCell::new(DragDataStore::new())));
        let mut ev = DragEvent::new(
            DragEventKind::DragOver,
            inner,
            None,
            Point::default(),
            Point::default(),
            &mut transfer,
        );
        doc.dispatch(&mut ev);

        assert_eq!(*seen.borrow(), ["inner", "outer"]);
        assert!(ev.is_default_prevented());
        assert_eq!(doc.dispatched(), [(DragEventKind::DragOver, inner)]);
    }
}
