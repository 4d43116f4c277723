//! Dropzone resolution
//!
//! The attribute-driven matching that decides whether, and with which
//! operation, an element accepts the current drag payload.

use touchdnd_core::{DragDataStore, DropEffect};

use crate::host::HostDocument;
use crate::ElementId;

/// First element from `element` up the ancestor chain carrying a `dropzone`
/// attribute, stopping at (and excluding) the document body.
pub fn find_dropzone_ancestor(doc: &dyn HostDocument, element: ElementId) -> Option<ElementId> {
    let body = doc.body();
    let mut current = Some(element);
    while let Some(el) = current {
        if el == body {
            return None;
        }
        if doc.has_attribute(el, "dropzone") {
            return Some(el);
        }
        current = doc.parent(el);
    }
    None
}

/// Operation permitted by an element's `dropzone` attribute for this store.
///
/// The attribute is a space-separated keyword list: `copy`, `move`, `link`
/// declare the operation (first one wins); `kind:type` keywords are type
/// filters matched case-insensitively against the store's type list. With no
/// matched filter the attribute does not apply and the result is
/// [`DropEffect::None`]; with a match but no declared operation the result
/// defaults to copy.
pub fn match_operation(doc: &dyn HostDocument, element: ElementId, store: &DragDataStore) -> DropEffect {
    let Some(value) = doc.attribute(element, "dropzone") else {
        return DropEffect::None;
    };

    let mut matched = false;
    let mut operation: Option<DropEffect> = None;

    for keyword in value.split_whitespace() {
        match keyword {
            "copy" => {
                operation.get_or_insert(DropEffect::Copy);
            }
            "move" => {
                operation.get_or_insert(DropEffect::Move);
            }
            "link" => {
                operation.get_or_insert(DropEffect::Link);
            }
            _ => {
                if let Some((_kind, ty)) = keyword.split_once(':') {
                    if store.contains_type(ty) {
                        matched = true;
                    }
                }
            }
        }
    }

    if !matched {
        return DropEffect::None;
    }
    operation.unwrap_or(DropEffect::Copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;
    use crate::geometry::Rect;

    fn store_with_plain_text() -> DragDataStore {
        let mut store = DragDataStore::new();
        store.set_item("text/plain", "payload");
        store
    }

    #[test]
    fn test_match_operation_with_declared_move() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let el = doc.insert_element("div", None, Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        doc.set_attribute(el, "dropzone", "move string:text/plain");

        assert_eq!(match_operation(&doc, el, &store_with_plain_text()), DropEffect::Move);
        assert_eq!(match_operation(&doc, el, &DragDataStore::new()), DropEffect::None);
    }

    #[test]
    fn test_match_operation_defaults_to_copy() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let el = doc.insert_element("div", None, Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        doc.set_attribute(el, "dropzone", "string:TEXT/PLAIN");

        assert_eq!(match_operation(&doc, el, &store_with_plain_text()), DropEffect::Copy);
    }

    #[test]
    fn test_match_operation_first_declaration_wins() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let el = doc.insert_element("div", None, Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        doc.set_attribute(el, "dropzone", "link move string:text/plain");

        assert_eq!(match_operation(&doc, el, &store_with_plain_text()), DropEffect::Link);
    }

    #[test]
    fn test_find_dropzone_ancestor_walks_up() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let outer = doc.insert_element("section", None, Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
        doc.set_attribute(outer, "dropzone", "copy string:text/plain");
        let inner = doc.insert_element("div", Some(outer), Rect::from_xywh(10.0, 10.0, 50.0, 50.0));
        let leaf = doc.insert_element("span", Some(inner), Rect::from_xywh(12.0, 12.0, 10.0, 10.0));

        assert_eq!(find_dropzone_ancestor(&doc, leaf), Some(outer));
        assert_eq!(find_dropzone_ancestor(&doc, outer), Some(outer));
    }

    #[test]
    fn test_find_dropzone_ancestor_excludes_body() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let body = doc.body();
        doc.set_attribute(body, "dropzone", "copy string:text/plain");
        let el = doc.insert_element("div", None, Rect::from_xywh(0.0, 0.0, 10.0, 10.0));

        assert_eq!(find_dropzone_ancestor(&doc, el), None);
        assert_eq!(find_dropzone_ancestor(&doc, body), None);
    }
}
