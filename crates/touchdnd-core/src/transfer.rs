//! Data Transfer
//!
//! The mode-aware facade exposed to drag event handlers. One instance lives
//! for the whole drag operation; which of its operations are legal at a
//! given instant depends on the store's current access mode.

use std::cell::RefCell;
use std::rc::Rc;

use crate::store::{DragDataStore, DragDataStoreMode, DropEffect, EffectAllowed};
use crate::DataError;

/// Handler-facing view of the drag data store.
///
/// `drop_effect` is owned by the view, independent of the store, and is not
/// persisted across events: the controller resets it before most dispatches
/// and sets it explicitly before `drop`/`dragend`. Every other accessor
/// consults the store mode and silently no-ops (or returns nothing) when the
/// mode disallows it.
pub struct DataTransfer {
    store: Rc<RefCell<DragDataStore>>,
    drop_effect: DropEffect,
}

impl DataTransfer {
    pub fn new(store: Rc<RefCell<DragDataStore>>) -> Self {
        Self {
            store,
            drop_effect: DropEffect::None,
        }
    }

    fn mode(&self) -> DragDataStoreMode {
        self.store.borrow().mode()
    }

    pub fn drop_effect(&self) -> DropEffect {
        self.drop_effect
    }

    /// Ignored outside a dispatch window
    pub fn set_drop_effect(&mut self, value: DropEffect) {
        if self.mode() == DragDataStoreMode::Disconnected {
            return;
        }
        self.drop_effect = value;
    }

    /// Pass-through read; legal in every mode
    pub fn effect_allowed(&self) -> EffectAllowed {
        self.store.borrow().effect_allowed()
    }

    /// Writable only while the store is in read/write mode (the `dragstart`
    /// dispatch); silently ignored otherwise.
    pub fn set_effect_allowed(&mut self, value: EffectAllowed) {
        if self.mode() != DragDataStoreMode::ReadWrite {
            tracing::trace!("ignoring effectAllowed write outside read/write dispatch");
            return;
        }
        self.store.borrow_mut().set_effect_allowed(value);
    }

    /// Store an item under a MIME-like type string.
    ///
    /// No-op unless the store is in read/write mode. A type string containing
    /// whitespace is the one hard validation error of the data layer.
    pub fn set_data(&mut self, ty: &str, data: &str) -> Result<(), DataError> {
        if self.mode() != DragDataStoreMode::ReadWrite {
            return Ok(());
        }
        if ty.contains(char::is_whitespace) {
            return Err(DataError::TypeContainsWhitespace(ty.to_string()));
        }
        self.store.borrow_mut().set_item(ty, data);
        Ok(())
    }

    /// `None` while disconnected or protected; missing types read as empty.
    pub fn get_data(&self, ty: &str) -> Option<String> {
        match self.mode() {
            DragDataStoreMode::Disconnected | DragDataStoreMode::Protected => None,
            DragDataStoreMode::ReadOnly | DragDataStoreMode::ReadWrite => Some(
                self.store
                    .borrow()
                    .data(ty)
                    .unwrap_or_default()
                    .to_string(),
            ),
        }
    }

    /// Remove one item, or all items when `format` is `None`.
    ///
    /// No-op unless the store is in read/write mode.
    pub fn clear_data(&mut self, format: Option<&str>) {
        if self.mode() != DragDataStoreMode::ReadWrite {
            return;
        }
        let mut store = self.store.borrow_mut();
        match format {
            Some(ty) => store.remove_item(ty),
            None => store.clear_items(),
        }
    }

    /// Types in insertion order; empty while disconnected.
    pub fn types(&self) -> Vec<String> {
        if self.mode() == DragDataStoreMode::Disconnected {
            return Vec::new();
        }
        self.store.borrow().types().to_vec()
    }
}
