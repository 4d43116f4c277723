//! Single-flight gate
//!
//! Exactly one drag operation may exist at a time. The slot is modeled as an
//! owned token: acquired before a controller is constructed, carried by the
//! controller, and surrendered during final cleanup. A touch-start arriving
//! while the token is out is ignored.

use touchdnd_dom::{ElementId, HostDocument};

/// Proof of ownership of the process-wide operation slot
#[derive(Debug)]
pub struct OperationToken(());

/// The process-wide operation slot
#[derive(Debug, Default)]
pub struct OperationGate {
    held: bool,
}

impl OperationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot; `None` while another operation holds it
    pub fn try_acquire(&mut self) -> Option<OperationToken> {
        if self.held {
            tracing::debug!("drag operation already active");
            return None;
        }
        self.held = true;
        Some(OperationToken(()))
    }

    pub fn release(&mut self, token: OperationToken) {
        let OperationToken(()) = token;
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// First element from `start` up the ancestor chain with `draggable="true"`,
/// stopping at (and excluding) the document body.
pub fn find_draggable_target(doc: &dyn HostDocument, start: ElementId) -> Option<ElementId> {
    let body = doc.body();
    let mut current = Some(start);
    while let Some(el) = current {
        if el == body {
            return None;
        }
        if doc.attribute(el, "draggable") == Some("true") {
            return Some(el);
        }
        current = doc.parent(el);
    }
    None
}
