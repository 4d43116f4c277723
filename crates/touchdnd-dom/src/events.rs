//! Synthetic drag events
//!
//! The event objects the engine dispatches into host listeners. Dispatch is
//! synchronous; cancellation travels back through the default-prevented
//! flag, never through an exception.

use touchdnd_core::DataTransfer;

use crate::geometry::Point;
use crate::ElementId;

/// Drag event types, in dispatch order over an operation's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    DragStart,
    Drag,
    DragEnter,
    DragOver,
    DragExit,
    DragLeave,
    Drop,
    DragEnd,
}

impl DragEventKind {
    /// DOM event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::Drag => "drag",
            Self::DragEnter => "dragenter",
            Self::DragOver => "dragover",
            Self::DragExit => "dragexit",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
            Self::DragEnd => "dragend",
        }
    }

    /// Whether a handler may cancel this event by preventing its default
    pub fn cancelable(&self) -> bool {
        matches!(
            self,
            Self::DragStart | Self::Drag | Self::DragEnter | Self::DragOver | Self::Drop
        )
    }
}

/// Synthetic drag event.
///
/// Carries the operation's data transfer view; the legality of reads and
/// writes through it depends on the store mode the controller set for this
/// dispatch.
pub struct DragEvent<'a> {
    pub kind: DragEventKind,
    pub target: ElementId,
    pub related_target: Option<ElementId>,
    /// Viewport coordinates of the driving touch
    pub client: Point,
    /// Page coordinates of the driving touch
    pub page: Point,
    pub transfer: &'a mut DataTransfer,
    default_prevented: bool,
}

impl<'a> DragEvent<'a> {
    pub fn new(
        kind: DragEventKind,
        target: ElementId,
        related_target: Option<ElementId>,
        client: Point,
        page: Point,
        transfer: &'a mut DataTransfer,
    ) -> Self {
        Self {
            kind,
            target,
            related_target,
            client,
            page,
            transfer,
            default_prevented: false,
        }
    }

    /// All synthetic drag events bubble
    pub fn bubbles(&self) -> bool {
        true
    }

    /// Request cancellation; ignored on non-cancelable events
    pub fn prevent_default(&mut self) {
        if self.kind.cancelable() {
            self.default_prevented = true;
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
