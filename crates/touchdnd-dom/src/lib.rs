//! touchdnd DOM - host capability layer
//!
//! The capability surface the drag engine consumes from its host: element
//! tree traversal, attribute and class access, hit-testing, viewport scroll
//! state, and synchronous drag-event dispatch. Ships `MemoryDocument`, an
//! arena-backed host used by the test suites and by embedders without a
//! real document tree.

mod dropzone;
mod events;
mod geometry;
mod host;
mod memory;
mod touch;

pub use dropzone::{find_dropzone_ancestor, match_operation};
pub use events::{DragEvent, DragEventKind};
pub use geometry::{Point, Rect, Viewport};
pub use host::{classes, DragImageFeedback, HostDocument, SnapbackOutcome};
pub use memory::{MemoryDocument, RecordingFeedback};
pub use touch::{TouchPhase, TouchPoint, TouchSample};

/// Element identifier (index into the host's arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u32);

impl ElementId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }
}
