//! Host capabilities
//!
//! Traits the drag engine consumes from its embedding environment. The
//! engine never owns a document tree or renders anything; it drives these
//! seams.

use touchdnd_core::DropEffect;

use crate::events::DragEvent;
use crate::geometry::{Point, Viewport};
use crate::ElementId;

/// Document capabilities consumed by the drag engine.
///
/// Dispatch is synchronous: the host runs every interested listener before
/// returning, and cancellation is read off the event afterwards.
pub trait HostDocument {
    /// The document body element (fallback drop target sentinel)
    fn body(&self) -> ElementId;

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Lowercased tag names are not required; queries compare case-insensitively
    fn tag_name(&self, element: ElementId) -> &str;

    fn attribute(&self, element: ElementId, name: &str) -> Option<&str>;

    fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Topmost element under a viewport coordinate; the drag image never
    /// participates in hit-testing.
    fn element_from_point(&self, point: Point) -> Option<ElementId>;

    /// Snapshot of the viewport metrics and scroll state
    fn viewport(&self) -> Viewport;

    /// Scroll the viewport by an amount, clamped to the scrollable range
    fn scroll_viewport_by(&mut self, dx: f64, dy: f64);

    /// Dispatch a synthetic drag event through the host's listener tree
    fn dispatch(&mut self, event: &mut DragEvent<'_>);
}

/// Outcome of starting the snap-back transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapbackOutcome {
    /// No transition runs (source hidden, feedback unanimated); finalize now
    Finished,
    /// A transition is running; the embedder reports its end later
    Transitioning,
}

/// Visual feedback collaborator owning the "ghost" drag image.
///
/// Cloning the source node and styling the ghost are the embedder's
/// business; the engine only tells the feedback where the ghost belongs and
/// which operation it should indicate.
pub trait DragImageFeedback {
    /// Create the ghost for a source element, with an optional extra class
    fn create(&mut self, doc: &mut dyn HostDocument, source: ElementId, extra_class: Option<&str>);

    /// Center the ghost on page coordinates
    fn translate(&mut self, page: Point);

    /// Swap the ghost's operation-indicator class
    fn set_operation(&mut self, operation: DropEffect);

    /// Begin the return-to-origin transition after a failed drag
    fn snapback(&mut self, doc: &mut dyn HostDocument, source: ElementId) -> SnapbackOutcome;

    /// Detach the ghost
    fn remove(&mut self);
}

/// CSS class hooks shared with the embedder's stylesheet
pub mod classes {
    use touchdnd_core::DropEffect;

    pub const PREFIX: &str = "dnd-poly-";
    pub const DRAG_IMAGE: &str = "dnd-poly-drag-image";
    pub const SNAPBACK: &str = "dnd-poly-snapback";
    pub const OPERATION_ICON: &str = "dnd-poly-icon";
    pub const DEBUG: &str = "dnd-poly-debug";
    pub const USER_SELECTION: &str = "dnd-poly-immediate-user-selection";
    pub const DROP_TARGET: &str = "dnd-poly-current-drop-target";
    pub const EVENT_TARGET: &str = "dnd-poly-event-target";
    pub const EVENT_RELATED_TARGET: &str = "dnd-poly-event-related-target";

    /// Operation-indicator class for the ghost
    pub fn operation_class(operation: DropEffect) -> &'static str {
        match operation {
            DropEffect::None => "dnd-poly-none",
            DropEffect::Copy => "dnd-poly-copy",
            DropEffect::Link => "dnd-poly-link",
            DropEffect::Move => "dnd-poly-move",
        }
    }
}
