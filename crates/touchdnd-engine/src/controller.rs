//! Drag operation controller
//!
//! Owns a single drag operation: the touch-to-drag lifecycle, the
//! fixed-interval processing-model iteration that hit-tests and resolves
//! drop targets, and the drag-image feedback synchronization. Follows the
//! HTML drag-and-drop processing model, restricted to element-rooted drags.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use touchdnd_core::{
    determine_drag_operation, determine_drop_effect, DataTransfer, DragDataStore,
    DragDataStoreMode, DropEffect,
};
use touchdnd_dom::{
    classes, find_dropzone_ancestor, match_operation, DragEvent, DragEventKind, DragImageFeedback,
    ElementId, HostDocument, Point, SnapbackOutcome, TouchPhase, TouchSample,
};

use crate::config::Config;
use crate::gate::OperationToken;
use crate::scroll::AutoscrollEngine;
use crate::ticker::IntervalTicker;
use crate::SetupError;

/// Lifecycle states of a drag operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    /// No movement yet; the operation may still turn out to be a tap
    Potential,
    /// Movement detected, drag events are flowing
    Started,
    /// Input ended normally
    Ended,
    /// Input was cancelled, or `dragstart` was prevented
    Cancelled,
}

/// Controller for one drag operation.
///
/// Constructed on a touch-start over a draggable element and driven by
/// touch samples plus the embedder's pump; terminal state is observable
/// once [`is_finished`](Self::is_finished) reports true.
pub struct DragOperationController {
    config: Config,
    source: ElementId,
    source_anchor_like: bool,
    initial_touch_id: u64,
    state: DragState,

    store: Option<Rc<RefCell<DragDataStore>>>,
    transfer: Option<DataTransfer>,

    /// Viewport coordinates used for hit-testing
    hotspot: Point,
    /// Page coordinates used for drag-image placement
    image_anchor: Point,
    last_client: Point,
    last_page: Point,

    immediate_user_selection: Option<ElementId>,
    current_drop_target: Option<ElementId>,
    current_drag_operation: DropEffect,

    ticker: IntervalTicker,
    autoscroll: AutoscrollEngine,
    iteration_lock: bool,
    awaiting_snapback: bool,
    finished: bool,
    token: Option<OperationToken>,
}

impl DragOperationController {
    pub fn new(
        config: Config,
        doc: &dyn HostDocument,
        source: ElementId,
        sample: &TouchSample,
    ) -> Result<Self, SetupError> {
        tracing::debug!("setting up potential drag operation");

        let touch = sample.changed.first().ok_or(SetupError::EmptyTouchSample)?;
        let source_anchor_like =
            doc.tag_name(source).eq_ignore_ascii_case("a") && doc.has_attribute(source, "href");
        let ticker = IntervalTicker::new(config.iteration_interval());
        let autoscroll = AutoscrollEngine::new(&config);

        Ok(Self {
            source,
            source_anchor_like,
            initial_touch_id: touch.identifier,
            state: DragState::Potential,
            store: None,
            transfer: None,
            hotspot: touch.client,
            image_anchor: touch.page,
            last_client: touch.client,
            last_page: touch.page,
            immediate_user_selection: None,
            current_drop_target: None,
            current_drag_operation: DropEffect::None,
            ticker,
            autoscroll,
            iteration_lock: false,
            awaiting_snapback: false,
            finished: false,
            token: None,
            config,
        })
    }

    /// Hand over the single-flight slot for the operation's lifetime
    pub fn attach_token(&mut self, token: OperationToken) {
        self.token = Some(token);
    }

    pub fn take_token(&mut self) -> Option<OperationToken> {
        self.token.take()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_awaiting_snapback(&self) -> bool {
        self.awaiting_snapback
    }

    pub fn terminal_state(&self) -> DragState {
        self.state
    }

    /// Feed a touch sample. Samples whose changed touches do not include the
    /// initiating identifier are ignored without being consumed.
    pub fn handle_touch(
        &mut self,
        doc: &mut dyn HostDocument,
        feedback: &mut dyn DragImageFeedback,
        sample: &TouchSample,
        now: Instant,
    ) {
        if self.finished || !sample.contains_identifier(self.initial_touch_id) {
            return;
        }

        if let Some(touch) = sample.changed_touch(self.initial_touch_id) {
            self.last_client = touch.client;
            self.last_page = touch.page;
        }

        match sample.phase {
            TouchPhase::Start => {}
            TouchPhase::Move => self.on_touch_move(doc, feedback, sample, now),
            TouchPhase::End | TouchPhase::Cancel => {
                self.on_touch_end_or_cancel(feedback, sample.phase)
            }
        }
    }

    fn on_touch_move(
        &mut self,
        doc: &mut dyn HostDocument,
        feedback: &mut dyn DragImageFeedback,
        sample: &TouchSample,
        now: Instant,
    ) {
        match self.state {
            DragState::Potential => self.start_drag_operation(doc, feedback, sample, now),
            DragState::Started => {
                if let Some(p) = sample.viewport_centroid() {
                    self.hotspot = p;
                }
                if let Some(p) = sample.page_centroid() {
                    self.image_anchor = p;
                }

                let viewport = doc.viewport();
                self.autoscroll.update_intent(self.hotspot, &viewport);
                if self.autoscroll.should_animate(&viewport) {
                    self.autoscroll.start();
                } else {
                    self.autoscroll.stop();
                }

                // the scroll loop owns the drag image while it runs
                if self.autoscroll.is_active() {
                    return;
                }
                feedback.translate(self.image_anchor);
            }
            DragState::Ended | DragState::Cancelled => {}
        }
    }

    fn on_touch_end_or_cancel(&mut self, feedback: &mut dyn DragImageFeedback, phase: TouchPhase) {
        self.autoscroll.stop();

        // no movement ever happened; no drag events were fired
        if self.state == DragState::Potential {
            self.cleanup(feedback);
            return;
        }

        // only record terminal intent; the next iteration acts on it
        self.state = if phase == TouchPhase::Cancel {
            DragState::Cancelled
        } else {
            DragState::Ended
        };
    }

    fn start_drag_operation(
        &mut self,
        doc: &mut dyn HostDocument,
        feedback: &mut dyn DragImageFeedback,
        sample: &TouchSample,
        now: Instant,
    ) {
        tracing::debug!("starting drag and drop operation");

        self.state = DragState::Started;

        let store = Rc::new(RefCell::new(DragDataStore::new()));
        self.transfer = Some(DataTransfer::new(Rc::clone(&store)));
        self.store = Some(store);

        if let Some(p) = sample.viewport_centroid() {
            self.hotspot = p;
        }
        if let Some(p) = sample.page_centroid() {
            self.image_anchor = p;
        }

        feedback.create(doc, self.source, self.config.drag_image_class.as_deref());
        feedback.translate(self.image_anchor);

        if self.fire(doc, DragEventKind::DragStart, self.source, None) {
            tracing::debug!("dragstart cancelled");
            self.state = DragState::Cancelled;
            self.cleanup(feedback);
            return;
        }

        self.ticker.start(now);
    }

    /// Deliver due processing-model iterations and scroll frames.
    ///
    /// An iteration due while the previous one is still executing is skipped
    /// entirely, never queued.
    pub fn advance(
        &mut self,
        doc: &mut dyn HostDocument,
        feedback: &mut dyn DragImageFeedback,
        now: Instant,
    ) {
        if self.finished || self.awaiting_snapback {
            return;
        }

        if self.state != DragState::Potential && self.ticker.fire_due(now) {
            if self.iteration_lock {
                tracing::trace!("iteration skipped, previous iteration has not yet finished");
            } else {
                self.iteration_lock = true;
                self.iteration(doc, feedback);
                self.iteration_lock = false;
            }
        }

        if self.finished || self.awaiting_snapback {
            return;
        }

        if self.state == DragState::Started && self.autoscroll.is_active() {
            if self.autoscroll.frame(doc, &mut self.image_anchor) {
                feedback.translate(self.image_anchor);
            }
        }
    }

    /// The embedder reports that the snap-back transition has ended
    pub fn notify_snapback_finished(
        &mut self,
        doc: &mut dyn HostDocument,
        feedback: &mut dyn DragImageFeedback,
    ) {
        if !self.awaiting_snapback {
            return;
        }
        tracing::debug!("drag image snap back transition ended");
        self.awaiting_snapback = false;
        self.finish(doc, feedback);
    }

    /// One pass of the drag-and-drop processing model
    fn iteration(&mut self, doc: &mut dyn HostDocument, feedback: &mut dyn DragImageFeedback) {
        let drag_cancelled = self.fire(doc, DragEventKind::Drag, self.source, None);
        if drag_cancelled {
            tracing::debug!("drag event cancelled");
            self.current_drag_operation = DropEffect::None;
        }

        if drag_cancelled || matches!(self.state, DragState::Ended | DragState::Cancelled) {
            let failed = self.end_operation(doc);
            if failed && feedback.snapback(doc, self.source) == SnapbackOutcome::Transitioning {
                self.awaiting_snapback = true;
                return;
            }
            self.finish(doc, feedback);
            return;
        }

        let new_selection = doc.element_from_point(self.hotspot);
        let previous_target = self.current_drop_target;

        if new_selection != self.immediate_user_selection
            && new_selection != self.current_drop_target
        {
            if self.config.debug {
                if let Some(old) = self.immediate_user_selection {
                    doc.remove_class(old, classes::USER_SELECTION);
                }
            }
            self.immediate_user_selection = new_selection;
            if self.config.debug {
                if let Some(selection) = self.immediate_user_selection {
                    doc.add_class(selection, classes::DEBUG);
                    doc.add_class(selection, classes::USER_SELECTION);
                }
            }

            if let Some(old_target) = self.current_drop_target {
                self.fire(doc, DragEventKind::DragExit, old_target, None);
            }

            match self.immediate_user_selection {
                None => {
                    tracing::debug!("current drop target changed to none");
                    self.current_drop_target = None;
                }
                Some(selection) => {
                    if self.fire(doc, DragEventKind::DragEnter, selection, None) {
                        tracing::debug!("dragenter default prevented");
                        self.current_drop_target = Some(selection);
                        self.current_drag_operation = self.negotiated_operation();
                    } else {
                        self.resolve_dropzone_target(doc, selection);
                    }
                }
            }
        }

        if previous_target != self.current_drop_target {
            if let Some(previous) = previous_target {
                tracing::debug!("current drop target changed");
                if self.config.debug {
                    doc.remove_class(previous, classes::DROP_TARGET);
                }
                self.fire(doc, DragEventKind::DragLeave, previous, self.current_drop_target);
            }
        }

        if let Some(target) = self.current_drop_target {
            if self.config.debug {
                doc.add_class(target, classes::DEBUG);
                doc.add_class(target, classes::DROP_TARGET);
            }
            if self.fire(doc, DragEventKind::DragOver, target, None) {
                self.current_drag_operation = self.negotiated_operation();
            } else {
                self.current_drag_operation = self.dropzone_operation(&*doc, target);
            }
        }

        tracing::trace!(
            operation = self.current_drag_operation.as_str(),
            "iteration ended"
        );
        feedback.set_operation(self.current_drag_operation);
    }

    /// Dropzone resolution after an uncancelled `dragenter` at the selection
    fn resolve_dropzone_target(&mut self, doc: &mut dyn HostDocument, selection: ElementId) {
        tracing::debug!("dragenter not prevented, searching for dropzone");

        let dropzone = find_dropzone_ancestor(&*doc, selection);
        let mut resolved = false;

        if let Some(zone) = dropzone {
            if zone == selection {
                if self.dropzone_operation(&*doc, zone) != DropEffect::None {
                    self.current_drop_target = Some(selection);
                    resolved = true;
                }
            } else if self.dropzone_operation(&*doc, zone) != DropEffect::None {
                self.fire(doc, DragEventKind::DragEnter, zone, self.current_drop_target);
                self.current_drop_target = Some(zone);
                resolved = true;
            }
        }

        if !resolved && selection != doc.body() {
            // adopt the body as fallback target without firing dragenter at
            // it; the uncancelled dragenter above already bubbled up there
            self.current_drop_target = Some(doc.body());
        }
    }

    /// End-of-operation resolution. Returns whether the drag failed.
    fn end_operation(&mut self, doc: &mut dyn HostDocument) -> bool {
        tracing::debug!(state = ?self.state, "drag operation end detected");

        if self.config.debug {
            if let Some(target) = self.current_drop_target {
                doc.remove_class(target, classes::DROP_TARGET);
            }
            if let Some(selection) = self.immediate_user_selection {
                doc.remove_class(selection, classes::USER_SELECTION);
            }
        }

        let failed = self.current_drag_operation == DropEffect::None
            || self.current_drop_target.is_none()
            || self.state == DragState::Cancelled;

        if failed {
            if let Some(target) = self.current_drop_target {
                self.fire(doc, DragEventKind::DragLeave, target, None);
            }
        } else if let Some(target) = self.current_drop_target {
            if self.fire(doc, DragEventKind::Drop, target, None) {
                // the handler's drop effect becomes the operation
                self.current_drag_operation = self
                    .transfer
                    .as_ref()
                    .map(|t| t.drop_effect())
                    .unwrap_or_default();
            } else {
                // no default action for non-editable targets
                self.current_drag_operation = DropEffect::None;
            }
        }

        failed
    }

    fn finish(&mut self, doc: &mut dyn HostDocument, feedback: &mut dyn DragImageFeedback) {
        self.fire(doc, DragEventKind::DragEnd, self.source, None);
        self.state = DragState::Ended;
        self.cleanup(feedback);
    }

    fn cleanup(&mut self, feedback: &mut dyn DragImageFeedback) {
        tracing::debug!("cleanup");

        self.ticker.stop();
        self.autoscroll.stop();
        feedback.remove();

        self.store = None;
        self.transfer = None;
        self.immediate_user_selection = None;
        self.current_drop_target = None;
        self.finished = true;
    }

    /// Dispatch one synthetic drag event, with the store mode and the
    /// transfer's drop effect set for exactly this dispatch window. Returns
    /// whether a handler cancelled the event.
    fn fire(
        &mut self,
        doc: &mut dyn HostDocument,
        kind: DragEventKind,
        target: ElementId,
        related: Option<ElementId>,
    ) -> bool {
        tracing::trace!("{}", kind.name());

        let (Some(store), Some(transfer)) = (self.store.as_ref(), self.transfer.as_mut()) else {
            return false;
        };

        if self.config.debug {
            doc.add_class(target, classes::DEBUG);
            doc.add_class(target, classes::EVENT_TARGET);
            if let Some(related) = related {
                doc.add_class(related, classes::EVENT_RELATED_TARGET);
            }
        }

        store.borrow_mut().set_mode(store_mode_for(kind));
        let effect = match kind {
            DragEventKind::DragStart
            | DragEventKind::Drag
            | DragEventKind::DragExit
            | DragEventKind::DragLeave => DropEffect::None,
            DragEventKind::DragEnter | DragEventKind::DragOver => {
                determine_drop_effect(store.borrow().effect_allowed(), self.source_anchor_like)
            }
            DragEventKind::Drop | DragEventKind::DragEnd => self.current_drag_operation,
        };
        transfer.set_drop_effect(effect);

        let mut event = DragEvent::new(kind, target, related, self.last_client, self.last_page, transfer);
        doc.dispatch(&mut event);
        let cancelled = event.is_default_prevented();
        drop(event);

        store.borrow_mut().set_mode(DragDataStoreMode::Disconnected);

        if self.config.debug {
            doc.remove_class(target, classes::EVENT_TARGET);
            if let Some(related) = related {
                doc.remove_class(related, classes::EVENT_RELATED_TARGET);
            }
        }

        cancelled
    }

    fn negotiated_operation(&self) -> DropEffect {
        self.transfer
            .as_ref()
            .map(determine_drag_operation)
            .unwrap_or_default()
    }

    fn dropzone_operation(&self, doc: &dyn HostDocument, element: ElementId) -> DropEffect {
        match self.store.as_ref() {
            Some(store) => match_operation(doc, element, &store.borrow()),
            None => DropEffect::None,
        }
    }
}

fn store_mode_for(kind: DragEventKind) -> DragDataStoreMode {
    match kind {
        DragEventKind::DragStart => DragDataStoreMode::ReadWrite,
        DragEventKind::Drop => DragDataStoreMode::ReadOnly,
        _ => DragDataStoreMode::Protected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchdnd_dom::{MemoryDocument, Rect, RecordingFeedback};

    fn doc_with_draggable() -> (MemoryDocument, ElementId) {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let el = doc.insert_element("div", None, Rect::from_xywh(10.0, 10.0, 50.0, 50.0));
        doc.set_attribute(el, "draggable", "true");
        (doc, el)
    }

    #[test]
    fn test_touch_end_while_potential_fires_nothing() {
        let (mut doc, el) = doc_with_draggable();
        let mut feedback = RecordingFeedback::new();
        let start = TouchSample::single(TouchPhase::Start, Some(el), 1, Point::new(20.0, 20.0));
        let end = TouchSample::single(TouchPhase::End, Some(el), 1, Point::new(20.0, 20.0));

        let mut controller =
            DragOperationController::new(Config::default(), &doc, el, &start).unwrap();
        controller.handle_touch(&mut doc, &mut feedback, &end, Instant::now());

        assert!(controller.is_finished());
        assert_eq!(controller.terminal_state(), DragState::Potential);
        assert!(doc.dispatched().is_empty());
    }

    #[test]
    fn test_cancelled_dragstart_stops_the_operation() {
        let (mut doc, el) = doc_with_draggable();
        doc.add_listener(el, DragEventKind::DragStart, |ev| ev.prevent_default());
        let mut feedback = RecordingFeedback::new();
        let start = TouchSample::single(TouchPhase::Start, Some(el), 1, Point::new(20.0, 20.0));
        let moved = TouchSample::single(TouchPhase::Move, Some(el), 1, Point::new(40.0, 20.0));

        let mut controller =
            DragOperationController::new(Config::default(), &doc, el, &start).unwrap();
        controller.handle_touch(&mut doc, &mut feedback, &moved, Instant::now());

        assert!(controller.is_finished());
        assert_eq!(controller.terminal_state(), DragState::Cancelled);
        // dragstart only, no dragend after a cancelled dragstart
        assert_eq!(doc.dispatched(), [(DragEventKind::DragStart, el)]);
        assert!(feedback.removed);
    }

    #[test]
    fn test_unrelated_touch_identifiers_are_ignored() {
        let (mut doc, el) = doc_with_draggable();
        let mut feedback = RecordingFeedback::new();
        let start = TouchSample::single(TouchPhase::Start, Some(el), 1, Point::new(20.0, 20.0));
        let other = TouchSample::single(TouchPhase::Move, None, 9, Point::new(300.0, 300.0));

        let mut controller =
            DragOperationController::new(Config::default(), &doc, el, &start).unwrap();
        controller.handle_touch(&mut doc, &mut feedback, &other, Instant::now());

        assert!(!controller.is_finished());
        assert!(doc.dispatched().is_empty());
    }
}
