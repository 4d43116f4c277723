//! touchdnd engine
//!
//! Synthesizes the native drag-and-drop event sequence from touch input.
//! The embedder routes its touch events into [`TouchDnd`] and pumps
//! [`TouchDnd::advance`] from its timer/frame loop; the engine drives the
//! host through the capability traits of `touchdnd-dom` and dispatches
//! `dragstart`, `drag`, `dragenter`, `dragover`, `dragexit`, `dragleave`,
//! `drop`, and `dragend` exactly as a desktop browser would.

mod config;
mod controller;
mod gate;
mod scroll;
mod ticker;

use std::time::Instant;

use touchdnd_dom::{DragImageFeedback, HostDocument, TouchPhase, TouchSample};

pub use config::Config;
pub use controller::{DragOperationController, DragState};
pub use gate::{find_draggable_target, OperationGate, OperationToken};
pub use scroll::{AutoscrollEngine, ScrollIntent};
pub use ticker::IntervalTicker;

/// Operation setup error
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("touch sample carries no changed touch points")]
    EmptyTouchSample,
}

/// Entry point of the polyfill.
///
/// Holds the single-flight gate and at most one active
/// [`DragOperationController`]. Touch-starts over non-draggable elements,
/// and any touch-start while an operation is active, are ignored.
pub struct TouchDnd {
    config: Config,
    gate: OperationGate,
    controller: Option<DragOperationController>,
    completion: Option<Box<dyn FnMut(DragState)>>,
}

impl TouchDnd {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            gate: OperationGate::new(),
            controller: None,
            completion: None,
        }
    }

    /// Callback invoked with the terminal state of every operation.
    ///
    /// An operation that ends in `Potential` never produced drag events;
    /// the embedder typically synthesizes a click or focus for it.
    pub fn set_completion(&mut self, callback: impl FnMut(DragState) + 'static) {
        self.completion = Some(Box::new(callback));
    }

    pub fn is_active(&self) -> bool {
        self.controller.is_some()
    }

    pub fn is_snapback_pending(&self) -> bool {
        self.controller
            .as_ref()
            .is_some_and(|c| c.is_awaiting_snapback())
    }

    /// Route a host touch sample into the engine
    pub fn handle_touch(
        &mut self,
        doc: &mut dyn HostDocument,
        feedback: &mut dyn DragImageFeedback,
        sample: &TouchSample,
        now: Instant,
    ) {
        if sample.phase == TouchPhase::Start {
            self.on_touch_start(doc, sample);
            return;
        }
        if let Some(controller) = self.controller.as_mut() {
            controller.handle_touch(doc, feedback, sample, now);
        }
        self.reap();
    }

    /// Deliver due processing-model iterations and autoscroll frames
    pub fn advance(
        &mut self,
        doc: &mut dyn HostDocument,
        feedback: &mut dyn DragImageFeedback,
        now: Instant,
    ) {
        if let Some(controller) = self.controller.as_mut() {
            controller.advance(doc, feedback, now);
        }
        self.reap();
    }

    /// The embedder reports that the snap-back transition has ended
    pub fn notify_snapback_finished(
        &mut self,
        doc: &mut dyn HostDocument,
        feedback: &mut dyn DragImageFeedback,
    ) {
        if let Some(controller) = self.controller.as_mut() {
            controller.notify_snapback_finished(doc, feedback);
        }
        self.reap();
    }

    fn on_touch_start(&mut self, doc: &mut dyn HostDocument, sample: &TouchSample) {
        tracing::trace!("global touchstart");

        if self.gate.is_held() {
            tracing::debug!("drag operation already active");
            return;
        }

        let touched = sample.target.or_else(|| {
            sample
                .changed
                .first()
                .and_then(|t| doc.element_from_point(t.client))
        });
        let Some(touched) = touched else { return };
        let Some(source) = find_draggable_target(&*doc, touched) else {
            return;
        };
        let Some(token) = self.gate.try_acquire() else {
            return;
        };

        match DragOperationController::new(self.config.clone(), &*doc, source, sample) {
            Ok(mut controller) => {
                controller.attach_token(token);
                self.controller = Some(controller);
            }
            Err(err) => {
                tracing::debug!("drag operation setup failed: {err}");
                self.gate.release(token);
                if let Some(callback) = self.completion.as_mut() {
                    callback(DragState::Cancelled);
                }
            }
        }
    }

    /// Release the gate and report the terminal state once the active
    /// operation has cleaned itself up.
    fn reap(&mut self) {
        if !self
            .controller
            .as_ref()
            .is_some_and(|c| c.is_finished())
        {
            return;
        }
        if let Some(mut controller) = self.controller.take() {
            if let Some(token) = controller.take_token() {
                self.gate.release(token);
            }
            let state = controller.terminal_state();
            tracing::debug!(state = ?state, "drag operation ended");
            if let Some(callback) = self.completion.as_mut() {
                callback(state);
            }
        }
    }
}
