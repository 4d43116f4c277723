//! Autoscroll engine
//!
//! Edge-proximity scroll intent and the continuous scroll loop that keeps
//! the drag image anchored while the viewport moves underneath it. While the
//! loop is active it owns the drag image position; ordinary touch-move
//! repositioning is suppressed to avoid double-moving the image.

use touchdnd_dom::{HostDocument, Point, Viewport};

use crate::config::Config;

/// Per-axis scroll direction, recomputed on every touch-move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollIntent {
    pub x: i8,
    pub y: i8,
}

impl ScrollIntent {
    pub fn is_idle(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

#[derive(Debug)]
pub struct AutoscrollEngine {
    threshold: f64,
    velocity: f64,
    intent: ScrollIntent,
    active: bool,
}

impl AutoscrollEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            threshold: config.scroll_threshold,
            velocity: config.scroll_velocity,
            intent: ScrollIntent::default(),
            active: false,
        }
    }

    pub fn intent(&self) -> ScrollIntent {
        self.intent
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Recompute per-axis intent from hotspot proximity to the viewport edges
    pub fn update_intent(&mut self, hotspot: Point, viewport: &Viewport) {
        self.intent.x = if hotspot.x < self.threshold {
            -1
        } else if viewport.client_width - hotspot.x < self.threshold {
            1
        } else {
            0
        };
        self.intent.y = if hotspot.y < self.threshold {
            -1
        } else if viewport.client_height - hotspot.y < self.threshold {
            1
        } else {
            0
        };
    }

    /// Whether the current intent still has scroll room on some axis
    pub fn should_animate(&self, viewport: &Viewport) -> bool {
        !Self::horizontal_end_reached(self.intent, viewport)
            || !Self::vertical_end_reached(self.intent, viewport)
    }

    /// Idempotent loop start
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        tracing::debug!("setting up scroll animation");
        self.active = true;
    }

    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        tracing::debug!("tearing down scroll animation");
        self.active = false;
    }

    /// One animation frame: scroll each axis with intent and room, advance
    /// the drag image anchor by the same amount. Returns whether the loop is
    /// still running; it tears itself down once both axes are done.
    pub fn frame(&mut self, doc: &mut dyn HostDocument, anchor: &mut Point) -> bool {
        if !self.active {
            return false;
        }

        let viewport = doc.viewport();
        let horizontal_done = Self::horizontal_end_reached(self.intent, &viewport);
        let vertical_done = Self::vertical_end_reached(self.intent, &viewport);
        if horizontal_done && vertical_done {
            tracing::debug!("scroll end reached");
            self.stop();
            return false;
        }

        let mut dx = 0.0;
        let mut dy = 0.0;
        if !horizontal_done {
            dx = f64::from(self.intent.x) * self.velocity;
            anchor.x += dx;
        }
        if !vertical_done {
            dy = f64::from(self.intent.y) * self.velocity;
            anchor.y += dy;
        }
        doc.scroll_viewport_by(dx, dy);
        true
    }

    fn horizontal_end_reached(intent: ScrollIntent, viewport: &Viewport) -> bool {
        if intent.x > 0 {
            viewport.scroll_left + viewport.client_width >= viewport.scroll_width
        } else if intent.x < 0 {
            viewport.scroll_left <= 0.0
        } else {
            true
        }
    }

    fn vertical_end_reached(intent: ScrollIntent, viewport: &Viewport) -> bool {
        if intent.y > 0 {
            viewport.scroll_top + viewport.client_height >= viewport.scroll_height
        } else if intent.y < 0 {
            viewport.scroll_top <= 0.0
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchdnd_dom::MemoryDocument;

    fn engine() -> AutoscrollEngine {
        AutoscrollEngine::new(&Config::default())
    }

    #[test]
    fn test_intent_near_edges() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut scroll = engine();

        scroll.update_intent(Point::new(400.0, 300.0), &viewport);
        assert!(scroll.intent().is_idle());

        scroll.update_intent(Point::new(20.0, 580.0), &viewport);
        assert_eq!(scroll.intent(), ScrollIntent { x: -1, y: 1 });

        scroll.update_intent(Point::new(790.0, 20.0), &viewport);
        assert_eq!(scroll.intent(), ScrollIntent { x: 1, y: -1 });
    }

    #[test]
    fn test_no_animation_without_scroll_room() {
        // viewport equals the scrollable area, nothing to scroll
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let mut scroll = engine();

        scroll.update_intent(Point::new(790.0, 300.0), &doc.viewport());
        assert!(!scroll.should_animate(&doc.viewport()));

        // intent without room never scrolls
        scroll.start();
        let mut anchor = Point::new(790.0, 300.0);
        assert!(!scroll.frame(&mut doc, &mut anchor));
        assert_eq!(doc.viewport().scroll_left, 0.0);
    }

    #[test]
    fn test_frames_advance_scroll_and_anchor() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        doc.set_scroll_size(1000.0, 600.0);
        let mut scroll = engine();

        scroll.update_intent(Point::new(790.0, 300.0), &doc.viewport());
        assert!(scroll.should_animate(&doc.viewport()));
        scroll.start();

        let mut anchor = Point::new(790.0, 300.0);
        assert!(scroll.frame(&mut doc, &mut anchor));
        assert_eq!(doc.viewport().scroll_left, 10.0);
        assert_eq!(anchor.x, 800.0);

        // drain the remaining 190px of scroll room
        for _ in 0..19 {
            scroll.frame(&mut doc, &mut anchor);
        }
        assert_eq!(doc.viewport().scroll_left, 200.0);

        // boundary reached on the next frame, loop tears down
        assert!(!scroll.frame(&mut doc, &mut anchor));
        assert!(!scroll.is_active());
        assert_eq!(anchor.x, 990.0);
    }
}
