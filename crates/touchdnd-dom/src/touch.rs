//! Touch input samples
//!
//! The slice of the host's touch events the drag engine consumes: phase,
//! per-touch identifiers, and coordinates in both viewport and page space.

use crate::geometry::Point;
use crate::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A single touch point
#[derive(Debug, Clone, Copy)]
pub struct TouchPoint {
    /// Identifier that stays stable for the lifetime of this touch
    pub identifier: u64,
    /// Viewport coordinates
    pub client: Point,
    /// Page coordinates (viewport plus scroll offset)
    pub page: Point,
}

/// Touch event sample
#[derive(Debug, Clone)]
pub struct TouchSample {
    pub phase: TouchPhase,
    /// Element under the touch that raised this sample, when the host knows it
    pub target: Option<ElementId>,
    /// All currently active touches
    pub touches: Vec<TouchPoint>,
    /// Touches that triggered this sample
    pub changed: Vec<TouchPoint>,
}

impl TouchSample {
    /// Single-touch sample, client and page coordinates identical
    pub fn single(phase: TouchPhase, target: Option<ElementId>, identifier: u64, at: Point) -> Self {
        let point = TouchPoint {
            identifier,
            client: at,
            page: at,
        };
        Self {
            phase,
            target,
            touches: vec![point],
            changed: vec![point],
        }
    }

    pub fn contains_identifier(&self, identifier: u64) -> bool {
        self.changed.iter().any(|t| t.identifier == identifier)
    }

    pub fn changed_touch(&self, identifier: u64) -> Option<&TouchPoint> {
        self.changed.iter().find(|t| t.identifier == identifier)
    }

    /// Centroid of all active touches in viewport coordinates
    pub fn viewport_centroid(&self) -> Option<Point> {
        Self::centroid(self.touches.iter().map(|t| t.client))
    }

    /// Centroid of all active touches in page coordinates
    pub fn page_centroid(&self) -> Option<Point> {
        Self::centroid(self.touches.iter().map(|t| t.page))
    }

    fn centroid(points: impl Iterator<Item = Point>) -> Option<Point> {
        let mut count = 0usize;
        let mut sum = Point::default();
        for p in points {
            sum.x += p.x;
            sum.y += p.y;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Point::new(sum.x / count as f64, sum.y / count as f64))
    }
}
