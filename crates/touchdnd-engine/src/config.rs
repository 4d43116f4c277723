//! Engine configuration
//!
//! Tuning surface for the processing model and the autoscroll loop.
//! Diagnostic logging goes through `tracing`; installing a subscriber is the
//! embedder's business.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Drag engine configuration.
///
/// The drag-and-drop processing model runs in a fixed interval; autoscroll
/// kicks in when the hotspot comes within `scroll_threshold` of a viewport
/// edge and advances by `scroll_velocity` per animation frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds between processing-model iterations
    pub iteration_interval_ms: u64,
    /// Distance from a viewport edge, in px, that triggers autoscroll
    pub scroll_threshold: f64,
    /// Scroll distance, in px, applied per animation frame
    pub scroll_velocity: f64,
    /// Extra class added to the drag image
    pub drag_image_class: Option<String>,
    /// Add diagnostic marker classes to selection/target/event-target
    /// elements during each phase
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iteration_interval_ms: 150,
            scroll_threshold: 50.0,
            scroll_velocity: 10.0,
            drag_image_class: None,
            debug: false,
        }
    }
}

impl Config {
    pub fn iteration_interval(&self) -> Duration {
        Duration::from_millis(self.iteration_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.iteration_interval(), Duration::from_millis(150));
        assert_eq!(config.scroll_threshold, 50.0);
        assert_eq!(config.scroll_velocity, 10.0);
        assert!(!config.debug);
    }
}
