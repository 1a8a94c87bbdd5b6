//! Double-click detection for hosts without native double-click events.
//!
//! The gallery feeds every primary press on a tile through a [`DoubleClickDetector`] when
//! `GalleryOptions::detect_double_click` is enabled; a second press on the same tile inside the time window
//! activates it.

use std::time::{Duration, Instant};

/// Default time window for two presses to count as a double-click
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 400;

#[derive(Debug, Clone)]
pub struct DoubleClickDetector<T: PartialEq + Clone> {
    /// Time and target of the last single press
    last_click: Option<(Instant, T)>,
    window: Duration,
}

impl<T: PartialEq + Clone> Default for DoubleClickDetector<T> {
    fn default() -> Self {
        Self::with_window_ms(DEFAULT_DOUBLE_CLICK_MS)
    }
}

impl<T: PartialEq + Clone> DoubleClickDetector<T> {
    pub fn with_window_ms(window_ms: u64) -> Self {
        Self {
            last_click: None,
            window: Duration::from_millis(window_ms),
        }
    }

    pub fn set_window_ms(&mut self, window_ms: u64) {
        self.window = Duration::from_millis(window_ms);
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_double_click(&mut self, target: T) -> bool {
        self.is_double_click_at(target, Instant::now())
    }

    /// Registers a press on `target` at `now`.
    ///
    /// Returns `true` when the previous press hit the same target less than the window ago. A detected
    /// double-click clears the state, so a third press starts over.
    pub fn is_double_click_at(&mut self, target: T, now: Instant) -> bool {
        let is_double = self
            .last_click
            .as_ref()
            .is_some_and(|(last_time, last_target)| *last_target == target && now.saturating_duration_since(*last_time) < self.window);

        self.last_click = if is_double { None } else { Some((now, target)) };
        is_double
    }

    pub fn reset(&mut self) {
        self.last_click = None;
    }
}
