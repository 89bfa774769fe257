//! Playback window enforcement
//!
//! Decides, on each position tick, whether playback has reached the end of
//! the configured `[start, end)` window or the natural end of the media.

use crate::types::{PlaybackStatus, PlayerState};

/// Snapshot of the window bounds in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackWindow {
    pub start: f64,
    /// Enforced end; `None` when unset or inverted
    pub end: Option<f64>,
}

impl PlaybackWindow {
    /// Build a window, dropping an end that lies before the start
    pub fn new(start: f64, end: Option<f64>) -> Self {
        Self {
            start,
            end: end.filter(|end| *end >= start),
        }
    }

    pub fn from_state(state: &PlayerState) -> Self {
        Self::new(state.window_start, state.window_end)
    }

    /// Whether `position` has reached the window end or the media end
    ///
    /// Never true while paused. Unknown, zero, or non-finite durations do not
    /// count as a natural end.
    pub fn is_reached(&self, position: f64, duration: Option<f64>, status: PlaybackStatus) -> bool {
        if status != PlaybackStatus::Playing || !position.is_finite() {
            return false;
        }
        let past_end = self.end.is_some_and(|end| position >= end);
        let past_duration = duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .is_some_and(|d| position >= d);
        past_end || past_duration
    }
}
