//! External collaborators of the controller
//!
//! The controller never decodes or renders anything itself. It drives a
//! [`MediaSink`] (the actual audio element or decoder) and informs a
//! [`PresentationSurface`] (whatever draws the player).

use crate::error::Result;
use crate::events::PropertyChange;
use crate::types::{PlayerState, Playlist};

/// Playable media primitive
///
/// One active stream. Commands may fail (e.g. a browser refusing `play()`
/// without a user gesture); the controller rejects the change that issued
/// the failing command.
pub trait MediaSink {
    /// Replace the stream with `src`; position resets to zero
    fn load(&mut self, src: &str, mime_type: &str) -> Result<()>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Move the playhead to `seconds`
    fn seek(&mut self, seconds: f64) -> Result<()>;

    fn set_rate(&mut self, rate: f64) -> Result<()>;

    /// Total media duration, `None` until known
    fn duration(&self) -> Option<f64>;

    /// Current playhead position in seconds
    fn current_position(&self) -> f64;

    /// Start delivering [`MediaEvent`]s to the host event queue
    ///
    /// Called once when the state machine is constructed.
    fn subscribe(&mut self) {}

    /// Stop delivering events
    ///
    /// Called once when the state machine is dropped.
    fn unsubscribe(&mut self) {}
}

/// Asynchronous events raised by the media sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Playhead moved (sink-determined granularity)
    PositionUpdate(f64),

    /// Duration became known or changed
    DurationKnown(f64),

    /// Stream played to its natural end
    Ended,
}

/// Whatever draws the player
///
/// Rendering, highlighting the active track, and swapping icons are all the
/// surface's business.
pub trait PresentationSurface {
    /// A property change was applied
    fn notify(&mut self, change: &PropertyChange);

    /// The playlist was replaced; redraw the track list
    fn render(&mut self, _state: &PlayerState, _playlist: &Playlist) {}

    /// Playhead or duration moved; update time display and progress
    fn time_update(&mut self, _position: f64, _duration: Option<f64>) {}
}

/// Surface that draws nothing (headless hosts)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl PresentationSurface for NullSurface {
    fn notify(&mut self, _change: &PropertyChange) {}
}

/// In-memory sink for unit tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct DummySink {
    pub loaded: Option<(String, String)>,
    pub playing: bool,
    pub position: f64,
    pub rate: f64,
    pub duration: Option<f64>,
    pub subscribed: bool,
}

#[cfg(test)]
impl MediaSink for DummySink {
    fn load(&mut self, src: &str, mime_type: &str) -> Result<()> {
        self.loaded = Some((src.to_string(), mime_type.to_string()));
        self.playing = false;
        self.position = 0.0;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.playing = false;
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.position = seconds;
        Ok(())
    }

    fn set_rate(&mut self, rate: f64) -> Result<()> {
        self.rate = rate;
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn current_position(&self) -> f64 {
        self.position
    }

    fn subscribe(&mut self) {
        self.subscribed = true;
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }
}
