//! Edirom Audio Player - Playback Control
//!
//! Declarative controller for a single audio stream, driven by string
//! attributes on a host element.
//!
//! This crate provides:
//! - One `apply` funnel for every state change (tracks, track, state, start,
//!   end, playbackrate, playbackmode, displaymode, height, width)
//! - Playback windows: stop at a configured end time
//! - Playback modes on window end (off, repeat, repeatOne, shuffle)
//! - Wraparound playlist navigation
//! - Bidirectional attribute sync with echo suppression
//!
//! # Architecture
//!
//! `edirom-playback` renders nothing and decodes nothing:
//! - audio is played by a [`MediaSink`] implementation
//! - drawing is done by a [`PresentationSurface`] implementation
//! - the host pushes [`MediaEvent`]s from the sink back in
//!
//! With the `wasm` feature, a browser binding drives an `HTMLAudioElement`.
//!
//! # Example
//!
//! ```rust
//! use edirom_playback::{
//!     MediaSink, NullSurface, PlaybackMode, PlayerStateMachine, PlaybackStatus,
//!     Playlist, PropertyChange, Result, Track,
//! };
//!
//! #[derive(Default)]
//! struct Silent {
//!     position: f64,
//! }
//!
//! impl MediaSink for Silent {
//!     fn load(&mut self, _src: &str, _mime_type: &str) -> Result<()> {
//!         self.position = 0.0;
//!         Ok(())
//!     }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) -> Result<()> { Ok(()) }
//!     fn seek(&mut self, seconds: f64) -> Result<()> {
//!         self.position = seconds;
//!         Ok(())
//!     }
//!     fn set_rate(&mut self, _rate: f64) -> Result<()> { Ok(()) }
//!     fn duration(&self) -> Option<f64> { Some(120.0) }
//!     fn current_position(&self) -> f64 { self.position }
//! }
//!
//! let mut player = PlayerStateMachine::new(Silent::default(), NullSurface);
//! let playlist = Playlist::new(vec![
//!     Track::new("overture.mp3", "audio/mpeg"),
//!     Track::new("aria.mp3", "audio/mpeg"),
//! ]);
//!
//! player.apply(PropertyChange::Tracks(playlist))?;
//! player.apply(PropertyChange::Start(10.0))?;
//! player.apply(PropertyChange::PlaybackMode(PlaybackMode::Repeat))?;
//! player.apply(PropertyChange::Track(1))?;
//!
//! assert_eq!(player.state().playback_status, PlaybackStatus::Playing);
//! assert_eq!(player.position(), 10.0);
//! # Ok::<(), edirom_playback::PlayerError>(())
//! ```

mod bridge;
mod collaborators;
mod config;
mod error;
mod events;
mod machine;
pub mod mode;
pub mod navigator;
pub mod types;
pub mod window;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use bridge::{AttributeSyncBridge, HostEvent};
pub use collaborators::{MediaEvent, MediaSink, NullSurface, PresentationSurface};
pub use config::PlayerConfig;
pub use error::{Diagnostic, PlayerError, Result};
pub use events::{PlayerEvent, Property, PropertyChange};
pub use machine::PlayerStateMachine;
pub use mode::ModeAction;
pub use types::{
    DisplayMode, PlaybackMode, PlaybackStatus, PlayerState, Playlist, Track, KNOWN_DISPLAY_MODES,
};
pub use window::PlaybackWindow;
