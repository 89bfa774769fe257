//! Error types for the playback controller
//!
//! Every condition here is recoverable: the offending change is rejected (or
//! replaced by a safe default) and the controller stays usable.

use crate::events::Property;
use thiserror::Error;

/// Controller errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Index-based operation on a playlist with no tracks
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Track index outside `[0, length)`
    #[error("Track index {index} out of range for playlist of length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    /// Playback state other than play/pause
    #[error("Invalid playback state: '{0}'")]
    InvalidState(String),

    /// Unknown playback mode (behaves as `off`)
    #[error("Invalid playback mode: '{0}'")]
    InvalidMode(String),

    /// Window bounds that are negative, non-finite, or end before start
    #[error("Invalid playback window: start {start}, end {end:?}")]
    InvalidWindow { start: f64, end: Option<f64> },

    /// Playback rate that is not a positive finite number
    #[error("Invalid playback rate: {0}")]
    InvalidRate(f64),

    /// Attribute name outside the known property set
    #[error("Invalid property: '{0}'")]
    InvalidProperty(String),

    /// Attribute value that cannot be parsed for its property
    #[error("Invalid value for '{property}': '{value}'")]
    InvalidValue { property: String, value: String },

    /// Playlist JSON could not be decoded
    #[error("Invalid tracks: {0}")]
    Tracks(#[from] serde_json::Error),

    /// Cascade nested deeper than any change can trigger
    #[error("Cascade too deep: depth {0}")]
    CascadeTooDeep(usize),

    /// Media sink rejected a command
    #[error("Media sink error: {0}")]
    MediaSink(String),
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, PlayerError>;

/// A condition reported to the host's diagnostic channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Property whose change raised the condition, if any
    pub property: Option<Property>,

    /// Rendered error message
    pub message: String,

    /// Whether the change was rejected (`false` when a safe default was used)
    pub rejected: bool,
}
