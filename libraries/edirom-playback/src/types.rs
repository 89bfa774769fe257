//! Core types for the playback controller

use crate::error::PlayerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Track descriptor
///
/// Field layout matches the playlist JSON exchanged with the host:
/// `{ "src", "type", "title", "composer", "work" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Media URI handed to the sink
    pub src: String,

    /// MIME type of `src`
    #[serde(rename = "type", alias = "mimeType", default)]
    pub mime_type: String,

    /// Track title
    #[serde(default)]
    pub title: String,

    /// Composer name
    #[serde(default)]
    pub composer: String,

    /// Work the track belongs to
    #[serde(default)]
    pub work: String,
}

impl Track {
    /// Create a track with only source and MIME type set
    pub fn new(src: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mime_type: mime_type.into(),
            title: String::new(),
            composer: String::new(),
            work: String::new(),
        }
    }
}

/// Ordered, immutable list of tracks
///
/// Insertion order is playback order. A playlist is never edited in place;
/// the controller swaps in a whole new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Parse the host's JSON representation
    pub fn from_json(json: &str) -> Result<Self, PlayerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize back to the host's JSON representation
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.tracks).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Dereference `index`, rejecting empty playlists and out-of-range indices
    pub fn track_at(&self, index: usize) -> Result<&Track, PlayerError> {
        if self.tracks.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        self.tracks.get(index).ok_or(PlayerError::IndexOutOfRange {
            index,
            length: self.tracks.len(),
        })
    }
}

impl From<Vec<Track>> for Playlist {
    fn from(tracks: Vec<Track>) -> Self {
        Self::new(tracks)
    }
}

/// Playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// Sink is playing
    Playing,

    /// Sink is paused
    #[default]
    Paused,
}

impl PlaybackStatus {
    /// Attribute spelling (`play` / `pause`)
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackStatus::Playing => "play",
            PlaybackStatus::Paused => "pause",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PlaybackStatus::Playing => PlaybackStatus::Paused,
            PlaybackStatus::Paused => PlaybackStatus::Playing,
        }
    }
}

impl FromStr for PlaybackStatus {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "play" | "playing" => Ok(PlaybackStatus::Playing),
            "pause" | "paused" => Ok(PlaybackStatus::Paused),
            other => Err(PlayerError::InvalidState(other.to_string())),
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens when the playback window is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Stay paused at the window boundary
    #[default]
    #[serde(rename = "off")]
    Off,

    /// Advance to the next track, wrapping at the end
    #[serde(rename = "repeat")]
    Repeat,

    /// Replay the current track from the window start
    #[serde(rename = "repeatOne")]
    RepeatOne,

    /// Jump to a random track
    #[serde(rename = "shuffle")]
    Shuffle,
}

impl PlaybackMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackMode::Off => "off",
            PlaybackMode::Repeat => "repeat",
            PlaybackMode::RepeatOne => "repeatOne",
            PlaybackMode::Shuffle => "shuffle",
        }
    }
}

impl FromStr for PlaybackMode {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "off" => Ok(PlaybackMode::Off),
            "repeat" => Ok(PlaybackMode::Repeat),
            "repeatOne" => Ok(PlaybackMode::RepeatOne),
            "shuffle" => Ok(PlaybackMode::Shuffle),
            other => Err(PlayerError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display modes the stock presentation surface understands
pub const KNOWN_DISPLAY_MODES: [&str; 7] = [
    "hidden",
    "controls-sm",
    "controls-md",
    "controls-lg",
    "tracks-sm",
    "tracks-md",
    "tracks-lg",
];

/// Opaque view token forwarded to the presentation surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayMode(String);

impl DisplayMode {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        KNOWN_DISPLAY_MODES.contains(&self.0.as_str())
    }
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self::new("controls-lg")
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The controller's single mutable aggregate
///
/// Only `PlayerStateMachine::apply` writes to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerState {
    pub current_track_index: usize,
    pub playback_status: PlaybackStatus,

    /// Window start in seconds
    pub window_start: f64,

    /// Window end in seconds (`None` plays to the natural end)
    pub window_end: Option<f64>,

    pub playback_rate: f64,
    pub playback_mode: PlaybackMode,
    pub display_mode: DisplayMode,

    /// CSS height of the player box
    pub height: String,

    /// CSS width of the player box
    pub width: String,
}

impl PlayerState {
    /// Window end that is actually enforced
    ///
    /// An end before the start is treated as unset.
    pub fn effective_window_end(&self) -> Option<f64> {
        self.window_end.filter(|end| *end >= self.window_start)
    }

    pub fn is_playing(&self) -> bool {
        self.playback_status == PlaybackStatus::Playing
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_track_index: 0,
            playback_status: PlaybackStatus::Paused,
            window_start: 0.0,
            window_end: None,
            playback_rate: 1.0,
            playback_mode: PlaybackMode::Off,
            display_mode: DisplayMode::default(),
            height: "100%".to_string(),
            width: "100%".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_parses_host_json() {
        let json = r#"[
            {"src": "a.mp3", "type": "audio/mpeg", "title": "Ouverture", "composer": "Weber", "work": "Freischütz"},
            {"src": "b.ogg", "mimeType": "audio/ogg"}
        ]"#;
        let playlist = Playlist::from_json(json).unwrap();

        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.tracks()[0].mime_type, "audio/mpeg");
        assert_eq!(playlist.tracks()[0].composer, "Weber");
        assert_eq!(playlist.tracks()[1].mime_type, "audio/ogg");
        assert_eq!(playlist.tracks()[1].title, "");
    }

    #[test]
    fn playlist_json_uses_type_key() {
        let playlist = Playlist::new(vec![Track::new("a.mp3", "audio/mpeg")]);
        let json = playlist.to_json();
        assert!(json.contains(r#""type":"audio/mpeg""#));
        assert_eq!(Playlist::from_json(&json).unwrap(), playlist);
    }

    #[test]
    fn track_at_rejects_empty_and_out_of_range() {
        let empty = Playlist::default();
        assert!(matches!(empty.track_at(0), Err(PlayerError::EmptyPlaylist)));

        let playlist = Playlist::new(vec![Track::new("a.mp3", "audio/mpeg")]);
        assert!(playlist.track_at(0).is_ok());
        assert!(matches!(
            playlist.track_at(1),
            Err(PlayerError::IndexOutOfRange {
                index: 1,
                length: 1
            })
        ));
    }

    #[test]
    fn status_accepts_both_spellings() {
        assert_eq!("play".parse::<PlaybackStatus>().unwrap(), PlaybackStatus::Playing);
        assert_eq!("paused".parse::<PlaybackStatus>().unwrap(), PlaybackStatus::Paused);
        assert!(matches!(
            "stop".parse::<PlaybackStatus>(),
            Err(PlayerError::InvalidState(_))
        ));
        assert_eq!(PlaybackStatus::Playing.to_string(), "play");
    }

    #[test]
    fn mode_names_are_case_sensitive() {
        assert_eq!("repeatOne".parse::<PlaybackMode>().unwrap(), PlaybackMode::RepeatOne);
        assert!(matches!(
            "all".parse::<PlaybackMode>(),
            Err(PlayerError::InvalidMode(_))
        ));
        assert!("repeatone".parse::<PlaybackMode>().is_err());
    }

    #[test]
    fn inverted_window_is_unset() {
        let mut state = PlayerState {
            window_start: 10.0,
            window_end: Some(20.0),
            ..Default::default()
        };
        assert_eq!(state.effective_window_end(), Some(20.0));

        state.window_end = Some(5.0);
        assert_eq!(state.effective_window_end(), None);
    }

    #[test]
    fn display_mode_known_tokens() {
        assert!(DisplayMode::default().is_known());
        assert!(DisplayMode::new("tracks-sm").is_known());
        assert!(!DisplayMode::new("fullscreen").is_known());
    }
}
