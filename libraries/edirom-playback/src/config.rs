//! Initial player configuration
//!
//! Mirrors the attributes a host element is created with. Loadable from a
//! JSON document or from raw `(attribute, value)` pairs.

use crate::error::{PlayerError, Result};
use crate::events::Property;
use crate::types::Playlist;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub tracks: Playlist,

    /// Track selected on startup (ignored for an empty playlist)
    #[serde(default)]
    pub track: usize,

    #[serde(default = "default_state")]
    pub state: String,

    #[serde(default)]
    pub start: f64,

    #[serde(default)]
    pub end: Option<f64>,

    #[serde(default = "default_playbackrate")]
    pub playbackrate: f64,

    #[serde(default = "default_playbackmode")]
    pub playbackmode: String,

    #[serde(default = "default_displaymode")]
    pub displaymode: String,

    #[serde(default = "default_dimension")]
    pub height: String,

    #[serde(default = "default_dimension")]
    pub width: String,

    /// Seed for reproducible shuffle picks
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

fn default_state() -> String {
    "pause".to_string()
}

fn default_playbackrate() -> f64 {
    1.0
}

// Not a known mode; behaves as `off` until the host sets a real one.
fn default_playbackmode() -> String {
    "all".to_string()
}

fn default_displaymode() -> String {
    "controls-lg".to_string()
}

fn default_dimension() -> String {
    "100%".to_string()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tracks: Playlist::default(),
            track: 0,
            state: default_state(),
            start: 0.0,
            end: None,
            playbackrate: default_playbackrate(),
            playbackmode: default_playbackmode(),
            displaymode: default_displaymode(),
            height: default_dimension(),
            width: default_dimension(),
            shuffle_seed: None,
        }
    }
}

impl PlayerConfig {
    /// Load from a JSON document; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from host attributes
    ///
    /// Unknown attribute names and unparsable values are errors.
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (name, value) in attributes {
            let property: Property = name.parse()?;
            let invalid = || PlayerError::InvalidValue {
                property: name.to_string(),
                value: value.to_string(),
            };
            match property {
                Property::Tracks => config.tracks = Playlist::from_json(value)?,
                Property::Track => config.track = value.trim().parse().map_err(|_| invalid())?,
                Property::State => config.state = value.to_string(),
                Property::Start => config.start = value.trim().parse().map_err(|_| invalid())?,
                Property::End => {
                    config.end = match value.trim() {
                        "" => None,
                        v => Some(v.parse().map_err(|_| invalid())?),
                    }
                }
                Property::PlaybackRate => {
                    config.playbackrate = value.trim().parse().map_err(|_| invalid())?;
                }
                Property::PlaybackMode => config.playbackmode = value.to_string(),
                Property::DisplayMode => config.displaymode = value.to_string(),
                Property::Height => config.height = value.to_string(),
                Property::Width => config.width = value.to_string(),
            }
        }
        Ok(config)
    }

    /// Attributes in the order they must be applied
    ///
    /// The playlist comes first so that `track` has something to index;
    /// `state` comes last so it decides whether startup ends playing.
    pub fn to_attributes(&self) -> Vec<(Property, Option<String>)> {
        let mut attributes = vec![
            (Property::Tracks, Some(self.tracks.to_json())),
            (Property::PlaybackRate, Some(self.playbackrate.to_string())),
            (Property::PlaybackMode, Some(self.playbackmode.clone())),
            (Property::DisplayMode, Some(self.displaymode.clone())),
            (Property::Height, Some(self.height.clone())),
            (Property::Width, Some(self.width.clone())),
            (Property::End, self.end.map(|end| end.to_string())),
            (Property::Start, Some(self.start.to_string())),
        ];
        if !self.tracks.is_empty() {
            attributes.push((Property::Track, Some(self.track.to_string())));
        }
        attributes.push((Property::State, Some(self.state.clone())));
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_host_element() {
        let config = PlayerConfig::default();
        assert_eq!(config.state, "pause");
        assert_eq!(config.playbackrate, 1.0);
        assert_eq!(config.playbackmode, "all");
        assert_eq!(config.displaymode, "controls-lg");
        assert_eq!(config.height, "100%");
        assert!(config.end.is_none());
    }

    #[test]
    fn json_fills_missing_keys() {
        let config = PlayerConfig::from_json(
            r#"{"tracks": [{"src": "a.mp3", "type": "audio/mpeg"}], "start": 10, "end": 20, "playbackmode": "repeat"}"#,
        )
        .unwrap();
        assert_eq!(config.tracks.len(), 1);
        assert_eq!(config.start, 10.0);
        assert_eq!(config.end, Some(20.0));
        assert_eq!(config.playbackmode, "repeat");
        assert_eq!(config.state, "pause");
    }

    #[test]
    fn attributes_parse() {
        let config = PlayerConfig::from_attributes([
            ("tracks", r#"[{"src": "a.mp3", "type": "audio/mpeg"}]"#),
            ("track", "0"),
            ("end", ""),
            ("start", "4.5"),
            ("playbackrate", "2"),
        ])
        .unwrap();
        assert_eq!(config.start, 4.5);
        assert_eq!(config.end, None);
        assert_eq!(config.playbackrate, 2.0);
    }

    #[test]
    fn attributes_reject_unknown_and_garbage() {
        assert!(matches!(
            PlayerConfig::from_attributes([("volume", "3")]),
            Err(PlayerError::InvalidProperty(_))
        ));
        assert!(matches!(
            PlayerConfig::from_attributes([("start", "soon")]),
            Err(PlayerError::InvalidValue { .. })
        ));
    }

    #[test]
    fn attribute_order_puts_tracks_first_and_state_last() {
        let mut config = PlayerConfig::default();
        assert!(config
            .to_attributes()
            .iter()
            .all(|(p, _)| *p != Property::Track));

        config.tracks = Playlist::from_json(r#"[{"src": "a.mp3"}]"#).unwrap();
        let attributes = config.to_attributes();
        assert_eq!(attributes.first().map(|a| a.0), Some(Property::Tracks));
        assert_eq!(attributes.last().map(|a| a.0), Some(Property::State));
        let track_pos = attributes.iter().position(|a| a.0 == Property::Track);
        let start_pos = attributes.iter().position(|a| a.0 == Property::Start);
        assert!(start_pos < track_pos);
    }
}
