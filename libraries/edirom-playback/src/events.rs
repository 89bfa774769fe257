//! Property changes and outgoing events
//!
//! The controller accepts exactly one kind of input, a [`PropertyChange`],
//! and reports back to the host through [`PlayerEvent`]s:
//! - one `PropertyChanged` per applied change (cascaded ones included)
//! - `TimeUpdate` on every position tick
//! - `DurationChanged` when the sink learns the media duration

use crate::error::PlayerError;
use crate::types::{DisplayMode, PlaybackMode, PlaybackStatus, Playlist};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Closed set of configurable properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Tracks,
    Track,
    State,
    Start,
    End,
    PlaybackRate,
    PlaybackMode,
    DisplayMode,
    Height,
    Width,
}

impl Property {
    /// Attributes observed on the host element
    pub const ALL: [Property; 10] = [
        Property::Track,
        Property::Tracks,
        Property::Height,
        Property::Width,
        Property::State,
        Property::Start,
        Property::End,
        Property::PlaybackRate,
        Property::PlaybackMode,
        Property::DisplayMode,
    ];

    /// Attribute name
    pub fn as_str(self) -> &'static str {
        match self {
            Property::Tracks => "tracks",
            Property::Track => "track",
            Property::State => "state",
            Property::Start => "start",
            Property::End => "end",
            Property::PlaybackRate => "playbackrate",
            Property::PlaybackMode => "playbackmode",
            Property::DisplayMode => "displaymode",
            Property::Height => "height",
            Property::Width => "width",
        }
    }
}

impl FromStr for Property {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PlayerError::InvalidProperty(s.to_string()))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed `(property, value)` pair
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    /// Replace the playlist
    Tracks(Playlist),

    /// Select a track (loads it, seeks to window start, plays)
    Track(usize),

    State(PlaybackStatus),

    /// Window start in seconds; seeks immediately
    Start(f64),

    /// Window end in seconds, `None` to play to the natural end
    End(Option<f64>),

    PlaybackRate(f64),
    PlaybackMode(PlaybackMode),
    DisplayMode(DisplayMode),
    Height(String),
    Width(String),
}

impl PropertyChange {
    pub fn property(&self) -> Property {
        match self {
            PropertyChange::Tracks(_) => Property::Tracks,
            PropertyChange::Track(_) => Property::Track,
            PropertyChange::State(_) => Property::State,
            PropertyChange::Start(_) => Property::Start,
            PropertyChange::End(_) => Property::End,
            PropertyChange::PlaybackRate(_) => Property::PlaybackRate,
            PropertyChange::PlaybackMode(_) => Property::PlaybackMode,
            PropertyChange::DisplayMode(_) => Property::DisplayMode,
            PropertyChange::Height(_) => Property::Height,
            PropertyChange::Width(_) => Property::Width,
        }
    }

    /// Value as it is written back to the host attribute
    pub fn attribute_value(&self) -> String {
        match self {
            PropertyChange::Tracks(playlist) => playlist.to_json(),
            PropertyChange::Track(index) => index.to_string(),
            PropertyChange::State(status) => status.as_str().to_string(),
            PropertyChange::Start(seconds) | PropertyChange::PlaybackRate(seconds) => {
                seconds.to_string()
            }
            PropertyChange::End(end) => end.map(|s| s.to_string()).unwrap_or_default(),
            PropertyChange::PlaybackMode(mode) => mode.as_str().to_string(),
            PropertyChange::DisplayMode(mode) => mode.as_str().to_string(),
            PropertyChange::Height(value) | PropertyChange::Width(value) => value.clone(),
        }
    }

    /// Value as JSON, for event details
    pub fn json_value(&self) -> Value {
        match self {
            PropertyChange::Tracks(playlist) => {
                serde_json::to_value(playlist).unwrap_or(Value::Null)
            }
            PropertyChange::Track(index) => json!(index),
            PropertyChange::State(status) => json!(status.as_str()),
            PropertyChange::Start(seconds) | PropertyChange::PlaybackRate(seconds) => {
                json!(seconds)
            }
            PropertyChange::End(end) => json!(end),
            PropertyChange::PlaybackMode(mode) => json!(mode.as_str()),
            PropertyChange::DisplayMode(mode) => json!(mode.as_str()),
            PropertyChange::Height(value) | PropertyChange::Width(value) => json!(value),
        }
    }
}

/// Events emitted to the host
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A change went through `apply`
    PropertyChanged(PropertyChange),

    /// Position tick from the sink
    TimeUpdate {
        position: f64,
        duration: Option<f64>,
    },

    /// Media duration became known
    DurationChanged { duration: f64 },
}

impl PlayerEvent {
    /// Host event name, e.g. `communicate-track-update`
    pub fn name(&self) -> String {
        match self {
            PlayerEvent::PropertyChanged(change) => {
                format!("communicate-{}-update", change.property())
            }
            PlayerEvent::TimeUpdate { .. } => "communicate-time-update".to_string(),
            PlayerEvent::DurationChanged { .. } => "communicate-duration-update".to_string(),
        }
    }

    /// Host event detail, e.g. `{"track": 2}`
    pub fn detail(&self) -> Value {
        match self {
            PlayerEvent::PropertyChanged(change) => {
                let mut detail = serde_json::Map::new();
                detail.insert(change.property().to_string(), change.json_value());
                Value::Object(detail)
            }
            PlayerEvent::TimeUpdate { position, .. } => json!({ "time": position }),
            PlayerEvent::DurationChanged { duration } => json!({ "duration": duration }),
        }
    }

    /// The property change carried by this event, if any
    pub fn as_change(&self) -> Option<&PropertyChange> {
        match self {
            PlayerEvent::PropertyChanged(change) => Some(change),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_names_round_trip() {
        for property in Property::ALL {
            assert_eq!(property.as_str().parse::<Property>().unwrap(), property);
        }
        assert!(matches!(
            "volume".parse::<Property>(),
            Err(PlayerError::InvalidProperty(name)) if name == "volume"
        ));
    }

    #[test]
    fn attribute_values_match_host_spelling() {
        assert_eq!(
            PropertyChange::State(PlaybackStatus::Playing).attribute_value(),
            "play"
        );
        assert_eq!(PropertyChange::Start(10.0).attribute_value(), "10");
        assert_eq!(PropertyChange::Start(1.5).attribute_value(), "1.5");
        assert_eq!(PropertyChange::End(None).attribute_value(), "");
        assert_eq!(
            PropertyChange::PlaybackMode(PlaybackMode::RepeatOne).attribute_value(),
            "repeatOne"
        );
    }

    #[test]
    fn event_names_and_details() {
        let event = PlayerEvent::PropertyChanged(PropertyChange::Track(2));
        assert_eq!(event.name(), "communicate-track-update");
        assert_eq!(event.detail(), json!({ "track": 2 }));

        let event = PlayerEvent::PropertyChanged(PropertyChange::End(None));
        assert_eq!(event.detail(), json!({ "end": null }));

        let tick = PlayerEvent::TimeUpdate {
            position: 3.5,
            duration: Some(10.0),
        };
        assert_eq!(tick.name(), "communicate-time-update");
        assert_eq!(tick.detail(), json!({ "time": 3.5 }));
        assert!(tick.as_change().is_none());
    }
}
