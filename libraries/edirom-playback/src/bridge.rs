//! Attribute synchronization
//!
//! Translates between the host's string attributes and typed
//! [`PropertyChange`]s, in both directions:
//! - inbound: `attribute_changed(name, value)` parses and applies
//! - outbound: `take_host_events()` turns controller events into named host
//!   events and tells the host which attribute values to reflect
//!
//! Reflecting a value makes most hosts call back with that same value. The
//! bridge queues what it asked the host to reflect, per attribute, and
//! swallows exactly one matching echo per reflection, in order, so the round
//! trip never re-applies.

use crate::collaborators::{MediaEvent, MediaSink, NullSurface, PresentationSurface};
use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use crate::events::{PlayerEvent, Property, PropertyChange};
use crate::machine::PlayerStateMachine;
use crate::types::{DisplayMode, PlaybackMode, Playlist};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

/// Event to dispatch on the host element
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    /// e.g. `communicate-state-update`
    pub name: String,

    /// e.g. `{"state": "play"}`
    pub detail: Value,

    /// Attribute to write back, when attribute reflection is on
    pub reflect: Option<(Property, String)>,
}

/// Host-facing adapter around a [`PlayerStateMachine`]
pub struct AttributeSyncBridge<S: MediaSink, P: PresentationSurface = NullSurface> {
    machine: PlayerStateMachine<S, P>,
    reflect_attributes: bool,
    pending_echoes: HashMap<Property, VecDeque<String>>,
}

impl<S: MediaSink, P: PresentationSurface> AttributeSyncBridge<S, P> {
    pub fn new(machine: PlayerStateMachine<S, P>) -> Self {
        Self {
            machine,
            reflect_attributes: true,
            pending_echoes: HashMap::new(),
        }
    }

    /// Build a bridge with a fresh controller and replay `config` into it
    ///
    /// Bad attributes are recorded as diagnostics; startup continues.
    pub fn from_config(sink: S, surface: P, config: &PlayerConfig) -> Self {
        let machine = match config.shuffle_seed {
            Some(seed) => PlayerStateMachine::with_seed(sink, surface, seed),
            None => PlayerStateMachine::new(sink, surface),
        };
        let mut bridge = Self::new(machine);
        for (property, value) in config.to_attributes() {
            if let Err(err) = bridge.apply_attribute(property, value.as_deref()) {
                debug!(%property, "Startup attribute skipped: {}", err);
            }
        }
        bridge
    }

    /// Turn attribute reflection (and echo suppression) on or off
    ///
    /// Hosts that do not write attributes back must turn it off, otherwise
    /// their next identical write would be taken for an echo.
    pub fn set_reflect_attributes(&mut self, reflect: bool) {
        self.reflect_attributes = reflect;
        if !reflect {
            self.pending_echoes.clear();
        }
    }

    // ===== Inbound =====

    /// Host attribute `name` changed to `value` (`None` = removed)
    pub fn attribute_changed(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let property = match name.parse::<Property>() {
            Ok(property) => property,
            Err(err) => {
                self.machine.report(None, &err, true);
                return Err(err);
            }
        };

        if self.is_echo(property, value) {
            debug!(%property, "Ignoring reflected attribute");
            return Ok(());
        }
        self.apply_attribute(property, value)
    }

    fn is_echo(&mut self, property: Property, value: Option<&str>) -> bool {
        let Some(expected) = self.pending_echoes.get_mut(&property) else {
            return false;
        };
        if expected.front().map(String::as_str) == Some(value.unwrap_or("")) {
            expected.pop_front();
            true
        } else {
            // The host moved on; queued reflections will not come back.
            expected.clear();
            false
        }
    }

    fn apply_attribute(&mut self, property: Property, value: Option<&str>) -> Result<()> {
        let change = match self.parse(property, value) {
            Ok(change) => change,
            Err(err) => {
                self.machine.report(Some(property), &err, true);
                return Err(err);
            }
        };
        self.machine.apply(change)
    }

    /// Parse an attribute value into a typed change
    ///
    /// An unknown playback mode is not rejected: it is reported and `off` is
    /// used instead.
    fn parse(&mut self, property: Property, value: Option<&str>) -> Result<PropertyChange> {
        let raw = value.map(str::trim).unwrap_or("");
        let invalid = || PlayerError::InvalidValue {
            property: property.to_string(),
            value: raw.to_string(),
        };

        let change = match property {
            Property::Tracks => PropertyChange::Tracks(if raw.is_empty() {
                Playlist::default()
            } else {
                Playlist::from_json(raw)?
            }),
            Property::Track => PropertyChange::Track(raw.parse().map_err(|_| invalid())?),
            Property::State => PropertyChange::State(raw.parse()?),
            Property::Start => PropertyChange::Start(parse_or(raw, 0.0).ok_or_else(invalid)?),
            Property::End => PropertyChange::End(if raw.is_empty() {
                None
            } else {
                Some(raw.parse().map_err(|_| invalid())?)
            }),
            Property::PlaybackRate => {
                PropertyChange::PlaybackRate(parse_or(raw, 1.0).ok_or_else(invalid)?)
            }
            Property::PlaybackMode => match raw.parse::<PlaybackMode>() {
                Ok(mode) => PropertyChange::PlaybackMode(mode),
                Err(err) => {
                    warn!("{}, falling back to off", err);
                    self.machine.report(Some(property), &err, false);
                    PropertyChange::PlaybackMode(PlaybackMode::Off)
                }
            },
            Property::DisplayMode => PropertyChange::DisplayMode(if raw.is_empty() {
                DisplayMode::default()
            } else {
                DisplayMode::new(raw)
            }),
            Property::Height => PropertyChange::Height(dimension(raw)),
            Property::Width => PropertyChange::Width(dimension(raw)),
        };
        Ok(change)
    }

    // ===== Outbound =====

    /// Current attribute value of `property`
    pub fn attribute(&self, property: Property) -> String {
        self.machine.snapshot(property).attribute_value()
    }

    /// Drain controller events as host events, oldest first
    ///
    /// Each attribute reflected in this burst replaces whatever was still
    /// queued for it, so echo queues never outgrow one burst.
    pub fn take_host_events(&mut self) -> Vec<HostEvent> {
        let mut burst: HashMap<Property, VecDeque<String>> = HashMap::new();
        let events = self
            .machine
            .drain_events()
            .into_iter()
            .map(|event| {
                let reflect = match (&event, self.reflect_attributes) {
                    (PlayerEvent::PropertyChanged(change), true) => {
                        let property = change.property();
                        let value = change.attribute_value();
                        burst.entry(property).or_default().push_back(value.clone());
                        Some((property, value))
                    }
                    _ => None,
                };
                HostEvent {
                    name: event.name(),
                    detail: event.detail(),
                    reflect,
                }
            })
            .collect();
        self.pending_echoes.extend(burst);
        events
    }

    // ===== Pass-through =====

    /// Forward a media sink event to the controller
    pub fn media_event(&mut self, event: MediaEvent) -> Result<()> {
        self.machine.handle_media_event(event)
    }

    pub fn machine(&self) -> &PlayerStateMachine<S, P> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut PlayerStateMachine<S, P> {
        &mut self.machine
    }
}

fn parse_or(raw: &str, empty: f64) -> Option<f64> {
    if raw.is_empty() {
        Some(empty)
    } else {
        raw.parse().ok()
    }
}

fn dimension(raw: &str) -> String {
    if raw.is_empty() {
        "100%".to_string()
    } else {
        raw.to_string()
    }
}
