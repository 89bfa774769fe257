//! WASM-compatible audio player wrapper

use super::sink::{AudioElementSink, JsSurface};
use crate::{AttributeSyncBridge, HostEvent, MediaEvent, PlayerConfig, PlayerError, Property};
use js_sys::{Array, Function};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Host event as handed to JavaScript
#[derive(Serialize)]
struct WasmHostEvent {
    name: String,
    detail: serde_json::Value,
    attribute: Option<&'static str>,
    value: Option<String>,
}

impl From<HostEvent> for WasmHostEvent {
    fn from(event: HostEvent) -> Self {
        let (attribute, value) = match event.reflect {
            Some((property, value)) => (Some(property.as_str()), Some(value)),
            None => (None, None),
        };
        Self {
            name: event.name,
            detail: event.detail,
            attribute,
            value,
        }
    }
}

/// WASM-compatible audio player
///
/// Methods that change state return the host events they produced as an
/// array of `{ name, detail, attribute, value }` objects. The caller
/// dispatches them (and writes `attribute = value` back) after the call
/// returns, so reflection never re-enters the player.
#[wasm_bindgen]
pub struct WasmAudioPlayer {
    inner: AttributeSyncBridge<AudioElementSink, JsSurface>,
    on_error: Option<Function>,
}

#[wasm_bindgen]
impl WasmAudioPlayer {
    /// Create a player from an optional config object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmAudioPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };
        let sink = AudioElementSink::create().map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            inner: AttributeSyncBridge::from_config(sink, JsSurface::default(), &config),
            on_error: None,
        })
    }

    /// Attribute names the custom element should observe
    #[wasm_bindgen(js_name = observedAttributes)]
    pub fn observed_attributes() -> Array {
        Property::ALL
            .iter()
            .map(|p| JsValue::from_str(p.as_str()))
            .collect()
    }

    // ===== Attributes =====

    /// Forward `attributeChangedCallback`
    #[wasm_bindgen(js_name = attributeChanged)]
    pub fn attribute_changed(&mut self, name: &str, value: Option<String>) -> Array {
        let result = self.inner.attribute_changed(name, value.as_deref());
        self.finish(result)
    }

    /// Current value of an attribute
    #[wasm_bindgen(js_name = getAttribute)]
    pub fn get_attribute(&self, name: &str) -> Result<String, JsValue> {
        let property: Property = name
            .parse()
            .map_err(|e: PlayerError| JsValue::from_str(&e.to_string()))?;
        Ok(self.inner.attribute(property))
    }

    /// Enable or disable attribute reflection
    #[wasm_bindgen(js_name = setReflectAttributes)]
    pub fn set_reflect_attributes(&mut self, reflect: bool) {
        self.inner.set_reflect_attributes(reflect);
    }

    // ===== Transport =====

    /// Skip forward
    pub fn next(&mut self) -> Array {
        let result = self.inner.machine_mut().step(1);
        self.finish(result)
    }

    /// Skip back
    pub fn previous(&mut self) -> Array {
        let result = self.inner.machine_mut().step(-1);
        self.finish(result)
    }

    /// Restart the current track from the window start
    pub fn replay(&mut self) -> Array {
        let result = self.inner.machine_mut().step(0);
        self.finish(result)
    }

    /// Move any number of tracks
    pub fn step(&mut self, delta: i32) -> Array {
        let result = self.inner.machine_mut().step(i64::from(delta));
        self.finish(result)
    }

    /// Select a track from the list
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&mut self, index: usize) -> Array {
        let result = self.inner.machine_mut().select(index);
        self.finish(result)
    }

    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&mut self) -> Array {
        let result = self.inner.machine_mut().toggle_playback();
        self.finish(result)
    }

    /// Seek from the progress slider (0-100)
    #[wasm_bindgen(js_name = seekToPercent)]
    pub fn seek_to_percent(&mut self, percent: f64) -> Array {
        let result = self.inner.machine_mut().seek_to_percent(percent);
        self.finish(result)
    }

    // ===== Media element events =====

    /// Forward the element's `timeupdate`
    #[wasm_bindgen(js_name = timeUpdate)]
    pub fn time_update(&mut self) -> Array {
        let position = self.inner.machine().position();
        let result = self.inner.media_event(MediaEvent::PositionUpdate(position));
        self.finish(result)
    }

    /// Forward the element's `durationchange`
    #[wasm_bindgen(js_name = durationChange)]
    pub fn duration_change(&mut self) -> Array {
        let duration = self.inner.machine().sink().element().duration();
        let result = self.inner.media_event(MediaEvent::DurationKnown(duration));
        self.finish(result)
    }

    /// Forward the element's `ended`
    pub fn ended(&mut self) -> Array {
        let result = self.inner.media_event(MediaEvent::Ended);
        self.finish(result)
    }

    // ===== Callbacks =====

    /// `(property, value)` after every applied change
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) {
        self.inner.machine_mut().surface_mut().on_change = Some(callback);
    }

    /// `(tracksJson, currentIndex)` when the playlist is replaced
    #[wasm_bindgen(js_name = onRender)]
    pub fn on_render(&mut self, callback: Function) {
        self.inner.machine_mut().surface_mut().on_render = Some(callback);
    }

    /// `(position, duration)` on every tick
    #[wasm_bindgen(js_name = onTime)]
    pub fn on_time(&mut self, callback: Function) {
        self.inner.machine_mut().surface_mut().on_time = Some(callback);
    }

    /// `(message)` for every diagnostic
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&mut self, callback: Function) {
        self.on_error = Some(callback);
    }

    // ===== Internal =====

    /// Report diagnostics and hand back the produced host events
    fn finish(&mut self, result: crate::Result<()>) -> Array {
        if let Err(e) = result {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        for diagnostic in self.inner.machine_mut().drain_diagnostics() {
            if let Some(ref cb) = self.on_error {
                cb.call1(&JsValue::NULL, &JsValue::from_str(&diagnostic.message))
                    .ok();
            }
        }

        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        self.inner
            .take_host_events()
            .into_iter()
            .filter_map(|event| WasmHostEvent::from(event).serialize(&serializer).ok())
            .collect()
    }
}
