//! Browser collaborators: audio element sink and callback surface

use crate::{MediaSink, PlayerError, PlayerState, Playlist, PresentationSurface, PropertyChange, Result};
use js_sys::Function;
use wasm_bindgen::JsValue;
use web_sys::HtmlAudioElement;

/// Media sink backed by an `HTMLAudioElement`
pub struct AudioElementSink {
    element: HtmlAudioElement,
}

impl AudioElementSink {
    pub fn new(element: HtmlAudioElement) -> Self {
        Self { element }
    }

    /// Create a detached audio element
    pub fn create() -> Result<Self> {
        HtmlAudioElement::new().map(Self::new).map_err(js_error)
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }
}

fn js_error(err: JsValue) -> PlayerError {
    PlayerError::MediaSink(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

impl MediaSink for AudioElementSink {
    fn load(&mut self, src: &str, mime_type: &str) -> Result<()> {
        if !mime_type.is_empty() && self.element.can_play_type(mime_type).is_empty() {
            return Err(PlayerError::MediaSink(format!(
                "Unsupported media type '{}'",
                mime_type
            )));
        }
        self.element.set_src(src);
        self.element.load();
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        // The returned promise rejects asynchronously (autoplay policy);
        // the browser reports that on its own.
        self.element.play().map(|_| ()).map_err(js_error)
    }

    fn pause(&mut self) -> Result<()> {
        self.element.pause().map_err(js_error)
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.element.set_current_time(seconds);
        Ok(())
    }

    fn set_rate(&mut self, rate: f64) -> Result<()> {
        self.element.set_playback_rate(rate);
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        (duration.is_finite() && duration > 0.0).then_some(duration)
    }

    fn current_position(&self) -> f64 {
        self.element.current_time()
    }
}

/// Presentation surface that forwards to JavaScript callbacks
///
/// Callbacks must not call back into the player synchronously.
#[derive(Default)]
pub struct JsSurface {
    pub(crate) on_change: Option<Function>,
    pub(crate) on_render: Option<Function>,
    pub(crate) on_time: Option<Function>,
}

impl PresentationSurface for JsSurface {
    fn notify(&mut self, change: &PropertyChange) {
        if let Some(ref cb) = self.on_change {
            cb.call2(
                &JsValue::NULL,
                &JsValue::from_str(change.property().as_str()),
                &JsValue::from_str(&change.attribute_value()),
            )
            .ok();
        }
    }

    fn render(&mut self, state: &PlayerState, playlist: &Playlist) {
        if let Some(ref cb) = self.on_render {
            cb.call2(
                &JsValue::NULL,
                &JsValue::from_str(&playlist.to_json()),
                &JsValue::from_f64(state.current_track_index as f64),
            )
            .ok();
        }
    }

    fn time_update(&mut self, position: f64, duration: Option<f64>) {
        if let Some(ref cb) = self.on_time {
            let duration = duration.map_or(JsValue::NULL, JsValue::from_f64);
            cb.call2(&JsValue::NULL, &JsValue::from_f64(position), &duration)
                .ok();
        }
    }
}
