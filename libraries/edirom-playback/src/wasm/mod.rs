//! WASM bindings for edirom-playback
//!
//! Lets a custom element drive the controller from JavaScript, with an
//! `HTMLAudioElement` as the media sink.

#[cfg(feature = "wasm")]
pub mod sink;

#[cfg(feature = "wasm")]
pub mod player;

#[cfg(feature = "wasm")]
pub use player::WasmAudioPlayer;

#[cfg(feature = "wasm")]
pub use sink::{AudioElementSink, JsSurface};
