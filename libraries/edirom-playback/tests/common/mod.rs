//! Shared test helpers: recording sink and surface, playlist builders

use edirom_playback::{
    MediaSink, PlayerError, PlayerEvent, PlayerState, PlayerStateMachine, Playlist,
    PresentationSurface, Property, PropertyChange, Result, Track,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

static INIT: Once = Once::new();

/// Route controller logs to the test output (once per binary)
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// ===== Mock sink =====

/// Command received by the mock sink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Subscribe,
    Load(String),
    Play,
    Pause,
    Seek(f64),
    SetRate(f64),
    Unsubscribe,
}

/// Sink that records every command in a log shared with the test
pub struct MockSink {
    log: Rc<RefCell<Vec<SinkCall>>>,
    pub position: f64,
    pub duration: Option<f64>,
    pub playing: bool,
    pub refuse_play: bool,
}

impl MockSink {
    pub fn new() -> (Self, Rc<RefCell<Vec<SinkCall>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Self {
            log: Rc::clone(&log),
            position: 0.0,
            duration: Some(180.0),
            playing: false,
            refuse_play: false,
        };
        (sink, log)
    }

    fn record(&self, call: SinkCall) {
        self.log.borrow_mut().push(call);
    }
}

impl MediaSink for MockSink {
    fn load(&mut self, src: &str, _mime_type: &str) -> Result<()> {
        self.record(SinkCall::Load(src.to_string()));
        // Loading resets the stream, like a media element does
        self.playing = false;
        self.position = 0.0;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.refuse_play {
            return Err(PlayerError::MediaSink("play() not allowed".to_string()));
        }
        self.record(SinkCall::Play);
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.record(SinkCall::Pause);
        self.playing = false;
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.record(SinkCall::Seek(seconds));
        self.position = seconds;
        Ok(())
    }

    fn set_rate(&mut self, rate: f64) -> Result<()> {
        self.record(SinkCall::SetRate(rate));
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn current_position(&self) -> f64 {
        self.position
    }

    fn subscribe(&mut self) {
        self.record(SinkCall::Subscribe);
    }

    fn unsubscribe(&mut self) {
        self.record(SinkCall::Unsubscribe);
    }
}

// ===== Recording surface =====

/// Surface that remembers what it was told to draw
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub notified: Vec<(Property, String)>,
    pub renders: usize,
    pub ticks: Vec<(f64, Option<f64>)>,
}

impl PresentationSurface for RecordingSurface {
    fn notify(&mut self, change: &PropertyChange) {
        self.notified
            .push((change.property(), change.attribute_value()));
    }

    fn render(&mut self, _state: &PlayerState, _playlist: &Playlist) {
        self.renders += 1;
    }

    fn time_update(&mut self, position: f64, duration: Option<f64>) {
        self.ticks.push((position, duration));
    }
}

// ===== Builders =====

pub type TestPlayer = PlayerStateMachine<MockSink, RecordingSurface>;

/// Playlist of `count` tracks named `track-0.mp3`, `track-1.mp3`, ...
pub fn playlist(count: usize) -> Playlist {
    (0..count)
        .map(|i| Track::new(format!("track-{}.mp3", i), "audio/mpeg"))
        .collect::<Vec<_>>()
        .into()
}

/// Seeded player with `count` tracks loaded and all startup output drained
pub fn player_with_tracks(count: usize) -> (TestPlayer, Rc<RefCell<Vec<SinkCall>>>) {
    init_tracing();
    let (sink, log) = MockSink::new();
    let mut player = PlayerStateMachine::with_seed(sink, RecordingSurface::default(), 7);
    player
        .apply(PropertyChange::Tracks(playlist(count)))
        .expect("tracks");
    player.drain_events();
    player.surface_mut().notified.clear();
    log.borrow_mut().clear();
    (player, log)
}

/// Property changes among `events`, as `(property, attribute value)`
pub fn changes(events: &[PlayerEvent]) -> Vec<(Property, String)> {
    events
        .iter()
        .filter_map(PlayerEvent::as_change)
        .map(|change| (change.property(), change.attribute_value()))
        .collect()
}

/// Shorthand for building expected `changes()` output
pub fn change(property: Property, value: &str) -> (Property, String) {
    (property, value.to_string())
}
