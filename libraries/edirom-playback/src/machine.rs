//! Player state machine - the controller core
//!
//! Owns the [`PlayerState`] and the current [`Playlist`]. Every change, from
//! the host or cascaded internally, goes through [`PlayerStateMachine::apply`].
//!
//! # Cascades
//!
//! Exactly one change triggers further changes:
//!
//! ```text
//! Track(i) -> Start(window_start) -> State(Playing)
//! ```
//!
//! `Start` and `State` trigger nothing, so the cascade depth is at most one
//! level below the change that started it. Reaching the playback window end
//! adds the mode policy on top (`State(Paused)` followed by `Track`, or by
//! `Start` + `State`), which is again bounded.
//!
//! Each change mutates state and drives the sink, then emits its
//! notification, then runs its follow-ups. State is consistent before any
//! follow-up starts, and a `Track` selection notifies as `track`, `start`,
//! `state` in that order.

use crate::collaborators::{MediaEvent, MediaSink, NullSurface, PresentationSurface};
use crate::error::{Diagnostic, PlayerError, Result};
use crate::events::{PlayerEvent, Property, PropertyChange};
use crate::mode::{self, ModeAction};
use crate::navigator;
use crate::types::{PlaybackStatus, PlayerState, Playlist, Track};
use crate::window::PlaybackWindow;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Deepest nesting of `apply` calls below a host-initiated one
///
/// Only `Track` cascades, one level deep; anything past this is rejected.
const MAX_CASCADE_DEPTH: usize = 2;

/// Follow-up changes produced by a single change
type Cascade = Vec<PropertyChange>;

/// Reactive playback controller
///
/// Single-threaded: hosts feed it property changes and media events from
/// one event queue, each handled to completion before the next.
pub struct PlayerStateMachine<S: MediaSink, P: PresentationSurface = NullSurface> {
    state: PlayerState,
    playlist: Playlist,

    sink: S,
    surface: P,

    // Shuffle source
    rng: StdRng,

    // Duration reported by the sink for the loaded track
    duration: Option<f64>,

    // Nesting level of the running `apply`
    depth: usize,

    pending_events: Vec<PlayerEvent>,
    diagnostics: Vec<Diagnostic>,
}

impl<S: MediaSink, P: PresentationSurface> PlayerStateMachine<S, P> {
    /// Create a controller with default state, subscribed to `sink`
    pub fn new(sink: S, surface: P) -> Self {
        Self::with_rng(sink, surface, StdRng::from_entropy())
    }

    /// Create a controller whose shuffle picks are reproducible
    pub fn with_seed(sink: S, surface: P, seed: u64) -> Self {
        Self::with_rng(sink, surface, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut sink: S, surface: P, rng: StdRng) -> Self {
        sink.subscribe();
        Self {
            state: PlayerState::default(),
            playlist: Playlist::default(),
            sink,
            surface,
            rng,
            duration: None,
            depth: 0,
            pending_events: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    // ===== The funnel =====

    /// Apply one property change
    ///
    /// On success the change (and any cascade it triggers) has been applied
    /// and a `PropertyChanged` event queued for each of them. On failure the
    /// change itself is not applied, no event is queued for it, and a
    /// diagnostic is recorded. Earlier steps of a failed cascade stay
    /// applied; a `Track` whose `play()` is refused ends paused and says so.
    pub fn apply(&mut self, change: PropertyChange) -> Result<()> {
        let property = change.property();
        debug!(%property, depth = self.depth, "apply {:?}", change);
        if self.depth > MAX_CASCADE_DEPTH {
            let err = PlayerError::CascadeTooDeep(self.depth);
            self.report(Some(property), &err, true);
            return Err(err);
        }

        let was_playing = self.state.is_playing();
        let cascade = match self.apply_change(&change) {
            Ok(cascade) => cascade,
            Err(err) => {
                self.report(Some(property), &err, true);
                return Err(err);
            }
        };

        self.announce(change);

        self.depth += 1;
        let result = cascade
            .into_iter()
            .try_for_each(|follow_up| self.apply(follow_up));
        self.depth -= 1;

        // Loading paused the sink; the host last saw `play`.
        if result.is_err() && was_playing && !self.state.is_playing() {
            self.announce(PropertyChange::State(self.state.playback_status));
        }
        result
    }

    fn announce(&mut self, change: PropertyChange) {
        self.surface.notify(&change);
        self.pending_events.push(PlayerEvent::PropertyChanged(change));
    }

    /// Mutate state and drive the sink for one change; returns its cascade
    fn apply_change(&mut self, change: &PropertyChange) -> Result<Cascade> {
        match change {
            PropertyChange::Tracks(playlist) => {
                self.playlist = playlist.clone();
                self.state.current_track_index = clamp_index(
                    self.state.current_track_index,
                    self.playlist.len(),
                );
                self.surface.render(&self.state, &self.playlist);
                Ok(Vec::new())
            }

            PropertyChange::Track(index) => {
                let track = self.playlist.track_at(*index)?;
                self.sink.load(&track.src, &track.mime_type)?;
                self.state.current_track_index = *index;
                self.state.playback_status = PlaybackStatus::Paused;
                self.duration = None;
                Ok(vec![
                    PropertyChange::Start(self.state.window_start),
                    PropertyChange::State(PlaybackStatus::Playing),
                ])
            }

            PropertyChange::State(status) => {
                match status {
                    PlaybackStatus::Playing => self.sink.play()?,
                    PlaybackStatus::Paused => self.sink.pause()?,
                }
                self.state.playback_status = *status;
                Ok(Vec::new())
            }

            PropertyChange::Start(seconds) => {
                let seconds = *seconds;
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(PlayerError::InvalidWindow {
                        start: seconds,
                        end: self.state.window_end,
                    });
                }
                self.sink.seek(seconds)?;
                self.state.window_start = seconds;
                self.check_window(Property::Start);
                Ok(Vec::new())
            }

            PropertyChange::End(end) => {
                if let Some(seconds) = end {
                    if !seconds.is_finite() || *seconds < 0.0 {
                        return Err(PlayerError::InvalidWindow {
                            start: self.state.window_start,
                            end: *end,
                        });
                    }
                }
                self.state.window_end = *end;
                self.check_window(Property::End);
                Ok(Vec::new())
            }

            PropertyChange::PlaybackRate(rate) => {
                if !rate.is_finite() || *rate <= 0.0 {
                    return Err(PlayerError::InvalidRate(*rate));
                }
                self.sink.set_rate(*rate)?;
                self.state.playback_rate = *rate;
                Ok(Vec::new())
            }

            PropertyChange::PlaybackMode(mode) => {
                self.state.playback_mode = *mode;
                Ok(Vec::new())
            }

            PropertyChange::DisplayMode(mode) => {
                if !mode.is_known() {
                    warn!(display_mode = %mode, "Unknown display mode, forwarding as-is");
                }
                self.state.display_mode = mode.clone();
                Ok(Vec::new())
            }

            PropertyChange::Height(value) => {
                self.state.height = value.clone();
                Ok(Vec::new())
            }

            PropertyChange::Width(value) => {
                self.state.width = value.clone();
                Ok(Vec::new())
            }
        }
    }

    /// Record an inverted window; it stays stored but is not enforced
    fn check_window(&mut self, property: Property) {
        if let Some(end) = self.state.window_end {
            if end < self.state.window_start {
                let err = PlayerError::InvalidWindow {
                    start: self.state.window_start,
                    end: Some(end),
                };
                self.report(Some(property), &err, false);
            }
        }
    }

    // ===== Media events =====

    /// Handle an event raised by the media sink
    pub fn handle_media_event(&mut self, event: MediaEvent) -> Result<()> {
        match event {
            MediaEvent::PositionUpdate(position) => {
                let duration = self.duration();
                self.surface.time_update(position, duration);
                self.pending_events
                    .push(PlayerEvent::TimeUpdate { position, duration });

                let window = PlaybackWindow::from_state(&self.state);
                if window.is_reached(position, duration, self.state.playback_status) {
                    self.on_window_reached()?;
                }
                Ok(())
            }

            MediaEvent::DurationKnown(duration) => {
                if !duration.is_finite() || duration <= 0.0 {
                    return Ok(());
                }
                self.duration = Some(duration);
                self.surface
                    .time_update(self.sink.current_position(), Some(duration));
                self.pending_events
                    .push(PlayerEvent::DurationChanged { duration });
                Ok(())
            }

            MediaEvent::Ended => {
                if self.state.is_playing() {
                    self.on_window_reached()?;
                }
                Ok(())
            }
        }
    }

    /// Pause at the boundary, then follow the playback mode
    fn on_window_reached(&mut self) -> Result<()> {
        info!(
            track = self.state.current_track_index,
            mode = %self.state.playback_mode,
            "Playback window reached"
        );
        self.apply(PropertyChange::State(PlaybackStatus::Paused))?;

        let action = match mode::resolve(
            self.state.playback_mode,
            &mut self.rng,
            self.playlist.len(),
            self.state.current_track_index,
        ) {
            Ok(action) => action,
            Err(err) => {
                self.report(Some(Property::PlaybackMode), &err, true);
                ModeAction::Stop
            }
        };
        debug!(?action, "Resolved playback mode action");

        match action {
            ModeAction::Stop => Ok(()),
            ModeAction::AdvanceTo(index) => self.apply(PropertyChange::Track(index)),
            ModeAction::RestartCurrent => {
                self.apply(PropertyChange::Start(self.state.window_start))?;
                self.apply(PropertyChange::State(PlaybackStatus::Playing))
            }
        }
    }

    // ===== Transport =====

    /// Move `delta` tracks (0 replays, -1 previous, +1 next), wrapping around
    pub fn step(&mut self, delta: i64) -> Result<()> {
        match navigator::step(self.state.current_track_index, delta, self.playlist.len()) {
            Ok(index) => self.apply(PropertyChange::Track(index)),
            Err(err) => {
                self.report(Some(Property::Track), &err, true);
                Err(err)
            }
        }
    }

    /// Select a track from the list
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.apply(PropertyChange::Track(index))
    }

    /// Play if paused, pause if playing
    pub fn toggle_playback(&mut self) -> Result<()> {
        self.apply(PropertyChange::State(self.state.playback_status.toggled()))
    }

    /// Seek to `percent` (0-100) of the media duration
    ///
    /// Does nothing while the duration is unknown. Does not touch the window.
    pub fn seek_to_percent(&mut self, percent: f64) -> Result<()> {
        let Some(duration) = self.duration() else {
            return Ok(());
        };
        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        self.sink.seek(percent / 100.0 * duration)
    }

    // ===== Queries =====

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Current value of `property`, as the change that would set it
    pub fn snapshot(&self, property: Property) -> PropertyChange {
        let state = &self.state;
        match property {
            Property::Tracks => PropertyChange::Tracks(self.playlist.clone()),
            Property::Track => PropertyChange::Track(state.current_track_index),
            Property::State => PropertyChange::State(state.playback_status),
            Property::Start => PropertyChange::Start(state.window_start),
            Property::End => PropertyChange::End(state.window_end),
            Property::PlaybackRate => PropertyChange::PlaybackRate(state.playback_rate),
            Property::PlaybackMode => PropertyChange::PlaybackMode(state.playback_mode),
            Property::DisplayMode => PropertyChange::DisplayMode(state.display_mode.clone()),
            Property::Height => PropertyChange::Height(state.height.clone()),
            Property::Width => PropertyChange::Width(state.width.clone()),
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.state.current_track_index)
    }

    /// Media duration, from the last `DurationKnown` or the sink itself
    pub fn duration(&self) -> Option<f64> {
        self.duration.or_else(|| self.sink.duration())
    }

    pub fn position(&self) -> f64 {
        self.sink.current_position()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    // ===== Events =====

    /// Take all queued host events, oldest first
    ///
    /// Events accumulate until drained, one per applied change and one per
    /// position tick. Hosts must drain after every call into the controller.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    /// Take all recorded diagnostics, oldest first
    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Log a condition and record it for the host
    pub(crate) fn report(&mut self, property: Option<Property>, err: &PlayerError, rejected: bool) {
        warn!(property = ?property, rejected, "{}", err);
        self.diagnostics.push(Diagnostic {
            property,
            message: err.to_string(),
            rejected,
        });
    }
}

impl<S: MediaSink, P: PresentationSurface> Drop for PlayerStateMachine<S, P> {
    fn drop(&mut self) {
        self.sink.unsubscribe();
    }
}

/// Keep `index` valid for a playlist of `length` tracks
fn clamp_index(index: usize, length: usize) -> usize {
    if length == 0 {
        0
    } else {
        index.min(length - 1)
    }
}
