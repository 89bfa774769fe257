//! Playback mode policy
//!
//! Maps the active playback mode to the action taken once the window end
//! has been reached and playback has been paused there.

use crate::error::Result;
use crate::navigator;
use crate::types::PlaybackMode;
use rand::Rng;

/// Follow-up action after the window end is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeAction {
    /// Remain paused at the boundary
    Stop,

    /// Select track `index` (load, seek to window start, play)
    AdvanceTo(usize),

    /// Seek the current track back to the window start and play
    RestartCurrent,
}

/// Decide the follow-up action for `mode`
///
/// Fails with `EmptyPlaylist` when the mode needs a track index but the
/// playlist has none.
pub fn resolve<R: Rng + ?Sized>(
    mode: PlaybackMode,
    rng: &mut R,
    playlist_length: usize,
    current_index: usize,
) -> Result<ModeAction> {
    match mode {
        PlaybackMode::Off => Ok(ModeAction::Stop),
        PlaybackMode::Repeat => {
            navigator::step(current_index, 1, playlist_length).map(ModeAction::AdvanceTo)
        }
        PlaybackMode::RepeatOne => Ok(ModeAction::RestartCurrent),
        PlaybackMode::Shuffle => {
            navigator::random_index(rng, playlist_length).map(ModeAction::AdvanceTo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn off_stops() {
        assert_eq!(
            resolve(PlaybackMode::Off, &mut rng(), 3, 1).unwrap(),
            ModeAction::Stop
        );
    }

    #[test]
    fn repeat_advances_and_wraps() {
        assert_eq!(
            resolve(PlaybackMode::Repeat, &mut rng(), 3, 1).unwrap(),
            ModeAction::AdvanceTo(2)
        );
        assert_eq!(
            resolve(PlaybackMode::Repeat, &mut rng(), 3, 2).unwrap(),
            ModeAction::AdvanceTo(0)
        );
    }

    #[test]
    fn repeat_one_restarts() {
        assert_eq!(
            resolve(PlaybackMode::RepeatOne, &mut rng(), 3, 2).unwrap(),
            ModeAction::RestartCurrent
        );
    }

    #[test]
    fn shuffle_picks_in_range() {
        let mut rng = rng();
        for _ in 0..50 {
            match resolve(PlaybackMode::Shuffle, &mut rng, 4, 0).unwrap() {
                ModeAction::AdvanceTo(index) => assert!(index < 4),
                other => panic!("unexpected action {other:?}"),
            }
        }
    }

    #[test]
    fn navigation_modes_need_tracks() {
        assert!(matches!(
            resolve(PlaybackMode::Repeat, &mut rng(), 0, 0),
            Err(PlayerError::EmptyPlaylist)
        ));
        assert!(matches!(
            resolve(PlaybackMode::Shuffle, &mut rng(), 0, 0),
            Err(PlayerError::EmptyPlaylist)
        ));
        assert_eq!(
            resolve(PlaybackMode::Off, &mut rng(), 0, 0).unwrap(),
            ModeAction::Stop
        );
    }
}
