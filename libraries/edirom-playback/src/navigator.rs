//! Playlist index arithmetic
//!
//! Pure functions over a playlist length: stepping with wraparound and
//! uniform random picks for shuffle.

use crate::error::{PlayerError, Result};
use rand::Rng;

/// Step `delta` tracks from `current`, wrapping in both directions
///
/// Uses true modulo so any delta lands in `[0, length)`:
/// `step(0, -1, 5) == 4`, `step(4, 1, 5) == 0`, `step(1, -7, 5) == 4`.
pub fn step(current: usize, delta: i64, length: usize) -> Result<usize> {
    if length == 0 {
        return Err(PlayerError::EmptyPlaylist);
    }
    let length = length as i64;
    let current = (current as i64).rem_euclid(length);
    Ok((current + delta.rem_euclid(length)).rem_euclid(length) as usize)
}

/// Uniformly distributed index in `[0, length)`
pub fn random_index<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Result<usize> {
    if length == 0 {
        return Err(PlayerError::EmptyPlaylist);
    }
    Ok(rng.gen_range(0..length))
}
