//! Deterministic random number generation and recorded outcomes.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Context streams**: Independent sequences for dice and card draws
//! - **Serializable**: O(1) state capture and restore
//! - **Recordable**: Every outcome the authoritative side produces can be
//!   captured and replayed by a peer without re-rolling
//!
//! ## Usage
//!
//! ```
//! use digging_game::core::{GameRng, Randomness, RecordedRandomness, RecordingRandomness};
//!
//! let mut rng = GameRng::new(42);
//! let mut outcomes = Vec::new();
//! let roll = RecordingRandomness::new(&mut rng, &mut outcomes).roll_die(6).unwrap();
//!
//! // A peer applying the same record sees the same roll.
//! let mut replay = RecordedRandomness::new(outcomes);
//! assert_eq!(replay.roll_die(6).unwrap(), roll);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use crate::error::GameError;

/// Source of every random outcome the rules need.
///
/// The authoritative side implements this with a seeded RNG. Peers
/// implement it with the outcomes recorded by the authoritative side.
pub trait Randomness {
    /// Roll a die with `sides` faces, returning a value in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> Result<u32, GameError>;

    /// Pick an index in `0..len` (used for random card draws).
    fn pick(&mut self, len: usize) -> Result<usize, GameError>;
}

/// Deterministic RNG.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// Separates randomness domains (board setup, card draws, dice).
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self::new(context_seed)
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl Randomness for GameRng {
    fn roll_die(&mut self, sides: u32) -> Result<u32, GameError> {
        Ok(self.inner.gen_range(1..=sides.max(1)))
    }

    fn pick(&mut self, len: usize) -> Result<usize, GameError> {
        Ok(self.inner.gen_range(0..len.max(1)))
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Wraps another source and appends every outcome it produces to a log.
#[derive(Debug)]
pub struct RecordingRandomness<'a, R: Randomness + ?Sized> {
    inner: &'a mut R,
    outcomes: &'a mut Vec<u32>,
}

impl<'a, R: Randomness + ?Sized> RecordingRandomness<'a, R> {
    /// Record outcomes of `inner` into `outcomes`.
    pub fn new(inner: &'a mut R, outcomes: &'a mut Vec<u32>) -> Self {
        Self { inner, outcomes }
    }
}

impl<R: Randomness + ?Sized> Randomness for RecordingRandomness<'_, R> {
    fn roll_die(&mut self, sides: u32) -> Result<u32, GameError> {
        let value = self.inner.roll_die(sides)?;
        self.outcomes.push(value);
        Ok(value)
    }

    fn pick(&mut self, len: usize) -> Result<usize, GameError> {
        let value = self.inner.pick(len)?;
        self.outcomes.push(u32::try_from(value).map_err(|_| GameError::ReplayDesync)?);
        Ok(value)
    }
}

/// Replays outcomes produced elsewhere, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordedRandomness {
    outcomes: VecDeque<u32>,
}

impl RecordedRandomness {
    /// Create a replay source from recorded outcomes.
    pub fn new(outcomes: impl IntoIterator<Item = u32>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    /// Number of outcomes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }

    fn next(&mut self) -> Result<u32, GameError> {
        self.outcomes.pop_front().ok_or(GameError::ReplayDesync)
    }
}

impl Randomness for RecordedRandomness {
    fn roll_die(&mut self, sides: u32) -> Result<u32, GameError> {
        let value = self.next()?;
        if value == 0 || value > sides.max(1) {
            return Err(GameError::ReplayDesync);
        }
        Ok(value)
    }

    fn pick(&mut self, len: usize) -> Result<usize, GameError> {
        let value = self.next()? as usize;
        if value >= len.max(1) {
            return Err(GameError::ReplayDesync);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.roll_die(6).unwrap(), rng2.roll_die(6).unwrap());
        }
    }

    #[test]
    fn test_roll_die_range() {
        let mut rng = GameRng::new(7);
        for _ in 0..200 {
            let roll = rng.roll_die(6).unwrap();
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn test_context_produces_different_sequence() {
        let rng = GameRng::new(42);
        let mut ctx1 = rng.for_context("deck");
        let mut ctx2 = rng.for_context("dice");

        let seq1: Vec<_> = (0..10).map(|_| ctx1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| ctx2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        rng.shuffle(&mut data);

        data.sort_unstable();
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_state_serialization() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.pick(50).unwrap();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.pick(1000).unwrap()).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.pick(1000).unwrap()).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_recording_then_replay() {
        let mut rng = GameRng::new(3);
        let mut outcomes = Vec::new();
        let (roll, pick) = {
            let mut recording = RecordingRandomness::new(&mut rng, &mut outcomes);
            (recording.roll_die(6).unwrap(), recording.pick(9).unwrap())
        };

        let mut replay = RecordedRandomness::new(outcomes);
        assert_eq!(replay.roll_die(6).unwrap(), roll);
        assert_eq!(replay.pick(9).unwrap(), pick);
        assert_eq!(replay.remaining(), 0);
    }

    #[test]
    fn test_replay_runs_dry() {
        let mut replay = RecordedRandomness::default();
        assert_eq!(replay.roll_die(6), Err(GameError::ReplayDesync));
    }

    #[test]
    fn test_replay_rejects_out_of_range() {
        let mut replay = RecordedRandomness::new([9]);
        assert_eq!(replay.pick(3), Err(GameError::ReplayDesync));
    }
}
