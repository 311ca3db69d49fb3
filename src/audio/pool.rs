//! Rotating clip pool that never repeats the last clip.

use bevy::prelude::*;
use rand::Rng;

/// Index-based pool of `len` clips with the most recently played one
/// remembered.
///
/// Draws are uniform over every clip except the last one played. Before
/// anything has played, clip 0 counts as the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatingPool {
    len: usize,
    last: usize,
}

impl RotatingPool {
    pub fn new(len: usize) -> Self {
        Self { len, last: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clip played most recently.
    pub fn most_recent(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.last)
    }

    /// Pick the next clip to play.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<usize> {
        match self.len {
            0 => None,
            1 => Some(0),
            len => {
                let pick = rng.gen_range(0..len - 1);
                let clip = if pick >= self.last { pick + 1 } else { pick };
                self.last = clip;
                Some(clip)
            }
        }
    }
}

/// Footstep clips an entity picks from.
#[derive(Component, Debug, Clone)]
pub struct FootstepPool(pub RotatingPool);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_repeats_back_to_back() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 2..6 {
            let mut pool = RotatingPool::new(len);
            let mut previous = pool.draw(&mut rng).unwrap();
            for _ in 0..500 {
                let next = pool.draw(&mut rng).unwrap();
                assert_ne!(next, previous, "pool of {len} repeated clip {next}");
                previous = next;
            }
        }
    }

    #[test]
    fn first_draw_skips_clip_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let mut pool = RotatingPool::new(3);
            assert_ne!(pool.draw(&mut rng), Some(0));
        }
    }

    #[test]
    fn every_other_clip_gets_played() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = RotatingPool::new(4);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[pool.draw(&mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn tiny_pools() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(RotatingPool::new(0).draw(&mut rng), None);
        assert_eq!(RotatingPool::new(1).draw(&mut rng), Some(0));
        assert_eq!(RotatingPool::new(3).most_recent(), Some(0));
    }
}
