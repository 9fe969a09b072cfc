//! Random number generator abstraction for determinism.
//!
//! Authoring places freshly added scenes at a jittered spot around the
//! default map centre. In production the jitter comes from the thread RNG;
//! tests inject a seeded or scripted implementation.

use rand::Rng;

/// Abstraction over random number generation.
pub trait DeterministicRng: Send {
    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Generate a value in `[-spread / 2, spread / 2)`.
    fn next_centered(&mut self, spread: f64) -> f64 {
        (self.next_f64() - 0.5) * spread
    }
}

/// Production RNG backed by the thread-local generator from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRng;

impl DeterministicRng for ThreadRng {
    fn next_f64(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_rng_stays_in_unit_interval() {
        let mut rng = ThreadRng;

        for _ in 0..256 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_next_centered_stays_within_half_spread() {
        let mut rng = ThreadRng;

        for _ in 0..256 {
            let value = rng.next_centered(0.1);
            assert!((-0.05..0.05).contains(&value));
        }
    }
}
