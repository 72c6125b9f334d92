//! The RNG collaborator seam: the core consumes `next_u32()` and does not
//! seed itself. `SeededRng` is the production implementation; `ScriptedRng`
//! (test-only) replays a fixed sequence so deterministic scenarios can be
//! reproduced exactly.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub trait TickRng {
    fn next_u32(&mut self) -> u32;
}

/// Production RNG: a seeded `StdRng`. The driver seeds it from the wall
/// clock; tests seed it with a fixed value for reproducibility.
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    pub fn from_seed(seed: u64) -> SeededRng {
        SeededRng {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeds from the wall clock, for runs that don't need to be
    /// reproduced exactly.
    pub fn from_wall_clock() -> SeededRng {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        SeededRng::from_seed(seed)
    }
}

impl TickRng for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }
}

/// Test-only scripted RNG: replays a fixed sequence of draws, repeating
/// the last value once exhausted (a tick never has fewer draws available
/// than it asks for).
#[cfg(test)]
pub struct ScriptedRng {
    script: Vec<u32>,
    pos: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub fn new(script: Vec<u32>) -> ScriptedRng {
        ScriptedRng { script, pos: 0 }
    }
}

#[cfg(test)]
impl TickRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let value = self
            .script
            .get(self.pos)
            .copied()
            .unwrap_or_else(|| *self.script.last().unwrap_or(&0));
        self.pos += 1;
        value
    }
}
