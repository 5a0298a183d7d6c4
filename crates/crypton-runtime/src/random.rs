//! Random number generation for synthetic telemetry
//!
//! Simulated content only has to be reproducible in shape. Production runs use
//! entropy-seeded randomness; tests and `--seed` runs use a seeded source so a
//! session replays identically.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Abstraction for random number generation
pub trait RandomSource: Send {
    /// Uniform value in `[0.0, 1.0)`
    fn gen_f64(&mut self) -> f64;

    /// Uniform value in `[start, end)`
    fn gen_range_u32(&mut self, start: u32, end: u32) -> u32;

    /// Uniform value in `[start, end)`
    fn gen_range_u64(&mut self, start: u64, end: u64) -> u64;

    /// Uniform value in `[start, end)`
    fn gen_range_f64(&mut self, start: f64, end: f64) -> f64;

    /// Random dotted-quad IPv4 address
    fn gen_ipv4(&mut self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.gen_range_u32(0, 256),
            self.gen_range_u32(0, 256),
            self.gen_range_u32(0, 256),
            self.gen_range_u32(0, 256)
        )
    }
}

/// Random source shared between the interpreter's scheduled stages
pub type SharedRandom = Arc<Mutex<Box<dyn RandomSource>>>;

/// Seeded source when `seed` is given, entropy-seeded otherwise
pub fn shared_random(seed: Option<u64>) -> SharedRandom {
    let source: Box<dyn RandomSource> = match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(SystemRandom::new()),
    };
    Arc::new(Mutex::new(source))
}

/// Run `f` with exclusive access to a shared source
pub fn with_random<R>(random: &SharedRandom, f: impl FnOnce(&mut dyn RandomSource) -> R) -> R {
    let mut guard = random.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut **guard)
}

/// System randomness using entropy-seeded RNG (Send-safe)
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn gen_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    fn gen_range_u32(&mut self, start: u32, end: u32) -> u32 {
        self.rng.gen_range(start..end)
    }

    fn gen_range_u64(&mut self, start: u64, end: u64) -> u64 {
        self.rng.gen_range(start..end)
    }

    fn gen_range_f64(&mut self, start: f64, end: f64) -> f64 {
        self.rng.gen_range(start..end)
    }
}

/// Deterministic randomness using seeded RNG
pub struct SeededRandom {
    rng: StdRng,
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn gen_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    fn gen_range_u32(&mut self, start: u32, end: u32) -> u32 {
        self.rng.gen_range(start..end)
    }

    fn gen_range_u64(&mut self, start: u64, end: u64) -> u64 {
        self.rng.gen_range(start..end)
    }

    fn gen_range_f64(&mut self, start: f64, end: f64) -> f64 {
        self.rng.gen_range(start..end)
    }
}
