//! Randomness seam for simulation runs.
//!
//! All randomness a run consumes — crash multipliers and the unit
//! draws behind failure/delay rolls — flows through one explicitly
//! passed [`RoundSource`]. There is no global generator: a seeded
//! source reproduces a run exactly, and tests can substitute a
//! scripted stream for the literal scenarios.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sim::multiplier::{self, DEFAULT_MULTIPLIER_CAP};

/// Per-round randomness required by the engines and condition layer.
pub trait RoundSource {
    /// Draw the crash multiplier for the current round.
    fn draw_multiplier(&mut self) -> f64;

    /// Draw a uniform value in [0, 1) for condition rolls.
    fn draw_unit(&mut self) -> f64;
}

/// Production source backed by a seedable RNG.
pub struct RngSource<R: Rng> {
    rng: R,
    cap: f64,
}

impl RngSource<StdRng> {
    /// OS-entropy source for ordinary (non-reproducible) runs.
    pub fn from_entropy() -> Self {
        RngSource::new(StdRng::from_entropy())
    }

    /// Fully reproducible source for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        RngSource::new(StdRng::seed_from_u64(seed))
    }

    /// Source for one simulation run: seeded when the caller asked for
    /// reproducibility, entropy-backed otherwise.
    pub fn for_run(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => RngSource::from_seed(seed),
            None => RngSource::from_entropy(),
        }
    }
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource {
            rng,
            cap: DEFAULT_MULTIPLIER_CAP,
        }
    }

    /// Override the multiplier ceiling (configurable in `config.toml`).
    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = cap;
        self
    }
}

impl<R: Rng> RoundSource for RngSource<R> {
    fn draw_multiplier(&mut self) -> f64 {
        multiplier::sample_multiplier(&mut self.rng, self.cap)
    }

    fn draw_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

// ---------------------------------------------------------------------------
// Scripted source (test double)
// ---------------------------------------------------------------------------

/// Replays a fixed multiplier stream, with optionally scripted unit
/// draws for condition-layer paths.
///
/// Unit draws past the scripted list return 1.0, which reads as
/// "no failure, maximum delay" — engine tests that only care about
/// multipliers never trip a simulated outage by accident.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    multipliers: Vec<f64>,
    units: Vec<f64>,
    next_multiplier: usize,
    next_unit: usize,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(multipliers: &[f64]) -> Self {
        ScriptedSource {
            multipliers: multipliers.to_vec(),
            units: Vec::new(),
            next_multiplier: 0,
            next_unit: 0,
        }
    }

    pub(crate) fn with_units(mut self, units: &[f64]) -> Self {
        self.units = units.to_vec();
        self
    }
}

#[cfg(test)]
impl RoundSource for ScriptedSource {
    fn draw_multiplier(&mut self) -> f64 {
        let m = self.multipliers[self.next_multiplier];
        self.next_multiplier += 1;
        m
    }

    fn draw_unit(&mut self) -> f64 {
        let u = self.units.get(self.next_unit).copied().unwrap_or(1.0);
        self.next_unit += 1;
        u
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
