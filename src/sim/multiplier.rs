//! Crash multiplier model.
//!
//! Each round the game "crashes" at some multiplier; bets cashed out at
//! or below that point win, the rest lose. The crash point is an
//! inverse-transform sample from a shifted Pareto-like distribution:
//!
//!   m = max(1.01, 1 / (1 - r)),   r uniform in [0, 1)
//!
//! with the heaviest ~1% of the tail (r ≥ 0.99) collapsed to the exact
//! sentinel 1.0, a near-immediate crash. The shape favors low
//! multipliers, which is what gives the house its edge.

use rand::Rng;

/// Lowest non-sentinel multiplier the model can produce.
pub const MULTIPLIER_FLOOR: f64 = 1.01;

/// Default ceiling bounding extreme draws.
pub const DEFAULT_MULTIPLIER_CAP: f64 = 1000.0;

/// Sentinel returned for the near-immediate-crash branch. Deliberately
/// below the floor so it is distinguishable from every sampled value.
pub const INSTANT_CRASH: f64 = 1.0;

/// Unit-draw cutoff above which the sentinel is returned (~1% of draws).
const INSTANT_CRASH_CUTOFF: f64 = 0.99;

/// Map a uniform draw `r` in [0, 1) to a crash multiplier.
///
/// Pure so the branch behavior is directly testable; randomness enters
/// only through the caller's choice of `r`.
pub fn crash_point(r: f64, cap: f64) -> f64 {
    if r >= INSTANT_CRASH_CUTOFF {
        return INSTANT_CRASH;
    }
    let denominator = 1.0 - r;
    if denominator <= 0.0 {
        // Unreachable behind the cutoff branch, but a zero denominator
        // must never panic or produce infinity.
        return MULTIPLIER_FLOOR;
    }
    (1.0 / denominator).max(MULTIPLIER_FLOOR).min(cap)
}

/// Draw one crash multiplier from the model.
pub fn sample_multiplier(rng: &mut impl Rng, cap: f64) -> f64 {
    crash_point(rng.gen::<f64>(), cap)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
