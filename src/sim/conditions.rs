//! Condition perturbation layer.
//!
//! Optionally roughs up a run with the frictions a live game client
//! would see: betting limits clamping the stake, occasional network
//! failures that skip a round, and a simulated per-round delay. The
//! delay is bookkeeping only — simulations always run at full speed,
//! so the layer records the number without ever sleeping.

use crate::sim::source::RoundSource;
use crate::types::RealismOptions;

/// Probability a round's network interaction fails outright.
pub const FAILURE_PROBABILITY: f64 = 0.05;

/// Simulated round-trip delay bounds, seconds.
pub const MIN_DELAY_SECS: f64 = 0.05;
pub const MAX_DELAY_SECS: f64 = 0.5;

/// Outcome of the network portion of one round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundConditions {
    pub success: bool,
    /// Simulated delay in seconds; always 0.0 for failures.
    pub delay: f64,
}

impl RoundConditions {
    /// The untouched outcome: success, no delay.
    pub const CLEAR: RoundConditions = RoundConditions {
        success: true,
        delay: 0.0,
    };
}

/// Aggregate perturbation counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConditionStats {
    pub network_errors: u32,
    pub total_delay: f64,
    pub bet_limit_hits: u32,
}

/// Per-run perturbation policy, shared by every engine.
///
/// With realism disabled the layer is inert: every sample is
/// [`RoundConditions::CLEAR`] and the clamp passes bets through
/// untouched, so the engines run the same code path either way.
#[derive(Debug, Clone)]
pub struct ConditionLayer {
    options: RealismOptions,
}

impl ConditionLayer {
    pub fn new(options: RealismOptions) -> Self {
        ConditionLayer { options }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    /// Clamp an intended bet into the configured limits.
    ///
    /// Returns the stake to actually place and whether clamping changed
    /// the requested amount (a "limit hit"). Assumes min ≤ max; the
    /// adapter normalizes reversed bounds before a run starts.
    pub fn clamp_bet(&self, bet: f64) -> (f64, bool) {
        if !self.options.enabled {
            return (bet, false);
        }
        let stake = bet.max(self.options.min_bet).min(self.options.max_bet);
        (stake, stake != bet)
    }

    /// Sample the network conditions for one round.
    ///
    /// A failure consumes exactly one unit draw and takes no delay
    /// draw, so scripted unit streams line up round for round.
    pub fn sample(&self, source: &mut dyn RoundSource) -> RoundConditions {
        if !self.options.enabled {
            return RoundConditions::CLEAR;
        }
        if self.options.error_simulation_enabled && source.draw_unit() < FAILURE_PROBABILITY {
            return RoundConditions {
                success: false,
                delay: 0.0,
            };
        }
        let delay = if self.options.network_delay_enabled {
            MIN_DELAY_SECS + source.draw_unit() * (MAX_DELAY_SECS - MIN_DELAY_SECS)
        } else {
            0.0
        };
        RoundConditions {
            success: true,
            delay,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
