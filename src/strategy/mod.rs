//! Strategy engines — the per-round wagering state machines behind the
//! nine strategy identifiers.
//!
//! Every engine follows the same round contract: compute the intended
//! bet from its own state, clamp it through the condition layer, skip
//! the round on a simulated network failure (recording the unchanged
//! balance), otherwise draw a crash multiplier, resolve the bet, and
//! append the new balance. What varies per engine is bet progression
//! and the early-stop conditions (ruin, profit target).

pub mod custom;
pub mod dual;
pub mod fixed_cashout;
pub mod fixed_percent;
pub mod martingale;
pub mod paroli;
pub mod target_profit;

use crate::sim::conditions::{ConditionLayer, ConditionStats};
use crate::types::SimulationResult;

/// Cashout threshold used by the bankroll strategies (martingale,
/// paroli, fixed_percent, target_profit) unless parameterized.
pub const DEFAULT_CASHOUT: f64 = 2.0;

/// Round a balance to 2 decimal places for history and reporting.
///
/// Internal balances stay full precision; rounding happens only at the
/// recording boundary.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Round log
// ---------------------------------------------------------------------------

/// Per-run recorder shared by all engines.
///
/// Owns the balance history and the perturbation counters, and turns
/// them into the canonical [`SimulationResult`] when the run ends.
/// History is append-only: one entry per round attempted, skipped
/// rounds included.
pub struct RoundLog {
    history: Vec<f64>,
    rounds_played: usize,
    conditions: Option<ConditionStats>,
}

impl RoundLog {
    pub fn new(layer: &ConditionLayer, rounds: u32) -> Self {
        RoundLog {
            history: Vec::with_capacity(rounds as usize),
            rounds_played: 0,
            conditions: layer.is_enabled().then(ConditionStats::default),
        }
    }

    /// Tally a betting-limit hit (clamping changed the requested bet).
    pub fn note_limit_hit(&mut self) {
        if let Some(stats) = self.conditions.as_mut() {
            stats.bet_limit_hits += 1;
        }
    }

    /// Record a resolved round: the post-resolution balance and the
    /// simulated delay the round carried.
    pub fn record_played(&mut self, balance: f64, delay: f64) {
        self.history.push(round2(balance));
        self.rounds_played += 1;
        if let Some(stats) = self.conditions.as_mut() {
            stats.total_delay += delay;
        }
    }

    /// Record a round skipped by a network failure: the balance is
    /// unchanged but still appended, and the round does not count as
    /// played.
    pub fn record_skipped(&mut self, balance: f64) {
        self.history.push(round2(balance));
        if let Some(stats) = self.conditions.as_mut() {
            stats.network_errors += 1;
        }
    }

    pub fn rounds_attempted(&self) -> usize {
        self.history.len()
    }

    /// Close the run out into the canonical result shape.
    pub fn into_result(
        self,
        balance: f64,
        ruin_occurred: bool,
        max_loss_streak: Option<u32>,
        target_reached: Option<bool>,
    ) -> SimulationResult {
        let stats = self.conditions;
        SimulationResult {
            history: self.history,
            final_balance: round2(balance),
            ruin_occurred,
            target_reached,
            max_loss_streak,
            rounds_played: self.rounds_played,
            network_errors: stats.map(|s| s.network_errors),
            total_delay: stats.map(|s| s.total_delay),
            bet_limit_hits: stats.map(|s| s.bet_limit_hits),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
