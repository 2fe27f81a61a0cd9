//! Fixed-cashout strategies: `early`, `mid`, `high`.
//!
//! The simplest family: a constant bet cashed out at a fixed
//! multiplier every round. Balance starts at zero and tracks net
//! profit/loss rather than a bankroll, so there is no ruin — a cold
//! streak just drives the balance negative.

use super::RoundLog;
use crate::sim::conditions::ConditionLayer;
use crate::sim::source::RoundSource;
use crate::types::SimulationResult;

/// Cashout threshold for `early` (frequent small wins).
pub const EARLY_CASHOUT: f64 = 1.5;
/// Cashout threshold for `mid`.
pub const MID_CASHOUT: f64 = 2.5;
/// Cashout threshold for `high` (rare large wins).
pub const HIGH_CASHOUT: f64 = 10.0;

/// Constant-bet engine cashing out at a fixed multiplier.
#[derive(Debug, Clone)]
pub struct FixedCashout {
    pub bet: f64,
    pub cashout: f64,
}

impl FixedCashout {
    pub fn new(bet: f64, cashout: f64) -> Self {
        FixedCashout { bet, cashout }
    }

    pub fn run(
        &self,
        rounds: u32,
        layer: &ConditionLayer,
        source: &mut dyn RoundSource,
    ) -> SimulationResult {
        let mut balance = 0.0_f64;
        let mut log = RoundLog::new(layer, rounds);

        for _ in 0..rounds {
            let (stake, limit_hit) = layer.clamp_bet(self.bet);
            if limit_hit {
                log.note_limit_hit();
            }

            let conditions = layer.sample(source);
            if !conditions.success {
                log.record_skipped(balance);
                continue;
            }

            let crash = source.draw_multiplier();
            if crash >= self.cashout {
                balance += (self.cashout - 1.0) * stake;
            } else {
                balance -= stake;
            }
            log.record_played(balance, conditions.delay);
        }

        log.into_result(balance, false, None, None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
