//! Dual-bet strategy: two sub-bets against the same crash.
//!
//! Each round splits the wager into two legs with different cashout
//! thresholds — a conservative leg at 1.5x and a greedy leg at 5x —
//! both resolved independently against one multiplier draw. Like the
//! fixed-cashout family, balance tracks net profit/loss from zero.

use super::RoundLog;
use crate::sim::conditions::ConditionLayer;
use crate::sim::source::RoundSource;
use crate::types::SimulationResult;

/// Cashout for the conservative leg.
pub const DUAL_LOW_CASHOUT: f64 = 1.5;
/// Cashout for the greedy leg.
pub const DUAL_HIGH_CASHOUT: f64 = 5.0;

/// Two constant sub-bets per round, one multiplier draw.
#[derive(Debug, Clone)]
pub struct DualBet {
    pub bet_low: f64,
    pub bet_high: f64,
}

impl DualBet {
    /// Both legs staked with the same amount (the service-level shape:
    /// one `bet` parameter feeds both).
    pub fn split(bet: f64) -> Self {
        DualBet {
            bet_low: bet,
            bet_high: bet,
        }
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
            // Each leg is clamped on its own; both can hit the limit.
            let (stake_low, hit_low) = layer.clamp_bet(self.bet_low);
            if hit_low {
                log.note_limit_hit();
            }
            let (stake_high, hit_high) = layer.clamp_bet(self.bet_high);
            if hit_high {
                log.note_limit_hit();
            }

            let conditions = layer.sample(source);
            if !conditions.success {
                log.record_skipped(balance);
                continue;
            }

            let crash = source.draw_multiplier();
            if crash >= DUAL_LOW_CASHOUT {
                balance += (DUAL_LOW_CASHOUT - 1.0) * stake_low;
            } else {
                balance -= stake_low;
            }
            if crash >= DUAL_HIGH_CASHOUT {
                balance += (DUAL_HIGH_CASHOUT - 1.0) * stake_high;
            } else {
                balance -= stake_high;
            }
            log.record_played(balance, conditions.delay);
        }

        log.into_result(balance, false, None, None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
