//! Fixed-percent strategy: stake a share of the current bankroll.
//!
//! The bet is recomputed every round as `round(percent% × balance, 2)`,
//! so stakes shrink through a losing run and grow through a winning
//! one. The computed bet is rounded to cents before the `< 0.01` ruin
//! check, matching the reported-balance granularity: once the bankroll
//! is too small to stake a cent, the run is over.

use tracing::debug;

use super::{round2, RoundLog};
use crate::sim::conditions::ConditionLayer;
use crate::sim::source::RoundSource;
use crate::types::SimulationResult;

#[derive(Debug, Clone)]
pub struct FixedPercent {
    pub percent: f64,
    pub cashout: f64,
    pub bankroll: f64,
}

impl FixedPercent {
    pub fn new(percent: f64, cashout: f64, bankroll: f64) -> Self {
        FixedPercent {
            percent,
            cashout,
            bankroll,
        }
    }

    pub fn run(
        &self,
        rounds: u32,
        layer: &ConditionLayer,
        source: &mut dyn RoundSource,
    ) -> SimulationResult {
        let mut balance = self.bankroll;
        let mut loss_streak = 0u32;
        let mut max_loss_streak = 0u32;
        let mut ruin_occurred = false;
        let mut log = RoundLog::new(layer, rounds);

        for _ in 0..rounds {
            let bet = round2(self.percent / 100.0 * balance);
            let (stake, limit_hit) = layer.clamp_bet(bet);
            if limit_hit {
                log.note_limit_hit();
            }
            if bet < 0.01 || balance < stake {
                ruin_occurred = true;
                debug!(
                    round = log.rounds_attempted(),
                    bet,
                    balance,
                    "Fixed-percent ruin: stake fell below a cent or exceeds balance"
                );
                break;
            }

            let conditions = layer.sample(source);
            if !conditions.success {
                log.record_skipped(balance);
                continue;
            }

            let crash = source.draw_multiplier();
            if crash >= self.cashout {
                balance += (self.cashout - 1.0) * stake;
                loss_streak = 0;
            } else {
                balance -= stake;
                loss_streak += 1;
                max_loss_streak = max_loss_streak.max(loss_streak);
            }
            log.record_played(balance, conditions.delay);
        }

        log.into_result(balance, ruin_occurred, Some(max_loss_streak), None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
