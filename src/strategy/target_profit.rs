//! Target-profit strategy: flat bets until a profit goal is banked.
//!
//! A constant base bet, with the run stopping the moment cumulative
//! profit reaches the target — the goal is checked before each round,
//! so no bet is placed once the target is met. Ruin fires when the
//! bankroll cannot cover the next stake.

use tracing::debug;

use super::RoundLog;
use crate::sim::conditions::ConditionLayer;
use crate::sim::source::RoundSource;
use crate::types::SimulationResult;

#[derive(Debug, Clone)]
pub struct TargetProfit {
    pub base_bet: f64,
    pub cashout: f64,
    pub bankroll: f64,
    pub target: f64,
}

impl TargetProfit {
    pub fn new(base_bet: f64, cashout: f64, bankroll: f64, target: f64) -> Self {
        TargetProfit {
            base_bet,
            cashout,
            bankroll,
            target,
        }
    }

    pub fn run(
        &self,
        rounds: u32,
        layer: &ConditionLayer,
        source: &mut dyn RoundSource,
    ) -> SimulationResult {
        let mut balance = self.bankroll;
        let mut current_profit = 0.0_f64;
        let mut loss_streak = 0u32;
        let mut max_loss_streak = 0u32;
        let mut ruin_occurred = false;
        let mut log = RoundLog::new(layer, rounds);

        for _ in 0..rounds {
            if current_profit >= self.target {
                debug!(
                    round = log.rounds_attempted(),
                    profit = current_profit,
                    "Profit target reached, stopping early"
                );
                break;
            }

            let (stake, limit_hit) = layer.clamp_bet(self.base_bet);
            if limit_hit {
                log.note_limit_hit();
            }
            if balance < stake {
                ruin_occurred = true;
                debug!(
                    round = log.rounds_attempted(),
                    required = stake,
                    balance,
                    "Target-profit ruin: bankroll cannot cover the stake"
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
                let profit = (self.cashout - 1.0) * stake;
                balance += profit;
                current_profit += profit;
                loss_streak = 0;
            } else {
                balance -= stake;
                current_profit -= stake;
                loss_streak += 1;
                max_loss_streak = max_loss_streak.max(loss_streak);
            }
            log.record_played(balance, conditions.delay);
        }

        let target_reached = current_profit >= self.target;
        log.into_result(
            balance,
            ruin_occurred,
            Some(max_loss_streak),
            Some(target_reached),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
