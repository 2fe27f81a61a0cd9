//! Martingale strategy: double the bet after every loss.
//!
//! Classic loss-chasing progression against a real bankroll. A win
//! recovers the whole losing sequence plus one base-bet profit and
//! resets the progression; the run ends in ruin the moment the
//! bankroll cannot cover the next required stake. Doubling continues
//! from the stake actually placed, so betting limits also slow the
//! progression rather than just capping a single round.

use tracing::debug;

use super::RoundLog;
use crate::sim::conditions::ConditionLayer;
use crate::sim::source::RoundSource;
use crate::types::SimulationResult;

#[derive(Debug, Clone)]
pub struct Martingale {
    pub base_bet: f64,
    pub cashout: f64,
    pub bankroll: f64,
}

impl Martingale {
    pub fn new(base_bet: f64, cashout: f64, bankroll: f64) -> Self {
        Martingale {
            base_bet,
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
        let mut bet = self.base_bet;
        let mut loss_streak = 0u32;
        let mut max_loss_streak = 0u32;
        let mut ruin_occurred = false;
        let mut log = RoundLog::new(layer, rounds);

        for _ in 0..rounds {
            let (stake, limit_hit) = layer.clamp_bet(bet);
            if limit_hit {
                log.note_limit_hit();
            }
            if balance < stake {
                ruin_occurred = true;
                debug!(
                    round = log.rounds_attempted(),
                    required = stake,
                    balance,
                    "Martingale ruin: bankroll cannot cover the next stake"
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
                bet = self.base_bet;
                loss_streak = 0;
            } else {
                balance -= stake;
                loss_streak += 1;
                max_loss_streak = max_loss_streak.max(loss_streak);
                bet = stake * 2.0;
            }
            log.record_played(balance, conditions.delay);
        }

        log.into_result(balance, ruin_occurred, Some(max_loss_streak), None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
