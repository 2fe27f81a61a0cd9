//! Paroli strategy: press wins, retreat on losses.
//!
//! The inverse of martingale: the bet doubles with each consecutive
//! win (recomputed from the base, exponent capped at 3 so a hot streak
//! cannot run the stake away) and drops back to the base after any
//! loss. Ruin fires when the bankroll cannot cover the next stake.

use tracing::debug;

use super::RoundLog;
use crate::sim::conditions::ConditionLayer;
use crate::sim::source::RoundSource;
use crate::types::SimulationResult;

/// Win-streak exponent cap: stakes top out at base × 2³.
pub const PAROLI_STREAK_CAP: u32 = 3;

#[derive(Debug, Clone)]
pub struct Paroli {
    pub base_bet: f64,
    pub cashout: f64,
    pub bankroll: f64,
}

impl Paroli {
    pub fn new(base_bet: f64, cashout: f64, bankroll: f64) -> Self {
        Paroli {
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
        let mut win_streak = 0u32;
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
                    "Paroli ruin: bankroll cannot cover the next stake"
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
                win_streak += 1;
                loss_streak = 0;
                balance += (self.cashout - 1.0) * stake;
                bet = self.base_bet * 2f64.powi(win_streak.min(PAROLI_STREAK_CAP) as i32);
            } else {
                win_streak = 0;
                loss_streak += 1;
                max_loss_streak = max_loss_streak.max(loss_streak);
                balance -= stake;
                bet = self.base_bet;
            }
            log.record_played(balance, conditions.delay);
        }

        log.into_result(balance, ruin_occurred, Some(max_loss_streak), None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
