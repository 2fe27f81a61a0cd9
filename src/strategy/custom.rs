//! Custom-sequence strategy: user-defined bet progression.
//!
//! The player supplies a comma-separated bet sequence and chooses
//! whether the cursor advances on wins or on losses (resetting to the
//! start on the opposite outcome, and holding at the last element once
//! the sequence is exhausted). Stop-loss and take-profit levels bound
//! the run from both sides; the stake is additionally capped by the
//! strategy's own max bet and by the remaining balance.

use tracing::debug;

use super::RoundLog;
use crate::sim::conditions::ConditionLayer;
use crate::sim::source::RoundSource;
use crate::types::{CustomParams, ProgressionType, SimulationResult};

/// Parse a comma-separated bet sequence.
///
/// Whitespace is trimmed per token; unparseable, non-finite, and
/// non-positive entries are dropped. An empty result falls back to the
/// single-element sequence `[1.0]` so the engine always has a bet.
pub fn parse_bet_sequence(raw: &str) -> Vec<f64> {
    let bets: Vec<f64> = raw
        .split(',')
        .filter_map(|token| token.trim().parse::<f64>().ok())
        .filter(|bet| bet.is_finite() && *bet > 0.0)
        .collect();
    if bets.is_empty() {
        vec![1.0]
    } else {
        bets
    }
}

#[derive(Debug, Clone)]
pub struct CustomSequence {
    bets: Vec<f64>,
    cashout: f64,
    max_bet: f64,
    stop_loss: f64,
    take_profit: f64,
    progression: ProgressionType,
    bankroll: f64,
}

impl CustomSequence {
    pub fn from_params(params: &CustomParams, bankroll: f64) -> Self {
        CustomSequence {
            bets: parse_bet_sequence(&params.bet_sequence),
            cashout: params.cashout_target,
            max_bet: params.max_bet,
            stop_loss: params.stop_loss,
            take_profit: params.take_profit,
            progression: params.progression,
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
        let mut index = 0usize;
        let mut loss_streak = 0u32;
        let mut max_loss_streak = 0u32;
        let mut ruin_occurred = false;
        let mut log = RoundLog::new(layer, rounds);
        let last = self.bets.len() - 1;

        for _ in 0..rounds {
            if balance <= self.stop_loss {
                ruin_occurred = true;
                debug!(
                    round = log.rounds_attempted(),
                    balance,
                    stop_loss = self.stop_loss,
                    "Custom run hit its stop-loss"
                );
                break;
            }
            if balance >= self.take_profit {
                debug!(
                    round = log.rounds_attempted(),
                    balance,
                    take_profit = self.take_profit,
                    "Custom run hit its take-profit"
                );
                break;
            }

            let desired = self.bets[index].min(self.max_bet).min(balance);
            let (stake, limit_hit) = layer.clamp_bet(desired);
            if limit_hit {
                log.note_limit_hit();
            }
            if stake < 0.01 || balance < stake {
                ruin_occurred = true;
                debug!(
                    round = log.rounds_attempted(),
                    stake, balance, "Custom run cannot place its next stake"
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
                index = match self.progression {
                    ProgressionType::Win => (index + 1).min(last),
                    ProgressionType::Loss => 0,
                };
            } else {
                balance -= stake;
                loss_streak += 1;
                max_loss_streak = max_loss_streak.max(loss_streak);
                index = match self.progression {
                    ProgressionType::Loss => (index + 1).min(last),
                    ProgressionType::Win => 0,
                };
            }
            log.record_played(balance, conditions.delay);
        }

        let target_reached = balance >= self.take_profit;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::source::ScriptedSource;
    use crate::types::RealismOptions;

    fn no_realism() -> ConditionLayer {
        ConditionLayer::new(RealismOptions::default())
    }

    fn make_engine(sequence: &str, progression: ProgressionType) -> CustomSequence {
        CustomSequence::from_params(
            &CustomParams {
                bet_sequence: sequence.to_string(),
                progression,
                stop_loss: 0.0,
                take_profit: 1_000_000.0,
                ..CustomParams::default()
            },
            100.0,
        )
    }

    // -- parsing tests --

    #[test]
    fn test_parse_plain_sequence() {
        assert_eq!(parse_bet_sequence("1,2,4"), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_bet_sequence(" 1.5 , 3 "), vec![1.5, 3.0]);
    }

    #[test]
    fn test_parse_drops_bad_tokens() {
        assert_eq!(parse_bet_sequence("1,x,2"), vec![1.0, 2.0]);
        assert_eq!(parse_bet_sequence("0,-2,3"), vec![3.0]);
        assert_eq!(parse_bet_sequence("inf,nan,2"), vec![2.0]);
    }

    #[test]
    fn test_parse_empty_falls_back() {
        assert_eq!(parse_bet_sequence(""), vec![1.0]);
        assert_eq!(parse_bet_sequence("a,b"), vec![1.0]);
    }

    // -- progression tests --

    #[test]
    fn test_loss_progression_advances_and_holds_at_end() {
        // Stakes on a pure losing run: 1, 2, 4, then held at 4.
        let engine = make_engine("1,2,4", ProgressionType::Loss);
        let mut source = ScriptedSource::new(&[1.1; 5]);
        let result = engine.run(5, &no_realism(), &mut source);

        assert_eq!(result.history, vec![99.0, 97.0, 93.0, 89.0, 85.0]);
        assert_eq!(result.max_loss_streak, Some(5));
        assert!(!result.ruin_occurred);
    }

    #[test]
    fn test_loss_progression_resets_on_win() {
        let engine = make_engine("1,2,4", ProgressionType::Loss);
        let mut source = ScriptedSource::new(&[1.1, 1.1, 2.0, 1.1]);
        let result = engine.run(4, &no_realism(), &mut source);

        // Losses at 1 and 2, a win at 4, then back to the first bet.
        assert_eq!(result.history, vec![99.0, 97.0, 101.0, 100.0]);
    }

    #[test]
    fn test_win_progression_advances_on_wins() {
        let engine = make_engine("1,2,4", ProgressionType::Win);
        let mut source = ScriptedSource::new(&[2.0, 2.0, 2.0, 2.0]);
        let result = engine.run(4, &no_realism(), &mut source);

        // Stakes 1, 2, 4, then held at 4.
        assert_eq!(result.history, vec![101.0, 103.0, 107.0, 111.0]);
    }

    #[test]
    fn test_win_progression_resets_on_loss() {
        let engine = make_engine("1,2,4", ProgressionType::Win);
        let mut source = ScriptedSource::new(&[2.0, 1.1, 2.0]);
        let result = engine.run(3, &no_realism(), &mut source);

        // Win at 1 (cursor → 2), loss at 2 (cursor reset), win at 1.
        assert_eq!(result.history, vec![101.0, 99.0, 100.0]);
    }

    // -- termination tests --

    #[test]
    fn test_take_profit_stops_the_run() {
        let engine = CustomSequence::from_params(
            &CustomParams {
                bet_sequence: "1".to_string(),
                take_profit: 105.0,
                stop_loss: 0.0,
                ..CustomParams::default()
            },
            100.0,
        );
        let mut source = ScriptedSource::new(&[2.0; 5]);
        let result = engine.run(100, &no_realism(), &mut source);

        assert_eq!(result.history, vec![101.0, 102.0, 103.0, 104.0, 105.0]);
        assert_eq!(result.target_reached, Some(true));
        assert!(!result.ruin_occurred);
    }

    #[test]
    fn test_stop_loss_ends_in_ruin() {
        let engine = CustomSequence::from_params(
            &CustomParams {
                bet_sequence: "1".to_string(),
                stop_loss: 98.0,
                ..CustomParams::default()
            },
            100.0,
        );
        let mut source = ScriptedSource::new(&[1.1, 1.1]);
        let result = engine.run(100, &no_realism(), &mut source);

        // 99 is still above the line; 98 is not.
        assert_eq!(result.history, vec![99.0, 98.0]);
        assert!(result.ruin_occurred);
        assert_eq!(result.target_reached, Some(false));
    }

    #[test]
    fn test_take_profit_already_met_runs_nothing() {
        let engine = CustomSequence::from_params(
            &CustomParams {
                take_profit: 100.0,
                stop_loss: 0.0,
                ..CustomParams::default()
            },
            100.0,
        );
        let mut source = ScriptedSource::new(&[]);
        let result = engine.run(50, &no_realism(), &mut source);

        assert!(result.history.is_empty());
        assert_eq!(result.target_reached, Some(true));
        assert_eq!(result.rounds_played, 0);
    }

    #[test]
    fn test_own_max_bet_caps_the_stake() {
        let engine = CustomSequence::from_params(
            &CustomParams {
                bet_sequence: "50".to_string(),
                max_bet: 5.0,
                stop_loss: 0.0,
                take_profit: 1_000_000.0,
                ..CustomParams::default()
            },
            100.0,
        );
        let mut source = ScriptedSource::new(&[1.1]);
        let result = engine.run(1, &no_realism(), &mut source);

        assert_eq!(result.history, vec![95.0]);
    }

    #[test]
    fn test_stake_limited_to_remaining_balance() {
        let engine = CustomSequence::from_params(
            &CustomParams {
                bet_sequence: "50".to_string(),
                max_bet: 100.0,
                stop_loss: 0.0,
                take_profit: 1_000_000.0,
                ..CustomParams::default()
            },
            20.0,
        );
        let mut source = ScriptedSource::new(&[1.1]);
        let result = engine.run(10, &no_realism(), &mut source);

        // The all-in loss lands exactly on the stop-loss line.
        assert_eq!(result.history, vec![0.0]);
        assert!(result.ruin_occurred);
        assert_eq!(result.rounds_played, 1);
    }
}
