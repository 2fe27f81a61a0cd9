//! Simulation core.
//!
//! `multiplier` holds the crash-point model, `source` the randomness
//! seam, `conditions` the optional realism layer, and `stats` the
//! post-run history summaries. `simulate` is the single entry point:
//! it resolves the requested strategy, builds the matching engine, and
//! runs it against the supplied round source.

pub mod conditions;
pub mod multiplier;
pub mod source;
pub mod stats;

use tracing::info;

use crate::sim::conditions::ConditionLayer;
use crate::sim::source::RoundSource;
use crate::strategy::custom::CustomSequence;
use crate::strategy::dual::DualBet;
use crate::strategy::fixed_cashout::{FixedCashout, EARLY_CASHOUT, HIGH_CASHOUT, MID_CASHOUT};
use crate::strategy::fixed_percent::FixedPercent;
use crate::strategy::martingale::Martingale;
use crate::strategy::paroli::Paroli;
use crate::strategy::target_profit::TargetProfit;
use crate::strategy::DEFAULT_CASHOUT;
use crate::types::{SimError, SimulationRequest, SimulationResult, StrategyKind};

/// Run one simulation described by `request`, drawing every multiplier
/// and condition roll from `source`.
pub fn simulate(
    request: &SimulationRequest,
    source: &mut dyn RoundSource,
) -> Result<SimulationResult, SimError> {
    let kind: StrategyKind = request
        .strategy
        .parse()
        .map_err(|_| SimError::UnknownStrategy(request.strategy.clone()))?;
    let layer = ConditionLayer::new(request.realism.clone().normalized());
    let rounds = request.rounds;

    let result = match kind {
        StrategyKind::Early => {
            FixedCashout::new(request.bet, EARLY_CASHOUT).run(rounds, &layer, source)
        }
        StrategyKind::Mid => {
            FixedCashout::new(request.bet, MID_CASHOUT).run(rounds, &layer, source)
        }
        StrategyKind::High => {
            FixedCashout::new(request.bet, HIGH_CASHOUT).run(rounds, &layer, source)
        }
        StrategyKind::Dual => DualBet::split(request.bet).run(rounds, &layer, source),
        StrategyKind::Martingale => {
            Martingale::new(request.bet, DEFAULT_CASHOUT, request.bankroll)
                .run(rounds, &layer, source)
        }
        StrategyKind::Paroli => Paroli::new(request.bet, DEFAULT_CASHOUT, request.bankroll)
            .run(rounds, &layer, source),
        StrategyKind::FixedPercent => {
            FixedPercent::new(request.percent_bet, DEFAULT_CASHOUT, request.bankroll)
                .run(rounds, &layer, source)
        }
        StrategyKind::TargetProfit => TargetProfit::new(
            request.bet,
            DEFAULT_CASHOUT,
            request.bankroll,
            request.target_profit,
        )
        .run(rounds, &layer, source),
        StrategyKind::Custom => {
            let params = request
                .custom
                .as_ref()
                .ok_or(SimError::MissingCustomParams)?;
            CustomSequence::from_params(params, request.bankroll).run(rounds, &layer, source)
        }
    };

    info!(
        strategy = %kind,
        rounds_played = result.rounds_played,
        final_balance = result.final_balance,
        ruin = result.ruin_occurred,
        "Simulation complete"
    );
    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
