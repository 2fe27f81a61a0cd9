//! Shared types for the CRASHSIM simulator.
//!
//! These types form the data model used across all modules: the
//! simulation request handed in by the adapter, the canonical result
//! every strategy engine produces, and the error type that crosses
//! the core boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Strategy identifiers
// ---------------------------------------------------------------------------

/// The nine wagering strategies the simulator knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Early,
    Mid,
    High,
    Dual,
    Martingale,
    Paroli,
    FixedPercent,
    TargetProfit,
    Custom,
}

impl StrategyKind {
    /// All known strategies (useful for iteration).
    pub const ALL: &'static [StrategyKind] = &[
        StrategyKind::Early,
        StrategyKind::Mid,
        StrategyKind::High,
        StrategyKind::Dual,
        StrategyKind::Martingale,
        StrategyKind::Paroli,
        StrategyKind::FixedPercent,
        StrategyKind::TargetProfit,
        StrategyKind::Custom,
    ];

    /// Whether this strategy plays against a real bankroll (and can be
    /// ruined) rather than tracking net profit/loss from zero.
    pub fn uses_bankroll(&self) -> bool {
        !matches!(
            self,
            StrategyKind::Early | StrategyKind::Mid | StrategyKind::High | StrategyKind::Dual
        )
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Early => write!(f, "early"),
            StrategyKind::Mid => write!(f, "mid"),
            StrategyKind::High => write!(f, "high"),
            StrategyKind::Dual => write!(f, "dual"),
            StrategyKind::Martingale => write!(f, "martingale"),
            StrategyKind::Paroli => write!(f, "paroli"),
            StrategyKind::FixedPercent => write!(f, "fixed_percent"),
            StrategyKind::TargetProfit => write!(f, "target_profit"),
            StrategyKind::Custom => write!(f, "custom"),
        }
    }
}

/// Attempt to parse a strategy identifier (case-insensitive).
impl std::str::FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "early" => Ok(StrategyKind::Early),
            "mid" => Ok(StrategyKind::Mid),
            "high" => Ok(StrategyKind::High),
            "dual" => Ok(StrategyKind::Dual),
            "martingale" => Ok(StrategyKind::Martingale),
            "paroli" => Ok(StrategyKind::Paroli),
            "fixed_percent" => Ok(StrategyKind::FixedPercent),
            "target_profit" => Ok(StrategyKind::TargetProfit),
            "custom" => Ok(StrategyKind::Custom),
            _ => Err(anyhow::anyhow!("Unknown strategy: {s}")),
        }
    }
}

/// How the custom strategy walks its bet sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressionType {
    /// Advance the sequence cursor after a win, reset after a loss.
    Win,
    /// Advance the sequence cursor after a loss, reset after a win.
    Loss,
}

impl fmt::Display for ProgressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressionType::Win => write!(f, "win"),
            ProgressionType::Loss => write!(f, "loss"),
        }
    }
}

impl std::str::FromStr for ProgressionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "win" => Ok(ProgressionType::Win),
            "loss" => Ok(ProgressionType::Loss),
            _ => Err(anyhow::anyhow!("Unknown progression type: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Condition-realism toggles for a run.
///
/// When `enabled` is false the perturbation layer is fully inert:
/// no bet clamping, no failures, no delay bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealismOptions {
    pub enabled: bool,
    /// Lower betting limit enforced per round.
    pub min_bet: f64,
    /// Upper betting limit enforced per round.
    pub max_bet: f64,
    pub network_delay_enabled: bool,
    pub error_simulation_enabled: bool,
}

impl Default for RealismOptions {
    fn default() -> Self {
        RealismOptions {
            enabled: false,
            min_bet: 0.1,
            max_bet: 100.0,
            network_delay_enabled: true,
            error_simulation_enabled: true,
        }
    }
}

impl RealismOptions {
    /// Returns a copy with the bet bounds swapped into order if the
    /// caller supplied them reversed. The clamp assumes min ≤ max.
    pub fn normalized(mut self) -> Self {
        if self.min_bet > self.max_bet {
            std::mem::swap(&mut self.min_bet, &mut self.max_bet);
        }
        self
    }
}

/// Parameters specific to the custom-sequence strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomParams {
    /// Multiplier threshold the player cashes out at.
    pub cashout_target: f64,
    /// Comma-separated bet amounts, e.g. "1,2,4".
    pub bet_sequence: String,
    /// The strategy's own per-round bet ceiling.
    pub max_bet: f64,
    /// Run ends in ruin once balance falls to this level or below.
    pub stop_loss: f64,
    /// Run ends with target_reached once balance reaches this level.
    pub take_profit: f64,
    pub progression: ProgressionType,
}

impl Default for CustomParams {
    fn default() -> Self {
        CustomParams {
            cashout_target: 2.0,
            bet_sequence: "1,2,4".to_string(),
            max_bet: 20.0,
            stop_loss: 50.0,
            take_profit: 200.0,
            progression: ProgressionType::Loss,
        }
    }
}

/// Immutable input for one simulation run.
///
/// The strategy identifier stays a raw string so the dispatcher can
/// echo unknown ids back in its error message. All numeric fields are
/// expected to be pre-validated by the adapter (see `api::routes`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub strategy: String,
    pub rounds: u32,
    /// Base bet for the constant-bet strategies.
    pub bet: f64,
    /// Starting bankroll for the bankroll-backed strategies.
    pub bankroll: f64,
    /// Profit goal for the target_profit strategy.
    pub target_profit: f64,
    /// Percentage of the current bankroll staked by fixed_percent.
    pub percent_bet: f64,
    pub realism: RealismOptions,
    pub custom: Option<CustomParams>,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        SimulationRequest {
            strategy: "early".to_string(),
            rounds: 1000,
            bet: 1.0,
            bankroll: 100.0,
            target_profit: 50.0,
            percent_bet: 5.0,
            realism: RealismOptions::default(),
            custom: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Canonical output of every strategy engine.
///
/// `history` holds one balance snapshot per round attempted, including
/// rounds skipped by a simulated network failure; `rounds_played`
/// counts only the rounds where a bet was actually resolved. The
/// perturbation statistics are present only when realism was enabled
/// for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub history: Vec<f64>,
    pub final_balance: f64,
    pub ruin_occurred: bool,
    /// Only reported by strategies with an explicit profit goal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_reached: Option<bool>,
    /// `None` (serialized as null) for the fixed-cashout family, which
    /// has no ruin concept and does not track streaks.
    pub max_loss_streak: Option<u32>,
    pub rounds_played: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_errors: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_limit_hits: Option<u32>,
}

impl SimulationResult {
    /// Rounds attempted, i.e. history entries (played + skipped).
    pub fn rounds_attempted(&self) -> usize {
        self.history.len()
    }

    /// Rounds lost to simulated network failures.
    pub fn rounds_skipped(&self) -> usize {
        self.history.len().saturating_sub(self.rounds_played)
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "final ${:.2} after {} rounds",
            self.final_balance, self.rounds_played,
        )?;
        if self.ruin_occurred {
            write!(f, " [RUIN]")?;
        }
        if self.target_reached == Some(true) {
            write!(f, " [TARGET]")?;
        }
        if let Some(streak) = self.max_loss_streak {
            write!(f, " (max loss streak {streak})")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Configuration errors returned across the core boundary.
///
/// Domain events (ruin, target reached, simulated network failure) are
/// never errors; they travel as flags on [`SimulationResult`].
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid strategy: {0}")]
    UnknownStrategy(String),

    #[error("Custom strategy requires custom parameters")]
    MissingCustomParams,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
