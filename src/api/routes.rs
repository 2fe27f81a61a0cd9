//! API route handlers and request resolution.
//!
//! All endpoints return JSON. Query parameters are optional; anything
//! missing takes its documented default, and out-of-range values are
//! substituted with a warning rather than rejected — the only hard
//! failure is an unknown strategy id.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, SimulationLimits};
use crate::sim::source::RngSource;
use crate::sim::stats::HistoryStats;
use crate::types::{
    CustomParams, ProgressionType, RealismOptions, SimulationRequest, SimulationResult,
    StrategyKind,
};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServiceState {
    pub config: AppConfig,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub simulations_served: AtomicU64,
}

impl ServiceState {
    pub fn new(config: AppConfig) -> Self {
        ServiceState {
            config,
            started_at: chrono::Utc::now(),
            simulations_served: AtomicU64::new(0),
        }
    }
}

pub type ApiState = Arc<ServiceState>;

// ---------------------------------------------------------------------------
// Request resolution
// ---------------------------------------------------------------------------

/// Raw query parameters for `GET /simulate`.
#[derive(Debug, Default, Deserialize)]
pub struct SimulateQuery {
    pub strategy: Option<String>,
    pub rounds: Option<u32>,
    pub bet: Option<f64>,
    pub bankroll: Option<f64>,
    pub target_profit: Option<f64>,
    pub percent_bet: Option<f64>,
    pub realism: Option<bool>,
    pub realism_min_bet: Option<f64>,
    pub realism_max_bet: Option<f64>,
    pub network_delay: Option<bool>,
    pub error_simulation: Option<bool>,
    pub cashout_target: Option<f64>,
    pub bet_sequence: Option<String>,
    pub max_bet: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub progression_type: Option<String>,
    pub seed: Option<u64>,
    pub include_stats: Option<bool>,
}

/// Resolve one float parameter: default when absent or non-finite,
/// clamped into `[lo, hi]` with a warning otherwise.
fn resolve_f64(name: &'static str, raw: Option<f64>, default: f64, lo: f64, hi: f64) -> f64 {
    let value = match raw {
        Some(v) if v.is_finite() => v,
        Some(v) => {
            warn!(param = name, value = v, default, "Non-finite parameter, using default");
            return default;
        }
        None => return default,
    };
    let clamped = value.clamp(lo, hi);
    if clamped != value {
        warn!(param = name, value, clamped, "Out-of-range parameter substituted");
    }
    clamped
}

/// Turn raw query parameters into a fully-defaulted simulation request.
fn resolve_request(query: &SimulateQuery, limits: &SimulationLimits) -> SimulationRequest {
    let base = SimulationRequest::default();
    let base_custom = CustomParams::default();
    let base_realism = RealismOptions::default();

    let max_rounds = limits.max_rounds.max(1);
    let requested = query.rounds.unwrap_or(limits.default_rounds);
    let rounds = requested.clamp(1, max_rounds);
    if rounds != requested {
        warn!(
            param = "rounds",
            value = requested,
            clamped = rounds,
            "Out-of-range parameter substituted"
        );
    }

    let min_bet = resolve_f64(
        "realism_min_bet",
        query.realism_min_bet,
        base_realism.min_bet,
        0.0,
        f64::INFINITY,
    );
    let max_bet = resolve_f64(
        "realism_max_bet",
        query.realism_max_bet,
        base_realism.max_bet,
        0.0,
        f64::INFINITY,
    );
    if min_bet > max_bet {
        warn!(min_bet, max_bet, "Realism bet limits reversed, swapping");
    }

    let progression = match query.progression_type.as_deref() {
        None | Some("loss") => ProgressionType::Loss,
        Some("win") => ProgressionType::Win,
        Some(other) => {
            warn!(value = other, "Unknown progression type, using loss");
            ProgressionType::Loss
        }
    };

    SimulationRequest {
        strategy: query
            .strategy
            .clone()
            .unwrap_or_else(|| base.strategy.clone()),
        rounds,
        bet: resolve_f64("bet", query.bet, base.bet, 0.01, f64::INFINITY),
        bankroll: resolve_f64("bankroll", query.bankroll, base.bankroll, 0.01, f64::INFINITY),
        target_profit: resolve_f64(
            "target_profit",
            query.target_profit,
            base.target_profit,
            0.01,
            f64::INFINITY,
        ),
        percent_bet: resolve_f64(
            "percent_bet",
            query.percent_bet,
            base.percent_bet,
            0.01,
            100.0,
        ),
        realism: RealismOptions {
            enabled: query.realism.unwrap_or(base_realism.enabled),
            min_bet,
            max_bet,
            network_delay_enabled: query
                .network_delay
                .unwrap_or(base_realism.network_delay_enabled),
            error_simulation_enabled: query
                .error_simulation
                .unwrap_or(base_realism.error_simulation_enabled),
        },
        custom: Some(CustomParams {
            cashout_target: resolve_f64(
                "cashout_target",
                query.cashout_target,
                base_custom.cashout_target,
                1.01,
                f64::INFINITY,
            ),
            bet_sequence: query
                .bet_sequence
                .clone()
                .unwrap_or_else(|| base_custom.bet_sequence.clone()),
            max_bet: resolve_f64("max_bet", query.max_bet, base_custom.max_bet, 0.01, f64::INFINITY),
            stop_loss: resolve_f64(
                "stop_loss",
                query.stop_loss,
                base_custom.stop_loss,
                0.0,
                f64::INFINITY,
            ),
            take_profit: resolve_f64(
                "take_profit",
                query.take_profit,
                base_custom.take_profit,
                0.0,
                f64::INFINITY,
            ),
            progression,
        }),
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    #[serde(flatten)]
    pub result: SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<HistoryStats>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_secs: i64,
    pub simulations_served: u64,
}

fn strategy_catalog() -> Vec<StrategyInfo> {
    vec![
        StrategyInfo {
            id: "early",
            name: "Early Cashout",
            description: "Flat bet, cash out at 1.5x every round.",
        },
        StrategyInfo {
            id: "mid",
            name: "Mid Cashout",
            description: "Flat bet, cash out at 2.5x every round.",
        },
        StrategyInfo {
            id: "high",
            name: "High Multiplier",
            description: "Flat bet, cash out at 10x every round.",
        },
        StrategyInfo {
            id: "dual",
            name: "Dual Bet",
            description: "Splits the stake into 1.5x and 5x legs against the same crash.",
        },
        StrategyInfo {
            id: "martingale",
            name: "Martingale",
            description: "Doubles the stake after every loss, resets after a win.",
        },
        StrategyInfo {
            id: "paroli",
            name: "Paroli",
            description: "Doubles the stake after wins, up to three in a row.",
        },
        StrategyInfo {
            id: "fixed_percent",
            name: "Fixed Percent",
            description: "Stakes a fixed percentage of the current bankroll.",
        },
        StrategyInfo {
            id: "target_profit",
            name: "Target Profit",
            description: "Flat bets until a profit target is reached or the bankroll is gone.",
        },
        StrategyInfo {
            id: "custom",
            name: "Custom Sequence",
            description: "User-defined bet sequence with stop-loss and take-profit.",
        },
    ]
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /simulate
pub async fn run_simulation(
    State(state): State<ApiState>,
    Query(query): Query<SimulateQuery>,
) -> Result<Json<SimulateResponse>, (StatusCode, Json<ErrorBody>)> {
    let run_id = Uuid::new_v4();
    let include_stats = query.include_stats.unwrap_or(false);
    let request = resolve_request(&query, &state.config.simulation);

    info!(
        %run_id,
        strategy = %request.strategy,
        rounds = request.rounds,
        seed = ?query.seed,
        "Simulation requested"
    );

    let mut source =
        RngSource::for_run(query.seed).with_cap(state.config.simulation.multiplier_cap);
    match crate::sim::simulate(&request, &mut source) {
        Ok(result) => {
            state.simulations_served.fetch_add(1, Ordering::Relaxed);
            let stats = include_stats.then(|| HistoryStats::compute(&result.history));
            info!(
                %run_id,
                final_balance = result.final_balance,
                ruin = result.ruin_occurred,
                rounds_played = result.rounds_played,
                "Simulation served"
            );
            Ok(Json(SimulateResponse { result, stats }))
        }
        Err(err) => {
            warn!(%run_id, error = %err, "Simulation rejected");
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            ))
        }
    }
}

/// GET /strategies
pub async fn list_strategies() -> Json<Vec<StrategyInfo>> {
    Json(strategy_catalog())
}

/// GET /api/status
pub async fn get_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let uptime = (chrono::Utc::now() - state.started_at).num_seconds();
    Json(StatusResponse {
        service: "crashsim",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: uptime,
        simulations_served: state.simulations_served.load(Ordering::Relaxed),
    })
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn default_limits() -> SimulationLimits {
        SimulationLimits::default()
    }

    // -- resolution tests --

    #[test]
    fn test_empty_query_resolves_to_defaults() {
        let request = resolve_request(&SimulateQuery::default(), &default_limits());
        assert_eq!(request.strategy, "early");
        assert_eq!(request.rounds, 1_000);
        assert_eq!(request.bet, 1.0);
        assert_eq!(request.bankroll, 100.0);
        assert_eq!(request.target_profit, 50.0);
        assert_eq!(request.percent_bet, 5.0);
        assert!(!request.realism.enabled);

        let custom = request.custom.unwrap();
        assert_eq!(custom.bet_sequence, "1,2,4");
        assert_eq!(custom.cashout_target, 2.0);
        assert_eq!(custom.progression, ProgressionType::Loss);
    }

    #[test]
    fn test_rounds_clamped_to_limits() {
        let mut query = SimulateQuery::default();
        query.rounds = Some(0);
        assert_eq!(resolve_request(&query, &default_limits()).rounds, 1);

        query.rounds = Some(2_000_000);
        assert_eq!(resolve_request(&query, &default_limits()).rounds, 100_000);

        let tight = SimulationLimits {
            max_rounds: 500,
            ..SimulationLimits::default()
        };
        query.rounds = Some(900);
        assert_eq!(resolve_request(&query, &tight).rounds, 500);
    }

    #[test]
    fn test_bet_floor_substituted() {
        let mut query = SimulateQuery::default();
        query.bet = Some(-3.0);
        assert_eq!(resolve_request(&query, &default_limits()).bet, 0.01);
    }

    #[test]
    fn test_percent_bet_clamped_to_hundred() {
        let mut query = SimulateQuery::default();
        query.percent_bet = Some(250.0);
        assert_eq!(resolve_request(&query, &default_limits()).percent_bet, 100.0);
    }

    #[test]
    fn test_non_finite_parameter_uses_default() {
        let mut query = SimulateQuery::default();
        query.bankroll = Some(f64::NAN);
        assert_eq!(resolve_request(&query, &default_limits()).bankroll, 100.0);
    }

    #[test]
    fn test_cashout_target_floor() {
        let mut query = SimulateQuery::default();
        query.cashout_target = Some(1.0);
        let custom = resolve_request(&query, &default_limits()).custom.unwrap();
        assert_eq!(custom.cashout_target, 1.01);
    }

    #[test]
    fn test_progression_type_parsing() {
        let mut query = SimulateQuery::default();
        query.progression_type = Some("win".to_string());
        let custom = resolve_request(&query, &default_limits()).custom.unwrap();
        assert_eq!(custom.progression, ProgressionType::Win);

        query.progression_type = Some("sideways".to_string());
        let custom = resolve_request(&query, &default_limits()).custom.unwrap();
        assert_eq!(custom.progression, ProgressionType::Loss);
    }

    #[test]
    fn test_realism_flags_forwarded() {
        let mut query = SimulateQuery::default();
        query.realism = Some(true);
        query.network_delay = Some(false);
        query.realism_min_bet = Some(0.5);
        query.realism_max_bet = Some(25.0);

        let realism = resolve_request(&query, &default_limits()).realism;
        assert!(realism.enabled);
        assert!(!realism.network_delay_enabled);
        assert!(realism.error_simulation_enabled);
        assert_eq!(realism.min_bet, 0.5);
        assert_eq!(realism.max_bet, 25.0);
    }

    // -- catalog tests --

    #[test]
    fn test_catalog_covers_every_strategy() {
        let catalog = strategy_catalog();
        assert_eq!(catalog.len(), StrategyKind::ALL.len());
        for info in &catalog {
            assert!(
                info.id.parse::<StrategyKind>().is_ok(),
                "catalog id {} does not dispatch",
                info.id
            );
        }
    }

    // -- response shape tests --

    fn make_result() -> SimulationResult {
        SimulationResult {
            history: vec![100.5],
            final_balance: 100.5,
            ruin_occurred: false,
            target_reached: None,
            max_loss_streak: None,
            rounds_played: 1,
            network_errors: None,
            total_delay: None,
            bet_limit_hits: None,
        }
    }

    #[test]
    fn test_stats_omitted_when_not_requested() {
        let response = SimulateResponse {
            result: make_result(),
            stats: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("stats"));
        assert!(json.contains("final_balance"));
    }

    #[test]
    fn test_stats_flattened_next_to_result() {
        let response = SimulateResponse {
            result: make_result(),
            stats: Some(HistoryStats::compute(&[100.0, 101.0])),
        };
        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert!(json.get("history").is_some());
        assert!(json["stats"]["mean"].as_f64().is_some());
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "Invalid strategy: moon".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"Invalid strategy: moon"}"#);
    }

    // -- handler tests --

    #[tokio::test]
    async fn test_get_status_handler() {
        let state = Arc::new(ServiceState::new(AppConfig::default()));
        let Json(status) = get_status(State(state)).await;
        assert_eq!(status.service, "crashsim");
        assert_eq!(status.simulations_served, 0);
        assert!(status.uptime_secs >= 0);
    }

    #[tokio::test]
    async fn test_list_strategies_handler() {
        let Json(catalog) = list_strategies().await;
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog[0].id, "early");
    }
}
