//! HTTP adapter — Axum web service over the simulation core.
//!
//! One simulate endpoint plus a strategy catalog and service probes.
//! CORS is wide open so browser dashboards can call the service
//! directly during development.

pub mod routes;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use routes::ApiState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/simulate", get(routes::run_simulation))
        .route("/strategies", get(routes::list_strategies))
        .route("/api/status", get(routes::get_status))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use routes::ServiceState;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> ApiState {
        Arc::new(ServiceState::new(AppConfig::default()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_simulate_with_defaults() {
        let (status, json) = get_json(build_router(test_state()), "/simulate").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["history"].as_array().unwrap().len(), 1_000);
        assert!(json["final_balance"].is_number());
        assert_eq!(json["ruin_occurred"], serde_json::Value::Bool(false));
        // Flat family: streak slot is null, realism extras are absent.
        assert!(json["max_loss_streak"].is_null());
        assert!(json.get("network_errors").is_none());
    }

    #[tokio::test]
    async fn test_simulate_unknown_strategy_is_400() {
        let (status, json) =
            get_json(build_router(test_state()), "/simulate?strategy=moon").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid strategy: moon");
    }

    #[tokio::test]
    async fn test_simulate_custom_uses_parameter_defaults() {
        let (status, json) = get_json(
            build_router(test_state()),
            "/simulate?strategy=custom&rounds=20&seed=5",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.get("target_reached").is_some());
    }

    #[tokio::test]
    async fn test_simulate_same_seed_same_response() {
        let uri = "/simulate?strategy=martingale&rounds=50&seed=7";
        let (_, first) = get_json(build_router(test_state()), uri).await;
        let (_, second) = get_json(build_router(test_state()), uri).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_simulate_with_stats_attached() {
        let (status, json) = get_json(
            build_router(test_state()),
            "/simulate?rounds=100&seed=3&include_stats=true",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["stats"]["mean"].is_number());
        assert!(json["stats"]["max_drawdown"].is_number());
    }

    #[tokio::test]
    async fn test_simulate_realism_reports_perturbations() {
        let (status, json) = get_json(
            build_router(test_state()),
            "/simulate?strategy=martingale&rounds=200&seed=11&realism=true",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["network_errors"].is_u64());
        assert!(json["total_delay"].is_number());
        assert!(json["bet_limit_hits"].is_u64());
    }

    #[tokio::test]
    async fn test_strategies_endpoint() {
        let (status, json) = get_json(build_router(test_state()), "/strategies").await;
        assert_eq!(status, StatusCode::OK);
        let catalog = json.as_array().unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog[0]["id"], "early");
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (status, json) = get_json(build_router(test_state()), "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["service"], "crashsim");
        assert!(json["uptime_secs"].is_i64());
        assert_eq!(json["simulations_served"], 0);
    }
}
