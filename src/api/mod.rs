//! County Atlas HTTP API
//!
//! HTTP layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Dashboard page
//! - `GET /api/v1/layout` - Page tree as JSON
//!
//! ## Data
//! - `GET /api/v1/datasets` - Dataset catalog
//! - `GET /api/v1/geo/counties` - County boundary document
//!
//! ## Figures
//! - `GET /api/v1/maps/:name` - Cached map figure
//! - `GET /api/v1/scatter?y=&logit=` - Scatter figure, summary and fit
//! - `GET /api/v1/insights/:name` - Narrative text
//! - `POST /api/v1/update` - Apply a control change
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /ws` - Reactive view session
//!
//! # Example
//!
//! ```rust,ignore
//! use county_atlas::api::{serve, AppState};
//! use county_atlas::config::Config;
//! use county_atlas::dashboard::load_context;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default()?;
//!     let context = load_context(&config).await?;
//!     serve(AppState::new(context), &config.server).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::websocket::websocket_handler;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/layout", get(routes::page::layout))
        .route("/datasets", get(routes::datasets::list_datasets))
        .route("/geo/counties", get(routes::datasets::geo_counties))
        .route("/maps/:name", get(routes::figures::get_map))
        .route("/scatter", get(routes::figures::get_scatter))
        .route("/insights/:name", get(routes::figures::get_insight))
        .route("/update", post(routes::update::post_update));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::page::index))
        .route("/ws", get(websocket_handler))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("County Atlas listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("County Atlas shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dashboard::DashboardContext;
    use crate::testing::sample_loaded;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let context = DashboardContext::new(sample_loaded(), &Config::default()).unwrap();
        build_router(AppState::new(context))
    }

    async fn get(uri: &str) -> Response {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(uri: &str, body: &str) -> Response {
        create_test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        assert_eq!(get("/health/live").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        assert_eq!(get("/health/ready").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["datasets"], 4);
        assert_eq!(json["maps"], 4);
        assert_eq!(json["boundary_features"], 3);
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = get("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("The Impact of Student Instruction Spending"));
    }

    #[tokio::test]
    async fn test_layout() {
        let json = json_body(get("/api/v1/layout").await).await;
        assert_eq!(json["element"], "container");
        assert_eq!(json["children"][0]["children"][0]["text"], "Compare Two Maps of the US");
    }

    #[tokio::test]
    async fn test_list_datasets() {
        let json = json_body(get("/api/v1/datasets").await).await;
        let datasets = json["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 4);
        assert_eq!(datasets[0]["role"], "baseline");
        assert_eq!(datasets[0]["records"], 5);
        assert_eq!(datasets[0]["scatter_max"], 15000.0);
        assert_eq!(datasets[1]["role"], "comparison");
    }

    #[tokio::test]
    async fn test_get_map() {
        let response = get("/api/v1/maps/Diabetes%20Percentage,%202019").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"][0]["type"], "choropleth");
        assert_eq!(json["layout"]["coloraxis"]["colorbar"]["ticksuffix"], "%");
    }

    #[tokio::test]
    async fn test_get_map_unknown() {
        let response = get("/api/v1/maps/Nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "DATASET_NOT_FOUND");
        assert!(json["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_get_scatter_defaults() {
        let response = get("/api/v1/scatter").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["dataset"], "Diabetes Percentage, 2019");
        assert_eq!(json["logit"], true);
        assert_eq!(json["observations"], 4);
        assert!(json["summary"]
            .as_str()
            .unwrap()
            .contains("OLS Regression Results"));
    }

    #[tokio::test]
    async fn test_get_scatter_query() {
        let response =
            get("/api/v1/scatter?y=Life%20expectancy,%202014&logit=false").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["logit"], false);
        assert_eq!(json["joined"], 3);
        assert_eq!(json["fit"]["observations"], 3);
    }

    #[tokio::test]
    async fn test_get_scatter_baseline_rejected() {
        let response =
            get("/api/v1/scatter?y=Instruction%20Spending%20Per%20Student,%202018").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_insight() {
        let response = get("/api/v1/insights/Heavy%20Drinking%20Percentage,%202012").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["text"], "Drinking shows no clear pattern.");

        let response = get("/api/v1/insights/Nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "INSIGHT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_geo_counties() {
        let response = get("/api/v1/geo/counties").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/geo+json"
        );
        let json = json_body(response).await;
        assert_eq!(json["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn test_update_initial() {
        let response = post_json("/api/v1/update", "{}").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["outputs"].as_array().unwrap().len(), 5);
        assert_eq!(json["state"]["map_1"], "Instruction Spending Per Student, 2018");
    }

    #[tokio::test]
    async fn test_update_control() {
        let response = post_json(
            "/api/v1/update",
            r#"{"control": "map-2-dropdown", "value": "Life expectancy, 2014"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["state"]["map_2"], "Life expectancy, 2014");
        let outputs = json["outputs"].as_array().unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0]["output"], "map-2");
        assert_eq!(outputs[0]["content"]["kind"], "figure");
    }

    #[tokio::test]
    async fn test_update_invalid_control_value() {
        let response = post_json(
            "/api/v1/update",
            r#"{"control": "logit-radio", "value": "sometimes"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "INVALID_CONTROL");
    }

    #[tokio::test]
    async fn test_update_value_without_control() {
        let response = post_json("/api/v1/update", r#"{"value": true}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_invalid_json() {
        let response = post_json("/api/v1/update", "not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
