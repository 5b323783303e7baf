//! Figure Routes
//!
//! - GET /api/v1/maps/:name - Cached map figure
//! - GET /api/v1/scatter?y=&logit= - Scatter figure, summary and fit
//! - GET /api/v1/insights/:name - Narrative text for a dataset

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{InsightResponse, ScatterQuery, ScatterResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::charts::Figure;

/// GET /api/v1/maps/:name
pub async fn get_map(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Arc<Figure>>> {
    Ok(Json(state.context.map(&name)?))
}

/// GET /api/v1/scatter
///
/// Unset parameters fall back to the initial control state. Too few joined
/// counties is a 422.
pub async fn get_scatter(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScatterQuery>,
) -> ApiResult<Json<ScatterResponse>> {
    let defaults = state.context.default_state();
    let dataset = query.y.unwrap_or_else(|| defaults.scatter_y.clone());
    let logit = query.logit.unwrap_or(defaults.logit);

    let output = state.context.scatter(&dataset, logit)?;

    tracing::debug!(
        dataset = %dataset,
        logit,
        observations = output.observations,
        "Scatter built"
    );

    Ok(Json(ScatterResponse {
        dataset,
        logit,
        figure: output.figure,
        summary: output.summary,
        joined: output.joined,
        observations: output.observations,
        excluded: output.excluded,
        fit: output.fit,
    }))
}

/// GET /api/v1/insights/:name
pub async fn get_insight(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<InsightResponse>> {
    let text = state.context.insight(&name)?.to_string();
    Ok(Json(InsightResponse {
        dataset: name,
        text,
    }))
}
