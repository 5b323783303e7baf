//! Dataset Routes
//!
//! - GET /api/v1/datasets - Catalog listing
//! - GET /api/v1/geo/counties - The county boundary document

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DatasetSummary, DatasetsResponse};
use crate::api::state::AppState;

/// GET /api/v1/datasets
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<DatasetsResponse> {
    let ctx = &state.context;
    let datasets = ctx
        .catalog()
        .iter()
        .map(|d| DatasetSummary::from(d.as_ref()))
        .collect();

    Json(DatasetsResponse {
        datasets,
        boundary_features: ctx.geo().feature_count(),
        loaded_at: ctx.loaded_at(),
    })
}

/// GET /api/v1/geo/counties
///
/// Map figures reference this route unless the document is embedded.
pub async fn geo_counties(State(state): State<Arc<AppState>>) -> Response {
    let document = state.context.geo_document();
    (
        [(header::CONTENT_TYPE, "application/geo+json")],
        document.as_str().to_owned(),
    )
        .into_response()
}
