//! Page Routes
//!
//! - GET / - The dashboard page
//! - GET /api/v1/layout - The page tree as JSON

use axum::{extract::State, response::Html, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::dashboard::{build_layout, render_page, Element};

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&build_layout(&state.context)))
}

/// GET /api/v1/layout
pub async fn layout(State(state): State<Arc<AppState>>) -> Json<Element> {
    Json(build_layout(&state.context))
}
