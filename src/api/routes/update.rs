//! Update Route
//!
//! - POST /api/v1/update - Apply a control change and run its handlers
//!
//! The stateless counterpart of the WebSocket session: the client holds the
//! control state and sends it with every change.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{UpdateRequest, UpdateResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// POST /api/v1/update
pub async fn post_update(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateRequest>,
) -> ApiResult<Json<UpdateResponse>> {
    let ctx = &state.context;
    let mut controls = request
        .state
        .unwrap_or_else(|| ctx.default_state().clone());

    let outputs = match (request.control, request.value) {
        (Some(control), Some(value)) => {
            controls.apply(control, &value, ctx.catalog())?;
            state.dispatch.dispatch(ctx, &controls, control)?
        }
        (Some(control), None) => state.dispatch.dispatch(ctx, &controls, control)?,
        (None, Some(_)) => {
            return Err(ApiError::Validation(
                "value given without a control".to_string(),
            ))
        }
        (None, None) => state.dispatch.initial(ctx, &controls)?,
    };

    Ok(Json(UpdateResponse {
        state: controls,
        outputs,
    }))
}
