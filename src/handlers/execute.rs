// Template execution handler

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{domain::ExecutionRequest, error::AppError, AppState};

/// POST /execute/{anchorOrModel}/{templateId}
///
/// The first path segment is only consulted for templates on the dynamic
/// model, where it names the anchor to address.
pub async fn execute_template(
    State(state): State<Arc<AppState>>,
    Path((anchor_or_model, template_id)): Path<(String, String)>,
    Json(request): Json<ExecutionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = state
        .engine
        .execute_template(&anchor_or_model, &template_id, &request)
        .await?;

    // Result bodies are backend or extraction output, passed through verbatim
    Ok(result)
}
