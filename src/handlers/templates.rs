// Template management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{domain::TemplateRequest, error::AppError, AppState};

/// POST /templates
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let template = state.templates.create_template(request).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /templates
pub async fn get_all_templates(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let templates = state.templates.get_all_templates().await?;
    Ok(Json(templates))
}

/// GET /templates/{templateId}
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let template = state.templates.get_template(&template_id).await?;
    Ok(Json(template))
}

/// DELETE /templates/{templateId}
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.templates.delete_template(&template_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
