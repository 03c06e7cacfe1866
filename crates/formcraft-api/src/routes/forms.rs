//! Owner-facing form endpoints

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use formcraft_forms::{AnalyticsView, FormDefinition, FormDraft, FormId};

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::AppState;

pub async fn create_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<FormDraft>,
) -> Result<(StatusCode, Json<FormDefinition>), ApiError> {
    let owner = authenticate(&headers)?;
    let form = state.forms.create(&owner, draft).await?;
    Ok((StatusCode::CREATED, Json(form)))
}

pub async fn list_forms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FormDefinition>>, ApiError> {
    let owner = authenticate(&headers)?;
    Ok(Json(state.forms.list(&owner).await?))
}

pub async fn get_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(form_id): Path<FormId>,
) -> Result<Json<FormDefinition>, ApiError> {
    let owner = authenticate(&headers)?;
    Ok(Json(state.forms.get(&owner, &form_id).await?))
}

pub async fn update_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(form_id): Path<FormId>,
    Json(draft): Json<FormDraft>,
) -> Result<Json<FormDefinition>, ApiError> {
    let owner = authenticate(&headers)?;
    Ok(Json(state.forms.update(&owner, &form_id, draft).await?))
}

pub async fn delete_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(form_id): Path<FormId>,
) -> Result<Json<MessageResponse>, ApiError> {
    let owner = authenticate(&headers)?;
    state.forms.delete(&owner, &form_id).await?;
    Ok(Json(MessageResponse::new("Form deleted successfully")))
}

pub async fn form_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(form_id): Path<FormId>,
) -> Result<Json<AnalyticsView>, ApiError> {
    let owner = authenticate(&headers)?;
    Ok(Json(state.forms.analytics_view(&owner, &form_id).await?))
}
