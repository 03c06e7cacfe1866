//! Public form endpoints
//!
//! No authentication; the slug is the address. Gating (publication,
//! expiry, submission caps) happens in the service before any field is
//! looked at.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde_json::{Map, Value};

use formcraft_forms::{PublicForm, SubmissionMeta};

use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::AppState;

pub async fn get_public_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicForm>, ApiError> {
    let form = state.public.fetch(&slug, Utc::now()).await?;
    Ok(Json(form))
}

pub async fn submit_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let meta = SubmissionMeta {
        ip_address: client_ip(&headers),
        user_agent: header_string(&headers, "user-agent"),
        completion_seconds: None,
    };

    state.public.submit(&slug, &payload, meta, Utc::now()).await?;
    Ok(Json(MessageResponse::new("Form submitted successfully")))
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_string(headers, "x-forwarded-for")
        .map(|forwarded| forwarded.split(',').next().unwrap_or("").trim().to_string())
        .filter(|ip| !ip.is_empty())
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
