//! Account and subscription endpoints
//!
//! Checkout and webhook verification are delegated to the billing
//! collaborator behind the accounts crate's provider port.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use formcraft_accounts::{AccountDirectory, AccountError, CheckoutSession};

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::models::{UserProfile, WebhookAck};
use crate::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, ApiError> {
    let owner = authenticate(&headers)?;
    let account = state
        .accounts
        .find(&owner)
        .await
        .map_err(ApiError::from)?
        .ok_or(ApiError::Account(AccountError::NotFound))?;
    Ok(Json(UserProfile::from(account)))
}

pub async fn upgrade_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CheckoutSession>, ApiError> {
    let owner = authenticate(&headers)?;
    let session = state.subscriptions.upgrade(&owner).await?;
    Ok(Json(session))
}

pub async fn subscription_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers
        .get("billing-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    state.subscriptions.handle_webhook(&body, signature).await?;
    Ok(Json(WebhookAck { received: true }))
}
