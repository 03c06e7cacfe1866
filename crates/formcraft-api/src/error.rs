//! API error mapping
//!
//! Translates domain errors into status codes and the JSON shapes the
//! clients rely on. Validation payloads carry per-field detail; quota
//! errors are distinguishable so the UI can render an upgrade prompt;
//! infrastructure failures collapse into a generic server error and
//! never share a shape with validation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use formcraft_accounts::AccountError;
use formcraft_forms::FormsError;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    Forms(FormsError),
    Account(AccountError),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }
}

impl From<FormsError> for ApiError {
    fn from(err: FormsError) -> Self {
        ApiError::Forms(err)
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        ApiError::Account(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, json!({ "message": message }))
            }

            ApiError::Forms(err) => match &err {
                FormsError::Definition(issues) => (
                    StatusCode::BAD_REQUEST,
                    json!({ "message": "Form definition is invalid", "errors": issues }),
                ),
                FormsError::Rejected(errors) => (
                    StatusCode::BAD_REQUEST,
                    json!({ "message": "Submission failed validation", "errors": errors }),
                ),
                FormsError::FormNotFound | FormsError::UnknownFieldKind(_) => {
                    (StatusCode::NOT_FOUND, json!({ "message": "Form not found" }))
                }
                FormsError::OwnerNotFound => (
                    StatusCode::NOT_FOUND,
                    json!({ "message": "Form owner not found" }),
                ),
                FormsError::Expired => (
                    StatusCode::FORBIDDEN,
                    json!({ "message": "This form has expired" }),
                ),
                FormsError::FormLimitReached => {
                    (StatusCode::FORBIDDEN, json!({ "message": err_message(&err) }))
                }
                FormsError::SubmissionLimitReached => (
                    StatusCode::FORBIDDEN,
                    json!({ "message": err_message(&err), "limitReached": true }),
                ),
                FormsError::SlugExhausted
                | FormsError::Storage(_)
                | FormsError::Notification(_) => {
                    tracing::error!(error = %err, "request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "message": "Server error" }),
                    )
                }
            },

            ApiError::Account(err) => match &err {
                AccountError::NotFound => {
                    (StatusCode::NOT_FOUND, json!({ "message": "User not found" }))
                }
                AccountError::DuplicateEmail => (
                    StatusCode::CONFLICT,
                    json!({ "message": "Email already registered" }),
                ),
                AccountError::Billing(message) => {
                    (StatusCode::BAD_REQUEST, json!({ "message": message }))
                }
                AccountError::Storage(_) => {
                    tracing::error!(error = %err, "request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "message": "Server error" }),
                    )
                }
            },
        };

        (status, Json(body)).into_response()
    }
}

fn err_message(err: &FormsError) -> String {
    err.to_string()
}
