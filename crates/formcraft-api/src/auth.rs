//! JWT Authentication
//!
//! Bearer tokens carry the account id. Issuance (login, password
//! verification) belongs to the external credential service that shares
//! this secret; [`create_token`] exists for tests and local seeding.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use formcraft_accounts::AccountId;

use crate::error::ApiError;

const SECRET: &[u8] = b"formcraft-api-secret-key-change-in-production";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: AccountId,
    pub email: String,
    pub exp: usize,
}

pub fn create_token(
    account_id: AccountId,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::days(7))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: account_id,
        email: email.to_string(),
        exp: expiration,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET))
}

pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(SECRET),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Resolve the authenticated account from the Authorization header.
pub fn authenticate(headers: &HeaderMap) -> Result<AccountId, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = verify_token(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
    Ok(claims.sub)
}
