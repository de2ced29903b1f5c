//! Bearer token authentication for the Kinship API

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kinship::{KinshipError, models::UserId};
use serde::{Deserialize, Serialize};

use crate::{error::ServerError, state::AppState};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Issued at timestamp
    pub iat: usize,
    /// Expiration timestamp
    pub exp: usize,
}

/// Identity of the caller, resolved from the bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl CurrentUser {
    pub fn id(&self) -> &UserId {
        &self.0
    }
}

/// Authentication middleware
///
/// Resolves the caller and stores a [`CurrentUser`] in the request
/// extensions. Requests without a valid token never reach the handler.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let current_user = current_user_from_headers(&headers, &state.config.jwt_secret)?;

    tracing::debug!(
        user_id = %current_user.id(),
        path = request.uri().path(),
        "Authenticated request"
    );

    request.extensions_mut().insert(current_user);
    Ok(next.run(request).await)
}

/// Resolve the caller from an `Authorization: Bearer` header
pub fn current_user_from_headers(
    headers: &HeaderMap,
    secret: &str,
) -> Result<CurrentUser, ServerError> {
    let auth_header = headers.typed_get::<Authorization<Bearer>>().ok_or_else(|| {
        KinshipError::Unauthenticated("missing bearer token".to_string())
    })?;

    validate_jwt_token(auth_header.token(), secret)
}

/// Validate a JWT token and return the caller it names
pub fn validate_jwt_token(token: &str, secret: &str) -> Result<CurrentUser, ServerError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        KinshipError::Unauthenticated("invalid bearer token".to_string())
    })?;

    let user_id = UserId::parse(&token_data.claims.sub).map_err(|_| {
        KinshipError::Unauthenticated("token subject is not a valid user id".to_string())
    })?;

    Ok(CurrentUser(user_id))
}

/// Generate a JWT token for a user
///
/// Returns the token and its expiry as a unix timestamp.
pub fn generate_jwt_token(
    user_id: &UserId,
    secret: &str,
    expiration_hours: u64,
) -> Result<(String, i64), ServerError> {
    let now = chrono::Utc::now().timestamp() as usize;
    let exp = now + (expiration_hours * 3600) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp,
    };

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let token = encode(&Header::new(Algorithm::HS256), &claims, &encoding_key)
        .map_err(|e| ServerError::Internal(format!("Failed to generate token: {}", e)))?;

    Ok((token, exp as i64))
}
