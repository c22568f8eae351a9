//! Access tokens.
//!
//! Short-lived HS256 JWTs carried in the private `auth_token` cookie. The
//! refresh token in [`super::refresh_token`] is what outlives them.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

const ISSUER: &str = "cloudcoder";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn new(user_id: Uuid, email: String, lifetime: TimeDelta) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }
}

/// Sign an access token for `user_id` valid for `expiry_hours`
pub fn generate_jwt_token(
    user_id: Uuid,
    email: String,
    jwt_secret: &str,
    expiry_hours: i64,
) -> Result<String, ApiError> {
    let claims = Claims::new(user_id, email, TimeDelta::hours(expiry_hours));
    let key = EncodingKey::from_secret(jwt_secret.as_bytes());
    Ok(jsonwebtoken::encode(&Header::default(), &claims, &key)?)
}

/// Decode a token signed with `jwt_secret`. Every failure, expiry included,
/// is an authentication error.
pub fn verify_jwt_token(token: &str, jwt_secret: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);

    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "rejected access token");
        ApiError::Auth("Invalid or expired token".to_string())
    })
}
