use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use uuid::Uuid;

use super::{cookies::AUTH_COOKIE, jwt::verify_jwt_token};
use crate::{error::ApiError, state::AuthConfig};

/// The caller of a protected route.
///
/// The JWT is taken from the private `auth_token` cookie, or from an
/// `Authorization: Bearer` header for clients without a cookie store. Any
/// missing, expired or tampered token rejects the request with 401
/// `AUTH_REQUIRED`, which browser clients treat as an expired session.
///
/// ```
/// use axum::extract::State;
/// use cc_api::{ApiState, auth::AuthUser, error::ApiError};
///
/// async fn whoami(auth_user: AuthUser, State(_state): State<ApiState>) -> Result<String, ApiError> {
///     Ok(auth_user.user_id.to_string())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    Key: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Auth("Failed to read cookies".to_string()))?;

        let token = match jar.get(AUTH_COOKIE) {
            Some(cookie) => cookie.value().to_owned(),
            None => bearer_token(&parts.headers)
                .ok_or_else(|| ApiError::Auth("Not authenticated".to_string()))?
                .to_owned(),
        };

        let claims = verify_jwt_token(&token, &AuthConfig::from_ref(state).jwt_secret)?;

        Ok(Self {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
