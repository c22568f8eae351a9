use axum::{Json, Router, extract::State, routing::get};
use axum_extra::extract::PrivateCookieJar;
use serde::Serialize;

use cc_db::{models::UserProfile, repositories::user as user_repo};

use super::{
    cookies::{self, AUTH_COOKIE, REFRESH_COOKIE},
    jwt,
    middleware::AuthUser,
    refresh_token as rt,
};
use crate::{ApiState, error::ApiError, metrics};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/auth/me", get(auth_me))
        .route("/auth/refresh", get(refresh_token))
        .route("/auth/logout", get(logout))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub message: &'static str,
}

async fn auth_me(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserProfile>, ApiError> {
    // A valid token for a deleted account is still an expired session
    let user = user_repo::find_profile_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("User not found".to_string()))?;

    Ok(Json(user))
}

/// Session recovery: trade the refresh cookie for a new JWT and a rotated
/// refresh token.
async fn refresh_token(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Json<RefreshResponse>), ApiError> {
    let old_refresh_token = jar
        .get(REFRESH_COOKIE)
        .ok_or_else(|| ApiError::Auth("No refresh token found".to_string()))?
        .value()
        .to_owned();

    let rotated = rt::verify_and_rotate_refresh_token(
        &state.pool,
        &old_refresh_token,
        state.refresh_token_expiry_days,
    )
    .await;

    let (user_id, new_refresh_token) = match rotated {
        Ok(rotated) => rotated,
        Err(e) => {
            metrics::record_auth_event("refresh", "cookie", false);
            return Err(e);
        }
    };

    let user = user_repo::find_profile_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("User not found".to_string()))?;

    let new_access_token = jwt::generate_jwt_token(
        user.id,
        user.email,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )?;

    let auth_cookie = cookies::create_auth_cookie(
        new_access_token.clone(),
        &state.environment,
        state.jwt_expiry_hours,
        &state.cookie_domain,
    );
    let refresh_cookie = cookies::create_refresh_token_cookie(
        new_refresh_token,
        &state.environment,
        state.refresh_token_expiry_days,
        &state.cookie_domain,
    );
    let jar = jar.add(auth_cookie).add(refresh_cookie);

    metrics::record_auth_event("refresh", "cookie", true);
    tracing::debug!(user_id = %user_id, "session refreshed");

    Ok((
        jar,
        Json(RefreshResponse {
            token: new_access_token,
            message: "Token refreshed successfully",
        }),
    ))
}

async fn logout(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<serde_json::Value>) {
    if let Some(refresh_cookie) = jar.get(REFRESH_COOKIE)
        && let Err(e) = rt::revoke_refresh_token(&state.pool, refresh_cookie.value()).await
    {
        tracing::debug!(error = %e, "refresh token not revoked on logout");
    }

    let jar = jar
        .remove(cookies::removal_cookie(AUTH_COOKIE, &state.cookie_domain))
        .remove(cookies::removal_cookie(REFRESH_COOKIE, &state.cookie_domain));

    metrics::record_auth_event("logout", "cookie", true);

    (
        jar,
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    )
}
