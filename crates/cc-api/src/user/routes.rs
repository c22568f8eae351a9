use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header::USER_AGENT},
    routing::post,
};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};

use cc_db::{models::UserProfile, repositories::user as user_repo};

use crate::{
    ApiState,
    auth::{cookies, jwt, refresh_token as rt},
    error::ApiError,
    metrics, validation,
};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/users/login", post(login))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const MAX_DEVICE_INFO_LEN: usize = 255;

/// User agent of the login request, stored with the refresh token
fn device_info(headers: &HeaderMap) -> Option<String> {
    let agent = headers.get(USER_AGENT)?.to_str().ok()?.trim();
    if agent.is_empty() {
        return None;
    }
    Some(agent.chars().take(MAX_DEVICE_INFO_LEN).collect())
}

async fn login(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<(PrivateCookieJar, Json<LoginResponse>), ApiError> {
    let email = request.email.trim().to_lowercase();
    validation::validate_email(&email)?;

    let credentials = user_repo::find_credentials_by_email(&state.pool, &email).await?;

    // Same error whether the account is unknown or the password is wrong
    let Some(credentials) = credentials else {
        metrics::record_auth_event("login", "password", false);
        return Err(ApiError::Auth(INVALID_CREDENTIALS.to_string()));
    };

    let password = request.password;
    let hash = credentials.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("password check task failed: {e}")))?
        .map_err(|e| ApiError::Internal(format!("password check failed: {e}")))?;

    if !verified {
        metrics::record_auth_event("login", "password", false);
        return Err(ApiError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let token = jwt::generate_jwt_token(
        credentials.id,
        credentials.email.clone(),
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )?;

    let (refresh_token, refresh_token_hash) = rt::generate_refresh_token();
    rt::store_refresh_token(
        &state.pool,
        credentials.id,
        &refresh_token_hash,
        device_info(&headers).as_deref(),
        state.refresh_token_expiry_days,
    )
    .await?;

    let auth_cookie = cookies::create_auth_cookie(
        token.clone(),
        &state.environment,
        state.jwt_expiry_hours,
        &state.cookie_domain,
    );
    let refresh_cookie = cookies::create_refresh_token_cookie(
        refresh_token.clone(),
        &state.environment,
        state.refresh_token_expiry_days,
        &state.cookie_domain,
    );
    let jar = jar.add(auth_cookie).add(refresh_cookie);

    metrics::record_auth_event("login", "password", true);
    tracing::info!(user_id = %credentials.id, "user logged in");

    Ok((
        jar,
        Json(LoginResponse {
            token,
            refresh_token,
            user: UserProfile {
                id: credentials.id,
                username: credentials.username,
                email: credentials.email,
            },
        }),
    ))
}
