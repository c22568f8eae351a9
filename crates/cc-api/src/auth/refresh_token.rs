use base64::Engine;
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use cc_db::repositories::auth as auth_repo;

use crate::error::ApiError;

/// Generate a random refresh token.
///
/// Returns the token (sent to the client) and its SHA-256 hex digest (stored).
pub fn generate_refresh_token() -> (String, String) {
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill(&mut token_bytes);

    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(token_bytes);
    let token_hash = hash_token(&token);

    (token, token_hash)
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub async fn store_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &str,
    device_info: Option<&str>,
    expiry_days: i64,
) -> Result<Uuid, ApiError> {
    let expires_at = Utc::now() + chrono::Duration::days(expiry_days);

    let token_id =
        auth_repo::store_refresh_token(pool, user_id, token_hash, device_info, expires_at)
            .await?;

    Ok(token_id)
}

/// Verify a refresh token and replace it with a fresh one.
///
/// Returns the owning user and the new plain token. The old token is
/// consumed whether or not it was still valid.
pub async fn verify_and_rotate_refresh_token(
    pool: &PgPool,
    token: &str,
    expiry_days: i64,
) -> Result<(Uuid, String), ApiError> {
    let token_hash = hash_token(token);

    let mut tx = pool.begin().await?;

    let record = auth_repo::find_refresh_token_by_hash(&mut *tx, &token_hash)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid refresh token".to_string()))?;

    auth_repo::delete_refresh_token(&mut *tx, record.id).await?;

    if record.expires_at < Utc::now() {
        tx.commit().await?;
        return Err(ApiError::Auth("Refresh token expired".to_string()));
    }

    let (new_token, new_token_hash) = generate_refresh_token();
    let new_expires_at = Utc::now() + chrono::Duration::days(expiry_days);

    auth_repo::store_refresh_token(
        &mut *tx,
        record.user_id,
        &new_token_hash,
        record.device_info.as_deref(),
        new_expires_at,
    )
    .await?;

    tx.commit().await?;

    Ok((record.user_id, new_token))
}

/// Revoke a specific refresh token
pub async fn revoke_refresh_token(pool: &PgPool, token: &str) -> Result<(), ApiError> {
    let rows = auth_repo::delete_refresh_token_by_hash(pool, &hash_token(token)).await?;

    if rows == 0 {
        return Err(ApiError::Auth("Refresh token not found".to_string()));
    }

    Ok(())
}

/// Delete expired refresh tokens, run periodically by [`crate::jobs`]
pub async fn cleanup_expired_tokens(pool: &PgPool) -> Result<u64, ApiError> {
    let rows = auth_repo::cleanup_expired_refresh_tokens(pool).await?;
    Ok(rows)
}
