use axum::{extract::State, routing::post, Json, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use voyago_domain::User;
use voyago_store::StoreError;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/logout", post(logout))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: String,
    email: Option<String>,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user_id: Uuid,
    username: String,
}

/// Salted SHA-256, encoded as `base64(salt)$base64(digest)`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = Sha256::digest([&salt[..], password.as_bytes()].concat());
    format!("{}${}", BASE64.encode(salt), BASE64.encode(digest))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (BASE64.decode(salt_b64), BASE64.decode(digest_b64)) else {
        return false;
    };
    let digest = Sha256::digest([salt.as_slice(), password.as_bytes()].concat());
    constant_time_eq::constant_time_eq(digest.as_slice(), expected.as_slice())
}

fn issue_token(state: &AppState, user: &User) -> Result<String, AppError> {
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: if user.is_admin { "ADMIN" } else { "CUSTOMER" }.to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

/// Registration creates the User, its Account (signup credit) and its
/// Traveler identity in one store transaction, then logs the user in.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<AuthResponse>), AppError> {
    if req.username.trim().is_empty() || req.password.len() < 4 {
        return Err(AppError::ValidationError(
            "username must be non-empty and password at least 4 characters".to_string(),
        ));
    }

    let user = state
        .store
        .register_user(
            req.username.trim(),
            req.email,
            hash_password(&req.password),
            false,
        )
        .await
        .map_err(|e| match e {
            StoreError::UsernameTaken(_) => AppError::ConflictError(e.to_string()),
        })?;

    let token = issue_token(&state, &user)?;
    info!(username = %user.username, "user registered");

    Ok((
        axum::http::StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .store
        .find_user_by_username(&req.username)
        .await
        .filter(|u| verify_password(&req.password, &u.password_hash))
        .ok_or_else(|| {
            AppError::AuthenticationError("invalid username or password".to_string())
        })?;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}

/// Tokens are stateless; logout is an acknowledgement and the token
/// simply ages out at its expiry.
async fn logout() -> Json<serde_json::Value> {
    Json(json!({ "status": "logged_out" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let stored = hash_password("hunter22");
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter2", &stored));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        assert_ne!(hash_password("hunter22"), hash_password("hunter22"));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("x", "not-a-hash"));
        assert!(!verify_password("x", "bad$base64!!"));
    }
}
