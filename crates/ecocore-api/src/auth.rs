use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use ecocore_db::Database;
use ecocore_gateway::Dispatcher;
use ecocore_telemetry::TelemetryStore;
use ecocore_types::api::{
    Claims, LoginRequest, LoginResponse, PublicUser, RegisterRequest, RegisterResponse,
};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub store: Arc<TelemetryStore>,
    pub dispatcher: Dispatcher,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let user_id = Uuid::new_v4();

    // Argon2 hashing is CPU-heavy; run it and the insert off the async runtime
    let db = state.db.clone();
    let username = req.username.clone();
    let password = req.password;
    let created = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {}", e))?
            .to_string();

        db.create_user(&user_id.to_string(), &username, &password_hash)
    })
    .await??
    .ok_or_else(|| ApiError::Conflict("Username already exists".to_string()))?;

    let user = PublicUser {
        id: user_id,
        username: created.username,
        created_at: created.created_at,
    };

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let db = state.db.clone();
    let username = req.username.clone();
    let user = tokio::task::spawn_blocking(move || db.get_user_by_username(&username))
        .await??
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password off the async runtime
    let password = req.password;
    let stored_hash = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&stored_hash)
            .map_err(|e| anyhow!("stored password hash unparseable: {}", e))?;
        Ok::<_, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await??;

    if !verified {
        return Err(ApiError::InvalidCredentials);
    }

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| anyhow!("corrupt user id '{}': {}", user.id, e))?;

    let token = create_token(&state.jwt_secret, state.token_ttl, user_id, &user.username)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: PublicUser {
            id: user_id,
            username: user.username,
            created_at: user.created_at,
        },
        token,
    }))
}

fn create_token(
    secret: &str,
    ttl: chrono::Duration,
    user_id: Uuid,
    username: &str,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
