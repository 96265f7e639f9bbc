use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- JWT Claims --

/// JWT claims shared between the REST middleware and the token issuer.
/// Canonical definition lives here in ecocore-types to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Identity fields safe to return to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUser,
    pub token: String,
}

// -- Alerts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MuteAlertRequest {
    pub muted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AlertListResponse {
    pub alerts: Vec<crate::telemetry::Alert>,
}

// -- Sensor history --

/// One persisted reading row as returned by the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub id: Uuid,
    pub sensor_type: String,
    pub value: f64,
    pub unit: Option<String>,
    pub recorded_at: String,
}
