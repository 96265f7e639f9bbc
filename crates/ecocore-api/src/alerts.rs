use axum::{
    Extension, Json,
    extract::{Path, State},
};
use tracing::info;

use ecocore_types::api::{AlertListResponse, Claims, MuteAlertRequest};
use ecocore_types::events::GatewayEvent;
use ecocore_types::telemetry::Alert;

use crate::auth::AppState;
use crate::error::ApiError;

/// Mark an alert acknowledged in the live state and push the updated
/// snapshot to every connected client, so the acknowledgement is not
/// clobbered by the next tick.
pub async fn acknowledge(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Alert>, ApiError> {
    let alert = state
        .store
        .acknowledge_alert(id)
        .ok_or_else(|| ApiError::NotFound("Alert not found".to_string()))?;

    info!("{} acknowledged alert {}", claims.username, id);
    state
        .dispatcher
        .broadcast(GatewayEvent::UpdateData(state.store.snapshot()));

    Ok(Json(alert))
}

pub async fn mute(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<MuteAlertRequest>,
) -> Result<Json<Alert>, ApiError> {
    let alert = state
        .store
        .set_alert_muted(id, req.muted)
        .ok_or_else(|| ApiError::NotFound("Alert not found".to_string()))?;

    info!(
        "{} {} alert {}",
        claims.username,
        if req.muted { "muted" } else { "unmuted" },
        id
    );
    state
        .dispatcher
        .broadcast(GatewayEvent::UpdateData(state.store.snapshot()));

    Ok(Json(alert))
}

/// Unacknowledged critical alerts from the live snapshot.
pub async fn critical(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Json<AlertListResponse> {
    Json(AlertListResponse {
        alerts: state.store.critical_alerts(),
    })
}
