use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use ecocore_types::api::{Claims, SensorReading};

use crate::auth::AppState;
use crate::error::ApiError;

/// The current snapshot, verbatim. Global state: every authenticated user
/// sees the same thing.
pub async fn initial(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Json<ecocore_types::telemetry::TelemetrySnapshot> {
    debug!("{} fetched the dashboard snapshot", claims.username);
    Json(state.store.snapshot())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub sensor_type: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

/// Persisted tick readings, newest first.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<SensorReading>>, ApiError> {
    let limit = query.limit.min(500);
    let sensor_type = query.sensor_type;

    let db = state.db.clone();
    let rows =
        tokio::task::spawn_blocking(move || db.recent_readings(sensor_type.as_deref(), limit))
            .await??;

    let readings = rows
        .into_iter()
        .map(|row| SensorReading {
            id: row.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt reading id '{}': {}", row.id, e);
                Uuid::default()
            }),
            sensor_type: row.sensor_type,
            value: row.value,
            unit: row.unit,
            recorded_at: row.recorded_at,
        })
        .collect();

    Ok(Json(readings))
}
