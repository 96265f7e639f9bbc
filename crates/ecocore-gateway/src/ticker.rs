use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use ecocore_db::Database;
use ecocore_db::models::ReadingInsert;
use ecocore_telemetry::TelemetryStore;
use ecocore_types::events::GatewayEvent;
use ecocore_types::telemetry::TelemetrySnapshot;

use crate::dispatcher::Dispatcher;

/// The tick loop: every `period`, advance the simulated metrics, push the
/// full snapshot to every connected client, and persist the readings.
///
/// Every client receives every tick unconditionally; there are no
/// per-client subscriptions and no delta updates. A failed persist is logged
/// and dropped, and the feed does not retry or stall.
pub async fn run(
    store: Arc<TelemetryStore>,
    dispatcher: Dispatcher,
    db: Arc<Database>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    // The first interval tick fires immediately; consume it so the baseline
    // snapshot stays up for one full period.
    interval.tick().await;

    loop {
        interval.tick().await;

        let snapshot = store.apply_tick();
        dispatcher.broadcast(GatewayEvent::UpdateData(snapshot.clone()));
        debug!(
            "broadcast telemetry tick ({} clients)",
            dispatcher.client_count()
        );

        // Persist this tick's readings off the async runtime
        let rows = reading_rows(&snapshot);
        let db = db.clone();
        match tokio::task::spawn_blocking(move || db.insert_readings(&rows)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to persist tick readings: {}", e),
            Err(e) => warn!("Reading persist task panicked: {}", e),
        }
    }
}

/// The simulated metrics worth keeping as history, one row each.
fn reading_rows(snapshot: &TelemetrySnapshot) -> Vec<ReadingInsert> {
    let metrics: [(&str, f64, Option<&str>); 7] = [
        ("battery", snapshot.energy.battery as f64, Some("%")),
        ("solar", snapshot.energy.solar as f64, Some("W")),
        ("wind", snapshot.energy.wind as f64, Some("W")),
        ("tank_level", snapshot.water.tank_level as f64, Some("%")),
        ("daily_usage", snapshot.water.daily_usage as f64, Some("L")),
        (
            "waste_temperature",
            snapshot.waste.temperature as f64,
            Some("C"),
        ),
        (
            "compost_progress",
            snapshot.waste.compost_progress as f64,
            Some("%"),
        ),
    ];

    metrics
        .into_iter()
        .map(|(sensor_type, value, unit)| ReadingInsert {
            id: Uuid::new_v4().to_string(),
            sensor_type: sensor_type.to_string(),
            value,
            unit: unit.map(str::to_string),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tracked_metric_becomes_a_row() {
        let rows = reading_rows(&TelemetrySnapshot::baseline());
        assert_eq!(rows.len(), 7);

        let battery = rows.iter().find(|r| r.sensor_type == "battery").unwrap();
        assert_eq!(battery.value, 84.0);
        assert_eq!(battery.unit.as_deref(), Some("%"));
    }

    #[tokio::test]
    async fn tick_loop_broadcasts_and_persists() {
        let store = Arc::new(TelemetryStore::new());
        let dispatcher = Dispatcher::new();
        let db = Arc::new(Database::open_in_memory().unwrap());
        let mut rx = dispatcher.subscribe();

        let handle = tokio::spawn(run(
            store.clone(),
            dispatcher.clone(),
            db.clone(),
            Duration::from_millis(10),
        ));

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no tick within timeout")
            .unwrap();
        let GatewayEvent::UpdateData(snapshot) = event else {
            panic!("expected update-data");
        };
        assert!((80..=90).contains(&snapshot.energy.battery));

        // The loop persists a tick's rows before broadcasting the next one,
        // so after a second event the first tick is durably stored.
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no second tick within timeout")
            .unwrap();

        handle.abort();

        let readings = db.recent_readings(None, 100).unwrap();
        assert!(readings.len() >= 7);
    }
}
