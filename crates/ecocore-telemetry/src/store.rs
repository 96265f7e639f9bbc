use std::sync::RwLock;

use rand::Rng;

use ecocore_types::telemetry::{Alert, AlertLevel, TelemetrySnapshot};

use crate::walk::{bounded_step, creep};

// Per-metric walk parameters: (spread, min, max).
const BATTERY: (f64, f64, f64) = (2.0, 80.0, 90.0);
const SOLAR: (f64, f64, f64) = (100.0, 800.0, 900.0);
const WIND: (f64, f64, f64) = (50.0, 300.0, 350.0);
const TANK_LEVEL: (f64, f64, f64) = (1.0, 55.0, 65.0);
const DAILY_USAGE: (f64, f64, f64) = (2.0, 140.0, 150.0);
const WASTE_TEMP: (f64, f64, f64) = (1.0, 35.0, 40.0);

const COMPOST_MAX_STEP: f64 = 0.5;
const COMPOST_CAP: f64 = 100.0;
const ENERGY_SAVED_MAX_STEP: f64 = 0.1;
const CARBON_OFFSET_MAX_STEP: f64 = 0.05;

/// The one process-wide telemetry state, behind an explicit update interface.
///
/// The snapshot is only ever mutated through `apply_tick`,
/// `acknowledge_alert`, and `set_alert_muted`; everything else gets clones.
/// Each mutation holds the write lock for its whole duration, so readers
/// always observe a fully pre- or post-tick snapshot.
pub struct TelemetryStore {
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    snapshot: TelemetrySnapshot,
    /// Compost progress with its fractional part intact. The displayed value
    /// is this rounded; rounding the stored value each tick instead would
    /// silently discard every sub-0.5 increment and freeze progress.
    compost_acc: f64,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::from_snapshot(TelemetrySnapshot::baseline())
    }

    pub fn from_snapshot(snapshot: TelemetrySnapshot) -> Self {
        let compost_acc = snapshot.waste.compost_progress as f64;
        Self {
            inner: RwLock::new(StoreInner {
                snapshot,
                compost_acc,
            }),
        }
    }

    /// Current state, cloned.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.read().snapshot.clone()
    }

    /// Advance every simulated metric by one tick and return the new state.
    pub fn apply_tick(&self) -> TelemetrySnapshot {
        self.apply_tick_with(&mut rand::rng())
    }

    /// Tick with a caller-supplied RNG so tests can drive it deterministically.
    pub fn apply_tick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> TelemetrySnapshot {
        let mut inner = self.write();

        let energy = &mut inner.snapshot.energy;
        energy.battery = bounded_step(rng, energy.battery, BATTERY.0, BATTERY.1, BATTERY.2);
        energy.solar = bounded_step(rng, energy.solar, SOLAR.0, SOLAR.1, SOLAR.2);
        energy.wind = bounded_step(rng, energy.wind, WIND.0, WIND.1, WIND.2);

        let water = &mut inner.snapshot.water;
        water.tank_level = bounded_step(
            rng,
            water.tank_level,
            TANK_LEVEL.0,
            TANK_LEVEL.1,
            TANK_LEVEL.2,
        );
        water.daily_usage = bounded_step(
            rng,
            water.daily_usage,
            DAILY_USAGE.0,
            DAILY_USAGE.1,
            DAILY_USAGE.2,
        );

        inner.snapshot.waste.temperature = bounded_step(
            rng,
            inner.snapshot.waste.temperature,
            WASTE_TEMP.0,
            WASTE_TEMP.1,
            WASTE_TEMP.2,
        );

        if inner.compost_acc < COMPOST_CAP {
            inner.compost_acc =
                (inner.compost_acc + rng.random_range(0.0..COMPOST_MAX_STEP)).min(COMPOST_CAP);
        }
        inner.snapshot.waste.compost_progress = inner.compost_acc.round().min(COMPOST_CAP) as i64;

        let eco = &mut inner.snapshot.eco_score;
        eco.weekly_energy_saved = creep(rng, eco.weekly_energy_saved, ENERGY_SAVED_MAX_STEP);
        eco.carbon_offset = creep(rng, eco.carbon_offset, CARBON_OFFSET_MAX_STEP);

        inner.snapshot.clone()
    }

    /// Mark an alert acknowledged. Returns the updated alert, or `None` if no
    /// alert has that id.
    pub fn acknowledge_alert(&self, id: u32) -> Option<Alert> {
        let mut inner = self.write();
        let alert = inner.snapshot.alerts.iter_mut().find(|a| a.id == id)?;
        alert.acknowledged = true;
        Some(alert.clone())
    }

    /// Set an alert's muted flag. Returns the updated alert, or `None` if no
    /// alert has that id.
    pub fn set_alert_muted(&self, id: u32, muted: bool) -> Option<Alert> {
        let mut inner = self.write();
        let alert = inner.snapshot.alerts.iter_mut().find(|a| a.id == id)?;
        alert.muted = muted;
        Some(alert.clone())
    }

    /// Unacknowledged critical alerts from the live snapshot.
    pub fn critical_alerts(&self) -> Vec<Alert> {
        self.read()
            .snapshot
            .alerts
            .iter()
            .filter(|a| a.level == AlertLevel::Critical && !a.acknowledged)
            .cloned()
            .collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        self.inner.read().expect("telemetry lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().expect("telemetry lock poisoned")
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ticked_metrics_hold_their_bands() {
        let store = TelemetryStore::new();
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..1000 {
            let snap = store.apply_tick_with(&mut rng);
            assert!((80..=90).contains(&snap.energy.battery));
            assert!((800..=900).contains(&snap.energy.solar));
            assert!((300..=350).contains(&snap.energy.wind));
            assert!((55..=65).contains(&snap.water.tank_level));
            assert!((140..=150).contains(&snap.water.daily_usage));
            assert!((35..=40).contains(&snap.waste.temperature));
        }
    }

    #[test]
    fn compost_progress_is_monotonic_and_capped() {
        let store = TelemetryStore::new();
        let mut rng = StdRng::seed_from_u64(5);

        let mut previous = store.snapshot().waste.compost_progress;
        for _ in 0..1000 {
            let snap = store.apply_tick_with(&mut rng);
            assert!(snap.waste.compost_progress >= previous);
            assert!(snap.waste.compost_progress <= 100);
            previous = snap.waste.compost_progress;
        }
        // ~0.25 mean step per tick: 1000 ticks is plenty to reach the cap.
        assert_eq!(previous, 100);

        let after = store.apply_tick_with(&mut rng).waste.compost_progress;
        assert_eq!(after, 100);
    }

    #[test]
    fn eco_score_only_grows() {
        let store = TelemetryStore::new();
        let mut rng = StdRng::seed_from_u64(11);

        let baseline = store.snapshot().eco_score;
        let mut prev_saved = baseline.weekly_energy_saved;
        let mut prev_offset = baseline.carbon_offset;
        for _ in 0..500 {
            let snap = store.apply_tick_with(&mut rng);
            assert!(snap.eco_score.weekly_energy_saved >= prev_saved);
            assert!(snap.eco_score.carbon_offset >= prev_offset);
            prev_saved = snap.eco_score.weekly_energy_saved;
            prev_offset = snap.eco_score.carbon_offset;
        }
        assert!(prev_saved > baseline.weekly_energy_saved);
    }

    #[test]
    fn static_fields_never_move() {
        let store = TelemetryStore::new();
        let mut rng = StdRng::seed_from_u64(23);
        let before = store.snapshot();

        for _ in 0..50 {
            store.apply_tick_with(&mut rng);
        }

        let after = store.snapshot();
        assert_eq!(after.energy.daily_production, before.energy.daily_production);
        assert_eq!(
            after.energy.weekly_production,
            before.energy.weekly_production
        );
        assert_eq!(after.water.weekly_usage, before.water.weekly_usage);
        assert_eq!(after.water.filter_status, before.water.filter_status);
        assert_eq!(after.waste.status, before.waste.status);
        assert_eq!(after.waste.last_emptied, before.waste.last_emptied);
        assert_eq!(after.eco_score.eco_rating, before.eco_score.eco_rating);
        assert_eq!(after.controls.heater, before.controls.heater);
    }

    #[test]
    fn acknowledgement_survives_ticks() {
        let store = TelemetryStore::new();
        let mut rng = StdRng::seed_from_u64(8);

        let acked = store.acknowledge_alert(1).unwrap();
        assert!(acked.acknowledged);

        for _ in 0..10 {
            store.apply_tick_with(&mut rng);
        }

        let snap = store.snapshot();
        let alert = snap.alerts.iter().find(|a| a.id == 1).unwrap();
        assert!(alert.acknowledged);
    }

    #[test]
    fn unknown_alert_id_is_none() {
        let store = TelemetryStore::new();
        assert!(store.acknowledge_alert(404).is_none());
        assert!(store.set_alert_muted(404, true).is_none());
    }

    #[test]
    fn critical_alerts_exclude_acknowledged() {
        let store = TelemetryStore::new();

        let critical = store.critical_alerts();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].id, 2);

        store.acknowledge_alert(2).unwrap();
        assert!(store.critical_alerts().is_empty());
    }
}
