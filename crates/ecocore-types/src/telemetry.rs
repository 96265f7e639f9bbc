use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The full dashboard state pushed to clients. Field names serialize in
/// camelCase; this is the wire format the dashboard consumes.
///
/// Exactly one live instance exists per server process, owned by the
/// telemetry store. A restart resets it to [`TelemetrySnapshot::baseline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    pub energy: EnergyReadings,
    pub water: WaterReadings,
    pub waste: WasteReadings,
    pub alerts: Vec<Alert>,
    pub controls: Controls,
    pub eco_score: EcoScore,
}

/// Display metrics (battery, solar, wind) hold integer values; the tick walk
/// rounds them every step. Production totals are static reference figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyReadings {
    /// Battery charge, percent.
    pub battery: i64,
    /// Solar output, watts.
    pub solar: i64,
    /// Wind output, watts.
    pub wind: i64,
    pub daily_production: f64,
    pub weekly_production: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterReadings {
    /// Greywater tank level, percent.
    pub tank_level: i64,
    pub filter_status: String,
    /// Litres used today.
    pub daily_usage: i64,
    pub weekly_usage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteReadings {
    /// Compost core temperature, degrees C.
    pub temperature: i64,
    pub status: String,
    pub last_emptied: NaiveDate,
    /// Monotonic 0..=100; holds at 100 once reached.
    pub compost_progress: i64,
}

/// Mock control switches. These ride along in the snapshot but nothing
/// server-side mutates them; toggles are client-local.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub heater: bool,
    pub greywater: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoScore {
    /// kWh saved this week; grows a little every tick, one decimal.
    pub weekly_energy_saved: f64,
    /// kg CO2 offset; grows a little every tick, one decimal.
    pub carbon_offset: f64,
    pub eco_rating: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: u32,
    pub level: AlertLevel,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub acknowledged: bool,
    pub muted: bool,
}

impl TelemetrySnapshot {
    /// The hardcoded seed state every fresh server process starts from.
    pub fn baseline() -> Self {
        Self {
            energy: EnergyReadings {
                battery: 84,
                solar: 850,
                wind: 310,
                daily_production: 18.5,
                weekly_production: 125.8,
            },
            water: WaterReadings {
                tank_level: 60,
                filter_status: "OK".to_string(),
                daily_usage: 145,
                weekly_usage: 987,
            },
            waste: WasteReadings {
                temperature: 38,
                status: "Active Composting".to_string(),
                last_emptied: seed_date(2025, 6, 20),
                compost_progress: 75,
            },
            alerts: vec![
                Alert {
                    id: 1,
                    level: AlertLevel::Warning,
                    message: "Greywater tank low – check filter system".to_string(),
                    timestamp: seed_timestamp(2025, 6, 26, 21, 30),
                    acknowledged: false,
                    muted: false,
                },
                Alert {
                    id: 2,
                    level: AlertLevel::Critical,
                    message: "Compost fan needs restart – temperature rising".to_string(),
                    timestamp: seed_timestamp(2025, 6, 26, 20, 15),
                    acknowledged: false,
                    muted: false,
                },
                Alert {
                    id: 3,
                    level: AlertLevel::Info,
                    message: "Solar panel cleaning recommended for optimal efficiency"
                        .to_string(),
                    timestamp: seed_timestamp(2025, 6, 26, 18, 45),
                    acknowledged: true,
                    muted: false,
                },
            ],
            controls: Controls {
                heater: false,
                greywater: false,
            },
            eco_score: EcoScore {
                weekly_energy_saved: 42.5,
                carbon_offset: 28.3,
                eco_rating: "Excellent".to_string(),
                achievements: vec![
                    "Solar Warrior".to_string(),
                    "Water Saver".to_string(),
                    "Green Guardian".to_string(),
                ],
            },
        }
    }
}

fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

fn seed_timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
    seed_date(year, month, day)
        .and_hms_opt(hour, min, 0)
        .expect("valid seed time")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(TelemetrySnapshot::baseline()).unwrap();

        assert_eq!(json["energy"]["battery"], 84);
        assert_eq!(json["energy"]["dailyProduction"], 18.5);
        assert_eq!(json["water"]["tankLevel"], 60);
        assert_eq!(json["waste"]["compostProgress"], 75);
        assert_eq!(json["waste"]["lastEmptied"], "2025-06-20");
        assert_eq!(json["ecoScore"]["weeklyEnergySaved"], 42.5);
        assert_eq!(json["alerts"][0]["level"], "warning");
        assert_eq!(json["alerts"][0]["timestamp"], "2025-06-26T21:30:00");
        assert_eq!(json["controls"]["heater"], false);
    }
}
