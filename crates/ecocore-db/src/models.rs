/// Database row types; these map directly to SQLite rows.
/// Distinct from the ecocore-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

/// Identity fields returned by the insert, without the hash.
pub struct CreatedUser {
    pub id: String,
    pub username: String,
    pub created_at: String,
}

pub struct SensorReadingRow {
    pub id: String,
    pub sensor_type: String,
    pub value: f64,
    pub unit: Option<String>,
    pub recorded_at: String,
}

/// A reading captured from one tick, ready to persist.
pub struct ReadingInsert {
    pub id: String,
    pub sensor_type: String,
    pub value: f64,
    pub unit: Option<String>,
}
