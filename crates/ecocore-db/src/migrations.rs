use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS sensor_readings (
            id           TEXT PRIMARY KEY,
            sensor_type  TEXT NOT NULL,
            value        REAL NOT NULL,
            unit         TEXT,
            recorded_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_readings_type_time
            ON sensor_readings(sensor_type, recorded_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
