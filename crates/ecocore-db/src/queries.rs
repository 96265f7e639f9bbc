use crate::Database;
use crate::models::{CreatedUser, ReadingInsert, SensorReadingRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    /// Insert a new user. Returns `None` when the username is already taken
    /// (unique constraint), so the caller can map that to a conflict instead
    /// of a generic failure.
    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<CreatedUser>> {
        self.with_conn_mut(|conn| {
            let inserted = conn.query_row(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)
                 RETURNING id, username, created_at",
                (id, username, password_hash),
                |row| {
                    Ok(CreatedUser {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            );

            match inserted {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Sensor readings --

    /// Persist one tick's worth of readings in a single transaction.
    pub fn insert_readings(&self, readings: &[ReadingInsert]) -> Result<()> {
        if readings.is_empty() {
            return Ok(());
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO sensor_readings (id, sensor_type, value, unit)
                     VALUES (?1, ?2, ?3, ?4)",
                )?;
                for r in readings {
                    stmt.execute(rusqlite::params![r.id, r.sensor_type, r.value, r.unit])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Most recent readings, newest first, optionally filtered by sensor type.
    pub fn recent_readings(
        &self,
        sensor_type: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SensorReadingRow>> {
        self.with_conn(|conn| {
            let map_row = |row: &rusqlite::Row<'_>| {
                Ok(SensorReadingRow {
                    id: row.get(0)?,
                    sensor_type: row.get(1)?,
                    value: row.get(2)?,
                    unit: row.get(3)?,
                    recorded_at: row.get(4)?,
                })
            };

            let rows = match sensor_type {
                Some(sensor_type) => {
                    let mut stmt = conn.prepare(
                        "SELECT id, sensor_type, value, unit, recorded_at
                         FROM sensor_readings
                         WHERE sensor_type = ?1
                         ORDER BY recorded_at DESC, id DESC
                         LIMIT ?2",
                    )?;
                    stmt.query_map(rusqlite::params![sensor_type, limit], map_row)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT id, sensor_type, value, unit, recorded_at
                         FROM sensor_readings
                         ORDER BY recorded_at DESC, id DESC
                         LIMIT ?1",
                    )?;
                    stmt.query_map([limit], map_row)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
            };

            Ok(rows)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, created_at FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, created_at FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
