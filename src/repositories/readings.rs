use crate::db::DbPool;
use crate::error::Result;
use crate::models::{AggregateOp, NewReading, Reading};
use crate::services::time_range::TimeRange;
use chrono::Utc;

#[derive(Clone)]
pub struct ReadingRepository {
    pool: DbPool,
}

impl ReadingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Stores one reading. The id is assigned by the store and a missing
    /// timestamp defaults to the current UTC time.
    pub async fn insert(&self, reading: &NewReading) -> Result<Reading> {
        let timestamp = reading.timestamp.unwrap_or_else(Utc::now);

        let result = sqlx::query(
            r#"
            INSERT INTO readings (temperature, voltage, timestamp_ms)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(reading.temperature)
        .bind(reading.voltage)
        .bind(timestamp.timestamp_millis())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        let stored = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, temperature, voltage, timestamp_ms
            FROM readings
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    pub async fn latest(&self) -> Result<Option<Reading>> {
        let reading = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, temperature, voltage, timestamp_ms
            FROM readings
            ORDER BY timestamp_ms DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(reading)
    }

    pub async fn query_range(&self, range: &TimeRange) -> Result<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, temperature, voltage, timestamp_ms
            FROM readings
            WHERE timestamp_ms >= ? AND timestamp_ms <= ?
            ORDER BY timestamp_ms ASC, id ASC
            "#,
        )
        .bind(range.start.timestamp_millis())
        .bind(range.end.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    /// Returns `None` when no reading falls inside the range.
    pub async fn aggregate(&self, range: &TimeRange, op: AggregateOp) -> Result<Option<f64>> {
        let query = format!(
            "SELECT CAST({}(temperature) AS REAL) FROM readings WHERE timestamp_ms >= ? AND timestamp_ms <= ?",
            op.sql_function()
        );

        let result: Option<f64> = sqlx::query_scalar(&query)
            .bind(range.start.timestamp_millis())
            .bind(range.end.timestamp_millis())
            .fetch_one(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM readings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Connectivity check for the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
