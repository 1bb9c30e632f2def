use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};

/// A persisted sensor observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub id: i64,
    pub temperature: f64,
    pub voltage: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for Reading {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let timestamp_ms: i64 = row.try_get("timestamp_ms")?;
        let timestamp = DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
            sqlx::Error::Decode(format!("timestamp_ms out of range: {}", timestamp_ms).into())
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            temperature: row.try_get("temperature")?,
            voltage: row.try_get("voltage")?,
            timestamp,
        })
    }
}

/// A reading that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub temperature: f64,
    pub voltage: Option<i64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Upload body as received on the wire. Every field is optional here so that
/// a missing required field becomes a validation error instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingPayload {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub voltage: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<TimestampInput>,
}

/// Epoch milliseconds as a number or numeric string, or an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimestampInput {
    Millis(i64),
    Text(String),
}

/// Version 1 of the reading wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingResponse {
    pub id: i64,
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

impl From<Reading> for ReadingResponse {
    fn from(reading: Reading) -> Self {
        Self {
            id: reading.id,
            temperature: reading.temperature,
            voltage: reading.voltage,
            timestamp: reading.timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub operation: Option<String>,
}

impl CalculateParams {
    pub fn range(&self) -> RangeParams {
        RangeParams {
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadParams {
    pub auth_key: Option<String>,
}

impl UploadParams {
    /// Picks `auth_key` out of raw query pairs. A key that appears more than
    /// once is treated as absent.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut keys = pairs
            .into_iter()
            .filter(|(name, _)| name == "auth_key")
            .map(|(_, value)| value);

        let auth_key = match (keys.next(), keys.next()) {
            (Some(key), None) => Some(key),
            _ => None,
        };

        Self { auth_key }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub result: Option<f64>,
}
