use chrono::Utc;

use crate::error::Result;
use crate::models::{AggregateOp, CalculateParams, RangeParams, Reading, ReadingPayload};
use crate::repositories::ReadingRepository;
use crate::services::auth::AuthGate;
use crate::services::time_range::TimeRange;
use crate::services::validator::{self, SchemaVariant};

#[derive(Clone)]
pub struct ReadingService {
    repository: ReadingRepository,
    auth: AuthGate,
    schema: SchemaVariant,
}

impl ReadingService {
    pub fn new(repository: ReadingRepository, auth: AuthGate, schema: SchemaVariant) -> Self {
        Self {
            repository,
            auth,
            schema,
        }
    }

    pub fn authorize(&self, key: Option<&str>) -> Result<()> {
        self.auth.check(key).inspect_err(|_| {
            tracing::warn!("Rejected upload with invalid auth key");
        })
    }

    /// Validates and stores an upload body. Authorization is checked by the
    /// caller before the body is parsed.
    pub async fn ingest(&self, payload: &ReadingPayload) -> Result<Reading> {
        let new_reading = validator::validate(payload, self.schema).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected reading");
        })?;

        let reading = self.repository.insert(&new_reading).await?;
        tracing::info!(
            id = reading.id,
            temperature = reading.temperature,
            timestamp = %reading.timestamp,
            "Stored reading"
        );

        Ok(reading)
    }

    pub async fn latest(&self) -> Result<Option<Reading>> {
        self.repository.latest().await
    }

    pub async fn list(&self, params: &RangeParams) -> Result<Vec<Reading>> {
        let range = TimeRange::resolve(params, Utc::now())?;
        tracing::debug!(start = %range.start, end = %range.end, "Listing readings");

        self.repository.query_range(&range).await
    }

    /// The operation is checked before the time bounds, so an unsupported
    /// operation is reported even when the bounds are also malformed.
    pub async fn calculate(&self, params: &CalculateParams) -> Result<Option<f64>> {
        let op = AggregateOp::from_param(params.operation.as_deref())?;
        let range = TimeRange::resolve(&params.range(), Utc::now())?;
        tracing::debug!(%op, start = %range.start, end = %range.end, "Calculating aggregate");

        self.repository.aggregate(&range, op).await
    }

    pub async fn health_check(&self) -> Result<()> {
        self.repository.ping().await
    }
}
