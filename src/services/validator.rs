use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{NewReading, ReadingPayload};
use crate::services::time_range::resolve_timestamp_input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Temperature,
    Voltage,
}

impl RequiredField {
    pub fn name(&self) -> &'static str {
        match self {
            RequiredField::Temperature => "temperature",
            RequiredField::Voltage => "voltage",
        }
    }

    fn is_present(&self, payload: &ReadingPayload) -> bool {
        match self {
            RequiredField::Temperature => payload.temperature.is_some_and(f64::is_finite),
            RequiredField::Voltage => payload.voltage.is_some(),
        }
    }
}

/// Which columns a deployment requires on ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    #[default]
    Temperature,
    TemperatureVoltage,
}

impl SchemaVariant {
    pub fn required_fields(&self) -> &'static [RequiredField] {
        match self {
            SchemaVariant::Temperature => &[RequiredField::Temperature],
            SchemaVariant::TemperatureVoltage => {
                &[RequiredField::Temperature, RequiredField::Voltage]
            }
        }
    }
}

/// Checks the variant's required fields and resolves the optional timestamp.
pub fn validate(payload: &ReadingPayload, variant: SchemaVariant) -> Result<NewReading> {
    let missing: Vec<&str> = variant
        .required_fields()
        .iter()
        .filter(|field| !field.is_present(payload))
        .map(RequiredField::name)
        .collect();

    let temperature = match payload.temperature {
        Some(temperature) if missing.is_empty() => temperature,
        _ => {
            return Err(AppError::Validation(format!(
                "Missing {} value",
                missing.join(", ")
            )))
        }
    };

    let timestamp = payload
        .timestamp
        .as_ref()
        .map(resolve_timestamp_input)
        .transpose()?;

    Ok(NewReading {
        temperature,
        voltage: payload.voltage,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimestampInput;
    use chrono::{TimeZone, Utc};

    fn payload(temperature: Option<f64>, voltage: Option<i64>) -> ReadingPayload {
        ReadingPayload {
            temperature,
            voltage,
            timestamp: None,
        }
    }

    #[test]
    fn test_temperature_only_variant() {
        let reading = validate(&payload(Some(21.5), None), SchemaVariant::Temperature).unwrap();

        assert_eq!(reading.temperature, 21.5);
        assert_eq!(reading.voltage, None);
        assert_eq!(reading.timestamp, None);
    }

    #[test]
    fn test_missing_temperature() {
        let err = validate(&payload(None, Some(5)), SchemaVariant::Temperature).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Missing temperature value"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_temperature_is_missing() {
        let err = validate(&payload(Some(f64::NAN), None), SchemaVariant::Temperature).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Missing temperature value"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_temperature_is_present() {
        let reading = validate(&payload(Some(0.0), None), SchemaVariant::Temperature).unwrap();
        assert_eq!(reading.temperature, 0.0);
    }

    #[test]
    fn test_voltage_optional_outside_voltage_variant() {
        let reading = validate(&payload(Some(1.0), Some(3300)), SchemaVariant::Temperature).unwrap();
        assert_eq!(reading.voltage, Some(3300));
    }

    #[test]
    fn test_voltage_variant_requires_voltage() {
        let err =
            validate(&payload(Some(21.0), None), SchemaVariant::TemperatureVoltage).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Missing voltage value"),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = validate(&payload(None, None), SchemaVariant::TemperatureVoltage).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Missing temperature, voltage value"),
            other => panic!("unexpected error: {:?}", other),
        }

        let reading =
            validate(&payload(Some(21.0), Some(0)), SchemaVariant::TemperatureVoltage).unwrap();
        assert_eq!(reading.voltage, Some(0));
    }

    #[test]
    fn test_explicit_timestamp_is_resolved() {
        let mut body = payload(Some(20.0), None);
        body.timestamp = Some(TimestampInput::Millis(1_000_500));

        let reading = validate(&body, SchemaVariant::Temperature).unwrap();
        assert_eq!(reading.timestamp, Some(Utc.timestamp_opt(1000, 0).unwrap()));
    }

    #[test]
    fn test_bad_timestamp_is_conversion_error() {
        let mut body = payload(Some(20.0), None);
        body.timestamp = Some(TimestampInput::Text("later".into()));

        let err = validate(&body, SchemaVariant::Temperature).unwrap_err();
        assert!(matches!(err, AppError::TimestampConversion { param: "timestamp", .. }));
    }
}
