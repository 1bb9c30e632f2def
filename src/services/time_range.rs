use chrono::{DateTime, Duration, Utc};

use crate::error::{AppError, Result};
use crate::models::{RangeParams, TimestampInput};

/// Window covered by a range query when `start` is not given.
pub fn default_window() -> Duration {
    Duration::hours(24)
}

/// Inclusive `[start, end]` bounds of a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Every representable instant.
    pub fn unbounded() -> Self {
        Self::new(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC)
    }

    /// Resolves optional wire bounds against `now`. Each missing bound is
    /// defaulted on its own: `start = now - 24h`, `end = now`.
    pub fn resolve(params: &RangeParams, now: DateTime<Utc>) -> Result<Self> {
        let start = match non_empty(params.start.as_deref()) {
            Some(raw) => parse_epoch_millis("start", raw)?,
            None => now - default_window(),
        };
        let end = match non_empty(params.end.as_deref()) {
            Some(raw) => parse_epoch_millis("end", raw)?,
            None => now,
        };

        Ok(Self::new(start, end))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a string holding UTC epoch milliseconds.
pub fn parse_epoch_millis(param: &'static str, raw: &str) -> Result<DateTime<Utc>> {
    let millis: i64 = raw
        .trim()
        .parse()
        .map_err(|_| conversion_error(param, raw))?;

    from_epoch_millis(param, millis)
}

/// Converts epoch milliseconds to a datetime. Sub-second precision is
/// dropped: the seconds are `millis / 1000`, truncated toward zero.
pub fn from_epoch_millis(param: &'static str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(millis / 1000, 0).ok_or_else(|| conversion_error(param, millis))
}

/// Resolves the optional `timestamp` of an upload body.
pub fn resolve_timestamp_input(input: &TimestampInput) -> Result<DateTime<Utc>> {
    match input {
        TimestampInput::Millis(millis) => from_epoch_millis("timestamp", *millis),
        TimestampInput::Text(text) => {
            let text = text.trim();
            if let Ok(millis) = text.parse::<i64>() {
                return from_epoch_millis("timestamp", millis);
            }
            DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| conversion_error("timestamp", text))
        }
    }
}

fn conversion_error(param: &'static str, value: impl ToString) -> AppError {
    AppError::TimestampConversion {
        param,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn params(start: Option<&str>, end: Option<&str>) -> RangeParams {
        RangeParams {
            start: start.map(String::from),
            end: end.map(String::from),
        }
    }

    #[test]
    fn test_resolve_defaults_to_last_day() {
        let range = TimeRange::resolve(&params(None, None), now()).unwrap();

        assert_eq!(range.start, now() - Duration::hours(24));
        assert_eq!(range.end, now());
    }

    #[test]
    fn test_resolve_defaults_independently() {
        let range = TimeRange::resolve(&params(Some("0"), None), now()).unwrap();

        assert_eq!(range.start, Utc.timestamp_opt(0, 0).unwrap());
        assert_eq!(range.end, now());

        let range = TimeRange::resolve(&params(None, Some("1000")), now()).unwrap();

        assert_eq!(range.start, now() - Duration::hours(24));
        assert_eq!(range.end, Utc.timestamp_opt(1, 0).unwrap());
    }

    #[test]
    fn test_resolve_empty_string_is_absent() {
        let range = TimeRange::resolve(&params(Some(""), Some("  ")), now()).unwrap();
        assert_eq!(range, TimeRange::new(now() - Duration::hours(24), now()));
    }

    #[test]
    fn test_resolve_start_after_end_is_not_an_error() {
        let range = TimeRange::resolve(&params(Some("5000"), Some("1000")), now()).unwrap();
        assert_eq!(range.start, Utc.timestamp_opt(5, 0).unwrap());
        assert_eq!(range.end, Utc.timestamp_opt(1, 0).unwrap());
    }

    #[test]
    fn test_epoch_millis_truncates_to_seconds() {
        let dt = parse_epoch_millis("start", "1700000000999").unwrap();
        assert_eq!(dt, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn test_epoch_millis_negative_truncates_toward_zero() {
        let dt = from_epoch_millis("start", -1500).unwrap();
        assert_eq!(dt, Utc.timestamp_opt(-1, 0).unwrap());
    }

    #[test]
    fn test_epoch_millis_rejects_non_integer() {
        for raw in ["abc", "1.5", "1e3", "2024-01-01"] {
            let err = parse_epoch_millis("start", raw).unwrap_err();
            assert!(
                matches!(err, AppError::TimestampConversion { param: "start", .. }),
                "{} should not parse",
                raw
            );
        }
    }

    #[test]
    fn test_epoch_millis_rejects_out_of_range() {
        let err = from_epoch_millis("end", i64::MAX).unwrap_err();
        assert!(matches!(err, AppError::TimestampConversion { param: "end", .. }));

        let err = TimeRange::resolve(&params(None, Some("99999999999999999999")), now()).unwrap_err();
        assert!(matches!(err, AppError::TimestampConversion { param: "end", .. }));
    }

    #[test]
    fn test_timestamp_input_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(
            resolve_timestamp_input(&TimestampInput::Millis(expected.timestamp_millis())).unwrap(),
            expected
        );
        assert_eq!(
            resolve_timestamp_input(&TimestampInput::Text(
                expected.timestamp_millis().to_string()
            ))
            .unwrap(),
            expected
        );
        assert_eq!(
            resolve_timestamp_input(&TimestampInput::Text("2024-01-01T01:00:00+01:00".into()))
                .unwrap(),
            expected
        );
        assert!(resolve_timestamp_input(&TimestampInput::Text("noon".into())).is_err());
    }

    #[test]
    fn test_unbounded_spans_resolved_ranges() {
        let unbounded = TimeRange::unbounded();
        let range = TimeRange::resolve(&params(Some("0"), None), now()).unwrap();

        assert!(unbounded.start <= range.start);
        assert!(range.end <= unbounded.end);
    }
}
