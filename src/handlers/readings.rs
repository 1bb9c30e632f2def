use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Json,
};

use crate::error::{AppError, Result};
use crate::models::{
    CalculateParams, CalculateResponse, RangeParams, ReadingPayload, ReadingResponse,
    UploadParams,
};
use crate::services::ReadingService;

/// GET /
/// Returns the most recent reading
pub async fn get_latest(State(service): State<ReadingService>) -> Result<Json<ReadingResponse>> {
    let reading = service
        .latest()
        .await?
        .ok_or_else(|| AppError::NotFound("No readings found".to_string()))?;

    Ok(Json(reading.into()))
}

/// GET /data
/// Readings between `start` and `end` (epoch ms), the last 24h by default
pub async fn list(
    State(service): State<ReadingService>,
    query: std::result::Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<Vec<ReadingResponse>>> {
    let Query(params) = query?;
    let readings = service.list(&params).await?;
    Ok(Json(readings.into_iter().map(Into::into).collect()))
}

/// GET /data/calculate
pub async fn calculate(
    State(service): State<ReadingService>,
    query: std::result::Result<Query<CalculateParams>, QueryRejection>,
) -> Result<Json<CalculateResponse>> {
    let Query(params) = query?;
    let result = service.calculate(&params).await?;
    Ok(Json(CalculateResponse { result }))
}

/// POST /upload
/// Auth key first, then content type, then the body itself. The query is
/// read as raw pairs so a malformed query string still ends in a 401.
pub async fn upload(
    State(service): State<ReadingService>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ReadingResponse>)> {
    let params = query
        .map(|Query(pairs)| UploadParams::from_pairs(pairs))
        .unwrap_or_default();
    service.authorize(params.auth_key.as_deref())?;

    if !is_json_content_type(&headers) {
        return Err(AppError::UnsupportedContentType);
    }

    let payload: ReadingPayload = serde_json::from_slice(&body)?;
    let reading = service.ingest(&payload).await?;

    Ok((StatusCode::CREATED, Json(reading.into())))
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn test_json_content_type() {
        assert!(is_json_content_type(&headers(Some("application/json"))));
        assert!(is_json_content_type(&headers(Some(
            "application/json; charset=utf-8"
        ))));
        assert!(is_json_content_type(&headers(Some("Application/JSON"))));
    }

    #[test]
    fn test_non_json_content_type() {
        assert!(!is_json_content_type(&headers(None)));
        assert!(!is_json_content_type(&headers(Some("text/plain"))));
        assert!(!is_json_content_type(&headers(Some(
            "application/x-www-form-urlencoded"
        ))));
        assert!(!is_json_content_type(&headers(Some("application/jsonp"))));
    }
}
