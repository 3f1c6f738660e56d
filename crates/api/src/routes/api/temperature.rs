use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use time::Date;

use crate::{
    db::{parse_iso_date, TemperatureStats},
    AppState,
};

use super::{ApiError, ErrorBody};

/// Parse a date path segment, rejecting anything that is not `YYYY-MM-DD`.
pub fn parse_path_date(segment: &str) -> Result<Date, ApiError> {
    parse_iso_date(segment).map_err(|_| ApiError::InvalidDate(segment.to_owned()))
}

/// Min/avg/max temperature from a start date onwards
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "Inclusive start date, format YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Temperature stats, null fields when no measurement matches", content_type = "application/json", body = TemperatureStats),
        (status = BAD_REQUEST, description = "Invalid date", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate store", body = ErrorBody)
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<TemperatureStats>, ApiError> {
    let start = parse_path_date(&start)?;
    let stats = state.climate_db.temperature_stats(start, None).await?;
    Ok(Json(stats))
}

/// Min/avg/max temperature between two dates, both inclusive
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "Inclusive start date, format YYYY-MM-DD"),
        ("end" = String, Path, description = "Inclusive end date, format YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Temperature stats, null fields when no measurement matches", content_type = "application/json", body = TemperatureStats),
        (status = BAD_REQUEST, description = "Invalid date", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate store", body = ErrorBody)
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TemperatureStats>, ApiError> {
    let start = parse_path_date(&start)?;
    let end = parse_path_date(&end)?;
    let stats = state.climate_db.temperature_stats(start, Some(end)).await?;
    Ok(Json(stats))
}
