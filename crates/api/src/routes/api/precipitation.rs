use axum::{extract::State, Json};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use time::{Date, Duration};
use utoipa::ToSchema;

use crate::{db::Precipitation, AppState};

use super::{ApiError, ErrorBody};

/// Length of the precipitation window, counted back from the latest measurement.
pub const PRECIPITATION_WINDOW_DAYS: i64 = 365;

/// Precipitation keyed by date.
///
/// Readings from several stations on the same date collapse into one entry,
/// the last reading in (date, station) order wins.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrecipitationByDate(pub BTreeMap<String, Option<f64>>);

impl FromIterator<Precipitation> for PrecipitationByDate {
    fn from_iter<I: IntoIterator<Item = Precipitation>>(iter: I) -> Self {
        Self(iter.into_iter().map(|p| (p.date, p.prcp)).collect())
    }
}

/// Cutoff date for the precipitation window ending at `latest`.
pub fn year_before(latest: Date) -> Date {
    latest
        .checked_sub(Duration::days(PRECIPITATION_WINDOW_DAYS))
        .unwrap_or(Date::MIN)
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation for dates after the latest measurement date minus 365 days", content_type = "application/json", body = PrecipitationByDate),
        (status = NOT_FOUND, description = "No measurements recorded", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate store", body = ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrecipitationByDate>, ApiError> {
    let latest = state
        .climate_db
        .latest_measurement_date()
        .await?
        .ok_or_else(|| ApiError::NotFound(String::from("No measurements recorded")))?;

    let cutoff = year_before(latest);
    debug!("latest measurement: {}, precipitation cutoff: {}", latest, cutoff);

    let readings = state.climate_db.precipitation_after(cutoff).await?;
    Ok(Json(readings.into_iter().collect()))
}
