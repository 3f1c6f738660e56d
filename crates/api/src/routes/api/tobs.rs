use axum::{extract::State, Json};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use utoipa::ToSchema;

use crate::{db::TemperatureObservation, AppState};

use super::{ApiError, ErrorBody};

/// Observed temperature keyed by date.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperaturesByDate(pub BTreeMap<String, f64>);

impl FromIterator<TemperatureObservation> for TemperaturesByDate {
    fn from_iter<I: IntoIterator<Item = TemperatureObservation>>(iter: I) -> Self {
        Self(iter.into_iter().map(|o| (o.date, o.tobs)).collect())
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Every temperature observation of the most active station", content_type = "application/json", body = TemperaturesByDate),
        (status = NOT_FOUND, description = "No measurements recorded", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate store", body = ErrorBody)
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TemperaturesByDate>, ApiError> {
    let active = state
        .climate_db
        .most_active_station()
        .await?
        .ok_or_else(|| ApiError::NotFound(String::from("No measurements recorded")))?;
    debug!(
        "most active station: {} ({} observations)",
        active.station, active.observations
    );

    let observations = state
        .climate_db
        .temperature_observations(&active.station)
        .await?;
    Ok(Json(observations.into_iter().collect()))
}
