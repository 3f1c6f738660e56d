use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{db::Station, AppState};

use super::{ApiError, ErrorBody};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station with its metadata", content_type = "application/json", body = Vec<Station>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate store", body = ErrorBody)
    ))]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Station>>, ApiError> {
    let stations = state.climate_db.stations().await?;
    Ok(Json(stations))
}
