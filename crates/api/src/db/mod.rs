mod climate_data;

pub use climate_data::ClimateAccess;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{macros::format_description, Date};
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database file not found: {0}")]
    MissingDatabase(String),
    #[error("Database is missing required table: {0}")]
    MissingTable(String),
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Malformed date: {0}")]
    MalformedDate(String),
    #[error("Failed to parse stored date: {0}")]
    DateParse(#[from] time::error::Parse),
    #[error("Failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
}

/// Read access to the station and measurement tables.
///
/// Every call runs on its own pooled connection, which is handed back to the
/// pool when the call returns.
#[async_trait]
pub trait ClimateData: Send + Sync {
    /// Most recent measurement date, `None` when no measurements exist.
    async fn latest_measurement_date(&self) -> Result<Option<Date>, Error>;
    /// Precipitation readings strictly after `cutoff`, ordered by date then station.
    async fn precipitation_after(&self, cutoff: Date) -> Result<Vec<Precipitation>, Error>;
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    /// Station with the most measurement rows. Ties go to the smallest station code.
    async fn most_active_station(&self) -> Result<Option<StationActivity>, Error>;
    /// Every recorded temperature observation for `station`, ordered by date.
    async fn temperature_observations(
        &self,
        station: &str,
    ) -> Result<Vec<TemperatureObservation>, Error>;
    /// Min, average and max observed temperature for `start..=end`, or from
    /// `start` onwards when `end` is `None`. All fields are `None` when no
    /// measurement falls in the range.
    async fn temperature_stats(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureStats, Error>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Precipitation {
    pub date: String,
    pub prcp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: f64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StationActivity {
    pub station: String,
    pub observations: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TemperatureStats {
    #[serde(rename = "TMIN")]
    pub tmin: Option<f64>,
    #[serde(rename = "TAVE")]
    pub tave: Option<f64>,
    #[serde(rename = "TMAX")]
    pub tmax: Option<f64>,
}

impl TemperatureStats {
    pub fn is_empty(&self) -> bool {
        self.tmin.is_none() && self.tave.is_none() && self.tmax.is_none()
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// The year must be four unsigned digits; `[year]` alone would also take a
/// leading `+` or `-`.
pub fn parse_iso_date(value: &str) -> Result<Date, Error> {
    if value.len() != 10 || !value.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(Error::MalformedDate(value.to_owned()));
    }
    Ok(Date::parse(value, format_description!("[year]-[month]-[day]"))?)
}

/// Format a date the way the measurement table stores it.
pub fn format_iso_date(date: Date) -> Result<String, time::error::Format> {
    date.format(format_description!("[year]-[month]-[day]"))
}
