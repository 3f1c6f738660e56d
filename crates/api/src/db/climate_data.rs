use async_trait::async_trait;
use climate_core::is_file;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use time::Date;

use super::{
    format_iso_date, parse_iso_date, ClimateData, Error, Precipitation, Station,
    StationActivity, TemperatureObservation, TemperatureStats,
};

const REQUIRED_TABLES: [&str; 2] = ["station", "measurement"];

pub struct ClimateAccess {
    pool: SqlitePool,
}

impl ClimateAccess {
    /// Opens `database` read-only and verifies it holds the station and
    /// measurement tables.
    pub async fn new(database: &str, max_connections: u32) -> Result<Self, Error> {
        if !is_file(database) {
            return Err(Error::MissingDatabase(database.to_owned()));
        }

        let options = SqliteConnectOptions::new()
            .filename(database)
            .read_only(true)
            .create_if_missing(false)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-16000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        let access = Self { pool };
        access.health_check().await?;
        info!(
            "Climate store opened read-only at: {} (max connections: {})",
            database, max_connections
        );

        Ok(access)
    }

    /// Check connectivity and that the expected tables are present.
    pub async fn health_check(&self) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("SELECT 1").fetch_one(&mut *conn).await?;

        for table in REQUIRED_TABLES {
            let found: Option<(String,)> =
                sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                    .bind(table)
                    .fetch_optional(&mut *conn)
                    .await?;
            if found.is_none() {
                return Err(Error::MissingTable(table.to_owned()));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn latest_measurement_date(&self) -> Result<Option<Date>, Error> {
        let mut conn = self.pool.acquire().await?;
        let latest: Option<(String,)> = sqlx::query_as(
            "SELECT date FROM measurement WHERE date IS NOT NULL ORDER BY date DESC LIMIT 1",
        )
        .fetch_optional(&mut *conn)
        .await?;

        match latest {
            Some((date,)) => Ok(Some(parse_iso_date(&date)?)),
            None => Ok(None),
        }
    }

    async fn precipitation_after(&self, cutoff: Date) -> Result<Vec<Precipitation>, Error> {
        let cutoff = format_iso_date(cutoff)?;
        debug!("querying precipitation after {}", cutoff);

        let mut conn = self.pool.acquire().await?;
        let readings = sqlx::query_as::<_, Precipitation>(
            "SELECT date, CAST(prcp AS REAL) AS prcp
             FROM measurement
             WHERE date > ?
             ORDER BY date, station",
        )
        .bind(cutoff)
        .fetch_all(&mut *conn)
        .await?;

        Ok(readings)
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let mut conn = self.pool.acquire().await?;
        let stations = sqlx::query_as::<_, Station>(
            "SELECT station,
                    name,
                    CAST(latitude AS REAL) AS latitude,
                    CAST(longitude AS REAL) AS longitude,
                    CAST(elevation AS REAL) AS elevation
             FROM station
             ORDER BY rowid",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(stations)
    }

    async fn most_active_station(&self) -> Result<Option<StationActivity>, Error> {
        let mut conn = self.pool.acquire().await?;
        let activity = sqlx::query_as::<_, StationActivity>(
            "SELECT station, COUNT(*) AS observations
             FROM measurement
             WHERE station IS NOT NULL
             GROUP BY station
             ORDER BY observations DESC, station ASC
             LIMIT 1",
        )
        .fetch_optional(&mut *conn)
        .await?;

        Ok(activity)
    }

    async fn temperature_observations(
        &self,
        station: &str,
    ) -> Result<Vec<TemperatureObservation>, Error> {
        let mut conn = self.pool.acquire().await?;
        let observations = sqlx::query_as::<_, TemperatureObservation>(
            "SELECT date, CAST(tobs AS REAL) AS tobs
             FROM measurement
             WHERE station = ? AND tobs IS NOT NULL
             ORDER BY date",
        )
        .bind(station)
        .fetch_all(&mut *conn)
        .await?;

        Ok(observations)
    }

    async fn temperature_stats(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureStats, Error> {
        let start = format_iso_date(start)?;
        let end = end.map(format_iso_date).transpose()?;

        let mut conn = self.pool.acquire().await?;
        // Aggregates over an empty range still yield one row, of NULLs.
        let stats = match end {
            None => {
                sqlx::query_as::<_, TemperatureStats>(
                    "SELECT CAST(MIN(tobs) AS REAL) AS tmin,
                            CAST(AVG(tobs) AS REAL) AS tave,
                            CAST(MAX(tobs) AS REAL) AS tmax
                     FROM measurement
                     WHERE date >= ?",
                )
                .bind(start)
                .fetch_one(&mut *conn)
                .await?
            }
            Some(end) => {
                sqlx::query_as::<_, TemperatureStats>(
                    "SELECT CAST(MIN(tobs) AS REAL) AS tmin,
                            CAST(AVG(tobs) AS REAL) AS tave,
                            CAST(MAX(tobs) AS REAL) AS tmax
                     FROM measurement
                     WHERE date >= ? AND date <= ?",
                )
                .bind(start)
                .bind(end)
                .fetch_one(&mut *conn)
                .await?
            }
        };

        Ok(stats)
    }
}
