use crate::helpers::{get, spawn_app, station, MockClimateAccess};
use axum::http::StatusCode;
use climate_api::{
    db::Error, Precipitation, StationActivity, TemperatureObservation, TemperatureStats,
};
use mockall::predicate::eq;
use serde_json::json;
use std::sync::Arc;
use time::{macros::date, Date};

#[tokio::test]
async fn index_lists_available_routes() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;

    let response = get(&test_app, "/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .content_type
        .as_deref()
        .unwrap()
        .starts_with("text/plain"));
    let text = response.text();
    for route in [
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/[start]",
        "/api/v1.0/[start]/[end]",
    ] {
        assert!(text.contains(route), "missing {route}");
    }
}

/// Both readings postdate latest - 365 days, so both are returned
#[tokio::test]
async fn precipitation_covers_year_before_latest_date() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_latest_measurement_date()
        .times(1)
        .returning(|| Ok(Some(date!(2017 - 08 - 24))));
    climate_db
        .expect_precipitation_after()
        .with(eq(date!(2016 - 08 - 24)))
        .times(1)
        .returning(|_| {
            Ok(vec![
                Precipitation {
                    date: String::from("2017-08-20"),
                    prcp: Some(0.5),
                },
                Precipitation {
                    date: String::from("2017-08-24"),
                    prcp: Some(1.2),
                },
            ])
        });

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/precipitation").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "2017-08-20": 0.5, "2017-08-24": 1.2 })
    );
}

#[tokio::test]
async fn precipitation_collapses_duplicate_dates_and_keeps_nulls() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_latest_measurement_date()
        .returning(|| Ok(Some(date!(2017 - 08 - 23))));
    climate_db.expect_precipitation_after().returning(|_| {
        Ok(vec![
            Precipitation {
                date: String::from("2017-08-22"),
                prcp: Some(0.1),
            },
            Precipitation {
                date: String::from("2017-08-22"),
                prcp: Some(0.3),
            },
            Precipitation {
                date: String::from("2017-08-23"),
                prcp: None,
            },
        ])
    });

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/precipitation").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "2017-08-22": 0.3, "2017-08-23": null })
    );
}

#[tokio::test]
async fn precipitation_without_measurements_is_not_found() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_latest_measurement_date()
        .times(1)
        .returning(|| Ok(None));
    climate_db.expect_precipitation_after().times(0);

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/precipitation").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "error": "No measurements recorded" }));
}

#[tokio::test]
async fn stations_preserves_field_names_and_types() {
    let mut climate_db = MockClimateAccess::new();
    climate_db.expect_stations().times(1).returning(|| {
        let mut s = station("USC001", "X");
        s.latitude = 21.3;
        s.longitude = -157.8;
        s.elevation = 3.0;
        Ok(vec![s])
    });

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/stations").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!([{
            "station": "USC001",
            "name": "X",
            "latitude": 21.3,
            "longitude": -157.8,
            "elevation": 3.0
        }])
    );
}

#[tokio::test]
async fn tobs_reports_most_active_station() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_most_active_station()
        .times(1)
        .returning(|| {
            Ok(Some(StationActivity {
                station: String::from("USC00519281"),
                observations: 2772,
            }))
        });
    climate_db
        .expect_temperature_observations()
        .with(eq("USC00519281"))
        .times(1)
        .returning(|_| {
            Ok(vec![
                TemperatureObservation {
                    date: String::from("2010-01-01"),
                    tobs: 70.0,
                },
                TemperatureObservation {
                    date: String::from("2010-01-02"),
                    tobs: 62.0,
                },
            ])
        });

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/tobs").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "2010-01-01": 70.0, "2010-01-02": 62.0 })
    );
}

#[tokio::test]
async fn tobs_without_measurements_is_not_found() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_most_active_station()
        .returning(|| Ok(None));
    climate_db.expect_temperature_observations().times(0);

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/tobs").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn start_date_queries_open_ended_range() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_stats()
        .with(eq(date!(2017 - 08 - 01)), eq(None::<Date>))
        .times(1)
        .returning(|_, _| {
            Ok(TemperatureStats {
                tmin: Some(58.0),
                tave: Some(74.5),
                tmax: Some(87.0),
            })
        });

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/2017-08-01").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "TMIN": 58.0, "TAVE": 74.5, "TMAX": 87.0 })
    );
}

#[tokio::test]
async fn start_and_end_dates_query_closed_range() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_stats()
        .with(eq(date!(2017 - 02 - 28)), eq(Some(date!(2017 - 03 - 05))))
        .times(1)
        .returning(|_, _| {
            Ok(TemperatureStats {
                tmin: Some(64.0),
                tave: Some(72.0),
                tmax: Some(80.0),
            })
        });

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/2017-02-28/2017-03-05").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "TMIN": 64.0, "TAVE": 72.0, "TMAX": 80.0 })
    );
}

#[tokio::test]
async fn date_beyond_data_returns_explicit_nulls() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_stats()
        .with(eq(date!(2099 - 01 - 01)), eq(None::<Date>))
        .times(1)
        .returning(|_, _| Ok(TemperatureStats::default()));

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/2099-01-01").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "TMIN": null, "TAVE": null, "TMAX": null })
    );
}

#[tokio::test]
async fn malformed_dates_are_rejected_before_querying() {
    let mut climate_db = MockClimateAccess::new();
    climate_db.expect_temperature_stats().times(0);

    let test_app = spawn_app(Arc::new(climate_db)).await;

    for uri in [
        "/api/v1.0/yesterday",
        "/api/v1.0/2017-13-01",
        "/api/v1.0/2017-8-1",
        "/api/v1.0/2017-08-01/soon",
        "/api/v1.0/01-08-2017/2017-08-31",
        "/api/v1.0/+2017-08-01",
        "/api/v1.0/-2017-08-01",
        "/api/v1.0/2017-08-01/-2017-08-31",
    ] {
        let response = get(&test_app, uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        let body = response.json();
        assert!(
            body["error"].as_str().unwrap().contains("YYYY-MM-DD"),
            "{uri}: {body}"
        );
    }
}

#[tokio::test]
async fn store_failure_is_a_server_error() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_stations()
        .times(1)
        .returning(|| Err(Error::Query(sqlx::Error::PoolTimedOut)));

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let response = get(&test_app, "/api/v1.0/stations").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({ "error": "Failed to query climate store" })
    );
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;

    let response = get(&test_app, "/api/v1.0/2017-01-01/2017-02-01/extra").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_docs_are_served() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;

    let response = get(&test_app, "/docs").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("/api/v1.0/precipitation"));
}
