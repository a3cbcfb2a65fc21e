#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for flood hazard outlook verification.
//!
//! Loads the forecast, storm report and warning archive once at startup,
//! then serves the verification API and the static map frontend. Every
//! request reads the same immutable dataset; verification runs on the
//! blocking thread pool since it is CPU bound.

pub mod api;
pub mod config;
pub mod geometry;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use fho_verify_ingest::IngestError;
use fho_verify_server_models::ApiError;
use fho_verify_verification::VerificationDataset;
use thiserror::Error;

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// The reference tables, shared read-only by every request.
    pub dataset: Arc<VerificationDataset>,
}

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The archive could not be loaded or configured.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Binding or serving failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Malformed or incomplete request bodies get the same `{"error": ...}`
/// shape as validation failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ApiError::new(&err));
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .route("/health", web::get().to(handlers::health))
            .route("/available-dates", web::get().to(handlers::available_dates))
            .route("/stats", web::post().to(handlers::stats))
            .route("/ibw-stats", web::post().to(handlers::ibw_stats))
            .route(
                "/high-impact-events",
                web::get().to(handlers::high_impact_events),
            ),
    );
}

/// Starts the verification API server.
///
/// Loads the archive described by the environment, then starts the
/// Actix-Web HTTP server. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// * If the archive cannot be loaded
/// * If the HTTP server fails to bind or encounters a runtime error
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env()?;

    log::info!("Loading verification data...");
    let dataset = fho_verify_ingest::load_dataset(&config.catalog)?;

    let state = web::Data::new(AppState {
        dataset: Arc::new(dataset),
    });
    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::NaiveDate;
    use fho_verify_event_models::{Attributes, IntervalEvent, PointEvent, SeverityTag};
    use fho_verify_forecast_models::{ForecastPeriod, ForecastPolygon, ImpactLevel, IssuanceTime};
    use geo::{MultiPolygon, Point, polygon};
    use serde_json::{Value, json};

    fn square(min_x: f64, min_y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: min_x, y: min_y),
            (x: min_x + size, y: min_y),
            (x: min_x + size, y: min_y + size),
            (x: min_x, y: min_y + size),
            (x: min_x, y: min_y),
        ]])
    }

    fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn forecast(impact_level: ImpactLevel) -> ForecastPolygon {
        ForecastPolygon {
            issuance_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            issuance_time: IssuanceTime::Am,
            forecast_period: ForecastPeriod::OneToThree,
            impact_level,
            geometry: square(-98.0, 35.0, 1.0),
        }
    }

    fn state() -> web::Data<AppState> {
        let mut attributes = Attributes::new();
        attributes.insert("CITY".to_string(), json!("Norman"));

        let dataset = VerificationDataset::new(
            vec![
                forecast(ImpactLevel::Limited),
                forecast(ImpactLevel::Catastrophic),
            ],
            vec![PointEvent {
                valid: at(2, 10),
                geometry: Point::new(-97.5, 35.5),
                event: "FLASH FLOOD".to_string(),
                attributes,
            }],
            vec![IntervalEvent {
                issued: at(2, 1),
                expired: at(2, 4),
                geometry: square(-97.8, 35.2, 0.2),
                phenomenon: "FF".to_string(),
                severity: Some(SeverityTag::Considerable),
                attributes: Attributes::new(),
            }],
        );

        web::Data::new(AppState {
            dataset: Arc::new(dataset),
        })
    }

    async fn get(uri: &str) -> (StatusCode, Value) {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let (status, body) = get("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn lists_available_dates() {
        let (status, body) = get("/api/available-dates").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["2023-06-01"]));
    }

    #[actix_web::test]
    async fn stats_for_default_range() {
        let (status, body) = post(
            "/api/stats",
            json!({
                "issuance_date": "2023-06-01",
                "end_date": "",
                "issuance": "00Z",
                "forecast_period": "1-3"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let statistics = &body["statistics"];
        assert_eq!(statistics["total_days"], 3);
        assert_eq!(statistics["lsr_hits"], 1);
        assert_eq!(statistics["ffw_hits"], 1);
        assert_eq!(statistics["pod"], 1.0);
        assert_eq!(
            statistics["days_included"],
            json!(["2023-06-01", "2023-06-02", "2023-06-03"])
        );

        let geometries = &body["geometries"];
        assert_eq!(geometries["fho"]["type"], "Feature");
        let hit = &geometries["lsrs_hit"]["features"][0];
        assert_eq!(hit["properties"]["CITY"], "Norman");
        assert!(hit["properties"]["summary"]
            .as_str()
            .unwrap()
            .contains("FLASH FLOOD at Norman"));
        assert_eq!(geometries["ffws_miss"]["features"], json!([]));

        assert_eq!(body["pod_analysis"]["total_polygons"], 1);
        assert_eq!(body["pod_analysis"]["polygons_meeting_threshold"], 1);
        assert_eq!(body["pod_analysis"]["threshold_value"], 0.7);
    }

    #[actix_web::test]
    async fn stats_without_forecast_has_empty_layers() {
        let (status, body) = post(
            "/api/stats",
            json!({
                "issuance_date": "2023-06-01",
                "issuance": "12Z",
                "forecast_period": "1-3"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["geometries"]["fho"]["type"], "FeatureCollection");
        assert_eq!(body["statistics"]["pod"], 0.0);
        assert_eq!(body["pod_analysis"]["threshold_percentage"], 0.0);
    }

    #[actix_web::test]
    async fn end_before_start_is_bad_request() {
        let (status, body) = post(
            "/api/stats",
            json!({
                "issuance_date": "2023-06-05",
                "end_date": "2023-06-01",
                "issuance": "00Z",
                "forecast_period": "1-3"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid date range"));
    }

    #[actix_web::test]
    async fn unknown_period_is_bad_request() {
        let (status, body) = post(
            "/api/stats",
            json!({
                "issuance_date": "2023-06-01",
                "issuance": "00Z",
                "forecast_period": "8-14"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("8-14"));
    }

    #[actix_web::test]
    async fn missing_field_is_bad_request() {
        let (status, body) = post("/api/stats", json!({"issuance": "00Z"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn ibw_stats_default_to_considerable() {
        let (status, body) = post(
            "/api/ibw-stats",
            json!({
                "issuance_date": "2023-06-01",
                "issuance": "am",
                "forecast_period": "1-3"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statistics"]["hits"], 1);
        assert_eq!(body["statistics"]["pod"], 1.0);
        assert_eq!(body["verification_window"]["start"], "2023-06-01T08:00:00");
        assert_eq!(body["verification_window"]["end"], "2023-06-04T08:00:00");

        let geometries = &body["geometries"];
        assert_eq!(geometries["fho_considerable"]["geometry"], Value::Null);
        assert_eq!(geometries["fho_catastrophic"]["geometry"]["type"], "MultiPolygon");
        assert_eq!(geometries["limited"]["features"][0]["properties"]["type"], "Limited");
    }

    #[actix_web::test]
    async fn ibw_stats_reject_limited() {
        let (status, _) = post(
            "/api/ibw-stats",
            json!({
                "issuance_date": "2023-06-01",
                "issuance": "am",
                "forecast_period": "1-3",
                "impact_level": "Limited"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn high_impact_catalog() {
        let (status, body) = get("/api/high-impact-events").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["considerable_fho"], json!([]));
        assert_eq!(body["catastrophic_fho"][0]["date"], "2023-06-01");
        assert_eq!(body["high_impact_ffws"][0]["date"], "2023-06-02");
        assert_eq!(body["high_impact_ffws"][0]["tag"], "CONSIDERABLE");
        assert_eq!(body["high_impact_ffws"][0]["issued"], "01:00:00");
    }
}
