use crate::infra::{deserialize_optional_date, deserialize_optional_sort_key, AppState};
use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use fleet_upkeep::error::AppError;
use fleet_upkeep::maintenance::{
    evaluate_fleet, FactKind, FleetCsvImporter, FleetUrgencySummary, VehicleRecord,
    VehicleUrgencyView,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FleetUrgencyRequest {
    #[serde(default)]
    pub(crate) vehicles: Option<Vec<VehicleRecord>>,
    #[serde(default)]
    pub(crate) csv: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_sort_key")]
    pub(crate) sort: Option<FactKind>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FleetUrgencyQuery {
    #[serde(default, deserialize_with = "deserialize_optional_sort_key")]
    pub(crate) sort: Option<FactKind>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FleetUrgencyResponse {
    pub(crate) today: NaiveDate,
    pub(crate) sort: FactKind,
    pub(crate) data_source: FleetDataSource,
    pub(crate) vehicles: Vec<VehicleUrgencyView>,
    pub(crate) summary: FleetUrgencySummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum FleetDataSource {
    Inline,
    Csv,
    ConfiguredExport,
}

pub(crate) fn fleet_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/fleet/urgency",
            get(configured_fleet_endpoint).post(fleet_urgency_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn fleet_urgency_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<FleetUrgencyRequest>,
) -> Result<Json<FleetUrgencyResponse>, AppError> {
    let FleetUrgencyRequest {
        vehicles,
        csv,
        sort,
        today,
    } = payload;

    let (vehicles, data_source) = match (vehicles, csv) {
        (Some(vehicles), _) => (vehicles, FleetDataSource::Inline),
        (None, Some(csv)) => (
            FleetCsvImporter::from_reader(Cursor::new(csv.into_bytes()))?,
            FleetDataSource::Csv,
        ),
        (None, None) => (load_configured_fleet(&state)?, FleetDataSource::ConfiguredExport),
    };

    let sort = sort.unwrap_or(state.fleet.default_sort);
    rank_fleet(vehicles, today, sort, data_source).map(Json)
}

pub(crate) async fn configured_fleet_endpoint(
    Extension(state): Extension<AppState>,
    query: Result<Query<FleetUrgencyQuery>, QueryRejection>,
) -> Result<Json<FleetUrgencyResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidQuery(rejection.body_text()))?;
    let vehicles = load_configured_fleet(&state)?;
    let sort = query.sort.unwrap_or(state.fleet.default_sort);
    rank_fleet(vehicles, query.today, sort, FleetDataSource::ConfiguredExport).map(Json)
}

fn load_configured_fleet(state: &AppState) -> Result<Vec<VehicleRecord>, AppError> {
    let path = state
        .fleet
        .csv_path
        .as_ref()
        .ok_or(AppError::FleetSourceMissing)?;
    Ok(FleetCsvImporter::from_path(path)?)
}

fn rank_fleet(
    vehicles: Vec<VehicleRecord>,
    today: Option<NaiveDate>,
    sort: FactKind,
    data_source: FleetDataSource,
) -> Result<FleetUrgencyResponse, AppError> {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let ranked = evaluate_fleet(&vehicles, today, sort)?;
    let summary = FleetUrgencySummary::from_bundles(&ranked, sort);

    info!(
        vehicles = ranked.len(),
        attention = summary.attention.len(),
        %sort,
        "fleet urgency ranked"
    );

    Ok(FleetUrgencyResponse {
        today,
        sort,
        data_source,
        vehicles: VehicleUrgencyView::from_ranked(&ranked, sort),
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::test_state;
    use axum::body::Body;
    use axum::http::Request;
    use fleet_upkeep::config::FleetConfig;
    use fleet_upkeep::maintenance::UrgencyLevel;
    use tower::ServiceExt;

    fn sample_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid date")
    }

    fn sample_vehicle(id: &str, inspection_in_days: i64) -> VehicleRecord {
        let mut vehicle = VehicleRecord::new(id);
        vehicle.inspection_expiry = Some(sample_today() + chrono::Duration::days(inspection_in_days));
        vehicle
    }

    #[tokio::test]
    async fn fleet_urgency_endpoint_ranks_inline_vehicles() {
        let request = FleetUrgencyRequest {
            vehicles: Some(vec![sample_vehicle("later", 40), sample_vehicle("sooner", 2)]),
            today: Some(sample_today()),
            ..Default::default()
        };

        let Json(body) = fleet_urgency_endpoint(
            Extension(test_state(FleetConfig::default())),
            Json(request),
        )
        .await
        .expect("fleet ranks");

        assert_eq!(body.data_source, FleetDataSource::Inline);
        assert_eq!(body.sort, FactKind::Inspection);
        assert_eq!(body.vehicles[0].vehicle_id, "sooner");
        assert_eq!(body.vehicles[0].ranked_by.level, UrgencyLevel::Critical);
        assert_eq!(body.summary.total_vehicles, 2);
    }

    #[tokio::test]
    async fn fleet_urgency_endpoint_imports_csv_and_honors_sort() {
        let request = FleetUrgencyRequest {
            csv: Some(
                "Vehicle ID,Current Mileage,Service Due Mileage\nveh-1,10000,30000\nveh-2,29800,30000\n"
                    .to_string(),
            ),
            sort: Some(FactKind::Service),
            today: Some(sample_today()),
            ..Default::default()
        };

        let Json(body) = fleet_urgency_endpoint(
            Extension(test_state(FleetConfig::default())),
            Json(request),
        )
        .await
        .expect("fleet ranks");

        assert_eq!(body.data_source, FleetDataSource::Csv);
        assert_eq!(body.vehicles[0].vehicle_id, "veh-2");
        assert_eq!(body.vehicles[0].ranked_by.remaining, Some(200));
    }

    #[tokio::test]
    async fn fleet_urgency_endpoint_requires_a_fleet_source() {
        let error = fleet_urgency_endpoint(
            Extension(test_state(FleetConfig::default())),
            Json(FleetUrgencyRequest::default()),
        )
        .await
        .expect_err("no fleet available");

        assert!(matches!(error, AppError::FleetSourceMissing));
    }

    #[tokio::test]
    async fn router_rejects_negative_mileage_with_bad_request() {
        let app = fleet_router().layer(Extension(test_state(FleetConfig::default())));
        let payload = json!({
            "vehicles": [{ "vehicle_id": "odd", "current_mileage": -10, "service_due_mileage": 500 }],
            "sort": "service",
            "today": "2025-09-24"
        });

        let response = app
            .oneshot(
                Request::post("/api/v1/fleet/urgency")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("negative"));
    }

    #[tokio::test]
    async fn router_reports_bad_query_as_json_error() {
        let app = fleet_router().layer(Extension(test_state(FleetConfig::default())));

        let response = app
            .oneshot(
                Request::get("/api/v1/fleet/urgency?sort=paint")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        let message = body["error"].as_str().expect("error message");
        assert!(message.starts_with("invalid query"));
        assert!(message.contains("paint"));
    }

    #[tokio::test]
    async fn router_serves_health_and_readiness() {
        let app = fleet_router().layer(Extension(test_state(FleetConfig::default())));

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
