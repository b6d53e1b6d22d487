//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::billing::SubmissionOrchestrator;
use crate::domain::{ErrorKind, RepositoryProvider};

use super::common::ApiResponse;
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{bills, readings, tariffs, BillingState};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Readings
        readings::submit_reading,
        readings::submit_batch,
        readings::list_account_readings,
        // Bills
        bills::list_account_bills,
        bills::get_bill_for_period,
        bills::get_bill,
        bills::update_bill_status,
        // Tariffs
        tariffs::resolve_tariff,
        tariffs::preview_charges,
    ),
    components(
        schemas(
            ApiResponse<String>,
            ErrorKind,
            health::HealthResponse,
            health::ComponentHealth,
            readings::SubmitReadingRequest,
            readings::BatchReadingRequest,
            readings::SubmissionReceiptResponse,
            readings::BatchOutcomeResponse,
            readings::BatchSuccessDto,
            readings::BatchFailureDto,
            readings::ReadingResponse,
            bills::BillResponse,
            bills::UpdateBillStatusRequest,
            tariffs::TariffResolutionResponse,
            tariffs::TariffSetResponse,
            tariffs::TariffSlabDto,
            tariffs::ChargePreviewRequest,
            tariffs::ChargeBreakdownResponse,
            tariffs::SlabChargeDto,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and store reachability"),
        (name = "Readings", description = "Meter reading submission, single and batch, and reading history"),
        (name = "Bills", description = "Bills per account and period, payment status hook"),
        (name = "Tariffs", description = "Slab tariff resolution and charge preview"),
    ),
    info(
        title = "Utility Billing API",
        version = "1.0.0",
        description = "Slab-based billing for electricity, gas and water meter readings",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    orchestrator: Arc<SubmissionOrchestrator>,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let billing_state = BillingState {
        repos: repos.clone(),
        orchestrator,
    };

    let billing_routes = Router::new()
        // Readings
        .route("/readings", post(readings::submit_reading))
        .route("/readings/batch", post(readings::submit_batch))
        .route(
            "/accounts/{account_id}/readings",
            get(readings::list_account_readings),
        )
        // Bills
        .route(
            "/accounts/{account_id}/bills",
            get(bills::list_account_bills),
        )
        .route(
            "/accounts/{account_id}/bills/{year}/{month}",
            get(bills::get_bill_for_period),
        )
        .route("/bills/{id}", get(bills::get_bill))
        .route("/bills/{id}/status", put(bills::update_bill_status))
        // Tariffs
        .route("/tariffs/resolve", get(tariffs::resolve_tariff))
        .route("/tariffs/preview", post(tariffs::preview_charges))
        .with_state(billing_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            repos,
            started_at: Arc::new(Instant::now()),
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1", billing_routes);

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::BillingConfig;
    use crate::domain::{
        Account, ConnectionStatus, Department, Jurisdiction, TariffCategory, TariffSet, TariffSlab,
    };
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn account(id: i32, department: Department) -> Account {
        Account {
            id,
            jurisdiction: Jurisdiction::new("North", "Springfield"),
            department,
            category: TariffCategory::Residential,
            meter_id: format!("MTR-{}", id),
            connection_status: ConnectionStatus::Active,
        }
    }

    fn seeded() -> Arc<InMemoryRepositoryProvider> {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        for id in 1..=3 {
            repos.insert_account(account(id, Department::Electricity));
        }
        repos.insert_account(account(9, Department::Water));
        repos.insert_tariff(TariffSet {
            id: 0,
            name: "Residential".into(),
            scope: account(1, Department::Electricity).tariff_scope(),
            fixed_charge: dec!(0),
            tax_percentage: dec!(0),
            slabs: vec![
                TariffSlab::new(dec!(0), Some(dec!(100)), dec!(6.42)),
                TariffSlab::new(dec!(101), Some(dec!(300)), dec!(8.00)),
            ],
        });
        repos
    }

    fn app(repos: Arc<InMemoryRepositoryProvider>) -> Router {
        let orchestrator = Arc::new(SubmissionOrchestrator::new(
            repos.clone(),
            &BillingConfig::default(),
        ));
        create_api_router(repos, orchestrator, None)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn reading(account_id: i32, previous: &str, current: &str, date: &str) -> Value {
        json!({
            "account_id": account_id,
            "meter_id": format!("MTR-{}", account_id),
            "previous_reading": previous,
            "current_reading": current,
            "reading_date": date,
            "channel": "portal"
        })
    }

    #[tokio::test]
    async fn submit_reading_issues_bill() {
        let app = app(seeded());
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/readings",
            Some(reading(1, "1200", "1350", "2026-03-14")),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["bill_number"], "BILL-000001-202603");
        assert_eq!(body["data"]["total_amount"], "1042.00");
        assert_eq!(body["data"]["used_fallback"], false);

        let (status, body) = call(&app, "GET", "/api/v1/accounts/1/bills/2026/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "issued");
        assert_eq!(body["data"]["due_date"], "2026-03-29");

        let (_, body) = call(&app, "GET", "/api/v1/accounts/1/readings", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["consumption"], "150");
    }

    #[tokio::test]
    async fn numeric_readings_are_accepted() {
        let app = app(seeded());
        let mut body = reading(9, "0", "0", "2026-03-14");
        body["previous_reading"] = json!(10);
        body["current_reading"] = json!(25.5);
        let (status, body) = call(&app, "POST", "/api/v1/readings", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["used_fallback"], true);
        assert_eq!(body["data"]["total_amount"], "31.00");
    }

    #[tokio::test]
    async fn domain_errors_carry_kind_and_status() {
        let app = app(seeded());

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/readings",
            Some(reading(1, "500", "400", "2026-03-14")),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error_kind"], "invalid_reading_order");

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/readings",
            Some(reading(77, "1", "2", "2026-03-14")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_kind"], "not_found");

        let mut missing_meter = reading(1, "1", "2", "2026-03-14");
        missing_meter["meter_id"] = json!("");
        let (status, body) = call(&app, "POST", "/api/v1/readings", Some(missing_meter)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_kind"], "validation");
    }

    #[tokio::test]
    async fn batch_reports_per_item_results() {
        let app = app(seeded());
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/readings/batch",
            Some(json!({
                "readings": [
                    reading(1, "10", "20", "2026-03-14"),
                    reading(2, "20", "10", "2026-03-14"),
                    reading(3, "0", "5", "2026-03-14"),
                ]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["success_count"], 2);
        assert_eq!(data["failure_count"], 1);
        assert_eq!(data["failures"][0]["index"], 1);
        assert_eq!(data["failures"][0]["account_id"], 2);
        assert_eq!(data["failures"][0]["error_kind"], "invalid_reading_order");
        assert_eq!(data["successes"][1]["index"], 2);
    }

    #[tokio::test]
    async fn batch_items_are_validated_individually() {
        let app = app(seeded());
        let mut long_author = reading(1, "10", "20", "2026-03-14");
        long_author["submitted_by"] = json!("a".repeat(10_000));
        let mut long_meter = reading(2, "10", "20", "2026-03-14");
        long_meter["meter_id"] = json!("M".repeat(65));

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/readings/batch",
            Some(json!({
                "readings": [
                    long_author,
                    long_meter,
                    reading(3, "0", "5", "2026-03-14"),
                    reading(1, "10000000000000000", "10000000000000001", "2026-03-14"),
                ]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["success_count"], 1);
        assert_eq!(data["failure_count"], 3);
        assert_eq!(data["successes"][0]["index"], 2);
        for failure in data["failures"].as_array().unwrap() {
            assert_eq!(failure["error_kind"], "validation", "{}", failure);
        }
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let app = app(seeded());
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/readings/batch",
            Some(json!({ "readings": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_kind"], "validation");
    }

    #[tokio::test]
    async fn batch_against_unreachable_store_is_503() {
        let repos = seeded();
        repos.set_unavailable(true);
        let app = app(repos);
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/readings/batch",
            Some(json!({ "readings": [reading(1, "1", "2", "2026-03-14")] })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error_kind"], "store_unavailable");
    }

    #[tokio::test]
    async fn bill_lookup_and_status_hook() {
        let app = app(seeded());
        let (_, body) = call(
            &app,
            "POST",
            "/api/v1/readings",
            Some(reading(2, "0", "10", "2026-04-02")),
        )
        .await;
        let bill_id = body["data"]["bill_id"].as_i64().unwrap();

        let (status, body) = call(&app, "GET", &format!("/api/v1/bills/{}", bill_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["billing_month"], 4);

        let (status, body) = call(
            &app,
            "PUT",
            &format!("/api/v1/bills/{}/status", bill_id),
            Some(json!({ "status": "paid" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "paid");

        let (status, _) = call(
            &app,
            "PUT",
            &format!("/api/v1/bills/{}/status", bill_id),
            Some(json!({ "status": "issued" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&app, "GET", "/api/v1/bills/4242", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, "GET", "/api/v1/accounts/2/bills/2026/13", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = call(&app, "GET", "/api/v1/accounts/2/bills", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tariff_resolution_and_preview() {
        let app = app(seeded());

        let (status, body) = call(
            &app,
            "GET",
            "/api/v1/tariffs/resolve?region=North&locality=Springfield&department=electricity&category=residential",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["configured"], true);
        assert_eq!(body["data"]["tariff"]["slabs"].as_array().unwrap().len(), 2);

        let (_, body) = call(
            &app,
            "GET",
            "/api/v1/tariffs/resolve?region=North&locality=Springfield&department=gas&category=residential",
            None,
        )
        .await;
        assert_eq!(body["data"]["configured"], false);
        assert_eq!(body["data"]["fallback_rate"], "3.50");

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/tariffs/preview",
            Some(json!({ "account_id": 1, "consumption": "150" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_amount"], "1042.00");
        assert_eq!(body["data"]["slab_charges"].as_array().unwrap().len(), 2);

        let (_, body) = call(&app, "GET", "/api/v1/accounts/1/bills", None).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_reflects_store_and_request_id_is_echoed() {
        let repos = seeded();
        let app = app(repos.clone());

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["x-request-id"], "req-123");

        repos.set_unavailable(true);
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app(seeded());
        let (status, body) = call(&app, "GET", "/api-doc/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/readings/batch"].is_object());
    }
}
