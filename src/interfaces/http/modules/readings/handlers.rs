//! Reading REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    BatchOutcomeResponse, BatchReadingRequest, ReadingResponse, SubmissionReceiptResponse,
    SubmitReadingRequest,
};
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::BillingState;

#[utoipa::path(
    post,
    path = "/api/v1/readings",
    tag = "Readings",
    request_body = SubmitReadingRequest,
    responses(
        (status = 201, description = "Reading accepted, bill issued", body = ApiResponse<SubmissionReceiptResponse>),
        (status = 404, description = "Unknown account"),
        (status = 422, description = "Reading order or field validation failed"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn submit_reading(
    State(state): State<BillingState>,
    ValidatedJson(body): ValidatedJson<SubmitReadingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionReceiptResponse>>), ApiError> {
    let receipt = state
        .orchestrator
        .submit(body.into())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(receipt.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/readings/batch",
    tag = "Readings",
    request_body = BatchReadingRequest,
    responses(
        (status = 200, description = "Per-item outcome", body = ApiResponse<BatchOutcomeResponse>),
        (status = 422, description = "Empty or oversized batch"),
        (status = 503, description = "Store unavailable, nothing processed")
    )
)]
pub async fn submit_batch(
    State(state): State<BillingState>,
    ValidatedJson(body): ValidatedJson<BatchReadingRequest>,
) -> Result<Json<ApiResponse<BatchOutcomeResponse>>, ApiError> {
    let readings = body.readings.into_iter().map(Into::into).collect();
    let outcome = state
        .orchestrator
        .submit_batch(readings)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(outcome.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}/readings",
    tag = "Readings",
    params(("account_id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Readings, newest first", body = ApiResponse<Vec<ReadingResponse>>)
    )
)]
pub async fn list_account_readings(
    State(state): State<BillingState>,
    Path(account_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<ReadingResponse>>>, ApiError> {
    let readings = state
        .repos
        .readings()
        .find_by_account(account_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        readings.into_iter().map(Into::into).collect(),
    )))
}
