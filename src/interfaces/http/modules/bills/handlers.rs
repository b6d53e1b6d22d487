//! Bill REST API handlers

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{BillResponse, UpdateBillStatusRequest};
use crate::domain::{BillingPeriod, DomainError};
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::BillingState;

fn bill_not_found(field: &'static str, value: String) -> ApiError {
    domain_error(DomainError::NotFound {
        entity: "Bill",
        field,
        value,
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}/bills",
    tag = "Bills",
    params(("account_id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Bills, newest period first", body = ApiResponse<Vec<BillResponse>>)
    )
)]
pub async fn list_account_bills(
    State(state): State<BillingState>,
    Path(account_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<BillResponse>>>, ApiError> {
    let bills = state
        .repos
        .bills()
        .find_by_account(account_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        bills.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}/bills/{year}/{month}",
    tag = "Bills",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
        ("year" = i32, Path, description = "Billing year"),
        ("month" = u32, Path, description = "Billing month, 1-12")
    ),
    responses(
        (status = 200, description = "Bill for the period", body = ApiResponse<BillResponse>),
        (status = 404, description = "No bill for this period"),
        (status = 422, description = "Invalid month")
    )
)]
pub async fn get_bill_for_period(
    State(state): State<BillingState>,
    Path((account_id, year, month)): Path<(i32, i32, u32)>,
) -> Result<Json<ApiResponse<BillResponse>>, ApiError> {
    let period = BillingPeriod::new(year, month).ok_or_else(|| {
        domain_error(DomainError::Validation(format!(
            "month must be between 1 and 12, got {}",
            month
        )))
    })?;

    match state
        .repos
        .bills()
        .find_by_period(account_id, period)
        .await
        .map_err(domain_error)?
    {
        Some(bill) => Ok(Json(ApiResponse::success(bill.into()))),
        None => Err(bill_not_found(
            "period",
            format!("{}/{}", account_id, period),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/bills/{id}",
    tag = "Bills",
    params(("id" = i32, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Bill details", body = ApiResponse<BillResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_bill(
    State(state): State<BillingState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BillResponse>>, ApiError> {
    match state.repos.bills().find_by_id(id).await.map_err(domain_error)? {
        Some(bill) => Ok(Json(ApiResponse::success(bill.into()))),
        None => Err(bill_not_found("id", id.to_string())),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/bills/{id}/status",
    tag = "Bills",
    params(("id" = i32, Path, description = "Bill ID")),
    request_body = UpdateBillStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<BillResponse>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Status not allowed")
    )
)]
pub async fn update_bill_status(
    State(state): State<BillingState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateBillStatusRequest>,
) -> Result<Json<ApiResponse<BillResponse>>, ApiError> {
    let bill = state
        .orchestrator
        .lifecycle()
        .update_status(id, body.status)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(bill.into())))
}
