//! Tariff REST API handlers

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use super::dto::{
    ChargeBreakdownResponse, ChargePreviewRequest, ResolveTariffQuery, TariffResolutionResponse,
};
use crate::domain::{DomainError, Jurisdiction, TariffScope};
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::BillingState;

#[utoipa::path(
    get,
    path = "/api/v1/tariffs/resolve",
    tag = "Tariffs",
    params(ResolveTariffQuery),
    responses(
        (status = 200, description = "Tariff set for the scope, or the fallback rate", body = ApiResponse<TariffResolutionResponse>),
        (status = 422, description = "Invalid scope"),
        (status = 500, description = "Tariff lookup failed")
    )
)]
pub async fn resolve_tariff(
    State(state): State<BillingState>,
    Query(query): Query<ResolveTariffQuery>,
) -> Result<Json<ApiResponse<TariffResolutionResponse>>, ApiError> {
    query
        .validate()
        .map_err(|e| domain_error(DomainError::Validation(e.to_string())))?;

    let scope = TariffScope {
        jurisdiction: Jurisdiction::new(query.region, query.locality),
        department: query.department,
        category: query.category,
    };
    let charges = state.orchestrator.charges();
    let resolution = charges
        .resolver()
        .resolve(&scope)
        .await
        .map_err(domain_error)?;
    let tariff = resolution.into_tariff();

    Ok(Json(ApiResponse::success(TariffResolutionResponse {
        configured: tariff.is_some(),
        tariff: tariff.map(Into::into),
        fallback_rate: charges.fallback_rate(scope.department),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/tariffs/preview",
    tag = "Tariffs",
    request_body = ChargePreviewRequest,
    responses(
        (status = 200, description = "Charges the account would incur; nothing is stored", body = ApiResponse<ChargeBreakdownResponse>),
        (status = 404, description = "Unknown account"),
        (status = 422, description = "Negative consumption")
    )
)]
pub async fn preview_charges(
    State(state): State<BillingState>,
    ValidatedJson(body): ValidatedJson<ChargePreviewRequest>,
) -> Result<Json<ApiResponse<ChargeBreakdownResponse>>, ApiError> {
    let breakdown = state
        .orchestrator
        .preview(body.account_id, body.consumption)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(breakdown.into())))
}
