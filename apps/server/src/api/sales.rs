//! # Sales Handlers
//!
//! Checkout and the sales ledger. These are thin shims over
//! [`CheckoutService`] and [`ReportsService`]; the handler's only own
//! job is projecting results for the caller's role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use atlas_core::{CheckoutRequest, SaleView};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::checkout::CheckoutService;
use crate::services::reports::{ReportsService, SalesSummary};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesQuery {
    /// Inclusive range start, `YYYY-MM-DD`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive range end, `YYYY-MM-DD`.
    pub end_date: Option<NaiveDate>,
}

/// POST /api/shops/{shop_id}/sales - checkout.
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(shop_id): Path<String>,
    Json(request): Json<CheckoutRequest>,
) -> ApiResult<(StatusCode, Json<SaleView>)> {
    let detail = CheckoutService::new(state.db.clone())
        .create_sale(&current, &shop_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SaleView::project(detail, current.role)),
    ))
}

/// GET /api/shops/{shop_id}/sales - the ledger, newest first.
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(shop_id): Path<String>,
    Query(query): Query<SalesQuery>,
) -> ApiResult<Json<Vec<SaleView>>> {
    let sales = ReportsService::new(state.db.clone())
        .list_sales(&current, &shop_id, query.start_date, query.end_date)
        .await?;

    let views = sales
        .into_iter()
        .map(|detail| SaleView::project(detail, current.role))
        .collect();

    Ok(Json(views))
}

/// GET /api/shops/{shop_id}/sales/summary - dashboard aggregates.
pub async fn summary(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(shop_id): Path<String>,
    Query(query): Query<SalesQuery>,
) -> ApiResult<Json<SalesSummary>> {
    let summary = ReportsService::new(state.db.clone())
        .summary(&current, &shop_id, query.start_date, query.end_date)
        .await?;

    Ok(Json(summary))
}
