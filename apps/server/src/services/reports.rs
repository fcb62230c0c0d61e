//! # Reports Service
//!
//! Read-only queries over the sales ledger: the invoice list and the
//! dashboard summary. Date ranges are inclusive calendar days in UTC;
//! this module turns them into the half-open timestamp bounds the
//! repository expects.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use atlas_core::{Role, SaleWithDetails};
use atlas_db::Database;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::ensure_shop_access;

/// Aggregates over a range of the sales ledger.
///
/// `total_profit_cents` is present only for profit-visible roles; the
/// field is absent from the JSON otherwise, same as on individual sales.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub sale_count: i64,
    pub units_sold: i64,
    pub total_amount_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_profit_cents: Option<i64>,
}

/// Sales ledger queries.
pub struct ReportsService {
    db: Database,
}

impl ReportsService {
    /// Creates a reports service over the injected database handle.
    pub fn new(db: Database) -> Self {
        ReportsService { db }
    }

    /// Lists a shop's sales, newest first, optionally bounded by an
    /// inclusive calendar-day range.
    pub async fn list_sales(
        &self,
        actor: &CurrentUser,
        shop_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ApiResult<Vec<SaleWithDetails>> {
        ensure_shop_access(&self.db, actor, shop_id).await?;

        let sales = self
            .db
            .sales()
            .list_by_shop(shop_id, start_date.map(day_start), end_date.map(day_after))
            .await?;

        Ok(sales)
    }

    /// Computes dashboard aggregates over the same range as
    /// [`Self::list_sales`].
    pub async fn summary(
        &self,
        actor: &CurrentUser,
        shop_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ApiResult<SalesSummary> {
        let sales = self.list_sales(actor, shop_id, start_date, end_date).await?;
        Ok(summarize(&sales, actor.role))
    }
}

/// Folds ledger rows into a summary, redacting profit by role.
fn summarize(sales: &[SaleWithDetails], role: Role) -> SalesSummary {
    let mut units_sold = 0;
    let mut total_amount = 0;
    let mut total_profit = 0;

    for detail in sales {
        total_amount += detail.sale.total_amount_cents;
        total_profit += detail.sale.total_profit_cents;
        units_sold += detail.items.iter().map(|item| item.quantity).sum::<i64>();
    }

    SalesSummary {
        sale_count: sales.len() as i64,
        units_sold,
        total_amount_cents: total_amount,
        total_profit_cents: role.can_view_profit().then_some(total_profit),
    }
}

/// 00:00:00 UTC on the given day (inclusive lower bound).
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// 00:00:00 UTC on the following day (exclusive upper bound, making the
/// requested end date inclusive).
fn day_after(date: NaiveDate) -> DateTime<Utc> {
    day_start(date.checked_add_days(Days::new(1)).unwrap_or(date))
}

// =============================================================================
// Unit Tests
// =============================================================================
