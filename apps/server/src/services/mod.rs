//! # Services
//!
//! Orchestration between the HTTP handlers and the repositories. Each
//! service owns one unit of work and receives its [`Database`] handle by
//! injection; handlers construct them from [`crate::state::AppState`].
//!
//! - [`checkout::CheckoutService`] - the sale transaction path
//! - [`reports::ReportsService`] - sales ledger queries and summaries

pub mod checkout;
pub mod reports;

use atlas_core::Shop;
use atlas_db::Database;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};

/// Loads a shop and checks the caller may act on it.
///
/// Superusers reach every shop; owners only their own. A shop that
/// exists but belongs to someone else yields 403, not 404 - shop ids
/// are not secret, their contents are.
pub(crate) async fn ensure_shop_access(
    db: &Database,
    actor: &CurrentUser,
    shop_id: &str,
) -> ApiResult<Shop> {
    let shop = db
        .shops()
        .get_by_id(shop_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Shop", shop_id))?;

    if !actor.role.is_superuser() && shop.owner_id != actor.id {
        return Err(ApiError::forbidden("Not your shop"));
    }

    Ok(shop)
}
