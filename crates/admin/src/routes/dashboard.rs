//! Dashboard route handler.

use axum::{Json, extract::State};
use chrono::Utc;
use tracing::instrument;

use crate::middleware::RequireAdmin;
use crate::services::DashboardStats;
use crate::state::AppState;

/// Headline figures for the back-office home screen.
///
/// Always `200`; figures whose query failed are zero.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<DashboardStats> {
    Json(DashboardStats::gather(state.pool(), state.config().currency, Utc::now()).await)
}
