//! Revenue report route handler.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use chowline_core::Price;
use chowline_core::revenue::{Period, RevenueBucket, range_start, recent_buckets};
use chowline_db::OrderRepository;

use crate::error::{AppError, Result};
use crate::extract::ApiQuery;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Buckets returned when none are requested.
pub const DEFAULT_BUCKETS: usize = 7;
/// Most buckets a report may cover.
pub const MAX_BUCKETS: usize = 366;

/// Report query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct RevenueQuery {
    pub period: Option<String>,
    pub buckets: Option<usize>,
}

impl RevenueQuery {
    /// Resolve defaults and bounds.
    fn resolve(&self) -> Result<(Period, usize)> {
        let period = match self.period.as_deref().map(str::trim) {
            None | Some("") => Period::default(),
            Some(raw) => raw
                .parse()
                .map_err(|e: chowline_core::revenue::ParsePeriodError| {
                    AppError::BadRequest(e.to_string())
                })?,
        };
        let buckets = self
            .buckets
            .unwrap_or(DEFAULT_BUCKETS)
            .clamp(1, MAX_BUCKETS);
        Ok((period, buckets))
    }
}

/// Revenue report.
#[derive(Debug, Serialize)]
pub struct RevenueReport {
    pub period: Period,
    pub buckets: Vec<RevenueBucket>,
    /// Sum over all buckets.
    pub total: Price,
    pub total_display: String,
}

/// Completed revenue per day, week or month, oldest bucket first and
/// ending with the current one. Empty buckets are included as zero.
#[instrument(skip(state, _admin))]
pub async fn revenue(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<RevenueQuery>,
) -> Result<Json<RevenueReport>> {
    let (period, count) = query.resolve()?;
    let now = Utc::now();

    let orders = OrderRepository::new(state.pool())
        .list_since(range_start(period, count, now))
        .await?;
    let buckets = recent_buckets(&orders, period, count, now);
    let total: Price = buckets.iter().map(|b| b.revenue).sum();

    Ok(Json(RevenueReport {
        period,
        total_display: total.format(state.config().currency),
        total,
        buckets,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let (period, buckets) = RevenueQuery::default().resolve().unwrap();
        assert_eq!(period, Period::Day);
        assert_eq!(buckets, DEFAULT_BUCKETS);
    }

    #[test]
    fn test_bucket_count_is_bounded() {
        let query = RevenueQuery {
            period: Some("month".to_string()),
            buckets: Some(10_000),
        };
        assert_eq!(query.resolve().unwrap(), (Period::Month, MAX_BUCKETS));

        let query = RevenueQuery {
            period: Some("week".to_string()),
            buckets: Some(0),
        };
        assert_eq!(query.resolve().unwrap(), (Period::Week, 1));
    }

    #[test]
    fn test_unknown_period_is_bad_request() {
        let query = RevenueQuery {
            period: Some("fortnight".to_string()),
            buckets: None,
        };
        assert!(matches!(query.resolve(), Err(AppError::BadRequest(_))));
    }
}
