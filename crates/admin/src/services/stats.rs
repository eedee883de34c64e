//! Dashboard statistics.
//!
//! The figures come from independent queries that run concurrently. A
//! failing query is logged and its figure reported as zero so one slow or
//! broken table does not blank the whole dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use chowline_core::revenue::{Period, range_start};
use chowline_core::{CurrencyCode, Price, UserRole};
use chowline_db::models::{Order, OrderFilter, ProductCounts, StatusCounts};
use chowline_db::{OrderRepository, ProductRepository, RepositoryError, UserRepository};

/// Orders listed under "recent activity".
pub const RECENT_ORDER_COUNT: i64 = 5;

/// Back-office dashboard figures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub orders: StatusCounts,
    pub total_orders: i64,
    /// Completed revenue, all time.
    pub revenue: Price,
    pub revenue_display: String,
    /// Completed revenue since midnight UTC.
    pub revenue_today: Price,
    pub revenue_today_display: String,
    pub products: ProductCounts,
    pub customers: i64,
    pub recent_orders: Vec<Order>,
}

impl DashboardStats {
    /// Run every dashboard query concurrently.
    pub async fn gather(pool: &PgPool, currency: CurrencyCode, now: DateTime<Utc>) -> Self {
        let orders = OrderRepository::new(pool);
        let products = ProductRepository::new(pool);
        let users = UserRepository::new(pool);
        let today = range_start(Period::Day, 1, now);

        let (counts, revenue, revenue_today, product_counts, customers, recent) = tokio::join!(
            orders.status_counts(),
            orders.completed_revenue(None),
            orders.completed_revenue(Some(today)),
            products.counts(),
            users.count_by_role(UserRole::Customer),
            orders.list(OrderFilter::new(None, Some(RECENT_ORDER_COUNT))),
        );

        let orders = or_zero(counts, "order counts");
        let revenue = or_zero(revenue, "revenue");
        let revenue_today = or_zero(revenue_today, "today's revenue");

        Self {
            total_orders: orders.total(),
            orders,
            revenue,
            revenue_display: revenue.format(currency),
            revenue_today,
            revenue_today_display: revenue_today.format(currency),
            products: or_zero(product_counts, "product counts"),
            customers: or_zero(customers, "customer count"),
            recent_orders: or_zero(recent, "recent orders"),
        }
    }
}

/// Unwrap a dashboard figure, logging and zeroing a failure.
fn or_zero<T: Default>(result: Result<T, RepositoryError>, figure: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, figure, "dashboard query failed");
        T::default()
    })
}
