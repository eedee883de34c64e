//! Order repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use chowline_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

use crate::RepositoryError;
use crate::models::{NewOrder, Order, OrderFilter, OrderItem, StatusCounts};

const ORDER_COLUMNS: &str = "id, user_id, customer_name, customer_phone, customer_address, \
                             total, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: Option<ProductId>,
    product_name: String,
    quantity: i32,
    unit_price: Price,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative quantity {} on order item {}",
                row.quantity, row.id
            ))
        })?;

        Ok(Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity,
            unit_price: row.unit_price,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StatusCountRow {
    status: OrderStatus,
    count: i64,
}

/// Repository for orders and order items.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its items in one transaction.
    ///
    /// The stored total is computed from the lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order has no lines or a
    /// quantity does not fit the column.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        if order.lines.is_empty() {
            return Err(RepositoryError::Conflict(
                "order must contain at least one item".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (user_id, customer_name, customer_phone, customer_address, total) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.user_id)
        .bind(&order.customer.name)
        .bind(&order.customer.phone)
        .bind(&order.customer.address)
        .bind(order.total())
        .fetch_one(&mut *tx)
        .await?;

        for line in &order.lines {
            let quantity = i32::try_from(line.quantity).map_err(|_| {
                RepositoryError::Conflict(format!("quantity {} is too large", line.quantity))
            })?;

            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(created.id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(quantity)
            .bind(line.unit_price.unwrap_or(Price::ZERO))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %created.id,
            total = %created.total,
            items = order.lines.len(),
            "order created"
        );
        Ok(created)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(order)
    }

    /// Get an order only if it belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(order)
    }

    /// List orders newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE $1::order_status IS NULL OR status = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        ))
        .bind(filter.status)
        .bind(filter.limit)
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    /// Orders placed at or after `since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE created_at >= $1 \
             ORDER BY created_at, id"
        ))
        .bind(since)
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    /// Items of an order in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored quantity is negative.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, product_name, quantity, unit_price \
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderItem::try_from).collect()
    }

    /// Move an order from `from` to `to`.
    ///
    /// The update only applies if the order is still in `from`, so two
    /// concurrent updates cannot both succeed from the same starting status.
    /// Returns `None` when the order does not exist or has moved on.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $3, updated_at = now() \
             WHERE id = $1 AND status = $2 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(self.pool)
        .await?;
        Ok(order)
    }

    /// Order counts per status across all customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_counts(&self) -> Result<StatusCounts, RepositoryError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT status, COUNT(*) AS count FROM orders GROUP BY status",
        )
        .fetch_all(self.pool)
        .await?;

        let mut counts = StatusCounts::default();
        for row in rows {
            counts.record(row.status, row.count);
        }
        Ok(counts)
    }

    /// Sum of completed order totals, optionally only since a point in time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn completed_revenue(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Price, RepositoryError> {
        let total: Price = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0) FROM orders \
             WHERE status = 'completed' \
               AND ($1::timestamptz IS NULL OR created_at >= $1)",
        )
        .bind(since)
        .fetch_one(self.pool)
        .await?;
        Ok(total)
    }
}
