//! PostgreSQL 仓库 (sqlx)

use async_trait::async_trait;
use shared::models::{Order, OrderPage, User};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{OrderRepository, StoreError, page_offset};

const ORDER_COLUMNS: &str = "consignment_id, merchant_order_id, user_id, store_id, created_at, \
     recipient_name, recipient_phone, recipient_address, recipient_city, recipient_zone, \
     recipient_area, delivery_type, item_type, item_quantity, item_weight, amount_to_collect, \
     description, instruction, delivery_fee, delivery_charge, cod_fee, total_fee, order_amount, \
     cod_amount, promo_discount, discount, order_type, order_type_id, store_name, \
     store_contact_phone, status";

/// PostgreSQL [`OrderRepository`]
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 建立连接池并执行迁移
    pub async fn connect(database_url: &str) -> Result<Self, crate::core::ServerError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as(
            "SELECT id, username, hashed_password, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(
        &self,
        username: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError> {
        sqlx::query_as(
            "INSERT INTO users (username, hashed_password) VALUES ($1, $2)
             RETURNING id, username, hashed_password, created_at",
        )
        .bind(username)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateUsername
            } else {
                e.into()
            }
        })
    }

    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO orders ({ORDER_COLUMNS}) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31)"
        );

        sqlx::query(&sql)
            .bind(&order.consignment_id)
            .bind(&order.merchant_order_id)
            .bind(order.user_id)
            .bind(order.store_id)
            .bind(order.created_at)
            .bind(&order.recipient_name)
            .bind(&order.recipient_phone)
            .bind(&order.recipient_address)
            .bind(order.recipient_city)
            .bind(order.recipient_zone)
            .bind(order.recipient_area)
            .bind(order.delivery_type)
            .bind(order.item_type)
            .bind(order.item_quantity)
            .bind(order.item_weight)
            .bind(order.amount_to_collect)
            .bind(&order.description)
            .bind(&order.instruction)
            .bind(order.delivery_fee)
            .bind(order.delivery_charge)
            .bind(order.cod_fee)
            .bind(order.total_fee)
            .bind(order.order_amount)
            .bind(order.cod_amount)
            .bind(order.promo_discount)
            .bind(order.discount)
            .bind(&order.order_type)
            .bind(order.order_type_id)
            .bind(&order.store_name)
            .bind(&order.store_contact_phone)
            .bind(order.status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateConsignment
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    async fn list_orders(
        &self,
        user_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<OrderPage, StoreError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1
             ORDER BY created_at DESC, consignment_id DESC LIMIT $2 OFFSET $3"
        );
        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(page_offset(limit, page))
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(OrderPage { orders, total })
    }

    async fn cancel_order(&self, consignment_id: &str, user_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE orders SET status = 'Cancelled'
             WHERE consignment_id = $1 AND user_id = $2 AND status = 'Pending'",
        )
        .bind(consignment_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NoMatchingPendingOrder);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
