//! 内存仓库
//!
//! 与 PostgreSQL 实现语义一致: 用户名唯一、consignment id 唯一、
//! 取消为单次条件更新 (在写锁内完成)。

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use shared::models::{Order, OrderPage, OrderStatus, User};
use tokio::sync::RwLock;

use super::{OrderRepository, StoreError, page_offset};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, User>,
    orders: HashMap<String, Order>,
    next_user_id: i64,
}

/// 进程内 [`OrderRepository`]
#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    tables: RwLock<Tables>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按 consignment id 读取订单 (测试辅助)
    pub async fn get_order(&self, consignment_id: &str) -> Option<Order> {
        self.tables.read().await.orders.get(consignment_id).cloned()
    }

    /// 直接修改订单状态, 模拟外部系统推动的状态变化
    pub async fn set_status(&self, consignment_id: &str, status: OrderStatus) -> bool {
        match self.tables.write().await.orders.get_mut(consignment_id) {
            Some(order) => {
                order.status = status;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(username).cloned())
    }

    async fn create_user(
        &self,
        username: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(username) {
            return Err(StoreError::DuplicateUsername);
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: username.to_string(),
            hashed_password: hashed_password.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.orders.contains_key(&order.consignment_id) {
            return Err(StoreError::DuplicateConsignment);
        }
        tables
            .orders
            .insert(order.consignment_id.clone(), order.clone());
        Ok(())
    }

    async fn list_orders(
        &self,
        user_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<OrderPage, StoreError> {
        let tables = self.tables.read().await;
        let mut owned: Vec<&Order> = tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.consignment_id.cmp(&a.consignment_id))
        });

        let total = owned.len() as i64;
        let skip = usize::try_from(page_offset(limit, page)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(0);
        let orders = owned.into_iter().skip(skip).take(take).cloned().collect();

        Ok(OrderPage { orders, total })
    }

    async fn cancel_order(&self, consignment_id: &str, user_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(consignment_id) {
            Some(order) if order.user_id == user_id && order.status.is_pending() => {
                order.status = OrderStatus::Cancelled;
                Ok(())
            }
            _ => Err(StoreError::NoMatchingPendingOrder),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
