//! 订单生命周期引擎
//!
//! - create: 校验 -> 计费 -> 落库 -> 失效该用户的列表缓存
//! - list: cache-aside (命中直接返回, 未命中查库后回填)
//! - cancel: 单条条件更新 -> 失效缓存
//!
//! 存储错误立即返回 (consignment id 主键冲突除外: 重新生成后再写入),
//! 缓存错误只记录日志。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shared::error::AppResult;
use shared::models::{NewOrder, Order, OrderPage, OrderStatus};

use super::consignment::generate_consignment_id;
use super::pricing::compute_fees;
use super::validation::validate_new_order;
use crate::cache::OrderCache;
use crate::cache::keys::{list_key, owner_prefix};
use crate::db::{OrderRepository, StoreError};

/// 默认每页数量
pub const DEFAULT_LIMIT: i64 = 10;
/// 默认页码
pub const DEFAULT_PAGE: i64 = 1;

/// consignment id 冲突时最多尝试次数
pub const CONSIGNMENT_ATTEMPTS: u32 = 3;

/// 固定的门店元数据
pub const DEFAULT_STORE_NAME: &str = "Default Store";
pub const DEFAULT_STORE_CONTACT_PHONE: &str = "123456789";
pub const DEFAULT_ORDER_TYPE: &str = "Delivery";
pub const DEFAULT_ORDER_TYPE_ID: i64 = 1;

/// 规范化分页参数: limit < 1 -> 10, page < 1 -> 1
pub fn normalize_paging(limit: Option<i64>, page: Option<i64>) -> (i64, i64) {
    let limit = limit.filter(|l| *l >= 1).unwrap_or(DEFAULT_LIMIT);
    let page = page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE);
    (limit, page)
}

/// 订单服务
#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    cache: Arc<dyn OrderCache>,
    cache_ttl: Duration,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

impl OrderService {
    pub fn new(
        repo: Arc<dyn OrderRepository>,
        cache: Arc<dyn OrderCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repo,
            cache,
            cache_ttl,
        }
    }

    /// 创建订单
    ///
    /// `user_id` 来自认证中间件, 不接受客户端传入。
    pub async fn create(&self, input: NewOrder, user_id: i64) -> AppResult<Order> {
        validate_new_order(&input)?;

        let fees = compute_fees(
            input.item_weight,
            input.recipient_city,
            input.amount_to_collect,
        );

        let mut order = Order {
            consignment_id: generate_consignment_id(),
            merchant_order_id: input.merchant_order_id,
            user_id,
            store_id: input.store_id,
            created_at: Utc::now(),
            recipient_name: input.recipient_name,
            recipient_phone: input.recipient_phone,
            recipient_address: input.recipient_address,
            recipient_city: input.recipient_city,
            recipient_zone: input.recipient_zone,
            recipient_area: input.recipient_area,
            delivery_type: input.delivery_type,
            item_type: input.item_type,
            item_quantity: input.item_quantity,
            item_weight: input.item_weight,
            amount_to_collect: input.amount_to_collect,
            description: input.item_description,
            instruction: input.special_instruction,
            delivery_fee: fees.delivery_fee,
            delivery_charge: fees.delivery_charge,
            cod_fee: fees.cod_fee,
            total_fee: fees.total_fee,
            order_amount: fees.order_amount,
            cod_amount: fees.cod_amount,
            promo_discount: 0.0,
            discount: 0.0,
            order_type: DEFAULT_ORDER_TYPE.to_string(),
            order_type_id: DEFAULT_ORDER_TYPE_ID,
            store_name: DEFAULT_STORE_NAME.to_string(),
            store_contact_phone: DEFAULT_STORE_CONTACT_PHONE.to_string(),
            status: OrderStatus::Pending,
        };

        let mut attempt = 1;
        loop {
            match self.repo.create_order(&order).await {
                Ok(()) => break,
                Err(StoreError::DuplicateConsignment) if attempt < CONSIGNMENT_ATTEMPTS => {
                    tracing::warn!(
                        consignment_id = %order.consignment_id,
                        attempt,
                        "Consignment id collision, regenerating"
                    );
                    attempt += 1;
                    order.consignment_id = generate_consignment_id();
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            consignment_id = %order.consignment_id,
            user_id,
            delivery_fee = order.delivery_fee,
            "Order created"
        );

        self.invalidate_owner(user_id).await;
        Ok(order)
    }

    /// 分页列出用户订单 (cache-aside)
    ///
    /// 返回值中的 `limit`/`page` 是规范化后的值。
    pub async fn list(
        &self,
        user_id: i64,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> AppResult<(OrderPage, i64, i64)> {
        let (limit, page) = normalize_paging(limit, page);
        let key = list_key(user_id, page, limit);

        if let Some(cached) = self.read_cached(&key).await {
            return Ok((cached, limit, page));
        }

        let fresh = self.repo.list_orders(user_id, limit, page).await?;
        self.write_cached(&key, &fresh).await;

        Ok((fresh, limit, page))
    }

    /// 取消订单
    ///
    /// 订单不存在、属于其他用户、状态不是 Pending 三种情况返回同一个错误。
    pub async fn cancel(&self, consignment_id: &str, user_id: i64) -> AppResult<()> {
        self.repo.cancel_order(consignment_id, user_id).await?;

        tracing::info!(consignment_id, user_id, "Order cancelled");

        self.invalidate_owner(user_id).await;
        Ok(())
    }

    async fn read_cached(&self, key: &str) -> Option<OrderPage> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache read failed, falling back to store");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(page) => {
                tracing::debug!(key, "Order list cache hit");
                Some(page)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn write_cached(&self, key: &str, page: &OrderPage) {
        let bytes = match serde_json::to_vec(page) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to encode order page for cache");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, bytes, self.cache_ttl).await {
            tracing::warn!(key, error = %e, "Failed to cache orders");
        }
    }

    async fn invalidate_owner(&self, user_id: i64) {
        let prefix = owner_prefix(user_id);
        match self.cache.delete_by_prefix(&prefix).await {
            Ok(removed) => tracing::debug!(user_id, removed, "Order list cache invalidated"),
            Err(e) => tracing::warn!(user_id, error = %e, "Failed to invalidate cache"),
        }
    }
}
