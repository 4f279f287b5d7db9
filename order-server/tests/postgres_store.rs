//! PostgreSQL 仓库测试
//!
//! 需要 `DATABASE_URL`, 未设置时跳过。

use chrono::{Duration, Utc};
use order_server::StoreError;
use order_server::db::{OrderRepository, PgOrderRepository};
use shared::models::{Order, OrderStatus};

async fn repo() -> Option<PgOrderRepository> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    Some(PgOrderRepository::connect(&url).await.unwrap())
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

fn order(consignment_id: &str, user_id: i64, minutes_ago: i64) -> Order {
    Order {
        consignment_id: consignment_id.to_string(),
        merchant_order_id: "M-1".to_string(),
        user_id,
        store_id: 131172,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
        recipient_name: "Rahim".to_string(),
        recipient_phone: "01712345678".to_string(),
        recipient_address: "Banani, Dhaka".to_string(),
        recipient_city: 1,
        recipient_zone: 1,
        recipient_area: 1,
        delivery_type: 48,
        item_type: 2,
        item_quantity: 1,
        item_weight: 0.5,
        amount_to_collect: 1200.0,
        description: String::new(),
        instruction: String::new(),
        delivery_fee: 60.0,
        delivery_charge: 60.0,
        cod_fee: 12.0,
        total_fee: 72.0,
        order_amount: 1200.0,
        cod_amount: 1200.0,
        promo_discount: 0.0,
        discount: 0.0,
        order_type: "Delivery".to_string(),
        order_type_id: 1,
        store_name: "Default Store".to_string(),
        store_contact_phone: "123456789".to_string(),
        status: OrderStatus::Pending,
    }
}

#[tokio::test]
async fn test_duplicate_username_is_reported() {
    let Some(repo) = repo().await else { return };
    let username = unique("alice");

    let user = repo.create_user(&username, "hash-1").await.unwrap();
    let err = repo.create_user(&username, "hash-2").await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateUsername));

    let stored = repo.find_user_by_username(&username).await.unwrap().unwrap();
    assert_eq!(stored.id, user.id);
    assert_eq!(stored.hashed_password, "hash-1");
    assert!(repo.find_user_by_username(&unique("nobody")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_consignment_is_reported() {
    let Some(repo) = repo().await else { return };
    let user = repo.create_user(&unique("merchant"), "hash").await.unwrap();
    let id = unique("DA");

    repo.create_order(&order(&id, user.id, 0)).await.unwrap();
    let err = repo.create_order(&order(&id, user.id, 0)).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateConsignment));
}

#[tokio::test]
async fn test_cancel_is_guarded_by_owner_and_status() {
    let Some(repo) = repo().await else { return };
    let alice = repo.create_user(&unique("alice"), "hash").await.unwrap();
    let bob = repo.create_user(&unique("bob"), "hash").await.unwrap();
    let id = unique("DA");
    repo.create_order(&order(&id, alice.id, 0)).await.unwrap();

    let err = repo.cancel_order(&id, bob.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NoMatchingPendingOrder));

    repo.cancel_order(&id, alice.id).await.unwrap();
    let err = repo.cancel_order(&id, alice.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NoMatchingPendingOrder));

    let err = repo.cancel_order(&unique("DA"), alice.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NoMatchingPendingOrder));

    let page = repo.list_orders(alice.id, 10, 1).await.unwrap();
    assert_eq!(page.orders[0].status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_list_is_newest_first_and_scoped() {
    let Some(repo) = repo().await else { return };
    let alice = repo.create_user(&unique("alice"), "hash").await.unwrap();
    let bob = repo.create_user(&unique("bob"), "hash").await.unwrap();

    let older = unique("DA");
    let newer = unique("DA");
    repo.create_order(&order(&older, alice.id, 10)).await.unwrap();
    repo.create_order(&order(&newer, alice.id, 1)).await.unwrap();
    repo.create_order(&order(&unique("DA"), bob.id, 0)).await.unwrap();

    let page = repo.list_orders(alice.id, 1, 1).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.orders.len(), 1);
    assert_eq!(page.orders[0].consignment_id, newer);

    let page = repo.list_orders(alice.id, 1, 2).await.unwrap();
    assert_eq!(page.orders[0].consignment_id, older);

    let page = repo.list_orders(alice.id, 10, i64::MAX).await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.orders.is_empty());

    let page = repo.list_orders(alice.id, i64::MAX, 1).await.unwrap();
    assert_eq!(page.orders.len(), 2);
}

#[tokio::test]
async fn test_ping() {
    let Some(repo) = repo().await else { return };
    repo.ping().await.unwrap();
}
