//! 订单模块
//!
//! - [`pricing`] - 配送计费
//! - [`validation`] - 输入校验
//! - [`consignment`] - consignment id 生成
//! - [`OrderService`] - 订单生命周期引擎

pub mod consignment;
pub mod pricing;
pub mod service;
pub mod validation;

pub use service::{OrderService, normalize_paging};
