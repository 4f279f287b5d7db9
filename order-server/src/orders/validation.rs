//! 订单输入校验
//!
//! 按顺序校验, 第一条失败即返回:
//! 1. 必填字段 (收件人姓名/电话/地址非空, 数量/重量/代收金额 > 0)
//! 2. 手机号格式 `01[3-9]XXXXXXXX`
//!
//! 地址为空在第 1 步就会被拒绝, 不做默认地址替换。

use std::sync::LazyLock;

use regex::Regex;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::NewOrder;

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^01[3-9]\d{8}$").unwrap_or_else(|e| panic!("invalid phone pattern: {e}"))
});

/// 必填字段缺失时的消息
pub const MISSING_REQUIRED_FIELDS: &str = "missing required fields";

/// 是否为合法的本地手机号
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// 校验订单输入
pub fn validate_new_order(input: &NewOrder) -> AppResult<()> {
    let missing = [
        ("recipient_name", input.recipient_name.is_empty()),
        ("recipient_phone", input.recipient_phone.is_empty()),
        ("recipient_address", input.recipient_address.is_empty()),
        ("item_quantity", input.item_quantity <= 0),
        ("item_weight", !(input.item_weight > 0.0)),
        ("amount_to_collect", !(input.amount_to_collect > 0.0)),
    ]
    .into_iter()
    .find(|(_, missing)| *missing);

    if let Some((field, _)) = missing {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, MISSING_REQUIRED_FIELDS)
                .with_detail("field", field),
        );
    }

    if !is_valid_phone(&input.recipient_phone) {
        return Err(AppError::new(ErrorCode::InvalidPhoneNumber));
    }

    Ok(())
}
