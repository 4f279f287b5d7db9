//! 配送计费
//!
//! 纯函数: 只依赖重量、目的城市和代收金额。订单落库后不再重新计算。
//!
//! | 重量 (kg) | 配送费 |
//! |-----------|--------|
//! | <= 0.5 | 基础费 (本市 60 / 外地 100) |
//! | (0.5, 1.0] | 70 (覆盖城市规则) |
//! | > 1.0 | 基础费 + 10 + (重量 - 1) × 15 |

/// 本市城市代码
pub const HOME_CITY: i64 = 1;
/// 本市基础费
pub const HOME_BASE_FEE: f64 = 60.0;
/// 外地基础费
pub const OUTSTATION_BASE_FEE: f64 = 100.0;
/// (0.5, 1.0] kg 固定费用
pub const HALF_TO_ONE_KG_FEE: f64 = 70.0;
/// 超过 1kg 的附加费
pub const OVER_ONE_KG_SURCHARGE: f64 = 10.0;
/// 超过 1kg 部分每公斤费用
pub const PER_EXTRA_KG_FEE: f64 = 15.0;
/// 代收手续费率
pub const COD_RATE: f64 = 0.01;

/// 计费结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fees {
    pub delivery_fee: f64,
    /// 与 delivery_fee 相同, 为客户端兼容保留
    pub delivery_charge: f64,
    pub cod_fee: f64,
    pub total_fee: f64,
    pub order_amount: f64,
    pub cod_amount: f64,
}

/// 基础费
pub fn base_fee(recipient_city: i64) -> f64 {
    if recipient_city == HOME_CITY {
        HOME_BASE_FEE
    } else {
        OUTSTATION_BASE_FEE
    }
}

/// 配送费
pub fn delivery_fee(item_weight: f64, recipient_city: i64) -> f64 {
    let base = base_fee(recipient_city);
    if item_weight > 0.5 && item_weight <= 1.0 {
        HALF_TO_ONE_KG_FEE
    } else if item_weight > 1.0 {
        base + OVER_ONE_KG_SURCHARGE + (item_weight - 1.0) * PER_EXTRA_KG_FEE
    } else {
        base
    }
}

/// 计算订单全部派生金额
pub fn compute_fees(item_weight: f64, recipient_city: i64, amount_to_collect: f64) -> Fees {
    let delivery_fee = delivery_fee(item_weight, recipient_city);
    let cod_fee = amount_to_collect * COD_RATE;

    Fees {
        delivery_fee,
        delivery_charge: delivery_fee,
        cod_fee,
        total_fee: delivery_fee + cod_fee,
        order_amount: amount_to_collect,
        cod_amount: amount_to_collect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_fee_by_city() {
        assert_eq!(delivery_fee(0.5, 1), 60.0);
        assert_eq!(delivery_fee(0.5, 2), 100.0);
        assert_eq!(delivery_fee(0.1, 0), 100.0);
    }

    #[test]
    fn test_weight_tier_boundaries() {
        assert_eq!(delivery_fee(0.5, 1), 60.0);
        assert_eq!(delivery_fee(0.5000001, 1), 70.0);
        assert_eq!(delivery_fee(1.0, 1), 70.0);
        assert_eq!(delivery_fee(1.0, 2), 70.0);
        assert_eq!(
            delivery_fee(1.0000001, 1),
            60.0 + 10.0 + (1.0000001 - 1.0) * 15.0
        );
    }

    #[test]
    fn test_heavy_parcel_pro_rata() {
        assert_eq!(delivery_fee(2.0, 1), 85.0);
        assert_eq!(delivery_fee(2.5, 2), 132.5);
    }

    #[test]
    fn test_compute_fees_invariants() {
        let fees = compute_fees(1.5, 1, 1500.0);
        assert_eq!(fees.delivery_fee, 77.5);
        assert_eq!(fees.delivery_charge, fees.delivery_fee);
        assert_eq!(fees.cod_fee, 15.0);
        assert_eq!(fees.total_fee, fees.delivery_fee + 0.01 * 1500.0);
        assert_eq!(fees.order_amount, 1500.0);
        assert_eq!(fees.cod_amount, 1500.0);
    }

    #[test]
    fn test_total_is_exact_sum_for_awkward_amounts() {
        for (weight, city, amount) in [(0.3, 1, 333.33), (0.75, 4, 0.07), (3.2, 9, 12345.6)] {
            let fees = compute_fees(weight, city, amount);
            assert_eq!(fees.delivery_charge, fees.delivery_fee);
            assert_eq!(fees.total_fee, fees.delivery_fee + 0.01 * amount);
        }
    }
}
