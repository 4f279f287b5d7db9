//! Consignment ID
//!
//! 格式: `DA` + `yyMMdd` + `BNWWN` + 6 位微秒后缀, 例如 `DA240501BNWWN042137`。
//! 唯一性由存储层主键保证, 冲突时返回 ConsignmentConflict。

use chrono::{DateTime, Timelike, Utc};

pub const CONSIGNMENT_PREFIX: &str = "DA";
pub const ROUTING_TOKEN: &str = "BNWWN";

/// 根据时间生成 consignment id
pub fn consignment_id_at(now: DateTime<Utc>) -> String {
    let micros = (now.nanosecond() / 1_000) % 1_000_000;
    format!(
        "{CONSIGNMENT_PREFIX}{}{ROUTING_TOKEN}{micros:06}",
        now.format("%y%m%d")
    )
}

/// 使用当前时间生成
pub fn generate_consignment_id() -> String {
    consignment_id_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format() {
        let at = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .unwrap()
            .with_nanosecond(42_137_999)
            .unwrap();
        assert_eq!(consignment_id_at(at), "DA240501BNWWN042137");
    }

    #[test]
    fn test_generated_shape() {
        let id = generate_consignment_id();
        assert_eq!(id.len(), 2 + 6 + 5 + 6);
        assert!(id.starts_with(CONSIGNMENT_PREFIX));
        assert_eq!(&id[8..13], ROUTING_TOKEN);
        assert!(id[2..8].chars().all(|c| c.is_ascii_digit()));
        assert!(id[13..].chars().all(|c| c.is_ascii_digit()));
    }
}
