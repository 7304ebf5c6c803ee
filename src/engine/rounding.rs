// ==========================================
// 管件报价系统 - 舍入规则
// ==========================================
// 规则: 四舍五入（half-up），先加 f64::EPSILON 偏置
// 说明: 每一步计算后立即舍入，累计舍入结果即为导出表中的值
// ==========================================

/// 四舍五入到指定小数位
///
/// # 参数
/// - value: 原值
/// - decimals: 小数位数
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    ((value + f64::EPSILON) * factor + 0.5).floor() / factor
}

/// 金额（2 位）
pub fn round2(value: f64) -> f64 {
    round_half_up(value, 2)
}

/// 单价 / 米重（3 位）
pub fn round3(value: f64) -> f64 {
    round_half_up(value, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_up() {
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round3(1.0005), 1.001);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.124), 0.12);
    }

    #[test]
    fn test_exact_values_unchanged() {
        assert_eq!(round2(36.0), 36.0);
        assert_eq!(round3(13.0), 13.0);
        assert_eq!(round2(0.0), 0.0);
    }
}
