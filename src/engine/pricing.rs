// ==========================================
// 管件报价系统 - 报价计算引擎
// ==========================================
// 职责: 报价行 → 行价格（含折扣）→ 汇总
// 流程:
//   1. 原始行价: 米重/合金附加费/单价/行值（每步舍入）
//   2. 记录折扣前目录价（M / N 列）
//   3. 应用折扣: 基础价 → 单价 → 行值
//   4. 汇总: 出厂价 / 包装运输 / 到货价 / 目录总价
// 红线: 所有金额与导出表单元格逐位一致
// ==========================================

use crate::domain::quote::{LinePricing, QuoteLine};
use crate::domain::types::UnitOfMeasure;
use crate::engine::rounding::{round2, round3};
use serde::{Deserialize, Serialize};

/// 行号步长（100, 200, ...）
pub const POSITION_STEP: u32 = 100;

// ==========================================
// PricedLine - 已计价的行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    pub position: u32,
    pub description: String,
    pub code: String,
    pub unit: UnitOfMeasure,
    pub quantity: f64,

    // ===== 仅按米计价 =====
    pub weight_kg_m: Option<f64>,      // G: 米重（3 位）
    pub alloy_per_kg: Option<f64>,     // H: 合金附加费 €/kg（原值，显示 2 位）
    pub alloy_per_m: Option<f64>,      // I: 合金附加费 €/m（3 位）

    // ===== 目录价（折扣前）=====
    pub list_unit_price: f64,          // M: 基础价（2 位）
    pub list_line_total: f64,          // N: 折扣前行值（2 位）
    pub pre_discount_unit_price: f64,  // 折扣前单价（3 位）

    // ===== 折扣后 =====
    pub unit_base_price: f64,          // F: 折后基础价（2 位）
    pub unit_price: f64,               // J: 单价（3 位）
    pub line_total: f64,               // K: 行值（2 位）
}

// ==========================================
// QuoteTotals - 汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub discount_percent: f64,
    pub transport_percent: f64,
    /// 行值合计（出厂价）
    pub items_ex_works: f64,
    /// 包装运输
    pub transport: f64,
    /// 到货价
    pub delivered: f64,
    /// 目录价合计（折扣前）
    pub gross_from_list: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteComputation {
    pub lines: Vec<PricedLine>,
    pub totals: QuoteTotals,
}

/// 折扣限制在 [0, 100] 并取 2 位小数，非有限值按 0
///
/// 折扣标记按 2 位写入工作表，回读后必须得到同一折扣
pub fn clamp_discount(percent: f64) -> f64 {
    if percent.is_finite() {
        round2(percent.clamp(0.0, 100.0))
    } else {
        0.0
    }
}

/// 运输比例下限 0，非有限值按 0
pub fn clamp_transport(percent: f64) -> f64 {
    if percent.is_finite() {
        percent.max(0.0)
    } else {
        0.0
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// 计算单行价格
///
/// # 参数
/// - line: 报价行
/// - index: 行序号（从 0 开始）
/// - discount_percent: 已限制范围的折扣
pub fn price_line(line: &QuoteLine, index: usize, discount_percent: f64) -> PricedLine {
    let quantity = finite_or_zero(line.quantity);

    // 1. 原始行价
    let (base, weight, alloy_kg, alloy_m, unit_price) = match &line.pricing {
        LinePricing::Mt {
            base_price_per_m,
            weight_kg_m,
            alloy_surcharge_per_kg,
        } => {
            let base = finite_or_zero(*base_price_per_m);
            let peso = round3(finite_or_zero(*weight_kg_m));
            let alloy_kg = finite_or_zero(*alloy_surcharge_per_kg);
            let alloy_m = round3(alloy_kg * peso);
            let pu = round3(base + alloy_m);
            (base, Some(peso), Some(alloy_kg), Some(alloy_m), pu)
        }
        LinePricing::Pz { base_price_per_pc } => {
            let base = finite_or_zero(*base_price_per_pc);
            (base, None, None, None, round3(base))
        }
    };
    let line_total = round2(unit_price * quantity);

    // 2. 折扣前目录价
    let list_unit_price = round2(base);
    let list_line_total = round2(line_total);

    // 3. 应用折扣
    let unit_base_price = round2(list_unit_price * (1.0 - discount_percent / 100.0));
    let discounted_unit = match line.unit() {
        UnitOfMeasure::Mt => round3(unit_base_price + alloy_m.unwrap_or(0.0)),
        UnitOfMeasure::Pz => round3(unit_base_price),
    };
    let discounted_total = round2(discounted_unit * quantity);

    PricedLine {
        position: (index as u32 + 1) * POSITION_STEP,
        description: line.description.clone(),
        code: line.code.clone(),
        unit: line.unit(),
        quantity,
        weight_kg_m: weight,
        alloy_per_kg: alloy_kg,
        alloy_per_m: alloy_m,
        list_unit_price,
        list_line_total,
        pre_discount_unit_price: unit_price,
        unit_base_price,
        unit_price: discounted_unit,
        line_total: discounted_total,
    }
}

/// 计算整张报价
///
/// # 参数
/// - lines: 报价行（顺序即导出顺序）
/// - discount_percent: 折扣（限制在 0..=100）
/// - transport_percent: 包装运输比例（下限 0）
pub fn compute_quote(
    lines: &[QuoteLine],
    discount_percent: f64,
    transport_percent: f64,
) -> QuoteComputation {
    let discount = clamp_discount(discount_percent);
    let transport = clamp_transport(transport_percent);

    let priced: Vec<PricedLine> = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| price_line(line, idx, discount))
        .collect();

    let items_ex_works = round2(priced.iter().map(|l| l.line_total).sum::<f64>());
    let transport_value = round2(transport / 100.0 * items_ex_works);
    let delivered = round2(items_ex_works + transport_value);
    let gross_from_list = round2(priced.iter().map(|l| l.list_line_total).sum::<f64>());

    QuoteComputation {
        lines: priced,
        totals: QuoteTotals {
            discount_percent: discount,
            transport_percent: transport,
            items_ex_works,
            transport: transport_value,
            delivered,
            gross_from_list,
        },
    }
}

/// 未导出时的行单价预览（界面表格用）
///
/// 按米计价: base + round3(米重) × 合金附加费；按件计价: base
pub fn preview_unit_price(line: &QuoteLine) -> f64 {
    match &line.pricing {
        LinePricing::Mt {
            base_price_per_m,
            weight_kg_m,
            alloy_surcharge_per_kg,
        } => base_price_per_m + round3(*weight_kg_m) * alloy_surcharge_per_kg,
        LinePricing::Pz { base_price_per_pc } => *base_price_per_pc,
    }
}

/// 未导出时的行值预览
pub fn preview_line_total(line: &QuoteLine) -> f64 {
    round2(preview_unit_price(line) * line.quantity)
}

// ==========================================
// 建议折扣
// ==========================================
// 按报价总值（折扣前预览价）分档:
//   < 20000 → 35.83%
//   < 50000 → 41.18%
//   < 100000 → 46.52%
//   其余 → 51.87%
const SUGGESTED_DISCOUNT_TIERS: [(f64, f64); 3] =
    [(20_000.0, 35.83), (50_000.0, 41.18), (100_000.0, 46.52)];
const SUGGESTED_DISCOUNT_TOP: f64 = 51.87;

/// 报价总值（预览单价 × 数量，合计后取 2 位）
pub fn offer_total(lines: &[QuoteLine]) -> f64 {
    let total: f64 = lines
        .iter()
        .map(|line| preview_unit_price(line) * finite_or_zero(line.quantity))
        .sum();
    round2(total)
}

/// 按报价总值给出建议折扣
pub fn suggested_discount(offer_total: f64) -> f64 {
    SUGGESTED_DISCOUNT_TIERS
        .iter()
        .find(|(limit, _)| offer_total < *limit)
        .map_or(SUGGESTED_DISCOUNT_TOP, |(_, percent)| *percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ItemType, SimpleFittingKind};

    fn scenario_tube() -> QuoteLine {
        QuoteLine::tube("Tubes ASME BPE SF1 25 mm", "T25", 3.0, 10.0, 2.5, 1.2)
    }

    #[test]
    fn test_tube_scenario_with_discount() {
        let priced = price_line(&scenario_tube(), 0, 10.0);

        assert_eq!(priced.position, 100);
        assert_eq!(priced.unit, UnitOfMeasure::Mt);
        assert_eq!(priced.weight_kg_m, Some(2.5));
        assert_eq!(priced.alloy_per_kg, Some(1.2));
        assert_eq!(priced.alloy_per_m, Some(3.0));
        assert_eq!(priced.pre_discount_unit_price, 13.0);
        assert_eq!(priced.list_unit_price, 10.0);
        assert_eq!(priced.list_line_total, 39.0);
        assert_eq!(priced.unit_base_price, 9.0);
        assert_eq!(priced.unit_price, 12.0);
        assert_eq!(priced.line_total, 36.0);
    }

    #[test]
    fn test_zero_discount_keeps_unit_price() {
        let priced = price_line(&scenario_tube(), 0, 0.0);
        assert_eq!(priced.unit_price, priced.pre_discount_unit_price);
        assert_eq!(priced.line_total, priced.list_line_total);
    }

    #[test]
    fn test_piece_line() {
        let line = QuoteLine::piece(
            ItemType::Simple(SimpleFittingKind::Elbow90),
            "Elbows 90° ASME BPE SF1 25 mm",
            "E90-25",
            4.0,
            12.3456,
        );
        let priced = price_line(&line, 1, 0.0);
        assert_eq!(priced.position, 200);
        assert_eq!(priced.weight_kg_m, None);
        assert_eq!(priced.alloy_per_m, None);
        assert_eq!(priced.list_unit_price, 12.35);
        // 零折扣时 F' = M，单价取 2 位基础价
        assert_eq!(priced.unit_price, 12.35);
        assert_eq!(priced.line_total, 49.4);
    }

    #[test]
    fn test_totals() {
        let lines = vec![
            scenario_tube(),
            QuoteLine::manual("Valvola", 2.0, 50.0),
        ];
        let result = compute_quote(&lines, 10.0, 5.0);

        // 36.00 + 2 × 45.00
        assert_eq!(result.totals.items_ex_works, 126.0);
        assert_eq!(result.totals.transport, 6.3);
        assert_eq!(result.totals.delivered, 132.3);
        assert_eq!(result.totals.gross_from_list, 139.0);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(clamp_discount(150.0), 100.0);
        assert_eq!(clamp_discount(-5.0), 0.0);
        assert_eq!(clamp_discount(f64::NAN), 0.0);
        assert_eq!(clamp_transport(-1.0), 0.0);
        assert_eq!(clamp_transport(3.5), 3.5);

        let result = compute_quote(&[scenario_tube()], 100.0, -2.0);
        // 全额折扣后只剩合金附加费
        assert_eq!(result.lines[0].unit_price, 3.0);
        assert_eq!(result.totals.transport, 0.0);
    }

    #[test]
    fn test_discount_rounded_to_banner_precision() {
        assert_eq!(clamp_discount(12.345), 12.35);
        assert_eq!(clamp_discount(7.5), 7.5);

        let line = QuoteLine::manual("Valvola", 100.0, 99.99);
        let fine = compute_quote(&[line.clone()], 12.345, 0.0);
        let banner = compute_quote(&[line], 12.35, 0.0);
        assert_eq!(fine.totals.discount_percent, 12.35);
        assert_eq!(fine.lines[0].line_total, banner.lines[0].line_total);
    }

    #[test]
    fn test_alloy_surcharge_kept_unrounded() {
        let line = QuoteLine::tube("Tubes ASME BPE SF1 25 mm", "T25", 10.0, 10.0, 2.5, 1.234);
        let priced = price_line(&line, 0, 0.0);
        assert_eq!(priced.alloy_per_kg, Some(1.234));
        // 2.5 × 1.234 = 3.085
        assert_eq!(priced.alloy_per_m, Some(3.085));
        assert_eq!(priced.line_total, 130.85);
    }

    #[test]
    fn test_suggested_discount_tiers() {
        assert_eq!(suggested_discount(0.0), 35.83);
        assert_eq!(suggested_discount(19_999.99), 35.83);
        assert_eq!(suggested_discount(20_000.0), 41.18);
        assert_eq!(suggested_discount(49_999.99), 41.18);
        assert_eq!(suggested_discount(50_000.0), 46.52);
        assert_eq!(suggested_discount(99_999.99), 46.52);
        assert_eq!(suggested_discount(100_000.0), 51.87);
        assert_eq!(suggested_discount(1e9), 51.87);
    }

    #[test]
    fn test_offer_total() {
        let lines = vec![scenario_tube(), QuoteLine::manual("Valvola", 2.0, 50.0)];
        // 3 × 13.00 + 2 × 50.00
        assert_eq!(offer_total(&lines), 139.0);
        assert_eq!(offer_total(&[]), 0.0);
    }

    #[test]
    fn test_preview_unit_price() {
        assert!((preview_unit_price(&scenario_tube()) - 13.0).abs() < 1e-9);
        assert_eq!(preview_line_total(&scenario_tube()), 39.0);
        assert_eq!(preview_unit_price(&QuoteLine::manual("x", 1.0, 7.5)), 7.5);
    }
}
