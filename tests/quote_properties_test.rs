// ==========================================
// 报价计算属性测试
// ==========================================
// 测试目标: 汇总 / 运输 / 零折扣 / 导出回读 的不变量
// 用例数: 默认 128，可通过 PROPTEST_CASES 覆写
// ==========================================

use proptest::prelude::*;

use pipe_quote::config::AppConfig;
use pipe_quote::engine::compute_quote;
use pipe_quote::{ExportRequest, ItemType, QuoteApi, QuoteLine, SimpleFittingKind};

fn config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default_cases),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ==========================================
// 生成器
// ==========================================

/// 两位小数
fn arb_cents(max_cents: u32) -> impl Strategy<Value = f64> {
    (0..=max_cents).prop_map(|c| c as f64 / 100.0)
}

/// 三位小数（目录价可能不足一分）
fn arb_mills(max_mills: u32) -> impl Strategy<Value = f64> {
    (0..=max_mills).prop_map(|m| m as f64 / 1000.0)
}

fn arb_quantity() -> impl Strategy<Value = f64> {
    (1u32..=500).prop_map(|q| q as f64)
}

fn arb_tube() -> impl Strategy<Value = QuoteLine> {
    (
        arb_mills(500_000),
        (1u32..=20_000).prop_map(|g| g as f64 / 1000.0),
        arb_mills(8_000),
        arb_quantity(),
    )
        .prop_map(|(base, weight, alloy, qty)| {
            QuoteLine::tube("Tubes ASME BPE SF1", "T", qty, base, weight, alloy)
        })
}

fn arb_piece() -> impl Strategy<Value = QuoteLine> {
    (arb_mills(2_000_000), arb_quantity(), 0usize..SimpleFittingKind::ALL.len()).prop_map(
        |(base, qty, kind)| {
            QuoteLine::piece(
                ItemType::Simple(SimpleFittingKind::ALL[kind]),
                "Fitting",
                "F",
                qty,
                base,
            )
        },
    )
}

fn arb_lines() -> impl Strategy<Value = Vec<QuoteLine>> {
    prop::collection::vec(prop_oneof![arb_tube(), arb_piece()], 1..8)
}

fn arb_percent() -> impl Strategy<Value = f64> {
    arb_mills(100_000)
}

// ==========================================
// 属性
// ==========================================

proptest! {
    #![proptest_config(config(128))]

    #[test]
    fn ex_works_is_sum_of_line_totals(
        lines in arb_lines(),
        discount in arb_percent(),
        transport in arb_cents(2_000),
    ) {
        let result = compute_quote(&lines, discount, transport);
        let sum: f64 = result.lines.iter().map(|l| l.line_total).sum();
        prop_assert!((result.totals.items_ex_works - sum).abs() < 0.005);
    }

    #[test]
    fn transport_is_percentage_of_ex_works(
        lines in arb_lines(),
        discount in arb_percent(),
        transport in arb_cents(2_000),
    ) {
        let totals = compute_quote(&lines, discount, transport).totals;
        let expected = transport / 100.0 * totals.items_ex_works;
        let diff = totals.delivered - totals.items_ex_works;
        prop_assert!((diff - expected).abs() <= 0.0051);
        prop_assert!((totals.transport - expected).abs() <= 0.0051);
    }

    #[test]
    fn zero_discount_keeps_unit_price(lines in arb_lines()) {
        let result = compute_quote(&lines, 0.0, 0.0);
        for line in &result.lines {
            prop_assert_eq!(line.unit_price, line.pre_discount_unit_price);
        }
    }

    #[test]
    fn discount_never_raises_totals(lines in arb_lines(), discount in arb_percent()) {
        let full = compute_quote(&lines, 0.0, 0.0).totals;
        let discounted = compute_quote(&lines, discount, 0.0).totals;
        prop_assert!(discounted.items_ex_works <= full.items_ex_works + 1e-9);
        prop_assert_eq!(discounted.gross_from_list, full.gross_from_list);
    }
}

proptest! {
    #![proptest_config(config(16))]

    #[test]
    fn export_import_preserves_line_totals(
        lines in arb_lines(),
        discount in arb_percent(),
        transport in arb_cents(2_000),
    ) {
        let api = QuoteApi::new(&AppConfig::default());
        let request = ExportRequest {
            lines,
            discount_percent: discount,
            transport_percent: transport,
            ..Default::default()
        };
        let first = api.export(&request).unwrap();

        let reimported = api.import(&first.bytes).unwrap();
        prop_assert_eq!(reimported.lines.len(), request.lines.len());

        let again = ExportRequest {
            lines: reimported.lines,
            discount_percent: reimported.discount_percent.unwrap_or(0.0),
            transport_percent: transport,
            ..Default::default()
        };
        let original = api.compute(&request).unwrap();
        let round_trip = api.compute(&again).unwrap();

        for (a, b) in original.lines.iter().zip(round_trip.lines.iter()) {
            prop_assert_eq!(a.line_total, b.line_total);
        }
        // 目录总价按回读的 2 位基础价重算，不参与比较
        prop_assert_eq!(original.totals.items_ex_works, round_trip.totals.items_ex_works);
        prop_assert_eq!(original.totals.transport, round_trip.totals.transport);
        prop_assert_eq!(original.totals.delivered, round_trip.totals.delivered);
    }
}
