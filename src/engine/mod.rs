// ==========================================
// 管件报价系统 - 引擎层
// ==========================================
// 职责: 报价行计价、折扣、汇总（纯计算，不读写文件）
// 红线: 半进位舍入，每一步舍入后再参与下一步计算
// ==========================================

pub mod pricing;
pub mod rounding;

// 重导出核心引擎
pub use pricing::{
    clamp_discount, clamp_transport, compute_quote, offer_total, preview_line_total,
    preview_unit_price, price_line, suggested_discount, PricedLine, QuoteComputation,
    QuoteTotals, POSITION_STEP,
};
pub use rounding::{round2, round3, round_half_up};
