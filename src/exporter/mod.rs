// ==========================================
// 管件报价系统 - 报价导出层
// ==========================================
// 职责: 计价结果 → 带公式汇总的 xlsx；已导出 xlsx → 报价行
// 工具: rust_xlsxwriter（写）, calamine（读）
// ==========================================

pub mod error;
pub mod layout;
pub mod reimport;
pub mod xlsx_writer;

// 重导出核心类型
pub use error::{ExportError, ExportResult};
pub use reimport::{parse_discount_banner, read_quote};
pub use xlsx_writer::{default_file_name, default_file_name_today, QuoteWorkbookWriter};
