// ==========================================
// 管件报价系统 - API 层
// ==========================================
// 职责: 提供目录查询与报价导出/回读接口，供命令行调用
// ==========================================

pub mod catalog_api;
pub mod error;
pub mod quote_api;
pub mod validator;

// 重导出核心类型
pub use catalog_api::{CatalogApi, CatalogStore, OdChoice, ReloadSummary};
pub use error::{ApiError, ApiResult};
pub use quote_api::{DiscountSuggestion, ExportedQuote, LinePreview, QuoteApi};
pub use validator::QuoteValidator;
