// ==========================================
// 管件报价系统 - 核心库
// ==========================================
// 组成: 目录导入（管材/简单管件/三通异径管工作簿）+ 报价计算与导出
// 技术栈: Rust + calamine + rust_xlsxwriter
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "it");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 数据目录与表面等级
pub mod config;

// 导入层 - 目录工作簿
pub mod importer;

// 引擎层 - 计价规则
pub mod engine;

// 导出层 - 报价工作簿
pub mod exporter;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 性能埋点
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ComplexFittingKind, Currency, ItemType, SimpleFittingKind, UnitOfMeasure};

// 领域实体
pub use domain::{
    CatalogSnapshot, ComplexFitting, ExportRequest, LinePricing, LineSelection, QuoteLine,
    QuoteMeta, ReimportedQuote, SimpleFitting, TubeItem,
};

// 引擎
pub use engine::{compute_quote, PricedLine, QuoteComputation, QuoteTotals};

// API
pub use api::{ApiError, ApiResult, CatalogApi, ExportedQuote, QuoteApi};

// 应用
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "管件报价系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
