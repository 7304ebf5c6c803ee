// ==========================================
// 管件报价系统 - 领域模型层
// ==========================================
// 职责: 定义目录条目、报价行、导出请求
// 红线: 不含文件读写逻辑,不含计算逻辑
// ==========================================

pub mod catalog;
pub mod quote;
pub mod types;

// 重导出核心类型
pub use catalog::{
    CatalogItem, CatalogSnapshot, ComplexFilter, ComplexFitting, SegmentCounts, SimpleFilter,
    SimpleFitting, TubeFilter, TubeItem,
};
pub use quote::{
    ExportRequest, LinePricing, LineSelection, QuoteLine, QuoteMeta, ReimportedQuote,
};
pub use types::{ComplexFittingKind, Currency, ItemType, SimpleFittingKind, UnitOfMeasure};
