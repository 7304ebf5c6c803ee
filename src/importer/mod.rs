// ==========================================
// 管件报价系统 - 目录导入层
// ==========================================
// 职责: 源工作簿 → 类型化目录快照
// 支持: Excel (.xlsx/.xlsm/.xls), OpenDocument (.ods), 内存数据
// ==========================================

// 模块声明
pub mod catalog_loader;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use catalog_loader::{resolve_sheet, CatalogLoader};
pub use data_cleaner::{format_dimension, format_mm, resolve_dimension, Dimension};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{parse_number, parse_number_str, pick_field};
pub use file_parser::{ExcelWorkbook, InMemoryWorkbook, RawCell, RawRow, SheetSource};
