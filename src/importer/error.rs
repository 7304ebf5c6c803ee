// ==========================================
// 管件报价系统 - 目录导入错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 这些错误只在单个文件/工作表范围内传播，
//       由 CatalogLoader 捕获并降级为空数据段
// ==========================================

use thiserror::Error;

/// 目录导入错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls/.ods）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    // ===== 工作表错误 =====
    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    #[error("工作表无表头 ({0})")]
    MissingHeader(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
