// ==========================================
// 管件报价系统 - 报价导出/回读错误类型
// ==========================================

use thiserror::Error;

/// 报价工作簿错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("工作簿写入失败: {0}")]
    XlsxWriteError(String),

    #[error("工作簿无法读取: {0}")]
    WorkbookReadError(String),

    #[error("工作表不存在: {0}")]
    WorksheetNotFound(String),

    #[error("报价内容无效: {0}")]
    InvalidQuote(String),
}

// 实现 From<rust_xlsxwriter::XlsxError>
impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::XlsxWriteError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ExportError {
    fn from(err: calamine::XlsxError) -> Self {
        ExportError::WorkbookReadError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
