// ==========================================
// 管件报价系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为带明确原因的用户可读消息
// 约定: 校验错误必须指明字段
// ==========================================

use crate::config::ConfigError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("数据验证失败 (字段: {field}): {message}")]
    ValidationError { field: String, message: String },

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("报价导出失败: {0}")]
    ExportError(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 构造字段校验错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ==========================================
// 从各层错误转换
// ==========================================
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::InvalidQuote(msg) => ApiError::InvalidInput(msg),
            ExportError::WorkbookReadError(msg) | ExportError::WorksheetNotFound(msg) => {
                ApiError::ImportError(msg)
            }
            ExportError::XlsxWriteError(msg) => ApiError::ExportError(msg),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = ApiError::validation("lines[0].quantity", "数量必须大于 0");
        let msg = err.to_string();
        assert!(msg.contains("lines[0].quantity"));
        assert!(msg.contains("数量必须大于 0"));
    }

    #[test]
    fn test_export_error_conversion() {
        let api_err: ApiError = ExportError::WorkbookReadError("zip".to_string()).into();
        assert!(matches!(api_err, ApiError::ImportError(_)));

        let api_err: ApiError = ExportError::XlsxWriteError("disk".to_string()).into();
        assert!(matches!(api_err, ApiError::ExportError(_)));

        let api_err: ApiError = ExportError::InvalidQuote("empty".to_string()).into();
        assert!(matches!(api_err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::FileNotFound("a.xlsx".to_string()).into();
        match api_err {
            ApiError::ImportError(msg) => assert!(msg.contains("a.xlsx")),
            _ => panic!("Expected ImportError"),
        }
    }
}
