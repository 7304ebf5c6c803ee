// ==========================================
// 管件报价系统 - 应用配置
// ==========================================
// 职责: 数据目录 / 源文件名 / 默认语言 / 表面等级
// 存储: JSON 文件（可选），缺省值见 Default
// 优先级: 显式路径 > PIPE_QUOTE_CONFIG > 用户配置目录 > 默认值
// ==========================================

use crate::config::finish::{default_finishes, Finish};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置相关的键（环境变量名与文件名）
pub mod config_keys {
    /// 配置文件路径
    pub const CONFIG_PATH_ENV: &str = "PIPE_QUOTE_CONFIG";
    /// 数据目录覆写
    pub const DATA_DIR_ENV: &str = "PIPE_QUOTE_DATA_DIR";
    /// 用户配置目录下的子目录
    pub const CONFIG_DIR_NAME: &str = "pipe-quote";
    /// 配置文件名
    pub const CONFIG_FILE_NAME: &str = "config.json";
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值无效 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 目录源文件所在目录
    pub data_dir: PathBuf,
    /// 管材 + 简单管件工作簿
    pub tubes_workbook: String,
    /// 三通 + 异径管工作簿
    pub complex_workbook: String,
    /// 导出表默认语言
    pub default_locale: String,
    /// 表面等级
    pub finishes: Vec<Finish>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tubes_workbook: "ASME_BPE.xlsx".to_string(),
            complex_workbook: "Tees_Reducers_ASME_BPE.xlsx".to_string(),
            default_locale: "it".to_string(),
            finishes: default_finishes(),
        }
    }
}

impl AppConfig {
    /// 加载配置
    ///
    /// # 参数
    /// - explicit: 显式指定的配置文件（命令行 --config）
    ///
    /// # 说明
    /// - 未找到任何配置文件时使用默认值
    /// - PIPE_QUOTE_DATA_DIR 最后覆写数据目录
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let candidate = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(config_keys::CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(|| Self::default_config_path().filter(|p| p.exists()));

        let mut config = match candidate {
            Some(path) => {
                tracing::info!(path = %path.display(), "读取配置文件");
                Self::from_file(&path)?
            }
            None => {
                tracing::debug!("未找到配置文件，使用默认配置");
                Self::default()
            }
        };

        if let Some(dir) = std::env::var_os(config_keys::DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: AppConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 用户配置目录下的默认配置路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(config_keys::CONFIG_DIR_NAME)
                .join(config_keys::CONFIG_FILE_NAME)
        })
    }

    /// 以指定数据目录构造（其余为默认值）
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn tubes_workbook_path(&self) -> PathBuf {
        self.data_dir.join(&self.tubes_workbook)
    }

    pub fn complex_workbook_path(&self) -> PathBuf {
        self.data_dir.join(&self.complex_workbook)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.finishes.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "finishes".to_string(),
                message: "至少需要一个表面等级".to_string(),
            });
        }
        if let Some(blank) = self.finishes.iter().find(|f| f.key.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "finishes.key".to_string(),
                message: format!("表面等级标识为空: {:?}", blank),
            });
        }
        Ok(())
    }
}
