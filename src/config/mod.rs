// ==========================================
// 管件报价系统 - 配置层
// ==========================================
// 职责: 应用配置加载、表面等级定义
// 存储: JSON 配置文件 + 环境变量覆写
// ==========================================

pub mod app_config;
pub mod finish;

// 重导出核心配置类型
pub use app_config::{config_keys, AppConfig, ConfigError};
pub use finish::{default_finishes, Finish};
