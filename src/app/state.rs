// ==========================================
// 管件报价系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和 API 实例
// ==========================================

use std::path::Path;
use std::sync::Arc;

use crate::api::{ApiResult, CatalogApi, QuoteApi};
use crate::config::AppConfig;

/// 应用状态
///
/// 目录 API 持有快照，可在多个线程间共享
pub struct AppState {
    /// 生效配置
    pub config: AppConfig,

    /// 目录 API
    pub catalog_api: Arc<CatalogApi>,

    /// 报价 API
    pub quote_api: Arc<QuoteApi>,
}

impl AppState {
    /// 加载配置并初始化（启动时读取一次目录）
    ///
    /// # 参数
    /// - config_path: 显式配置文件路径
    pub fn new(config_path: Option<&Path>) -> ApiResult<Self> {
        let config = AppConfig::load(config_path)?;
        Ok(Self::from_config(config))
    }

    /// 以现成配置初始化
    pub fn from_config(config: AppConfig) -> Self {
        tracing::info!(data_dir = %config.data_dir.display(), "初始化应用状态");

        let catalog_api = Arc::new(CatalogApi::new(&config));
        let quote_api = Arc::new(QuoteApi::new(&config));

        let counts = catalog_api.snapshot().counts();
        tracing::info!(
            tubes = counts.tubes,
            simple = counts.simple,
            complex = counts.complex,
            "目录加载完成"
        );

        Self {
            config,
            catalog_api,
            quote_api,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_with_missing_sources() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = AppState::from_config(AppConfig::with_data_dir(dir.path()));
        assert!(state.catalog_api.snapshot().is_empty());
        assert_eq!(state.config.default_locale, "it");
    }
}
