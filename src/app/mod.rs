// ==========================================
// 管件报价系统 - 应用层
// ==========================================
// 职责: 装配配置与 API 实例
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
