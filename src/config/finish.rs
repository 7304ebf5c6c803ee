// ==========================================
// 管件报价系统 - 表面等级定义
// ==========================================
// 职责: 每个等级在源表中的价格列/编码列别名
// 说明: 源表不同版本列名不一致，按别名顺序查找
// ==========================================

use serde::{Deserialize, Serialize};

/// 表面等级（进程启动时确定，之后不可变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finish {
    /// 等级标识（如 "ASME BPE SF1"）
    pub key: String,
    /// 管材价格列（€/m）
    pub tube_price_keys: Vec<String>,
    /// 管件价格列（€/pz）
    pub fitting_price_keys: Vec<String>,
    /// 管材编码列（等级专用，未命中时回退到公共编码列）
    #[serde(default)]
    pub tube_code_keys: Vec<String>,
    /// 管件编码列（等级专用，未命中时回退到公共编码列）
    #[serde(default)]
    pub fitting_code_keys: Vec<String>,
}

impl Finish {
    /// 按等级简称生成标准别名
    ///
    /// # 参数
    /// - key: 等级标识
    /// - short: 源表列名前缀（如 "SF1"）
    pub fn with_standard_aliases(key: &str, short: &str) -> Self {
        let tube_price = [
            format!("{} €/m", short),
            format!("{} €/mt", short),
            format!("{} €/MT", short),
        ];
        let fitting_price = [
            format!("{} €/pc", short),
            format!("{} €/pz", short),
            format!("{} €/piece", short),
        ];
        let codes = [
            format!("{} Code", short),
            format!("Code {}", short),
            format!("Codice {}", short),
        ];

        Self {
            key: key.to_string(),
            tube_price_keys: tube_price.to_vec(),
            fitting_price_keys: fitting_price.to_vec(),
            tube_code_keys: codes.to_vec(),
            fitting_code_keys: codes.to_vec(),
        }
    }
}

/// 默认等级: SF1 / SF4
pub fn default_finishes() -> Vec<Finish> {
    vec![
        Finish::with_standard_aliases("ASME BPE SF1", "SF1"),
        Finish::with_standard_aliases("ASME BPE SF4", "SF4"),
    ]
}
