// ==========================================
// 管件报价系统 - 报价领域模型
// ==========================================
// 用途: 报价行 / 导出请求 / 回读结果
// 红线: 只有按米计价的行携带米重与合金附加费
// ==========================================

use crate::domain::types::{Currency, ItemType, UnitOfMeasure};
use serde::{Deserialize, Serialize};

// ==========================================
// LinePricing - 行计价方式
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "lowercase")]
pub enum LinePricing {
    /// 按米计价（管材）
    Mt {
        base_price_per_m: f64,
        weight_kg_m: f64,
        alloy_surcharge_per_kg: f64,
    },
    /// 按件计价
    Pz { base_price_per_pc: f64 },
}

impl LinePricing {
    pub fn unit(&self) -> UnitOfMeasure {
        match self {
            LinePricing::Mt { .. } => UnitOfMeasure::Mt,
            LinePricing::Pz { .. } => UnitOfMeasure::Pz,
        }
    }

    pub fn base_price(&self) -> f64 {
        match self {
            LinePricing::Mt {
                base_price_per_m, ..
            } => *base_price_per_m,
            LinePricing::Pz { base_price_per_pc } => *base_price_per_pc,
        }
    }
}

// ==========================================
// QuoteLine - 报价行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub item_type: ItemType,
    #[serde(default)]
    pub finish: Option<String>, // 表面等级（仅展示，导出不保留）
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    pub quantity: f64,
    #[serde(default)]
    pub size: Option<String>, // ND 或 "OD1 x OD2"（仅展示，导出不保留）
    pub pricing: LinePricing,
}

impl QuoteLine {
    /// 管材行（按米）
    pub fn tube(
        description: impl Into<String>,
        code: impl Into<String>,
        quantity: f64,
        base_price_per_m: f64,
        weight_kg_m: f64,
        alloy_surcharge_per_kg: f64,
    ) -> Self {
        Self {
            item_type: ItemType::Tube,
            finish: None,
            description: description.into(),
            code: code.into(),
            quantity,
            size: None,
            pricing: LinePricing::Mt {
                base_price_per_m,
                weight_kg_m,
                alloy_surcharge_per_kg,
            },
        }
    }

    /// 按件计价的行
    pub fn piece(
        item_type: ItemType,
        description: impl Into<String>,
        code: impl Into<String>,
        quantity: f64,
        base_price_per_pc: f64,
    ) -> Self {
        Self {
            item_type,
            finish: None,
            description: description.into(),
            code: code.into(),
            quantity,
            size: None,
            pricing: LinePricing::Pz { base_price_per_pc },
        }
    }

    /// 手工录入行（Other Items）
    pub fn manual(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self::piece(ItemType::OtherItem, description, "", quantity, unit_price)
    }

    pub fn with_finish(mut self, finish: impl Into<String>) -> Self {
        self.finish = Some(finish.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn unit(&self) -> UnitOfMeasure {
        self.pricing.unit()
    }

    pub fn base_price(&self) -> f64 {
        self.pricing.base_price()
    }
}

// ==========================================
// QuoteMeta - 报价抬头信息
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteMeta {
    #[serde(default)]
    pub request_ref: Option<String>, // 询价编号
    #[serde(default)]
    pub customer: Option<String>, // 客户
    #[serde(default)]
    pub site: Option<String>, // 工地
}

// ==========================================
// ExportRequest - 导出请求（不持久化）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub lines: Vec<QuoteLine>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub discount_percent: f64,
    #[serde(default)]
    pub transport_percent: f64,
    #[serde(default)]
    pub meta: QuoteMeta,
    #[serde(default)]
    pub locale: Option<String>,
}

// ==========================================
// LineSelection - 操作员选择（从目录生成报价行）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineSelection {
    pub item_type: Option<ItemType>,
    pub finish: Option<String>,
    pub nd: Option<String>,
    pub od1: Option<String>,
    pub od2: Option<String>,
    pub quantity: f64,
    #[serde(default)]
    pub alloy_surcharge_per_kg: Option<f64>, // 仅管材
}

// ==========================================
// ReimportedQuote - 导出表回读结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReimportedQuote {
    pub lines: Vec<QuoteLine>,
    /// O1 单元格中的折扣（若存在）
    pub discount_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tube_line_unit() {
        let line = QuoteLine::tube("Tubes SF1 25 mm", "T25", 3.0, 10.0, 2.5, 1.2);
        assert_eq!(line.unit(), UnitOfMeasure::Mt);
        assert_eq!(line.base_price(), 10.0);
        assert!(line.item_type.is_length_priced());
    }

    #[test]
    fn test_manual_line_is_piece_priced() {
        let line = QuoteLine::manual("Valvola a sfera", 2.0, 55.5);
        assert_eq!(line.item_type, ItemType::OtherItem);
        assert_eq!(line.unit(), UnitOfMeasure::Pz);
        assert_eq!(line.base_price(), 55.5);
    }

    #[test]
    fn test_quote_line_json_shape() {
        let line = QuoteLine::tube("d", "c", 1.0, 10.0, 2.5, 1.2).with_finish("ASME BPE SF1");
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["item_type"], "Tubes");
        assert_eq!(value["pricing"]["unit"], "mt");
        assert_eq!(value["pricing"]["weight_kg_m"], 2.5);

        let back: QuoteLine = serde_json::from_value(value).unwrap();
        assert_eq!(back, line);
    }

    #[test]
    fn test_export_request_defaults() {
        let json = r#"{"lines": []}"#;
        let request: ExportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.currency, Currency::Eur);
        assert_eq!(request.discount_percent, 0.0);
        assert_eq!(request.meta, QuoteMeta::default());
    }
}
