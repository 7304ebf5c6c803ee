// ==========================================
// 管件报价系统 - 领域类型定义
// ==========================================
// 职责: 物料类型 / 计量单位 / 币种
// 序列化格式: 与目录表及导出表中的显示文本一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 简单管件类型 (仅 ND 定位)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SimpleFittingKind {
    #[serde(rename = "Elbows 90°")]
    Elbow90,
    #[serde(rename = "Elbows 45°")]
    Elbow45,
    #[serde(rename = "End Caps")]
    EndCap,
    #[serde(rename = "Ferrule A (Long)")]
    FerruleLong,
    #[serde(rename = "Ferrule B (Medium)")]
    FerruleMedium,
    #[serde(rename = "Ferrule C (Short)")]
    FerruleShort,
    #[serde(rename = "Clamps")]
    Clamp,
}

impl SimpleFittingKind {
    pub const ALL: [SimpleFittingKind; 7] = [
        SimpleFittingKind::Elbow90,
        SimpleFittingKind::Elbow45,
        SimpleFittingKind::EndCap,
        SimpleFittingKind::FerruleLong,
        SimpleFittingKind::FerruleMedium,
        SimpleFittingKind::FerruleShort,
        SimpleFittingKind::Clamp,
    ];

    /// 显示文本（同时也是目录查询的 type 参数）
    pub fn label(&self) -> &'static str {
        match self {
            SimpleFittingKind::Elbow90 => "Elbows 90°",
            SimpleFittingKind::Elbow45 => "Elbows 45°",
            SimpleFittingKind::EndCap => "End Caps",
            SimpleFittingKind::FerruleLong => "Ferrule A (Long)",
            SimpleFittingKind::FerruleMedium => "Ferrule B (Medium)",
            SimpleFittingKind::FerruleShort => "Ferrule C (Short)",
            SimpleFittingKind::Clamp => "Clamps",
        }
    }

    pub fn is_ferrule(&self) -> bool {
        matches!(
            self,
            SimpleFittingKind::FerruleLong
                | SimpleFittingKind::FerruleMedium
                | SimpleFittingKind::FerruleShort
        )
    }

    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|k| k.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for SimpleFittingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// 复杂管件类型 (OD1/OD2 定位)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplexFittingKind {
    #[serde(rename = "Tees")]
    Tee,
    #[serde(rename = "Conc. Reducers")]
    ConcentricReducer,
    #[serde(rename = "Ecc. Reducers")]
    EccentricReducer,
}

impl ComplexFittingKind {
    pub const ALL: [ComplexFittingKind; 3] = [
        ComplexFittingKind::Tee,
        ComplexFittingKind::ConcentricReducer,
        ComplexFittingKind::EccentricReducer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ComplexFittingKind::Tee => "Tees",
            ComplexFittingKind::ConcentricReducer => "Conc. Reducers",
            ComplexFittingKind::EccentricReducer => "Ecc. Reducers",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|k| k.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for ComplexFittingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// 报价行物料类型 (Item Type)
// ==========================================
// 管材按米计价，其余按件计价
// Imported: 从导出表回读、无法还原目录来源的行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ItemType {
    Tube,
    CoaxialTube,
    Simple(SimpleFittingKind),
    Complex(ComplexFittingKind),
    OtherItem,
    Imported,
}

impl ItemType {
    pub const TUBE_LABEL: &'static str = "Tubes";
    pub const COAXIAL_TUBE_LABEL: &'static str = "Coassiali Tubes";
    pub const OTHER_ITEM_LABEL: &'static str = "Other Items";
    pub const IMPORTED_LABEL: &'static str = "Imported";

    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Tube => Self::TUBE_LABEL,
            ItemType::CoaxialTube => Self::COAXIAL_TUBE_LABEL,
            ItemType::Simple(kind) => kind.label(),
            ItemType::Complex(kind) => kind.label(),
            ItemType::OtherItem => Self::OTHER_ITEM_LABEL,
            ItemType::Imported => Self::IMPORTED_LABEL,
        }
    }

    /// 是否按长度（米）计价
    pub fn is_length_priced(&self) -> bool {
        matches!(self, ItemType::Tube | ItemType::CoaxialTube)
    }

    /// 从显示文本解析（不区分大小写）
    pub fn from_label(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(Self::TUBE_LABEL) {
            return Some(ItemType::Tube);
        }
        if trimmed.eq_ignore_ascii_case(Self::COAXIAL_TUBE_LABEL) {
            return Some(ItemType::CoaxialTube);
        }
        if trimmed.eq_ignore_ascii_case(Self::OTHER_ITEM_LABEL) {
            return Some(ItemType::OtherItem);
        }
        if trimmed.eq_ignore_ascii_case(Self::IMPORTED_LABEL) {
            return Some(ItemType::Imported);
        }
        SimpleFittingKind::from_label(trimmed)
            .map(ItemType::Simple)
            .or_else(|| ComplexFittingKind::from_label(trimmed).map(ItemType::Complex))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<ItemType> for String {
    fn from(value: ItemType) -> Self {
        value.label().to_string()
    }
}

impl TryFrom<String> for ItemType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ItemType::from_label(&value).ok_or_else(|| format!("未知物料类型: {}", value))
    }
}

// ==========================================
// 计量单位 (Unit of Measure)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    Mt, // 按米
    Pz, // 按件
}

impl UnitOfMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Mt => "mt",
            UnitOfMeasure::Pz => "pz",
        }
    }

    /// 导出表 D 列回读；只有 "mt" 明确表示按米
    pub fn from_cell_text(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("mt") {
            UnitOfMeasure::Mt
        } else {
            UnitOfMeasure::Pz
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 币种 (Currency)
// ==========================================
// 目前只支持欧元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
        }
    }

    /// 货币单元格显示格式（两位小数）
    pub fn number_format(&self) -> String {
        format!("{} #,##0.00", self.symbol())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_label_roundtrip() {
        for kind in SimpleFittingKind::ALL {
            let item = ItemType::Simple(kind);
            assert_eq!(ItemType::from_label(item.label()), Some(item));
        }
        for kind in ComplexFittingKind::ALL {
            let item = ItemType::Complex(kind);
            assert_eq!(ItemType::from_label(item.label()), Some(item));
        }
        assert_eq!(ItemType::from_label(" tubes "), Some(ItemType::Tube));
        assert_eq!(ItemType::from_label("Imported"), Some(ItemType::Imported));
        assert_eq!(ItemType::from_label("Valves"), None);
    }

    #[test]
    fn test_item_type_serde_uses_label() {
        let json = serde_json::to_string(&ItemType::Simple(SimpleFittingKind::Elbow90)).unwrap();
        assert_eq!(json, "\"Elbows 90°\"");

        let parsed: ItemType = serde_json::from_str("\"Conc. Reducers\"").unwrap();
        assert_eq!(parsed, ItemType::Complex(ComplexFittingKind::ConcentricReducer));

        assert!(serde_json::from_str::<ItemType>("\"Valves\"").is_err());
    }

    #[test]
    fn test_length_priced() {
        assert!(ItemType::Tube.is_length_priced());
        assert!(ItemType::CoaxialTube.is_length_priced());
        assert!(!ItemType::Imported.is_length_priced());
        assert!(!ItemType::Complex(ComplexFittingKind::Tee).is_length_priced());
    }

    #[test]
    fn test_unit_from_cell_text() {
        assert_eq!(UnitOfMeasure::from_cell_text(" MT "), UnitOfMeasure::Mt);
        assert_eq!(UnitOfMeasure::from_cell_text("pz"), UnitOfMeasure::Pz);
        assert_eq!(UnitOfMeasure::from_cell_text(""), UnitOfMeasure::Pz);
    }

    #[test]
    fn test_currency_format() {
        assert_eq!(Currency::default().number_format(), "€ #,##0.00");
        assert_eq!(serde_json::to_string(&Currency::Eur).unwrap(), "\"EUR\"");
    }
}
