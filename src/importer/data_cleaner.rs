// ==========================================
// 管件报价系统 - 尺寸标签规范化
// ==========================================
// 职责: ND / OD 尺寸列 → 规范化文本标签
// 红线: 相同尺寸值（25 / 25.0 / "25"）必须得到完全相同的标签
// ==========================================

use crate::importer::field_mapper::{parse_number, pick_field, strict_number};
use crate::importer::file_parser::{RawCell, RawRow};

// ==========================================
// 尺寸列别名
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct DimensionKeys {
    /// 毫米数值列
    pub mm: &'static [&'static str],
    /// 英寸文本列
    pub inch: &'static [&'static str],
    /// 旧版单列（数值按毫米，文本按英寸原样）
    pub legacy: &'static [&'static str],
}

pub const ND_KEYS: DimensionKeys = DimensionKeys {
    mm: &["ND mm", "DN mm", "ND (mm)", "mm"],
    inch: &["ND inch", "ND (inch)", "Inch"],
    legacy: &["ND", "DN", "Nominal Diameter"],
};

pub const OD1_KEYS: DimensionKeys = DimensionKeys {
    mm: &["OD1 mm", "OD1 (mm)"],
    inch: &["OD1 inch", "OD1 (inch)"],
    legacy: &["OD1", "OD min", "OD smaller", "DN1"],
};

pub const OD2_KEYS: DimensionKeys = DimensionKeys {
    mm: &["OD2 mm", "OD2 (mm)"],
    inch: &["OD2 inch", "OD2 (inch)"],
    legacy: &["OD2", "OD max", "OD bigger", "DN2"],
};

/// 解析后的尺寸
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub label: String,
    /// 毫米数值（仅英寸文本时为 None）
    pub value: Option<f64>,
}

/// 毫米数值文本（最多 3 位小数，去掉末尾 0）
pub fn format_mm(mm: f64) -> String {
    let text = format!("{:.3}", mm);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// 组合尺寸标签
///
/// # 返回
/// - 毫米 + 英寸: `"25 mm (1\")"`
/// - 仅毫米: `"25 mm"`
/// - 仅英寸: 原样
/// - 都没有: 空串（调用方跳过该行）
pub fn format_dimension(mm: Option<f64>, inch: Option<&str>) -> String {
    let mm = mm.filter(|v| *v > 0.0);
    let inch = inch.map(str::trim).filter(|s| !s.is_empty());
    match (mm, inch) {
        (Some(mm), Some(inch)) => format!("{} mm ({})", format_mm(mm), inch),
        (Some(mm), None) => format!("{} mm", format_mm(mm)),
        (None, Some(inch)) => inch.to_string(),
        (None, None) => String::new(),
    }
}

/// 从行中解析尺寸
///
/// # 返回
/// - None: 行中没有可用尺寸
pub fn resolve_dimension(row: &RawRow, keys: &DimensionKeys) -> Option<Dimension> {
    let mut mm = pick_field(row, keys.mm)
        .map(parse_number)
        .filter(|v| *v > 0.0);
    let mut inch = pick_field(row, keys.inch).map(RawCell::as_text);

    if mm.is_none() || inch.is_none() {
        match pick_field(row, keys.legacy) {
            Some(RawCell::Number(n)) if mm.is_none() && *n > 0.0 => mm = Some(*n),
            Some(RawCell::Text(text)) => match strict_number(text) {
                Some(n) if n > 0.0 => {
                    if mm.is_none() {
                        mm = Some(n);
                    }
                }
                Some(_) => {}
                None => {
                    if inch.is_none() {
                        inch = Some(text.trim().to_string());
                    }
                }
            },
            _ => {}
        }
    }

    let label = format_dimension(mm, inch.as_deref());
    if label.is_empty() {
        return None;
    }
    Some(Dimension { label, value: mm })
}

/// 标签开头的数值（用于尺寸排序）
pub fn leading_number(label: &str) -> Option<f64> {
    let s = label.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == ','))
        .map_or(s.len(), |(i, _)| i);
    strict_number(&s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, RawCell)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_format_mm_trims_zeros() {
        assert_eq!(format_mm(25.0), "25");
        assert_eq!(format_mm(25.40), "25.4");
        assert_eq!(format_mm(12.7000001), "12.7");
        assert_eq!(format_mm(6.35), "6.35");
    }

    #[test]
    fn test_format_dimension_variants() {
        assert_eq!(format_dimension(Some(25.0), Some("1\"")), "25 mm (1\")");
        assert_eq!(format_dimension(Some(25.0), None), "25 mm");
        assert_eq!(format_dimension(None, Some(" 1/2\" ")), "1/2\"");
        assert_eq!(format_dimension(None, None), "");
        assert_eq!(format_dimension(Some(0.0), Some("")), "");
    }

    #[test]
    fn test_same_value_same_label() {
        let a = resolve_dimension(&row(&[("ND", RawCell::Number(25.0))]), &ND_KEYS).unwrap();
        let b = resolve_dimension(&row(&[("ND", RawCell::Text("25.0".to_string()))]), &ND_KEYS)
            .unwrap();
        let c = resolve_dimension(&row(&[("ND mm", RawCell::Text("25".to_string()))]), &ND_KEYS)
            .unwrap();
        assert_eq!(a.label, "25 mm");
        assert_eq!(a.label, b.label);
        assert_eq!(b.label, c.label);
    }

    #[test]
    fn test_resolve_dimension_mm_and_inch() {
        let r = row(&[
            ("ND mm", RawCell::Number(25.4)),
            ("ND inch", RawCell::Text("1\"".to_string())),
        ]);
        let dim = resolve_dimension(&r, &ND_KEYS).unwrap();
        assert_eq!(dim.label, "25.4 mm (1\")");
        assert_eq!(dim.value, Some(25.4));
    }

    #[test]
    fn test_resolve_dimension_legacy_text_is_inch() {
        let r = row(&[("ND", RawCell::Text("1 1/2\"".to_string()))]);
        let dim = resolve_dimension(&r, &ND_KEYS).unwrap();
        assert_eq!(dim.label, "1 1/2\"");
        assert_eq!(dim.value, None);
    }

    #[test]
    fn test_resolve_dimension_missing() {
        let r = row(&[("Code", RawCell::Text("X".to_string()))]);
        assert!(resolve_dimension(&r, &ND_KEYS).is_none());
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("25 mm (1\")"), Some(25.0));
        assert_eq!(leading_number("12.7 mm"), Some(12.7));
        assert_eq!(leading_number("1/2\""), Some(1.0));
        assert_eq!(leading_number("abc"), None);
    }
}
