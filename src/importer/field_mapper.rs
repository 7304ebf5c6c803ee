// ==========================================
// 管件报价系统 - 字段映射器
// ==========================================
// 职责: 源列别名查找 + 宽松数值解析
// 策略: 数值解析失败一律记为 0（静默归零），非空但无法解析时记 debug 日志
// ==========================================

use crate::importer::file_parser::{RawCell, RawRow};

// ==========================================
// 数值解析
// ==========================================

/// 解析单元格数值
///
/// # 返回
/// - 数值单元格: 原值（非有限值记为 0）
/// - 文本单元格: 见 `parse_number_str`
pub fn parse_number(raw: &RawCell) -> f64 {
    match raw {
        RawCell::Number(n) if n.is_finite() => *n,
        RawCell::Number(_) => 0.0,
        RawCell::Text(s) => parse_number_str(s),
    }
}

/// 解析文本数值（小数点/小数逗号兼容）
///
/// # 规则
/// - 空文本 → 0
/// - 同时含 `.` 与 `,`: 靠右者为小数分隔符，另一个为千位分隔符
/// - 只含 `,`: 视为小数分隔符
/// - 无法解析 → 0
pub fn parse_number_str(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let normalized = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => s.replace('.', "").replacen(',', ".", 1),
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(_)) => s.replacen(',', ".", 1),
        _ => s.to_string(),
    };

    match normalized.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => {
            tracing::debug!(raw = %s, "数值无法解析，按 0 处理");
            0.0
        }
    }
}

/// 严格数值判断（整段文本均为数字）
pub fn strict_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

// ==========================================
// 别名查找
// ==========================================

fn is_present(cell: &RawCell) -> bool {
    match cell {
        RawCell::Number(_) => true,
        RawCell::Text(s) => !s.trim().is_empty(),
    }
}

/// 按候选列名查找第一个非空值
///
/// # 规则
/// 1. 精确匹配（列名已去空白）
/// 2. 忽略大小写匹配
pub fn pick_field<'a, K: AsRef<str>>(row: &'a RawRow, candidate_keys: &[K]) -> Option<&'a RawCell> {
    // 第一轮: 精确匹配
    for key in candidate_keys {
        if let Some(cell) = row.get(key.as_ref().trim()) {
            if is_present(cell) {
                return Some(cell);
            }
        }
    }

    // 第二轮: 忽略大小写
    for key in candidate_keys {
        let wanted = key.as_ref().trim().to_lowercase();
        let hit = row
            .iter()
            .find(|(header, cell)| header.trim().to_lowercase() == wanted && is_present(cell));
        if let Some((_, cell)) = hit {
            return Some(cell);
        }
    }

    None
}

/// 查找文本值（去空白，缺失返回 None）
pub fn pick_text<K: AsRef<str>>(row: &RawRow, candidate_keys: &[K]) -> Option<String> {
    pick_field(row, candidate_keys)
        .map(RawCell::as_text)
        .filter(|s| !s.is_empty())
}

/// 查找数值（缺失或无法解析返回 0）
pub fn pick_number<K: AsRef<str>>(row: &RawRow, candidate_keys: &[K]) -> f64 {
    pick_field(row, candidate_keys).map_or(0.0, parse_number)
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
    fn test_parse_number_separators() {
        assert_eq!(parse_number_str("1.234,56"), 1234.56);
        assert_eq!(parse_number_str("1,234.56"), 1234.56);
        assert_eq!(parse_number_str("12,5"), 12.5);
        assert_eq!(parse_number_str("12.5"), 12.5);
        assert_eq!(parse_number_str(" 7 "), 7.0);
    }

    #[test]
    fn test_parse_number_permissive_zero() {
        assert_eq!(parse_number_str(""), 0.0);
        assert_eq!(parse_number_str("n/a"), 0.0);
        assert_eq!(parse_number_str("inf"), 0.0);
        assert_eq!(parse_number(&RawCell::Number(f64::NAN)), 0.0);
        assert_eq!(parse_number(&RawCell::Number(3.25)), 3.25);
    }

    #[test]
    fn test_strict_number() {
        assert_eq!(strict_number("25"), Some(25.0));
        assert_eq!(strict_number("25,4"), Some(25.4));
        assert_eq!(strict_number("1\""), None);
        assert_eq!(strict_number(" "), None);
    }

    #[test]
    fn test_pick_field_exact_before_case_insensitive() {
        let r = row(&[
            ("sf1 €/m", RawCell::Number(1.0)),
            ("SF1 €/m", RawCell::Number(2.0)),
        ]);
        assert_eq!(pick_field(&r, &["SF1 €/m"]), Some(&RawCell::Number(2.0)));
    }

    #[test]
    fn test_pick_field_case_insensitive_and_order() {
        let r = row(&[
            ("code", RawCell::Text("C-1".to_string())),
            ("Item Code", RawCell::Text("  ".to_string())),
        ]);
        // 空白值视为缺失，继续查找下一个候选
        assert_eq!(pick_text(&r, &["Item Code", "Code"]), Some("C-1".to_string()));
        assert_eq!(pick_text(&r, &["Codice"]), None);
    }

    #[test]
    fn test_pick_field_case_insensitive_follows_header_order() {
        let r = row(&[
            ("CODE", RawCell::Text("first".to_string())),
            ("code", RawCell::Text("second".to_string())),
            ("Code ", RawCell::Text("third".to_string())),
        ]);
        for _ in 0..8 {
            assert_eq!(pick_text(&r, &["Code"]), Some("first".to_string()));
        }
    }

    #[test]
    fn test_pick_number_missing_is_zero() {
        let r = row(&[("Peso Kg/m", RawCell::Text("2,5".to_string()))]);
        assert_eq!(pick_number(&r, &["Peso Kg/m"]), 2.5);
        assert_eq!(pick_number(&r, &["Weight kg/m"]), 0.0);
    }
}
