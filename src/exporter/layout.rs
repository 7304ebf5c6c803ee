// ==========================================
// 管件报价系统 - 报价表布局
// ==========================================
// 坐标: 行/列均从 0 开始（rust_xlsxwriter / calamine 约定）
// 公式引用: A1 样式，行号从 1 开始
// ==========================================

// ===== 行 =====
pub const META_ROW: u32 = 0; // 第 1 行: 抬头信息 + 折扣标记
pub const HEADER_ROW: u32 = 1; // 第 2 行: 表头
pub const FIRST_LINE_ROW: u32 = 2; // 第 3 行起: 报价行

pub const HEADER_HEIGHT: f64 = 96.75;
pub const LINE_HEIGHT: f64 = 31.5;
pub const TOTAL_HEIGHT: f64 = 45.0;

// ===== 列 =====
pub const COL_POS: u16 = 0; // A
pub const COL_DESCRIPTION: u16 = 1; // B
pub const COL_CODE: u16 = 2; // C
pub const COL_UNIT: u16 = 3; // D
pub const COL_QUANTITY: u16 = 4; // E
pub const COL_BASE_PRICE: u16 = 5; // F
pub const COL_WEIGHT: u16 = 6; // G
pub const COL_ALLOY_KG: u16 = 7; // H
pub const COL_ALLOY_M: u16 = 8; // I
pub const COL_UNIT_PRICE: u16 = 9; // J
pub const COL_LINE_TOTAL: u16 = 10; // K
pub const COL_LIST_PRICE: u16 = 12; // M
pub const COL_LIST_TOTAL: u16 = 13; // N
pub const COL_DISCOUNT_BANNER: u16 = 14; // O

/// 抬头信息起始列（B1）
pub const META_FIRST_COL: u16 = COL_DESCRIPTION;

/// 汇总标签合并区 I:J
pub const TOTAL_LABEL_FIRST_COL: u16 = COL_ALLOY_M;
pub const TOTAL_LABEL_LAST_COL: u16 = COL_UNIT_PRICE;

/// 表头（列, 翻译键）
pub const HEADERS: &[(u16, &str)] = &[
    (COL_POS, "quote.header.pos"),
    (COL_DESCRIPTION, "quote.header.description"),
    (COL_CODE, "quote.header.code"),
    (COL_UNIT, "quote.header.unit"),
    (COL_QUANTITY, "quote.header.quantity"),
    (COL_BASE_PRICE, "quote.header.base_price"),
    (COL_WEIGHT, "quote.header.weight"),
    (COL_ALLOY_KG, "quote.header.alloy_per_kg"),
    (COL_ALLOY_M, "quote.header.alloy_per_m"),
    (COL_UNIT_PRICE, "quote.header.unit_price"),
    (COL_LINE_TOTAL, "quote.header.line_total"),
    (COL_LIST_PRICE, "quote.header.list_price"),
    (COL_LIST_TOTAL, "quote.header.list_total"),
];

/// 列宽（M 同 F，N 同 K）
pub const COLUMN_WIDTHS: &[(u16, f64)] = &[
    (COL_POS, 5.27),
    (COL_DESCRIPTION, 29.18),
    (COL_CODE, 10.27),
    (COL_UNIT, 5.91),
    (COL_QUANTITY, 10.0),
    (COL_BASE_PRICE, 9.0),
    (COL_WEIGHT, 9.0),
    (COL_ALLOY_KG, 9.0),
    (COL_ALLOY_M, 9.0),
    (COL_UNIT_PRICE, 9.0),
    (COL_LINE_TOTAL, 16.0),
    (COL_LIST_PRICE, 9.0),
    (COL_LIST_TOTAL, 16.0),
];

// ===== 数字格式 =====
pub const WEIGHT_FORMAT: &str = "#,##0.000";
pub const NUMBER_FORMAT: &str = "#,##0.00";
pub const PLACEHOLDER: &str = "-";
pub const RED: u32 = 0xFF0000;

/// 列号 → 列字母（0 → A, 26 → AA）
pub fn column_letter(col: u16) -> String {
    let mut n = col as u32 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1 样式单元格引用
pub fn cell_ref(row: u32, col: u16) -> String {
    format!("{}{}", column_letter(col), row + 1)
}
