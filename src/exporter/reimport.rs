// ==========================================
// 管件报价系统 - 报价表回读
// ==========================================
// 职责: 已导出的报价 xlsx → 报价行 + 折扣
// 规则:
//   - 工作表: 任一语言的报价表名，否则第一个工作表
//   - 从第 3 行读起，遇到空行（描述为空且数量/单价/行值为 0）
//     或 I 列含出厂价标记时停止
//   - "mt" 行还原为管材行，其余为 Imported 按件计价行
//   - 基础价优先取 M 列目录价，缺失时取 F 列
// ==========================================

use crate::domain::quote::{QuoteLine, ReimportedQuote};
use crate::domain::types::{ItemType, UnitOfMeasure};
use crate::exporter::error::ExportResult;
use crate::exporter::layout::*;
use crate::i18n::{t_in, AVAILABLE_LOCALES};
use crate::importer::field_mapper::{parse_number_str, strict_number};
use crate::importer::file_parser::format_plain_number;
use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;

/// 回读报价工作簿
///
/// # 返回
/// - Ok(ReimportedQuote): 报价行（工作簿无工作表时为空）
/// - Err(WorkbookReadError): 不是有效的 xlsx
pub fn read_quote(bytes: &[u8]) -> ExportResult<ReimportedQuote> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;

    let sheet_names = workbook.sheet_names();
    let localized: Vec<String> = AVAILABLE_LOCALES
        .iter()
        .map(|locale| t_in(locale, "quote.sheet_name"))
        .collect();
    let sheet = match sheet_names
        .iter()
        .find(|name| localized.iter().any(|l| l == *name))
        .or_else(|| sheet_names.first())
    {
        Some(name) => name.clone(),
        None => {
            tracing::warn!("工作簿没有工作表，回读结果为空");
            return Ok(ReimportedQuote::default());
        }
    };

    let range = workbook.worksheet_range(&sheet)?;
    let quote = read_range(&range);
    tracing::info!(
        sheet = %sheet,
        lines = quote.lines.len(),
        discount = ?quote.discount_percent,
        "报价表回读完成"
    );
    Ok(quote)
}

fn read_range(range: &Range<Data>) -> ReimportedQuote {
    let markers: Vec<String> = AVAILABLE_LOCALES
        .iter()
        .map(|locale| t_in(locale, "quote.total.ex_works_marker").to_lowercase())
        .collect();

    let last_row = range.end().map_or(0, |(row, _)| row);
    let mut lines = Vec::new();

    for row in FIRST_LINE_ROW..=last_row {
        let description = cell_text(range, row, COL_DESCRIPTION);
        let unit = UnitOfMeasure::from_cell_text(&cell_text(range, row, COL_UNIT));
        let quantity = cell_number(range, row, COL_QUANTITY);
        let unit_price = cell_number(range, row, COL_UNIT_PRICE);
        let line_total = cell_number(range, row, COL_LINE_TOTAL);
        let label = cell_text(range, row, COL_ALLOY_M).to_lowercase();

        let blank = description.trim().is_empty()
            && quantity == 0.0
            && unit_price == 0.0
            && line_total == 0.0;
        if blank || markers.iter().any(|m| label.contains(m.as_str())) {
            break;
        }

        let code = cell_text(range, row, COL_CODE);
        let list_price = cell_number(range, row, COL_LIST_PRICE);
        let base_price = if list_price > 0.0 {
            list_price
        } else {
            cell_number(range, row, COL_BASE_PRICE)
        };

        let line = match unit {
            UnitOfMeasure::Mt => QuoteLine::tube(
                description,
                code,
                quantity,
                base_price,
                cell_number(range, row, COL_WEIGHT),
                cell_number(range, row, COL_ALLOY_KG),
            ),
            UnitOfMeasure::Pz => {
                QuoteLine::piece(ItemType::Imported, description, code, quantity, base_price)
            }
        };
        lines.push(line);
    }

    let banner = cell_text(range, META_ROW, COL_DISCOUNT_BANNER);
    ReimportedQuote {
        lines,
        discount_percent: parse_discount_banner(&banner),
    }
}

/// 解析折扣标记（"SCONTO: 10.00%" / "DISCOUNT: 10.00%"）
pub fn parse_discount_banner(text: &str) -> Option<f64> {
    let (_, value) = text.split_once(':')?;
    let value = value.trim().strip_suffix('%')?;
    strict_number(value).filter(|v| (0.0..=100.0).contains(v))
}

fn cell_text(range: &Range<Data>, row: u32, col: u16) -> String {
    match range.get_value((row, col as u32)) {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => format_plain_number(*f),
        Some(Data::Int(i)) => i.to_string(),
        Some(other) => other.to_string(),
    }
}

fn cell_number(range: &Range<Data>, row: u32, col: u16) -> f64 {
    match range.get_value((row, col as u32)) {
        Some(Data::Float(f)) if f.is_finite() => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::String(s)) => parse_number_str(s),
        _ => 0.0,
    }
}
