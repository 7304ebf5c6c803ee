// ==========================================
// 管件报价系统 - 报价工作簿生成
// ==========================================
// 职责: QuoteComputation → xlsx 字节
// 布局:
//   第 1 行  抬头信息（B1 起）+ O1 折扣标记
//   第 2 行  表头 A..K + M, N
//   第 3 行起 报价行
//   之后三行 汇总（出厂价 / 包装运输 / 到货价），K 列为带缓存结果的公式
// ==========================================

use crate::domain::quote::QuoteMeta;
use crate::domain::types::{Currency, UnitOfMeasure};
use crate::engine::pricing::{PricedLine, QuoteComputation};
use crate::engine::rounding::round2;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::layout::*;
use crate::i18n::{t_in, t_in_with_args};
use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Formula, Workbook, Worksheet};

/// 默认导出文件名（Offerta_YYYY-MM-DD.xlsx）
pub fn default_file_name(date: NaiveDate) -> String {
    format!("Offerta_{}.xlsx", date.format("%Y-%m-%d"))
}

/// 当天的默认导出文件名
pub fn default_file_name_today() -> String {
    default_file_name(chrono::Local::now().date_naive())
}

// ==========================================
// 单元格格式
// ==========================================
struct Styles {
    plain: Format,
    banner: Format,
    header: Format,
    text: Format,
    centered: Format,
    quantity: Format,
    currency: Format,
    weight: Format,
    number: Format,
    list_number: Format,
    total_label: Format,
    total_value: Format,
    gross_total: Format,
}

impl Styles {
    fn new(currency: Currency) -> Self {
        let red = Color::RGB(RED);
        let bordered = Format::new().set_border(FormatBorder::Thin);
        let right = bordered.clone().set_align(FormatAlign::Right);

        Self {
            plain: Format::new(),
            banner: Format::new().set_bold().set_font_color(red),
            header: bordered
                .clone()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            text: bordered.clone(),
            centered: bordered.clone().set_align(FormatAlign::Center),
            quantity: right.clone(),
            currency: right.clone().set_num_format(currency.number_format()),
            weight: right.clone().set_num_format(WEIGHT_FORMAT),
            number: right.set_num_format(NUMBER_FORMAT),
            list_number: Format::new()
                .set_num_format(NUMBER_FORMAT)
                .set_align(FormatAlign::Right)
                .set_font_color(red),
            total_label: bordered
                .clone()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            total_value: bordered
                .set_bold()
                .set_num_format(currency.number_format())
                .set_align(FormatAlign::Right)
                .set_align(FormatAlign::VerticalCenter),
            gross_total: Format::new()
                .set_num_format(NUMBER_FORMAT)
                .set_align(FormatAlign::Right)
                .set_align(FormatAlign::VerticalCenter)
                .set_font_color(red),
        }
    }
}

// ==========================================
// QuoteWorkbookWriter
// ==========================================
pub struct QuoteWorkbookWriter {
    locale: &'static str,
    currency: Currency,
}

impl QuoteWorkbookWriter {
    /// # 参数
    /// - locale: 已规范化的语言代码（见 i18n::resolve_locale）
    /// - currency: 货币（决定金额格式）
    pub fn new(locale: &'static str, currency: Currency) -> Self {
        Self { locale, currency }
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    /// 生成报价工作簿
    ///
    /// # 返回
    /// - Ok(Vec<u8>): xlsx 文件内容
    /// - Err(InvalidQuote): 没有报价行
    /// - Err(XlsxWriteError): 写入失败
    pub fn render(&self, computation: &QuoteComputation, meta: &QuoteMeta) -> ExportResult<Vec<u8>> {
        if computation.lines.is_empty() {
            return Err(ExportError::InvalidQuote("报价行为空".to_string()));
        }

        let styles = Styles::new(self.currency);
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(t_in(self.locale, "quote.sheet_name"))?;

        for (col, width) in COLUMN_WIDTHS {
            sheet.set_column_width(*col, *width)?;
        }

        self.write_meta_row(sheet, &styles, meta, computation.totals.discount_percent)?;
        self.write_header_row(sheet, &styles)?;

        for (idx, line) in computation.lines.iter().enumerate() {
            let row = FIRST_LINE_ROW + idx as u32;
            write_line(sheet, &styles, row, line)?;
        }

        let last_line_row = FIRST_LINE_ROW + computation.lines.len() as u32 - 1;
        self.write_totals(sheet, &styles, last_line_row, computation)?;

        let bytes = workbook.save_to_buffer()?;
        tracing::debug!(
            lines = computation.lines.len(),
            bytes = bytes.len(),
            locale = self.locale,
            "报价工作簿生成完成"
        );
        Ok(bytes)
    }

    fn write_meta_row(
        &self,
        sheet: &mut Worksheet,
        styles: &Styles,
        meta: &QuoteMeta,
        discount_percent: f64,
    ) -> ExportResult<()> {
        let fields = [
            ("quote.meta.request", &meta.request_ref),
            ("quote.meta.customer", &meta.customer),
            ("quote.meta.site", &meta.site),
        ];

        // 只写非空字段，从 B1 起连续排列
        let mut col = META_FIRST_COL;
        for (key, value) in fields {
            let value = match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => v,
                _ => continue,
            };
            let text = t_in_with_args(self.locale, key, &[("value", value)]);
            sheet.write_string_with_format(META_ROW, col, &text, &styles.plain)?;
            col += 1;
        }

        let percent = format!("{:.2}", discount_percent);
        let banner = t_in_with_args(
            self.locale,
            "quote.discount_banner",
            &[("value", percent.as_str())],
        );
        sheet.write_string_with_format(META_ROW, COL_DISCOUNT_BANNER, &banner, &styles.banner)?;
        Ok(())
    }

    fn write_header_row(&self, sheet: &mut Worksheet, styles: &Styles) -> ExportResult<()> {
        for (col, key) in HEADERS {
            let label = t_in(self.locale, key);
            sheet.write_string_with_format(HEADER_ROW, *col, &label, &styles.header)?;
        }
        sheet.set_row_height(HEADER_ROW, HEADER_HEIGHT)?;
        Ok(())
    }

    fn write_totals(
        &self,
        sheet: &mut Worksheet,
        styles: &Styles,
        last_line_row: u32,
        computation: &QuoteComputation,
    ) -> ExportResult<()> {
        let totals = &computation.totals;
        let ex_works_row = last_line_row + 1;
        let transport_row = ex_works_row + 1;
        let delivered_row = transport_row + 1;

        let first_k = cell_ref(FIRST_LINE_ROW, COL_LINE_TOTAL);
        let last_k = cell_ref(last_line_row, COL_LINE_TOTAL);
        let first_n = cell_ref(FIRST_LINE_ROW, COL_LIST_TOTAL);
        let last_n = cell_ref(last_line_row, COL_LIST_TOTAL);
        let ex_works_ref = cell_ref(ex_works_row, COL_LINE_TOTAL);
        let transport_ref = cell_ref(transport_row, COL_LINE_TOTAL);

        // ===== 出厂价 =====
        self.write_total_label(sheet, styles, ex_works_row, "quote.total.ex_works")?;
        write_formula(
            sheet,
            ex_works_row,
            COL_LINE_TOTAL,
            &format!("SUM({}:{})", first_k, last_k),
            totals.items_ex_works,
            &styles.total_value,
        )?;
        write_formula(
            sheet,
            ex_works_row,
            COL_LIST_TOTAL,
            &format!("SUM({}:{})", first_n, last_n),
            totals.gross_from_list,
            &styles.gross_total,
        )?;

        // ===== 包装运输 =====
        self.write_total_label(sheet, styles, transport_row, "quote.total.transport")?;
        write_formula(
            sheet,
            transport_row,
            COL_LINE_TOTAL,
            &format!("{}*{}", totals.transport_percent / 100.0, ex_works_ref),
            totals.transport,
            &styles.total_value,
        )?;

        // ===== 到货价 =====
        self.write_total_label(sheet, styles, delivered_row, "quote.total.delivered")?;
        write_formula(
            sheet,
            delivered_row,
            COL_LINE_TOTAL,
            &format!("{}+{}", ex_works_ref, transport_ref),
            totals.delivered,
            &styles.total_value,
        )?;

        for row in [ex_works_row, transport_row, delivered_row] {
            sheet.set_row_height(row, TOTAL_HEIGHT)?;
        }
        Ok(())
    }

    fn write_total_label(
        &self,
        sheet: &mut Worksheet,
        styles: &Styles,
        row: u32,
        key: &str,
    ) -> ExportResult<()> {
        let label = t_in(self.locale, key);
        sheet.merge_range(
            row,
            TOTAL_LABEL_FIRST_COL,
            row,
            TOTAL_LABEL_LAST_COL,
            &label,
            &styles.total_label,
        )?;
        Ok(())
    }
}

// ==========================================
// 报价行
// ==========================================
fn write_line(sheet: &mut Worksheet, styles: &Styles, row: u32, line: &PricedLine) -> ExportResult<()> {
    sheet.write_number_with_format(row, COL_POS, line.position, &styles.text)?;
    sheet.write_string_with_format(row, COL_DESCRIPTION, &line.description, &styles.text)?;
    sheet.write_string_with_format(row, COL_CODE, &line.code, &styles.text)?;
    sheet.write_string_with_format(row, COL_UNIT, line.unit.as_str(), &styles.centered)?;
    sheet.write_number_with_format(row, COL_QUANTITY, line.quantity, &styles.quantity)?;
    sheet.write_number_with_format(row, COL_BASE_PRICE, line.unit_base_price, &styles.currency)?;

    // G / H / I 仅按米计价的行有值，其余写占位符
    let tube_values = [
        (COL_WEIGHT, line.weight_kg_m, &styles.weight),
        (COL_ALLOY_KG, line.alloy_per_kg, &styles.number),
        (COL_ALLOY_M, line.alloy_per_m, &styles.number),
    ];
    for (col, value, format) in tube_values {
        match (line.unit, value) {
            (UnitOfMeasure::Mt, Some(v)) => {
                sheet.write_number_with_format(row, col, v, format)?;
            }
            _ => {
                sheet.write_string_with_format(row, col, PLACEHOLDER, &styles.centered)?;
            }
        }
    }

    sheet.write_number_with_format(row, COL_UNIT_PRICE, line.unit_price, &styles.currency)?;
    sheet.write_number_with_format(row, COL_LINE_TOTAL, line.line_total, &styles.currency)?;
    sheet.write_number_with_format(row, COL_LIST_PRICE, line.list_unit_price, &styles.list_number)?;
    sheet.write_number_with_format(row, COL_LIST_TOTAL, line.list_line_total, &styles.list_number)?;

    sheet.set_row_height(row, LINE_HEIGHT)?;
    Ok(())
}

/// 写入公式并附带缓存结果（分位）
fn write_formula(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    formula: &str,
    cached: f64,
    format: &Format,
) -> ExportResult<()> {
    let formula = Formula::new(formula).set_result(round2(cached).to_string());
    sheet.write_formula_with_format(row, col, formula, format)?;
    Ok(())
}
