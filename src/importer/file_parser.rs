// ==========================================
// 管件报价系统 - 工作簿读取
// ==========================================
// 职责: 工作表 → 原始行记录（按表头顺序的 列名 → 单元格）
// 支持: Excel (.xlsx/.xlsm/.xls) / OpenDocument (.ods)
// 约定: 首行为表头；表头去空白；空单元格不进入行记录
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ==========================================
// RawCell / RawRow - 边界上的弱类型行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Number(f64),
    Text(String),
}

impl RawCell {
    /// 单元格文本（数字整数值不带小数点）
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Number(n) => format_plain_number(*n),
            RawCell::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

// ==========================================
// RawRow - 原始行记录
// ==========================================
// 保持表头顺序，忽略大小写查找时按列顺序命中
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, RawCell)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入单元格（同名列覆盖原值，位置不变）
    pub fn insert(&mut self, header: String, value: RawCell) {
        match self.cells.iter_mut().find(|(h, _)| *h == header) {
            Some((_, cell)) => *cell = value,
            None => self.cells.push((header, value)),
        }
    }

    /// 精确列名查找
    pub fn get(&self, header: &str) -> Option<&RawCell> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, cell)| cell)
    }

    /// 按表头顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawCell)> {
        self.cells.iter().map(|(h, cell)| (h, cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, RawCell)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, RawCell)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (header, value) in iter {
            row.insert(header, value);
        }
        row
    }
}

/// 数字转文本：整数不带小数部分
pub fn format_plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn cell_to_raw(cell: &Data) -> Option<RawCell> {
    match cell {
        Data::Empty => None,
        Data::Float(f) => Some(RawCell::Number(*f)),
        Data::Int(i) => Some(RawCell::Number(*i as f64)),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(RawCell::Text(trimmed.to_string()))
            }
        }
        other => {
            let text = other.to_string();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(RawCell::Text(trimmed.to_string()))
            }
        }
    }
}

// ==========================================
// SheetSource Trait
// ==========================================
// 用途: 目录加载器的数据来源接口
// 实现者: ExcelWorkbook（文件）, InMemoryWorkbook（内存）
pub trait SheetSource {
    /// 工作表名称（保持原顺序）
    fn sheet_names(&self) -> Vec<String>;

    /// 读取工作表为行记录
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 数据行（不含表头，跳过全空行）
    /// - Err: 工作表不存在或解析失败
    fn read_rows(&mut self, sheet_name: &str) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// ExcelWorkbook 实现
// ==========================================
pub struct ExcelWorkbook {
    path: String,
    sheets: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    /// 打开工作簿
    ///
    /// # 返回
    /// - Err(FileNotFound): 文件不存在
    /// - Err(UnsupportedFormat): 扩展名不支持
    /// - Err(ExcelParseError): 文件损坏
    pub fn open<P: AsRef<Path>>(file_path: P) -> ImportResult<Self> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !matches!(ext.as_str(), "xlsx" | "xlsm" | "xls" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let sheets = open_workbook_auto(path)?;
        Ok(Self {
            path: path.display().to_string(),
            sheets,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SheetSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_rows(&mut self, sheet_name: &str) -> ImportResult<Vec<RawRow>> {
        if !self.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(ImportError::SheetNotFound(sheet_name.to_string()));
        }

        let range = self.sheets.worksheet_range(sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = match rows.next() {
            Some(row) => row,
            None => return Ok(Vec::new()),
        };
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader(sheet_name.to_string()));
        }

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = RawRow::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                let header = match headers.get(col_idx) {
                    Some(h) if !h.is_empty() => h,
                    _ => continue,
                };
                if let Some(value) = cell_to_raw(cell) {
                    row_map.insert(header.clone(), value);
                }
            }

            // 跳过完全空白的行
            if row_map.is_empty() {
                continue;
            }
            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// InMemoryWorkbook 实现
// ==========================================
// 用途: 非文件来源的目录数据（测试 / 其他集成方）
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    order: Vec<String>,
    sheets: BTreeMap<String, Vec<RawRow>>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加工作表（同名覆盖）
    pub fn with_sheet(mut self, name: &str, rows: Vec<RawRow>) -> Self {
        if !self.sheets.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.sheets.insert(name.to_string(), rows);
        self
    }
}

impl SheetSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn read_rows(&mut self, sheet_name: &str) -> ImportResult<Vec<RawRow>> {
        self.sheets
            .get(sheet_name)
            .cloned()
            .ok_or_else(|| ImportError::SheetNotFound(sheet_name.to_string()))
    }
}
