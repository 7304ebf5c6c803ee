// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 在临时目录中生成目录源工作簿，构造测试配置
// ==========================================

#![allow(dead_code)]

use std::path::Path;

use pipe_quote::config::AppConfig;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

/// 源表单元格
#[derive(Debug, Clone)]
pub enum Cell {
    N(f64),
    S(&'static str),
    Empty,
}

/// 工作表定义: 名称 + 表头 + 数据行
pub struct SheetDef {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

/// 写出工作簿
pub fn write_workbook(path: &Path, sheets: &[SheetDef]) {
    let mut workbook = Workbook::new();
    for def in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(def.name).unwrap();
        for (col, header) in def.headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, row) in def.rows.iter().enumerate() {
            let row_idx = (r + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::N(n) => {
                        sheet.write_number(row_idx, col as u16, *n).unwrap();
                    }
                    Cell::S(s) => {
                        sheet.write_string(row_idx, col as u16, *s).unwrap();
                    }
                    Cell::Empty => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

/// 管材 + 简单管件工作簿
///
/// 管材 25 mm 同时以数值 25 和文本 "25,0" 出现（两行价格不同）
pub fn tubes_workbook() -> Vec<SheetDef> {
    vec![
        SheetDef {
            name: "Tubes",
            headers: vec!["ND mm", "ND inch", "Peso Kg/m", "SF1 €/m", "SF4 €/m", "SF1 Code", "Code"],
            rows: vec![
                vec![
                    Cell::N(25.0),
                    Cell::S("1\""),
                    Cell::N(2.5),
                    Cell::N(10.0),
                    Cell::N(12.0),
                    Cell::S("T25-SF1"),
                    Cell::S("T25"),
                ],
                vec![
                    Cell::N(50.8),
                    Cell::Empty,
                    Cell::N(4.1),
                    Cell::N(18.5),
                    Cell::N(0.0),
                    Cell::Empty,
                    Cell::S("T50"),
                ],
                vec![
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                ],
            ],
        },
        SheetDef {
            name: "Elbows 90°",
            headers: vec!["ND", "Code", "SF1 €/pz", "SF4 €/pz"],
            rows: vec![
                vec![Cell::N(25.0), Cell::S("E90-25"), Cell::N(6.5), Cell::N(7.25)],
                vec![Cell::S("25,0"), Cell::S("E90-25B"), Cell::N(6.6), Cell::Empty],
                vec![Cell::S("1/2\""), Cell::S("E90-12"), Cell::N(4.0), Cell::Empty],
            ],
        },
        SheetDef {
            name: "Clamps",
            headers: vec!["ND", "Code", "Flange size mm", "SF1 €/pz"],
            rows: vec![vec![Cell::N(25.0), Cell::S("CL25"), Cell::N(50.5), Cell::N(3.2)]],
        },
        SheetDef {
            name: "Ferrule C (Short)",
            headers: vec!["ND", "Code", "L mm", "SF1 €/pz"],
            rows: vec![vec![Cell::N(25.0), Cell::S("FC25"), Cell::N(21.0), Cell::N(2.1)]],
        },
    ]
}

/// 三通 + 异径管工作簿（第二行 OD1 > OD2，加载后应交换）
pub fn complex_workbook() -> Vec<SheetDef> {
    vec![
        SheetDef {
            name: "Tees",
            headers: vec!["OD1 mm", "OD2 mm", "Code", "SF1 €/pz"],
            rows: vec![vec![Cell::N(25.0), Cell::N(25.0), Cell::S("TE25"), Cell::N(22.0)]],
        },
        SheetDef {
            name: "Conc. Reducers",
            headers: vec!["OD1 mm", "OD2 mm", "Code", "SF1 €/pz", "SF4 €/pz"],
            rows: vec![
                vec![Cell::N(25.0), Cell::N(38.1), Cell::S("RC2538"), Cell::N(15.0), Cell::Empty],
                vec![Cell::N(50.0), Cell::N(25.0), Cell::S("RC5025"), Cell::N(19.0), Cell::N(21.0)],
            ],
        },
    ]
}

/// 临时数据目录 + 指向它的配置
///
/// # 参数
/// - with_complex: 是否生成三通/异径管工作簿
pub fn catalog_fixture(with_complex: bool) -> (TempDir, AppConfig) {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_data_dir(dir.path());
    write_workbook(&config.tubes_workbook_path(), &tubes_workbook());
    if with_complex {
        write_workbook(&config.complex_workbook_path(), &complex_workbook());
    }
    (dir, config)
}
