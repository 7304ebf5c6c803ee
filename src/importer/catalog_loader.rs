// ==========================================
// 管件报价系统 - 目录加载器
// ==========================================
// 职责: 源工作簿 → CatalogSnapshot（管材 / 简单管件 / 三通异径管）
// 流程: 定位工作表 → 逐行解析尺寸 → 按表面等级取价格与编码 → price > 0 才入目录
// 红线: 单个文件/工作表失败只清空对应数据段，整体加载永不失败
// ==========================================

use crate::config::{AppConfig, Finish};
use crate::domain::catalog::{CatalogSnapshot, ComplexFitting, SimpleFitting, TubeItem};
use crate::domain::types::{ComplexFittingKind, SimpleFittingKind};
use crate::importer::data_cleaner::{resolve_dimension, ND_KEYS, OD1_KEYS, OD2_KEYS};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{pick_number, pick_text};
use crate::importer::file_parser::{ExcelWorkbook, RawRow, SheetSource};
use crate::perf::{record_rows, PerfGuard};
use std::path::{Path, PathBuf};

// ==========================================
// 源列别名
// ==========================================
pub const CODE_KEYS: &[&str] = &["Code", "Item Code", "Codice"];
pub const WEIGHT_KEYS: &[&str] = &["Peso Kg/m", "Weight kg/m", "Kg/m"];
pub const LENGTH_KEYS: &[&str] = &["L mm", "L (mm)", "Length mm", "Length", "L"];
pub const FLANGE_KEYS: &[&str] = &["Flange size mm", "Flange Size", "Flange mm", "Flange"];

// ==========================================
// 工作表别名
// ==========================================
pub const TUBE_SHEETS: &[&str] = &["Tubes", "Tube"];

/// 简单管件工作表别名
pub fn simple_sheet_aliases(kind: SimpleFittingKind) -> &'static [&'static str] {
    match kind {
        SimpleFittingKind::Elbow90 => &["Elbows 90°", "Elbows 90", "90° Elbows"],
        SimpleFittingKind::Elbow45 => &["Elbows 45°", "Elbows 45", "45° Elbows"],
        SimpleFittingKind::EndCap => &["End Caps", "Caps", "EndCap"],
        SimpleFittingKind::FerruleLong => &["Ferrule A (Long)", "Ferrule A Long", "Ferrule A"],
        SimpleFittingKind::FerruleMedium => {
            &["Ferrule B (Medium)", "Ferrule B Medium", "Ferrule B"]
        }
        SimpleFittingKind::FerruleShort => &["Ferrule C (Short)", "Ferrule C Short", "Ferrule C"],
        SimpleFittingKind::Clamp => &["Clamps", "Clamp"],
    }
}

/// 三通/异径管工作表别名
pub fn complex_sheet_aliases(kind: ComplexFittingKind) -> &'static [&'static str] {
    match kind {
        ComplexFittingKind::Tee => &["Tees", "Tee"],
        ComplexFittingKind::ConcentricReducer => {
            &["Conc. Reducers", "Concentric Reducers", "Reducers Conc."]
        }
        ComplexFittingKind::EccentricReducer => {
            &["Ecc. Reducers", "Eccentric Reducers", "Reducers Ecc."]
        }
    }
}

/// 定位工作表
///
/// # 规则
/// 1. 别名精确匹配（按别名顺序）
/// 2. 工作表名（忽略大小写）包含任一别名
/// 3. fallback_first 为真时取第一个工作表
pub fn resolve_sheet(sheet_names: &[String], aliases: &[&str], fallback_first: bool) -> Option<String> {
    for alias in aliases {
        if let Some(name) = sheet_names.iter().find(|n| n.as_str() == *alias) {
            return Some(name.clone());
        }
    }

    for alias in aliases {
        let wanted = alias.to_lowercase();
        if let Some(name) = sheet_names
            .iter()
            .find(|n| n.to_lowercase().contains(&wanted))
        {
            return Some(name.clone());
        }
    }

    if fallback_first {
        return sheet_names.first().cloned();
    }
    None
}

// ==========================================
// CatalogLoader
// ==========================================
pub struct CatalogLoader {
    finishes: Vec<Finish>,
    tubes_path: PathBuf,
    complex_path: PathBuf,
}

impl CatalogLoader {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            finishes: config.finishes.clone(),
            tubes_path: config.tubes_workbook_path(),
            complex_path: config.complex_workbook_path(),
        }
    }

    pub fn finishes(&self) -> &[Finish] {
        &self.finishes
    }

    /// 加载完整目录快照
    ///
    /// # 说明
    /// - 管材与简单管件来自同一工作簿，三通/异径管来自另一工作簿
    /// - 任何文件或工作表错误只导致对应数据段为空
    pub fn load(&self) -> CatalogSnapshot {
        let _perf = PerfGuard::new("load_catalog");

        let (tubes, simple) = match open_source(&self.tubes_path) {
            Some(mut source) => {
                let tubes = self.load_tubes(&mut source).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "管材数据段加载失败，置为空");
                    Vec::new()
                });
                let simple = self.load_simple_fittings(&mut source);
                (tubes, simple)
            }
            None => (Vec::new(), Vec::new()),
        };

        let complex = match open_source(&self.complex_path) {
            Some(mut source) => self.load_complex_fittings(&mut source),
            None => Vec::new(),
        };

        let snapshot = CatalogSnapshot::new(tubes, simple, complex);
        let counts = snapshot.counts();
        tracing::info!(
            snapshot_id = %snapshot.snapshot_id,
            tubes = counts.tubes,
            simple = counts.simple,
            complex = counts.complex,
            "目录加载完成"
        );
        snapshot
    }

    // ==========================================
    // 管材
    // ==========================================

    /// 加载管材（工作表缺失时回退到第一个工作表）
    pub fn load_tubes<S: SheetSource>(&self, source: &mut S) -> ImportResult<Vec<TubeItem>> {
        let names = source.sheet_names();
        let sheet = match resolve_sheet(&names, TUBE_SHEETS, true) {
            Some(sheet) => sheet,
            None => {
                tracing::warn!("工作簿中没有任何工作表，管材为空");
                return Ok(Vec::new());
            }
        };

        let rows = source.read_rows(&sheet)?;
        record_rows(rows.len());

        let mut out = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            let nd = match resolve_dimension(row, &ND_KEYS) {
                Some(dim) => dim.label,
                None => {
                    tracing::debug!(sheet = %sheet, row = idx + 2, "缺少 ND，跳过");
                    continue;
                }
            };
            let weight_kg_m = pick_number(row, WEIGHT_KEYS);

            for finish in &self.finishes {
                let price = pick_number(row, &finish.tube_price_keys);
                if price <= 0.0 {
                    continue;
                }
                out.push(TubeItem {
                    finish: finish.key.clone(),
                    nd: nd.clone(),
                    code: resolve_code(row, &finish.tube_code_keys),
                    weight_kg_m,
                    price_per_m: price,
                });
            }
        }

        tracing::debug!(sheet = %sheet, items = out.len(), "管材解析完成");
        Ok(out)
    }

    // ==========================================
    // 简单管件（ND 定位）
    // ==========================================

    /// 加载所有简单管件种类；单个工作表失败只跳过该种类
    pub fn load_simple_fittings<S: SheetSource>(&self, source: &mut S) -> Vec<SimpleFitting> {
        let names = source.sheet_names();
        let mut out = Vec::new();

        for kind in SimpleFittingKind::ALL {
            let sheet = match resolve_sheet(&names, simple_sheet_aliases(kind), false) {
                Some(sheet) => sheet,
                None => {
                    tracing::debug!(kind = %kind, "未找到工作表，跳过");
                    continue;
                }
            };

            match self.load_simple_sheet(source, &sheet, kind) {
                Ok(items) => out.extend(items),
                Err(e) => tracing::warn!(kind = %kind, sheet = %sheet, error = %e, "简单管件工作表加载失败"),
            }
        }

        out
    }

    fn load_simple_sheet<S: SheetSource>(
        &self,
        source: &mut S,
        sheet: &str,
        kind: SimpleFittingKind,
    ) -> ImportResult<Vec<SimpleFitting>> {
        let rows = source.read_rows(sheet)?;
        record_rows(rows.len());

        let mut out = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            let nd = match resolve_dimension(row, &ND_KEYS) {
                Some(dim) => dim.label,
                None => {
                    tracing::debug!(sheet = %sheet, row = idx + 2, "缺少 ND，跳过");
                    continue;
                }
            };

            let length_mm = if kind.is_ferrule() {
                positive(pick_number(row, LENGTH_KEYS))
            } else {
                None
            };
            let flange_size_mm = if kind == SimpleFittingKind::Clamp {
                positive(pick_number(row, FLANGE_KEYS))
            } else {
                None
            };

            for finish in &self.finishes {
                let price = pick_number(row, &finish.fitting_price_keys);
                if price <= 0.0 {
                    continue;
                }
                out.push(SimpleFitting {
                    kind,
                    finish: finish.key.clone(),
                    nd: nd.clone(),
                    code: resolve_code(row, &finish.fitting_code_keys),
                    price_per_pc: price,
                    length_mm,
                    flange_size_mm,
                });
            }
        }
        Ok(out)
    }

    // ==========================================
    // 三通 / 异径管（OD1/OD2 定位）
    // ==========================================

    /// 加载三通与异径管；OD1 始终为数值较小的一侧
    pub fn load_complex_fittings<S: SheetSource>(&self, source: &mut S) -> Vec<ComplexFitting> {
        let names = source.sheet_names();
        let mut out = Vec::new();

        for kind in ComplexFittingKind::ALL {
            let sheet = match resolve_sheet(&names, complex_sheet_aliases(kind), false) {
                Some(sheet) => sheet,
                None => {
                    tracing::debug!(kind = kind.label(), "未找到工作表，跳过");
                    continue;
                }
            };

            match self.load_complex_sheet(source, &sheet, kind) {
                Ok(items) => out.extend(items),
                Err(e) => tracing::warn!(kind = kind.label(), sheet = %sheet, error = %e, "三通/异径管工作表加载失败"),
            }
        }

        out
    }

    fn load_complex_sheet<S: SheetSource>(
        &self,
        source: &mut S,
        sheet: &str,
        kind: ComplexFittingKind,
    ) -> ImportResult<Vec<ComplexFitting>> {
        let rows = source.read_rows(sheet)?;
        record_rows(rows.len());

        let mut out = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            let (mut od1, mut od2) = match (
                resolve_dimension(row, &OD1_KEYS),
                resolve_dimension(row, &OD2_KEYS),
            ) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    tracing::debug!(sheet = %sheet, row = idx + 2, "缺少 OD1/OD2，跳过");
                    continue;
                }
            };

            // 数值可比时保证 OD1 < OD2
            if let (Some(n1), Some(n2)) = (od1.value, od2.value) {
                if n1 > n2 {
                    std::mem::swap(&mut od1, &mut od2);
                }
            }

            for finish in &self.finishes {
                let price = pick_number(row, &finish.fitting_price_keys);
                if price <= 0.0 {
                    continue;
                }
                out.push(ComplexFitting {
                    kind,
                    finish: finish.key.clone(),
                    od1: od1.label.clone(),
                    od2: od2.label.clone(),
                    code: resolve_code(row, &finish.fitting_code_keys),
                    price_per_pc: price,
                });
            }
        }
        Ok(out)
    }
}

// ==========================================
// 内部工具
// ==========================================

fn open_source(path: &Path) -> Option<ExcelWorkbook> {
    match ExcelWorkbook::open(path) {
        Ok(source) => {
            tracing::debug!(path = %source.path(), "打开目录工作簿");
            Some(source)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "目录工作簿不可用，对应数据段为空");
            None
        }
    }
}

/// 编码: 等级专用列优先，其次公共编码列
fn resolve_code(row: &RawRow, finish_code_keys: &[String]) -> String {
    pick_text(row, finish_code_keys)
        .or_else(|| pick_text(row, CODE_KEYS))
        .unwrap_or_default()
}

fn positive(value: f64) -> Option<f64> {
    if value > 0.0 {
        Some(value)
    } else {
        None
    }
}
