// ==========================================
// 管件报价系统 - 目录领域模型
// ==========================================
// 用途: 导入层写入（整体替换），查询层只读
// 红线: price > 0；ND/OD 为规范化文本标签，不是裸数字
// ==========================================

use crate::domain::types::{ComplexFittingKind, ItemType, SimpleFittingKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// TubeItem - 管材（按米计价）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubeItem {
    pub finish: String,      // 表面等级
    pub nd: String,          // 公称直径标签
    pub code: String,        // 物料编码
    pub weight_kg_m: f64,    // 米重（kg/m）
    pub price_per_m: f64,    // 单价（€/m）
}

impl TubeItem {
    pub fn item_type(&self) -> ItemType {
        ItemType::Tube
    }
}

// ==========================================
// SimpleFitting - 简单管件（按件计价，ND 定位）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleFitting {
    pub kind: SimpleFittingKind,
    pub finish: String,
    pub nd: String,
    pub code: String,
    pub price_per_pc: f64,              // 单价（€/pz）
    pub length_mm: Option<f64>,         // 卡套长度（仅 Ferrule）
    pub flange_size_mm: Option<f64>,    // 法兰尺寸（仅 Clamp）
}

impl SimpleFitting {
    pub fn item_type(&self) -> ItemType {
        ItemType::Simple(self.kind)
    }
}

// ==========================================
// ComplexFitting - 三通/异径管（按件计价，OD1/OD2 定位）
// ==========================================
// 约束: OD1 为较小外径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexFitting {
    pub kind: ComplexFittingKind,
    pub finish: String,
    pub od1: String,
    pub od2: String,
    pub code: String,
    pub price_per_pc: f64,
}

impl ComplexFitting {
    pub fn item_type(&self) -> ItemType {
        ItemType::Complex(self.kind)
    }
}

// ==========================================
// CatalogItem - 统一目录条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segment", rename_all = "snake_case")]
pub enum CatalogItem {
    Tube(TubeItem),
    Simple(SimpleFitting),
    Complex(ComplexFitting),
}

impl CatalogItem {
    pub fn item_type(&self) -> ItemType {
        match self {
            CatalogItem::Tube(t) => t.item_type(),
            CatalogItem::Simple(s) => s.item_type(),
            CatalogItem::Complex(c) => c.item_type(),
        }
    }

    pub fn finish(&self) -> &str {
        match self {
            CatalogItem::Tube(t) => &t.finish,
            CatalogItem::Simple(s) => &s.finish,
            CatalogItem::Complex(c) => &c.finish,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            CatalogItem::Tube(t) => &t.code,
            CatalogItem::Simple(s) => &s.code,
            CatalogItem::Complex(c) => &c.code,
        }
    }

    pub fn price(&self) -> f64 {
        match self {
            CatalogItem::Tube(t) => t.price_per_m,
            CatalogItem::Simple(s) => s.price_per_pc,
            CatalogItem::Complex(c) => c.price_per_pc,
        }
    }
}

// ==========================================
// 段计数 (Segment Counts)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentCounts {
    pub tubes: usize,
    pub simple: usize,
    pub complex: usize,
}

// ==========================================
// CatalogSnapshot - 目录快照
// ==========================================
// 加载完成后不可变；重载时整体替换引用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub snapshot_id: String,
    pub loaded_at: DateTime<Utc>,
    pub tubes: Vec<TubeItem>,
    pub simple: Vec<SimpleFitting>,
    pub complex: Vec<ComplexFitting>,
}

impl CatalogSnapshot {
    pub fn new(
        tubes: Vec<TubeItem>,
        simple: Vec<SimpleFitting>,
        complex: Vec<ComplexFitting>,
    ) -> Self {
        Self {
            snapshot_id: Uuid::new_v4().to_string(),
            loaded_at: Utc::now(),
            tubes,
            simple,
            complex,
        }
    }

    /// 空快照（所有数据源不可用时）
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn counts(&self) -> SegmentCounts {
        SegmentCounts {
            tubes: self.tubes.len(),
            simple: self.simple.len(),
            complex: self.complex.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tubes.is_empty() && self.simple.is_empty() && self.complex.is_empty()
    }
}

// ==========================================
// 查询过滤器
// ==========================================
// 约定: None 或空白字符串表示不过滤；其余按去空白后的精确文本匹配

fn filter_matches(filter: &Option<String>, value: &str) -> bool {
    match filter.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(wanted) => value.trim() == wanted,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TubeFilter {
    pub finish: Option<String>,
    pub nd: Option<String>,
}

impl TubeFilter {
    pub fn matches(&self, item: &TubeItem) -> bool {
        filter_matches(&self.finish, &item.finish) && filter_matches(&self.nd, &item.nd)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleFilter {
    pub kind: Option<SimpleFittingKind>,
    pub finish: Option<String>,
    pub nd: Option<String>,
}

impl SimpleFilter {
    pub fn matches(&self, item: &SimpleFitting) -> bool {
        self.kind.map_or(true, |k| k == item.kind)
            && filter_matches(&self.finish, &item.finish)
            && filter_matches(&self.nd, &item.nd)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplexFilter {
    pub kind: Option<ComplexFittingKind>,
    pub finish: Option<String>,
    pub od1: Option<String>,
    pub od2: Option<String>,
}

impl ComplexFilter {
    pub fn matches(&self, item: &ComplexFitting) -> bool {
        self.kind.map_or(true, |k| k == item.kind)
            && filter_matches(&self.finish, &item.finish)
            && filter_matches(&self.od1, &item.od1)
            && filter_matches(&self.od2, &item.od2)
    }
}
