// ==========================================
// 管件报价系统 - 目录查询 API
// ==========================================
// 职责: 目录查询 / 尺寸选项 / 重新加载
// 并发: 快照放在 RwLock<Arc<_>> 中；重载在锁外构建新快照后整体替换，
//       查询只克隆 Arc，不会看到半成品
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::AppConfig;
use crate::domain::catalog::{
    CatalogItem, CatalogSnapshot, ComplexFilter, ComplexFitting, SegmentCounts, SimpleFilter,
    SimpleFitting, TubeFilter, TubeItem,
};
use crate::domain::quote::LineSelection;
use crate::domain::types::{ComplexFittingKind, ItemType};
use crate::importer::catalog_loader::CatalogLoader;
use crate::importer::data_cleaner::leading_number;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::instrument;

// ==========================================
// CatalogStore - 快照持有者
// ==========================================
pub struct CatalogStore {
    snapshot: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// 当前快照
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 替换快照，返回新快照
    pub fn replace(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        next
    }
}

/// 重载结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadSummary {
    pub counts: SegmentCounts,
    pub snapshot_id: String,
    pub loaded_at: DateTime<Utc>,
}

/// 三通/异径管尺寸选项（OD1 → 可选 OD2）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdChoice {
    pub od1: String,
    pub od2: Vec<String>,
}

// ==========================================
// CatalogApi
// ==========================================
pub struct CatalogApi {
    loader: CatalogLoader,
    store: CatalogStore,
}

impl CatalogApi {
    /// 创建并立即加载目录
    pub fn new(config: &AppConfig) -> Self {
        let loader = CatalogLoader::new(config);
        let snapshot = loader.load();
        Self {
            loader,
            store: CatalogStore::new(snapshot),
        }
    }

    /// 以现成快照创建（不读取源文件）
    pub fn with_snapshot(config: &AppConfig, snapshot: CatalogSnapshot) -> Self {
        Self {
            loader: CatalogLoader::new(config),
            store: CatalogStore::new(snapshot),
        }
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.store.current()
    }

    /// 表面等级列表
    pub fn list_finishes(&self) -> Vec<String> {
        self.loader.finishes().iter().map(|f| f.key.clone()).collect()
    }

    /// 查询管材
    #[instrument(skip(self))]
    pub fn list_tubes(&self, filter: &TubeFilter) -> Vec<TubeItem> {
        let snapshot = self.store.current();
        let items: Vec<TubeItem> = snapshot
            .tubes
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tracing::debug!(count = items.len(), "管材查询");
        items
    }

    /// 查询简单管件
    #[instrument(skip(self))]
    pub fn list_simple_fittings(&self, filter: &SimpleFilter) -> Vec<SimpleFitting> {
        let snapshot = self.store.current();
        let items: Vec<SimpleFitting> = snapshot
            .simple
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        tracing::debug!(count = items.len(), "简单管件查询");
        items
    }

    /// 查询三通/异径管
    #[instrument(skip(self))]
    pub fn list_complex_fittings(&self, filter: &ComplexFilter) -> Vec<ComplexFitting> {
        let snapshot = self.store.current();
        let items: Vec<ComplexFitting> = snapshot
            .complex
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        tracing::debug!(count = items.len(), "三通/异径管查询");
        items
    }

    /// ND 选项（按数值排序，无数值时按文本）
    ///
    /// # 返回
    /// - Err(InvalidInput): 物料类型不按 ND 定位
    pub fn nd_options(&self, item_type: ItemType, finish: Option<&str>) -> ApiResult<Vec<String>> {
        let finish = finish.map(str::to_string);
        let labels: Vec<String> = match item_type {
            ItemType::Tube | ItemType::CoaxialTube => self
                .list_tubes(&TubeFilter { finish, nd: None })
                .into_iter()
                .map(|t| t.nd)
                .collect(),
            ItemType::Simple(kind) => self
                .list_simple_fittings(&SimpleFilter {
                    kind: Some(kind),
                    finish,
                    nd: None,
                })
                .into_iter()
                .map(|s| s.nd)
                .collect(),
            other => {
                return Err(ApiError::InvalidInput(format!(
                    "物料类型 {} 不按 ND 选择",
                    other
                )))
            }
        };
        Ok(sorted_unique(labels))
    }

    /// OD1 → OD2 选项
    pub fn od_options(&self, kind: ComplexFittingKind, finish: Option<&str>) -> Vec<OdChoice> {
        let items = self.list_complex_fittings(&ComplexFilter {
            kind: Some(kind),
            finish: finish.map(str::to_string),
            od1: None,
            od2: None,
        });

        let od1_values = sorted_unique(items.iter().map(|c| c.od1.clone()).collect());
        od1_values
            .into_iter()
            .map(|od1| {
                let od2 = sorted_unique(
                    items
                        .iter()
                        .filter(|c| c.od1 == od1)
                        .map(|c| c.od2.clone())
                        .collect(),
                );
                OdChoice { od1, od2 }
            })
            .collect()
    }

    /// 按操作员选择定位目录条目（取第一个匹配）
    ///
    /// # 返回
    /// - Err(ValidationError): 选择缺少必填项
    /// - Err(NotFound): 目录中没有匹配条目
    /// - Err(InvalidInput): 物料类型不来自目录
    pub fn find_item(&self, selection: &LineSelection) -> ApiResult<CatalogItem> {
        let item_type = selection
            .item_type
            .ok_or_else(|| ApiError::validation("item_type", "未选择物料类型"))?;
        let finish = required(&selection.finish, "finish")?;
        let snapshot = self.store.current();

        let (size, found) = match item_type {
            ItemType::Tube | ItemType::CoaxialTube => {
                let nd = required(&selection.nd, "nd")?;
                let found = snapshot
                    .tubes
                    .iter()
                    .find(|t| t.finish == finish && t.nd == nd)
                    .cloned()
                    .map(CatalogItem::Tube);
                (nd.to_string(), found)
            }
            ItemType::Simple(kind) => {
                let nd = required(&selection.nd, "nd")?;
                let found = snapshot
                    .simple
                    .iter()
                    .find(|s| s.kind == kind && s.finish == finish && s.nd == nd)
                    .cloned()
                    .map(CatalogItem::Simple);
                (nd.to_string(), found)
            }
            ItemType::Complex(kind) => {
                let od1 = required(&selection.od1, "od1")?;
                let od2 = required(&selection.od2, "od2")?;
                let found = snapshot
                    .complex
                    .iter()
                    .find(|c| c.kind == kind && c.finish == finish && c.od1 == od1 && c.od2 == od2)
                    .cloned()
                    .map(CatalogItem::Complex);
                (format!("{} x {}", od1, od2), found)
            }
            ItemType::OtherItem | ItemType::Imported => {
                return Err(ApiError::InvalidInput(format!(
                    "物料类型 {} 不来自目录，请使用手工录入行",
                    item_type
                )))
            }
        };

        found.ok_or_else(|| ApiError::NotFound(format!("{} / {} / {}", item_type, finish, size)))
    }

    /// 重新加载目录
    ///
    /// # 说明
    /// - 新快照在锁外构建；源文件缺失只会使对应数据段为空
    #[instrument(skip(self))]
    pub fn reload(&self) -> ReloadSummary {
        let snapshot = self.store.replace(self.loader.load());
        let summary = summarize(&snapshot);
        tracing::info!(
            snapshot_id = %summary.snapshot_id,
            tubes = summary.counts.tubes,
            simple = summary.counts.simple,
            complex = summary.counts.complex,
            "目录已重新加载"
        );
        summary
    }

    /// 当前快照摘要（不重新读取源文件）
    pub fn summary(&self) -> ReloadSummary {
        summarize(&self.store.current())
    }
}

fn summarize(snapshot: &CatalogSnapshot) -> ReloadSummary {
    ReloadSummary {
        counts: snapshot.counts(),
        snapshot_id: snapshot.snapshot_id.clone(),
        loaded_at: snapshot.loaded_at,
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> ApiResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(field, "必填项为空")),
    }
}

/// 尺寸排序: 先按标签开头数值，再按文本
fn compare_sizes(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn sorted_unique(mut labels: Vec<String>) -> Vec<String> {
    labels.sort_by(|a, b| compare_sizes(a, b));
    labels.dedup();
    labels
}
