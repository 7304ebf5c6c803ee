// ==========================================
// 管件报价系统 - 报价 API
// ==========================================
// 职责: 导出报价 xlsx / 回读报价 xlsx / 由目录选择生成报价行
// 流程(导出): 校验 → 计价 → 生成工作簿
// ==========================================

use crate::api::catalog_api::CatalogApi;
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::QuoteValidator;
use crate::config::AppConfig;
use crate::domain::catalog::CatalogItem;
use crate::domain::quote::{ExportRequest, LineSelection, QuoteLine, ReimportedQuote};
use crate::engine::pricing::{
    compute_quote, offer_total, preview_line_total, preview_unit_price, suggested_discount,
    QuoteComputation, QuoteTotals,
};
use crate::exporter::{default_file_name_today, read_quote, QuoteWorkbookWriter};
use crate::i18n::resolve_locale;
use crate::importer::data_cleaner::format_mm;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 导出结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedQuote {
    pub file_name: String,
    pub locale: String,
    pub totals: QuoteTotals,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// 未导出行的价格预览（折扣前）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePreview {
    pub unit_price: f64,
    pub line_total: f64,
}

/// 建议折扣（按折扣前报价总值分档）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountSuggestion {
    pub offer_total: f64,
    pub discount_percent: f64,
}

/// 报价 API
pub struct QuoteApi {
    default_locale: String,
}

impl QuoteApi {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            default_locale: config.default_locale.clone(),
        }
    }

    /// 计价（不生成文件）
    ///
    /// # 返回
    /// - Err(ValidationError): 请求无效（指明字段）
    pub fn compute(&self, request: &ExportRequest) -> ApiResult<QuoteComputation> {
        QuoteValidator::validate_export_request(request)?;
        Ok(compute_quote(
            &request.lines,
            request.discount_percent,
            request.transport_percent,
        ))
    }

    /// 导出报价工作簿
    ///
    /// # 参数
    /// - request: 导出请求（行、折扣、运输比例、抬头信息、语言）
    ///
    /// # 返回
    /// - Ok(ExportedQuote): xlsx 字节 + 汇总 + 默认文件名
    /// - Err(ValidationError): 请求无效
    /// - Err(ExportError): 工作簿写入失败
    #[instrument(skip(self, request), fields(lines = request.lines.len()))]
    pub fn export(&self, request: &ExportRequest) -> ApiResult<ExportedQuote> {
        let computation = self.compute(request)?;
        let locale = resolve_locale(request.locale.as_deref(), &self.default_locale);

        let bytes = QuoteWorkbookWriter::new(locale, request.currency)
            .render(&computation, &request.meta)?;

        let totals = computation.totals;
        tracing::info!(
            locale,
            discount = totals.discount_percent,
            transport = totals.transport_percent,
            ex_works = totals.items_ex_works,
            delivered = totals.delivered,
            "报价导出完成"
        );

        Ok(ExportedQuote {
            file_name: default_file_name_today(),
            locale: locale.to_string(),
            totals,
            bytes,
        })
    }

    /// 回读已导出的报价工作簿
    ///
    /// # 返回
    /// - Err(InvalidInput): 内容为空
    /// - Err(ImportError): 不是有效的 xlsx
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub fn import(&self, bytes: &[u8]) -> ApiResult<ReimportedQuote> {
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput("未提供文件内容".to_string()));
        }
        Ok(read_quote(bytes)?)
    }

    /// 行价格预览
    pub fn preview(&self, line: &QuoteLine) -> LinePreview {
        LinePreview {
            unit_price: preview_unit_price(line),
            line_total: preview_line_total(line),
        }
    }

    /// 建议折扣
    pub fn suggest_discount(&self, lines: &[QuoteLine]) -> DiscountSuggestion {
        let total = offer_total(lines);
        DiscountSuggestion {
            offer_total: total,
            discount_percent: suggested_discount(total),
        }
    }

    /// 手工录入行（Other Items）
    pub fn manual_line(&self, description: &str, quantity: f64, unit_price: f64) -> ApiResult<QuoteLine> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ApiError::validation("description", "描述不能为空"));
        }
        let line = QuoteLine::manual(description, quantity, unit_price);
        QuoteValidator::validate_line(0, &line).map_err(|e| match e {
            ApiError::ValidationError { field, message } => ApiError::ValidationError {
                field: field.trim_start_matches("lines[0].").to_string(),
                message,
            },
            other => other,
        })?;
        Ok(line)
    }

    /// 由操作员选择生成报价行（取第一个匹配的目录条目）
    ///
    /// # 说明
    /// - 描述: "<类型> <表面等级> <尺寸>"，卡箍附法兰尺寸，卡套附长度
    /// - 管材按米计价，米重取自目录，合金附加费取自选择
    ///
    /// # 返回
    /// - Err(ValidationError): 选择缺少必填项
    /// - Err(NotFound): 目录中没有匹配条目
    /// - Err(InvalidInput): 物料类型不来自目录
    pub fn line_from_selection(
        &self,
        catalog: &CatalogApi,
        selection: &LineSelection,
    ) -> ApiResult<QuoteLine> {
        if !selection.quantity.is_finite() || selection.quantity <= 0.0 {
            return Err(ApiError::validation(
                "quantity",
                format!("数量必须大于 0，实际为 {}", selection.quantity),
            ));
        }
        let item = catalog.find_item(selection)?;
        let item_type = selection.item_type.unwrap_or_else(|| item.item_type());

        let line = match &item {
            CatalogItem::Tube(tube) => {
                let alloy = selection.alloy_surcharge_per_kg.unwrap_or(0.0);
                if !alloy.is_finite() || alloy < 0.0 {
                    return Err(ApiError::validation(
                        "alloy_surcharge_per_kg",
                        format!("必须为非负数值，实际为 {}", alloy),
                    ));
                }
                let mut line = QuoteLine::tube(
                    format!("{} {} {}", item_type, tube.finish, tube.nd),
                    tube.code.clone(),
                    selection.quantity,
                    tube.price_per_m,
                    tube.weight_kg_m,
                    alloy,
                );
                // 同轴管沿用管材计价
                line.item_type = item_type;
                line.with_size(tube.nd.clone())
            }
            CatalogItem::Simple(fitting) => {
                let mut description = format!("{} {} {}", item_type, fitting.finish, fitting.nd);
                if let Some(flange) = fitting.flange_size_mm {
                    description.push_str(&format!(" - Flange size mm: {}", format_mm(flange)));
                }
                if let Some(length) = fitting.length_mm {
                    description.push_str(&format!(" - L= {} mm", format_mm(length)));
                }
                QuoteLine::piece(
                    item_type,
                    description,
                    item.code(),
                    selection.quantity,
                    item.price(),
                )
                .with_size(fitting.nd.clone())
            }
            CatalogItem::Complex(fitting) => {
                let size = format!("{} x {}", fitting.od1, fitting.od2);
                QuoteLine::piece(
                    item_type,
                    format!("{} {} {}", item_type, fitting.finish, size),
                    item.code(),
                    selection.quantity,
                    item.price(),
                )
                .with_size(size)
            }
        };

        tracing::debug!(item_type = %item_type, code = item.code(), "报价行已生成");
        Ok(line.with_finish(item.finish()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CatalogSnapshot, ComplexFitting, SimpleFitting, TubeItem};
    use crate::domain::types::{ComplexFittingKind, ItemType, SimpleFittingKind, UnitOfMeasure};

    fn catalog() -> CatalogApi {
        let snapshot = CatalogSnapshot::new(
            vec![TubeItem {
                finish: "ASME BPE SF1".to_string(),
                nd: "25 mm".to_string(),
                code: "T25".to_string(),
                weight_kg_m: 2.5,
                price_per_m: 10.0,
            }],
            vec![
                SimpleFitting {
                    kind: SimpleFittingKind::Clamp,
                    finish: "ASME BPE SF1".to_string(),
                    nd: "25 mm".to_string(),
                    code: "CL25".to_string(),
                    price_per_pc: 6.0,
                    length_mm: None,
                    flange_size_mm: Some(50.5),
                },
                SimpleFitting {
                    kind: SimpleFittingKind::FerruleShort,
                    finish: "ASME BPE SF1".to_string(),
                    nd: "25 mm".to_string(),
                    code: "FC25".to_string(),
                    price_per_pc: 3.0,
                    length_mm: Some(21.0),
                    flange_size_mm: None,
                },
            ],
            vec![ComplexFitting {
                kind: ComplexFittingKind::Tee,
                finish: "ASME BPE SF1".to_string(),
                od1: "25 mm".to_string(),
                od2: "50 mm".to_string(),
                code: "TE2550".to_string(),
                price_per_pc: 40.0,
            }],
        );
        CatalogApi::with_snapshot(&AppConfig::default(), snapshot)
    }

    fn api() -> QuoteApi {
        QuoteApi::new(&AppConfig::default())
    }

    fn selection(item_type: ItemType) -> LineSelection {
        LineSelection {
            item_type: Some(item_type),
            finish: Some("ASME BPE SF1".to_string()),
            nd: Some("25 mm".to_string()),
            quantity: 3.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_tube_from_selection() {
        let mut sel = selection(ItemType::Tube);
        sel.alloy_surcharge_per_kg = Some(1.2);
        let line = api().line_from_selection(&catalog(), &sel).unwrap();

        assert_eq!(line.description, "Tubes ASME BPE SF1 25 mm");
        assert_eq!(line.code, "T25");
        assert_eq!(line.unit(), UnitOfMeasure::Mt);
        assert_eq!(line.size.as_deref(), Some("25 mm"));
        assert_eq!(line.finish.as_deref(), Some("ASME BPE SF1"));
    }

    #[test]
    fn test_clamp_and_ferrule_suffixes() {
        let clamp = api()
            .line_from_selection(&catalog(), &selection(ItemType::Simple(SimpleFittingKind::Clamp)))
            .unwrap();
        assert_eq!(
            clamp.description,
            "Clamps ASME BPE SF1 25 mm - Flange size mm: 50.5"
        );

        let ferrule = api()
            .line_from_selection(
                &catalog(),
                &selection(ItemType::Simple(SimpleFittingKind::FerruleShort)),
            )
            .unwrap();
        assert_eq!(ferrule.description, "Ferrule C (Short) ASME BPE SF1 25 mm - L= 21 mm");
        assert_eq!(ferrule.unit(), UnitOfMeasure::Pz);
    }

    #[test]
    fn test_complex_from_selection() {
        let mut sel = selection(ItemType::Complex(ComplexFittingKind::Tee));
        sel.od1 = Some("25 mm".to_string());
        sel.od2 = Some("50 mm".to_string());
        let line = api().line_from_selection(&catalog(), &sel).unwrap();
        assert_eq!(line.description, "Tees ASME BPE SF1 25 mm x 50 mm");
        assert_eq!(line.base_price(), 40.0);

        sel.od2 = Some("76.2 mm".to_string());
        let err = api().line_from_selection(&catalog(), &sel).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_selection_missing_fields() {
        let mut sel = selection(ItemType::Tube);
        sel.nd = None;
        match api().line_from_selection(&catalog(), &sel) {
            Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "nd"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }

        let mut sel = selection(ItemType::Tube);
        sel.quantity = 0.0;
        match api().line_from_selection(&catalog(), &sel) {
            Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "quantity"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }

        let err = api()
            .line_from_selection(&catalog(), &selection(ItemType::OtherItem))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_manual_line() {
        let line = api().manual_line("Valvola", 2.0, 50.0).unwrap();
        assert_eq!(line.item_type, ItemType::OtherItem);

        match api().manual_line("Valvola", -1.0, 50.0) {
            Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "quantity"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
        assert!(api().manual_line("  ", 1.0, 1.0).is_err());
    }

    #[test]
    fn test_preview() {
        let line = QuoteLine::tube("Tubes", "T25", 3.0, 10.0, 2.5, 1.2);
        let preview = api().preview(&line);
        assert!((preview.unit_price - 13.0).abs() < 1e-9);
        assert_eq!(preview.line_total, 39.0);
    }

    #[test]
    fn test_suggest_discount() {
        let small = vec![QuoteLine::manual("Valvola", 2.0, 50.0)];
        let suggestion = api().suggest_discount(&small);
        assert_eq!(suggestion.offer_total, 100.0);
        assert_eq!(suggestion.discount_percent, 35.83);

        let large = vec![QuoteLine::manual("Skid", 1.0, 50_000.0)];
        assert_eq!(api().suggest_discount(&large).discount_percent, 46.52);
    }

    #[test]
    fn test_import_empty_bytes() {
        assert!(matches!(api().import(&[]), Err(ApiError::InvalidInput(_))));
    }
}
