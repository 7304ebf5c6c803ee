// ==========================================
// 管件报价系统 - 报价请求校验器
// ==========================================
// 职责: 计算前拒绝无效请求，错误中指明字段
// 规则:
//   - 至少一行
//   - 折扣为有限值且在 [0, 100]
//   - 运输比例为有限值（负数按 0 处理，仅记录警告）
//   - 数量为正的有限值；价格/米重/附加费为非负有限值
//   - 按米计价的物料类型必须使用按米计价，反之亦然
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::quote::{ExportRequest, LinePricing, QuoteLine};

/// 报价请求校验器
pub struct QuoteValidator;

impl QuoteValidator {
    /// 校验导出请求
    ///
    /// # 返回
    /// - Ok(()): 校验通过
    /// - Err(ApiError::ValidationError): 第一个无效字段
    pub fn validate_export_request(request: &ExportRequest) -> ApiResult<()> {
        if request.lines.is_empty() {
            return Err(ApiError::validation("lines", "报价至少需要一行"));
        }

        let discount = request.discount_percent;
        if !discount.is_finite() || !(0.0..=100.0).contains(&discount) {
            return Err(ApiError::validation(
                "discount_percent",
                format!("折扣必须在 0 到 100 之间，实际为 {}", discount),
            ));
        }

        let transport = request.transport_percent;
        if !transport.is_finite() {
            return Err(ApiError::validation(
                "transport_percent",
                "运输比例必须为有限数值",
            ));
        }
        if transport < 0.0 {
            tracing::warn!(transport_percent = transport, "运输比例为负数，按 0 处理");
        }

        for (idx, line) in request.lines.iter().enumerate() {
            Self::validate_line(idx, line)?;
        }
        Ok(())
    }

    /// 校验单行
    pub fn validate_line(idx: usize, line: &QuoteLine) -> ApiResult<()> {
        let field = |name: &str| format!("lines[{}].{}", idx, name);

        if !line.quantity.is_finite() || line.quantity <= 0.0 {
            return Err(ApiError::validation(
                field("quantity"),
                format!("数量必须大于 0，实际为 {}", line.quantity),
            ));
        }

        match &line.pricing {
            LinePricing::Mt {
                base_price_per_m,
                weight_kg_m,
                alloy_surcharge_per_kg,
            } => {
                non_negative(field("pricing.base_price_per_m"), *base_price_per_m)?;
                non_negative(field("pricing.weight_kg_m"), *weight_kg_m)?;
                non_negative(
                    field("pricing.alloy_surcharge_per_kg"),
                    *alloy_surcharge_per_kg,
                )?;
            }
            LinePricing::Pz { base_price_per_pc } => {
                non_negative(field("pricing.base_price_per_pc"), *base_price_per_pc)?;
            }
        }

        let length_priced = line.item_type.is_length_priced();
        let per_meter = matches!(line.pricing, LinePricing::Mt { .. });
        if length_priced != per_meter {
            return Err(ApiError::validation(
                field("pricing"),
                format!(
                    "物料类型 {} 的计价单位应为 {}",
                    line.item_type,
                    if length_priced { "mt" } else { "pz" }
                ),
            ));
        }
        Ok(())
    }
}

fn non_negative(field: String, value: f64) -> ApiResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ApiError::validation(
            field,
            format!("必须为非负数值，实际为 {}", value),
        ))
    }
}
