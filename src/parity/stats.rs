//! # 误差统计
//!
//! 残差标准差、离群点判定与平均绝对误差。
//!
//! ## 依赖关系
//! - 被 `commands/parity.rs` 调用
//! - 无外部模块依赖

/// 总体标准差（除以 n，不做自由度修正）
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// 平均绝对误差
pub fn mean_absolute_error(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    residuals.iter().map(|r| r.abs()).sum::<f64>() / residuals.len() as f64
}

/// 离群点判定：|残差| ≤ sigma_factor × σ(残差) 的行保留
///
/// 返回 (阈值, 保留掩码)
pub fn outlier_mask(residuals: &[f64], sigma_factor: f64) -> (f64, Vec<bool>) {
    let threshold = sigma_factor * population_std(residuals);
    let mask = residuals.iter().map(|r| r.abs() <= threshold).collect();
    (threshold, mask)
}
