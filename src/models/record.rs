//! # CSV 记录数据模型
//!
//! 预测结果表的行类型，无表头 CSV 按列位置反序列化。
//!
//! ## 依赖关系
//! - 被 `commands/parity.rs` 与 `parity/export.rs` 使用
//! - 使用 `serde` 派生

use serde::{Deserialize, Serialize};

/// 预测结果行: 结构名, 真实值, 预测值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// 结构名（数据集 ID）
    pub structure: String,

    /// 真实值（计算得到的目标量）
    pub true_value: f64,

    /// 模型预测值
    pub predicted_value: f64,
}

impl PredictionRecord {
    /// 预测残差 (真实值 - 预测值)
    pub fn residual(&self) -> f64 {
        self.true_value - self.predicted_value
    }
}
