//! # 预测值-真实值分析模块
//!
//! 离群点过滤、误差统计、核密度估计与密度着色散点图。
//!
//! ## 依赖关系
//! - 被 `commands/parity.rs` 调用
//! - 使用 `models/record.rs` 的 PredictionRecord
//! - 子模块: stats, kde, plot, export

pub mod export;
pub mod kde;
pub mod plot;
pub mod stats;

pub use plot::ParityPoint;
