//! # 数据模型模块
//!
//! 定义晶体结构与 CSV 记录的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 子模块: structure, record

pub mod record;
pub mod structure;

pub use record::PredictionRecord;
pub use structure::{Atom, Crystal, Lattice};
