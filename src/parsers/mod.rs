//! # 解析器模块
//!
//! 提供 VASP 结构文件的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar

pub mod poscar;

use crate::error::{FpkitError, Result};
use crate::models::Crystal;
use std::path::Path;

/// 从文件路径推断格式并解析
pub fn parse_structure_file(path: &Path) -> Result<Crystal> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    if ext == "vasp" {
        return poscar::parse_poscar_file(path);
    }

    // 可能是 POSCAR/CONTCAR (无扩展名)
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if name.starts_with("POSCAR") || name.starts_with("CONTCAR") {
            return poscar::parse_poscar_file(path);
        }
    }

    Err(FpkitError::UnsupportedFormat(format!(
        "Cannot determine format for: {}",
        path.display()
    )))
}
