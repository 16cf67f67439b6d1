//! # 周期近邻计数模块
//!
//! 在周期性边界条件下统计截断半径内的近邻原子对数，
//! 用于判断结构是否会溢出下游指纹库的固定缓冲区 (natx)，
//! 并为截断半径提供推荐值。
//!
//! ## 依赖关系
//! - 被 `commands/screen.rs` 调用
//! - 使用 `models/structure.rs` 的 Lattice
//! - 子模块: counter

pub mod counter;

pub use counter::{count_within_cutoff, image_bound};

use crate::models::Lattice;

/// 截断半径推荐结果
#[derive(Debug, Clone, Copy)]
pub struct Recommendation {
    /// 推荐的截断半径 (Å)
    pub cutoff: f64,
    /// 该截断下的近邻对数，即需要的缓冲区大小
    pub nx: usize,
}

/// 在 [initial, max] 范围内按步长扫描截断半径，
/// 返回产生最大近邻对数的截断；计数相同时保留先出现的截断
pub fn recommend(
    lattice: &Lattice,
    positions: &[[f64; 3]],
    initial_cutoff: f64,
    max_cutoff: f64,
    step: f64,
) -> Recommendation {
    let mut cutoff = initial_cutoff;
    let mut best_cutoff = initial_cutoff;
    let mut best_nx = 0;

    while cutoff <= max_cutoff {
        let count = count_within_cutoff(lattice, positions, cutoff);
        if count > best_nx {
            best_nx = count;
            best_cutoff = cutoff;
        }

        cutoff += step;
    }

    Recommendation {
        cutoff: best_cutoff,
        nx: best_nx,
    }
}
