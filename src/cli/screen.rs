//! # screen 子命令 CLI 定义
//!
//! 近邻数筛查参数：截断半径、缓冲区大小、数据集 CSV 路径与
//! 可选的截断半径推荐扫描。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/screen.rs`

use clap::Args;
use std::path::PathBuf;

/// screen 子命令参数
#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Directory containing .vasp structure files (or a single file)
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// Cutoff radius for the neighbor count, in Angstrom
    #[arg(long, default_value_t = 4.0)]
    pub cutoff: f64,

    /// Fingerprint buffer size; structures whose neighbor count exceeds it are glitchy
    #[arg(long, default_value_t = 256)]
    pub natx: usize,

    /// Dataset CSV to filter (headerless, first column = structure id)
    #[arg(long, default_value = "fulllist.csv")]
    pub csv: PathBuf,

    /// Filtered dataset CSV output
    #[arg(short, long, default_value = "id_prop.csv")]
    pub output: PathBuf,

    /// Glob pattern for input files (comma-separated multi-pattern)
    #[arg(long, default_value = "*.vasp")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    // ─────────────────────────────────────────────────────────────
    // 截断半径推荐扫描
    // ─────────────────────────────────────────────────────────────
    /// Sweep cutoffs and report the recommended (cutoff, nx) per structure
    /// instead of the fixed-cutoff check
    #[arg(long, default_value_t = false)]
    pub recommend: bool,

    /// Starting cutoff for the recommendation sweep
    #[arg(long, default_value_t = 6.0)]
    pub initial_cutoff: f64,

    /// Maximum cutoff for the recommendation sweep
    #[arg(long, default_value_t = 10.0)]
    pub max_cutoff: f64,

    /// Step size for the recommendation sweep
    #[arg(long, default_value_t = 0.5)]
    pub step: f64,
}
