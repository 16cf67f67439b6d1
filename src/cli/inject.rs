//! # inject 子命令 CLI 定义
//!
//! 位点注入参数：新标题、元素行、注入位点来源与输出命名。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inject.rs`

use clap::Args;
use std::path::PathBuf;

/// inject 子命令参数
#[derive(Args, Debug)]
pub struct InjectArgs {
    /// Directory containing .vasp files to rewrite (or a single file)
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// Replacement title line (line 1 of the POSCAR)
    #[arg(long)]
    pub title: String,

    /// Replacement species line, e.g. "C B Sn"
    #[arg(long)]
    pub species: String,

    /// File with injected fractional sites, one "x y z" per line
    /// (defaults to the built-in interstitial site set)
    #[arg(long)]
    pub sites_file: Option<PathBuf>,

    /// Prefix for the rewritten output files
    #[arg(long, default_value = "POSCAR_")]
    pub prefix: String,

    /// Glob pattern for input files (comma-separated multi-pattern)
    #[arg(long, default_value = "*.vasp")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
