//! # parity 子命令 CLI 定义
//!
//! 散点图参数：结果 CSV、离群点阈值倍数、图像尺寸与轴标签。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/parity.rs`

use clap::Args;
use std::path::PathBuf;

/// parity 子命令参数
#[derive(Args, Debug)]
pub struct ParityArgs {
    /// Results CSV (headerless rows: structure,true,predicted)
    #[arg(default_value = "train_results.csv")]
    pub input: PathBuf,

    /// Output plot stem; .png and .svg are both written
    #[arg(short, long, default_value = "test_plot")]
    pub output: PathBuf,

    /// Output CSV with outliers removed
    #[arg(long, default_value = "filtered_test_results.csv")]
    pub filtered_output: PathBuf,

    /// Outlier threshold as a multiple of the residual standard deviation
    #[arg(long, default_value_t = 3.0)]
    pub sigma: f64,

    /// Figure width in pixels (colorbar included)
    #[arg(long, default_value_t = 980)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 860)]
    pub height: u32,

    /// Plot title (default: "MAE: <value>")
    #[arg(long)]
    pub title: Option<String>,

    /// X axis label
    #[arg(long, default_value = "Calculated Tc (K)")]
    pub xlabel: String,

    /// Y axis label
    #[arg(long, default_value = "Predicted Tc (K)")]
    pub ylabel: String,
}
