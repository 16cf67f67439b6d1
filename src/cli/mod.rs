//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `screen`: 近邻数筛查与数据集 CSV 过滤
//! - `inject`: VASP 文件位点注入改写
//! - `parity`: 预测值-真实值散点与离群点过滤
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: screen, inject, parity

pub mod inject;
pub mod parity;
pub mod screen;

use clap::{Parser, Subcommand};

/// Fpkit - 指纹数据集准备工具箱
#[derive(Parser)]
#[command(name = "fpkit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Fingerprint dataset preparation toolkit for VASP structure files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Screen .vasp structures whose neighbor count overflows the fingerprint buffer
    Screen(screen::ScreenArgs),

    /// Rewrite VASP files to inject additional atomic sites
    Inject(inject::InjectArgs),

    /// Plot predicted-vs-true parity with density coloring and filter outliers
    Parity(parity::ParityArgs),
}
