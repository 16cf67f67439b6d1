//! # Fpkit - 指纹数据集准备工具箱
//!
//! 将指纹工作流的分散辅助脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `screen` - 筛查近邻数超出指纹缓冲区的 .vasp 结构，过滤数据集 CSV
//! - `inject` - 按行改写 VASP 文件，注入新的原子位点
//! - `parity` - 预测值-真实值密度散点图与离群点过滤
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (POSCAR 解析器)
//!   │     ├── neighbors/ (周期近邻计数)
//!   │     ├── parity/    (统计与绘图)
//!   │     └── models/    (数据模型)
//!   ├── batch/      (批量文件处理)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod neighbors;
mod parity;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
