//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `neighbors/`, `parity/`, `utils/`
//! - 子模块: screen, inject, parity

pub mod inject;
pub mod parity;
pub mod screen;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Screen(args) => screen::execute(args),
        Commands::Inject(args) => inject::execute(args),
        Commands::Parity(args) => parity::execute(args),
    }
}
