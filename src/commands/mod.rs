//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config/`, `physics/`, `writers/`, `utils/`
//! - 子模块: generate, states, kinf, analyze

pub mod analyze;
pub mod generate;
pub mod kinf;
pub mod states;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Generate(args) => generate::execute(args),
        Commands::States(args) => states::execute(args),
        Commands::Kinf(args) => kinf::execute(args),
        Commands::Analyze(args) => analyze::execute(args),
    }
}
