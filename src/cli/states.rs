//! # states 子命令 CLI 定义
//!
//! 打印运行控制展开后的微扰状态表，或导出为 CSV。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/states.rs`

use clap::Args;
use std::path::PathBuf;

/// states 子命令参数
#[derive(Args, Debug)]
pub struct StatesArgs {
    /// Path to the run control file (TOML)
    #[arg(short, long)]
    pub rc: PathBuf,

    /// Export the full state table to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Maximum number of states to print (0 = all)
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}
