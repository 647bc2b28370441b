//! # kinf 子命令 CLI 定义
//!
//! 对单个微扰族运行物理引擎并打印 k∞ 随燃耗的变化。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/kinf.rs`

use clap::Args;
use std::path::PathBuf;

/// kinf 子命令参数
#[derive(Args, Debug)]
pub struct KinfArgs {
    /// Path to the run control file (TOML)
    #[arg(short, long)]
    pub rc: PathBuf,

    /// Perturbation family index to burn
    #[arg(short, long, default_value_t = 0)]
    pub family: usize,

    /// Override the physics engine named by the run control
    #[arg(long)]
    pub solver: Option<String>,
}
