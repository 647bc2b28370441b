//! # generate 子命令 CLI 定义
//!
//! 完整管线：解析运行控制、生成状态表、逐族燃耗计算、写出
//! 截面库。命令行可覆盖运行控制中的常用键。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/generate.rs`

use clap::Args;
use std::path::PathBuf;

/// generate 子命令参数
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the run control file (TOML)
    #[arg(short, long)]
    pub rc: PathBuf,

    /// Output directory for generated libraries
    #[arg(short, long, default_value = "xsgen_out")]
    pub output: PathBuf,

    /// Override the output formats from the run control
    #[arg(long, num_args = 1..)]
    pub formats: Option<Vec<String>>,

    /// Override the output file names from the run control
    #[arg(long, num_args = 1..)]
    pub outfiles: Option<Vec<String>>,

    /// Override the physics engine named by the run control
    #[arg(long)]
    pub solver: Option<String>,

    /// Override the thermal/fast reactor flag
    #[arg(long)]
    pub is_thermal: Option<bool>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Clean the output directory of files from previous runs
    #[arg(short, long, default_value_t = false)]
    pub clean: bool,
}
