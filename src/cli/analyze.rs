//! # analyze 子命令 CLI 定义
//!
//! 绘制加权中子能谱与群通量份额，辅助校验运行控制的谱假设。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 图像输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PlotFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
}

impl std::fmt::Display for PlotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotFormat::Png => write!(f, "png"),
            PlotFormat::Svg => write!(f, "svg"),
        }
    }
}

/// analyze 子命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the run control file (TOML)
    #[arg(short, long)]
    pub rc: PathBuf,

    /// Output image path
    #[arg(short, long, default_value = "flux_spectrum.png")]
    pub output: PathBuf,

    /// Image format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<PlotFormat>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}
