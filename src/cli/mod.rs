//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `generate`: 生成多群截面库（完整管线）
//! - `states`: 列出微扰状态表
//! - `kinf`: 单个微扰族的 k∞ 随燃耗报告
//! - `analyze`: 能谱与群通量绘图
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: generate, states, kinf, analyze

pub mod analyze;
pub mod generate;
pub mod kinf;
pub mod states;

use clap::{Parser, Subcommand};

/// xsgen - 多群中子截面生成器
#[derive(Parser)]
#[command(name = "xsgen")]
#[command(version)]
#[command(about = "Multigroup neutron cross section generator", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Generate cross section libraries for every reactor state
    Generate(generate::GenerateArgs),

    /// List the perturbation state table for a run control file
    States(states::StatesArgs),

    /// Report k-infinity versus burnup for one perturbation family
    Kinf(kinf::KinfArgs),

    /// Plot the weighted neutron spectrum and group fluxes
    Analyze(analyze::AnalyzeArgs),
}
