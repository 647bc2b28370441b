//! # xsgen - 多群中子截面生成器
//!
//! 根据反应堆状态（几何、材料、燃耗）批量生成多群中子截面、
//! 燃耗成分与 k∞，供燃料循环分析程序消费。
//!
//! ## 子命令
//! - `generate` - 完整管线：状态展开、燃耗计算、截面库写出
//! - `states`   - 打印/导出微扰状态表
//! - `kinf`     - 单个微扰族的 k∞ 随燃耗报告
//! - `analyze`  - 能谱与群通量绘图
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── config/    (运行控制解析)
//!   │     ├── physics/   (能谱、截面归并、燃耗引擎)
//!   │     ├── writers/   (截面库输出格式)
//!   │     └── models/    (核素、材料、几何、状态)
//!   ├── batch/      (族级并行调度)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod physics;
mod utils;
mod writers;

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
