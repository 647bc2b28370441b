//! # 批量计算模块
//!
//! 微扰族级别的并行计算调度。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代
//! - 进度反馈与统计
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 使用
//! - 使用 `rayon` 进行并行计算
//! - 使用 `indicatif` 显示进度

pub mod runner;

pub use runner::{BatchResult, BatchRunner};
