//! # JSON 格式写出
//!
//! 完整结果树：运行参数、状态表与全部族结果，供脚本后处理。
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 调度
//! - 使用 `serde_json`

use crate::config::RunControl;
use crate::error::{Result, XsgenError};
use crate::models::{nuclide, ReactorState};
use crate::physics::FamilyResult;

use serde::Serialize;
use std::fs;
use std::path::Path;

/// 顶层结果报告
#[derive(Serialize)]
struct Report<'a> {
    version: &'static str,
    reactor: &'a str,
    solver: &'a str,
    is_thermal: bool,
    /// 能群边界 (MeV)，降序
    group_structure: &'a [f64],
    /// 跟踪核素名
    track_nucs: Vec<String>,
    n_states: usize,
    states: &'a [ReactorState],
    families: &'a [FamilyResult],
}

/// 写出一个 JSON 结果文件
pub fn write(
    rc: &RunControl,
    states: &[ReactorState],
    results: &[FamilyResult],
    path: &Path,
) -> Result<()> {
    let report = Report {
        version: env!("CARGO_PKG_VERSION"),
        reactor: &rc.reactor,
        solver: &rc.solver,
        is_thermal: rc.is_thermal,
        group_structure: &rc.group_structure,
        track_nucs: rc.track_nucs.iter().map(|id| nuclide::name(*id)).collect(),
        n_states: states.len(),
        states,
        families: results,
    };

    let text = serde_json::to_string_pretty(&report)
        .map_err(|e| XsgenError::Other(format!("JSON serialization failed: {}", e)))?;
    fs::write(path, text).map_err(|e| XsgenError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
