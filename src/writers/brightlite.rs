//! # Brightlite 格式写出
//!
//! 逐核素文本库：每个跟踪核素一个文件，按状态列出燃耗点的
//! 单群截面与存量；另写 `k_inf.txt` 汇总每个状态的 k∞ 与通量，
//! `manifest.txt` 记录库的群结构与核素清单。
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 调度
//! - 使用 `physics/` 的结果类型

use crate::config::RunControl;
use crate::error::{Result, XsgenError};
use crate::models::nuclide;
use crate::physics::FamilyResult;

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// 写出一个 brightlite 库目录
pub fn write(rc: &RunControl, results: &[FamilyResult], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| XsgenError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut written = Vec::new();

    // 每个跟踪核素一个文件
    for (slot, id) in rc.track_nucs.iter().enumerate() {
        let name = nuclide::name(*id);
        let mut text = String::new();
        let _ = writeln!(text, "# nuclide: {} ({})", name, id);
        let _ = writeln!(text, "# columns: state time_days burnup_MWd_kg sigma_gamma_b sigma_f_b mass_kg");
        for family in results {
            for step in &family.steps {
                let xs = &step.xs[slot];
                let _ = writeln!(
                    text,
                    "{} {:.6} {:.6} {:.6e} {:.6e} {:.6e}",
                    step.state_index,
                    step.time_days,
                    step.burnup_mwd_kg,
                    xs.sigma_gamma_1g,
                    xs.sigma_f_1g,
                    xs.mass
                );
            }
        }
        let path = dir.join(format!("{}.txt", name));
        write_text(&path, &text)?;
        written.push(path);
    }

    // k∞ 汇总
    let mut text = String::new();
    let _ = writeln!(text, "# columns: state time_days burnup_MWd_kg k_inf flux_n_cm2_s");
    for family in results {
        for step in &family.steps {
            let _ = writeln!(
                text,
                "{} {:.6} {:.6} {:.8} {:.6e}",
                step.state_index, step.time_days, step.burnup_mwd_kg, step.k_inf, step.flux
            );
        }
    }
    let path = dir.join("k_inf.txt");
    write_text(&path, &text)?;
    written.push(path);

    // 库清单
    let mut text = String::new();
    let _ = writeln!(text, "reactor: {}", rc.reactor);
    let _ = writeln!(text, "solver: {}", rc.solver);
    let group_bounds: Vec<String> = rc.group_structure.iter().map(|e| e.to_string()).collect();
    let _ = writeln!(text, "group_structure_mev: {}", group_bounds.join(" "));
    let names: Vec<String> = rc.track_nucs.iter().map(|id| nuclide::name(*id)).collect();
    let _ = writeln!(text, "nuclides: {}", names.join(" "));
    let path = dir.join("manifest.txt");
    write_text(&path, &text)?;
    written.push(path);

    Ok(written)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| XsgenError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
