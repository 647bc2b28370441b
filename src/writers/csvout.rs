//! # CSV 格式写出
//!
//! 扁平表格：每行一个 (状态, 核素) 记录，多群截面展开为
//! sigma_gamma_g1..gN / sigma_f_g1..gN 列。
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 调度
//! - 使用 `csv` crate

use crate::config::RunControl;
use crate::error::Result;
use crate::physics::FamilyResult;

use std::path::Path;

/// 写出一个 CSV 结果表
pub fn write(rc: &RunControl, results: &[FamilyResult], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let n_groups = rc.group_structure.len() - 1;
    let mut header = vec![
        "family".to_string(),
        "state".to_string(),
        "time_days".to_string(),
        "burnup_mwd_kg".to_string(),
        "k_inf".to_string(),
        "flux".to_string(),
        "nuclide".to_string(),
        "mass_kg".to_string(),
        "sigma_gamma_1g".to_string(),
        "sigma_f_1g".to_string(),
    ];
    for g in 1..=n_groups {
        header.push(format!("sigma_gamma_g{}", g));
    }
    for g in 1..=n_groups {
        header.push(format!("sigma_f_g{}", g));
    }
    writer.write_record(&header)?;

    for family in results {
        for step in &family.steps {
            for xs in &step.xs {
                let mut record = vec![
                    family.family_index.to_string(),
                    step.state_index.to_string(),
                    step.time_days.to_string(),
                    step.burnup_mwd_kg.to_string(),
                    step.k_inf.to_string(),
                    format!("{:.6e}", step.flux),
                    xs.name.clone(),
                    format!("{:.6e}", xs.mass),
                    format!("{:.6e}", xs.sigma_gamma_1g),
                    format!("{:.6e}", xs.sigma_f_1g),
                ];
                for v in &xs.sigma_gamma {
                    record.push(format!("{:.6e}", v));
                }
                for v in &xs.sigma_f {
                    record.push(format!("{:.6e}", v));
                }
                writer.write_record(&record)?;
            }
        }
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
