//! # kinf 命令实现
//!
//! 对单个微扰族运行物理引擎，打印 k∞ 随燃耗的演化。
//!
//! ## 依赖关系
//! - 使用 `cli/kinf.rs` 定义的参数
//! - 使用 `config/`, `physics/`
//! - 使用 `tabled` 打印表格

use crate::cli::kinf::KinfArgs;
use crate::config::RunControl;
use crate::error::{Result, XsgenError};
use crate::physics;
use crate::utils::output;

use tabled::{Table, Tabled};

/// k∞ 报告行
#[derive(Tabled)]
struct KinfRow {
    #[tabled(rename = "t (d)")]
    time: String,
    #[tabled(rename = "Burnup (MWd/kg)")]
    burnup: String,
    #[tabled(rename = "k∞")]
    k_inf: String,
    #[tabled(rename = "Flux (n/cm²·s)")]
    flux: String,
}

/// 执行 kinf 命令
pub fn execute(args: KinfArgs) -> Result<()> {
    let mut rc = RunControl::from_file(&args.rc)?;
    if let Some(solver) = &args.solver {
        rc.solver = solver.clone();
    }

    let families = rc.axes.families();
    let family = families.get(args.family).ok_or_else(|| {
        XsgenError::InvalidArgument(format!(
            "family index {} out of range (0..{})",
            args.family,
            families.len()
        ))
    })?;

    let engine = physics::engine_for_name(&rc.solver)?;
    output::print_header(&format!(
        "k-infinity for family {} ({} engine)",
        family.index,
        engine.name()
    ));
    output::print_info(&format!(
        "fuel density {} g/cc, specific power {} MW/kgIHM, {} burn steps",
        family.base.fuel_density,
        family.base.fuel_specific_power,
        family.burn_times.len()
    ));

    let result = engine.lattice_physics(family, &rc)?;

    let rows: Vec<KinfRow> = result
        .steps
        .iter()
        .map(|s| KinfRow {
            time: format!("{:.1}", s.time_days),
            burnup: format!("{:.3}", s.burnup_mwd_kg),
            k_inf: format!("{:.5}", s.k_inf),
            flux: format!("{:.4e}", s.flux),
        })
        .collect();
    println!("{}", Table::new(&rows));

    output::print_done(&format!(
        "Burned family {} to {:.3} MWd/kgIHM",
        family.index,
        result.steps.last().map(|s| s.burnup_mwd_kg).unwrap_or(0.0)
    ));
    Ok(())
}
