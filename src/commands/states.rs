//! # states 命令实现
//!
//! 展开运行控制的微扰状态表并打印或导出。
//!
//! ## 依赖关系
//! - 使用 `cli/states.rs` 定义的参数
//! - 使用 `config/`, `models/state.rs`
//! - 使用 `tabled` 打印表格, `csv` 导出

use crate::cli::states::StatesArgs;
use crate::config::RunControl;
use crate::error::Result;
use crate::models::{nuclide, ReactorState};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 状态表打印行
#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "State")]
    index: usize,
    #[tabled(rename = "t (d)")]
    burn_time: String,
    #[tabled(rename = "ρ_fuel")]
    fuel_density: String,
    #[tabled(rename = "ρ_cool")]
    cool_density: String,
    #[tabled(rename = "Pitch")]
    pitch: String,
    #[tabled(rename = "P (MW/kg)")]
    power: String,
    #[tabled(rename = "Initial masses (kg)")]
    initial: String,
}

/// 执行 states 命令
pub fn execute(args: StatesArgs) -> Result<()> {
    let rc = RunControl::from_file(&args.rc)?;
    let states = rc.axes.states();
    let families = rc.axes.families();

    output::print_header("Perturbation state table");
    output::print_info(&format!(
        "{} states, {} families, parameters: {}",
        states.len(),
        families.len(),
        rc.axes.param_names().join(", ")
    ));

    let shown = if args.limit == 0 {
        states.len()
    } else {
        args.limit.min(states.len())
    };
    let rows: Vec<StateRow> = states.iter().take(shown).map(to_row).collect();
    println!("{}", Table::new(&rows));
    if shown < states.len() {
        output::print_info(&format!(
            "... {} more states (use --limit 0 to print all)",
            states.len() - shown
        ));
    }

    if let Some(path) = &args.csv {
        export_csv(&rc, &states, path)?;
        output::print_success(&format!("State table exported to '{}'", path.display()));
    }
    Ok(())
}

fn to_row(state: &ReactorState) -> StateRow {
    let initial = if state.initial_masses.is_empty() {
        "-".to_string()
    } else {
        state
            .initial_masses
            .iter()
            .map(|(id, m)| format!("{}={}", nuclide::name(*id), m))
            .collect::<Vec<_>>()
            .join(" ")
    };
    StateRow {
        index: state.index,
        burn_time: format!("{}", state.burn_time),
        fuel_density: format!("{}", state.fuel_density),
        cool_density: format!("{}", state.cool_density),
        pitch: format!("{}", state.unit_cell_pitch),
        power: format!("{}", state.fuel_specific_power),
        initial,
    }
}

/// 导出完整状态表（全部微扰参数列）
fn export_csv(rc: &RunControl, states: &[ReactorState], path: &std::path::Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["state".to_string()];
    header.extend(rc.axes.param_names());
    writer.write_record(&header)?;

    for state in states {
        let mut record = vec![
            state.index.to_string(),
            state.fuel_density.to_string(),
            state.clad_density.to_string(),
            state.cool_density.to_string(),
            state.fuel_cell_radius.to_string(),
            state.void_cell_radius.to_string(),
            state.clad_cell_radius.to_string(),
            state.unit_cell_pitch.to_string(),
            state.burn_regions.to_string(),
            state.fuel_specific_power.to_string(),
        ];
        for (_, mass) in &state.initial_masses {
            record.push(mass.to_string());
        }
        record.push(state.burn_time.to_string());
        writer.write_record(&record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
