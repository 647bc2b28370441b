//! # analyze 命令实现
//!
//! 绘制运行控制对应的加权中子能谱（单位对数能降通量），并打印各
//! 能群的通量份额，用于在生成库之前检查谱假设。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的参数
//! - 使用 `config/`, `physics/{infinite,spectrum}.rs`
//! - 使用 `plotters` 渲染图表, `tabled` 打印表格

use crate::cli::analyze::{AnalyzeArgs, PlotFormat};
use crate::config::RunControl;
use crate::error::{Result, XsgenError};
use crate::physics::infinite::CellEnvironment;
use crate::physics::spectrum::{ENERGY_MAX_MEV, ENERGY_MIN_MEV};
use crate::utils::output;

use plotters::prelude::*;
use std::path::Path;
use tabled::{Table, Tabled};

/// 采样点数
const SAMPLES: usize = 600;

/// 群通量份额行
#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    group: usize,
    #[tabled(rename = "E_hi (MeV)")]
    e_hi: String,
    #[tabled(rename = "E_lo (MeV)")]
    e_lo: String,
    #[tabled(rename = "Flux fraction")]
    fraction: String,
}

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    let rc = RunControl::from_file(&args.rc)?;
    let families = rc.axes.families();
    let env = CellEnvironment::build(&families[0].base, &rc)?;

    output::print_header("Neutron spectrum analysis");
    output::print_info(&format!(
        "weights: thermal {:.3}, epithermal {:.3}, fast {:.3} (T = {} K)",
        env.spectrum.w_thermal, env.spectrum.w_epithermal, env.spectrum.w_fast, rc.temperature
    ));

    // 群通量份额表
    let fractions = env.spectrum.group_fractions(&env.groups);
    let rows: Vec<GroupRow> = fractions
        .iter()
        .enumerate()
        .map(|(g, f)| {
            let (hi, lo) = env.groups.bounds(g);
            GroupRow {
                group: g + 1,
                e_hi: format!("{:e}", hi),
                e_lo: format!("{:e}", lo),
                fraction: format!("{:.4}", f),
            }
        })
        .collect();
    println!("{}", Table::new(&rows));

    // 单位对数能降通量曲线 E·φ(E)
    let ln_lo = ENERGY_MIN_MEV.ln();
    let ln_hi = ENERGY_MAX_MEV.ln();
    let data: Vec<(f64, f64)> = (0..SAMPLES)
        .map(|i| {
            let e = (ln_lo + (ln_hi - ln_lo) * i as f64 / (SAMPLES - 1) as f64).exp();
            (e, e * env.spectrum.phi(e))
        })
        .collect();

    let use_svg = match args.format {
        Some(PlotFormat::Svg) => true,
        Some(PlotFormat::Png) => false,
        None => args
            .output
            .extension()
            .map(|e| e.eq_ignore_ascii_case("svg"))
            .unwrap_or(false),
    };

    let title = format!(
        "Weighted neutron spectrum ({})",
        if rc.is_thermal { "thermal" } else { "fast" }
    );
    if use_svg {
        let root = SVGBackend::new(&args.output, (args.width, args.height)).into_drawing_area();
        draw_spectrum_chart(&root, &data, &rc.group_structure, &title)?;
        root.present()
            .map_err(|e| XsgenError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(&args.output, (args.width, args.height)).into_drawing_area();
        draw_spectrum_chart(&root, &data, &rc.group_structure, &title)?;
        root.present()
            .map_err(|e| XsgenError::Other(e.to_string()))?;
    }

    output::print_success(&format!("Spectrum plot written to '{}'", args.output.display()));
    Ok(())
}

/// 绘制能谱图：对数能量轴上的单位对数能降通量，竖线标出群边界
fn draw_spectrum_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &[(f64, f64)],
    group_structure: &[f64],
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| XsgenError::Other(format!("{:?}", e)))?;

    let y_max = data.iter().map(|(_, y)| *y).fold(0.0, f64::max) * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((ENERGY_MIN_MEV..ENERGY_MAX_MEV).log_scale(), 0.0..y_max)
        .map_err(|e| XsgenError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Energy (MeV)")
        .y_desc("E·φ(E) (per unit lethargy)")
        .draw()
        .map_err(|e| XsgenError::Other(format!("{:?}", e)))?;

    chart
        .draw_series(LineSeries::new(data.iter().cloned(), BLUE.stroke_width(2)))
        .map_err(|e| XsgenError::Other(format!("{:?}", e)))?;

    // 群边界竖线
    for &bound in group_structure {
        chart
            .draw_series(LineSeries::new(
                [(bound, 0.0), (bound, y_max)],
                RED.mix(0.4).stroke_width(1),
            ))
            .map_err(|e| XsgenError::Other(format!("{:?}", e)))?;
    }
    Ok(())
}
