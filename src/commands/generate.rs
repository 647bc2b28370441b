//! # generate 命令实现
//!
//! 完整的截面库生成管线。
//!
//! ## 功能
//! - 读取运行控制并应用命令行覆盖
//! - 展开微扰状态表并按族分组
//! - 并行逐族燃耗计算
//! - 按 formats/outfiles 配对写出截面库
//!
//! ## 依赖关系
//! - 使用 `cli/generate.rs` 定义的参数
//! - 使用 `config/`, `physics/`, `batch/`, `writers/`
//! - 使用 `utils/output.rs`

use crate::batch::BatchRunner;
use crate::cli::generate::GenerateArgs;
use crate::config::{validate, RawRunControl, RunControl};
use crate::error::{Result, XsgenError};
use crate::physics;
use crate::utils::output;
use crate::writers;

use std::fs;
use walkdir::WalkDir;

/// 执行 generate 命令
pub fn execute(args: GenerateArgs) -> Result<()> {
    output::print_header("Generating cross section libraries");

    let rc = load_run_control(&args)?;

    if args.clean {
        clean_output_dir(&args)?;
    }

    let engine = physics::engine_for_name(&rc.solver)?;
    output::print_info(&format!(
        "Engine: {} ({})",
        engine.name(),
        engine.description()
    ));

    let states = rc.axes.states();
    let families = rc.axes.families();
    output::print_info(&format!(
        "{} reactor states in {} perturbation families ({} burn steps each)",
        states.len(),
        families.len(),
        rc.axes.burn_times.len()
    ));

    let batch = BatchRunner::new(args.jobs).run(&families, engine.as_ref(), &rc);

    for (family, reason) in &batch.failures {
        output::print_error(&format!("family {}: {}", family, reason));
    }
    if batch.success() == 0 {
        return Err(XsgenError::EngineError(format!(
            "all {} perturbation families failed",
            batch.total()
        )));
    }
    if batch.failed() > 0 {
        output::print_warning(&format!(
            "{} of {} families failed; writing partial results",
            batch.failed(),
            batch.total()
        ));
    }

    let written = writers::write_results(&rc, &states, &batch.results, &args.output)?;

    output::print_separator();
    output::print_done(&format!(
        "Burned {} families, wrote {} output file(s) to '{}'",
        batch.success(),
        written.len(),
        args.output.display()
    ));
    Ok(())
}

/// 读取运行控制并应用命令行覆盖
fn load_run_control(args: &GenerateArgs) -> Result<RunControl> {
    let mut raw = RawRunControl::load(&args.rc)?;
    if let Some(formats) = &args.formats {
        raw.formats = Some(formats.clone());
        // 覆盖格式时旧的 outfiles 配对不再成立
        if args.outfiles.is_none() {
            raw.outfiles = None;
        }
    }
    if let Some(outfiles) = &args.outfiles {
        raw.outfiles = Some(outfiles.clone());
    }
    if let Some(solver) = &args.solver {
        raw.solver = Some(solver.clone());
    }
    if let Some(is_thermal) = args.is_thermal {
        raw.is_thermal = Some(is_thermal);
    }
    validate::resolve(raw)
}

/// 清理输出目录中上次运行留下的文件
fn clean_output_dir(args: &GenerateArgs) -> Result<()> {
    if !args.output.exists() {
        return Ok(());
    }
    let mut removed = 0usize;
    for entry in WalkDir::new(&args.output)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let result = if entry.file_type().is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };
        if result.is_ok() {
            removed += 1;
        }
    }
    output::print_info(&format!(
        "Cleaned {} entries from '{}'",
        removed,
        args.output.display()
    ));
    Ok(())
}
