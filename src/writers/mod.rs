//! # 输出写出模块
//!
//! 把物理引擎的计算结果写成外部程序可消费的格式。格式与输出
//! 文件名在运行控制中成对出现（formats / outfiles）。
//!
//! ## 支持的格式
//! - `brightlite`: 逐核素文本库（每个跟踪核素一个文件）
//! - `csv`: 扁平表格，每行一个 (状态, 核素) 记录
//! - `json`: 完整结果树，含状态表与群结构
//!
//! ## 依赖关系
//! - 被 `config/`（格式名解析）与 `commands/` 使用
//! - 使用 `physics/` 的结果类型
//! - 子模块: brightlite, csvout, json

pub mod brightlite;
pub mod csvout;
pub mod json;

use crate::config::RunControl;
use crate::error::{Result, XsgenError};
use crate::models::ReactorState;
use crate::physics::FamilyResult;

use std::fmt;
use std::path::{Path, PathBuf};

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Brightlite,
    Csv,
    Json,
}

impl OutputFormat {
    /// 由运行控制中的格式名解析
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "brightlite" => Ok(OutputFormat::Brightlite),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(XsgenError::InvalidRunControl(format!(
                "unknown output format '{}' (supported: brightlite, csv, json)",
                name
            ))),
        }
    }

    /// 格式名
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Brightlite => "brightlite",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 按运行控制的 formats/outfiles 配对写出全部结果
///
/// 返回写出的文件与目录路径。
pub fn write_results(
    rc: &RunControl,
    states: &[ReactorState],
    results: &[FamilyResult],
    outdir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(outdir).map_err(|e| XsgenError::FileWriteError {
        path: outdir.display().to_string(),
        source: e,
    })?;

    let mut written = Vec::new();
    for (format, outfile) in rc.formats.iter().zip(&rc.outfiles) {
        match format {
            OutputFormat::Brightlite => {
                let dir = outdir.join(outfile);
                written.extend(brightlite::write(rc, results, &dir)?);
            }
            OutputFormat::Csv => {
                let path = with_extension(outdir.join(outfile), "csv");
                csvout::write(rc, results, &path)?;
                written.push(path);
            }
            OutputFormat::Json => {
                let path = with_extension(outdir.join(outfile), "json");
                json::write(rc, states, results, &path)?;
                written.push(path);
            }
        }
    }
    Ok(written)
}

/// 缺扩展名时补上
fn with_extension(path: PathBuf, ext: &str) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name() {
        assert_eq!(OutputFormat::from_name("brightlite").unwrap(), OutputFormat::Brightlite);
        assert_eq!(OutputFormat::from_name("CSV").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_name("json").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_name("hdf5").is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Brightlite.to_string(), "brightlite");
    }

    #[test]
    fn test_write_results_end_to_end() {
        use crate::config::{validate, OneOrMany, RawRunControl};

        let mut raw = RawRunControl::default();
        raw.fuel_material = Some(
            [("U235".to_string(), 0.04), ("U238".to_string(), 0.84), ("O16".to_string(), 0.12)]
                .into_iter()
                .collect(),
        );
        raw.fuel_density = Some(OneOrMany::One(10.7));
        raw.burn_times = Some(vec![0.0, 50.0]);
        raw.fuel_specific_power = Some(OneOrMany::One(0.04));
        raw.formats = Some(vec!["brightlite".to_string(), "csv".to_string(), "json".to_string()]);
        raw.outfiles = Some(vec!["bl".to_string(), "xs".to_string(), "report".to_string()]);
        let rc = validate::resolve(raw).unwrap();

        let states = rc.axes.states();
        let families = rc.axes.families();
        let engine = crate::physics::engine_for_name("onegroup").unwrap();
        let result = engine.lattice_physics(&families[0], &rc).unwrap();

        let outdir =
            std::env::temp_dir().join(format!("xsgen_writers_test_{}", std::process::id()));
        let written = write_results(&rc, &states, &[result], &outdir).unwrap();

        assert!(outdir.join("bl").join("manifest.txt").exists());
        assert!(outdir.join("bl").join("U235.txt").exists());
        assert!(outdir.join("xs.csv").exists());
        assert!(outdir.join("report.json").exists());
        // 每个跟踪核素一个文件 + k_inf + manifest + csv + json
        assert_eq!(written.len(), rc.track_nucs.len() + 4);

        std::fs::remove_dir_all(&outdir).ok();
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(
            with_extension(PathBuf::from("out"), "csv"),
            PathBuf::from("out.csv")
        );
        assert_eq!(
            with_extension(PathBuf::from("out.dat"), "csv"),
            PathBuf::from("out.dat")
        );
    }
}
