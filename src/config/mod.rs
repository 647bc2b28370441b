//! # 运行控制模块
//!
//! 从 TOML 运行控制文件读取参数，应用命令行覆盖，
//! 经 `validate` 管线解析为可执行的 `RunControl`。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`, `writers/` (输出格式枚举)
//! - 子模块: validate

pub mod validate;

use crate::error::{Result, XsgenError};
use crate::models::{Lattice, Material, PerturbationAxes};
use crate::models::NucId;
use crate::writers::OutputFormat;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 标量或数组（允许微扰的量在 TOML 中两种写法皆可）
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(f64),
    Many(Vec<f64>),
}

impl OneOrMany {
    /// 展开为数组（np.atleast_1d 语义）
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            OneOrMany::One(v) => vec![*v],
            OneOrMany::Many(vs) => vs.clone(),
        }
    }
}

/// 栅格布置的 TOML 表示
#[derive(Debug, Clone, Deserialize)]
pub struct LatticeSpec {
    pub map: String,
    pub shape: [usize; 2],
}

/// 原始运行控制：TOML 文件的直接映射，全部字段可选
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRunControl {
    pub reactor: Option<String>,
    pub solver: Option<String>,
    pub formats: Option<Vec<String>>,
    pub outfiles: Option<Vec<String>>,
    pub is_thermal: Option<bool>,

    /// 能群边界 (MeV)
    pub group_structure: Option<Vec<f64>>,
    pub track_nucs: Option<Vec<String>>,
    pub track_nuc_threshold: Option<f64>,
    pub temperature: Option<f64>,

    /// 燃耗时间点 (天)；或由 burn_time + time_step 生成
    pub burn_times: Option<Vec<f64>>,
    pub burn_time: Option<f64>,
    pub time_step: Option<f64>,

    pub fuel_density: Option<OneOrMany>,
    pub clad_density: Option<OneOrMany>,
    pub cool_density: Option<OneOrMany>,
    pub fuel_cell_radius: Option<OneOrMany>,
    pub void_cell_radius: Option<OneOrMany>,
    pub clad_cell_radius: Option<OneOrMany>,
    pub unit_cell_pitch: Option<OneOrMany>,
    pub unit_cell_height: Option<f64>,
    pub burn_regions: Option<OneOrMany>,
    pub fuel_specific_power: Option<OneOrMany>,

    pub fuel_material: Option<BTreeMap<String, f64>>,
    pub fuel_chemical_form: Option<BTreeMap<String, f64>>,
    pub initial_heavy_metal: Option<BTreeMap<String, f64>>,
    pub clad_material: Option<BTreeMap<String, f64>>,
    pub cool_material: Option<BTreeMap<String, f64>>,

    pub lattice: Option<LatticeSpec>,

    /// 蒙特卡罗引擎参数；内建确定论引擎读取但不使用
    pub k_cycles: Option<u32>,
    pub k_cycles_skip: Option<u32>,
    pub k_particles: Option<u32>,

    /// 其余键（捕获 initial_* 微扰键）
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl RawRunControl {
    /// 从 TOML 文件读取
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(XsgenError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| XsgenError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| XsgenError::RunControlParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// 已解析的运行控制：所有默认值已填充，所有输入已校验
#[derive(Debug, Clone)]
pub struct RunControl {
    pub reactor: String,
    pub solver: String,
    pub formats: Vec<OutputFormat>,
    pub outfiles: Vec<String>,
    pub is_thermal: bool,

    /// 能群边界 (MeV)，降序
    pub group_structure: Vec<f64>,
    /// 跟踪核素（已按半衰期阈值筛选并排序）
    pub track_nucs: Vec<NucId>,
    /// 燃料温度 (K)
    pub temperature: f64,
    pub unit_cell_height: f64,

    pub fuel_material: Material,
    pub clad_material: Material,
    pub cool_material: Material,
    pub lattice: Lattice,

    /// 微扰参数轴（burn_times 在内）
    pub axes: PerturbationAxes,

    pub k_cycles: u32,
    pub k_cycles_skip: u32,
    pub k_particles: u32,
}

impl RunControl {
    /// 读取 + 解析一个运行控制文件
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = RawRunControl::load(path)?;
        validate::resolve(raw)
    }
}
