//! # 物理引擎模块
//!
//! 定义物理引擎插件接口与计算结果类型。引擎以名称注册，
//! 运行控制的 `solver` 键选择引擎；每个引擎对一个微扰族
//! 做一次完整的燃耗计算，输出各时间点的截面、k∞ 与成分。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `writers/` 使用
//! - 使用 `config/`, `models/`
//! - 子模块: spectrum, collapse, depletion, infinite, onegroup

pub mod collapse;
pub mod depletion;
pub mod infinite;
pub mod onegroup;
pub mod spectrum;

use crate::config::RunControl;
use crate::error::{Result, XsgenError};
use crate::models::{NucId, StateFamily};

use serde::Serialize;

/// 单个核素在一个燃耗步的截面与存量
#[derive(Debug, Clone, Serialize)]
pub struct NuclideXs {
    /// 核素 ID (zzzaaam)
    pub nuc: NucId,
    /// 核素名（如 U235）
    pub name: String,
    /// 多群俘获截面 (barn)，高能群在前
    pub sigma_gamma: Vec<f64>,
    /// 多群裂变截面 (barn)
    pub sigma_f: Vec<f64>,
    /// 单群有效俘获截面 (barn)
    pub sigma_gamma_1g: f64,
    /// 单群有效裂变截面 (barn)
    pub sigma_f_1g: f64,
    /// 存量 (kg/kg IHM)
    pub mass: f64,
}

/// 一个燃耗步的完整结果
#[derive(Debug, Clone, Serialize)]
pub struct BurnupStep {
    /// 对应的状态编号
    pub state_index: usize,
    /// 燃耗时间 (天)
    pub time_days: f64,
    /// 累积燃耗 (MWd/kgIHM)
    pub burnup_mwd_kg: f64,
    /// 无限介质增殖因子
    pub k_inf: f64,
    /// 归一化通量 (n/cm²·s)
    pub flux: f64,
    /// 各能群通量份额
    pub group_flux: Vec<f64>,
    /// 各跟踪核素的截面与存量
    pub xs: Vec<NuclideXs>,
}

/// 一个微扰族的计算结果
#[derive(Debug, Clone, Serialize)]
pub struct FamilyResult {
    /// 族编号
    pub family_index: usize,
    /// 各时间点结果，与族的 burn_times 同序
    pub steps: Vec<BurnupStep>,
}

/// 物理引擎接口
///
/// 实现者对一个微扰族完成燃耗推进并在每个时间点
/// 归并截面、计算 k∞。
pub trait PhysicsEngine: Send + Sync + std::fmt::Debug {
    /// 引擎注册名
    fn name(&self) -> &'static str;

    /// 一行描述
    fn description(&self) -> &'static str;

    /// 对一个微扰族执行栅格物理计算
    fn lattice_physics(&self, family: &StateFamily, rc: &RunControl) -> Result<FamilyResult>;
}

/// 内建引擎名称清单
pub const ENGINE_NAMES: &[&str] = &["spectrum", "onegroup"];

/// 按名称取引擎实例
pub fn engine_for_name(name: &str) -> Result<Box<dyn PhysicsEngine>> {
    match name {
        "spectrum" => Ok(Box::new(infinite::SpectrumEngine)),
        "onegroup" => Ok(Box::new(onegroup::OneGroupEngine)),
        _ => Err(XsgenError::UnknownEngine {
            name: name.to_string(),
            available: ENGINE_NAMES.join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_registry() {
        for name in ENGINE_NAMES {
            let engine = engine_for_name(name).unwrap();
            assert_eq!(engine.name(), *name);
            assert!(!engine.description().is_empty());
        }
    }

    #[test]
    fn test_unknown_engine() {
        let err = engine_for_name("mcnp").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("mcnp"));
        assert!(msg.contains("spectrum"));
    }
}
