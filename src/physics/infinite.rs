//! # 谱引擎
//!
//! 内建的确定论引擎：无限栅格近似。由栅元几何推导加权能谱，
//! 逐核素归并多群与单群截面，对整个微扰族做一次燃耗推进，
//! 在每个时间点计算均匀化 k∞。
//!
//! ## 算法概述
//! 1. 栅元体积份额 + 组件导向管水孔 -> 慢化比 -> 能谱权重
//! 2. 跟踪核素与背景核素（包壳/冷却剂/燃料中的氧）单群归并
//! 3. 通量按比功率归一，Bateman 矩阵推进到各时间点
//! 4. k∞ = Σ N_i ν_i σf_i / Σ N_i σa_i（全栅元均匀化）
//!
//! ## 依赖关系
//! - 被 `physics/mod.rs` 注册，`physics/onegroup.rs` 复用其均匀化逻辑
//! - 使用 `physics/{spectrum,collapse,depletion}.rs`, `config/`, `models/`

use super::collapse::{self, OneGroupXs};
use super::depletion::{self, Inventory};
use super::spectrum::{GroupStructure, Spectrum};
use super::{BurnupStep, FamilyResult, NuclideXs, PhysicsEngine};
use crate::config::RunControl;
use crate::error::{Result, XsgenError};
use crate::models::data;
use crate::models::{nuclide, NucId, ReactorState, StateFamily, UnitCell};

/// barn·cm 转换：atoms/cm³ -> atoms/(barn·cm)
const PER_BARN_CM: f64 = 1.0e-24;

/// 微扰族的栅元环境：几何、能谱与均匀化权重
pub struct CellEnvironment {
    pub spectrum: Spectrum,
    pub groups: GroupStructure,
    /// 燃料区均匀化权重（体积份额）
    pub fuel_weight: f64,
    /// 包壳区权重
    pub clad_weight: f64,
    /// 冷却剂权重（含导向管水孔）
    pub cool_weight: f64,
    /// 燃料区每 cm³ 的 kg IHM
    pub ihm_per_cm3: f64,
}

impl CellEnvironment {
    /// 由状态与运行控制构造
    pub fn build(state: &ReactorState, rc: &RunControl) -> Result<Self> {
        let cell = UnitCell {
            fuel_cell_radius: state.fuel_cell_radius,
            void_cell_radius: state.void_cell_radius,
            clad_cell_radius: state.clad_cell_radius,
            unit_cell_pitch: state.unit_cell_pitch,
            unit_cell_height: rc.unit_cell_height,
        };
        cell.validate()?;

        let vols = cell.region_volumes();
        let pins = rc.lattice.fuel_pin_count()? as f64;
        let tubes = rc.lattice.guide_tube_count()? as f64;
        if pins <= 0.0 {
            return Err(XsgenError::InvalidRunControl(
                "lattice contains no fuel pins".to_string(),
            ));
        }
        let total = pins + tubes;

        // 导向管位置是整格水，加大有效慢化比
        let fuel_weight = pins * vols.fuel / total;
        let clad_weight = pins * vols.clad / total;
        let cool_weight = (pins * vols.coolant + tubes) / total;
        let mod_ratio = cool_weight / fuel_weight;

        let spectrum = Spectrum::new(rc.temperature, rc.is_thermal, mod_ratio);
        let groups = GroupStructure::new(rc.group_structure.clone())?;

        let hm_frac = rc.fuel_material.heavy_metal_frac();
        if hm_frac <= 0.0 {
            return Err(XsgenError::InvalidMaterial(
                "fuel material contains no heavy metal".to_string(),
            ));
        }
        let ihm_per_cm3 = state.fuel_density * hm_frac / 1000.0;

        Ok(CellEnvironment {
            spectrum,
            groups,
            fuel_weight,
            clad_weight,
            cool_weight,
            ihm_per_cm3,
        })
    }
}

/// 均匀化 k∞
///
/// 跟踪核素取燃耗后的存量；燃料中的非跟踪成分（氧等）、
/// 包壳与冷却剂作为固定背景吸收体。
pub(super) fn k_infinity(
    env: &CellEnvironment,
    state: &ReactorState,
    rc: &RunControl,
    inventory: &Inventory,
    one_group: &[OneGroupXs],
) -> Result<f64> {
    let mut production = 0.0;
    let mut absorption = 0.0;

    // 燃料区：跟踪核素
    for ((id, n_per_kg), xs) in inventory.nucs.iter().zip(&inventory.atoms).zip(one_group) {
        let nd = data::require(*id)?;
        let n = n_per_kg * env.ihm_per_cm3 * PER_BARN_CM * env.fuel_weight;
        production += n * nd.nu * xs.sigma_f;
        absorption += n * xs.sigma_a();
    }

    // 背景区：吸收为主
    let mut background = |nucs: Vec<(NucId, f64)>, weight: f64| -> Result<()> {
        for (id, n) in nucs {
            if inventory.nucs.contains(&id) {
                continue;
            }
            let nd = data::require(id)?;
            let xs = collapse::collapse_one_group(nd, &env.spectrum);
            let n = n * weight;
            production += n * nd.nu * xs.sigma_f;
            absorption += n * xs.sigma_a();
        }
        Ok(())
    };
    background(
        rc.fuel_material.number_densities(state.fuel_density)?,
        env.fuel_weight,
    )?;
    background(
        rc.clad_material.number_densities(state.clad_density)?,
        env.clad_weight,
    )?;
    background(
        rc.cool_material.number_densities(state.cool_density)?,
        env.cool_weight,
    )?;

    if absorption <= 0.0 {
        return Err(XsgenError::EngineError(
            "homogenized cell has no absorption".to_string(),
        ));
    }
    Ok(production / absorption)
}

/// 装配一个时间点的结果记录
pub(super) fn record_step(
    env: &CellEnvironment,
    state_index: usize,
    time_days: f64,
    burnup: f64,
    k_inf: f64,
    flux: f64,
    inventory: &Inventory,
    one_group: &[OneGroupXs],
    group_xs: &[(Vec<f64>, Vec<f64>)],
) -> Result<BurnupStep> {
    let masses = inventory.mass_fractions()?;
    let mut xs = Vec::with_capacity(inventory.nucs.len());
    for (i, id) in inventory.nucs.iter().enumerate() {
        xs.push(NuclideXs {
            nuc: *id,
            name: nuclide::name(*id),
            sigma_gamma: group_xs[i].0.clone(),
            sigma_f: group_xs[i].1.clone(),
            sigma_gamma_1g: one_group[i].sigma_gamma,
            sigma_f_1g: one_group[i].sigma_f,
            mass: masses[i].1,
        });
    }
    Ok(BurnupStep {
        state_index,
        time_days,
        burnup_mwd_kg: burnup,
        k_inf,
        flux,
        group_flux: env.spectrum.group_fractions(&env.groups),
        xs,
    })
}

/// 共享的族级燃耗循环
///
/// 截面由调用方提供，谱引擎与单群引擎只在截面来源上不同。
pub(super) fn burn_family(
    family: &StateFamily,
    rc: &RunControl,
    env: &CellEnvironment,
    one_group: Vec<OneGroupXs>,
    group_xs: Vec<(Vec<f64>, Vec<f64>)>,
) -> Result<FamilyResult> {
    let mut inventory = Inventory::from_fuel(
        &rc.track_nucs,
        &rc.fuel_material,
        &family.base.initial_masses,
    )?;
    let power = family.base.fuel_specific_power;

    let mut steps = Vec::with_capacity(family.burn_times.len());
    let mut prev_time = 0.0;
    let mut burnup = 0.0;
    let mut flux = depletion::normalize_flux(&inventory, &one_group, power)?;

    for (k, &t) in family.burn_times.iter().enumerate() {
        if t < prev_time {
            return Err(XsgenError::InvalidRunControl(format!(
                "burn_times must be non-decreasing, got {} after {}",
                t, prev_time
            )));
        }
        let dt_days = t - prev_time;
        if dt_days > 0.0 {
            flux = depletion::normalize_flux(&inventory, &one_group, power)?;
            let matrix = depletion::build_matrix(&inventory, &one_group, flux)?;
            depletion::advance(&mut inventory, &matrix, dt_days * 86400.0);
            burnup += power * dt_days;
        }
        let k_inf = k_infinity(env, &family.base, rc, &inventory, &one_group)?;
        steps.push(record_step(
            env,
            family.state_indices[k],
            t,
            burnup,
            k_inf,
            flux,
            &inventory,
            &one_group,
            &group_xs,
        )?);
        prev_time = t;
    }

    Ok(FamilyResult {
        family_index: family.index,
        steps,
    })
}

/// 加权能谱引擎
#[derive(Debug)]
pub struct SpectrumEngine;

impl PhysicsEngine for SpectrumEngine {
    fn name(&self) -> &'static str {
        "spectrum"
    }

    fn description(&self) -> &'static str {
        "weighted-spectrum infinite-lattice engine with spectral collapse"
    }

    fn lattice_physics(&self, family: &StateFamily, rc: &RunControl) -> Result<FamilyResult> {
        let env = CellEnvironment::build(&family.base, rc)?;

        let mut one_group = Vec::with_capacity(rc.track_nucs.len());
        let mut group_xs = Vec::with_capacity(rc.track_nucs.len());
        for id in &rc.track_nucs {
            let nd = data::require(*id)?;
            one_group.push(collapse::collapse_one_group(nd, &env.spectrum));
            group_xs.push(collapse::collapse_groups(nd, &env.spectrum, &env.groups));
        }

        burn_family(family, rc, &env, one_group, group_xs)
    }
}
