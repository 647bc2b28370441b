//! # 单群引擎
//!
//! 简化引擎：不做谱归并，热堆直接取热截面、快堆取快截面，
//! 多群输出取各群几何中点处的点截面。燃耗推进与均匀化 k∞
//! 复用谱引擎的族级循环。
//!
//! 适合快速扫描与回归基准，精度低于 `spectrum` 引擎。
//!
//! ## 依赖关系
//! - 被 `physics/mod.rs` 注册
//! - 使用 `physics/{infinite,collapse}.rs`, `config/`, `models/`

use super::collapse::{self, OneGroupXs};
use super::infinite::{burn_family, CellEnvironment};
use super::{FamilyResult, PhysicsEngine};
use crate::config::RunControl;
use crate::error::Result;
use crate::models::data;
use crate::models::StateFamily;

/// 单群扫描引擎
#[derive(Debug)]
pub struct OneGroupEngine;

impl PhysicsEngine for OneGroupEngine {
    fn name(&self) -> &'static str {
        "onegroup"
    }

    fn description(&self) -> &'static str {
        "single-group scan engine using thermal or fast point cross sections"
    }

    fn lattice_physics(&self, family: &StateFamily, rc: &RunControl) -> Result<FamilyResult> {
        let env = CellEnvironment::build(&family.base, rc)?;

        let mut one_group = Vec::with_capacity(rc.track_nucs.len());
        let mut group_xs = Vec::with_capacity(rc.track_nucs.len());
        for id in &rc.track_nucs {
            let nd = data::require(*id)?;
            one_group.push(if rc.is_thermal {
                OneGroupXs {
                    sigma_gamma: nd.sigma_gamma_th,
                    sigma_f: nd.sigma_f_th,
                }
            } else {
                OneGroupXs {
                    sigma_gamma: nd.sigma_gamma_fast,
                    sigma_f: nd.sigma_f_fast,
                }
            });

            // 群截面取群边界几何中点处的点值
            let mut gammas = Vec::with_capacity(env.groups.n_groups());
            let mut fissions = Vec::with_capacity(env.groups.n_groups());
            for g in 0..env.groups.n_groups() {
                let (hi, lo) = env.groups.bounds(g);
                let mid = (hi * lo).sqrt();
                gammas.push(collapse::sigma_gamma_at(nd, mid));
                fissions.push(collapse::sigma_f_at(nd, mid));
            }
            group_xs.push((gammas, fissions));
        }

        burn_family(family, rc, &env, one_group, group_xs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate, OneOrMany, RawRunControl};

    fn lwr_rc() -> RunControl {
        let mut raw = RawRunControl::default();
        raw.fuel_material = Some(
            [("U235".to_string(), 0.035), ("U238".to_string(), 0.845), ("O16".to_string(), 0.12)]
                .into_iter()
                .collect(),
        );
        raw.fuel_density = Some(OneOrMany::One(10.7));
        raw.burn_times = Some(vec![0.0, 200.0]);
        raw.fuel_specific_power = Some(OneOrMany::One(0.04));
        validate::resolve(raw).unwrap()
    }

    #[test]
    fn test_onegroup_engine_runs() {
        let rc = lwr_rc();
        let fam = &rc.axes.families()[0];
        let result = OneGroupEngine.lattice_physics(fam, &rc).unwrap();
        assert_eq!(result.steps.len(), 2);
        assert!(result.steps[0].k_inf > 0.5);
        assert!(result.steps[1].k_inf < result.steps[0].k_inf);
    }

    #[test]
    fn test_thermal_xs_used_for_thermal_reactor() {
        let rc = lwr_rc();
        let fam = &rc.axes.families()[0];
        let result = OneGroupEngine.lattice_physics(fam, &rc).unwrap();
        let u235 = data::lookup(922350).unwrap();
        let entry = result.steps[0]
            .xs
            .iter()
            .find(|x| x.name == "U235")
            .unwrap();
        assert_eq!(entry.sigma_f_1g, u235.sigma_f_th);
    }
}
