//! # 燃耗求解器
//!
//! 跟踪核素的 Bateman 方程组 dN/dt = A·N：A 由衰变常数与
//! 通量驱动的俘获/裂变/产额项装配，用缩放-平方矩阵指数推进。
//!
//! ## 算法概述
//! 1. 由燃料比功率归一化通量：φ = P / (E_f · Σ N_i σf_i)
//! 2. 装配燃耗矩阵（衰变 + 嬗变 + 裂变产额）
//! 3. N(t+Δt) = exp(A·Δt)·N(t)
//!
//! ## 依赖关系
//! - 被引擎实现使用
//! - 使用 `physics/collapse.rs` 的单群截面
//! - 使用 `models/data.rs` 的燃耗链数据

use super::collapse::OneGroupXs;
use crate::error::{Result, XsgenError};
use crate::models::data::{self, ENERGY_PER_FISSION_MEV, FISSION_YIELDS};
use crate::models::material::{Material, AVOGADRO};
use crate::models::NucId;

/// barn -> cm²
const BARN_TO_CM2: f64 = 1.0e-24;

/// MeV -> J
const MEV_TO_J: f64 = 1.602176634e-13;

/// 跟踪核素清单（确定矩阵的行列次序）
#[derive(Debug, Clone)]
pub struct Inventory {
    /// 核素 ID，排序且去重
    pub nucs: Vec<NucId>,
    /// 各核素原子数 (atoms/kg IHM)
    pub atoms: Vec<f64>,
}

impl Inventory {
    /// 由燃料重金属组成构建初始清单
    ///
    /// `initial_masses` 为微扰质量 (kg/kg IHM)：基准重金属组成
    /// 按 (1 - Σm) 缩放后叠加微扰核素。
    pub fn from_fuel(
        track_nucs: &[NucId],
        fuel: &Material,
        initial_masses: &[(NucId, f64)],
    ) -> Result<Self> {
        let hm = fuel.heavy_metal()?;
        let pert_total: f64 = initial_masses.iter().map(|(_, m)| m).sum();
        if pert_total > 1.0 {
            return Err(XsgenError::InvalidRunControl(
                "initial nuclide perturbations exceed 1.0 kg IHM".to_string(),
            ));
        }

        let mut atoms = vec![0.0; track_nucs.len()];
        for (id, w) in &hm.comp {
            if let Some(slot) = track_nucs.iter().position(|n| n == id) {
                let nd = data::require(*id)?;
                atoms[slot] += (1.0 - pert_total) * w * 1000.0 * AVOGADRO / nd.atomic_mass;
            }
        }
        for (id, mass_kg) in initial_masses {
            let slot = track_nucs.iter().position(|n| n == id).ok_or_else(|| {
                XsgenError::InvalidRunControl(format!(
                    "perturbed nuclide {} is not tracked",
                    crate::models::nuclide::name(*id)
                ))
            })?;
            let nd = data::require(*id)?;
            atoms[slot] += mass_kg * 1000.0 * AVOGADRO / nd.atomic_mass;
        }

        Ok(Inventory {
            nucs: track_nucs.to_vec(),
            atoms,
        })
    }

    /// 各核素质量份额 (kg/kg IHM)
    pub fn mass_fractions(&self) -> Result<Vec<(NucId, f64)>> {
        let mut out = Vec::with_capacity(self.nucs.len());
        for (id, n) in self.nucs.iter().zip(&self.atoms) {
            let nd = data::require(*id)?;
            out.push((*id, n * nd.atomic_mass / AVOGADRO / 1000.0));
        }
        Ok(out)
    }
}

/// 由比功率归一化通量 (n/cm²·s)
///
/// P (MW/kgIHM) = E_f · φ · Σ_i N_i σf_i，解出 φ。
pub fn normalize_flux(
    inventory: &Inventory,
    one_group: &[OneGroupXs],
    specific_power_mw_per_kg: f64,
) -> Result<f64> {
    let fission_xs_total: f64 = inventory
        .atoms
        .iter()
        .zip(one_group)
        .map(|(n, xs)| n * xs.sigma_f * BARN_TO_CM2)
        .sum();

    if fission_xs_total <= 0.0 {
        return Err(XsgenError::EngineError(
            "no fissile material in tracked inventory; cannot normalize flux".to_string(),
        ));
    }

    let fission_rate = specific_power_mw_per_kg * 1.0e6 / (ENERGY_PER_FISSION_MEV * MEV_TO_J);
    Ok(fission_rate / fission_xs_total)
}

/// 装配燃耗矩阵 A (1/s)，行主序 n×n
pub fn build_matrix(inventory: &Inventory, one_group: &[OneGroupXs], flux: f64) -> Result<Vec<f64>> {
    let n = inventory.nucs.len();
    let mut a = vec![0.0; n * n];
    let slot = |id: NucId| inventory.nucs.iter().position(|x| *x == id);

    for (i, id) in inventory.nucs.iter().enumerate() {
        let nd = data::require(*id)?;
        let lambda = data::decay_constant(nd);
        let cap_rate = flux * one_group[i].sigma_gamma * BARN_TO_CM2;
        let fis_rate = flux * one_group[i].sigma_f * BARN_TO_CM2;

        // 移出项：衰变 + 俘获 + 裂变
        a[i * n + i] -= lambda + cap_rate + fis_rate;

        // 衰变子核
        if let Some(child) = nd.decay_child {
            if let Some(j) = slot(child) {
                a[j * n + i] += lambda;
            }
        }
        // 俘获子核
        if let Some(child) = nd.capture_child {
            if let Some(j) = slot(child) {
                a[j * n + i] += cap_rate;
            }
        }
        // 裂变产额
        if fis_rate > 0.0 {
            for (fp, y) in FISSION_YIELDS {
                if let Some(j) = slot(fp) {
                    a[j * n + i] += y * fis_rate;
                }
            }
        }
    }
    Ok(a)
}

/// 推进一个燃耗步：N <- exp(A·Δt)·N
pub fn advance(inventory: &mut Inventory, matrix: &[f64], dt_s: f64) {
    let n = inventory.nucs.len();
    let scaled: Vec<f64> = matrix.iter().map(|v| v * dt_s).collect();
    let e = expm(&scaled, n);
    let mut next = vec![0.0; n];
    for i in 0..n {
        let mut acc = 0.0;
        for j in 0..n {
            acc += e[i * n + j] * inventory.atoms[j];
        }
        // 数值噪声造成的微小负值截到零
        next[i] = acc.max(0.0);
    }
    inventory.atoms = next;
}

/// 缩放-平方矩阵指数（泰勒级数核）
pub fn expm(a: &[f64], n: usize) -> Vec<f64> {
    // 无穷范数决定缩放级数
    let norm = (0..n)
        .map(|i| (0..n).map(|j| a[i * n + j].abs()).sum::<f64>())
        .fold(0.0, f64::max);
    let squarings = if norm > 0.5 {
        (norm / 0.5).log2().ceil().max(0.0) as u32
    } else {
        0
    };
    let scale = 1.0 / (2.0_f64).powi(squarings as i32);

    let scaled: Vec<f64> = a.iter().map(|v| v * scale).collect();

    // 泰勒级数：I + A + A²/2! + ...
    let mut result = identity(n);
    let mut term = identity(n);
    for k in 1..=18 {
        term = mat_mul(&term, &scaled, n);
        let inv_k = 1.0 / k as f64;
        for v in term.iter_mut() {
            *v *= inv_k;
        }
        for (r, t) in result.iter_mut().zip(&term) {
            *r += t;
        }
    }

    // 反复平方还原
    for _ in 0..squarings {
        result = mat_mul(&result, &result, n);
    }
    result
}

fn identity(n: usize) -> Vec<f64> {
    let mut m = vec![0.0; n * n];
    for i in 0..n {
        m[i * n + i] = 1.0;
    }
    m
}

fn mat_mul(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut c = vec![0.0; n * n];
    for i in 0..n {
        for k in 0..n {
            let aik = a[i * n + k];
            if aik == 0.0 {
                continue;
            }
            for j in 0..n {
                c[i * n + j] += aik * b[k * n + j];
            }
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uo2_inventory() -> Inventory {
        let fuel = Material::from_mass_frac(&[(922350, 0.04), (922380, 0.84), (80160, 0.12)])
            .unwrap();
        let track = vec![922350, 922360, 922380, 942390, 541350, 621490];
        Inventory::from_fuel(&track, &fuel, &[]).unwrap()
    }

    fn flat_xs(inv: &Inventory) -> Vec<OneGroupXs> {
        inv.nucs
            .iter()
            .map(|id| {
                let nd = data::lookup(*id).unwrap();
                OneGroupXs {
                    sigma_gamma: nd.sigma_gamma_th * 0.5,
                    sigma_f: nd.sigma_f_th * 0.5,
                }
            })
            .collect()
    }

    #[test]
    fn test_inventory_from_fuel() {
        let inv = uo2_inventory();
        let i235 = inv.nucs.iter().position(|&n| n == 922350).unwrap();
        let i238 = inv.nucs.iter().position(|&n| n == 922380).unwrap();
        assert!(inv.atoms[i235] > 0.0);
        assert!(inv.atoms[i238] > 20.0 * inv.atoms[i235]);
        // 裂变产物初始为零
        let ixe = inv.nucs.iter().position(|&n| n == 541350).unwrap();
        assert_eq!(inv.atoms[ixe], 0.0);
    }

    #[test]
    fn test_initial_mass_perturbation() {
        let fuel = Material::from_mass_frac(&[(922350, 0.04), (922380, 0.96)]).unwrap();
        let track = vec![922350, 922380, 942390];
        let base = Inventory::from_fuel(&track, &fuel, &[]).unwrap();
        let pert = Inventory::from_fuel(&track, &fuel, &[(942390, 0.02)]).unwrap();
        let ipu = track.iter().position(|&n| n == 942390).unwrap();
        assert_eq!(base.atoms[ipu], 0.0);
        assert!(pert.atoms[ipu] > 0.0);
        // 总质量守恒在 1 kg 附近
        let total: f64 = pert
            .mass_fractions()
            .unwrap()
            .iter()
            .map(|(_, m)| m)
            .sum();
        assert!((total - 1.0).abs() < 1e-9, "total mass: {}", total);
    }

    #[test]
    fn test_flux_normalization_scales_with_power() {
        let inv = uo2_inventory();
        let xs = flat_xs(&inv);
        let phi1 = normalize_flux(&inv, &xs, 0.04).unwrap();
        let phi2 = normalize_flux(&inv, &xs, 0.08).unwrap();
        assert!(phi1 > 1.0e12, "flux too low: {}", phi1);
        assert!((phi2 / phi1 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_flux_without_fissile_fails() {
        let fuel = Material::from_mass_frac(&[(922380, 1.0)]).unwrap();
        let track = vec![922380];
        let inv = Inventory::from_fuel(&track, &fuel, &[]).unwrap();
        let xs = vec![OneGroupXs {
            sigma_gamma: 2.0,
            sigma_f: 0.0,
        }];
        assert!(normalize_flux(&inv, &xs, 0.04).is_err());
    }

    #[test]
    fn test_expm_identity_for_zero_matrix() {
        let a = vec![0.0; 9];
        let e = expm(&a, 3);
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!((e[i * 3 + j] - expect).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_expm_scalar_decay() {
        // 1x1 矩阵退化为标量指数
        let a = vec![-2.0];
        let e = expm(&a, 1);
        assert!((e[0] - (-2.0_f64).exp()).abs() < 1e-10);
    }

    #[test]
    fn test_pure_decay_half_life() {
        // 只有衰变项时应还原半衰期
        let xe = data::lookup(541350).unwrap();
        let lambda = data::decay_constant(xe);
        let mut inv = Inventory {
            nucs: vec![541350],
            atoms: vec![1.0e20],
        };
        let a = vec![-lambda];
        advance(&mut inv, &a, xe.half_life_s);
        assert!((inv.atoms[0] / 1.0e20 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_burn_consumes_u235_builds_pu239() {
        let mut inv = uo2_inventory();
        let xs = flat_xs(&inv);
        let flux = normalize_flux(&inv, &xs, 0.04).unwrap();
        let a = build_matrix(&inv, &xs, flux).unwrap();

        let i235 = inv.nucs.iter().position(|&n| n == 922350).unwrap();
        let ipu = inv.nucs.iter().position(|&n| n == 942390).unwrap();
        let ixe = inv.nucs.iter().position(|&n| n == 541350).unwrap();
        let before_235 = inv.atoms[i235];

        advance(&mut inv, &a, 100.0 * 86400.0);

        assert!(inv.atoms[i235] < before_235, "U235 must burn down");
        assert!(inv.atoms[ipu] > 0.0, "Pu239 must build up");
        assert!(inv.atoms[ixe] > 0.0, "Xe135 must be produced");
        assert!(inv.atoms.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_matrix_columns_conserve_or_remove() {
        // 每列之和 <= 0：核子只会被移出或转移（裂变产额数小于 2）
        let inv = uo2_inventory();
        let xs = flat_xs(&inv);
        let a = build_matrix(&inv, &xs, 1.0e14).unwrap();
        let n = inv.nucs.len();
        for j in 0..n {
            let col_sum: f64 = (0..n).map(|i| a[i * n + j]).sum();
            assert!(col_sum <= 1e-20, "column {} gains nucleons: {}", j, col_sum);
        }
    }
}
