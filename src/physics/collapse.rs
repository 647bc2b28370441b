//! # 多群截面归并
//!
//! 点截面模型（1/v 热区 + 共振积分超热区 + 快区常数）按能谱
//! 权重归并为多群截面与单群有效截面。
//!
//! ## 算法概述
//! 1. σ(E) 三段式重构：热区 σ_th·√(E₀/E)，超热区 RI/ln(E₂/E₁)，快区 σ_fast
//! 2. 群内通量加权：σ_g = ∫σφdE / ∫φdE
//! 3. 单群有效截面在全能量范围上归并，供燃耗与 k∞ 使用
//!
//! ## 依赖关系
//! - 被引擎实现使用
//! - 使用 `physics/spectrum.rs`, `models/data.rs`

use super::spectrum::{
    GroupStructure, Spectrum, ENERGY_MAX_MEV, ENERGY_MIN_MEV, EPITHERMAL_HIGH_MEV,
    EPITHERMAL_LOW_MEV,
};
use crate::models::data::NuclideData;

/// 热中子参考能量 0.0253 eV (MeV)
const E_THERMAL_MEV: f64 = 0.0253e-6;

/// 单群有效截面 (barn)
#[derive(Debug, Clone, Copy, Default)]
pub struct OneGroupXs {
    pub sigma_gamma: f64,
    pub sigma_f: f64,
}

impl OneGroupXs {
    /// 吸收截面 = 俘获 + 裂变
    pub fn sigma_a(&self) -> f64 {
        self.sigma_gamma + self.sigma_f
    }
}

/// 点俘获截面重构 (barn)
pub fn sigma_gamma_at(data: &NuclideData, e_mev: f64) -> f64 {
    piecewise(e_mev, data.sigma_gamma_th, data.ri_gamma, data.sigma_gamma_fast)
}

/// 点裂变截面重构 (barn)
pub fn sigma_f_at(data: &NuclideData, e_mev: f64) -> f64 {
    piecewise(e_mev, data.sigma_f_th, data.ri_f, data.sigma_f_fast)
}

/// 三段式点截面
fn piecewise(e_mev: f64, sigma_th: f64, ri: f64, sigma_fast: f64) -> f64 {
    if e_mev < EPITHERMAL_LOW_MEV {
        // 1/v 区
        sigma_th * (E_THERMAL_MEV / e_mev).sqrt()
    } else if e_mev < EPITHERMAL_HIGH_MEV {
        // 共振积分摊平到每单位勒让度
        ri / (EPITHERMAL_HIGH_MEV / EPITHERMAL_LOW_MEV).ln()
    } else {
        sigma_fast
    }
}

/// 群内通量加权截面 (barn)
fn collapse_range<F>(spectrum: &Spectrum, e_lo: f64, e_hi: f64, sigma: F) -> f64
where
    F: Fn(f64) -> f64 + Copy,
{
    let numer = spectrum.integrate(e_lo, e_hi, sigma);
    let denom = spectrum.integrate(e_lo, e_hi, |_| 1.0);
    if denom > 0.0 {
        numer / denom
    } else {
        0.0
    }
}

/// 多群归并：每群的 (σγ, σf)
pub fn collapse_groups(
    data: &NuclideData,
    spectrum: &Spectrum,
    groups: &GroupStructure,
) -> (Vec<f64>, Vec<f64>) {
    let mut gammas = Vec::with_capacity(groups.n_groups());
    let mut fissions = Vec::with_capacity(groups.n_groups());
    for g in 0..groups.n_groups() {
        let (hi, lo) = groups.bounds(g);
        gammas.push(collapse_range(spectrum, lo, hi, |e| sigma_gamma_at(data, e)));
        fissions.push(collapse_range(spectrum, lo, hi, |e| sigma_f_at(data, e)));
    }
    (gammas, fissions)
}

/// 单群归并：全能量范围有效截面
pub fn collapse_one_group(data: &NuclideData, spectrum: &Spectrum) -> OneGroupXs {
    OneGroupXs {
        sigma_gamma: collapse_range(spectrum, ENERGY_MIN_MEV, ENERGY_MAX_MEV, |e| {
            sigma_gamma_at(data, e)
        }),
        sigma_f: collapse_range(spectrum, ENERGY_MIN_MEV, ENERGY_MAX_MEV, |e| {
            sigma_f_at(data, e)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::data;
    use crate::physics::spectrum::GroupStructure;

    #[test]
    fn test_one_over_v_below_cutoff() {
        let u235 = data::lookup(922350).unwrap();
        // 在参考能量处应还原热截面
        let s = sigma_gamma_at(u235, E_THERMAL_MEV);
        assert!((s - u235.sigma_gamma_th).abs() < 1e-9);
        // 更低能量截面更大
        assert!(sigma_gamma_at(u235, E_THERMAL_MEV / 4.0) > s);
    }

    #[test]
    fn test_fast_region_constant() {
        let u238 = data::lookup(922380).unwrap();
        assert_eq!(sigma_f_at(u238, 1.0), u238.sigma_f_fast);
        assert_eq!(sigma_f_at(u238, 10.0), u238.sigma_f_fast);
    }

    #[test]
    fn test_thermal_spectrum_sees_thermal_fission() {
        let u235 = data::lookup(922350).unwrap();
        let thermal = Spectrum::new(600.0, true, 3.0);
        let fast = Spectrum::new(600.0, false, 3.0);
        let xs_th = collapse_one_group(u235, &thermal);
        let xs_fs = collapse_one_group(u235, &fast);
        // 热谱下 U235 有效裂变截面远大于快谱
        assert!(xs_th.sigma_f > 10.0 * xs_fs.sigma_f);
    }

    #[test]
    fn test_collapse_groups_shapes() {
        let u235 = data::lookup(922350).unwrap();
        let spectrum = Spectrum::new(600.0, true, 2.0);
        let gs = GroupStructure::new(vec![10.0, 1.0, 0.1, 0.01]).unwrap();
        let (g, f) = collapse_groups(u235, &spectrum, &gs);
        assert_eq!(g.len(), 3);
        assert_eq!(f.len(), 3);
        assert!(g.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn test_group_xs_ordering_for_u235() {
        // 含热群的结构：最低能群的 U235 裂变截面应最大
        let u235 = data::lookup(922350).unwrap();
        let spectrum = Spectrum::new(600.0, true, 2.0);
        let gs = GroupStructure::new(vec![10.0, 0.1, 1e-6, 1e-9]).unwrap();
        let (_, f) = collapse_groups(u235, &spectrum, &gs);
        assert!(f[2] > f[1]);
        assert!(f[2] > f[0]);
    }

    #[test]
    fn test_one_group_between_extremes() {
        let u235 = data::lookup(922350).unwrap();
        let spectrum = Spectrum::new(600.0, true, 2.0);
        let xs = collapse_one_group(u235, &spectrum);
        assert!(xs.sigma_f > u235.sigma_f_fast);
        assert!(xs.sigma_f < u235.sigma_f_th * 40.0);
        assert!(xs.sigma_a() > xs.sigma_f);
    }
}
