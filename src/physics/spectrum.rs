//! # 中子能谱模型
//!
//! 无限介质加权能谱：热区 Maxwell 分布 + 超热区 1/E 分布 +
//! 快区 Watt 裂变谱，权重由慢化比与堆型（热堆/快堆）决定。
//!
//! ## 依赖关系
//! - 被 `physics/collapse.rs` 和引擎实现使用
//! - 无外部模块依赖

use crate::error::{Result, XsgenError};

/// 玻尔兹曼常数 (MeV/K)
const BOLTZMANN_MEV_PER_K: f64 = 8.617333e-11;

/// 超热区下界 (MeV)，0.625 eV 热截断
pub const EPITHERMAL_LOW_MEV: f64 = 0.625e-6;

/// 超热区上界 / 快区下界 (MeV)
pub const EPITHERMAL_HIGH_MEV: f64 = 0.1;

/// 全能量范围 (MeV)，能谱积分域
pub const ENERGY_MIN_MEV: f64 = 1.0e-11;
pub const ENERGY_MAX_MEV: f64 = 20.0;

/// 每个积分区间的对数网格点数
const QUAD_POINTS: usize = 400;

/// 能群结构：降序能群边界 (MeV)
#[derive(Debug, Clone)]
pub struct GroupStructure {
    /// 边界，降序
    pub boundaries: Vec<f64>,
}

impl GroupStructure {
    /// 由降序边界创建
    pub fn new(boundaries: Vec<f64>) -> Result<Self> {
        if boundaries.len() < 2 {
            return Err(XsgenError::InvalidRunControl(
                "group structure needs at least 2 boundaries".to_string(),
            ));
        }
        Ok(GroupStructure { boundaries })
    }

    /// 能群数
    pub fn n_groups(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// 第 g 群的 (上界, 下界)，g 从 0（最高能群）起
    pub fn bounds(&self, g: usize) -> (f64, f64) {
        (self.boundaries[g], self.boundaries[g + 1])
    }
}

/// 加权中子能谱
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// 热区 Maxwell 温度 (K)
    pub temperature: f64,
    /// 热/超热/快三分量权重，和为 1
    pub w_thermal: f64,
    pub w_epithermal: f64,
    pub w_fast: f64,
}

impl Spectrum {
    /// 由温度、堆型与慢化比构造
    ///
    /// 热堆的热谱权重随慢化剂/燃料体积比增大而增大；
    /// 快堆热谱份额固定为很小的残余值。
    pub fn new(temperature: f64, is_thermal: bool, moderator_fuel_ratio: f64) -> Self {
        if is_thermal {
            let r = moderator_fuel_ratio.max(0.0);
            let w_thermal = (r / (r + 1.5)).clamp(0.05, 0.85);
            let w_fast = 0.3 * (1.0 - w_thermal);
            Spectrum {
                temperature,
                w_thermal,
                w_epithermal: 1.0 - w_thermal - w_fast,
                w_fast,
            }
        } else {
            Spectrum {
                temperature,
                w_thermal: 0.01,
                w_epithermal: 0.39,
                w_fast: 0.60,
            }
        }
    }

    /// 能谱密度 φ(E)（按分量归一后的加权和，单位 1/MeV）
    pub fn phi(&self, e_mev: f64) -> f64 {
        self.w_thermal * self.maxwell(e_mev)
            + self.w_epithermal * one_over_e(e_mev)
            + self.w_fast * watt(e_mev)
    }

    /// 归一化 Maxwell 通量谱：E·e^{-E/kT} / (kT)²
    fn maxwell(&self, e_mev: f64) -> f64 {
        let kt = BOLTZMANN_MEV_PER_K * self.temperature;
        e_mev * (-e_mev / kt).exp() / (kt * kt)
    }

    /// 能谱在区间 [e_lo, e_hi] 上的积分（对数网格梯形法）
    pub fn integrate<F>(&self, e_lo: f64, e_hi: f64, weight: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        log_trapezoid(e_lo.max(ENERGY_MIN_MEV), e_hi.min(ENERGY_MAX_MEV), |e| {
            self.phi(e) * weight(e)
        })
    }

    /// 每群通量份额（归一化到全能量范围）
    pub fn group_fractions(&self, groups: &GroupStructure) -> Vec<f64> {
        let total = self.integrate(ENERGY_MIN_MEV, ENERGY_MAX_MEV, |_| 1.0);
        (0..groups.n_groups())
            .map(|g| {
                let (hi, lo) = groups.bounds(g);
                if total > 0.0 {
                    self.integrate(lo, hi, |_| 1.0) / total
                } else {
                    0.0
                }
            })
            .collect()
    }
}

/// 归一化 1/E 谱，定义在超热区间内
fn one_over_e(e_mev: f64) -> f64 {
    if e_mev < EPITHERMAL_LOW_MEV || e_mev > EPITHERMAL_HIGH_MEV {
        return 0.0;
    }
    let norm = (EPITHERMAL_HIGH_MEV / EPITHERMAL_LOW_MEV).ln();
    1.0 / (e_mev * norm)
}

/// Watt 裂变谱（U235 热裂变参数，近似归一）
fn watt(e_mev: f64) -> f64 {
    if e_mev <= 0.0 {
        return 0.0;
    }
    0.453 * (-e_mev / 0.965).exp() * (2.29 * e_mev).sqrt().sinh()
}

/// 对数网格梯形积分
fn log_trapezoid<F>(e_lo: f64, e_hi: f64, f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    if e_hi <= e_lo {
        return 0.0;
    }
    let ln_lo = e_lo.ln();
    let ln_hi = e_hi.ln();
    let du = (ln_hi - ln_lo) / (QUAD_POINTS - 1) as f64;

    let mut sum = 0.0;
    let mut prev = f(e_lo) * e_lo; // dE = E·du 换元
    for i in 1..QUAD_POINTS {
        let e = (ln_lo + i as f64 * du).exp();
        let cur = f(e) * e;
        sum += 0.5 * (prev + cur) * du;
        prev = cur;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_structure() {
        let gs = GroupStructure::new(vec![10.0, 1.0, 0.1, 0.01]).unwrap();
        assert_eq!(gs.n_groups(), 3);
        assert_eq!(gs.bounds(0), (10.0, 1.0));
        assert_eq!(gs.bounds(2), (0.1, 0.01));
    }

    #[test]
    fn test_group_structure_too_short() {
        assert!(GroupStructure::new(vec![1.0]).is_err());
    }

    #[test]
    fn test_spectrum_weights_sum_to_one() {
        for is_thermal in [true, false] {
            let s = Spectrum::new(600.0, is_thermal, 2.0);
            let total = s.w_thermal + s.w_epithermal + s.w_fast;
            assert!((total - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_thermal_weight_grows_with_moderation() {
        let tight = Spectrum::new(600.0, true, 1.0);
        let open = Spectrum::new(600.0, true, 4.0);
        assert!(open.w_thermal > tight.w_thermal);
    }

    #[test]
    fn test_spectrum_normalization() {
        let s = Spectrum::new(600.0, true, 2.0);
        let total = s.integrate(ENERGY_MIN_MEV, ENERGY_MAX_MEV, |_| 1.0);
        // 三个分量各自近似归一，加权和应接近 1
        assert!((total - 1.0).abs() < 0.05, "total integral: {}", total);
    }

    #[test]
    fn test_group_fractions_sum_to_one() {
        let s = Spectrum::new(600.0, true, 2.0);
        let gs = GroupStructure::new(vec![10.0, 1.0, 0.1, 0.01, 1e-9]).unwrap();
        let fracs = s.group_fractions(&gs);
        assert_eq!(fracs.len(), 4);
        let total: f64 = fracs.iter().sum();
        assert!((total - 1.0).abs() < 0.05, "group sum: {}", total);
    }

    #[test]
    fn test_fast_reactor_spectrum_harder() {
        let thermal = Spectrum::new(600.0, true, 2.0);
        let fast = Spectrum::new(600.0, false, 2.0);
        let gs = GroupStructure::new(vec![10.0, 0.1, 1e-9]).unwrap();
        let ft = thermal.group_fractions(&gs);
        let ff = fast.group_fractions(&gs);
        // 快堆的高能群份额更大
        assert!(ff[0] > ft[0]);
    }
}
