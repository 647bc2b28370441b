//! # 内嵌核素数据库
//!
//! LWR 燃耗链相关核素的评价数据：原子质量、半衰期、热中子截面、
//! 共振积分、快群截面、嬗变链接（俘获/衰变子核）与裂变产额。
//!
//! ## 数据约定
//! - 截面单位 barn，热截面为 2200 m/s (0.0253 eV) 值
//! - 半衰期单位秒，稳定核素为 `f64::INFINITY`
//! - 短寿命中间核已并入链中（如 U239/Np239 并入 U238 -> Pu239）
//!
//! ## 依赖关系
//! - 被 `config/validate.rs` 和 `physics/` 使用
//! - 使用 `models/nuclide.rs` 的 ID 约定

use super::nuclide::NucId;
use crate::error::{Result, XsgenError};

/// 一年的秒数（儒略年）
pub const SECONDS_PER_YEAR: f64 = 3.1557e7;

/// 单个核素的评价数据
#[derive(Debug, Clone, Copy)]
pub struct NuclideData {
    /// zzzaaam ID
    pub id: NucId,
    /// 原子质量 (amu)
    pub atomic_mass: f64,
    /// 半衰期 (s)，稳定为无穷
    pub half_life_s: f64,
    /// 热中子俘获/吸收截面 (barn)，(n,α) 等移出反应并入
    pub sigma_gamma_th: f64,
    /// 热中子裂变截面 (barn)
    pub sigma_f_th: f64,
    /// 每次裂变平均中子数 ν
    pub nu: f64,
    /// 俘获共振积分 (barn)
    pub ri_gamma: f64,
    /// 裂变共振积分 (barn)
    pub ri_f: f64,
    /// 快群俘获截面 (barn)
    pub sigma_gamma_fast: f64,
    /// 快群裂变截面 (barn)
    pub sigma_f_fast: f64,
    /// 俘获子核（短寿命中间核已折叠）
    pub capture_child: Option<NucId>,
    /// 衰变子核（仅保留对燃耗有影响的支路）
    pub decay_child: Option<NucId>,
}

/// 裂变产额（每次裂变，累积产额，短寿命前驱核已折叠）
///
/// I135 并入 Xe135，Pm149 并入 Sm149。
pub const FISSION_YIELDS: [(NucId, f64); 6] = [
    (541350, 0.0639), // Xe135
    (621490, 0.0108), // Sm149
    (551330, 0.0670), // Cs133
    (601430, 0.0596), // Nd143
    (430990, 0.0611), // Tc99
    (451030, 0.0310), // Rh103
];

/// 每次裂变释放的可回收能量 (MeV)
pub const ENERGY_PER_FISSION_MEV: f64 = 200.0;

const STABLE: f64 = f64::INFINITY;

/// 评价数据表
///
/// 数值取自常用评价库的圆整值（JEFF/ENDF 量级），按 Z 排序。
static LIBRARY: [NuclideData; 29] = [
    // ── 慢化剂 / 可燃毒物 ──────────────────────────────────────
    NuclideData { id: 10010, atomic_mass: 1.008, half_life_s: STABLE, sigma_gamma_th: 0.332, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 0.149, ri_f: 0.0, sigma_gamma_fast: 4.0e-5, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 50100, atomic_mass: 10.013, half_life_s: STABLE, sigma_gamma_th: 3840.0, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 1722.0, ri_f: 0.0, sigma_gamma_fast: 0.2, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 50110, atomic_mass: 11.009, half_life_s: STABLE, sigma_gamma_th: 0.0055, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 0.0025, ri_f: 0.0, sigma_gamma_fast: 1.0e-4, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 80160, atomic_mass: 15.995, half_life_s: STABLE, sigma_gamma_th: 1.9e-4, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 4.0e-4, ri_f: 0.0, sigma_gamma_fast: 1.0e-4, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    // ── 包壳结构材料 ──────────────────────────────────────────
    NuclideData { id: 240520, atomic_mass: 51.941, half_life_s: STABLE, sigma_gamma_th: 0.76, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 0.48, ri_f: 0.0, sigma_gamma_fast: 0.005, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 260560, atomic_mass: 55.935, half_life_s: STABLE, sigma_gamma_th: 2.59, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 1.36, ri_f: 0.0, sigma_gamma_fast: 0.006, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 280580, atomic_mass: 57.935, half_life_s: STABLE, sigma_gamma_th: 4.6, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 2.1, ri_f: 0.0, sigma_gamma_fast: 0.008, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 400900, atomic_mass: 89.905, half_life_s: STABLE, sigma_gamma_th: 0.011, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 0.17, ri_f: 0.0, sigma_gamma_fast: 0.004, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 400910, atomic_mass: 90.906, half_life_s: STABLE, sigma_gamma_th: 1.24, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 5.2, ri_f: 0.0, sigma_gamma_fast: 0.01, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 400920, atomic_mass: 91.905, half_life_s: STABLE, sigma_gamma_th: 0.22, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 0.63, ri_f: 0.0, sigma_gamma_fast: 0.005, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 400940, atomic_mass: 93.906, half_life_s: STABLE, sigma_gamma_th: 0.0499, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 0.28, ri_f: 0.0, sigma_gamma_fast: 0.005, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 400960, atomic_mass: 95.908, half_life_s: STABLE, sigma_gamma_th: 0.0229, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 5.28, ri_f: 0.0, sigma_gamma_fast: 0.005, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 501200, atomic_mass: 119.902, half_life_s: STABLE, sigma_gamma_th: 0.14, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 1.21, ri_f: 0.0, sigma_gamma_fast: 0.003, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    // ── 裂变产物 ──────────────────────────────────────────────
    NuclideData { id: 430990, atomic_mass: 98.906, half_life_s: 2.11e5 * SECONDS_PER_YEAR, sigma_gamma_th: 20.0, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 340.0, ri_f: 0.0, sigma_gamma_fast: 0.02, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 451030, atomic_mass: 102.906, half_life_s: STABLE, sigma_gamma_th: 145.0, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 1100.0, ri_f: 0.0, sigma_gamma_fast: 0.05, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 541350, atomic_mass: 134.907, half_life_s: 3.29e4, sigma_gamma_th: 2.65e6, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 7600.0, ri_f: 0.0, sigma_gamma_fast: 0.01, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 551330, atomic_mass: 132.905, half_life_s: STABLE, sigma_gamma_th: 29.0, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 400.0, ri_f: 0.0, sigma_gamma_fast: 0.03, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 601430, atomic_mass: 142.910, half_life_s: STABLE, sigma_gamma_th: 325.0, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 130.0, ri_f: 0.0, sigma_gamma_fast: 0.05, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    NuclideData { id: 621490, atomic_mass: 148.917, half_life_s: STABLE, sigma_gamma_th: 40140.0, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 3390.0, ri_f: 0.0, sigma_gamma_fast: 0.1, sigma_f_fast: 0.0, capture_child: None, decay_child: None },
    // ── 锕系核素 ──────────────────────────────────────────────
    NuclideData { id: 922340, atomic_mass: 234.041, half_life_s: 2.455e5 * SECONDS_PER_YEAR, sigma_gamma_th: 100.2, sigma_f_th: 0.067, nu: 2.5, ri_gamma: 660.0, ri_f: 0.6, sigma_gamma_fast: 0.2, sigma_f_fast: 0.3, capture_child: Some(922350), decay_child: None },
    NuclideData { id: 922350, atomic_mass: 235.044, half_life_s: 7.04e8 * SECONDS_PER_YEAR, sigma_gamma_th: 98.8, sigma_f_th: 585.1, nu: 2.437, ri_gamma: 144.0, ri_f: 275.0, sigma_gamma_fast: 0.09, sigma_f_fast: 1.2, capture_child: Some(922360), decay_child: None },
    // U237 β 衰变折叠：U236 俘获直接产出 Np237
    NuclideData { id: 922360, atomic_mass: 236.046, half_life_s: 2.342e7 * SECONDS_PER_YEAR, sigma_gamma_th: 5.13, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 346.0, ri_f: 0.0, sigma_gamma_fast: 0.3, sigma_f_fast: 0.1, capture_child: Some(932370), decay_child: None },
    // U239/Np239 β 衰变折叠：U238 俘获直接产出 Pu239
    NuclideData { id: 922380, atomic_mass: 238.051, half_life_s: 4.468e9 * SECONDS_PER_YEAR, sigma_gamma_th: 2.68, sigma_f_th: 0.0, nu: 2.6, ri_gamma: 277.0, ri_f: 0.0, sigma_gamma_fast: 0.07, sigma_f_fast: 0.095, capture_child: Some(942390), decay_child: None },
    NuclideData { id: 932370, atomic_mass: 237.048, half_life_s: 2.144e6 * SECONDS_PER_YEAR, sigma_gamma_th: 175.9, sigma_f_th: 0.02, nu: 2.6, ri_gamma: 652.0, ri_f: 6.8, sigma_gamma_fast: 0.2, sigma_f_fast: 0.6, capture_child: Some(942380), decay_child: None },
    NuclideData { id: 942380, atomic_mass: 238.050, half_life_s: 87.7 * SECONDS_PER_YEAR, sigma_gamma_th: 540.0, sigma_f_th: 17.9, nu: 2.9, ri_gamma: 164.0, ri_f: 33.0, sigma_gamma_fast: 0.1, sigma_f_fast: 2.0, capture_child: Some(942390), decay_child: Some(922340) },
    NuclideData { id: 942390, atomic_mass: 239.052, half_life_s: 2.411e4 * SECONDS_PER_YEAR, sigma_gamma_th: 269.3, sigma_f_th: 748.1, nu: 2.879, ri_gamma: 200.0, ri_f: 301.0, sigma_gamma_fast: 0.05, sigma_f_fast: 1.8, capture_child: Some(942400), decay_child: None },
    NuclideData { id: 942400, atomic_mass: 240.054, half_life_s: 6561.0 * SECONDS_PER_YEAR, sigma_gamma_th: 289.5, sigma_f_th: 0.056, nu: 3.0, ri_gamma: 8100.0, ri_f: 1.1, sigma_gamma_fast: 0.1, sigma_f_fast: 0.4, capture_child: Some(942410), decay_child: None },
    NuclideData { id: 942410, atomic_mass: 241.057, half_life_s: 14.329 * SECONDS_PER_YEAR, sigma_gamma_th: 362.1, sigma_f_th: 1011.1, nu: 2.939, ri_gamma: 162.0, ri_f: 570.0, sigma_gamma_fast: 0.1, sigma_f_fast: 1.7, capture_child: Some(942420), decay_child: Some(952410) },
    // Pu243 β 衰变折叠：Pu242 俘获直接产出 Am243
    NuclideData { id: 942420, atomic_mass: 242.059, half_life_s: 3.75e5 * SECONDS_PER_YEAR, sigma_gamma_th: 18.5, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 1115.0, ri_f: 0.0, sigma_gamma_fast: 0.1, sigma_f_fast: 0.3, capture_child: Some(952430), decay_child: None },
];

/// 附加锕系核素（Am/Cm），单独列出便于按需裁剪
static LIBRARY_TAIL: [NuclideData; 3] = [
    NuclideData { id: 952410, atomic_mass: 241.057, half_life_s: 432.6 * SECONDS_PER_YEAR, sigma_gamma_th: 684.0, sigma_f_th: 3.2, nu: 3.1, ri_gamma: 1450.0, ri_f: 14.0, sigma_gamma_fast: 0.2, sigma_f_fast: 0.3, capture_child: None, decay_child: Some(932370) },
    // Am244 β 衰变折叠：Am243 俘获直接产出 Cm244
    NuclideData { id: 952430, atomic_mass: 243.061, half_life_s: 7370.0 * SECONDS_PER_YEAR, sigma_gamma_th: 75.1, sigma_f_th: 0.0, nu: 0.0, ri_gamma: 1820.0, ri_f: 0.0, sigma_gamma_fast: 0.2, sigma_f_fast: 0.2, capture_child: Some(962440), decay_child: None },
    NuclideData { id: 962440, atomic_mass: 244.063, half_life_s: 18.1 * SECONDS_PER_YEAR, sigma_gamma_th: 15.2, sigma_f_th: 1.0, nu: 3.2, ri_gamma: 650.0, ri_f: 12.5, sigma_gamma_fast: 0.1, sigma_f_fast: 0.4, capture_child: None, decay_child: Some(942400) },
];

/// 查找核素数据
pub fn lookup(id: NucId) -> Option<&'static NuclideData> {
    LIBRARY
        .iter()
        .chain(LIBRARY_TAIL.iter())
        .find(|n| n.id == id)
}

/// 查找核素数据，不存在时返回错误
pub fn require(id: NucId) -> Result<&'static NuclideData> {
    lookup(id).ok_or_else(|| XsgenError::NuclideNotInLibrary {
        name: super::nuclide::name(id),
    })
}

/// 数据库中的全部核素 ID
pub fn all_ids() -> Vec<NucId> {
    LIBRARY
        .iter()
        .chain(LIBRARY_TAIL.iter())
        .map(|n| n.id)
        .collect()
}

/// 默认跟踪核素集：锕系 + 显式裂变产物（不含慢化剂/结构材料）
pub fn default_track_nucs() -> Vec<NucId> {
    all_ids()
        .into_iter()
        .filter(|&id| id / 10000 >= 90 || FISSION_YIELDS.iter().any(|(fp, _)| *fp == id))
        .collect()
}

/// 核素的衰变常数 λ = ln2 / t½ (1/s)，稳定核素为 0
pub fn decay_constant(data: &NuclideData) -> f64 {
    if data.half_life_s.is_finite() {
        std::f64::consts::LN_2 / data.half_life_s
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_core_actinides() {
        for id in [922350, 922380, 942390, 942410] {
            let n = lookup(id).expect("core actinide must be in library");
            assert!(n.sigma_f_th >= 0.0);
            assert!(n.atomic_mass > 230.0);
        }
    }

    #[test]
    fn test_require_missing() {
        assert!(require(170350).is_err()); // Cl35 不在库中
    }

    #[test]
    fn test_capture_chain_closed() {
        // 每个俘获子核必须仍在库中
        for id in all_ids() {
            let n = lookup(id).unwrap();
            if let Some(child) = n.capture_child {
                assert!(
                    lookup(child).is_some(),
                    "capture child {} of {} missing from library",
                    child,
                    id
                );
            }
            if let Some(child) = n.decay_child {
                assert!(
                    lookup(child).is_some(),
                    "decay child {} of {} missing from library",
                    child,
                    id
                );
            }
        }
    }

    #[test]
    fn test_fission_yields_in_library() {
        for (fp, y) in FISSION_YIELDS {
            assert!(lookup(fp).is_some(), "yield nuclide {} missing", fp);
            assert!(y > 0.0 && y < 0.1);
        }
    }

    #[test]
    fn test_default_track_set() {
        let nucs = default_track_nucs();
        assert!(nucs.contains(&922350));
        assert!(nucs.contains(&541350)); // Xe135
        assert!(!nucs.contains(&10010)); // H1 不在默认跟踪集
    }

    #[test]
    fn test_decay_constants() {
        let u235 = lookup(922350).unwrap();
        let xe135 = lookup(541350).unwrap();
        assert!(decay_constant(u235) > 0.0);
        assert!(decay_constant(xe135) > decay_constant(u235));
        let h1 = lookup(10010).unwrap();
        assert_eq!(decay_constant(h1), 0.0);
    }
}
