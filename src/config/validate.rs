//! # 运行控制校验管线
//!
//! 将 `RawRunControl` 解析为 `RunControl`：填充默认值、生成
//! 燃耗时间、筛选跟踪核素、装配材料与微扰轴。
//!
//! ## 校验步骤
//! 1. 燃耗时间（显式列表 / burn_time + time_step / 默认序列）
//! 2. 能群结构（降序重排、单调性）
//! 3. 跟踪核素（名称解析、半衰期阈值筛选）
//! 4. 初始核素微扰（initial_* 键、1.0 kg IHM 上限）
//! 5. 材料（燃料/包壳/冷却剂默认组成）
//! 6. 栅格与输出文件配对
//!
//! ## 依赖关系
//! - 被 `config/mod.rs` 调用
//! - 使用 `models/`, `writers/`, `utils/output.rs`
//! - 使用 `regex` 匹配 initial_* 微扰键

use super::{OneOrMany, RawRunControl, RunControl};
use crate::error::{Result, XsgenError};
use crate::models::{data, material::Material, nuclide, Lattice, NucId, PerturbationAxes};
use crate::utils::output;
use crate::writers::OutputFormat;

use regex::Regex;
use std::collections::BTreeMap;

/// 初始核素微扰键模式（与原始运行控制一致）
const INITIAL_NUC_PATTERN: &str = r"^initial_([A-Za-z]{0,2}\d{1,7}[Mm]?)$";

/// 解析原始运行控制
pub fn resolve(raw: RawRunControl) -> Result<RunControl> {
    let burn_times = ensure_burn_times(&raw);
    let group_structure = ensure_group_structure(&raw)?;
    let track_nucs = ensure_track_nucs(&raw, &burn_times)?;
    let initial_nucs = ensure_initial_nucs(&raw)?;
    let (fuel_material, clad_material, cool_material) = ensure_materials(&raw)?;
    let lattice = ensure_lattice(&raw)?;
    let (formats, outfiles) = ensure_outfiles(&raw)?;

    let axes = PerturbationAxes {
        fuel_density: to_axis(&raw.fuel_density, 19.1),
        clad_density: to_axis(&raw.clad_density, 6.56),
        cool_density: to_axis(&raw.cool_density, 1.0),
        fuel_cell_radius: to_axis(&raw.fuel_cell_radius, 0.7),
        void_cell_radius: to_axis(&raw.void_cell_radius, 0.8),
        clad_cell_radius: to_axis(&raw.clad_cell_radius, 0.9),
        // 2.0 cm 保证默认包壳外径 (2x0.9) 放得进方形栅元
        unit_cell_pitch: to_axis(&raw.unit_cell_pitch, 2.0),
        burn_regions: to_axis(&raw.burn_regions, 1.0)
            .into_iter()
            .map(|v| v.max(1.0) as u32)
            .collect(),
        fuel_specific_power: to_axis(&raw.fuel_specific_power, 1.0),
        initial_nucs,
        burn_times,
    };

    ensure_axis_positivity(&axes)?;

    Ok(RunControl {
        reactor: raw.reactor.unwrap_or_else(|| "lwr".to_string()),
        solver: raw.solver.unwrap_or_else(|| "spectrum".to_string()),
        formats,
        outfiles,
        is_thermal: raw.is_thermal.unwrap_or(true),
        group_structure,
        track_nucs,
        temperature: raw.temperature.unwrap_or(600.0),
        unit_cell_height: raw.unit_cell_height.unwrap_or(2.0),
        fuel_material,
        clad_material,
        cool_material,
        lattice,
        axes,
        k_cycles: raw.k_cycles.unwrap_or(20),
        k_cycles_skip: raw.k_cycles_skip.unwrap_or(10),
        k_particles: raw.k_particles.unwrap_or(1000),
    })
}

/// 展开可微扰量，缺省时用默认值
fn to_axis(v: &Option<OneOrMany>, default: f64) -> Vec<f64> {
    v.as_ref().map(|x| x.to_vec()).unwrap_or_else(|| vec![default])
}

/// 半开区间等差序列（numpy.arange 语义）
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    let mut v = start;
    let mut i = 0u64;
    while v < stop {
        out.push(v);
        i += 1;
        v = start + i as f64 * step;
    }
    out
}

/// 燃耗时间：显式列表优先，其次 burn_time + time_step，最后默认
fn ensure_burn_times(raw: &RawRunControl) -> Vec<f64> {
    if let Some(bt) = &raw.burn_times {
        return bt.clone();
    }
    if let (Some(total), Some(step)) = (raw.burn_time, raw.time_step) {
        return arange(0.0, total + step / 10.0, step);
    }
    output::print_warning("No burn times specified, defaulting to 0..1000 days step 100");
    arange(0.0, 1000.0, 100.0)
}

/// 能群结构：正值、降序、严格单调
fn ensure_group_structure(raw: &RawRunControl) -> Result<Vec<f64>> {
    let mut gs = raw
        .group_structure
        .clone()
        .unwrap_or_else(|| vec![10.0, 1.0, 0.1, 0.01]);

    if gs.len() < 2 {
        return Err(XsgenError::InvalidRunControl(
            "group_structure needs at least 2 boundaries".to_string(),
        ));
    }
    if gs.iter().any(|&e| e <= 0.0 || !e.is_finite()) {
        return Err(XsgenError::InvalidRunControl(
            "group_structure boundaries must be positive".to_string(),
        ));
    }
    // 升序输入时翻转为降序
    if gs[0] < gs[gs.len() - 1] {
        gs.reverse();
    }
    if gs.windows(2).any(|w| w[0] <= w[1]) {
        return Err(XsgenError::InvalidRunControl(
            "group_structure boundaries must be strictly monotonic".to_string(),
        ));
    }
    Ok(gs)
}

/// 跟踪核素：解析名称，按半衰期阈值筛掉瞬态核素
///
/// 阈值语义：半衰期必须大于 `track_nuc_threshold` 倍的平均燃耗
/// 步长（秒），否则该核素视为瞬态并从跟踪集中剔除。
fn ensure_track_nucs(raw: &RawRunControl, burn_times: &[f64]) -> Result<Vec<NucId>> {
    let mut nucs: Vec<NucId> = match &raw.track_nucs {
        Some(names) => {
            let mut out = Vec::with_capacity(names.len());
            for name in names {
                let id = nuclide::id_from_name(name)?;
                data::require(id)?;
                out.push(id);
            }
            out
        }
        None => data::default_track_nucs(),
    };

    let threshold = raw.track_nuc_threshold.unwrap_or(1e-4);
    let avg_step_days = if burn_times.len() >= 2 {
        let diffs: f64 = burn_times.windows(2).map(|w| w[1] - w[0]).sum();
        diffs / (burn_times.len() - 1) as f64
    } else {
        100.0
    };
    let min_half_life = threshold * avg_step_days * 86400.0;

    nucs.retain(|&id| {
        data::lookup(id)
            .map(|n| n.half_life_s > min_half_life)
            .unwrap_or(false)
    });
    nucs.sort_unstable();
    nucs.dedup();

    if nucs.is_empty() {
        return Err(XsgenError::InvalidRunControl(
            "no tracked nuclides survive the half-life threshold".to_string(),
        ));
    }
    Ok(nucs)
}

/// 初始核素微扰：收集 initial_* 键，检查 1.0 kg IHM 上限
fn ensure_initial_nucs(raw: &RawRunControl) -> Result<Vec<(NucId, Vec<f64>)>> {
    let re = Regex::new(INITIAL_NUC_PATTERN).expect("static pattern");
    let mut entries: BTreeMap<String, (NucId, Vec<f64>)> = BTreeMap::new();

    for (key, value) in &raw.extra {
        let caps = match re.captures(key) {
            Some(c) => c,
            None => continue,
        };
        let nuc_name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let id = nuclide::id_from_name(nuc_name)?;
        data::require(id)?;

        let values = toml_to_f64_vec(value).ok_or_else(|| {
            XsgenError::InvalidRunControl(format!(
                "'{}' must be a number or an array of numbers",
                key
            ))
        })?;
        if values.is_empty() || values.iter().any(|v| *v < 0.0) {
            return Err(XsgenError::InvalidRunControl(format!(
                "'{}' masses must be non-negative and non-empty",
                key
            )));
        }
        entries.insert(key.clone(), (id, values));
    }

    // 各键最大质量之和不得超过 1.0 kg IHM
    let max_mass: f64 = entries
        .values()
        .map(|(_, vs)| vs.iter().cloned().fold(0.0, f64::max))
        .sum();
    if max_mass > 1.0 {
        return Err(XsgenError::InvalidRunControl(
            "the maximum mass of initial heavy metal perturbations exceeds 1.0 kg".to_string(),
        ));
    }

    Ok(entries.into_values().collect())
}

/// toml::Value -> 数组（标量视为单元素数组）
fn toml_to_f64_vec(value: &toml::Value) -> Option<Vec<f64>> {
    match value {
        toml::Value::Float(f) => Some(vec![*f]),
        toml::Value::Integer(i) => Some(vec![*i as f64]),
        toml::Value::Array(arr) => arr
            .iter()
            .map(|v| match v {
                toml::Value::Float(f) => Some(*f),
                toml::Value::Integer(i) => Some(*i as f64),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// 材料装配：燃料必须显式给出，包壳/冷却剂有默认组成
fn ensure_materials(raw: &RawRunControl) -> Result<(Material, Material, Material)> {
    let fuel = if let Some(comp) = &raw.fuel_material {
        Material::from_names(comp)?
    } else if let (Some(form), Some(ihm)) = (&raw.fuel_chemical_form, &raw.initial_heavy_metal) {
        fuel_from_chemical_form(form, ihm)?
    } else {
        return Err(XsgenError::InvalidRunControl(
            "please specify a fuel (fuel_material, or fuel_chemical_form + initial_heavy_metal)"
                .to_string(),
        ));
    };
    if fuel.heavy_metal_frac() <= 0.0 {
        return Err(XsgenError::InvalidMaterial(
            "fuel material contains no heavy metal".to_string(),
        ));
    }

    let clad = match &raw.clad_material {
        Some(comp) => Material::from_names(comp)?,
        None => default_clad()?,
    };
    let cool = match &raw.cool_material {
        Some(comp) => Material::from_names(comp)?,
        None => default_coolant()?,
    };
    Ok((fuel, clad, cool))
}

/// 由化学式 + 重金属组成装配燃料（"IHM" 键按 IHM 原子份额展开）
fn fuel_from_chemical_form(
    form: &BTreeMap<String, f64>,
    ihm: &BTreeMap<String, f64>,
) -> Result<Material> {
    let ihm_mat = Material::from_names(ihm)?;

    // IHM 的原子份额：a_i = (w_i / M_i) / Σ (w_j / M_j)
    let mut ihm_atoms: Vec<(NucId, f64)> = Vec::new();
    let mut total = 0.0;
    for (id, w) in &ihm_mat.comp {
        let nd = data::require(*id)?;
        let a = w / nd.atomic_mass;
        ihm_atoms.push((*id, a));
        total += a;
    }
    for (_, a) in ihm_atoms.iter_mut() {
        *a /= total;
    }

    let mut atom_pairs: Vec<(NucId, f64)> = Vec::new();
    for (key, frac) in form {
        if key.eq_ignore_ascii_case("IHM") {
            for (id, a) in &ihm_atoms {
                atom_pairs.push((*id, a * frac));
            }
        } else {
            atom_pairs.push((nuclide::id_from_name(key)?, *frac));
        }
    }
    Material::from_atom_frac(&atom_pairs)
}

/// 默认包壳：锆合金（各元素折叠到库中的代表同位素）
fn default_clad() -> Result<Material> {
    Material::from_mass_frac(&[
        // 天然锆
        (400900, 0.98135 * 0.5145),
        (400910, 0.98135 * 0.1122),
        (400920, 0.98135 * 0.1715),
        (400940, 0.98135 * 0.1738),
        (400960, 0.98135 * 0.0280),
        // 合金元素（折叠到主同位素）
        (240520, 0.00100),
        (260560, 0.00135),
        (280580, 0.00055),
        (501200, 0.01450),
        (80160, 0.00125),
    ])
}

/// 默认冷却剂：550 ppm 含硼轻水
fn default_coolant() -> Result<Material> {
    let mw = 2.0 * 1.0 + 16.0 + 0.199 * 550.0e-6 * 10.0 + 0.801 * 550.0e-6 * 11.0;
    Material::from_mass_frac(&[
        (10010, 2.0 * 1.0 / mw),
        (80160, 16.0 / mw),
        (50100, 0.199 * 550.0e-6 * 10.0 / mw),
        (50110, 0.801 * 550.0e-6 * 11.0 / mw),
    ])
}

/// 栅格布置：缺省为 17x17 LWR 组件，给出时校验形状
fn ensure_lattice(raw: &RawRunControl) -> Result<Lattice> {
    let lattice = match &raw.lattice {
        Some(spec) => Lattice {
            map: spec.map.clone(),
            shape: (spec.shape[0], spec.shape[1]),
        },
        None => Lattice::default_lwr(),
    };
    lattice.cells()?;
    Ok(lattice)
}

/// 输出格式与输出文件配对
fn ensure_outfiles(raw: &RawRunControl) -> Result<(Vec<OutputFormat>, Vec<String>)> {
    let format_names = raw
        .formats
        .clone()
        .unwrap_or_else(|| vec!["brightlite".to_string()]);
    let mut formats = Vec::with_capacity(format_names.len());
    for name in &format_names {
        formats.push(OutputFormat::from_name(name)?);
    }

    let outfiles = match &raw.outfiles {
        Some(files) => {
            if files.len() > formats.len() {
                return Err(XsgenError::InvalidRunControl(
                    "more outfiles defined than formats".to_string(),
                ));
            }
            if files.len() < formats.len() {
                return Err(XsgenError::InvalidRunControl(
                    "more formats defined than outfiles".to_string(),
                ));
            }
            files.clone()
        }
        None => {
            output::print_warning("No outfiles specified, defaulting to format names...");
            format_names
        }
    };
    Ok((formats, outfiles))
}

/// 微扰轴取值必须为正
fn ensure_axis_positivity(axes: &PerturbationAxes) -> Result<()> {
    let checks: [(&str, &Vec<f64>); 8] = [
        ("fuel_density", &axes.fuel_density),
        ("clad_density", &axes.clad_density),
        ("cool_density", &axes.cool_density),
        ("fuel_cell_radius", &axes.fuel_cell_radius),
        ("void_cell_radius", &axes.void_cell_radius),
        ("clad_cell_radius", &axes.clad_cell_radius),
        ("unit_cell_pitch", &axes.unit_cell_pitch),
        ("fuel_specific_power", &axes.fuel_specific_power),
    ];
    for (name, vals) in checks {
        if vals.is_empty() {
            return Err(XsgenError::InvalidRunControl(format!(
                "'{}' axis is empty",
                name
            )));
        }
        if vals.iter().any(|v| *v <= 0.0 || !v.is_finite()) {
            return Err(XsgenError::InvalidRunControl(format!(
                "'{}' values must be positive",
                name
            )));
        }
    }
    if axes.burn_times.is_empty() {
        return Err(XsgenError::InvalidRunControl(
            "burn_times axis is empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_raw() -> RawRunControl {
        let toml_src = r#"
            [fuel_material]
            U235 = 0.04
            U238 = 0.84
            O16 = 0.12
        "#;
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn test_resolve_minimal() {
        let rc = resolve(minimal_raw()).unwrap();
        assert_eq!(rc.reactor, "lwr");
        assert_eq!(rc.solver, "spectrum");
        assert!(rc.is_thermal);
        assert_eq!(rc.group_structure, vec![10.0, 1.0, 0.1, 0.01]);
        assert_eq!(rc.axes.burn_times.len(), 10); // arange(0, 1000, 100)
        assert_eq!(rc.formats.len(), 1);
        assert_eq!(rc.outfiles, vec!["brightlite".to_string()]);
    }

    #[test]
    fn test_burn_times_from_step() {
        let mut raw = minimal_raw();
        raw.burn_time = Some(300.0);
        raw.time_step = Some(100.0);
        let rc = resolve(raw).unwrap();
        assert_eq!(rc.axes.burn_times, vec![0.0, 100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_group_structure_reversed_when_ascending() {
        let mut raw = minimal_raw();
        raw.group_structure = Some(vec![0.01, 0.1, 1.0, 10.0]);
        let rc = resolve(raw).unwrap();
        assert_eq!(rc.group_structure, vec![10.0, 1.0, 0.1, 0.01]);
    }

    #[test]
    fn test_group_structure_non_monotonic_rejected() {
        let mut raw = minimal_raw();
        raw.group_structure = Some(vec![10.0, 0.1, 1.0]);
        assert!(resolve(raw).is_err());
    }

    #[test]
    fn test_track_nucs_half_life_filter() {
        let mut raw = minimal_raw();
        raw.track_nucs = Some(vec!["U235".to_string(), "Xe135".to_string()]);
        // 巨大的阈值把 Xe135（9.1 小时）筛掉，留下 U235
        raw.track_nuc_threshold = Some(1.0);
        let rc = resolve(raw).unwrap();
        assert!(rc.track_nucs.contains(&922350));
        assert!(!rc.track_nucs.contains(&541350));
    }

    #[test]
    fn test_initial_nuc_keys() {
        let toml_src = r#"
            initial_U235 = [0.02, 0.04]
            initial_Pu239 = 0.01

            [fuel_material]
            U235 = 0.04
            U238 = 0.96
        "#;
        let raw: RawRunControl = toml::from_str(toml_src).unwrap();
        let rc = resolve(raw).unwrap();
        assert_eq!(rc.axes.initial_nucs.len(), 2);
        let names = rc.axes.param_names();
        assert!(names.contains(&"initial_U235".to_string()));
        assert!(names.contains(&"initial_Pu239".to_string()));
    }

    #[test]
    fn test_initial_mass_cap() {
        let toml_src = r#"
            initial_U235 = [0.7]
            initial_U238 = [0.6]

            [fuel_material]
            U235 = 0.04
            U238 = 0.96
        "#;
        let raw: RawRunControl = toml::from_str(toml_src).unwrap();
        assert!(resolve(raw).is_err());
    }

    #[test]
    fn test_missing_fuel_rejected() {
        let raw = RawRunControl::default();
        assert!(resolve(raw).is_err());
    }

    #[test]
    fn test_fuel_from_chemical_form() {
        let toml_src = r#"
            [fuel_chemical_form]
            IHM = 1.0
            O16 = 2.0

            [initial_heavy_metal]
            U235 = 0.04
            U238 = 0.96
        "#;
        let raw: RawRunControl = toml::from_str(toml_src).unwrap();
        let rc = resolve(raw).unwrap();
        // UO2 重金属质量份额约 88%
        let hm = rc.fuel_material.heavy_metal_frac();
        assert!((hm - 0.881).abs() < 0.01, "heavy metal frac: {}", hm);
    }

    #[test]
    fn test_outfile_count_mismatch() {
        let mut raw = minimal_raw();
        raw.formats = Some(vec!["brightlite".to_string(), "csv".to_string()]);
        raw.outfiles = Some(vec!["only_one".to_string()]);
        assert!(resolve(raw).is_err());
    }

    #[test]
    fn test_default_materials() {
        let rc = resolve(minimal_raw()).unwrap();
        // 默认包壳含锆，默认冷却剂含氢和硼
        assert!(rc.clad_material.comp.contains_key(&400900));
        assert!(rc.cool_material.comp.contains_key(&10010));
        assert!(rc.cool_material.comp.contains_key(&50100));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut raw = minimal_raw();
        raw.formats = Some(vec!["hdf5".to_string()]);
        assert!(resolve(raw).is_err());
    }
}
