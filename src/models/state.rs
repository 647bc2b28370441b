//! # 反应堆状态表
//!
//! 由微扰参数的笛卡尔积生成反应堆状态表。参数次序固定，
//! `burn_times` 永远是最后一个轴（变化最快），与原始运行控制
//! 语义保持一致。
//!
//! ## 依赖关系
//! - 被 `config/`, `commands/`, `physics/` 使用
//! - 使用 `models/nuclide.rs`

use super::nuclide::{self, NucId};
use serde::{Deserialize, Serialize};

/// 微扰参数轴集合
#[derive(Debug, Clone)]
pub struct PerturbationAxes {
    pub fuel_density: Vec<f64>,
    pub clad_density: Vec<f64>,
    pub cool_density: Vec<f64>,
    pub fuel_cell_radius: Vec<f64>,
    pub void_cell_radius: Vec<f64>,
    pub clad_cell_radius: Vec<f64>,
    pub unit_cell_pitch: Vec<f64>,
    pub burn_regions: Vec<u32>,
    pub fuel_specific_power: Vec<f64>,
    /// 初始核素质量微扰 (kg)，按核素名排序
    pub initial_nucs: Vec<(NucId, Vec<f64>)>,
    /// 燃耗时间点 (天)，必须是最后一个轴
    pub burn_times: Vec<f64>,
}

/// 单个反应堆状态：微扰积中的一个点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactorState {
    /// 状态编号（0 起）
    pub index: usize,
    pub fuel_density: f64,
    pub clad_density: f64,
    pub cool_density: f64,
    pub fuel_cell_radius: f64,
    pub void_cell_radius: f64,
    pub clad_cell_radius: f64,
    pub unit_cell_pitch: f64,
    pub burn_regions: u32,
    /// 燃料比功率 (MW/kgIHM)
    pub fuel_specific_power: f64,
    /// 初始核素质量微扰 (核素 ID, kg)
    pub initial_masses: Vec<(NucId, f64)>,
    /// 该状态对应的燃耗时间 (天)
    pub burn_time: f64,
}

/// 微扰族：除 burn_time 外各轴取值相同的一组状态
///
/// 燃耗计算按族进行一次，再在各时间点取样。
#[derive(Debug, Clone)]
pub struct StateFamily {
    /// 族编号（0 起）
    pub index: usize,
    /// 族的基准状态（burn_time 取第一个时间点）
    pub base: ReactorState,
    /// 该族覆盖的全部燃耗时间 (天)
    pub burn_times: Vec<f64>,
    /// 对应的状态编号
    pub state_indices: Vec<usize>,
}

impl PerturbationAxes {
    /// 微扰参数名称，按固定次序（burn_times 最后）
    pub fn param_names(&self) -> Vec<String> {
        let mut names = vec![
            "fuel_density".to_string(),
            "clad_density".to_string(),
            "cool_density".to_string(),
            "fuel_cell_radius".to_string(),
            "void_cell_radius".to_string(),
            "clad_cell_radius".to_string(),
            "unit_cell_pitch".to_string(),
            "burn_regions".to_string(),
            "fuel_specific_power".to_string(),
        ];
        for (id, _) in &self.initial_nucs {
            names.push(format!("initial_{}", nuclide::name(*id)));
        }
        names.push("burn_times".to_string());
        names
    }

    /// 各轴长度，与 `param_names` 同序
    fn dims(&self) -> Vec<usize> {
        let mut dims = vec![
            self.fuel_density.len(),
            self.clad_density.len(),
            self.cool_density.len(),
            self.fuel_cell_radius.len(),
            self.void_cell_radius.len(),
            self.clad_cell_radius.len(),
            self.unit_cell_pitch.len(),
            self.burn_regions.len(),
            self.fuel_specific_power.len(),
        ];
        for (_, vals) in &self.initial_nucs {
            dims.push(vals.len());
        }
        dims.push(self.burn_times.len());
        dims
    }

    /// 状态总数
    pub fn n_states(&self) -> usize {
        self.dims().iter().product()
    }

    /// 由多维下标装配状态
    fn state_at(&self, index: usize, idx: &[usize]) -> ReactorState {
        let mut k = 0;
        let mut next = || {
            let i = idx[k];
            k += 1;
            i
        };
        let fuel_density = self.fuel_density[next()];
        let clad_density = self.clad_density[next()];
        let cool_density = self.cool_density[next()];
        let fuel_cell_radius = self.fuel_cell_radius[next()];
        let void_cell_radius = self.void_cell_radius[next()];
        let clad_cell_radius = self.clad_cell_radius[next()];
        let unit_cell_pitch = self.unit_cell_pitch[next()];
        let burn_regions = self.burn_regions[next()];
        let fuel_specific_power = self.fuel_specific_power[next()];
        let initial_masses = self
            .initial_nucs
            .iter()
            .map(|(id, vals)| (*id, vals[next()]))
            .collect();
        let burn_time = self.burn_times[next()];

        ReactorState {
            index,
            fuel_density,
            clad_density,
            cool_density,
            fuel_cell_radius,
            void_cell_radius,
            clad_cell_radius,
            unit_cell_pitch,
            burn_regions,
            fuel_specific_power,
            initial_masses,
            burn_time,
        }
    }

    /// 生成全部状态（笛卡尔积，最后一个轴变化最快）
    pub fn states(&self) -> Vec<ReactorState> {
        let dims = self.dims();
        let total = self.n_states();
        let mut out = Vec::with_capacity(total);
        let mut idx = vec![0usize; dims.len()];

        for index in 0..total {
            out.push(self.state_at(index, &idx));
            // 混合进制进位：末位最快
            for axis in (0..dims.len()).rev() {
                idx[axis] += 1;
                if idx[axis] < dims[axis] {
                    break;
                }
                idx[axis] = 0;
            }
        }
        out
    }

    /// 按非时间轴分组为微扰族
    pub fn families(&self) -> Vec<StateFamily> {
        let nt = self.burn_times.len().max(1);
        let states = self.states();
        let mut families = Vec::with_capacity(states.len() / nt);

        for (fi, chunk) in states.chunks(nt).enumerate() {
            families.push(StateFamily {
                index: fi,
                base: chunk[0].clone(),
                burn_times: self.burn_times.clone(),
                state_indices: chunk.iter().map(|s| s.index).collect(),
            });
        }
        families
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes() -> PerturbationAxes {
        PerturbationAxes {
            fuel_density: vec![19.1],
            clad_density: vec![6.56],
            cool_density: vec![0.9, 1.0],
            fuel_cell_radius: vec![0.7],
            void_cell_radius: vec![0.8],
            clad_cell_radius: vec![0.9],
            unit_cell_pitch: vec![1.5],
            burn_regions: vec![1],
            fuel_specific_power: vec![1.0],
            initial_nucs: vec![(922350, vec![0.04, 0.05])],
            burn_times: vec![0.0, 100.0, 200.0],
        }
    }

    #[test]
    fn test_state_count() {
        let a = axes();
        assert_eq!(a.n_states(), 2 * 2 * 3);
        assert_eq!(a.states().len(), 12);
    }

    #[test]
    fn test_burn_times_vary_fastest() {
        let states = axes().states();
        assert_eq!(states[0].burn_time, 0.0);
        assert_eq!(states[1].burn_time, 100.0);
        assert_eq!(states[2].burn_time, 200.0);
        // 第 4 个状态翻到下一个 initial_U235 值
        assert_eq!(states[3].burn_time, 0.0);
        assert!((states[3].initial_masses[0].1 - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_param_names_order() {
        let names = axes().param_names();
        assert_eq!(names.first().unwrap(), "fuel_density");
        assert_eq!(names.last().unwrap(), "burn_times");
        assert!(names.contains(&"initial_U235".to_string()));
    }

    #[test]
    fn test_families_group_by_non_time_axes() {
        let a = axes();
        let fams = a.families();
        assert_eq!(fams.len(), 4);
        for fam in &fams {
            assert_eq!(fam.burn_times.len(), 3);
            assert_eq!(fam.state_indices.len(), 3);
            assert_eq!(fam.base.index, fam.state_indices[0]);
        }
    }

    #[test]
    fn test_state_indices_contiguous() {
        let states = axes().states();
        for (i, s) in states.iter().enumerate() {
            assert_eq!(s.index, i);
        }
    }
}
