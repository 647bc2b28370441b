//! # 批量执行器
//!
//! 并行执行微扰族的物理计算。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，作业数可配置
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `physics/` 的引擎接口

use crate::config::RunControl;
use crate::models::StateFamily;
use crate::physics::{FamilyResult, PhysicsEngine};
use crate::utils::progress;

use rayon::prelude::*;

/// 批量计算结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功的族结果，按族编号排序
    pub results: Vec<FamilyResult>,
    /// 失败详情 (族编号, 错误信息)
    pub failures: Vec<(usize, String)>,
}

impl BatchResult {
    /// 成功数量
    pub fn success(&self) -> usize {
        self.results.len()
    }

    /// 失败数量
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success() + self.failed()
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器（jobs = 0 表示使用全部核心）
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行计算全部微扰族
    pub fn run(
        &self,
        families: &[StateFamily],
        engine: &dyn PhysicsEngine,
        rc: &RunControl,
    ) -> BatchResult {
        let pb = progress::create_progress_bar(families.len() as u64, "Burning");

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .unwrap();

        let outcomes: Vec<std::result::Result<FamilyResult, (usize, String)>> =
            pool.install(|| {
                families
                    .par_iter()
                    .map(|family| {
                        let outcome = engine
                            .lattice_physics(family, rc)
                            .map_err(|e| (family.index, e.to_string()));
                        pb.inc(1);
                        outcome
                    })
                    .collect()
            });

        pb.finish_and_clear();

        // 汇总结果
        let mut batch = BatchResult::default();
        for outcome in outcomes {
            match outcome {
                Ok(result) => batch.results.push(result),
                Err(failure) => batch.failures.push(failure),
            }
        }
        batch.results.sort_by_key(|r| r.family_index);
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate, OneOrMany, RawRunControl};
    use crate::physics::engine_for_name;

    fn lwr_rc() -> RunControl {
        let mut raw = RawRunControl::default();
        raw.fuel_material = Some(
            [("U235".to_string(), 0.04), ("U238".to_string(), 0.84), ("O16".to_string(), 0.12)]
                .into_iter()
                .collect(),
        );
        raw.fuel_density = Some(OneOrMany::One(10.7));
        raw.cool_density = Some(OneOrMany::Many(vec![0.9, 1.0]));
        raw.burn_times = Some(vec![0.0, 100.0]);
        raw.fuel_specific_power = Some(OneOrMany::One(0.04));
        validate::resolve(raw).unwrap()
    }

    #[test]
    fn test_batch_runs_all_families() {
        let rc = lwr_rc();
        let families = rc.axes.families();
        assert_eq!(families.len(), 2);

        let engine = engine_for_name(&rc.solver).unwrap();
        let batch = BatchRunner::new(1).run(&families, engine.as_ref(), &rc);
        assert_eq!(batch.success(), 2);
        assert_eq!(batch.failed(), 0);
        assert_eq!(batch.results[0].family_index, 0);
        assert_eq!(batch.results[1].family_index, 1);
    }

    #[test]
    fn test_batch_collects_failures() {
        let mut rc = lwr_rc();
        // 把几何改坏：包壳半径小于燃料半径
        rc.axes.clad_cell_radius = vec![0.1];
        let families = rc.axes.families();

        let engine = engine_for_name(&rc.solver).unwrap();
        let batch = BatchRunner::new(1).run(&families, engine.as_ref(), &rc);
        assert_eq!(batch.success(), 0);
        assert_eq!(batch.failed(), families.len());
        assert!(!batch.failures[0].1.is_empty());
    }
}
