//! # 材料数据模型
//!
//! 以质量份额表示的材料组成，支持归一化、原子份额转换与
//! 原子数密度查询。
//!
//! ## 依赖关系
//! - 被 `config/` 和 `physics/` 使用
//! - 使用 `models/nuclide.rs`, `models/data.rs`

use super::data;
use super::nuclide::{self, NucId};
use crate::error::{Result, XsgenError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 阿伏伽德罗常数 (1/mol)
pub const AVOGADRO: f64 = 6.02214076e23;

/// 材料：核素 ID -> 质量份额
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Material {
    /// 质量份额映射（BTreeMap 保证确定性遍历顺序）
    pub comp: BTreeMap<NucId, f64>,
}

impl Material {
    /// 从 (核素, 质量份额) 列表创建并归一化
    pub fn from_mass_frac(pairs: &[(NucId, f64)]) -> Result<Self> {
        let mut comp = BTreeMap::new();
        for (id, frac) in pairs {
            if *frac < 0.0 {
                return Err(XsgenError::InvalidMaterial(format!(
                    "negative mass fraction for {}",
                    nuclide::name(*id)
                )));
            }
            *comp.entry(*id).or_insert(0.0) += frac;
        }
        let mut mat = Material { comp };
        mat.normalize()?;
        Ok(mat)
    }

    /// 从原子份额创建（转换为质量份额后归一化）
    pub fn from_atom_frac(pairs: &[(NucId, f64)]) -> Result<Self> {
        let mut mass_pairs = Vec::with_capacity(pairs.len());
        for (id, frac) in pairs {
            let nd = data::require(*id)?;
            mass_pairs.push((*id, frac * nd.atomic_mass));
        }
        Self::from_mass_frac(&mass_pairs)
    }

    /// 从名称字符串映射创建（run control 文件的表示形式）
    pub fn from_names(pairs: &BTreeMap<String, f64>) -> Result<Self> {
        let mut resolved = Vec::with_capacity(pairs.len());
        for (name, frac) in pairs {
            resolved.push((nuclide::id_from_name(name)?, *frac));
        }
        Self::from_mass_frac(&resolved)
    }

    /// 归一化质量份额，使总和为 1
    pub fn normalize(&mut self) -> Result<()> {
        let total: f64 = self.comp.values().sum();
        if total <= 0.0 {
            return Err(XsgenError::InvalidMaterial(
                "material has zero total mass".to_string(),
            ));
        }
        for v in self.comp.values_mut() {
            *v /= total;
        }
        Ok(())
    }

    /// 按质量权重混合两种材料
    pub fn mix(a: &Material, wa: f64, b: &Material, wb: f64) -> Result<Material> {
        let mut pairs: Vec<(NucId, f64)> = Vec::new();
        for (id, f) in &a.comp {
            pairs.push((*id, f * wa));
        }
        for (id, f) in &b.comp {
            pairs.push((*id, f * wb));
        }
        Self::from_mass_frac(&pairs)
    }

    /// 重金属（Z >= 90）质量份额之和
    pub fn heavy_metal_frac(&self) -> f64 {
        self.comp
            .iter()
            .filter(|(id, _)| *id / 10000 >= 90)
            .map(|(_, f)| f)
            .sum()
    }

    /// 仅保留重金属组分并重新归一化（IHM 基准）
    pub fn heavy_metal(&self) -> Result<Material> {
        let pairs: Vec<(NucId, f64)> = self
            .comp
            .iter()
            .filter(|(id, _)| *id / 10000 >= 90)
            .map(|(id, f)| (*id, *f))
            .collect();
        if pairs.is_empty() {
            return Err(XsgenError::InvalidMaterial(
                "material contains no heavy metal".to_string(),
            ));
        }
        Self::from_mass_frac(&pairs)
    }

    /// 给定密度 (g/cm³) 下各核素的原子数密度 (atoms/barn·cm)
    pub fn number_densities(&self, density: f64) -> Result<Vec<(NucId, f64)>> {
        let mut out = Vec::with_capacity(self.comp.len());
        for (id, frac) in &self.comp {
            let nd = data::require(*id)?;
            // N = ρ·w·N_A / M，除以 1e24 转为 atoms/(barn·cm)
            let n = density * frac * AVOGADRO / nd.atomic_mass / 1.0e24;
            out.push((*id, n));
        }
        Ok(out)
    }

    /// 每千克该材料中各核素的原子数 (atoms/kg)
    pub fn atoms_per_kg(&self) -> Result<Vec<(NucId, f64)>> {
        let mut out = Vec::with_capacity(self.comp.len());
        for (id, frac) in &self.comp {
            let nd = data::require(*id)?;
            out.push((*id, frac * 1000.0 * AVOGADRO / nd.atomic_mass));
        }
        Ok(out)
    }
}
