//! # 栅元几何数据模型
//!
//! 单棒栅元（燃料/气隙/包壳/冷却剂）与组件栅格布置。
//!
//! ## 依赖关系
//! - 被 `config/` 和 `physics/` 使用
//! - 无外部模块依赖

use crate::error::{Result, XsgenError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 单棒栅元几何（单位 cm）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnitCell {
    /// 燃料芯块半径
    pub fuel_cell_radius: f64,
    /// 气隙外半径
    pub void_cell_radius: f64,
    /// 包壳外半径
    pub clad_cell_radius: f64,
    /// 栅距
    pub unit_cell_pitch: f64,
    /// 栅元高度
    pub unit_cell_height: f64,
}

/// 栅元各区体积份额
#[derive(Debug, Clone, Copy)]
pub struct RegionVolumes {
    pub fuel: f64,
    pub void: f64,
    pub clad: f64,
    pub coolant: f64,
}

impl UnitCell {
    /// 校验几何嵌套关系：r_fuel < r_void < r_clad 且包壳在栅元内
    pub fn validate(&self) -> Result<()> {
        if self.fuel_cell_radius <= 0.0 {
            return Err(XsgenError::InvalidRunControl(
                "fuel_cell_radius must be positive".to_string(),
            ));
        }
        if !(self.fuel_cell_radius < self.void_cell_radius
            && self.void_cell_radius < self.clad_cell_radius)
        {
            return Err(XsgenError::InvalidRunControl(format!(
                "cell radii must nest: fuel {} < void {} < clad {}",
                self.fuel_cell_radius, self.void_cell_radius, self.clad_cell_radius
            )));
        }
        if 2.0 * self.clad_cell_radius >= self.unit_cell_pitch {
            return Err(XsgenError::InvalidRunControl(format!(
                "clad diameter {} exceeds unit cell pitch {}",
                2.0 * self.clad_cell_radius,
                self.unit_cell_pitch
            )));
        }
        if self.unit_cell_height <= 0.0 {
            return Err(XsgenError::InvalidRunControl(
                "unit_cell_height must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// 各区体积份额（按栅元横截面积归一）
    pub fn region_volumes(&self) -> RegionVolumes {
        let cell = self.unit_cell_pitch * self.unit_cell_pitch;
        let fuel = PI * self.fuel_cell_radius * self.fuel_cell_radius;
        let void = PI * self.void_cell_radius * self.void_cell_radius - fuel;
        let clad = PI * self.clad_cell_radius * self.clad_cell_radius - fuel - void;
        let coolant = cell - fuel - void - clad;
        RegionVolumes {
            fuel: fuel / cell,
            void: void / cell,
            clad: clad / cell,
            coolant: coolant / cell,
        }
    }

    /// 慢化剂/燃料体积比
    pub fn moderator_fuel_ratio(&self) -> f64 {
        let v = self.region_volumes();
        v.coolant / v.fuel
    }

    /// 单棒燃料体积 (cm³)
    pub fn fuel_volume(&self) -> f64 {
        PI * self.fuel_cell_radius * self.fuel_cell_radius * self.unit_cell_height
    }
}

/// 组件栅格：空白分隔的区号行（1 = 燃料棒，2 = 导向管）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 栅格布置字符串
    pub map: String,
    /// 形状 (行, 列)
    pub shape: (usize, usize),
}

impl Lattice {
    /// 默认 17x17 LWR 组件布置（含导向管位置）
    pub fn default_lwr() -> Self {
        let rows = [
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
            "1 1 1 1 1 2 1 1 2 1 1 2 1 1 1 1 1",
            "1 1 1 2 1 1 1 1 1 1 1 1 1 2 1 1 1",
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
            "1 1 2 1 1 2 1 1 2 1 1 2 1 1 2 1 1",
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
            "1 1 2 1 1 2 1 1 2 1 1 2 1 1 2 1 1",
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
            "1 1 2 1 1 2 1 1 2 1 1 2 1 1 2 1 1",
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
            "1 1 1 2 1 1 1 1 1 1 1 1 1 2 1 1 1",
            "1 1 1 1 1 2 1 1 2 1 1 2 1 1 1 1 1",
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
            "1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1",
        ];
        Lattice {
            map: rows.join("\n"),
            shape: (17, 17),
        }
    }

    /// 解析布置字符串为区号矩阵，并校验形状
    pub fn cells(&self) -> Result<Vec<Vec<u8>>> {
        let mut grid = Vec::new();
        for line in self.map.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row: std::result::Result<Vec<u8>, _> =
                line.split_whitespace().map(|t| t.parse::<u8>()).collect();
            let row = row.map_err(|_| {
                XsgenError::InvalidRunControl(format!("invalid lattice row: '{}'", line))
            })?;
            grid.push(row);
        }

        if grid.len() != self.shape.0 {
            return Err(XsgenError::InvalidRunControl(format!(
                "lattice has {} rows, expected {}",
                grid.len(),
                self.shape.0
            )));
        }
        for (i, row) in grid.iter().enumerate() {
            if row.len() != self.shape.1 {
                return Err(XsgenError::InvalidRunControl(format!(
                    "lattice row {} has {} columns, expected {}",
                    i + 1,
                    row.len(),
                    self.shape.1
                )));
            }
        }
        Ok(grid)
    }

    /// 燃料棒位置数
    pub fn fuel_pin_count(&self) -> Result<usize> {
        Ok(self
            .cells()?
            .iter()
            .flatten()
            .filter(|&&c| c == 1)
            .count())
    }

    /// 导向管（水孔）位置数
    pub fn guide_tube_count(&self) -> Result<usize> {
        Ok(self
            .cells()?
            .iter()
            .flatten()
            .filter(|&&c| c == 2)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_cell() -> UnitCell {
        UnitCell {
            fuel_cell_radius: 0.7,
            void_cell_radius: 0.8,
            clad_cell_radius: 0.9,
            unit_cell_pitch: 2.0,
            unit_cell_height: 2.0,
        }
    }

    #[test]
    fn test_cell_validate_ok() {
        assert!(default_cell().validate().is_ok());
    }

    #[test]
    fn test_cell_validate_bad_nesting() {
        let mut cell = default_cell();
        cell.void_cell_radius = 0.6;
        assert!(cell.validate().is_err());
    }

    #[test]
    fn test_cell_validate_pitch_too_small() {
        let mut cell = default_cell();
        cell.unit_cell_pitch = 1.5;
        assert!(cell.validate().is_err());
    }

    #[test]
    fn test_region_volumes_sum_to_one() {
        let v = default_cell().region_volumes();
        let total = v.fuel + v.void + v.clad + v.coolant;
        assert!((total - 1.0).abs() < 1e-12);
        assert!(v.fuel > 0.0 && v.coolant > 0.0);
    }

    #[test]
    fn test_moderator_ratio_grows_with_pitch() {
        let tight = default_cell();
        let mut open = default_cell();
        open.unit_cell_pitch = 3.0;
        assert!(open.moderator_fuel_ratio() > tight.moderator_fuel_ratio());
    }

    #[test]
    fn test_default_lattice() {
        let lat = Lattice::default_lwr();
        let cells = lat.cells().unwrap();
        assert_eq!(cells.len(), 17);
        // 17x17 组件：264 燃料棒 + 25 导向管
        assert_eq!(lat.fuel_pin_count().unwrap(), 264);
        assert_eq!(lat.guide_tube_count().unwrap(), 25);
    }

    #[test]
    fn test_lattice_shape_mismatch() {
        let lat = Lattice {
            map: "1 1\n1 1".to_string(),
            shape: (3, 2),
        };
        assert!(lat.cells().is_err());
    }
}
