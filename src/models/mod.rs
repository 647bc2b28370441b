//! # 数据模型模块
//!
//! 核素、材料、几何与反应堆状态的统一表示。
//!
//! ## 依赖关系
//! - 被 `config/`, `physics/`, `writers/`, `commands/` 使用
//! - 子模块: nuclide, data, material, geometry, state

pub mod data;
pub mod geometry;
pub mod material;
pub mod nuclide;
pub mod state;

pub use geometry::{Lattice, UnitCell};
pub use material::Material;
pub use nuclide::NucId;
pub use state::{PerturbationAxes, ReactorState, StateFamily};
