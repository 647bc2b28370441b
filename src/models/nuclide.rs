//! # 核素标识模块
//!
//! 统一的核素 ID 表示（zzzaaam 形式）与名称解析。
//!
//! ## ID 约定
//! `id = Z * 10000 + A * 10 + M`，其中 M 为亚稳态编号。
//! 例如 U235 -> 922350，Am242M -> 952421。
//!
//! ## 依赖关系
//! - 被 `models/`, `config/`, `physics/` 使用
//! - 无外部模块依赖

use crate::error::{Result, XsgenError};

/// 核素 ID（zzzaaam 形式）
pub type NucId = u32;

/// 元素符号表，下标为质子数 Z（0 占位）
const SYMBOLS: [&str; 97] = [
    "n", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
];

/// 从元素符号查质子数
fn z_from_symbol(symbol: &str) -> Option<u32> {
    let lower = symbol.to_lowercase();
    SYMBOLS
        .iter()
        .position(|s| s.to_lowercase() == lower)
        .map(|z| z as u32)
}

/// 组装 zzzaaam ID
pub fn zam_to_id(z: u32, a: u32, m: u32) -> NucId {
    z * 10000 + a * 10 + m
}

/// 拆解 zzzaaam ID 为 (Z, A, M)
pub fn id_to_zam(id: NucId) -> (u32, u32, u32) {
    (id / 10000, (id / 10) % 1000, id % 10)
}

/// 解析核素名称为 ID
///
/// 接受 "U235"、"u-235"、"Am242M" 或纯数字 zzzaaam 字符串。
pub fn id_from_name(name: &str) -> Result<NucId> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(XsgenError::UnknownNuclide(name.to_string()));
    }

    // 纯数字：直接当作 zzzaaam ID
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        let id: NucId = trimmed
            .parse()
            .map_err(|_| XsgenError::UnknownNuclide(name.to_string()))?;
        let (z, a, _) = id_to_zam(id);
        if z == 0 || z as usize >= SYMBOLS.len() || a < z {
            return Err(XsgenError::UnknownNuclide(name.to_string()));
        }
        return Ok(id);
    }

    // 符号 + 质量数，可带 '-' 分隔和 m/M 亚稳态后缀
    let cleaned: String = trimmed.chars().filter(|c| *c != '-' && *c != '_').collect();
    let sym_len = cleaned.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    if sym_len == 0 || sym_len > 2 {
        return Err(XsgenError::UnknownNuclide(name.to_string()));
    }

    let (sym, rest) = cleaned.split_at(sym_len);
    let metastable = rest.ends_with('m') || rest.ends_with('M');
    let digits = if metastable {
        &rest[..rest.len() - 1]
    } else {
        rest
    };

    let z = z_from_symbol(sym).ok_or_else(|| XsgenError::UnknownNuclide(name.to_string()))?;
    let a: u32 = digits
        .parse()
        .map_err(|_| XsgenError::UnknownNuclide(name.to_string()))?;

    if a < z || a > 300 {
        return Err(XsgenError::UnknownNuclide(name.to_string()));
    }

    Ok(zam_to_id(z, a, if metastable { 1 } else { 0 }))
}

/// 核素 ID 的规范名称（如 "U235", "Am242M"）
pub fn name(id: NucId) -> String {
    let (z, a, m) = id_to_zam(id);
    let sym = SYMBOLS.get(z as usize).copied().unwrap_or("?");
    if m > 0 {
        format!("{}{}M", sym, a)
    } else {
        format!("{}{}", sym, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name() {
        assert_eq!(id_from_name("U235").unwrap(), 922350);
        assert_eq!(id_from_name("H1").unwrap(), 10010);
        assert_eq!(id_from_name("Pu239").unwrap(), 942390);
    }

    #[test]
    fn test_parse_dashed_and_lowercase() {
        assert_eq!(id_from_name("u-235").unwrap(), 922350);
        assert_eq!(id_from_name("pu-240").unwrap(), 942400);
    }

    #[test]
    fn test_parse_metastable() {
        assert_eq!(id_from_name("Am242M").unwrap(), 952421);
        assert_eq!(id_from_name("am242m").unwrap(), 952421);
    }

    #[test]
    fn test_parse_numeric_id() {
        assert_eq!(id_from_name("922350").unwrap(), 922350);
        assert_eq!(id_from_name("80160").unwrap(), 80160);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(id_from_name("").is_err());
        assert!(id_from_name("Xx999").is_err());
        assert!(id_from_name("U23a5").is_err());
    }

    #[test]
    fn test_name_round_trip() {
        for n in ["U235", "U238", "Pu239", "Xe135", "Am242M", "B10"] {
            let id = id_from_name(n).unwrap();
            assert_eq!(name(id), n.to_string());
        }
    }

    #[test]
    fn test_zam_split() {
        let (z, a, m) = id_to_zam(952421);
        assert_eq!((z, a, m), (95, 242, 1));
    }
}
