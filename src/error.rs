//! # 统一错误处理模块
//!
//! 定义 xsgen 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xsgen 统一错误类型
#[derive(Error, Debug)]
pub enum XsgenError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 运行控制错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse run control file: {path}\nReason: {reason}")]
    RunControlParseError { path: String, reason: String },

    #[error("Invalid run control: {0}")]
    InvalidRunControl(String),

    // ─────────────────────────────────────────────────────────────
    // 核素与材料错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown nuclide: {0}")]
    UnknownNuclide(String),

    #[error("Nuclide '{name}' is not in the embedded data library")]
    NuclideNotInLibrary { name: String },

    #[error("Invalid material: {0}")]
    InvalidMaterial(String),

    // ─────────────────────────────────────────────────────────────
    // 物理引擎错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown physics engine '{name}'. Available engines: {available}")]
    UnknownEngine { name: String, available: String },

    #[error("Physics engine failed: {0}")]
    EngineError(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XsgenError>;
