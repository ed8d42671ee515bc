//! # Serdaq Record
//!
//! 行记录的数据模型与解析（无硬件依赖）
//!
//! ## 模块
//!
//! - `schema`: 字段名序列（列定义）
//! - `record`: 与 Schema 对齐的一行数据
//! - `parse`: 行文本 → 记录的解析入口
//!
//! ## 分隔符
//!
//! 输入行和导出文件使用同一个字段分隔符（逗号）。
//! 解析不做任何类型转换，所有字段保持字符串。

pub mod parse;
pub mod record;
pub mod schema;

// 重新导出常用类型
pub use parse::{ParseRejected, parse_line};
pub use record::Record;
pub use schema::{Schema, SchemaError};

/// 字段分隔符
///
/// 输入解析和表格导出共用，保证往返一致。
pub const FIELD_DELIMITER: char = ',';
