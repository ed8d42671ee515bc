//! Schema 定义
//!
//! Schema 是一次采集会话的列定义：有序的字段名序列，长度 N ≥ 1，
//! 会话期间不可变。记录的接受与否只看字段数量是否等于 N。

use crate::FIELD_DELIMITER;
use thiserror::Error;

/// Schema 构建错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// 字段列表为空
    #[error("Schema requires at least one field")]
    Empty,

    /// 某个字段名为空白
    #[error("Schema field {index} is empty")]
    EmptyField { index: usize },
}

/// 采集会话的列定义
///
/// # 不变量
///
/// - 至少包含一个字段名
/// - 字段名非空（构造时已去除首尾空白）
/// - 构造后不可变（会话期间 Schema 固定）
///
/// # Example
///
/// ```
/// use serdaq_record::Schema;
///
/// let schema = Schema::from_spec("Temperature, Humidity").unwrap();
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.fields(), &["Temperature", "Humidity"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// 从字段名列表构建 Schema
    ///
    /// # 错误
    /// - `SchemaError::Empty`: 列表为空
    /// - `SchemaError::EmptyField`: 某个字段名为空白
    pub fn new(fields: Vec<String>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (index, field) in fields.iter().enumerate() {
            if field.trim().is_empty() {
                return Err(SchemaError::EmptyField { index });
            }
        }
        Ok(Self { fields })
    }

    /// 从逗号分隔的字段名字符串构建 Schema
    ///
    /// 配置界面输入的就是这种形式（如 `"Temperature,Humidity"`）。
    /// 各字段名首尾空白会被去除。
    ///
    /// # 错误
    /// - `SchemaError::Empty`: 输入为空白
    /// - `SchemaError::EmptyField`: 出现空字段（如 `"a,,b"`）
    pub fn from_spec(spec: &str) -> Result<Self, SchemaError> {
        if spec.trim().is_empty() {
            return Err(SchemaError::Empty);
        }
        let fields: Vec<String> =
            spec.split(FIELD_DELIMITER).map(|f| f.trim().to_string()).collect();
        Self::new(fields)
    }

    /// 字段数量 N
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 是否为空（构造保证非空，仅为惯用接口）
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 字段名切片（按列顺序）
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fields.join(","))
    }
}
