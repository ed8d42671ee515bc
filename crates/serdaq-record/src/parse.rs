//! 行解析
//!
//! 无状态解析器：一行文本按逗号切分，字段数量与 Schema 一致则接受，
//! 否则整行拒绝。不做类型转换，字段语义由下游消费者解释。

use crate::record::Record;
use crate::schema::Schema;
use crate::FIELD_DELIMITER;
use thiserror::Error;

/// 行被拒绝（字段数量与 Schema 不一致）
///
/// 保留原始行用于诊断。拒绝是逐行的，不致命、不重试。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line rejected: expected {expected} fields, found {found}: {line:?}")]
pub struct ParseRejected {
    /// 原始行（未切分）
    pub line: String,
    /// Schema 字段数
    pub expected: usize,
    /// 实际切分出的字段数
    pub found: usize,
}

/// 解析一行文本为记录
///
/// 按 [`FIELD_DELIMITER`] 切分，字段数量恰好等于 `schema.len()` 时接受。
/// 字段保持原样（含空白），与导出时的写出内容一一对应。
///
/// # Example
///
/// ```
/// use serdaq_record::{Schema, parse_line};
///
/// let schema = Schema::from_spec("Temperature,Humidity").unwrap();
///
/// let record = parse_line("21.5,40", &schema).unwrap();
/// assert_eq!(record.fields(), &["21.5", "40"]);
///
/// // 字段数不符 → 拒绝，原始行保留在错误里
/// let rejected = parse_line("bad line", &schema).unwrap_err();
/// assert_eq!(rejected.found, 1);
/// assert_eq!(rejected.line, "bad line");
/// ```
pub fn parse_line(raw: &str, schema: &Schema) -> Result<Record, ParseRejected> {
    let fields: Vec<String> = raw.split(FIELD_DELIMITER).map(str::to_string).collect();
    if fields.len() != schema.len() {
        return Err(ParseRejected {
            line: raw.to_string(),
            expected: schema.len(),
            found: fields.len(),
        });
    }
    Ok(Record::from_fields(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema2() -> Schema {
        Schema::from_spec("Temperature,Humidity").unwrap()
    }

    #[test]
    fn test_parse_accepts_matching_field_count() {
        let record = parse_line("21.5,40", &schema2()).unwrap();
        assert_eq!(record.fields(), &["21.5", "40"]);
    }

    #[test]
    fn test_parse_rejects_too_few_fields() {
        let rejected = parse_line("bad line", &schema2()).unwrap_err();
        assert_eq!(rejected.expected, 2);
        assert_eq!(rejected.found, 1);
        assert_eq!(rejected.line, "bad line");
    }

    #[test]
    fn test_parse_rejects_too_many_fields() {
        let rejected = parse_line("1,2,3", &schema2()).unwrap_err();
        assert_eq!(rejected.found, 3);
    }

    #[test]
    fn test_parse_no_type_coercion() {
        // 非数字字段同样接受，保持字符串原样
        let record = parse_line("n/a, 40", &schema2()).unwrap();
        assert_eq!(record.fields(), &["n/a", " 40"]);
    }

    #[test]
    fn test_parse_empty_fields_count() {
        // 空行切分出一个空字段：对 2 列 Schema 来说是拒绝
        assert!(parse_line("", &schema2()).is_err());
        // 对 1 列 Schema 来说则是一条空字段记录
        let schema1 = Schema::from_spec("Raw").unwrap();
        let record = parse_line("", &schema1).unwrap();
        assert_eq!(record.fields(), &[""]);
    }

    #[test]
    fn test_parse_preserves_field_for_field_equality() {
        let schema = Schema::from_spec("a,b,c").unwrap();
        let raw = "x,y,z";
        let record = parse_line(raw, &schema).unwrap();
        let expected: Vec<&str> = raw.split(',').collect();
        assert_eq!(record.fields(), expected.as_slice());
    }
}
