//! Record 定义

/// 一行已接受的采集数据
///
/// 字段与 Schema 按下标对齐，数量恰好等于 Schema 长度
/// （由 [`parse_line`](crate::parse_line) 保证）。构造后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    /// 由字段序列构建记录（crate 内部使用，长度校验在解析层）
    pub(crate) fn from_fields(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// 字段数量
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 字段切片（按 Schema 列顺序）
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// 消费自身，取出字段序列
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}
