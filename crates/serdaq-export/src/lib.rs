//! # 导出模块
//!
//! 缓冲快照 + Schema → 表格文件。
//!
//! 文件结构（两种格式一致）：
//!
//! ```text
//! [第 0 行: Schema 字段名]
//! [第 i 行: 第 i-1 条记录的字段，按 Schema 列顺序]
//! ```
//!
//! 目标路径已存在时直接覆盖。任何写入失败都如实上报，
//! 绝不静默声称成功；不保证清理半成品文件。

use serdaq_record::{Record, Schema};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// 导出错误
///
/// 对导出这一步是致命的（此时通道已关闭，缓冲数据仍然保留，
/// 由调用方决定是否换路径重试或显式重置）。
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// 无法从目标路径推断格式
    #[error("Cannot infer export format from path: {0}")]
    UnknownFormat(PathBuf),
}

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// 逗号分隔文本（分隔符与输入解析一致）
    #[default]
    Csv,
    /// Excel 工作簿（单工作表）
    Xlsx,
}

impl ExportFormat {
    /// 按扩展名推断格式
    ///
    /// `.csv`/`.txt` → Csv，`.xlsx` → Xlsx，其余无法推断。
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// 导出结果摘要（供表示层反馈）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// 写出的总行数（含表头）
    pub rows: usize,
    /// 实际写入的路径
    pub path: PathBuf,
}

/// 把快照写成表格文件
///
/// # 参数
/// - `records`: 缓冲快照（按到达顺序）
/// - `schema`: 列定义（表头）
/// - `dest`: 目标路径（已存在则覆盖）
/// - `format`: 输出格式
///
/// # 错误
/// - `ExportError::Io` / `Csv` / `Xlsx`: 创建或写入失败
pub fn export(
    records: &[Record],
    schema: &Schema,
    dest: &Path,
    format: ExportFormat,
) -> Result<ExportSummary, ExportError> {
    match format {
        ExportFormat::Csv => export_csv(records, schema, dest)?,
        ExportFormat::Xlsx => export_xlsx(records, schema, dest)?,
    }

    let summary = ExportSummary {
        rows: records.len() + 1,
        path: dest.to_path_buf(),
    };
    info!(
        "Exported {} rows ({} records) to {}",
        summary.rows,
        records.len(),
        dest.display()
    );
    Ok(summary)
}

/// 按目标路径扩展名推断格式后导出
///
/// # 错误
/// - `ExportError::UnknownFormat`: 扩展名无法识别
pub fn export_inferred(
    records: &[Record],
    schema: &Schema,
    dest: &Path,
) -> Result<ExportSummary, ExportError> {
    let format = ExportFormat::from_path(dest)
        .ok_or_else(|| ExportError::UnknownFormat(dest.to_path_buf()))?;
    export(records, schema, dest, format)
}

fn export_csv(records: &[Record], schema: &Schema, dest: &Path) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new().from_path(dest)?;

    writer.write_record(schema.fields())?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}

fn export_xlsx(records: &[Record], schema: &Schema, dest: &Path) -> Result<(), ExportError> {
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, name) in schema.fields().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name.as_str(), &header_format)?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, value) in record.fields().iter().enumerate() {
            worksheet.write_string((row + 1) as u32, col as u16, value.as_str())?;
        }
    }

    workbook.save(dest)?;
    Ok(())
}
