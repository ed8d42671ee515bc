//! 会话配置

use crate::error::SessionError;
use serdaq_export::ExportFormat;
use serdaq_record::Schema;
use std::path::PathBuf;

/// 一次采集会话的完整配置
///
/// Schema 由构造保证非空；其余输入在
/// [`validate`](Self::validate) 里检查。
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 设备端口（如 `/dev/ttyUSB0`、`COM3`）
    pub port: String,
    /// 波特率（正整数，常用 9600/115200 等）
    pub baud_rate: u32,
    /// 列定义
    pub schema: Schema,
    /// 导出目标路径
    pub output: PathBuf,
    /// 导出格式
    pub format: ExportFormat,
}

impl SessionConfig {
    /// 校验配置
    ///
    /// # 错误
    /// - `SessionError::Config`: 端口为空或波特率非正
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.port.trim().is_empty() {
            return Err(SessionError::Config("port identifier is empty".into()));
        }
        if self.baud_rate == 0 {
            return Err(SessionError::Config("baud rate must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SessionConfig {
        SessionConfig {
            port: "/dev/ttyUSB0".into(),
            baud_rate: 9600,
            schema: Schema::from_spec("a,b").unwrap(),
            output: PathBuf::from("out.csv"),
            format: ExportFormat::Csv,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_empty_port_rejected() {
        let mut config = base_config();
        config.port = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_zero_baud_rejected() {
        let mut config = base_config();
        config.baud_rate = 0;
        assert!(matches!(
            config.validate(),
            Err(SessionError::Config(_))
        ));
    }
}
