//! 会话层错误类型定义

use serdaq_channel::ChannelError;
use serdaq_export::ExportError;
use thiserror::Error;

/// 会话层错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    /// 设备无法打开（会话启动失败，不产生任何部分状态）
    #[error("Connection error: {0}")]
    Connection(#[source] ChannelError),

    /// 配置不合法
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// 导出失败（仅导出这一步致命；通道此时已关闭，缓冲数据保留）
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// 已有活动会话
    #[error("Session already active")]
    AlreadyActive,

    /// 没有活动会话
    #[error("No active session")]
    NotActive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serdaq_channel::{DeviceError, DeviceErrorKind};

    #[test]
    fn test_connection_error_display() {
        let channel_error: ChannelError =
            DeviceError::new(DeviceErrorKind::NotFound, "no such port").into();
        let e = SessionError::Connection(channel_error);
        let msg = format!("{}", e);
        assert!(msg.contains("Connection error"));
        assert!(msg.contains("no such port"));
    }
}
