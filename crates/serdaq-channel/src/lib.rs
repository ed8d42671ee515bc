//! # Serdaq Channel 适配层
//!
//! 串口设备抽象层，提供统一的按行读取接口。
//!
//! 上层（采集线程）只依赖 [`LineChannel`] trait：
//! 带超时的非阻塞按行轮询 + 幂等关闭。
//! 具体后端由 [`serial::SerialLineChannel`]（真实串口）和
//! `mock::MockLineChannel`（测试脚本源，`mock` feature）提供。

use std::time::Duration;
use thiserror::Error;

pub mod ports;
pub mod serial;

pub use ports::{PortInfo, list_ports};
pub use serial::SerialLineChannel;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::{MockHandle, MockLineChannel};

/// 通道层统一错误类型
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(#[from] DeviceError),
    #[error("Decode error, line discarded: {0}")]
    Decode(String),
    #[error("Channel is closed")]
    Closed,
}

/// 设备/后端错误的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceErrorKind {
    Unknown,
    NotFound,
    NoDevice,
    AccessDenied,
    Busy,
    InvalidConfig,
    Backend,
}

/// 结构化设备错误
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct DeviceError {
    pub kind: DeviceErrorKind,
    pub message: String,
}

impl DeviceError {
    pub fn new(kind: DeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// 是否为会话级致命错误（设备丢失/无权限，继续轮询没有意义）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            DeviceErrorKind::NoDevice | DeviceErrorKind::AccessDenied | DeviceErrorKind::NotFound
        )
    }
}

impl From<String> for DeviceError {
    fn from(message: String) -> Self {
        Self::new(DeviceErrorKind::Unknown, message)
    }
}

impl From<&str> for DeviceError {
    fn from(message: &str) -> Self {
        Self::new(DeviceErrorKind::Unknown, message)
    }
}

impl ChannelError {
    /// 是否为会话级致命错误
    pub fn is_fatal(&self) -> bool {
        match self {
            ChannelError::Device(e) => e.is_fatal(),
            ChannelError::Closed => true,
            _ => false,
        }
    }
}

/// 按行读取的通道抽象
///
/// 采集循环唯一依赖的接口。实现方约定：
///
/// - `read_line` 具有轮询语义：在读超时内没有完整行就返回 `Ok(None)`，
///   绝不无限阻塞（取消响应以此为界）
/// - 非法字节序列整行丢弃并返回 `ChannelError::Decode`，后续行继续可读
/// - `close` 幂等，可多次调用
pub trait LineChannel {
    /// 读取下一条以换行结尾的行（不含行结束符）
    ///
    /// # 返回
    /// - `Ok(Some(line))`: 超时内有完整行
    /// - `Ok(None)`: 超时内无数据（正常情况）
    fn read_line(&mut self) -> Result<Option<String>, ChannelError>;

    /// 设置读超时（轮询间隔上限）
    fn set_read_timeout(&mut self, _timeout: Duration) {}

    /// 关闭通道并释放设备（幂等）
    fn close(&mut self);
}
