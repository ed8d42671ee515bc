//! 真实串口后端
//!
//! 基于 `serialport` crate 的 [`LineChannel`] 实现。
//!
//! 串口是字节流设备，读超时内到达的字节可能只是半行。
//! [`LineAssembler`] 把分块到达的字节拼成完整行：
//! 按 `\n` 切分、去掉行尾 `\r`、整行做 UTF-8 校验。
//! 非法字节序列只丢弃所在的那一行，后续行不受影响。

use crate::{ChannelError, DeviceError, DeviceErrorKind, LineChannel};
use serialport::SerialPort;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 默认读超时（轮询间隔上限，停止延迟以此为界）
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(50);

/// 单行最大字节数
///
/// 设备不发换行符时挂起缓冲不能无限增长。
/// 超过上限的行整行丢弃（按解码失败处理），缓冲清空后继续。
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// 把分块到达的字节拼成完整行
#[derive(Debug, Default)]
pub(crate) struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 追加一段新到达的字节
    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// 取出下一条完整行（如果有）
    ///
    /// - `None`: 缓冲中还没有完整行
    /// - `Some(Ok(line))`: 一条完整行，已去掉 `\n` 和行尾 `\r`
    /// - `Some(Err(Decode))`: 该行字节非法或超长，整行已丢弃
    pub(crate) fn pop_line(&mut self) -> Option<Result<String, ChannelError>> {
        let Some(pos) = self.pending.iter().position(|&b| b == b'\n') else {
            // 无完整行：检查挂起缓冲是否超限
            if self.pending.len() > MAX_LINE_BYTES {
                let dropped = self.pending.len();
                self.pending.clear();
                return Some(Err(ChannelError::Decode(format!(
                    "line exceeds {} bytes ({} pending), discarded",
                    MAX_LINE_BYTES, dropped
                ))));
            }
            return None;
        };

        let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
        line.pop(); // '\n'
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        match String::from_utf8(line) {
            Ok(text) => Some(Ok(text)),
            Err(e) => {
                let preview = String::from_utf8_lossy(e.as_bytes()).into_owned();
                Some(Err(ChannelError::Decode(format!(
                    "invalid byte sequence in line: {:?}",
                    preview
                ))))
            },
        }
    }
}

/// 串口按行通道
///
/// # Example
///
/// ```no_run
/// use serdaq_channel::{LineChannel, SerialLineChannel};
///
/// let mut channel = SerialLineChannel::open("/dev/ttyUSB0", 9600)?;
/// while let Some(line) = channel.read_line()? {
///     println!("{}", line);
/// }
/// channel.close();
/// # Ok::<(), serdaq_channel::ChannelError>(())
/// ```
pub struct SerialLineChannel {
    /// `None` 表示已关闭（close 幂等的依据）
    port: Option<Box<dyn SerialPort>>,
    assembler: LineAssembler,
    port_name: String,
}

impl std::fmt::Debug for SerialLineChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLineChannel")
            .field("port_name", &self.port_name)
            .field("open", &self.port.is_some())
            .field("assembler", &self.assembler)
            .finish()
    }
}

impl SerialLineChannel {
    /// 打开串口
    ///
    /// # 错误
    /// - `ChannelError::Device`: 设备不存在、无权限、被占用、波特率不支持
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self, ChannelError> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(DEFAULT_READ_TIMEOUT)
            .open()
            .map_err(|e| ChannelError::Device(map_open_error(port_name, &e)))?;

        info!("Serial port {} opened at {} baud", port_name, baud_rate);

        Ok(Self {
            port: Some(port),
            assembler: LineAssembler::new(),
            port_name: port_name.to_string(),
        })
    }

    /// 端口名（用于日志与导出元信息）
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl LineChannel for SerialLineChannel {
    fn read_line(&mut self) -> Result<Option<String>, ChannelError> {
        // 先消费缓冲中已有的完整行，再考虑读设备
        if let Some(line) = self.assembler.pop_line() {
            return line.map(Some);
        }

        let port = self.port.as_mut().ok_or(ChannelError::Closed)?;

        let mut buf = [0u8; 256];
        match port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(n) => {
                self.assembler.extend(&buf[..n]);
                match self.assembler.pop_line() {
                    Some(line) => line.map(Some),
                    None => Ok(None),
                }
            },
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut
                        | std::io::ErrorKind::WouldBlock
                        | std::io::ErrorKind::Interrupted
                ) =>
            {
                // 超时是正常情况：让调用方重新检查控制标志
                Ok(None)
            },
            Err(e) => {
                // 超时以外的读错误：设备大概率已丢失（拔出、驱动报 EIO）
                debug!("Serial read error on {}: {}", self.port_name, e);
                Err(ChannelError::Device(DeviceError::new(
                    DeviceErrorKind::NoDevice,
                    format!("read from {} failed: {}", self.port_name, e),
                )))
            },
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) {
        if let Some(port) = self.port.as_mut()
            && let Err(e) = port.set_timeout(timeout)
        {
            warn!("Failed to set read timeout on {}: {}", self.port_name, e);
        }
    }

    fn close(&mut self) {
        if let Some(port) = self.port.take() {
            drop(port);
            info!("Serial port {} closed", self.port_name);
        }
    }
}

impl Drop for SerialLineChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// serialport 打开错误 → 结构化设备错误
fn map_open_error(port_name: &str, e: &serialport::Error) -> DeviceError {
    let kind = match e.kind() {
        serialport::ErrorKind::NoDevice => DeviceErrorKind::NoDevice,
        serialport::ErrorKind::InvalidInput => DeviceErrorKind::InvalidConfig,
        serialport::ErrorKind::Io(io_kind) => match io_kind {
            std::io::ErrorKind::NotFound => DeviceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => DeviceErrorKind::AccessDenied,
            std::io::ErrorKind::AddrInUse | std::io::ErrorKind::ResourceBusy => {
                DeviceErrorKind::Busy
            },
            _ => DeviceErrorKind::Backend,
        },
        serialport::ErrorKind::Unknown => DeviceErrorKind::Backend,
    };
    DeviceError::new(kind, format!("open {} failed: {}", port_name, e))
}
