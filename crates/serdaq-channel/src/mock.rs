//! Mock 通道（`mock` feature）
//!
//! 脚本化行来源，供 driver/session 的无硬件测试使用。
//! 测试通过 [`MockHandle`] 在任意时刻注入行/故障，
//! 并观察关闭次数（验证 close 恰好一次的约定）。

use crate::{ChannelError, DeviceError, DeviceErrorKind, LineChannel};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 脚本条目
#[derive(Debug, Clone)]
enum MockYield {
    /// 一条完整行
    Line(String),
    /// 解码失败（该行丢弃）
    DecodeError,
    /// 致命设备错误（设备拔出）
    FatalError,
}

/// 测试侧句柄：注入数据、观察通道行为
#[derive(Clone)]
pub struct MockHandle {
    queue: Arc<Mutex<VecDeque<MockYield>>>,
    close_count: Arc<AtomicUsize>,
}

impl MockHandle {
    /// 注入一条行（相当于设备发来 `line\n`）
    pub fn push_line(&self, line: impl Into<String>) {
        self.queue.lock().unwrap().push_back(MockYield::Line(line.into()));
    }

    /// 注入一次解码失败
    pub fn push_decode_error(&self) {
        self.queue.lock().unwrap().push_back(MockYield::DecodeError);
    }

    /// 注入一次致命设备错误
    pub fn push_fatal_error(&self) {
        self.queue.lock().unwrap().push_back(MockYield::FatalError);
    }

    /// 尚未被读走的条目数
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// `close()` 被调用的次数
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

/// 脚本化的 [`LineChannel`] 实现
pub struct MockLineChannel {
    queue: Arc<Mutex<VecDeque<MockYield>>>,
    close_count: Arc<AtomicUsize>,
    closed: bool,
    /// 队列为空时模拟读超时的等待时长
    idle_wait: Duration,
}

impl MockLineChannel {
    /// 创建通道与测试句柄
    pub fn new() -> (Self, MockHandle) {
        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let close_count = Arc::new(AtomicUsize::new(0));

        let handle = MockHandle {
            queue: queue.clone(),
            close_count: close_count.clone(),
        };

        let channel = Self {
            queue,
            close_count,
            closed: false,
            idle_wait: Duration::from_millis(1),
        };

        (channel, handle)
    }
}

impl LineChannel for MockLineChannel {
    fn read_line(&mut self) -> Result<Option<String>, ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }

        let entry = self.queue.lock().unwrap().pop_front();
        match entry {
            Some(MockYield::Line(line)) => Ok(Some(line)),
            Some(MockYield::DecodeError) => {
                Err(ChannelError::Decode("scripted decode failure".into()))
            },
            Some(MockYield::FatalError) => Err(ChannelError::Device(DeviceError::new(
                DeviceErrorKind::NoDevice,
                "scripted device loss",
            ))),
            None => {
                // 模拟读超时：真实串口在这里会阻塞到 timeout
                std::thread::sleep(self.idle_wait);
                Ok(None)
            },
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) {
        // 把轮询上限压到很小，测试不用等
        self.idle_wait = timeout.min(Duration::from_millis(1));
    }

    fn close(&mut self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_yields_in_order() {
        let (mut channel, handle) = MockLineChannel::new();
        handle.push_line("a,1");
        handle.push_line("b,2");

        assert_eq!(channel.read_line().unwrap(), Some("a,1".to_string()));
        assert_eq!(channel.read_line().unwrap(), Some("b,2".to_string()));
        assert_eq!(channel.read_line().unwrap(), None);
    }

    #[test]
    fn test_mock_scripted_errors() {
        let (mut channel, handle) = MockLineChannel::new();
        handle.push_decode_error();
        handle.push_fatal_error();

        assert!(matches!(
            channel.read_line(),
            Err(ChannelError::Decode(_))
        ));
        match channel.read_line() {
            Err(ChannelError::Device(e)) => assert!(e.is_fatal()),
            other => panic!("expected fatal device error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_mock_close_counts_calls() {
        let (mut channel, handle) = MockLineChannel::new();
        assert_eq!(handle.close_count(), 0);
        channel.close();
        channel.close();
        assert_eq!(handle.close_count(), 2);
        assert!(matches!(channel.read_line(), Err(ChannelError::Closed)));
    }

    #[test]
    fn test_mock_injection_after_creation() {
        let (mut channel, handle) = MockLineChannel::new();
        assert_eq!(channel.read_line().unwrap(), None);
        handle.push_line("late,1");
        assert_eq!(channel.read_line().unwrap(), Some("late,1".to_string()));
        assert_eq!(handle.pending(), 0);
    }
}
