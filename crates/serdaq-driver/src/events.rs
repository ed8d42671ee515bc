//! 实时事件流
//!
//! 采集线程通过有界通道向表示层发送事件。
//!
//! # 设计原则
//!
//! - **Bounded Queue**: 有界队列防止表示层消费过慢导致 OOM
//! - **非阻塞**: 使用 `try_send`，队列满时丢事件而非阻塞采集线程
//! - **丢弃监控**: 提供 `dropped_events` 计数器
//! - **事件 ≠ 数据**: 事件只用于展示；记录本身已进入缓冲，
//!   丢事件绝不丢记录

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 默认队列容量
///
/// 每条事件约为一行文本，足以吸收表示层短暂的卡顿。
pub const DEFAULT_EVENT_CAPACITY: usize = 10_000;

/// 会话事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// 一条被接受的原始行（供实时展示，不用于重建缓冲）
    Line(String),
    /// 会话级故障（设备丢失等）
    Fault(String),
    /// 采集循环已退出，通道已关闭
    Stopped,
}

/// 事件发送端（采集线程持有）
///
/// # Example
///
/// ```
/// use serdaq_driver::{EventHub, SessionEvent};
///
/// let (hub, rx) = EventHub::new(16);
/// hub.emit(SessionEvent::Line("21.5,40".into()));
/// assert_eq!(rx.recv().unwrap(), SessionEvent::Line("21.5,40".into()));
/// ```
#[derive(Clone)]
pub struct EventHub {
    tx: Sender<SessionEvent>,
    dropped_events: Arc<AtomicU64>,
}

impl EventHub {
    /// 创建发送端与接收端
    pub fn new(capacity: usize) -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = bounded(capacity);
        let hub = Self {
            tx,
            dropped_events: Arc::new(AtomicU64::new(0)),
        };
        (hub, rx)
    }

    /// 使用默认容量创建
    pub fn with_default_capacity() -> (Self, Receiver<SessionEvent>) {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }

    /// 发送事件（非阻塞）
    ///
    /// 这里运行在采集线程中，必须极快：
    /// 队列满或接收端已断开时丢弃事件并计数，绝不阻塞。
    #[inline]
    pub fn emit(&self, event: SessionEvent) {
        if self.tx.try_send(event).is_err() {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 丢弃事件计数器的引用（创建时持有，随时可读）
    #[must_use]
    pub fn dropped_events(&self) -> &Arc<AtomicU64> {
        &self.dropped_events
    }

    /// 当前丢弃的事件数
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }
}
