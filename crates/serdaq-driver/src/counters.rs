//! 采集计数器
//!
//! 松弛原子计数，采集线程写、任意线程读。只用于诊断与结束摘要，
//! 不参与任何控制决策。

use std::sync::atomic::{AtomicU64, Ordering};

/// 采集过程的累计计数
#[derive(Debug, Default)]
pub struct AcquireCounters {
    /// 从通道读到的完整行总数（含被拒绝的）
    pub lines_total: AtomicU64,
    /// 被接受并写入缓冲的记录数
    pub records_accepted: AtomicU64,
    /// 字段数不符被拒绝的行数
    pub lines_rejected: AtomicU64,
    /// 解码失败被丢弃的行数
    pub decode_errors: AtomicU64,
    /// 暂停期间被丢弃的行数
    pub lines_discarded_paused: AtomicU64,
}

impl AcquireCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取一份普通结构体快照
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            lines_total: self.lines_total.load(Ordering::Relaxed),
            records_accepted: self.records_accepted.load(Ordering::Relaxed),
            lines_rejected: self.lines_rejected.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            lines_discarded_paused: self.lines_discarded_paused.load(Ordering::Relaxed),
        }
    }
}

/// 某一时刻的计数快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub lines_total: u64,
    pub records_accepted: u64,
    pub lines_rejected: u64,
    pub decode_errors: u64,
    pub lines_discarded_paused: u64,
}
