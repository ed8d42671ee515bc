//! 共享状态上下文
//!
//! 采集线程与控制线程之间的全部共享可变状态集中在这里，
//! 以 `Arc<AcquireContext>` 的形式在两侧传递。

use crate::buffer::RecordBuffer;
use crate::counters::AcquireCounters;
use crate::state::AtomicSessionState;
use std::sync::atomic::AtomicBool;

/// 一次会话的共享上下文
///
/// - `buffer` 是唯一的共享可变存储（互斥锁内只做内存操作）
/// - `state` / `stop_flag` 是控制面（原子量，无锁）
/// - `counters` 只用于诊断
///
/// 每次 `start` 创建一个全新的上下文，旧上下文随句柄自然回收，
/// 这就是"重新 start 经由 Idle 隐式重置"的实现方式。
#[derive(Debug, Default)]
pub struct AcquireContext {
    /// 记录缓冲
    pub buffer: RecordBuffer,
    /// 会话状态
    pub state: AtomicSessionState,
    /// 停止标志（控制线程置位，采集线程每次迭代检查）
    pub stop_flag: AtomicBool,
    /// 采集计数
    pub counters: AcquireCounters,
}

impl AcquireContext {
    /// 创建新的上下文（Idle 状态，空缓冲）
    pub fn new() -> Self {
        Self::default()
    }
}
