//! 采集驱动层
//!
//! 本模块提供采集会话的核心执行机制，包括：
//! - 后台采集线程（带超时轮询的读循环）
//! - 会话状态机 {Idle, Running, Paused, Stopped}
//! - 追加式记录缓冲（单写者 + 并发快照）
//! - 实时事件流（有界队列，满时丢事件不丢记录）
//!
//! # 使用场景
//!
//! 大多数用户应该使用 `serdaq-session` 提供的
//! `SessionController`，而不是直接操作 `Worker`。

pub mod buffer;
pub mod context;
pub mod counters;
pub mod events;
pub mod pipeline;
pub mod state;
mod worker;

pub use buffer::RecordBuffer;
pub use context::AcquireContext;
pub use counters::{AcquireCounters, CounterSnapshot};
pub use events::{EventHub, SessionEvent};
pub use pipeline::{AcquireConfig, acquire_loop};
pub use state::{AtomicSessionState, SessionState};
pub use worker::Worker;
