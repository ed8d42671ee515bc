//! # 会话编排层
//!
//! [`SessionController`] 是一次采集会话的生命周期权威：
//! 校验配置 → 打开通道 → 启动采集线程 → 转发 pause/resume/stop →
//! 停止时完成快照、恰好一次的导出与缓冲重置。
//!
//! 表示层（CLI/GUI）只调用这里的操作并消费事件流，
//! 不直接接触通道或采集线程。

mod config;
mod controller;
mod error;

pub use config::SessionConfig;
pub use controller::SessionController;
pub use error::SessionError;

// 供表示层使用的下游类型
pub use serdaq_driver::{CounterSnapshot, SessionEvent, SessionState};
pub use serdaq_export::{ExportFormat, ExportSummary};
