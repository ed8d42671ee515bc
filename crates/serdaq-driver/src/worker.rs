//! Worker 模块
//!
//! 持有采集线程句柄，对外提供 pause/resume/stop 生命周期操作。

use crate::context::AcquireContext;
use crate::counters::CounterSnapshot;
use crate::events::EventHub;
use crate::pipeline::{AcquireConfig, acquire_loop};
use crate::state::SessionState;
use serdaq_channel::LineChannel;
use serdaq_record::Schema;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::{JoinHandle, spawn};
use tracing::{info, warn};

/// 采集会话的后台执行者
///
/// 通道在 [`spawn`](Self::spawn) 时移动进采集线程，Worker 只保留
/// 共享上下文和线程句柄。假定单一所有者调用：重复 `start` 的防护在
/// 控制层（`serdaq-session`），不在这里。
///
/// # 停止语义
///
/// `stop()` 置位停止标志后 join 采集线程；标志在循环每次迭代顶端
/// 检查，延迟上界为一个读超时。通道关闭发生在循环内部，恰好一次。
/// 句柄被取走后再次 `stop()` 直接返回 false（幂等）。
pub struct Worker {
    ctx: Arc<AcquireContext>,
    /// 采集线程句柄（stop/Drop 时 join）
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// 启动采集线程，状态进入 Running
    ///
    /// # 参数
    /// - `channel`: 已打开的通道（移动进线程）
    /// - `schema`: 本会话的列定义
    /// - `ctx`: 共享状态上下文（调用方保留一份用于读取缓冲/计数）
    /// - `events`: 事件发送端
    /// - `config`: 循环配置
    pub fn spawn(
        channel: impl LineChannel + Send + 'static,
        schema: Schema,
        ctx: Arc<AcquireContext>,
        events: EventHub,
        config: AcquireConfig,
    ) -> Self {
        ctx.state.set(SessionState::Running, Ordering::Release);

        let handle = {
            let ctx = ctx.clone();
            spawn(move || {
                acquire_loop(channel, schema, ctx, events, config);
            })
        };

        Self {
            ctx,
            handle: Some(handle),
        }
    }

    /// 当前会话状态
    pub fn state(&self) -> SessionState {
        self.ctx.state.get(Ordering::Acquire)
    }

    /// Running → Paused
    ///
    /// 只在 Running 时生效；返回是否完成切换。
    pub fn pause(&self) -> bool {
        let switched = self.ctx.state.compare_exchange(
            SessionState::Running,
            SessionState::Paused,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if switched {
            info!("Acquisition paused");
        }
        switched
    }

    /// Paused → Running
    ///
    /// 只在 Paused 时生效；返回是否完成切换。
    pub fn resume(&self) -> bool {
        let switched = self.ctx.state.compare_exchange(
            SessionState::Paused,
            SessionState::Running,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if switched {
            info!("Acquisition resumed");
        }
        switched
    }

    /// 停止采集并等待线程退出
    ///
    /// 可以从任意线程调用。返回本次调用是否真正执行了停止
    /// （句柄已被取走的重复调用返回 false）。
    pub fn stop(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };

        // Release: 采集线程以 Acquire 读取此标志
        self.ctx.stop_flag.store(true, Ordering::Release);

        if handle.join().is_err() {
            warn!("Acquisition thread panicked during join");
        }
        true
    }

    /// 采集线程是否已退出
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }

    /// 当前计数快照
    pub fn counters(&self) -> CounterSnapshot {
        self.ctx.counters.snapshot()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // 保证线程不被遗留：未显式 stop 时在这里走同一条停止路径
        self.stop();
    }
}
