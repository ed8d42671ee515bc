//! 会话控制器

use crate::config::SessionConfig;
use crate::error::SessionError;
use crossbeam_channel::Receiver;
use serdaq_channel::{LineChannel, SerialLineChannel};
use serdaq_driver::{
    AcquireConfig, AcquireContext, CounterSnapshot, EventHub, SessionEvent, SessionState, Worker,
};
use serdaq_export::{ExportSummary, export};
use std::sync::Arc;
use tracing::{info, warn};

/// 一次采集会话的生命周期权威
///
/// 保证（对每个会话、无论正常停止还是表示层被打断）：
/// - 通道恰好关闭一次（在采集循环内部完成）
/// - 导出恰好尝试一次（`stop()` 取走 Worker 句柄后的唯一消费点）
/// - 缓冲只在导出成功后重置（失败时数据保留，可显式重置）
///
/// Drop 时如仍有活动会话，会走与 `stop()` 相同的收尾路径，
/// 因此进程级中断（Ctrl-C 处理器里调用 `stop()`，或直接退出作用域）
/// 与显式停止等价。
///
/// # Example
///
/// ```no_run
/// use serdaq_record::Schema;
/// use serdaq_session::{ExportFormat, SessionConfig, SessionController};
///
/// let config = SessionConfig {
///     port: "/dev/ttyUSB0".into(),
///     baud_rate: 9600,
///     schema: Schema::from_spec("Temperature,Humidity")?,
///     output: "data.csv".into(),
///     format: ExportFormat::Csv,
/// };
///
/// let mut session = SessionController::new(config)?;
/// session.start()?;
/// // ……表示层消费 session.take_events() ……
/// let summary = session.stop()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SessionController {
    config: SessionConfig,
    acquire_config: AcquireConfig,
    /// 当前会话的共享上下文；每次 `start` 换成全新的一份（隐式重置）
    ctx: Arc<AcquireContext>,
    worker: Option<Worker>,
    events: Option<Receiver<SessionEvent>>,
}

impl SessionController {
    /// 创建控制器（校验配置）
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            config,
            acquire_config: AcquireConfig::default(),
            ctx: Arc::new(AcquireContext::new()),
            worker: None,
            events: None,
        })
    }

    /// 覆盖采集循环配置（可选）
    pub fn with_acquire_config(mut self, acquire_config: AcquireConfig) -> Self {
        self.acquire_config = acquire_config;
        self
    }

    /// 打开配置的串口并启动会话
    ///
    /// # 错误
    /// - `SessionError::Connection`: 设备无法打开——不产生任何部分状态，
    ///   缓冲不变、没有采集线程被启动
    /// - `SessionError::AlreadyActive`: 已有活动会话
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.worker.is_some() {
            return Err(SessionError::AlreadyActive);
        }
        let channel = SerialLineChannel::open(&self.config.port, self.config.baud_rate)
            .map_err(SessionError::Connection)?;
        self.start_with_channel(channel)
    }

    /// 用外部提供的通道启动会话
    ///
    /// 测试（mock 通道）和自定义后端共用的入口；
    /// `start()` 只是"打开串口 + 本方法"。
    pub fn start_with_channel(
        &mut self,
        channel: impl LineChannel + Send + 'static,
    ) -> Result<(), SessionError> {
        if self.worker.is_some() {
            return Err(SessionError::AlreadyActive);
        }

        // 重新 start 经由 Idle：全新上下文即隐式重置
        let ctx = Arc::new(AcquireContext::new());
        let (events, rx) = EventHub::with_default_capacity();
        let worker = Worker::spawn(
            channel,
            self.config.schema.clone(),
            ctx.clone(),
            events,
            self.acquire_config.clone(),
        );

        self.ctx = ctx;
        self.worker = Some(worker);
        self.events = Some(rx);
        info!("Session started on {}", self.config.port);
        Ok(())
    }

    /// 取走事件接收端（表示层消费实时行与故障通知）
    ///
    /// 每个会话只有一个接收端；重复调用返回 `None`。
    pub fn take_events(&mut self) -> Option<Receiver<SessionEvent>> {
        self.events.take()
    }

    /// 当前会话状态
    pub fn state(&self) -> SessionState {
        self.ctx.state.get(std::sync::atomic::Ordering::Acquire)
    }

    /// 暂停采集（仅 Running 时生效，返回是否切换）
    pub fn pause(&self) -> Result<bool, SessionError> {
        let worker = self.worker.as_ref().ok_or(SessionError::NotActive)?;
        Ok(worker.pause())
    }

    /// 恢复采集（仅 Paused 时生效，返回是否切换）
    pub fn resume(&self) -> Result<bool, SessionError> {
        let worker = self.worker.as_ref().ok_or(SessionError::NotActive)?;
        Ok(worker.resume())
    }

    /// 停止会话并导出
    ///
    /// 顺序：停止采集线程（通道在循环内关闭）→ 快照 → 导出 → 重置缓冲。
    ///
    /// 幂等：Worker 句柄在这里被取走，因此导出对每个会话至多尝试一次；
    /// 重复调用返回 `Ok(None)`。
    ///
    /// # 错误
    /// - `SessionError::Export`: 导出失败。此时通道已关闭、会话已结束，
    ///   缓冲数据保留（跳过重置），等待显式 [`reset`](Self::reset) 或
    ///   下一次 `start()` 的隐式重置
    pub fn stop(&mut self) -> Result<Option<ExportSummary>, SessionError> {
        let Some(mut worker) = self.worker.take() else {
            return Ok(None);
        };
        self.events = None;

        worker.stop();

        let snapshot = self.ctx.buffer.snapshot();
        let summary = export(
            &snapshot,
            &self.config.schema,
            &self.config.output,
            self.config.format,
        )?;

        self.ctx.buffer.reset();
        info!(
            "Session finished: {} rows exported to {}",
            summary.rows,
            summary.path.display()
        );
        Ok(Some(summary))
    }

    /// 当前缓冲大小
    pub fn buffer_len(&self) -> usize {
        self.ctx.buffer.len()
    }

    /// 采集计数快照（会话结束后仍可读，直到下一次 `start`）
    pub fn counters(&self) -> CounterSnapshot {
        self.ctx.counters.snapshot()
    }

    /// 显式清空缓冲
    ///
    /// # 错误
    /// - `SessionError::AlreadyActive`: 会话仍在活动（有写者时禁止清空）
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.state().is_active() {
            return Err(SessionError::AlreadyActive);
        }
        self.ctx.buffer.reset();
        Ok(())
    }

    /// 会话配置
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if self.worker.is_some() {
            // 表示层没走到显式 stop：仍然关闭通道并尝试一次导出
            if let Err(e) = self.stop() {
                warn!("Session cleanup export failed: {}", e);
            }
        }
    }
}
