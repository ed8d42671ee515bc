//! 采集循环模块
//!
//! 负责后台采集线程的按行读取、解析和缓冲写入逻辑。

use crate::context::AcquireContext;
use crate::events::{EventHub, SessionEvent};
use crate::state::SessionState;
use serdaq_channel::{ChannelError, LineChannel};
use serdaq_record::{Schema, parse_line};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// 采集循环配置
///
/// # Example
///
/// ```
/// use serdaq_driver::AcquireConfig;
///
/// // 默认配置（50ms 读超时）
/// let config = AcquireConfig::default();
///
/// // 自定义配置
/// let config = AcquireConfig { read_timeout_ms: 20 };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireConfig {
    /// 读超时（毫秒）
    ///
    /// 同时是取消延迟的上限：stop 标志在每次迭代开始时检查，
    /// 一次 `read_line` 最多阻塞这么久（保持在 100ms 以内）。
    pub read_timeout_ms: u64,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self { read_timeout_ms: 50 }
    }
}

/// 采集线程主循环
///
/// 通道被移动进循环独占持有；循环退出时在此处关闭通道（恰好一次）、
/// 把状态置为 Stopped 并发出 [`SessionEvent::Stopped`]。
///
/// # 行为
///
/// - **Running**: 轮询 `read_line`；完整行交给解析器；接受的记录写入
///   缓冲并发出实时事件；拒绝/解码失败逐行丢弃（记入计数，不致命）
/// - **Paused**: 仍然轮询，但读到的数据直接丢弃（不解析、不入缓冲、
///   不发事件）——保持对 resume/stop 的及时响应，同时不让暂停期间
///   的数据在恢复后补录
/// - **停止**: `stop_flag` 在每次迭代顶端检查，延迟上界为一个读超时；
///   致命设备错误（拔出等）等价于停止，并附带一条 Fault 事件
///
/// # 参数
/// - `channel`: 按行通道（移动进线程独占）
/// - `schema`: 本会话的列定义
/// - `ctx`: 共享状态上下文
/// - `events`: 事件发送端
/// - `config`: 循环配置
pub fn acquire_loop(
    mut channel: impl LineChannel,
    schema: Schema,
    ctx: Arc<AcquireContext>,
    events: EventHub,
    config: AcquireConfig,
) {
    channel.set_read_timeout(Duration::from_millis(config.read_timeout_ms));

    info!("Acquisition loop started ({} columns)", schema.len());

    loop {
        // 检查停止标志
        // Acquire: 看到 true 时必须看到停止方之前的全部写入
        if ctx.stop_flag.load(Ordering::Acquire) {
            trace!("Acquisition loop: stop flag observed, exiting");
            break;
        }

        // ============================================================
        // 暂停：读出并丢弃，不解析不入缓冲
        // ============================================================
        if ctx.state.get(Ordering::Acquire) == SessionState::Paused {
            match channel.read_line() {
                Ok(Some(line)) => {
                    ctx.counters.lines_discarded_paused.fetch_add(1, Ordering::Relaxed);
                    trace!("Paused, discarding line: {:?}", line);
                },
                Ok(None) => {},
                Err(e) if e.is_fatal() => {
                    error!("Fatal channel error while paused: {}", e);
                    events.emit(SessionEvent::Fault(e.to_string()));
                    break;
                },
                // 行级错误在暂停期间同样只是丢弃
                Err(_) => {},
            }
            continue;
        }

        // ============================================================
        // 1. 读取下一行（带超时，避免阻塞）
        // ============================================================
        let line = match channel.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                // 超时是正常情况：回到循环顶端重新检查控制标志
                continue;
            },
            Err(ChannelError::Decode(msg)) => {
                // 解码失败：整行丢弃，继续读
                ctx.counters.decode_errors.fetch_add(1, Ordering::Relaxed);
                debug!("Decode error, line dropped: {}", msg);
                continue;
            },
            Err(e) if e.is_fatal() => {
                // 设备丢失等致命错误：按停止处理，已缓冲数据保留
                error!("Fatal channel error: {}", e);
                events.emit(SessionEvent::Fault(e.to_string()));
                break;
            },
            Err(e) => {
                warn!("Channel read error: {}", e);
                continue;
            },
        };

        // ============================================================
        // 2. 解析并写入缓冲
        // ============================================================
        ctx.counters.lines_total.fetch_add(1, Ordering::Relaxed);

        match parse_line(&line, &schema) {
            Ok(record) => {
                ctx.buffer.append(record);
                ctx.counters.records_accepted.fetch_add(1, Ordering::Relaxed);
                // 事件携带原始行，仅供展示
                events.emit(SessionEvent::Line(line));
            },
            Err(rejected) => {
                ctx.counters.lines_rejected.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Line rejected ({} fields, expected {}): {:?}",
                    rejected.found, rejected.expected, rejected.line
                );
            },
        }
    }

    // 循环退出：关闭通道（恰好一次），进入 Stopped
    channel.close();
    ctx.state.set(SessionState::Stopped, Ordering::Release);
    events.emit(SessionEvent::Stopped);

    let snap = ctx.counters.snapshot();
    info!(
        "Acquisition loop finished: {} accepted, {} rejected, {} decode errors",
        snap.records_accepted, snap.lines_rejected, snap.decode_errors
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AtomicSessionState;
    use serdaq_channel::MockLineChannel;
    use std::time::Instant;

    fn wait_until(deadline_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_millis(deadline_ms);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        cond()
    }

    fn spawn_loop(
        channel: MockLineChannel,
        events: EventHub,
    ) -> (Arc<AcquireContext>, std::thread::JoinHandle<()>) {
        let schema = Schema::from_spec("Temperature,Humidity").unwrap();
        let ctx = Arc::new(AcquireContext {
            state: AtomicSessionState::new(SessionState::Running),
            ..AcquireContext::new()
        });

        let handle = {
            let ctx = ctx.clone();
            std::thread::spawn(move || {
                acquire_loop(channel, schema, ctx, events, AcquireConfig::default())
            })
        };

        (ctx, handle)
    }

    #[test]
    fn test_accepted_and_rejected_lines() {
        let (channel, mock) = MockLineChannel::new();
        let (events, _rx) = EventHub::new(64);
        let (ctx, handle) = spawn_loop(channel, events);

        // 两条合法行夹一条坏行
        mock.push_line("21.5,40");
        mock.push_line("bad line");
        mock.push_line("22.0,41");

        assert!(wait_until(2000, || ctx.buffer.len() == 2));

        ctx.stop_flag.store(true, Ordering::Release);
        handle.join().unwrap();

        let snapshot = ctx.buffer.snapshot();
        assert_eq!(snapshot[0].fields(), &["21.5", "40"]);
        assert_eq!(snapshot[1].fields(), &["22.0", "41"]);

        let counts = ctx.counters.snapshot();
        assert_eq!(counts.records_accepted, 2);
        assert_eq!(counts.lines_rejected, 1);
    }

    #[test]
    fn test_stop_flag_exits_and_closes_channel() {
        let (channel, mock) = MockLineChannel::new();
        let (events, rx) = EventHub::new(64);
        let (ctx, handle) = spawn_loop(channel, events);

        ctx.stop_flag.store(true, Ordering::Release);
        handle.join().unwrap();

        assert_eq!(ctx.state.get(Ordering::Acquire), SessionState::Stopped);
        assert_eq!(mock.close_count(), 1);
        // 最后一条事件是 Stopped
        let last = rx.try_iter().last();
        assert_eq!(last, Some(SessionEvent::Stopped));
    }

    #[test]
    fn test_decode_error_is_per_line_drop() {
        let (channel, mock) = MockLineChannel::new();
        let (events, _rx) = EventHub::new(64);
        let (ctx, handle) = spawn_loop(channel, events);

        mock.push_line("21.5,40");
        mock.push_decode_error();
        mock.push_line("22.0,41");

        assert!(wait_until(2000, || ctx.buffer.len() == 2));
        assert_eq!(ctx.counters.snapshot().decode_errors, 1);

        ctx.stop_flag.store(true, Ordering::Release);
        handle.join().unwrap();
    }

    #[test]
    fn test_fatal_error_stops_session_with_fault_event() {
        let (channel, mock) = MockLineChannel::new();
        let (events, rx) = EventHub::new(64);
        let (ctx, handle) = spawn_loop(channel, events);

        mock.push_line("21.5,40");
        mock.push_fatal_error();

        handle.join().unwrap();

        // 已缓冲的数据保留，通道关闭，状态 Stopped
        assert_eq!(ctx.buffer.len(), 1);
        assert_eq!(ctx.state.get(Ordering::Acquire), SessionState::Stopped);
        assert_eq!(mock.close_count(), 1);

        let received: Vec<_> = rx.try_iter().collect();
        assert!(received.iter().any(|e| matches!(e, SessionEvent::Fault(_))));
        assert_eq!(received.last(), Some(&SessionEvent::Stopped));
    }

    #[test]
    fn test_paused_discards_lines() {
        let (channel, mock) = MockLineChannel::new();
        let (events, _rx) = EventHub::new(64);
        let (ctx, handle) = spawn_loop(channel, events);

        // 切到 Paused 后注入的行必须被丢弃
        assert!(ctx.state.compare_exchange(
            SessionState::Running,
            SessionState::Paused,
            Ordering::AcqRel,
            Ordering::Acquire
        ));
        // 状态切换的生效延迟上界是一个轮询间隔，等过这一拍再注入
        std::thread::sleep(Duration::from_millis(20));
        mock.push_line("23.0,42");

        assert!(wait_until(2000, || mock.pending() == 0));
        assert!(wait_until(2000, || {
            ctx.counters.snapshot().lines_discarded_paused == 1
        }));
        assert_eq!(ctx.buffer.len(), 0);

        // 恢复后新行正常进入缓冲（同样先等切换生效）
        assert!(ctx.state.compare_exchange(
            SessionState::Paused,
            SessionState::Running,
            Ordering::AcqRel,
            Ordering::Acquire
        ));
        std::thread::sleep(Duration::from_millis(20));
        mock.push_line("24.0,43");
        assert!(wait_until(2000, || ctx.buffer.len() == 1));

        ctx.stop_flag.store(true, Ordering::Release);
        handle.join().unwrap();

        let snapshot = ctx.buffer.snapshot();
        assert_eq!(snapshot[0].fields(), &["24.0", "43"]);
    }
}
