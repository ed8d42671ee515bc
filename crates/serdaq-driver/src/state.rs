//! 会话状态定义
//!
//! 定义采集会话的生命周期状态，用于控制采集线程行为。

use std::sync::atomic::{AtomicU8, Ordering};

/// 采集会话状态
///
/// # 状态转换
///
/// ```text
/// Idle --start--> Running
/// Running --pause--> Paused
/// Paused --resume--> Running
/// Running --stop--> Stopped
/// Paused --stop--> Stopped
/// ```
///
/// 会话内转换是单向的，唯一的往返是 Paused ↔ Running。
/// Stopped 之后只有新的 `start()` 会经由隐式重置重新进入 Idle。
///
/// # 所有权
///
/// 状态由采集线程独占持有并推进；控制线程只读（用于决策），
/// 状态切换只通过定义好的操作（pause/resume/stop）完成。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SessionState {
    /// 空闲（初始状态，未开始采集）
    #[default]
    Idle = 0,

    /// 采集中（读循环正在读取并解析）
    Running = 1,

    /// 暂停（读循环仍在运行，但丢弃到达的数据）
    Paused = 2,

    /// 已停止（通道已关闭，等待导出）
    Stopped = 3,
}

impl SessionState {
    /// 从 u8 转换
    ///
    /// 如果值无效，返回 Idle。
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Paused,
            3 => Self::Stopped,
            _ => Self::Idle, // 无效值默认为 Idle
        }
    }

    /// 转换为 u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// 是否处于活动状态（通道应当保持打开）
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// 会话状态（原子版本，用于线程间共享）
///
/// # 使用场景
///
/// - 采集线程读取状态决定是否读取/解析
/// - 控制线程通过 `compare_exchange` 完成 pause/resume 切换
#[derive(Debug)]
pub struct AtomicSessionState {
    inner: AtomicU8,
}

impl AtomicSessionState {
    /// 创建新的原子状态
    pub fn new(state: SessionState) -> Self {
        Self {
            inner: AtomicU8::new(state.as_u8()),
        }
    }

    /// 获取当前状态
    pub fn get(&self, ordering: Ordering) -> SessionState {
        SessionState::from_u8(self.inner.load(ordering))
    }

    /// 设置状态
    pub fn set(&self, state: SessionState, ordering: Ordering) {
        self.inner.store(state.as_u8(), ordering);
    }

    /// 比较并交换
    ///
    /// 当前状态等于 `current` 时切换为 `new` 并返回 true，否则返回 false。
    /// pause/resume 用它保证只在匹配的状态上生效。
    pub fn compare_exchange(
        &self,
        current: SessionState,
        new: SessionState,
        success: Ordering,
        failure: Ordering,
    ) -> bool {
        self.inner
            .compare_exchange(current.as_u8(), new.as_u8(), success, failure)
            .is_ok()
    }
}

impl Default for AtomicSessionState {
    fn default() -> Self {
        Self::new(SessionState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_conversions() {
        assert_eq!(SessionState::Idle.as_u8(), 0);
        assert_eq!(SessionState::Running.as_u8(), 1);
        assert_eq!(SessionState::Paused.as_u8(), 2);
        assert_eq!(SessionState::Stopped.as_u8(), 3);

        assert_eq!(SessionState::from_u8(1), SessionState::Running);
        assert_eq!(SessionState::from_u8(255), SessionState::Idle); // 无效值
    }

    #[test]
    fn test_is_active() {
        assert!(SessionState::Running.is_active());
        assert!(SessionState::Paused.is_active());
        assert!(!SessionState::Idle.is_active());
        assert!(!SessionState::Stopped.is_active());
    }

    #[test]
    fn test_atomic_state_pause_resume_cycle() {
        let state = AtomicSessionState::new(SessionState::Running);

        // Running -> Paused
        assert!(state.compare_exchange(
            SessionState::Running,
            SessionState::Paused,
            Ordering::AcqRel,
            Ordering::Acquire
        ));
        assert_eq!(state.get(Ordering::Acquire), SessionState::Paused);

        // 重复 pause 无效
        assert!(!state.compare_exchange(
            SessionState::Running,
            SessionState::Paused,
            Ordering::AcqRel,
            Ordering::Acquire
        ));

        // Paused -> Running
        assert!(state.compare_exchange(
            SessionState::Paused,
            SessionState::Running,
            Ordering::AcqRel,
            Ordering::Acquire
        ));
        assert_eq!(state.get(Ordering::Acquire), SessionState::Running);
    }

    #[test]
    fn test_default_is_idle() {
        let state = AtomicSessionState::default();
        assert_eq!(state.get(Ordering::Acquire), SessionState::Idle);
    }
}
