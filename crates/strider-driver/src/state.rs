//! 链路状态定义
//!
//! IO 线程是状态的唯一写者，观察方（状态读取、操作界面）只读。

use std::sync::atomic::{AtomicU8, Ordering};

/// 运动链路状态
///
/// 初始即 `Connecting`（构造时同步完成首次连接）；IO 故障进入
/// `Reconnecting` 并按固定间隔重试，恢复后回到 `Connected`。
/// `Closed` 仅在进程关停时出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LinkState {
    /// 正在建立串口连接
    #[default]
    Connecting = 0,
    /// 链路正常，按 tick 收发
    Connected = 1,
    /// IO 故障后按固定间隔重试连接
    Reconnecting = 2,
    /// 进程关停，IO 线程已退出
    Closed = 3,
}

impl LinkState {
    /// 从 u8 转换；无效值视为 Connecting
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Connected,
            2 => Self::Reconnecting,
            3 => Self::Closed,
            _ => Self::Connecting,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// 链路状态（原子版本，线程间共享）
#[derive(Debug)]
pub struct AtomicLinkState {
    inner: AtomicU8,
}

impl AtomicLinkState {
    pub fn new(state: LinkState) -> Self {
        Self {
            inner: AtomicU8::new(state.as_u8()),
        }
    }

    pub fn get(&self, order: Ordering) -> LinkState {
        LinkState::from_u8(self.inner.load(order))
    }

    pub fn set(&self, state: LinkState, order: Ordering) {
        self.inner.store(state.as_u8(), order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_state_u8_roundtrip() {
        for state in [
            LinkState::Connecting,
            LinkState::Connected,
            LinkState::Reconnecting,
            LinkState::Closed,
        ] {
            assert_eq!(LinkState::from_u8(state.as_u8()), state);
        }
        assert_eq!(LinkState::from_u8(200), LinkState::Connecting);
    }

    #[test]
    fn test_atomic_link_state() {
        let state = AtomicLinkState::new(LinkState::Connecting);
        assert_eq!(state.get(Ordering::Relaxed), LinkState::Connecting);
        state.set(LinkState::Reconnecting, Ordering::Relaxed);
        assert_eq!(state.get(Ordering::Relaxed), LinkState::Reconnecting);
    }
}
