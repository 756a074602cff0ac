//! 链路共享状态上下文
//!
//! 单写者/多读者纪律由构造保证：
//! - `pending` 只由当前 Mode（经 `MotionLink::move_intent`/`stop`）覆写
//! - `enabled`/`mode_id` 只由模式管理器写入
//! - `state`/`status` 只由 IO 线程写入
//!
//! 所有读取无锁（ArcSwap / 原子量）。

use std::sync::atomic::{AtomicBool, AtomicI8, Ordering};

use arc_swap::ArcSwap;
use strider_protocol::{MotionIntent, RemoteCommand, StatusFrame};

use crate::state::{AtomicLinkState, LinkState};

/// 链路共享状态
pub struct LinkContext {
    /// 待发意图邮箱（最后写入生效，无队列）
    pub(crate) pending: ArcSwap<MotionIntent>,
    /// 使能标志（模式管理器独占写入）
    pub(crate) enabled: AtomicBool,
    /// 当前模式 id（未使能时为 0）
    pub(crate) mode_id: AtomicI8,
    /// 链路状态（IO 线程独占写入）
    pub(crate) state: AtomicLinkState,
    /// IO 线程运行标志
    pub(crate) running: AtomicBool,
    /// 最近一帧解码成功的遥测
    pub(crate) status: ArcSwap<StatusFrame>,
}

impl LinkContext {
    pub fn new() -> Self {
        Self {
            pending: ArcSwap::from_pointee(MotionIntent::stopped()),
            enabled: AtomicBool::new(false),
            mode_id: AtomicI8::new(0),
            state: AtomicLinkState::new(LinkState::Connecting),
            running: AtomicBool::new(true),
            status: ArcSwap::from_pointee(StatusFrame::default()),
        }
    }

    /// 构建本 tick 的出向命令帧
    ///
    /// 未使能时无条件发送停止帧，与邮箱内容无关——这保证了
    /// 除 `Enabled` 外的一切状态下机器人收到的都是停止意图。
    pub(crate) fn build_command(&self) -> RemoteCommand {
        if !self.enabled.load(Ordering::Acquire) {
            return RemoteCommand::stopped();
        }
        RemoteCommand {
            enabled: true,
            mode_id: self.mode_id.load(Ordering::Acquire),
            intent: **self.pending.load(),
        }
    }
}
