//! # Strider Motion Link Driver
//!
//! 运动链路驱动层：独占串口传输、以固定节奏驱动协议交换、
//! 负责断线重连。
//!
//! - IO 线程管理（spawn / 运行标志 / 限时 join）
//! - 状态同步（ArcSwap 无锁读取：待发意图邮箱、最近遥测帧）
//! - 链路状态机：`Connecting → Connected → Reconnecting → …`
//!   （进程退出前没有终态，链路总是尝试恢复）
//!
//! 命令传递是"最后写入生效"的邮箱语义：链路每 tick 发送最近一次
//! 意图，从不排队、从不重放（at-most-once）。

mod context;
mod error;
pub mod pipeline;
mod link;
mod state;

pub use context::LinkContext;
pub use error::DriverError;
pub use link::MotionLink;
pub use pipeline::{LinkConfig, io_loop};
pub use state::{AtomicLinkState, LinkState};
