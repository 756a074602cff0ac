//! # Strider Input
//!
//! 手柄输入状态聚合层。
//!
//! 维护单个物理输入设备的实时快照 [`ControllerState`]：
//! 事件泵线程是轴/键字段的唯一写者，电池轮询线程是电量字段的
//! 唯一写者，所有读者通过 [`ControllerHandle::snapshot`] 无锁读取。
//!
//! 逻辑层（事件模型、状态更新规则）与平台无关；evdev 设备发现、
//! 事件泵、sysfs 电池/LED 访问仅在 Linux 上编译（见 [`linux`]）。

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub mod aggregator;
pub mod event;
pub mod state;

#[cfg(target_os = "linux")]
pub mod linux;

pub use aggregator::{BatteryWriter, ControllerHandle, StateWriter, state_cell};
pub use event::{Axis, Button, InputEvent};
pub use state::ControllerState;

/// 输入层错误类型
#[derive(Error, Debug)]
pub enum InputError {
    /// 启动时没有匹配的手柄（致命：无手柄即无遥操作）
    #[error("Controller not found")]
    ControllerNotFound,

    /// 运行中设备断开（可恢复：由组合根转为强制 disable）
    #[error("Controller device lost: {0}")]
    DeviceLost(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

/// 输入设备配置
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// 设备名包含任一子串即视为候选手柄
    pub name_hints: Vec<String>,
    /// 设备名包含任一子串则排除（同一物理设备的子设备）
    pub exclude_hints: Vec<String>,
    /// js 设备的 sysfs 根（电池/LED 路径的基准）
    pub sysfs_root: PathBuf,
    /// 电池轮询周期
    pub battery_interval: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            name_hints: vec!["Sony".to_string(), "Wireless Controller".to_string()],
            exclude_hints: vec!["Motion".to_string(), "Touchpad".to_string()],
            sysfs_root: PathBuf::from("/sys/class/input/js0/"),
            battery_interval: Duration::from_secs(60),
        }
    }
}
