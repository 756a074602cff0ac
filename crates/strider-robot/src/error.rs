//! 机器人层错误类型定义

use strider_driver::DriverError;
use strider_input::InputError;
use thiserror::Error;

use crate::manager::ManagerState;
use crate::mode::ModeName;

/// 机器人层错误类型
///
/// 只有配置类错误（未知模式名、启动期缺硬件）会传播到调用方；
/// 传输/设备级故障在链路与输入层内部消化。
#[derive(Error, Debug)]
pub enum RobotError {
    /// 模式名不在封闭注册表内（用户错误，保持 Disabled）
    #[error("Unknown mode '{0}'")]
    UnknownMode(String),

    /// 已使能时的重入 enable（拒绝，不排队）
    #[error("Already enabled (active mode: {active})")]
    AlreadyEnabled { active: ModeName },

    /// 管理器处于无法接受 enable 的过渡状态
    #[error("Enable rejected while {0:?}")]
    EnableRejected(ManagerState),

    /// 策略引擎不可用（未注册，或构造失败如相机被占用）
    #[error("Policy engine unavailable for mode '{mode}': {reason}")]
    PolicyUnavailable { mode: ModeName, reason: String },

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}
