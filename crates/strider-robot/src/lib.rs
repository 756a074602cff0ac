//! # Strider Robot
//!
//! 模式仲裁与机器人组合根。
//!
//! - [`mode`]: 封闭的模式注册表（构建期已知全集，无运行时加载）、
//!   手动模式参数化配置、策略驱动模式的外部引擎接缝
//! - [`ModeManager`]: `Disabled → Enabling → Enabled → Disabling`
//!   状态机，独占机器人运动输出的所有权仲裁
//! - [`Robot`]: 组合根，接线输入聚合、运动链路、监督与心跳任务，
//!   向外部协作方（控制面板、指示灯）暴露
//!   `enable` / `disable` / `read_status`

pub mod heartbeat;
pub mod manager;
pub mod mode;
pub mod robot;

mod error;

pub use error::RobotError;
pub use heartbeat::StatusLed;
pub use manager::{ManagerState, ModeManager};
pub use mode::{ManualConfig, ModeName, PolicyFactory, PolicyRegistry, PolicySource};
pub use robot::{Robot, RobotBuilder, RobotConfig, RobotStatus};
