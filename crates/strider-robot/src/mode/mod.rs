//! 模式层
//!
//! 行为真正不同的只有两类：读手柄快照的手动模式（参数化配置覆盖
//! 四个手动变体）与由外部策略引擎驱动的策略模式。每个使能周期
//! 恰好存在一个模式实例，随 disable 一起销毁。

mod manual;
mod policy;
mod registry;

pub use manual::{ManualConfig, center_stick, manual_intent};
pub use policy::{PolicyFactory, PolicyRegistry, PolicySource};
pub use registry::ModeName;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use strider_driver::MotionLink;
use strider_input::ControllerHandle;
use strider_protocol::MotionIntent;
use tracing::debug;

use crate::error::RobotError;

/// 一个使能周期内的模式运行体
pub(crate) enum ModeRuntime {
    /// 手柄直通（含预选参数的变体）
    Manual(ManualConfig),
    /// 外部策略引擎产出意图
    Policy(Box<dyn PolicySource>),
}

impl ModeRuntime {
    fn tick(&mut self, controller: &ControllerHandle) -> MotionIntent {
        match self {
            Self::Manual(config) => manual_intent(*config, &controller.snapshot()),
            Self::Policy(source) => source.next_intent(),
        }
    }
}

/// 按名称构造模式运行体
///
/// 构造失败（未注册的策略引擎、引擎设备不可用）直接返回错误，
/// 调用方负责把状态机退回 Disabled——绝不留下半使能状态。
pub(crate) fn build_runtime(
    name: ModeName,
    registry: &PolicyRegistry,
) -> Result<ModeRuntime, RobotError> {
    Ok(match name {
        ModeName::Manual | ModeName::Dance => ModeRuntime::Manual(ManualConfig::full()),
        ModeName::PushUp => ModeRuntime::Manual(ManualConfig::face_buttons_only()),
        ModeName::LegTest => ModeRuntime::Manual(ManualConfig::dpad_only()),
        ModeName::Gesture | ModeName::BallTracking => {
            ModeRuntime::Policy(registry.create(name)?)
        },
    })
}

/// 模式 tick 循环（每次 enable spawn 一个可取消任务）
///
/// 停止标志在每个 tick 检查一次，disable 在一个 tick 周期内生效。
pub(crate) fn mode_loop(
    mut runtime: ModeRuntime,
    link: Arc<MotionLink>,
    controller: ControllerHandle,
    stop: Arc<AtomicBool>,
    tick: Duration,
) {
    while !stop.load(Ordering::Acquire) {
        let intent = runtime.tick(&controller);
        link.move_intent(intent);
        std::thread::sleep(tick);
    }
    debug!("Mode loop exited");
}
