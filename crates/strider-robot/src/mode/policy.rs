//! 策略驱动模式的外部引擎接缝
//!
//! 手势识别、球追踪等推理管线是外部协作方，对核心完全不透明：
//! 它们只是每 tick 产出一帧运动意图的策略源。引擎在 enable 时
//! 构造（可能失败，如相机被占用），disable 时随模式实例销毁。

use std::collections::HashMap;

use strider_protocol::MotionIntent;

use crate::error::RobotError;
use crate::mode::ModeName;

/// 策略源：每 tick 产出一帧运动意图
///
/// 没有新决策时返回停止意图即可；核心不关心内部管线。
pub trait PolicySource: Send {
    fn next_intent(&mut self) -> MotionIntent;
}

/// 策略工厂：enable 时构造策略源
///
/// 构造失败（设备忙、模型缺失）使 enable 干净地中止，
/// 状态机退回 Disabled。
pub trait PolicyFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn PolicySource>, RobotError>;
}

/// 策略引擎注册表
///
/// 组合根在启动时注册可用引擎；未注册的策略模式 enable 时
/// 以 `PolicyUnavailable` 拒绝。
#[derive(Default)]
pub struct PolicyRegistry {
    factories: HashMap<ModeName, Box<dyn PolicyFactory>>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mode: ModeName, factory: Box<dyn PolicyFactory>) {
        self.factories.insert(mode, factory);
    }

    pub(crate) fn create(&self, mode: ModeName) -> Result<Box<dyn PolicySource>, RobotError> {
        match self.factories.get(&mode) {
            Some(factory) => factory.create(),
            None => Err(RobotError::PolicyUnavailable {
                mode,
                reason: "no engine registered".to_string(),
            }),
        }
    }
}
