//! 封闭的模式注册表
//!
//! 模式全集在构建期已知：标签变体 + 名称解析，没有运行时代码
//! 加载，模式集合可静态验证。

use std::fmt;
use std::str::FromStr;

use crate::error::RobotError;

/// 已知模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeName {
    /// 手柄直通（行走）
    Manual,
    /// 俯卧撑
    PushUp,
    /// 单腿测试
    LegTest,
    /// 舞蹈
    Dance,
    /// 手势驱动（相机/推理引擎）
    Gesture,
    /// 球追踪
    BallTracking,
}

impl ModeName {
    /// 全部已知模式（CLI 列表用）
    pub const ALL: [ModeName; 6] = [
        ModeName::Manual,
        ModeName::PushUp,
        ModeName::LegTest,
        ModeName::Dance,
        ModeName::Gesture,
        ModeName::BallTracking,
    ];

    /// 命令帧中携带的模式 id
    pub fn mode_id(self) -> i8 {
        match self {
            ModeName::LegTest => 3,
            ModeName::PushUp => 4,
            ModeName::Dance => 5,
            ModeName::Manual => 6,
            ModeName::Gesture => 7,
            ModeName::BallTracking => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModeName::Manual => "manual",
            ModeName::PushUp => "pushup",
            ModeName::LegTest => "leg-test",
            ModeName::Dance => "dance",
            ModeName::Gesture => "gesture",
            ModeName::BallTracking => "ball-tracking",
        }
    }

    /// 是否由外部策略引擎驱动
    pub fn is_policy_driven(self) -> bool {
        matches!(self, ModeName::Gesture | ModeName::BallTracking)
    }
}

impl fmt::Display for ModeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeName {
    type Err = RobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(ModeName::Manual),
            "pushup" | "push-up" => Ok(ModeName::PushUp),
            "leg-test" | "leg_testing" => Ok(ModeName::LegTest),
            "dance" => Ok(ModeName::Dance),
            "gesture" => Ok(ModeName::Gesture),
            "ball-tracking" | "tennis-ball" => Ok(ModeName::BallTracking),
            other => Err(RobotError::UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_ids() {
        assert_eq!(ModeName::Manual.mode_id(), 6);
        assert_eq!(ModeName::Dance.mode_id(), 5);
        assert_eq!(ModeName::PushUp.mode_id(), 4);
        assert_eq!(ModeName::LegTest.mode_id(), 3);
        assert_eq!(ModeName::Gesture.mode_id(), 7);
        assert_eq!(ModeName::BallTracking.mode_id(), 8);
    }

    #[test]
    fn test_name_roundtrip() {
        for mode in ModeName::ALL {
            assert_eq!(mode.as_str().parse::<ModeName>().unwrap(), mode);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "warp-drive".parse::<ModeName>().unwrap_err();
        assert!(matches!(err, RobotError::UnknownMode(name) if name == "warp-drive"));
    }

    #[test]
    fn test_policy_driven_classification() {
        assert!(ModeName::Gesture.is_policy_driven());
        assert!(ModeName::BallTracking.is_policy_driven());
        assert!(!ModeName::Manual.is_policy_driven());
    }
}
