//! 手动模式（手柄直通）
//!
//! 四个手动变体（manual/dance/pushup/leg-test）行为同构，差别只在
//! 哪些按键在该语境下有语义——用一个配置结构参数化，而不是四个
//! 近似相同的实现。

use strider_input::ControllerState;
use strider_input::state::STICK_CENTER;
use strider_protocol::{MotionIntent, clamp_axis};

/// 手动模式配置：哪些按键参与命令帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualConfig {
    /// 方向键是否有语义
    pub dpad: bool,
    /// 面键（三角/叉/方/圆）是否有语义
    pub face_buttons: bool,
}

impl ManualConfig {
    /// 全按键直通（manual / dance）
    pub fn full() -> Self {
        Self {
            dpad: true,
            face_buttons: true,
        }
    }

    /// 仅面键（pushup：三角=坐下、叉=下压）
    pub fn face_buttons_only() -> Self {
        Self {
            dpad: false,
            face_buttons: true,
        }
    }

    /// 仅方向键（leg-test：腿位选择）
    pub fn dpad_only() -> Self {
        Self {
            dpad: true,
            face_buttons: false,
        }
    }
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self::full()
    }
}

/// 摇杆原始值（0-255，128 居中）→ 居中后的有符号轴值
pub fn center_stick(raw: u8) -> i8 {
    clamp_axis(raw as i16 - STICK_CENTER as i16)
}

/// 从手柄快照构建一帧运动意图
pub fn manual_intent(config: ManualConfig, state: &ControllerState) -> MotionIntent {
    MotionIntent {
        right_lr: center_stick(state.right_stick_x),
        right_fb: center_stick(state.right_stick_y),
        right_trigger: state.right_trigger,
        left_lr: center_stick(state.left_stick_x),
        left_fb: center_stick(state.left_stick_y),
        left_trigger: state.left_trigger,

        dpad_up: config.dpad && state.dpad_up,
        dpad_down: config.dpad && state.dpad_down,
        dpad_left: config.dpad && state.dpad_left,
        dpad_right: config.dpad && state.dpad_right,

        triangle: config.face_buttons && state.triangle,
        cross: config.face_buttons && state.cross,
        square: config.face_buttons && state.square,
        circle: config.face_buttons && state.circle,
    }
}
