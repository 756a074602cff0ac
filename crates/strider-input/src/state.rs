//! 手柄状态快照
//!
//! 除"最后写入生效"外没有别的逻辑。每条事件只更新对应的一个
//! 字段（hat 轴按规则分解为两个方向布尔），字段间不要求跨字段
//! 一致性——消费方容忍同一物理瞬间分两条事件到达的一个 tick 偏差。

use crate::event::{Axis, Button, InputEvent};

/// 摇杆轴的居中原始值
pub const STICK_CENTER: u8 = 128;

/// 手柄状态快照
///
/// 每个实例显式初始化自己的字段；摇杆默认居中（原始值 128），
/// 扳机与按键默认归零。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    // 按键状态
    pub cross: bool,
    pub circle: bool,
    pub triangle: bool,
    pub square: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub l1: bool,
    pub r1: bool,
    pub l2: bool,
    pub r2: bool,
    pub share: bool,
    pub options: bool,
    pub l3: bool,
    pub r3: bool,

    // 摇杆与扳机位置（原始值 0-255）
    pub left_stick_x: u8,
    pub left_stick_y: u8,
    pub right_stick_x: u8,
    pub right_stick_y: u8,
    pub left_trigger: u8,
    pub right_trigger: u8,

    /// 电池百分比（0-100）
    pub battery: u8,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            cross: false,
            circle: false,
            triangle: false,
            square: false,
            dpad_up: false,
            dpad_down: false,
            dpad_left: false,
            dpad_right: false,
            l1: false,
            r1: false,
            l2: false,
            r2: false,
            share: false,
            options: false,
            l3: false,
            r3: false,
            left_stick_x: STICK_CENTER,
            left_stick_y: STICK_CENTER,
            right_stick_x: STICK_CENTER,
            right_stick_y: STICK_CENTER,
            left_trigger: 0,
            right_trigger: 0,
            battery: 0,
        }
    }
}

fn clamp_raw(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

impl ControllerState {
    /// 应用一条原始事件，恰好更新对应的字段
    ///
    /// hat 轴分解规则：-1 置负方向、清正方向；+1 反之；
    /// 0（居中）同时清除该轴上的两个方向。
    pub fn apply_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Button { button, pressed } => match button {
                Button::Cross => self.cross = pressed,
                Button::Circle => self.circle = pressed,
                Button::Triangle => self.triangle = pressed,
                Button::Square => self.square = pressed,
                Button::DpadUp => self.dpad_up = pressed,
                Button::DpadDown => self.dpad_down = pressed,
                Button::DpadLeft => self.dpad_left = pressed,
                Button::DpadRight => self.dpad_right = pressed,
                Button::L1 => self.l1 = pressed,
                Button::R1 => self.r1 = pressed,
                Button::L2 => self.l2 = pressed,
                Button::R2 => self.r2 = pressed,
                Button::Share => self.share = pressed,
                Button::Options => self.options = pressed,
                Button::L3 => self.l3 = pressed,
                Button::R3 => self.r3 = pressed,
            },
            InputEvent::Axis { axis, value } => match axis {
                Axis::LeftStickX => self.left_stick_x = clamp_raw(value),
                Axis::LeftStickY => self.left_stick_y = clamp_raw(value),
                Axis::RightStickX => self.right_stick_x = clamp_raw(value),
                Axis::RightStickY => self.right_stick_y = clamp_raw(value),
                Axis::LeftTrigger => self.left_trigger = clamp_raw(value),
                Axis::RightTrigger => self.right_trigger = clamp_raw(value),
                Axis::HatX => {
                    if value < 0 {
                        self.dpad_left = true;
                        self.dpad_right = false;
                    } else if value > 0 {
                        self.dpad_right = true;
                        self.dpad_left = false;
                    } else {
                        self.dpad_left = false;
                        self.dpad_right = false;
                    }
                },
                Axis::HatY => {
                    if value < 0 {
                        self.dpad_up = true;
                        self.dpad_down = false;
                    } else if value > 0 {
                        self.dpad_down = true;
                        self.dpad_up = false;
                    } else {
                        self.dpad_up = false;
                        self.dpad_down = false;
                    }
                },
            },
        }
    }
}
