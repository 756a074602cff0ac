//! 输入事件模型
//!
//! 平台无关的事件表示。硬件层（evdev）在边界处翻译成此模型，
//! 无法识别的原始事件码在那里记录并忽略。

/// 手柄按键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Cross,
    Circle,
    Triangle,
    Square,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    L1,
    R1,
    /// L2 数字档（扳机幅值走 [`Axis::LeftTrigger`]）
    L2,
    /// R2 数字档
    R2,
    Share,
    Options,
    L3,
    R3,
}

/// 手柄轴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
    /// 方向键横轴（hat）：-1 左、0 居中、+1 右
    HatX,
    /// 方向键纵轴（hat）：-1 上、0 居中、+1 下
    HatY,
}

/// 一条原始硬件事件（按键码 + 值，或轴码 + 值）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Button { button: Button, pressed: bool },
    Axis { axis: Axis, value: i32 },
}
