//! 控制帧构建
//!
//! 每个控制 tick 构建一帧 `RemoteCommand` 并编码后写入串口。
//! 字段顺序与微控制器固件侧的解码约定一致，所有幅值字段在编码前
//! 各自独立钳位到声明范围。

use crate::constants::*;
use crate::{MessageType, ProtocolError};

/// 运动意图（命令帧中由当前 Mode 产出的部分）
///
/// 两对 8 位有符号"摇杆"值（右/左 × 前后/左右）、两个无符号扳机幅值、
/// 4 个方向键布尔、4 个面键布尔。`enabled` 与 `mode_id` 不在此结构中，
/// 它们由模式管理器持有并在发送 tick 时盖章（见 `RemoteCommand`）。
///
/// 停止帧：所有数值字段为 0，所有布尔为 false——即 `Default`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionIntent {
    /// 右摇杆 左右
    pub right_lr: i8,
    /// 右摇杆 前后
    pub right_fb: i8,
    /// 右扳机幅值
    pub right_trigger: u8,
    /// 左摇杆 左右
    pub left_lr: i8,
    /// 左摇杆 前后
    pub left_fb: i8,
    /// 左扳机幅值
    pub left_trigger: u8,

    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,

    pub triangle: bool,
    pub cross: bool,
    pub square: bool,
    pub circle: bool,
}

impl MotionIntent {
    /// 停止意图：所有数值为 0，所有布尔为 false
    pub fn stopped() -> Self {
        Self::default()
    }

    /// 是否为停止意图
    pub fn is_stopped(&self) -> bool {
        *self == Self::default()
    }
}

/// 将原始轴值钳位到 i8 范围
pub fn clamp_axis(value: i16) -> i8 {
    value.clamp(i8::MIN as i16, i8::MAX as i16) as i8
}

/// 将原始扳机值钳位到 u8 范围
pub fn clamp_trigger(value: i16) -> u8 {
    value.clamp(u8::MIN as i16, u8::MAX as i16) as u8
}

/// Remote 命令帧（每 tick 构建的不可变值）
///
/// `enabled` 与 `mode_id` 由模式管理器独占写入，运动字段来自当前
/// Mode 最近一次 `move` 写入的意图。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteCommand {
    /// 机器人是否使能
    pub enabled: bool,
    /// 当前激活模式的 id（未使能时为 0）
    pub mode_id: i8,
    /// 运动意图
    pub intent: MotionIntent,
}

impl RemoteCommand {
    /// 停止帧：未使能、模式 0、停止意图
    pub fn stopped() -> Self {
        Self::default()
    }

    /// 编码为出向消息（信封 + 负载，定长 `MESSAGE_LEN` 字节）
    pub fn encode(&self) -> [u8; MESSAGE_LEN] {
        let i = &self.intent;
        [
            MessageType::Remote.into(),
            self.enabled as u8,
            self.mode_id as u8,
            i.right_lr as u8,
            i.right_fb as u8,
            i.right_trigger,
            i.left_lr as u8,
            i.left_fb as u8,
            i.left_trigger,
            i.dpad_up as u8,
            i.dpad_down as u8,
            i.dpad_left as u8,
            i.dpad_right as u8,
            i.triangle as u8,
            i.cross as u8,
            i.square as u8,
            i.circle as u8,
        ]
    }

    /// 从出向消息字节解码（固件侧的镜像实现，同时用于测试）
    ///
    /// 解码是全域的：长度不符或判别字节未知时干净地失败，
    /// 不产生部分帧。
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        let type_byte = *buf.first().ok_or(ProtocolError::EmptyFrame)?;
        MessageType::try_from(type_byte)
            .map_err(|_| ProtocolError::UnknownMessageType { value: type_byte })?;

        if buf.len() != MESSAGE_LEN {
            return Err(ProtocolError::InvalidLength {
                expected: MESSAGE_LEN,
                actual: buf.len(),
            });
        }

        Ok(Self {
            enabled: buf[1] != 0,
            mode_id: buf[2] as i8,
            intent: MotionIntent {
                right_lr: buf[3] as i8,
                right_fb: buf[4] as i8,
                right_trigger: buf[5],
                left_lr: buf[6] as i8,
                left_fb: buf[7] as i8,
                left_trigger: buf[8],
                dpad_up: buf[9] != 0,
                dpad_down: buf[10] != 0,
                dpad_left: buf[11] != 0,
                dpad_right: buf[12] != 0,
                triangle: buf[13] != 0,
                cross: buf[14] != 0,
                square: buf[15] != 0,
                circle: buf[16] != 0,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_throttle() -> MotionIntent {
        MotionIntent {
            right_lr: i8::MIN,
            right_fb: i8::MAX,
            right_trigger: u8::MAX,
            left_lr: i8::MAX,
            left_fb: i8::MIN,
            left_trigger: 1,
            dpad_up: true,
            dpad_down: false,
            dpad_left: true,
            dpad_right: false,
            triangle: true,
            cross: true,
            square: false,
            circle: true,
        }
    }

    #[test]
    fn test_stopped_frame_all_zero() {
        let frame = RemoteCommand::stopped();
        let buf = frame.encode();
        // 除判别字节外全部为 0
        assert_eq!(buf[0], 0x01);
        assert!(buf[1..].iter().all(|&b| b == 0));
        assert!(frame.intent.is_stopped());
    }

    #[test]
    fn test_encode_layout() {
        let frame = RemoteCommand {
            enabled: true,
            mode_id: 6,
            intent: MotionIntent {
                right_lr: -2,
                right_fb: 3,
                right_trigger: 200,
                left_lr: 4,
                left_fb: -5,
                left_trigger: 100,
                dpad_up: true,
                circle: true,
                ..MotionIntent::default()
            },
        };
        let buf = frame.encode();
        assert_eq!(buf[0], 0x01); // type
        assert_eq!(buf[1], 1); // enabled
        assert_eq!(buf[2], 6); // mode_id
        assert_eq!(buf[3] as i8, -2); // right_lr
        assert_eq!(buf[4] as i8, 3); // right_fb
        assert_eq!(buf[5], 200); // right_trigger
        assert_eq!(buf[6] as i8, 4); // left_lr
        assert_eq!(buf[7] as i8, -5); // left_fb
        assert_eq!(buf[8], 100); // left_trigger
        assert_eq!(buf[9], 1); // dpad_up
        assert_eq!(buf[10], 0);
        assert_eq!(buf[16], 1); // circle
    }

    #[test]
    fn test_roundtrip_boundary_values() {
        let frame = RemoteCommand {
            enabled: true,
            mode_id: i8::MIN,
            intent: full_throttle(),
        };
        let decoded = RemoteCommand::decode(&frame.encode()).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_roundtrip_stopped() {
        let frame = RemoteCommand::stopped();
        let decoded = RemoteCommand::decode(&frame.encode()).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_decode_wrong_length() {
        let frame = RemoteCommand::stopped().encode();
        let err = RemoteCommand::decode(&frame[..frame.len() - 1]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidLength {
                expected: MESSAGE_LEN,
                actual,
            } if actual == MESSAGE_LEN - 1
        ));
    }

    #[test]
    fn test_decode_unknown_type() {
        let mut frame = RemoteCommand::stopped().encode();
        frame[0] = 0x7F;
        let err = RemoteCommand::decode(&frame).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnknownMessageType { value: 0x7F }
        ));
    }

    #[test]
    fn test_decode_empty() {
        assert!(matches!(
            RemoteCommand::decode(&[]).unwrap_err(),
            ProtocolError::EmptyFrame
        ));
    }

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(-1000), i8::MIN);
        assert_eq!(clamp_axis(-128), -128);
        assert_eq!(clamp_axis(0), 0);
        assert_eq!(clamp_axis(127), 127);
        assert_eq!(clamp_axis(1000), i8::MAX);
    }

    #[test]
    fn test_clamp_trigger() {
        assert_eq!(clamp_trigger(-5), 0);
        assert_eq!(clamp_trigger(0), 0);
        assert_eq!(clamp_trigger(255), 255);
        assert_eq!(clamp_trigger(300), u8::MAX);
    }
}
