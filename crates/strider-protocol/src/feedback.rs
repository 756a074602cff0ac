//! 遥测帧解析
//!
//! 微控制器对每个命令帧回复一段 Status 负载，以 `\n` 结尾。
//! 解析只在运动链路内进行；`StatusFrame` 是只读快照，
//! 从不回流成命令帧。编码侧仅供固件镜像与测试使用。

use std::fmt;

use crate::ProtocolError;
use crate::constants::*;

/// 解码后的遥测帧：每轴连接标志与错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFrame {
    /// 每轴连接标志
    pub connected: [bool; AXIS_COUNT],
    /// 每轴错误码（每轴两个槽位，小整数）
    pub errors: [[u8; ERROR_SLOTS_PER_AXIS]; AXIS_COUNT],
}

impl StatusFrame {
    /// 从回复负载解码（不含结尾分隔符）
    ///
    /// 解码是全域的：长度不符则失败，不产生部分帧。
    /// 解码失败由调用方记录并丢弃该帧，不视为链路故障。
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        if payload.len() != STATUS_PAYLOAD_LEN {
            return Err(ProtocolError::InvalidLength {
                expected: STATUS_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let mut frame = Self::default();
        for axis in 0..AXIS_COUNT {
            frame.connected[axis] = payload[axis] != 0;
        }
        for axis in 0..AXIS_COUNT {
            for slot in 0..ERROR_SLOTS_PER_AXIS {
                frame.errors[axis][slot] = payload[AXIS_COUNT + axis * ERROR_SLOTS_PER_AXIS + slot];
            }
        }
        Ok(frame)
    }

    /// 编码为回复负载（固件侧的镜像实现，同时用于测试）
    pub fn encode(&self) -> [u8; STATUS_PAYLOAD_LEN] {
        let mut buf = [0u8; STATUS_PAYLOAD_LEN];
        for axis in 0..AXIS_COUNT {
            buf[axis] = self.connected[axis] as u8;
        }
        for axis in 0..AXIS_COUNT {
            for slot in 0..ERROR_SLOTS_PER_AXIS {
                buf[AXIS_COUNT + axis * ERROR_SLOTS_PER_AXIS + slot] = self.errors[axis][slot];
            }
        }
        buf
    }

    /// 所有轴是否都在线
    pub fn all_connected(&self) -> bool {
        self.connected.iter().all(|&c| c)
    }

    /// 是否存在非零错误码
    pub fn has_errors(&self) -> bool {
        self.errors.iter().flatten().any(|&e| e != 0)
    }
}

impl fmt::Display for StatusFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connected=[")?;
        for (axis, &c) in self.connected.iter().enumerate() {
            if axis > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", c as u8)?;
        }
        write!(f, "] errors=[")?;
        for (axis, slots) in self.errors.iter().enumerate() {
            if axis > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", slots[0], slots[1])?;
        }
        write!(f, "]")
    }
}
