//! # Strider Protocol
//!
//! 运动控制器串口协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `constants`: 协议常量定义
//! - `control`: 控制帧（Remote 命令）构建与编码
//! - `feedback`: 遥测帧（Status 回复）解析
//!
//! ## 帧格式
//!
//! 出向消息是一个带判别字节的信封：`[MessageType][payload]`，
//! 所有字段定宽单字节，无长度前缀。
//! 入向回复是一段 Status 负载，以换行符 `\n` 结尾（见 `feedback`）。
//!
//! 编解码是纯函数且全域的：字段要么完整存在，要么解码干净地失败，
//! 不产生部分帧。

pub mod constants;
pub mod control;
pub mod feedback;

// 重新导出常用类型
pub use constants::*;
pub use control::*;
pub use feedback::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

/// 消息类型判别字节
///
/// 出向信封恰好携带一种负载。当前只有 `Remote`（遥操作命令帧），
/// 保留枚举形式以便未来扩展消息种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageType {
    /// 遥操作命令帧（`RemoteCommand`）
    Remote = 0x01,
}

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Unknown message type: 0x{value:02X}")]
    UnknownMessageType { value: u8 },

    #[error("Empty frame")]
    EmptyFrame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_roundtrip() {
        let byte: u8 = MessageType::Remote.into();
        assert_eq!(byte, 0x01);
        assert_eq!(MessageType::try_from(0x01).unwrap(), MessageType::Remote);
    }

    #[test]
    fn test_message_type_unknown() {
        assert!(MessageType::try_from(0x7F).is_err());
    }
}
