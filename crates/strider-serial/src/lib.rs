//! # Strider Serial Adapter Layer
//!
//! 串口硬件抽象层，提供统一的链路接口抽象。
//!
//! 运动链路通过 [`SerialLink`] trait 驱动底层串口，
//! 协议层不依赖具体的串口实现。后端：
//!
//! - [`UsbSerialLink`]: 基于 `serialport` 的 USB 串口（按制造商字符串发现设备）
//! - `mock`（feature）: 脚本化替身，驱动层测试与无硬件开发用

use std::time::Duration;

use thiserror::Error;

pub mod usb;
pub use usb::{PortSummary, UsbSerialLink, list_ports};

#[cfg(feature = "mock")]
pub mod mock;

/// 单次回复的最大长度（字节）
///
/// 协议失步时 `read_until` 以此为界返回超长负载，由上层按
/// 解码失败丢弃，避免无界缓冲。
pub const MAX_REPLY_LEN: usize = 256;

/// 串口适配层统一错误类型
#[derive(Error, Debug)]
pub enum SerialError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(#[from] SerialDeviceError),
    #[error("Read timeout")]
    Timeout,
}

/// 设备/后端错误的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialDeviceErrorKind {
    Unknown,
    /// 没有匹配的设备（启动期致命）
    NotFound,
    NoDevice,
    AccessDenied,
    Busy,
    Backend,
}

/// 结构化设备错误
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct SerialDeviceError {
    pub kind: SerialDeviceErrorKind,
    pub message: String,
}

impl SerialDeviceError {
    pub fn new(kind: SerialDeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            SerialDeviceErrorKind::NotFound
                | SerialDeviceErrorKind::NoDevice
                | SerialDeviceErrorKind::AccessDenied
        )
    }
}

/// 串口链路抽象
///
/// 运动链路独占持有一个实现；同一时刻最多一个打开的句柄。
pub trait SerialLink: Send {
    /// 写出一个完整帧
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), SerialError>;

    /// 读取直到分隔字节，返回不含分隔符的负载
    ///
    /// 读取有界限超时：微控制器不响应时返回 [`SerialError::Timeout`]，
    /// 不会无限阻塞。
    fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>, SerialError>;
}

/// 串口连接配置
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// 期望的制造商字符串（USB 设备发现用）
    pub manufacturer: String,
    /// 波特率
    pub baud_rate: u32,
    /// 单次读取的界限超时
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            manufacturer: "Teensyduino".to_string(),
            baud_rate: strider_protocol::BAUD_RATE,
            read_timeout: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_fatal_classification() {
        let not_found = SerialDeviceError::new(SerialDeviceErrorKind::NotFound, "no port");
        assert!(not_found.is_fatal());

        let backend = SerialDeviceError::new(SerialDeviceErrorKind::Backend, "enumeration failed");
        assert!(!backend.is_fatal());
    }

    #[test]
    fn test_default_config() {
        let config = SerialConfig::default();
        assert_eq!(config.manufacturer, "Teensyduino");
        assert_eq!(config.baud_rate, 115_200);
    }
}
