//! 驱动层错误类型定义

use strider_protocol::ProtocolError;
use strider_serial::SerialError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 串口适配层错误
    #[error("Serial link error: {0}")]
    Serial(#[from] SerialError),

    /// 协议解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// IO 线程错误
    #[error("IO thread error: {0}")]
    IoThread(String),

    /// 关停时 IO 线程未在期限内退出
    #[error("Shutdown timeout")]
    ShutdownTimeout,
}
