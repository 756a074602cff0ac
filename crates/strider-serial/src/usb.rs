//! USB 串口后端
//!
//! 按制造商字符串在可用端口中发现运动微控制器并打开串口。
//! 读取以单字节累积直到分隔符，整体受 `read_timeout` 界限约束。

use std::io::Read;
use std::io::Write;
use std::time::Instant;

use serialport::{SerialPort, SerialPortType};
use tracing::{debug, info};

use crate::{
    MAX_REPLY_LEN, SerialConfig, SerialDeviceError, SerialDeviceErrorKind, SerialError, SerialLink,
};

/// 可用端口摘要（CLI 列表用）
#[derive(Debug, Clone)]
pub struct PortSummary {
    pub name: String,
    pub manufacturer: Option<String>,
}

/// 枚举当前可用的串口
pub fn list_ports() -> Result<Vec<PortSummary>, SerialError> {
    let ports = serialport::available_ports().map_err(|e| {
        SerialDeviceError::new(SerialDeviceErrorKind::Backend, format!("enumeration failed: {e}"))
    })?;

    Ok(ports
        .into_iter()
        .map(|p| {
            let manufacturer = match p.port_type {
                SerialPortType::UsbPort(info) => info.manufacturer,
                _ => None,
            };
            PortSummary {
                name: p.port_name,
                manufacturer,
            }
        })
        .collect())
}

/// USB 串口链路
///
/// 独占持有打开的串口句柄；同一时刻最多一个。
pub struct UsbSerialLink {
    port: Box<dyn SerialPort>,
    read_timeout: std::time::Duration,
}

impl UsbSerialLink {
    /// 发现并打开运动微控制器的串口
    ///
    /// 在可用端口中选择制造商字符串匹配 `config.manufacturer` 的
    /// USB 设备；没有匹配时返回 `NotFound`（启动期致命）。
    pub fn open(config: &SerialConfig) -> Result<Self, SerialError> {
        let port_name = Self::find_port(&config.manufacturer)?;
        info!("Opening motion controller port {}", port_name);

        let port = serialport::new(&port_name, config.baud_rate)
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| {
                let kind = match e.kind() {
                    serialport::ErrorKind::NoDevice => SerialDeviceErrorKind::NoDevice,
                    serialport::ErrorKind::Io(_) => SerialDeviceErrorKind::Busy,
                    _ => SerialDeviceErrorKind::Backend,
                };
                SerialDeviceError::new(kind, format!("open {port_name} failed: {e}"))
            })?;

        Ok(Self {
            port,
            read_timeout: config.read_timeout,
        })
    }

    fn find_port(manufacturer: &str) -> Result<String, SerialError> {
        for summary in list_ports()? {
            debug!(
                "Checking serial port: {} ({:?})",
                summary.name, summary.manufacturer
            );
            if summary
                .manufacturer
                .as_deref()
                .is_some_and(|m| m.contains(manufacturer))
            {
                return Ok(summary.name);
            }
        }

        Err(SerialDeviceError::new(
            SerialDeviceErrorKind::NotFound,
            format!("no serial device with manufacturer '{manufacturer}'"),
        )
        .into())
    }
}

impl SerialLink for UsbSerialLink {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), SerialError> {
        self.port.write_all(frame)?;
        Ok(())
    }

    fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>, SerialError> {
        let deadline = Instant::now() + self.read_timeout;
        let mut payload = Vec::with_capacity(32);
        let mut byte = [0u8; 1];

        loop {
            match self.port.read(&mut byte) {
                Ok(0) => {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "serial port closed",
                    )
                    .into());
                },
                Ok(_) => {
                    if byte[0] == delimiter {
                        return Ok(payload);
                    }
                    payload.push(byte[0]);
                    // 协议失步保护：超长直接上交，由解码失败丢弃
                    if payload.len() >= MAX_REPLY_LEN {
                        return Ok(payload);
                    }
                },
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    return Err(SerialError::Timeout);
                },
                Err(e) => return Err(e.into()),
            }

            if Instant::now() >= deadline {
                return Err(SerialError::Timeout);
            }
        }
    }
}
