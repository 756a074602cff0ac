//! CLI 配置文件
//!
//! TOML 文件按节覆盖 `RobotConfig` 的默认值；缺省的节/键保持默认。

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use strider_robot::RobotConfig;

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub serial: SerialSection,
    #[serde(default)]
    pub link: LinkSection,
    #[serde(default)]
    pub input: InputSection,
    /// 模式 tick 周期（毫秒）
    pub mode_tick_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SerialSection {
    pub manufacturer: Option<String>,
    pub baud_rate: Option<u32>,
    pub read_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LinkSection {
    pub tick_ms: Option<u64>,
    pub reconnect_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InputSection {
    pub sysfs_root: Option<PathBuf>,
    pub battery_interval_secs: Option<u64>,
}

/// 加载配置文件；没有给路径时返回默认配置
pub fn load(path: Option<PathBuf>) -> Result<RobotConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            from_toml_str(&text)
        },
        None => Ok(RobotConfig::default()),
    }
}

/// 解析 TOML 文本并套用覆盖
pub fn from_toml_str(text: &str) -> Result<RobotConfig> {
    let file: FileConfig = toml::from_str(text).context("parsing config file")?;
    let mut config = RobotConfig::default();

    if let Some(manufacturer) = file.serial.manufacturer {
        config.serial.manufacturer = manufacturer;
    }
    if let Some(baud_rate) = file.serial.baud_rate {
        config.serial.baud_rate = baud_rate;
    }
    if let Some(ms) = file.serial.read_timeout_ms {
        config.serial.read_timeout = Duration::from_millis(ms);
    }

    if let Some(ms) = file.link.tick_ms {
        config.link.tick = Duration::from_millis(ms);
    }
    if let Some(secs) = file.link.reconnect_interval_secs {
        config.link.reconnect_interval = Duration::from_secs(secs);
    }

    if let Some(root) = file.input.sysfs_root {
        config.input.sysfs_root = root;
    }
    if let Some(secs) = file.input.battery_interval_secs {
        config.input.battery_interval = Duration::from_secs(secs);
    }

    if let Some(ms) = file.mode_tick_ms {
        config.mode_tick = Duration::from_millis(ms);
    }

    Ok(config)
}
