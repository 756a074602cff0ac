//! # Strider CLI
//!
//! 遥操作命令行工具。
//!
//! ```bash
//! # 启动机器人并立即使能手动模式
//! strider-cli run --mode manual
//!
//! # 用配置文件覆盖串口/链路参数
//! strider-cli run --config strider.toml
//!
//! # 查看封闭模式注册表 / 候选串口
//! strider-cli modes
//! strider-cli ports
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use strider_robot::ModeName;

mod config;

/// Strider CLI - 四足机器人遥操作工具
#[derive(Parser, Debug)]
#[command(name = "strider-cli")]
#[command(about = "Command-line interface for Strider teleoperation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 启动机器人并保持运行（Ctrl-C 有序关停）
    Run {
        /// 启动后立即使能的模式（缺省保持 Disabled，由控制面板使能）
        #[arg(short, long)]
        mode: Option<String>,

        /// TOML 配置文件（覆盖串口/链路/输入默认值）
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 列出已知模式
    Modes,

    /// 列出候选串口
    Ports,
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { mode, config } => run(mode, config),
        Commands::Modes => {
            for mode in ModeName::ALL {
                let note = if mode.is_policy_driven() {
                    "  (requires a registered policy engine)"
                } else {
                    ""
                };
                println!("{:<14} id {}{}", mode.as_str(), mode.mode_id(), note);
            }
            Ok(())
        },
        Commands::Ports => {
            let ports = strider_serial::list_ports()?;
            if ports.is_empty() {
                println!("No serial ports found");
            }
            for port in ports {
                println!(
                    "{:<20} {}",
                    port.name,
                    port.manufacturer.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        },
    }
}

#[cfg(target_os = "linux")]
fn run(mode: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    use std::sync::mpsc;
    use std::time::Duration;

    use strider_robot::RobotBuilder;
    use tracing::info;

    let robot_config = config::load(config_path)?;
    let robot = RobotBuilder::new().config(robot_config).bringup()?;

    if let Some(mode) = mode {
        robot.enable(&mode)?;
    }

    let (stop_tx, stop_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })?;

    info!("Strider running, Ctrl-C to stop");
    loop {
        match stop_rx.recv_timeout(Duration::from_secs(10)) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let status = robot.read_status();
                info!(
                    "enabled={} mode={} battery={}% link={:?}",
                    status.enabled,
                    status.active_mode.map(|m| m.as_str()).unwrap_or("-"),
                    status.battery,
                    status.link_state,
                );
            },
        }
    }

    robot.shutdown();
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(_mode: Option<String>, _config_path: Option<PathBuf>) -> Result<()> {
    anyhow::bail!("`run` requires Linux (evdev controller input)")
}
