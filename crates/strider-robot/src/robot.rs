//! 机器人组合根
//!
//! 把输入聚合、运动链路、模式管理、监督与心跳接线在一起，
//! 向外部协作方（控制面板、指示灯）暴露
//! `enable` / `disable` / `read_status`。
//!
//! 任务集合是固定的一小组长期线程：输入事件泵、电池轮询、
//! 运动 IO 循环、监督循环、心跳，以及使能期间的模式 tick 循环。
//! 线程之间只通过共享快照与链路入口通信，互不阻塞。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use parking_lot::Mutex;
use strider_driver::{LinkConfig, LinkState, MotionLink};
use strider_input::{ControllerHandle, InputConfig, InputError};
use strider_protocol::MotionIntent;
use strider_serial::SerialConfig;
use tracing::{info, warn};

use crate::error::RobotError;
use crate::manager::{ManagerState, ModeManager};
use crate::mode::{ModeName, PolicyFactory, PolicyRegistry};

/// 机器人配置
#[derive(Debug, Clone)]
pub struct RobotConfig {
    pub serial: SerialConfig,
    pub link: LinkConfig,
    pub input: InputConfig,
    /// 模式 tick 周期
    pub mode_tick: Duration,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            link: LinkConfig::default(),
            input: InputConfig::default(),
            mode_tick: Duration::from_millis(100),
        }
    }
}

/// 对外只读状态快照
#[derive(Debug, Clone)]
pub struct RobotStatus {
    pub enabled: bool,
    pub battery: u8,
    pub active_mode: Option<ModeName>,
    pub link_state: LinkState,
}

struct RobotInner {
    link: Arc<MotionLink>,
    manager: Mutex<ModeManager>,
    controller: ControllerHandle,
    registry: PolicyRegistry,
    running: Arc<AtomicBool>,
}

/// 机器人句柄
pub struct Robot {
    inner: Arc<RobotInner>,
    threads: Vec<JoinHandle<()>>,
}

impl Robot {
    /// 用已就绪的部件装配机器人（监督线程随之启动）
    ///
    /// 硬件发现路径见 [`RobotBuilder::bringup`]；本方法保持平台
    /// 无关，测试用 mock 链路与手写快照直接组合。
    pub fn assemble(
        link: MotionLink,
        controller: ControllerHandle,
        registry: PolicyRegistry,
        lost_rx: Receiver<InputError>,
        mode_tick: Duration,
    ) -> Self {
        let link = Arc::new(link);
        let running = Arc::new(AtomicBool::new(true));
        let inner = Arc::new(RobotInner {
            manager: Mutex::new(ModeManager::new(link.clone(), controller.clone(), mode_tick)),
            link,
            controller,
            registry,
            running,
        });

        let supervisor = {
            let inner = inner.clone();
            std::thread::spawn(move || supervisor_loop(inner, lost_rx))
        };

        Self {
            inner,
            threads: vec![supervisor],
        }
    }

    pub(crate) fn running(&self) -> Arc<AtomicBool> {
        self.inner.running.clone()
    }

    pub(crate) fn motion_link(&self) -> Arc<MotionLink> {
        self.inner.link.clone()
    }

    pub(crate) fn attach_thread(&mut self, handle: JoinHandle<()>) {
        self.threads.push(handle);
    }

    /// 按名称使能模式
    pub fn enable(&self, mode_name: &str) -> Result<(), RobotError> {
        self.enable_mode(mode_name.parse()?)
    }

    /// 使能模式
    pub fn enable_mode(&self, mode: ModeName) -> Result<(), RobotError> {
        self.inner.manager.lock().enable(mode, &self.inner.registry)
    }

    /// 去使能（已经 Disabled 时为空操作）
    pub fn disable(&self) {
        self.inner.manager.lock().disable();
    }

    /// 覆写链路的待发运动意图
    ///
    /// 只在使能时有意义（未使能的链路无条件发送停止帧）；
    /// 通常由激活模式调用，外部调用方一般不直接使用。
    pub fn move_intent(&self, intent: MotionIntent) {
        self.inner.link.move_intent(intent);
    }

    /// 当前状态快照
    pub fn read_status(&self) -> RobotStatus {
        let manager = self.inner.manager.lock();
        RobotStatus {
            enabled: manager.state() == ManagerState::Enabled,
            battery: self.inner.controller.snapshot().battery,
            active_mode: manager.active_mode(),
            link_state: self.inner.link.link_state(),
        }
    }

    /// 有序关停：去使能、收尾所有工作线程、关闭链路
    pub fn shutdown(mut self) {
        info!("Robot stopping");
        self.disable();
        self.inner.running.store(false, Ordering::Release);

        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                warn!("Worker thread panicked during shutdown");
            }
        }
        // MotionLink 在最后一个引用释放时限时收尾 IO 线程
    }
}

/// 监督循环：把输入设备故障转为强制 disable
fn supervisor_loop(inner: Arc<RobotInner>, lost_rx: Receiver<InputError>) {
    loop {
        match lost_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(err) => {
                warn!("Input device failure: {}; forcing disable", err);
                inner.manager.lock().disable();
            },
            Err(RecvTimeoutError::Timeout) => {
                if !inner.running.load(Ordering::Acquire) {
                    break;
                }
            },
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// 机器人构建器
///
/// # Example
///
/// ```no_run
/// use strider_robot::RobotBuilder;
///
/// let robot = RobotBuilder::new().bringup().unwrap();
/// robot.enable("manual").unwrap();
/// ```
#[derive(Default)]
pub struct RobotBuilder {
    config: RobotConfig,
    registry: PolicyRegistry,
}

impl RobotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: RobotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn serial(mut self, serial: SerialConfig) -> Self {
        self.config.serial = serial;
        self
    }

    pub fn link(mut self, link: LinkConfig) -> Self {
        self.config.link = link;
        self
    }

    pub fn input(mut self, input: InputConfig) -> Self {
        self.config.input = input;
        self
    }

    /// 注册一个策略引擎（手势、球追踪等外部推理管线）
    pub fn register_policy(mut self, mode: ModeName, factory: Box<dyn PolicyFactory>) -> Self {
        self.registry.register(mode, factory);
        self
    }

    /// 发现硬件并启动全部长期任务
    ///
    /// 致命条件（直接返回错误，不启动任何任务）：
    /// - 没有匹配的手柄输入设备
    /// - 没有匹配的运动微控制器串口
    #[cfg(target_os = "linux")]
    pub fn bringup(self) -> Result<Robot, RobotError> {
        use strider_input::linux;

        let Self { config, registry } = self;
        let RobotConfig {
            serial,
            link,
            input,
            mode_tick,
        } = config;

        let device = linux::find_controller(&input)?;
        let (writer, battery, controller) = strider_input::state_cell();

        let link = MotionLink::connect(serial, link)?;

        let (lost_tx, lost_rx) = crossbeam_channel::unbounded();
        let mut robot = Robot::assemble(link, controller, registry, lost_rx, mode_tick);
        let running = robot.running();

        let pump = {
            let running = running.clone();
            std::thread::spawn(move || linux::event_pump(device, writer, lost_tx, running))
        };
        robot.attach_thread(pump);

        let poller = {
            let running = running.clone();
            let sysfs_root = input.sysfs_root.clone();
            let interval = input.battery_interval;
            std::thread::spawn(move || linux::battery_loop(sysfs_root, battery, running, interval))
        };
        robot.attach_thread(poller);

        match linux::ControllerLed::discover(&input.sysfs_root) {
            Some(led) => {
                let motion = robot.motion_link();
                let heartbeat = std::thread::spawn(move || {
                    crate::heartbeat::heartbeat_loop(Box::new(led), motion, running)
                });
                robot.attach_thread(heartbeat);
            },
            None => warn!("Could not find controller LEDs, heartbeat disabled"),
        }

        info!("Robot bringup complete");
        Ok(robot)
    }

    /// 平台无关的装配路径（测试、自定义接线用）
    pub fn assemble(
        self,
        link: MotionLink,
        controller: ControllerHandle,
        lost_rx: Receiver<InputError>,
    ) -> Robot {
        Robot::assemble(link, controller, self.registry, lost_rx, self.config.mode_tick)
    }
}
