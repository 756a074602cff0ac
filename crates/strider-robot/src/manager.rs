//! 模式管理器
//!
//! 机器人运动输出独占所有权的仲裁者：同一时刻至多一个模式实例，
//! 模式实例不跨 enable/disable 周期存活。`enabled` 标志与激活
//! 模式引用的唯一写者。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use strider_driver::MotionLink;
use strider_input::ControllerHandle;
use tracing::{debug, info, warn};

use crate::error::RobotError;
use crate::mode::{ModeName, PolicyRegistry, build_runtime, mode_loop};

/// 管理器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagerState {
    #[default]
    Disabled,
    Enabling,
    Enabled,
    Disabling,
}

struct ActiveMode {
    name: ModeName,
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// 模式管理器
pub struct ModeManager {
    state: ManagerState,
    active: Option<ActiveMode>,
    link: Arc<MotionLink>,
    controller: ControllerHandle,
    tick: Duration,
}

impl ModeManager {
    pub fn new(link: Arc<MotionLink>, controller: ControllerHandle, tick: Duration) -> Self {
        Self {
            state: ManagerState::Disabled,
            active: None,
            link,
            controller,
            tick,
        }
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn active_mode(&self) -> Option<ModeName> {
        self.active.as_ref().map(|a| a.name)
    }

    /// 使能：仅在 `Disabled` 下合法
    ///
    /// 先构造模式运行体，构造失败时状态退回 `Disabled` 并把错误
    /// 交给调用方——绝不半使能。已使能时的重入调用被拒绝而不排队。
    pub fn enable(&mut self, name: ModeName, registry: &PolicyRegistry) -> Result<(), RobotError> {
        match (self.state, self.active.as_ref()) {
            (ManagerState::Disabled, _) => {},
            (_, Some(active)) => {
                return Err(RobotError::AlreadyEnabled {
                    active: active.name,
                });
            },
            (state, None) => return Err(RobotError::EnableRejected(state)),
        }

        self.state = ManagerState::Enabling;
        info!("Starting mode '{}'", name);

        let runtime = match build_runtime(name, registry) {
            Ok(runtime) => runtime,
            Err(e) => {
                self.state = ManagerState::Disabled;
                return Err(e);
            },
        };

        let stop = Arc::new(AtomicBool::new(false));
        let thread = {
            let link = self.link.clone();
            let controller = self.controller.clone();
            let stop = stop.clone();
            let tick = self.tick;
            std::thread::spawn(move || mode_loop(runtime, link, controller, stop, tick))
        };

        self.link.set_enabled(true, name.mode_id());
        self.active = Some(ActiveMode { name, stop, thread });
        self.state = ManagerState::Enabled;
        Ok(())
    }

    /// 去使能：从 `Enabled`（或 `Enabling`，视为取消）回到 `Disabled`
    ///
    /// 协作式取消模式线程并等待其退出（至多一个 tick），随后把
    /// 链路的待发帧清为停止帧。已经 `Disabled` 时为幂等空操作。
    pub fn disable(&mut self) {
        match self.state {
            ManagerState::Enabled | ManagerState::Enabling => {},
            _ => {
                debug!("Disable requested while already {:?}", self.state);
                return;
            },
        }

        self.state = ManagerState::Disabling;
        // 先清使能：下一个发送 tick 立即变为停止帧
        self.link.set_enabled(false, 0);

        if let Some(active) = self.active.take() {
            active.stop.store(true, Ordering::Release);
            if active.thread.join().is_err() {
                warn!("Mode '{}' thread panicked during disable", active.name);
            }
        }

        self.link.stop();
        self.state = ManagerState::Disabled;
        info!("Mode disabled");
    }
}
