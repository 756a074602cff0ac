//! 链路对外 API
//!
//! `MotionLink` 封装底层 IO 线程与状态同步细节：构造时同步完成
//! 首次连接（失败即启动期致命），之后的断线由 IO 线程自行恢复。

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::{JoinHandle, spawn};
use std::time::Duration;

use strider_protocol::{MotionIntent, StatusFrame};
use strider_serial::{SerialConfig, SerialError, SerialLink, UsbSerialLink};
use tracing::warn;

use crate::context::LinkContext;
use crate::error::DriverError;
use crate::pipeline::{LinkConfig, io_loop};
use crate::state::LinkState;

/// 带超时的线程 join 扩展
trait JoinTimeout {
    fn join_timeout(self, timeout: Duration) -> Result<(), DriverError>;
}

impl JoinTimeout for JoinHandle<()> {
    fn join_timeout(self, timeout: Duration) -> Result<(), DriverError> {
        let (tx, rx) = crossbeam_channel::bounded(1);

        // 看门狗线程负责真正的 join；超时后它继续存活，
        // 由进程退出时操作系统回收
        spawn(move || {
            let result = self.join();
            let _ = tx.send(result.is_ok());
        });

        match rx.recv_timeout(timeout) {
            Ok(true) => Ok(()),
            Ok(false) => Err(DriverError::IoThread("IO thread panicked".to_string())),
            Err(_) => Err(DriverError::ShutdownTimeout),
        }
    }
}

/// 运动链路（对外 API）
///
/// 串口句柄被 IO 线程独占持有，从不暴露给 Mode；
/// 本句柄只提供无锁的意图写入与状态读取。
pub struct MotionLink {
    ctx: Arc<LinkContext>,
    io_thread: Option<JoinHandle<()>>,
}

impl MotionLink {
    /// 用已打开的链路与重连构造器启动 IO 线程
    ///
    /// 泛型只出现在构造处；`MotionLink` 本身不携带链路类型。
    pub fn start<L, C>(link: L, connector: C, config: LinkConfig) -> Self
    where
        L: SerialLink + 'static,
        C: FnMut() -> Result<L, SerialError> + Send + 'static,
    {
        let ctx = Arc::new(LinkContext::new());
        let ctx_clone = ctx.clone();
        let io_thread = spawn(move || {
            io_loop(link, connector, ctx_clone, config);
        });

        Self {
            ctx,
            io_thread: Some(io_thread),
        }
    }

    /// 发现、打开运动微控制器串口并启动链路
    ///
    /// 启动时没有匹配的串口设备是致命错误，直接返回；
    /// 之后运行中的断连由同一套发现逻辑在 IO 线程内恢复。
    pub fn connect(serial: SerialConfig, config: LinkConfig) -> Result<Self, DriverError> {
        let link = UsbSerialLink::open(&serial)?;
        let connector = move || UsbSerialLink::open(&serial);
        Ok(Self::start(link, connector, config))
    }

    /// 覆写待发意图（最后写入生效，无队列）
    pub fn move_intent(&self, intent: MotionIntent) {
        self.ctx.pending.store(Arc::new(intent));
    }

    /// 立即将待发意图置为停止帧，与 Mode 的最后写入无关
    ///
    /// disable、手柄丢失、关停时调用。
    pub fn stop(&self) {
        self.ctx.pending.store(Arc::new(MotionIntent::stopped()));
    }

    /// 设置使能标志与模式 id（唯一写者：模式管理器）
    pub fn set_enabled(&self, enabled: bool, mode_id: i8) {
        if enabled {
            // 先写模式再置使能，循环不会看到带旧模式 id 的使能帧
            self.ctx.mode_id.store(mode_id, Ordering::Release);
            self.ctx.enabled.store(true, Ordering::Release);
        } else {
            self.ctx.enabled.store(false, Ordering::Release);
            self.ctx.mode_id.store(mode_id, Ordering::Release);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ctx.enabled.load(Ordering::Acquire)
    }

    /// 最近一帧解码成功的遥测（无锁快照）
    pub fn status(&self) -> StatusFrame {
        **self.ctx.status.load()
    }

    pub fn link_state(&self) -> LinkState {
        self.ctx.state.get(Ordering::Acquire)
    }

    /// 请求 IO 线程退出并限时等待
    pub fn shutdown(&mut self) {
        self.ctx.running.store(false, Ordering::Release);
        if let Some(handle) = self.io_thread.take() {
            if let Err(e) = handle.join_timeout(Duration::from_secs(2)) {
                warn!("Motion IO thread shutdown: {}", e);
            }
        }
    }
}

impl Drop for MotionLink {
    fn drop(&mut self) {
        self.shutdown();
    }
}
