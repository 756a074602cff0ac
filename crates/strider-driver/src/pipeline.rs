//! IO 循环模块
//!
//! 后台 IO 线程的固定节奏收发逻辑：构建命令帧 → 编码写出 →
//! 等待分隔符结尾的回复（界限超时）→ 解码发布遥测。
//!
//! 故障分类（与错误处理策略一一对应）：
//! - 写/读 IO 错误：进入 `Reconnecting`，按固定间隔重试直到成功，
//!   中断期间的命令直接丢弃（at-most-once，无队列无重放）
//! - 读超时（微控制器沉默）：记录后继续当前连接
//! - 回复解码失败（协议失步）：记录并丢弃该帧，不拆链路

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use strider_protocol::{STATUS_DELIMITER, StatusFrame};
use strider_serial::{SerialError, SerialLink};
use tracing::{debug, error, info, trace, warn};

use crate::context::LinkContext;
use crate::state::LinkState;

/// 链路循环配置
///
/// # Example
///
/// ```
/// use strider_driver::LinkConfig;
///
/// // 默认：100ms tick，10s 重连间隔
/// let config = LinkConfig::default();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// 控制循环周期（软目标，非硬实时）
    pub tick: Duration,
    /// 重连尝试的固定间隔
    pub reconnect_interval: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            reconnect_interval: Duration::from_secs(10),
        }
    }
}

/// IO 线程循环
///
/// # 参数
/// - `link`: 已打开的串口链路（被本循环独占）
/// - `connect`: 重连构造器，失败后按 `reconnect_interval` 反复调用
/// - `ctx`: 共享状态上下文
/// - `config`: 循环配置
pub fn io_loop<L, C>(mut link: L, mut connect: C, ctx: Arc<LinkContext>, config: LinkConfig)
where
    L: SerialLink,
    C: FnMut() -> Result<L, SerialError>,
{
    ctx.state.set(LinkState::Connected, Ordering::Release);

    loop {
        if !ctx.running.load(Ordering::Acquire) {
            break;
        }

        let tick_start = Instant::now();

        // ============================================================
        // 1. 构建并写出命令帧（未使能时为停止帧）
        // ============================================================
        let frame = ctx.build_command().encode();
        if let Err(e) = link.write_frame(&frame) {
            error!("Motion serial write failed: {}", e);
            match reconnect(&mut connect, &ctx, &config) {
                Some(new_link) => {
                    link = new_link;
                    continue;
                },
                None => break,
            }
        }

        // ============================================================
        // 2. 等待回复并解码遥测
        // ============================================================
        match link.read_until(STATUS_DELIMITER) {
            Ok(payload) => match StatusFrame::decode(&payload) {
                Ok(status) => {
                    trace!("Motion status: {}", status);
                    ctx.status.store(Arc::new(status));
                },
                Err(e) => {
                    warn!("Discarding undecodable status reply: {}", e);
                },
            },
            Err(SerialError::Timeout) => {
                warn!("Motion controller did not respond");
            },
            Err(e) => {
                error!("Motion serial read failed: {}", e);
                match reconnect(&mut connect, &ctx, &config) {
                    Some(new_link) => {
                        link = new_link;
                        continue;
                    },
                    None => break,
                }
            },
        }

        // ============================================================
        // 3. 维持 tick 节奏
        // ============================================================
        let elapsed = tick_start.elapsed();
        if elapsed < config.tick {
            spin_sleep::sleep(config.tick - elapsed);
        }
    }

    ctx.state.set(LinkState::Closed, Ordering::Release);
    debug!("Motion IO loop exited");
}

/// 重连循环：固定间隔重试直到成功或被取消
///
/// 返回 `None` 表示运行标志被清除（关停），调用方退出循环。
fn reconnect<L, C>(connect: &mut C, ctx: &LinkContext, config: &LinkConfig) -> Option<L>
where
    C: FnMut() -> Result<L, SerialError>,
{
    ctx.state.set(LinkState::Reconnecting, Ordering::Release);

    loop {
        if !ctx.running.load(Ordering::Acquire) {
            return None;
        }

        match connect() {
            Ok(link) => {
                info!("Motion link reconnected");
                ctx.state.set(LinkState::Connected, Ordering::Release);
                return Some(link);
            },
            Err(e) => {
                warn!("Motion link reconnect failed: {}", e);
            },
        }

        sleep_cancellable(config.reconnect_interval, &ctx.running);
    }
}

/// 可取消的分片睡眠（重连退避期间保持可关停）
fn sleep_cancellable(total: Duration, running: &AtomicBool) {
    let slice = Duration::from_millis(100);
    let deadline = Instant::now() + total;
    while running.load(Ordering::Acquire) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(slice.min(deadline - now));
    }
}
