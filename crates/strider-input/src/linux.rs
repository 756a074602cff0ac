//! Linux 硬件接入：evdev 设备、sysfs 电池与 LED
//!
//! 事件泵以 poll(2) 守护 evdev 读取（500ms 超时窗口内检查停止
//! 标志），设备 IO 错误视为手柄丢失，向组合根发信号后退出。

use std::os::fd::{AsRawFd, BorrowedFd};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use evdev::{AbsoluteAxisCode, Device, EventSummary, KeyCode};
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use tracing::{debug, info, warn};

use crate::aggregator::{BatteryWriter, StateWriter};
use crate::event::{Axis, Button, InputEvent};
use crate::{InputConfig, InputError};

/// 枚举 evdev 设备并按名称启发式选择手柄
///
/// 排除同一物理手柄挂出的 Motion/Touchpad 子设备；
/// 没有匹配时返回 [`InputError::ControllerNotFound`]（启动期致命）。
pub fn find_controller(config: &InputConfig) -> Result<Device, InputError> {
    for (path, device) in evdev::enumerate() {
        let name = device.name().unwrap_or("").to_string();
        debug!("Checking input device: {} ({})", name, path.display());

        if config.exclude_hints.iter().any(|h| name.contains(h.as_str())) {
            continue;
        }

        if config.name_hints.iter().any(|h| name.contains(h.as_str())) {
            info!("Controller found: {} at {}", name, path.display());
            return Ok(device);
        }
    }

    Err(InputError::ControllerNotFound)
}

/// 将一条 evdev 原始事件翻译为平台无关事件
///
/// 无法识别的事件码在此记录并忽略（前向兼容，不是错误）。
/// 同步事件静默跳过。
pub fn translate(raw: evdev::InputEvent) -> Option<InputEvent> {
    match raw.destructure() {
        EventSummary::Key(_, code, value) => {
            let button = match code {
                KeyCode::BTN_SOUTH => Button::Cross,
                KeyCode::BTN_EAST => Button::Circle,
                KeyCode::BTN_NORTH => Button::Triangle,
                KeyCode::BTN_WEST => Button::Square,
                KeyCode::BTN_DPAD_UP => Button::DpadUp,
                KeyCode::BTN_DPAD_DOWN => Button::DpadDown,
                KeyCode::BTN_DPAD_LEFT => Button::DpadLeft,
                KeyCode::BTN_DPAD_RIGHT => Button::DpadRight,
                KeyCode::BTN_TL => Button::L1,
                KeyCode::BTN_TR => Button::R1,
                KeyCode::BTN_TL2 => Button::L2,
                KeyCode::BTN_TR2 => Button::R2,
                KeyCode::BTN_SELECT => Button::Share,
                KeyCode::BTN_START => Button::Options,
                KeyCode::BTN_THUMBL => Button::L3,
                KeyCode::BTN_THUMBR => Button::R3,
                other => {
                    debug!("Unhandled key event: {:?} value {}", other, value);
                    return None;
                },
            };
            Some(InputEvent::Button {
                button,
                pressed: value != 0,
            })
        },
        EventSummary::AbsoluteAxis(_, code, value) => {
            let axis = match code {
                AbsoluteAxisCode::ABS_X => Axis::LeftStickX,
                AbsoluteAxisCode::ABS_Y => Axis::LeftStickY,
                AbsoluteAxisCode::ABS_RX => Axis::RightStickX,
                AbsoluteAxisCode::ABS_RY => Axis::RightStickY,
                AbsoluteAxisCode::ABS_Z => Axis::LeftTrigger,
                AbsoluteAxisCode::ABS_RZ => Axis::RightTrigger,
                AbsoluteAxisCode::ABS_HAT0X => Axis::HatX,
                AbsoluteAxisCode::ABS_HAT0Y => Axis::HatY,
                other => {
                    debug!("Unhandled abs event: {:?} value {}", other, value);
                    return None;
                },
            };
            Some(InputEvent::Axis { axis, value })
        },
        EventSummary::Synchronization(..) => None,
        _ => None,
    }
}

/// 事件泵主循环（长期任务，独占 [`StateWriter`]）
///
/// 设备 IO 错误（拔线）时通过 `lost_tx` 发出 [`InputError::DeviceLost`]
/// 并返回；组合根将其转为强制 disable。
pub fn event_pump(
    mut device: Device,
    mut writer: StateWriter,
    lost_tx: Sender<InputError>,
    running: Arc<AtomicBool>,
) {
    let raw_fd = device.as_raw_fd();

    loop {
        if !running.load(Ordering::Acquire) {
            debug!("Event pump: running flag cleared, exiting");
            return;
        }

        // poll 守护读取，让停止标志最迟 500ms 内被观察到
        let borrowed = unsafe { BorrowedFd::borrow_raw(raw_fd) };
        let mut fds = [PollFd::new(borrowed, PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::from(500u16)) {
            Ok(0) => continue,
            Ok(_) => {},
            Err(nix::errno::Errno::EINTR) => continue,
            Err(e) => {
                warn!("Controller poll failed: {}", e);
                let _ = lost_tx.send(InputError::DeviceLost(e.to_string()));
                return;
            },
        }

        match device.fetch_events() {
            Ok(events) => {
                for raw in events {
                    if let Some(event) = translate(raw) {
                        writer.apply(event);
                    }
                }
            },
            Err(e) => {
                warn!("Controller disconnected: {}", e);
                let _ = lost_tx.send(InputError::DeviceLost(e.to_string()));
                return;
            },
        }
    }
}

/// 读取电池百分比（`power_supply/*/capacity`）
fn read_battery(sysfs_root: &Path) -> std::io::Result<Option<u8>> {
    let supply_dir = sysfs_root.join("device/device/power_supply");
    for entry in std::fs::read_dir(&supply_dir)? {
        let capacity = entry?.path().join("capacity");
        if capacity.exists() {
            let text = std::fs::read_to_string(&capacity)?;
            let percent: u8 = text
                .trim()
                .parse()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            return Ok(Some(percent));
        }
    }
    Ok(None)
}

/// 电池轮询循环（低频任务，独占 [`BatteryWriter`]）
///
/// 失败只记录，下个周期重试，从不致命。
pub fn battery_loop(
    sysfs_root: PathBuf,
    battery: BatteryWriter,
    running: Arc<AtomicBool>,
    interval: Duration,
) {
    while running.load(Ordering::Acquire) {
        match read_battery(&sysfs_root) {
            Ok(Some(percent)) => battery.set(percent),
            Ok(None) => debug!("No battery capacity entry under {}", sysfs_root.display()),
            Err(e) => warn!("Battery poll failed: {}", e),
        }
        sleep_cancellable(interval, &running);
    }
}

/// 可取消的分片睡眠
pub(crate) fn sleep_cancellable(total: Duration, running: &AtomicBool) {
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

/// 手柄 LED 的 sysfs 驱动
///
/// 路径在启动时发现一次；写失败由调用方记录，不影响控制回路。
pub struct ControllerLed {
    red: PathBuf,
    green: PathBuf,
    blue: PathBuf,
}

impl ControllerLed {
    /// 在 js 设备的 sysfs 根下发现三色 LED
    pub fn discover(sysfs_root: &Path) -> Option<Self> {
        let leds_dir = sysfs_root.join("device/device/leds");
        let mut red = None;
        let mut green = None;
        let mut blue = None;

        for entry in std::fs::read_dir(&leds_dir).ok()? {
            let path = entry.ok()?.path();
            let name = path.file_name()?.to_string_lossy().to_lowercase();
            if name.contains("red") {
                red = Some(path.join("brightness"));
            } else if name.contains("green") {
                green = Some(path.join("brightness"));
            } else if name.contains("blue") {
                blue = Some(path.join("brightness"));
            }
        }

        Some(Self {
            red: red?,
            green: green?,
            blue: blue?,
        })
    }

    /// 写入一组 RGB 亮度
    pub fn set_color(&self, (r, g, b): (u8, u8, u8)) -> std::io::Result<()> {
        std::fs::write(&self.red, r.to_string())?;
        std::fs::write(&self.green, g.to_string())?;
        std::fs::write(&self.blue, b.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::EventType;

    fn make_sysfs(percent: Option<&str>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let supply = dir.path().join("device/device/power_supply/sony_controller");
        std::fs::create_dir_all(&supply).unwrap();
        if let Some(p) = percent {
            std::fs::write(supply.join("capacity"), p).unwrap();
        }
        dir
    }

    #[test]
    fn test_read_battery() {
        let dir = make_sysfs(Some("73\n"));
        assert_eq!(read_battery(dir.path()).unwrap(), Some(73));
    }

    #[test]
    fn test_read_battery_missing_entry() {
        let dir = make_sysfs(None);
        assert_eq!(read_battery(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_read_battery_garbage() {
        let dir = make_sysfs(Some("not-a-number"));
        assert!(read_battery(dir.path()).is_err());
    }

    #[test]
    fn test_translate_buttons_and_axes() {
        let ev = evdev::InputEvent::new(EventType::KEY.0, KeyCode::BTN_SOUTH.0, 1);
        assert_eq!(
            translate(ev),
            Some(InputEvent::Button {
                button: Button::Cross,
                pressed: true,
            })
        );

        let ev = evdev::InputEvent::new(EventType::ABSOLUTE.0, AbsoluteAxisCode::ABS_RY.0, 255);
        assert_eq!(
            translate(ev),
            Some(InputEvent::Axis {
                axis: Axis::RightStickY,
                value: 255,
            })
        );
    }

    #[test]
    fn test_translate_unknown_code_ignored() {
        let ev = evdev::InputEvent::new(EventType::KEY.0, KeyCode::KEY_F24.0, 1);
        assert_eq!(translate(ev), None);
    }

    #[test]
    fn test_controller_led_discover_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let leds = dir.path().join("device/device/leds");
        for color in ["js0:red", "js0:green", "js0:blue"] {
            std::fs::create_dir_all(leds.join(color)).unwrap();
        }

        let led = ControllerLed::discover(dir.path()).unwrap();
        led.set_color((50, 0, 10)).unwrap();

        let red = std::fs::read_to_string(leds.join("js0:red/brightness")).unwrap();
        assert_eq!(red, "50");
    }
}
