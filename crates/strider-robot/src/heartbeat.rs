//! 状态指示心跳
//!
//! 按定时器向状态 LED 发送颜色：短灭脉冲之后，使能时红色 0.4s，
//! 未使能时绿色 1.9s；关停时恢复蓝色。LED 写失败只记录，
//! 不影响控制回路。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use strider_driver::MotionLink;
use tracing::debug;

/// 状态 LED 的颜色设置操作（外部协作方的唯一契约）
pub trait StatusLed: Send {
    fn set_color(&self, rgb: (u8, u8, u8)) -> std::io::Result<()>;
}

#[cfg(target_os = "linux")]
impl StatusLed for strider_input::linux::ControllerLed {
    fn set_color(&self, rgb: (u8, u8, u8)) -> std::io::Result<()> {
        self.set_color(rgb)
    }
}

/// 心跳循环
pub(crate) fn heartbeat_loop(
    led: Box<dyn StatusLed>,
    link: Arc<MotionLink>,
    running: Arc<AtomicBool>,
) {
    let mut led_on = true;

    while running.load(Ordering::Acquire) {
        let (color, next_change_in) = if led_on {
            ((0, 0, 0), Duration::from_millis(100))
        } else if link.is_enabled() {
            ((50, 0, 0), Duration::from_millis(400))
        } else {
            ((0, 50, 0), Duration::from_millis(1900))
        };
        led_on = !led_on;

        if let Err(e) = led.set_color(color) {
            debug!("Heartbeat LED write failed: {}", e);
        }
        sleep_cancellable(next_change_in, &running);
    }

    // 关停：恢复蓝色待机指示
    if let Err(e) = led.set_color((0, 0, 50)) {
        debug!("Heartbeat LED shutdown write failed: {}", e);
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use strider_serial::mock::MockPort;

    struct RecordingLed(Arc<Mutex<Vec<(u8, u8, u8)>>>);

    impl StatusLed for RecordingLed {
        fn set_color(&self, rgb: (u8, u8, u8)) -> std::io::Result<()> {
            self.0.lock().unwrap().push(rgb);
            Ok(())
        }
    }

    #[test]
    fn test_heartbeat_blinks_and_parks_blue() {
        let (port, link) = MockPort::new();
        let spare = port.clone();
        let motion = Arc::new(strider_driver::MotionLink::start(
            link,
            move || Ok(spare.link()),
            strider_driver::LinkConfig::default(),
        ));

        let colors = Arc::new(Mutex::new(Vec::new()));
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let led = Box::new(RecordingLed(colors.clone()));
            let motion = motion.clone();
            let running = running.clone();
            std::thread::spawn(move || heartbeat_loop(led, motion, running))
        };

        // 至少看到一次灭脉冲和一次未使能的绿色
        std::thread::sleep(Duration::from_millis(300));
        running.store(false, Ordering::Release);
        handle.join().unwrap();

        let colors = colors.lock().unwrap();
        assert!(colors.contains(&(0, 0, 0)));
        assert!(colors.contains(&(0, 50, 0)));
        assert_eq!(*colors.last().unwrap(), (0, 0, 50));
    }
}
