//! 运动链路集成测试（mock 串口，无硬件）

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use strider_driver::{LinkConfig, LinkState, MotionLink};
use strider_protocol::{MotionIntent, RemoteCommand, StatusFrame};
use strider_serial::mock::{MockPort, ReadStep};
use strider_serial::SerialDeviceError;
use strider_serial::SerialDeviceErrorKind;

fn fast_config() -> LinkConfig {
    LinkConfig {
        tick: Duration::from_millis(10),
        reconnect_interval: Duration::from_millis(80),
    }
}

/// 轮询等待条件成立
fn wait_until(mut pred: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if pred() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_disabled_link_sends_stopped_frames() {
    let (port, link) = MockPort::new();
    let spare = port.clone();
    let mut motion = MotionLink::start(link, move || Ok(spare.link()), fast_config());

    assert!(wait_until(|| !port.written().is_empty(), Duration::from_secs(1)));
    motion.shutdown();

    for frame in port.written() {
        let decoded = RemoteCommand::decode(&frame).unwrap();
        assert_eq!(decoded, RemoteCommand::stopped());
    }
}

#[test]
fn test_enabled_link_sends_last_intent() {
    let (port, link) = MockPort::new();
    let spare = port.clone();
    let mut motion = MotionLink::start(link, move || Ok(spare.link()), fast_config());

    let first = MotionIntent {
        right_fb: 30,
        ..MotionIntent::default()
    };
    let second = MotionIntent {
        right_fb: 127,
        cross: true,
        ..MotionIntent::default()
    };

    motion.set_enabled(true, 6);
    motion.move_intent(first);
    motion.move_intent(second);

    // 发送的是最近一次写入，不存在积压重放
    assert!(wait_until(
        || {
            port.written()
                .last()
                .is_some_and(|frame| RemoteCommand::decode(frame).unwrap().intent == second)
        },
        Duration::from_secs(1)
    ));
    motion.shutdown();

    let frames = port.written();
    let last = RemoteCommand::decode(frames.last().unwrap()).unwrap();
    assert!(last.enabled);
    assert_eq!(last.mode_id, 6);
    assert_eq!(last.intent, second);
    // 第一次写入的意图不会在其后重放
    let first_seen = frames
        .iter()
        .rposition(|frame| RemoteCommand::decode(frame).unwrap().intent == first);
    let second_seen = frames
        .iter()
        .position(|frame| RemoteCommand::decode(frame).unwrap().intent == second);
    if let (Some(f), Some(s)) = (first_seen, second_seen) {
        assert!(f < s);
    }
}

#[test]
fn test_stop_overrides_mode_intent() {
    let (port, link) = MockPort::new();
    let spare = port.clone();
    let mut motion = MotionLink::start(link, move || Ok(spare.link()), fast_config());

    motion.set_enabled(true, 6);
    motion.move_intent(MotionIntent {
        left_fb: -90,
        ..MotionIntent::default()
    });
    assert!(wait_until(|| !port.written().is_empty(), Duration::from_secs(1)));

    // disable 路径：先停帧再清使能
    motion.stop();
    motion.set_enabled(false, 0);
    port.take_written();

    // 多等几个 tick，跳过 disable 前已在途的那一帧
    assert!(wait_until(|| port.written().len() >= 3, Duration::from_secs(1)));
    motion.shutdown();

    let frames = port.written();
    let last = RemoteCommand::decode(frames.last().unwrap()).unwrap();
    assert_eq!(last, RemoteCommand::stopped());
}

#[test]
fn test_status_reply_published() {
    let (port, link) = MockPort::new();
    let mut status = StatusFrame::default();
    status.connected = [true; 6];
    status.errors[3] = [2, 0];
    port.push_replies(&status.encode(), 50);

    let spare = port.clone();
    let mut motion = MotionLink::start(link, move || Ok(spare.link()), fast_config());

    assert!(wait_until(
        || motion.status().all_connected(),
        Duration::from_secs(1)
    ));
    assert_eq!(motion.status(), status);
    assert_eq!(motion.link_state(), LinkState::Connected);
    motion.shutdown();
}

#[test]
fn test_malformed_reply_discarded_without_teardown() {
    let (port, link) = MockPort::new();
    // 一段无法解码的噪声，随后恢复正常回复
    port.push_read(ReadStep::Reply(vec![1, 2, 3]));
    let mut status = StatusFrame::default();
    status.connected = [true; 6];
    port.push_replies(&status.encode(), 50);

    let spare = port.clone();
    let mut motion = MotionLink::start(link, move || Ok(spare.link()), fast_config());

    assert!(wait_until(
        || motion.status().all_connected(),
        Duration::from_secs(1)
    ));
    // 协议失步只是瞬态噪声：链路从未离开 Connected
    assert_eq!(motion.link_state(), LinkState::Connected);
    motion.shutdown();
}

#[test]
fn test_write_failure_enters_reconnecting_then_recovers() {
    let (port, link) = MockPort::new();
    port.fail_next_writes(1);

    let attempts = Arc::new(AtomicUsize::new(0));
    let attempt_times = Arc::new(Mutex::new(Vec::new()));
    let connector = {
        let port = port.clone();
        let attempts = attempts.clone();
        let attempt_times = attempt_times.clone();
        move || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            attempt_times.lock().unwrap().push(Instant::now());
            if n == 0 {
                // 第一次重试仍失败，验证固定间隔节奏
                Err(SerialDeviceError::new(
                    SerialDeviceErrorKind::NotFound,
                    "still unplugged",
                )
                .into())
            } else {
                Ok(port.link())
            }
        }
    };

    let mut motion = MotionLink::start(link, connector, fast_config());

    // 写失败驱动进入 Reconnecting
    assert!(wait_until(
        || motion.link_state() == LinkState::Reconnecting,
        Duration::from_secs(1)
    ));

    // 重连成功后恢复 Connected 并继续发送
    assert!(wait_until(
        || motion.link_state() == LinkState::Connected,
        Duration::from_secs(2)
    ));
    let sent_before = port.written().len();
    assert!(wait_until(
        || port.written().len() > sent_before,
        Duration::from_secs(1)
    ));

    motion.shutdown();

    // 两次重试之间不快于配置的固定间隔
    let times = attempt_times.lock().unwrap();
    assert!(times.len() >= 2);
    assert!(times[1].duration_since(times[0]) >= Duration::from_millis(80));
}

#[test]
fn test_read_failure_also_reconnects() {
    let (port, link) = MockPort::new();
    port.push_read(ReadStep::Fail);

    let reconnected = Arc::new(AtomicUsize::new(0));
    let connector = {
        let port = port.clone();
        let reconnected = reconnected.clone();
        move || {
            reconnected.fetch_add(1, Ordering::SeqCst);
            Ok(port.link())
        }
    };

    let mut motion = MotionLink::start(link, connector, fast_config());

    assert!(wait_until(
        || reconnected.load(Ordering::SeqCst) >= 1,
        Duration::from_secs(1)
    ));
    assert!(wait_until(
        || motion.link_state() == LinkState::Connected,
        Duration::from_secs(1)
    ));
    motion.shutdown();
}

#[test]
fn test_shutdown_closes_link() {
    let (port, link) = MockPort::new();
    let spare = port.clone();
    let mut motion = MotionLink::start(link, move || Ok(spare.link()), fast_config());

    assert!(wait_until(|| !port.written().is_empty(), Duration::from_secs(1)));
    motion.shutdown();
    assert_eq!(motion.link_state(), LinkState::Closed);
}
