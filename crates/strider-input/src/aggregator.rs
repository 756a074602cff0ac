//! 状态快照的写者/读者分离
//!
//! `ArcSwap` 原子快照交换：事件泵线程持有 [`StateWriter`]（轴/键
//! 字段的唯一写者），电池轮询线程持有 [`BatteryWriter`]（电量的
//! 唯一写者，独立原子单元，避免与事件写者产生读-改-写竞争），
//! 任意多个读者通过 [`ControllerHandle`] 克隆共享。

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use arc_swap::ArcSwap;

use crate::event::InputEvent;
use crate::state::ControllerState;

struct Shared {
    state: ArcSwap<ControllerState>,
    battery: AtomicU8,
}

/// 读者句柄（可克隆，跨线程共享）
#[derive(Clone)]
pub struct ControllerHandle {
    shared: Arc<Shared>,
}

impl ControllerHandle {
    /// 返回当前状态的完整一致快照；从不阻塞
    ///
    /// 与写者并发调用安全。电量从独立原子单元合并进快照。
    pub fn snapshot(&self) -> ControllerState {
        let mut state = **self.shared.state.load();
        state.battery = self.shared.battery.load(Ordering::Relaxed);
        state
    }
}

/// 轴/键字段的唯一写者（事件泵线程持有）
pub struct StateWriter {
    current: ControllerState,
    shared: Arc<Shared>,
}

impl StateWriter {
    /// 应用一条事件并发布新快照
    pub fn apply(&mut self, event: InputEvent) {
        self.current.apply_event(event);
        self.shared.state.store(Arc::new(self.current));
    }
}

/// 电量字段的唯一写者（电池轮询线程持有）
pub struct BatteryWriter {
    shared: Arc<Shared>,
}

impl BatteryWriter {
    pub fn set(&self, percent: u8) {
        self.shared.battery.store(percent.min(100), Ordering::Relaxed);
    }
}

/// 创建一组写者与读者句柄
pub fn state_cell() -> (StateWriter, BatteryWriter, ControllerHandle) {
    let shared = Arc::new(Shared {
        state: ArcSwap::from_pointee(ControllerState::default()),
        battery: AtomicU8::new(0),
    });
    (
        StateWriter {
            current: ControllerState::default(),
            shared: shared.clone(),
        },
        BatteryWriter {
            shared: shared.clone(),
        },
        ControllerHandle { shared },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Axis, Button};

    #[test]
    fn test_snapshot_reflects_last_write() {
        let (mut writer, battery, handle) = state_cell();

        writer.apply(InputEvent::Axis {
            axis: Axis::RightStickY,
            value: 255,
        });
        writer.apply(InputEvent::Button {
            button: Button::Triangle,
            pressed: true,
        });
        battery.set(87);

        let snap = handle.snapshot();
        assert_eq!(snap.right_stick_y, 255);
        assert!(snap.triangle);
        assert_eq!(snap.battery, 87);
    }

    #[test]
    fn test_battery_capped_at_100() {
        let (_writer, battery, handle) = state_cell();
        battery.set(250);
        assert_eq!(handle.snapshot().battery, 100);
    }

    #[test]
    fn test_concurrent_reads_see_consistent_snapshots() {
        let (mut writer, _battery, handle) = state_cell();

        let reader = {
            let handle = handle.clone();
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let snap = handle.snapshot();
                    // 写者按对写入两根摇杆轴；快照要么看到旧对，
                    // 要么看到新对的前半，但单个字段永远是完整值
                    assert!(snap.left_stick_x == 128 || snap.left_stick_x == 200);
                }
            })
        };

        for _ in 0..1000 {
            writer.apply(InputEvent::Axis {
                axis: Axis::LeftStickX,
                value: 200,
            });
            writer.apply(InputEvent::Axis {
                axis: Axis::LeftStickX,
                value: 128,
            });
        }

        reader.join().unwrap();
    }
}
