//! Mock 串口后端（无硬件依赖）
//!
//! 脚本化的链路替身：测试侧通过 [`MockPort`] 预置读取步骤、
//! 注入写失败并检查已写出的帧；[`MockSerialLink`] 交给运动链路
//! 独占驱动。`Clone` 共享同一内部状态，重连测试可以复用。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::{SerialError, SerialLink};

/// 一次 `read_until` 调用的脚本步骤
#[derive(Debug, Clone)]
pub enum ReadStep {
    /// 返回该负载（视为分隔符之前的字节）
    Reply(Vec<u8>),
    /// 微控制器沉默：返回读取超时
    Timeout,
    /// 链路故障：返回 IO 错误
    Fail,
}

#[derive(Default)]
struct MockState {
    written: Vec<Vec<u8>>,
    reads: VecDeque<ReadStep>,
    fail_writes: usize,
}

/// 测试侧控制句柄
#[derive(Clone, Default)]
pub struct MockPort {
    state: Arc<Mutex<MockState>>,
}

impl MockPort {
    /// 创建控制句柄与对应的链路端
    pub fn new() -> (Self, MockSerialLink) {
        let port = Self::default();
        let link = MockSerialLink {
            state: port.state.clone(),
        };
        (port, link)
    }

    /// 取得一个共享同一状态的新链路端（重连场景）
    pub fn link(&self) -> MockSerialLink {
        MockSerialLink {
            state: self.state.clone(),
        }
    }

    /// 预置一个读取步骤
    pub fn push_read(&self, step: ReadStep) {
        self.state.lock().unwrap().reads.push_back(step);
    }

    /// 预置 `n` 个回复负载
    pub fn push_replies(&self, payload: &[u8], n: usize) {
        let mut state = self.state.lock().unwrap();
        for _ in 0..n {
            state.reads.push_back(ReadStep::Reply(payload.to_vec()));
        }
    }

    /// 接下来的 `n` 次写入失败
    pub fn fail_next_writes(&self, n: usize) {
        self.state.lock().unwrap().fail_writes = n;
    }

    /// 已写出的帧快照
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().written.clone()
    }

    /// 取走已写出的帧
    pub fn take_written(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.state.lock().unwrap().written)
    }
}

/// 链路端替身
#[derive(Clone)]
pub struct MockSerialLink {
    state: Arc<Mutex<MockState>>,
}

impl SerialLink for MockSerialLink {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), SerialError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes > 0 {
            state.fail_writes -= 1;
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "mock write failure",
            )
            .into());
        }
        state.written.push(frame.to_vec());
        Ok(())
    }

    fn read_until(&mut self, _delimiter: u8) -> Result<Vec<u8>, SerialError> {
        let step = self.state.lock().unwrap().reads.pop_front();
        match step {
            Some(ReadStep::Reply(payload)) => Ok(payload),
            // 未预置脚本时表现为沉默的微控制器
            Some(ReadStep::Timeout) | None => Err(SerialError::Timeout),
            Some(ReadStep::Fail) => Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "mock read failure",
            )
            .into()),
        }
    }
}
