//! 协议常量定义

/// 串口波特率
pub const BAUD_RATE: u32 = 115_200;

/// 电机轴数量（每条腿髋/膝各一轴，共 6 轴）
pub const AXIS_COUNT: usize = 6;

/// 每轴的错误码槽位数
pub const ERROR_SLOTS_PER_AXIS: usize = 2;

/// Remote 命令负载长度（字节）
///
/// `enabled` + `mode_id` + 右摇杆 2 轴 + 右扳机 + 左摇杆 2 轴 + 左扳机
/// + 方向键 4 + 面键 4，每字段 1 字节。
pub const REMOTE_PAYLOAD_LEN: usize = 16;

/// 出向消息总长（判别字节 + Remote 负载）
pub const MESSAGE_LEN: usize = 1 + REMOTE_PAYLOAD_LEN;

/// Status 回复负载长度（字节）
///
/// 6 个连接标志 + 6 轴 × 2 错误码槽位（不含结尾分隔符）。
pub const STATUS_PAYLOAD_LEN: usize = AXIS_COUNT + AXIS_COUNT * ERROR_SLOTS_PER_AXIS;

/// Status 回复的结尾分隔字节
///
/// 回复侧不做长度前缀，微控制器以换行符标记帧尾。
pub const STATUS_DELIMITER: u8 = b'\n';
