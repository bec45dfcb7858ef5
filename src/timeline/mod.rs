//! 时间线控制器
//!
//! 每个查看器会话持有一个控制器实例，按步骤驱动关键帧播放：
//! 把累计时间换算成段索引和段内进度，每个渲染帧求值一次
//! 并写入场景图，提供播放/暂停/继续/停止/跳转操作。

mod clock;
mod config;
mod controller;

pub use clock::{FrameClock, ManualClock, SubscriptionId};
pub use config::PlaybackConfig;
pub use controller::{Phase, TimelineController};
