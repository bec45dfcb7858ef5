//! 播放配置

use crate::interpolate::Easing;

/// 播放配置
///
/// 显式构造并随控制器传递，没有进程级全局状态，
/// 测试可以各自实例化互不影响的配置。
#[derive(Clone, Copy, Debug)]
pub struct PlaybackConfig {
    /// 相邻关键帧之间一段的时长（秒）
    pub segment_duration: f32,
    /// 段内变换插值的时间缓动
    pub easing: Easing,
    /// 步骤播放完成后自动开始下一步
    pub auto_advance: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            segment_duration: 1.5,
            easing: Easing::Linear,
            auto_advance: false,
        }
    }
}
