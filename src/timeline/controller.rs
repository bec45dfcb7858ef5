//! 播放状态机

use crate::binding::{SceneBinding, SceneGraph};
use crate::document::{AnimationDocument, CameraHint, Step};

use super::clock::{FrameClock, SubscriptionId};
use super::config::PlaybackConfig;

/// 播放阶段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// 未加载步骤或已显式停止
    Idle,
    /// 正在推进并每帧写入姿态
    Playing,
    /// 累计时间冻结，无每帧更新
    Paused,
    /// 累计时间到达步骤总时长，等待调用方切步或重新跳转
    Finished,
}

/// 时间线控制器
///
/// 独占持有动画文档和时间线状态。状态只通过下列操作变更，
/// 误用操作（非播放时暂停、非暂停时继续、重复开始）都是
/// 无害的空操作，不会破坏状态。
///
/// 不变量：`Playing` 时恰好存在一个时钟订阅；其余阶段没有
/// 订阅，也就没有后台工作。任何时刻最多一个存活订阅。
pub struct TimelineController<S: SceneGraph, C: FrameClock> {
    document: AnimationDocument,
    binding: SceneBinding<S>,
    clock: C,
    config: PlaybackConfig,
    step_index: usize,
    elapsed: f32,
    phase: Phase,
    subscription: Option<SubscriptionId>,
}

impl<S: SceneGraph, C: FrameClock> TimelineController<S, C> {
    pub fn new(document: AnimationDocument, scene: S, clock: C, config: PlaybackConfig) -> Self {
        Self {
            document,
            binding: SceneBinding::new(scene),
            clock,
            config,
            step_index: 0,
            elapsed: 0.0,
            phase: Phase::Idle,
            subscription: None,
        }
    }

    /// 从任意状态开始播放指定步骤
    ///
    /// 应用入场姿态后订阅时钟。没有计时内容的退化步骤
    /// （基准关键帧数 < 2 或段时长非正）直接应用出场姿态并
    /// 进入 `Finished`，从不订阅时钟，也就不会除以零时长。
    pub fn start(&mut self, step_index: usize) {
        if step_index >= self.document.step_count() {
            log::warn!(
                "[时间线] 步骤索引越界: {} (共 {} 步)",
                step_index,
                self.document.step_count()
            );
            return;
        }

        self.release_clock();
        self.step_index = step_index;
        self.elapsed = 0.0;
        self.binding.apply_entry_pose(&self.document.nodes, step_index);

        let segments = self.total_segments(step_index);
        if segments == 0 || self.config.segment_duration <= 0.0 {
            self.binding.apply_exit_pose(&self.document.nodes, step_index);
            self.phase = Phase::Finished;
            log::debug!("[时间线] 步骤 {} 无计时内容，立即完成", step_index);
            return;
        }

        self.acquire_clock();
        self.phase = Phase::Playing;
        log::debug!(
            "[时间线] 开始播放步骤 {} ({} 段, 共 {:.2}s)",
            step_index,
            segments,
            self.config.segment_duration * segments as f32
        );
    }

    /// 每帧推进。仅在 `Playing` 时生效
    ///
    /// 进度在每帧计算一次并以同一组参数应用到所有节点；
    /// 负的时间增量按零处理。
    pub fn tick(&mut self, delta_seconds: f32) {
        if self.phase != Phase::Playing {
            return;
        }

        self.elapsed += delta_seconds.max(0.0);

        let segments = self.total_segments(self.step_index).max(1);
        let total_duration = self.config.segment_duration * segments as f32;

        if self.elapsed >= total_duration {
            // 精确应用最后一帧，不走插值，避免残留浮点误差
            self.binding.apply_exit_pose(&self.document.nodes, self.step_index);
            self.release_clock();
            self.phase = Phase::Finished;
            self.elapsed = 0.0;
            log::debug!("[时间线] 步骤 {} 播放完成", self.step_index);

            if self.config.auto_advance {
                let next = self.step_index + 1;
                if next < self.document.step_count() {
                    self.start(next);
                }
            }
            return;
        }

        let progress = (self.elapsed / total_duration).clamp(0.0, 1.0);
        let scaled = progress * segments as f32;
        let segment_index = (scaled as usize).min(segments - 1);
        let local_t = (scaled - segment_index as f32).clamp(0.0, 1.0);
        let transform_t = self.config.easing.apply(local_t);

        self.binding.apply_interpolated(
            &self.document.nodes,
            self.step_index,
            segment_index,
            transform_t,
            local_t,
        );
    }

    /// 暂停。仅在 `Playing` 时生效，冻结累计时间并退订时钟
    pub fn pause(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.release_clock();
        self.phase = Phase::Paused;
        log::debug!("[时间线] 暂停于步骤 {} ({:.2}s)", self.step_index, self.elapsed);
    }

    /// 继续。仅在 `Paused` 时生效，从冻结的累计时间处续播
    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.acquire_clock();
        self.phase = Phase::Playing;
    }

    /// 停止。从任意状态退订时钟、清零累计时间、回到 `Idle`
    pub fn stop(&mut self) {
        self.release_clock();
        self.elapsed = 0.0;
        self.phase = Phase::Idle;
    }

    /// 跳转到指定步骤
    ///
    /// 停止当前播放并应用新步骤的入场姿态。`autoplay` 为真时
    /// 立即开始播放（播放中切步的观察行为），否则停在 `Idle`
    /// 等待显式 `start`。
    pub fn seek(&mut self, step_index: usize, autoplay: bool) {
        if step_index >= self.document.step_count() {
            log::warn!(
                "[时间线] 跳转目标越界: {} (共 {} 步)",
                step_index,
                self.document.step_count()
            );
            return;
        }

        if autoplay {
            self.start(step_index);
            return;
        }

        self.release_clock();
        self.step_index = step_index;
        self.elapsed = 0.0;
        self.binding.apply_entry_pose(&self.document.nodes, step_index);
        self.phase = Phase::Idle;
    }

    /// 当前播放阶段
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// 当前步骤索引
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// 当前步骤在 [0,1] 内的播放进度
    pub fn progress(&self) -> f32 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Finished => 1.0,
            Phase::Playing | Phase::Paused => {
                let segments = self.total_segments(self.step_index).max(1);
                let total_duration = self.config.segment_duration * segments as f32;
                if total_duration > 0.0 {
                    (self.elapsed / total_duration).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
        }
    }

    /// 当前步骤记录
    pub fn current_step(&self) -> Option<&Step> {
        self.document.step(self.step_index)
    }

    /// 当前步骤的相机提示
    pub fn current_camera_hint(&self) -> Option<CameraHint> {
        self.current_step().and_then(|step| step.camera_hint)
    }

    pub fn document(&self) -> &AnimationDocument {
        &self.document
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn binding(&self) -> &SceneBinding<S> {
        &self.binding
    }

    fn total_segments(&self, step_index: usize) -> usize {
        self.document
            .reference_keyframe_count(step_index)
            .saturating_sub(1)
    }

    /// 订阅时钟。已有订阅时什么都不做，保证最多一个存活订阅
    fn acquire_clock(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.clock.subscribe());
        }
    }

    /// 退订时钟。没有订阅时什么都不做
    fn release_clock(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.clock.unsubscribe(id);
        }
    }
}

impl<S: SceneGraph, C: FrameClock> Drop for TimelineController<S, C> {
    /// 查看器销毁时无条件退订，残留订阅是资源泄漏
    fn drop(&mut self) {
        self.release_clock();
    }
}
