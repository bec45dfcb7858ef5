//! Assembly Engine - 装配指导动画播放引擎
//!
//! 提供分步装配指导的关键帧动画运行时：
//! - 动画文档（JSON）加载和校验
//! - 节点树关键帧数据模型
//! - 姿态插值（线性 + 四元数球面插值）
//! - 场景图绑定（按名称解析外部节点并写入变换）
//! - 时间线控制器（播放/暂停/继续/停止/跳转）

pub mod binding;
pub mod document;
pub mod interpolate;
pub mod timeline;

pub use binding::{SceneBinding, SceneGraph};
pub use document::{
    load_document, load_document_str, AnimationDocument, AxisConvention, CameraHint, Keyframe,
    LoaderConfig, SceneNode, Step,
};
pub use interpolate::{Easing, Pose};
pub use timeline::{
    FrameClock, ManualClock, Phase, PlaybackConfig, SubscriptionId, TimelineController,
};

use thiserror::Error;

/// 引擎错误
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported animation schema version: {0}")]
    SchemaVersionUnsupported(u32),

    #[error("Malformed animation payload: {0}")]
    MalformedPayload(String),

    #[error("Step count mismatch: {0}")]
    StepCountMismatch(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
