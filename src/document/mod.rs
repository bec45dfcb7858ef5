//! 动画文档 - 数据模型与加载器
//!
//! 提供装配指导动画的不可变数据模型，以及从 JSON 载荷
//! 构建文档的加载器（含 gzip 解压和轴约定重映射）。

mod loader;
mod model;
mod wire;

pub use loader::{load_document, load_document_str, AxisConvention, LoaderConfig, SUPPORTED_VERSIONS};
pub use model::{
    AnimationDocument, CameraHint, EnvironmentSettings, Keyframe, LocalizedText, SceneNode,
    SpeechMedia, Step,
};
