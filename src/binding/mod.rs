//! 场景图绑定
//!
//! 按名称把文档节点解析到外部渲染框架的场景对象，
//! 并在每个渲染帧把计算出的姿态和可见性写入。

mod binding;
mod scene_graph;

#[cfg(test)]
pub(crate) mod mock;

pub use binding::SceneBinding;
pub use scene_graph::SceneGraph;
