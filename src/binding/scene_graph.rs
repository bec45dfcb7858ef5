//! 外部场景图接口

use glam::{Quat, Vec3};

/// 渲染框架提供的场景图能力
///
/// 引擎只计算目标变换和可见性，实际渲染全部委托给实现方。
/// 所有调用都发生在宿主的场景变更上下文内（单一逻辑线程）。
pub trait SceneGraph {
    /// 场景对象的不透明引用
    type Handle;

    /// 在宿主场景中深度优先按名称查找对象
    fn find_by_name(&mut self, name: &str) -> Option<Self::Handle>;

    /// 写入对象的位置、旋转和缩放
    fn set_transform(&mut self, handle: &Self::Handle, position: Vec3, rotation: Quat, scale: Vec3);

    /// 写入对象的可见（启用）标志
    fn set_visible(&mut self, handle: &Self::Handle, visible: bool);
}
