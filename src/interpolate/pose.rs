//! 关键帧间的姿态插值

use glam::{Quat, Vec3};

use crate::document::Keyframe;

/// 节点姿态：一次插值计算的结果
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
}

impl Pose {
    /// 单个关键帧到绝对姿态的恒等映射
    ///
    /// 用于步骤首尾帧的精确应用和只有一个关键帧的节点，
    /// 不经过插值，无切换逻辑。
    pub fn from_keyframe(keyframe: &Keyframe) -> Self {
        Self {
            position: keyframe.position,
            rotation: keyframe.rotation,
            scale: keyframe.scale,
            visible: keyframe.visible,
        }
    }
}

/// 在两个关键帧之间按进度 t 插值
///
/// t 在使用前被限制到 [0,1]，从不外推。
pub fn interpolate(a: &Keyframe, b: &Keyframe, t: f32) -> Pose {
    let t = t.clamp(0.0, 1.0);
    Pose {
        position: a.position.lerp(b.position, t),
        rotation: slerp(a.rotation, b.rotation, t),
        scale: a.scale.lerp(b.scale, t),
        visible: cutover_visible(a.visible, b.visible, t),
    }
}

/// 最短弧球面插值
///
/// 点积为负时翻转其中一个四元数，避免绕远弧旋转；
/// 输出重新归一化，抵御浮点漂移。
pub fn slerp(a: Quat, b: Quat, t: f32) -> Quat {
    let b = if a.dot(b) < 0.0 { -b } else { b };
    a.slerp(b, t).normalize()
}

/// 可见性在中点硬切换：t < 0.5 取 a，否则取 b
///
/// 不做插值是沿用的既有策略，集中在这一个函数里以便调整。
pub fn cutover_visible(a: bool, b: bool, t: f32) -> bool {
    if t < 0.5 {
        a
    } else {
        b
    }
}
