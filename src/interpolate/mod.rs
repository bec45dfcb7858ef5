//! 姿态插值
//!
//! 在两个关键帧之间计算插值姿态：位置和缩放线性插值，
//! 旋转最短弧球面插值，可见性在中点硬切换。

mod easing;
mod pose;

pub use easing::Easing;
pub use pose::{cutover_visible, interpolate, slerp, Pose};
