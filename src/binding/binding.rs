//! 姿态应用

use crate::document::SceneNode;
use crate::interpolate::{cutover_visible, interpolate, Pose};

use super::SceneGraph;

/// 一次应用所取的采样位置
#[derive(Clone, Copy, Debug)]
enum Sample {
    /// 步骤第一帧，精确应用
    Entry,
    /// 步骤最后一帧，精确应用
    Exit,
    /// 段内插值。变换用缓动后的参数，可见性切换用原始参数
    Interpolated {
        segment_index: usize,
        transform_t: f32,
        visibility_t: f32,
    },
}

/// 场景绑定：把节点树的姿态写入外部场景图
///
/// 每次应用都遍历整棵节点树。解析失败的节点记日志后跳过，
/// 其余节点继续更新；父节点缺失不意味着子节点缺失，
/// 因此无论解析结果如何都会递归到子节点。
pub struct SceneBinding<S: SceneGraph> {
    scene: S,
}

impl<S: SceneGraph> SceneBinding<S> {
    pub fn new(scene: S) -> Self {
        Self { scene }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_inner(self) -> S {
        self.scene
    }

    /// 应用步骤入场姿态（每个节点该步骤的第一个关键帧）
    pub fn apply_entry_pose(&mut self, nodes: &[SceneNode], step_index: usize) {
        self.apply_nodes(nodes, step_index, Sample::Entry);
    }

    /// 应用步骤出场姿态（每个节点该步骤的最后一个关键帧）
    ///
    /// 精确取帧而不是以 t=1 插值，避免残留浮点误差。
    pub fn apply_exit_pose(&mut self, nodes: &[SceneNode], step_index: usize) {
        self.apply_nodes(nodes, step_index, Sample::Exit);
    }

    /// 应用一次段内插值姿态
    ///
    /// 调用方每个渲染帧对同一棵树用同一组参数调用一次；
    /// 参数按节点重新计算会导致节点间失步。
    pub fn apply_interpolated(
        &mut self,
        nodes: &[SceneNode],
        step_index: usize,
        segment_index: usize,
        transform_t: f32,
        visibility_t: f32,
    ) {
        self.apply_nodes(
            nodes,
            step_index,
            Sample::Interpolated {
                segment_index,
                transform_t,
                visibility_t,
            },
        );
    }

    fn apply_nodes(&mut self, nodes: &[SceneNode], step_index: usize, sample: Sample) {
        for node in nodes {
            if let Some(pose) = sample_node(node, step_index, sample) {
                self.apply_pose(node, &pose);
            }
            self.apply_nodes(&node.children, step_index, sample);
        }
    }

    fn apply_pose(&mut self, node: &SceneNode, pose: &Pose) {
        match self.scene.find_by_name(&node.name) {
            Some(handle) => {
                self.scene
                    .set_transform(&handle, pose.position, pose.rotation, pose.scale);
                self.scene.set_visible(&handle, pose.visible);
            }
            None => {
                log::warn!("[场景绑定] 未找到场景节点: {}", node.name);
            }
        }
    }
}

/// 按采样位置求节点姿态
///
/// 该步骤没有关键帧的节点返回 None（无动画，跳过）；
/// 只有一个关键帧的节点整个步骤保持恒定姿态，不做段运算。
fn sample_node(node: &SceneNode, step_index: usize, sample: Sample) -> Option<Pose> {
    let frames = node.keyframes_for_step(step_index);
    match frames.len() {
        0 => None,
        1 => Some(Pose::from_keyframe(&frames[0])),
        count => Some(match sample {
            Sample::Entry => Pose::from_keyframe(&frames[0]),
            Sample::Exit => Pose::from_keyframe(&frames[count - 1]),
            Sample::Interpolated {
                segment_index,
                transform_t,
                visibility_t,
            } => {
                // 关键帧数少于基准节点时收缩到自身最后一段
                let segment = segment_index.min(count - 2);
                let a = &frames[segment];
                let b = &frames[segment + 1];
                let mut pose = interpolate(a, b, transform_t);
                pose.visible = cutover_visible(a.visible, b.visible, visibility_t);
                pose
            }
        }),
    }
}
