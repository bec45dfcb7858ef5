//! 动画文档数据模型
//!
//! 加载器构建后不可变。文档由唯一一个时间线控制器独占持有，
//! 所有查询接口均为只读，可被多个消费者并发读取。

use std::collections::HashMap;

use glam::{Quat, Vec3};

/// 关键帧：节点在某一步骤内的一个瞬时姿态采样
///
/// 同一节点同一步骤内的关键帧按时间顺序排列，
/// 第一帧是该步骤的入场姿态，最后一帧是出场姿态。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
}

/// 场景节点：节点树中的一个命名节点
///
/// `step_poses[i]` 是该节点在步骤 i 内的关键帧序列。
/// 条目数少于当前步骤索引的节点视为"该步骤无动画"，
/// 属于定义好的降级路径而不是错误。
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub step_poses: Vec<Vec<Keyframe>>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// 取指定步骤的关键帧序列，超出范围返回空切片
    pub fn keyframes_for_step(&self, step_index: usize) -> &[Keyframe] {
        self.step_poses
            .get(step_index)
            .map(|frames| frames.as_slice())
            .unwrap_or(&[])
    }

    /// 前序深度优先按名称查找节点，返回第一个匹配
    ///
    /// 名称假定在场景内唯一；出现重名时第一个前序匹配生效。
    pub fn find_by_name(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        find_in_forest(&self.children, name)
    }

    /// 本节点及所有后代中最大的步骤条目数
    pub fn max_step_count(&self) -> usize {
        let own = self.step_poses.len();
        self.children
            .iter()
            .map(|child| child.max_step_count())
            .fold(own, usize::max)
    }
}

fn find_in_forest<'a>(nodes: &'a [SceneNode], name: &str) -> Option<&'a SceneNode> {
    for node in nodes {
        if let Some(found) = node.find_by_name(name) {
            return Some(found);
        }
    }
    None
}

/// 步骤说明文本（按语言代码索引）
#[derive(Clone, Debug, Default)]
pub struct LocalizedText {
    pub text: HashMap<String, String>,
}

impl LocalizedText {
    /// 取指定语言的文本
    pub fn get(&self, language: &str) -> Option<&str> {
        self.text.get(language).map(String::as_str)
    }

    /// 取任意可用语言的文本，优先英语
    pub fn any(&self) -> Option<&str> {
        self.get("en")
            .or_else(|| self.text.values().next().map(String::as_str))
    }
}

/// 步骤语音说明的媒体引用
#[derive(Clone, Debug, Default)]
pub struct SpeechMedia {
    pub media_urls: HashMap<String, String>,
    pub media_names: HashMap<String, String>,
}

/// 步骤相机提示：建议的相机位置和注视目标
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraHint {
    pub position: Vec3,
    pub target: Vec3,
}

/// 装配步骤
#[derive(Clone, Debug)]
pub struct Step {
    pub title: String,
    pub description_text: LocalizedText,
    pub description_speech: Option<SpeechMedia>,
    pub camera_hint: Option<CameraHint>,
}

/// 环境渲染参数，原样透传给宿主渲染层
#[derive(Clone, Debug)]
pub struct EnvironmentSettings {
    pub zenith_color: [f32; 3],
    pub nadir_color: [f32; 3],
    pub use_gradient_bg: bool,
    pub rotation_deg: f32,
    pub env_intensity: f32,
    pub bg_intensity: f32,
    pub bg_blur: f32,
    pub tone_mapping_exposure: f32,
    pub tone_map: i32,
    pub env_map_url: String,
}

/// 动画文档：解码后的根结构
#[derive(Clone, Debug)]
pub struct AnimationDocument {
    pub version: u32,
    pub steps: Vec<Step>,
    pub nodes: Vec<SceneNode>,
    pub env: Option<EnvironmentSettings>,
}

impl AnimationDocument {
    /// 步骤数量
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// 取步骤
    pub fn step(&self, step_index: usize) -> Option<&Step> {
        self.steps.get(step_index)
    }

    /// 前序深度优先在整个节点森林中按名称查找
    pub fn find_node(&self, name: &str) -> Option<&SceneNode> {
        find_in_forest(&self.nodes, name)
    }

    /// 指定步骤的基准关键帧数
    ///
    /// 时序策略：前序遍历中第一个在该步骤有关键帧的节点
    /// 决定所有节点的步骤时长。加载器已校验同一步骤内所有
    /// 参与动画的节点关键帧数一致。无任何关键帧时返回 0。
    pub fn reference_keyframe_count(&self, step_index: usize) -> usize {
        fn visit(nodes: &[SceneNode], step_index: usize) -> usize {
            for node in nodes {
                let count = node.keyframes_for_step(step_index).len();
                if count > 0 {
                    return count;
                }
                let from_children = visit(&node.children, step_index);
                if from_children > 0 {
                    return from_children;
                }
            }
            0
        }
        visit(&self.nodes, step_index)
    }
}
