//! JSON 线上格式
//!
//! 与后端载荷逐字段对应的 serde 镜像结构，仅供加载器使用。
//! 未知字段忽略，可选集合缺省为空。

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct WireDocument {
    pub version: u32,
    #[serde(default)]
    pub steps: Vec<WireStep>,
    #[serde(default)]
    pub nodes: Vec<WireNode>,
    #[serde(default)]
    pub env: Option<WireEnv>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireStep {
    #[serde(default)]
    pub keyframes: Vec<WireStepKeyframe>,
    pub description_text: WireDescriptionText,
    #[serde(default)]
    pub description_speech: Option<WireDescriptionSpeech>,
}

/// 步骤级关键帧只携带相机信息
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireStepKeyframe {
    #[serde(default)]
    pub camera_pos: Option<WireVec3>,
    #[serde(default)]
    pub camera_target: Option<WireVec3>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireDescriptionText {
    #[serde(default)]
    pub text: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireDescriptionSpeech {
    #[serde(default)]
    pub media_urls: Option<HashMap<String, String>>,
    #[serde(default)]
    pub media_names: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireNode {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<WireNodeStep>,
    #[serde(default)]
    pub children: Vec<WireNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireNodeStep {
    #[serde(default)]
    pub keyframes: Vec<WireKeyframe>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireKeyframe {
    pub position: WireVec3,
    /// x,y,z,w 分量顺序
    pub quaternion: [f32; 4],
    pub scale: WireVec3,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(super) struct WireVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireEnv {
    #[serde(default)]
    pub zenith_color: Vec<f32>,
    #[serde(default)]
    pub nadir_color: Vec<f32>,
    #[serde(default)]
    pub use_gradient_bg: bool,
    #[serde(default)]
    pub rotation_deg: f32,
    #[serde(default)]
    pub env_intensity: f32,
    #[serde(default)]
    pub bg_intensity: f32,
    #[serde(default)]
    pub bg_blur: f32,
    #[serde(default)]
    pub tone_mapping_exposure: f32,
    #[serde(default)]
    pub tone_map: i32,
    #[serde(default)]
    pub env_map_url: String,
}
