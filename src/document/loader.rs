//! 动画文档加载器
//!
//! 接收后端下发的动画载荷（JSON，可能经过 gzip 压缩），
//! 解压、解码、校验并转换为不可变的 `AnimationDocument`。
//! 加载失败意味着该文档无法播放，由调用方向用户呈现；
//! 引擎内部不做部分恢复。

use std::collections::HashSet;
use std::io::Read;

use flate2::read::GzDecoder;
use glam::{Quat, Vec3};

use crate::{EngineError, Result};

use super::model::{
    AnimationDocument, CameraHint, EnvironmentSettings, Keyframe, LocalizedText, SceneNode,
    SpeechMedia, Step,
};
use super::wire::{WireDocument, WireEnv, WireNode, WireStep, WireVec3};

/// 加载器接受的文档格式版本
pub const SUPPORTED_VERSIONS: &[u32] = &[1, 2];

/// gzip 魔数
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// 轴约定：加载时对位置和旋转的坐标系重映射
///
/// 部分制作工具以 Z 轴朝上导出数据，宿主渲染系统为 Y 轴朝上，
/// 此时需要 `ZUpToYUp` 重映射。映射是否启用取决于数据来源，
/// 因此作为显式配置暴露而不是静默统一。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisConvention {
    /// 按制作数据原样使用
    #[default]
    AsAuthored,
    /// Z 轴朝上 → Y 轴朝上：位置 (x,y,z) → (-z,x,y)，
    /// 四元数 (x,y,z,w) → (x,z,-y,w)
    ZUpToYUp,
}

impl AxisConvention {
    fn remap_position(self, v: WireVec3) -> Vec3 {
        match self {
            AxisConvention::AsAuthored => Vec3::new(v.x, v.y, v.z),
            AxisConvention::ZUpToYUp => Vec3::new(-v.z, v.x, v.y),
        }
    }

    fn remap_quaternion(self, q: [f32; 4]) -> Quat {
        match self {
            AxisConvention::AsAuthored => Quat::from_xyzw(q[0], q[1], q[2], q[3]),
            AxisConvention::ZUpToYUp => Quat::from_xyzw(q[0], q[2], -q[1], q[3]),
        }
    }
}

/// 加载配置
#[derive(Clone, Copy, Debug, Default)]
pub struct LoaderConfig {
    pub axis: AxisConvention,
}

/// 从字节载荷加载动画文档，自动识别 gzip 压缩
pub fn load_document(bytes: &[u8], config: &LoaderConfig) -> Result<AnimationDocument> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(bytes);
        let mut json = String::new();
        decoder.read_to_string(&mut json)?;
        load_document_str(&json, config)
    } else {
        let json = std::str::from_utf8(bytes)
            .map_err(|e| EngineError::MalformedPayload(format!("invalid UTF-8: {}", e)))?;
        load_document_str(json, config)
    }
}

/// 从已解压的 JSON 字符串加载动画文档
pub fn load_document_str(json: &str, config: &LoaderConfig) -> Result<AnimationDocument> {
    let wire: WireDocument = serde_json::from_str(json)
        .map_err(|e| EngineError::MalformedPayload(e.to_string()))?;

    if !SUPPORTED_VERSIONS.contains(&wire.version) {
        return Err(EngineError::SchemaVersionUnsupported(wire.version));
    }

    let nodes = wire
        .nodes
        .iter()
        .map(|node| convert_node(node, config.axis))
        .collect::<Result<Vec<_>>>()?;

    validate_step_counts(&nodes, wire.steps.len())?;
    warn_duplicate_names(&nodes);

    let steps = wire
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| convert_step(index, step))
        .collect();

    let document = AnimationDocument {
        version: wire.version,
        steps,
        nodes,
        env: wire.env.map(convert_env),
    };

    log::info!(
        "[动画加载] 解码完成: 版本 {}, {} 个步骤, {} 个根节点",
        document.version,
        document.steps.len(),
        document.nodes.len()
    );

    Ok(document)
}

fn convert_node(wire: &WireNode, axis: AxisConvention) -> Result<SceneNode> {
    let step_poses = wire
        .steps
        .iter()
        .map(|step| {
            step.keyframes
                .iter()
                .map(|kf| {
                    let scale = Vec3::new(kf.scale.x, kf.scale.y, kf.scale.z);
                    if scale.cmple(Vec3::ZERO).any() {
                        return Err(EngineError::MalformedPayload(format!(
                            "node '{}' has non-positive scale {:?}",
                            wire.name, scale
                        )));
                    }

                    let rotation = axis.remap_quaternion(kf.quaternion);
                    if !rotation.is_finite() || rotation.length_squared() == 0.0 {
                        return Err(EngineError::MalformedPayload(format!(
                            "node '{}' has degenerate quaternion {:?}",
                            wire.name, kf.quaternion
                        )));
                    }

                    Ok(Keyframe {
                        position: axis.remap_position(kf.position),
                        rotation: rotation.normalize(),
                        scale,
                        visible: kf.visible,
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let children = wire
        .children
        .iter()
        .map(|child| convert_node(child, axis))
        .collect::<Result<Vec<_>>>()?;

    Ok(SceneNode {
        name: wire.name.clone(),
        step_poses,
        children,
    })
}

fn convert_step(index: usize, wire: &WireStep) -> Step {
    // 相机提示取步骤首个同时携带位置和目标的关键帧
    let camera_hint = wire.keyframes.iter().find_map(|kf| {
        match (kf.camera_pos, kf.camera_target) {
            (Some(pos), Some(target)) => Some(CameraHint {
                position: Vec3::new(pos.x, pos.y, pos.z),
                target: Vec3::new(target.x, target.y, target.z),
            }),
            _ => None,
        }
    });

    let description_speech = wire.description_speech.as_ref().map(|speech| SpeechMedia {
        media_urls: speech.media_urls.clone().unwrap_or_default(),
        media_names: speech.media_names.clone().unwrap_or_default(),
    });

    Step {
        title: format!("Step {}", index + 1),
        description_text: LocalizedText {
            text: wire.description_text.text.clone(),
        },
        description_speech,
        camera_hint,
    }
}

fn convert_env(wire: WireEnv) -> EnvironmentSettings {
    EnvironmentSettings {
        zenith_color: color3(&wire.zenith_color),
        nadir_color: color3(&wire.nadir_color),
        use_gradient_bg: wire.use_gradient_bg,
        rotation_deg: wire.rotation_deg,
        env_intensity: wire.env_intensity,
        bg_intensity: wire.bg_intensity,
        bg_blur: wire.bg_blur,
        tone_mapping_exposure: wire.tone_mapping_exposure,
        tone_map: wire.tone_map,
        env_map_url: wire.env_map_url,
    }
}

fn color3(components: &[f32]) -> [f32; 3] {
    let mut color = [0.0; 3];
    for (slot, value) in color.iter_mut().zip(components) {
        *slot = *value;
    }
    color
}

/// 校验步骤数量与关键帧数量的一致性
///
/// 1. 文档步骤数必须等于所有节点步骤条目数的最大值。
/// 2. 同一步骤内所有携带 >= 2 个关键帧的节点必须关键帧数一致，
///    否则基准节点时序策略会让各节点相互失步。
///    只有 0 或 1 个关键帧的节点是静态的，不参与该校验。
fn validate_step_counts(nodes: &[SceneNode], step_count: usize) -> Result<()> {
    let max_node_steps = nodes
        .iter()
        .map(|node| node.max_step_count())
        .max()
        .unwrap_or(0);
    if max_node_steps != step_count {
        return Err(EngineError::StepCountMismatch(format!(
            "document declares {} steps but nodes carry up to {}",
            step_count, max_node_steps
        )));
    }

    for step_index in 0..step_count {
        let mut animated_count: Option<(usize, String)> = None;
        check_keyframe_counts(nodes, step_index, &mut animated_count)?;
    }
    Ok(())
}

fn check_keyframe_counts(
    nodes: &[SceneNode],
    step_index: usize,
    animated: &mut Option<(usize, String)>,
) -> Result<()> {
    for node in nodes {
        let count = node.keyframes_for_step(step_index).len();
        if count >= 2 {
            match animated {
                None => *animated = Some((count, node.name.clone())),
                Some((expected, reference)) => {
                    if count != *expected {
                        return Err(EngineError::StepCountMismatch(format!(
                            "step {}: node '{}' has {} keyframes but node '{}' has {}",
                            step_index, node.name, count, reference, expected
                        )));
                    }
                }
            }
        }
        check_keyframe_counts(&node.children, step_index, animated)?;
    }
    Ok(())
}

fn warn_duplicate_names(nodes: &[SceneNode]) {
    fn visit(nodes: &[SceneNode], seen: &mut HashSet<String>) {
        for node in nodes {
            if !seen.insert(node.name.clone()) {
                log::warn!("[动画加载] 节点名称重复: {}，按名称解析时第一个前序匹配生效", node.name);
            }
            visit(&node.children, seen);
        }
    }
    let mut seen = HashSet::new();
    visit(nodes, &mut seen);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn node_json(name: &str, steps: &str) -> String {
        format!(r#"{{"name":"{}","steps":[{}],"children":[]}}"#, name, steps)
    }

    fn keyframes_json(count: usize) -> String {
        let frame = r#"{"position":{"x":1.0,"y":2.0,"z":3.0},"quaternion":[0.0,0.0,0.0,1.0],"scale":{"x":1.0,"y":1.0,"z":1.0},"visible":true}"#;
        let frames: Vec<&str> = std::iter::repeat(frame).take(count).collect();
        format!(r#"{{"keyframes":[{}]}}"#, frames.join(","))
    }

    fn step_json() -> &'static str {
        r#"{"keyframes":[{"cameraPos":{"x":0.0,"y":1.0,"z":2.0},"cameraTarget":{"x":0.0,"y":0.0,"z":0.0}}],"descriptionText":{"text":{"en":"Attach the leg","fr":"Fixez le pied"}},"descriptionSpeech":{"mediaUrls":{"en":"https://cdn.example/step1-en.mp3"},"mediaNames":{"en":"step1-en"}}}"#
    }

    fn document_json(version: u32, steps: usize, nodes: &[String]) -> String {
        let steps_json: Vec<&str> = std::iter::repeat(step_json()).take(steps).collect();
        format!(
            r#"{{"version":{},"steps":[{}],"nodes":[{}]}}"#,
            version,
            steps_json.join(","),
            nodes.join(",")
        )
    }

    #[test]
    fn test_load_minimal_document() {
        let json = document_json(1, 1, &[node_json("base", &keyframes_json(3))]);
        let document = load_document_str(&json, &LoaderConfig::default()).unwrap();

        assert_eq!(document.version, 1);
        assert_eq!(document.step_count(), 1);
        assert_eq!(document.steps[0].title, "Step 1");
        assert_eq!(
            document.steps[0].description_text.get("en"),
            Some("Attach the leg")
        );
        assert_eq!(document.reference_keyframe_count(0), 3);

        let hint = document.steps[0].camera_hint.unwrap();
        assert_eq!(hint.position, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(hint.target, Vec3::ZERO);

        let node = document.find_node("base").unwrap();
        assert_eq!(node.keyframes_for_step(0)[0].position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let json = document_json(99, 1, &[node_json("base", &keyframes_json(2))]);
        match load_document_str(&json, &LoaderConfig::default()) {
            Err(EngineError::SchemaVersionUnsupported(99)) => {}
            other => panic!("expected SchemaVersionUnsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_payload_rejected() {
        match load_document_str("{not json", &LoaderConfig::default()) {
            Err(EngineError::MalformedPayload(_)) => {}
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_step_count_mismatch_rejected() {
        // 节点带 2 个步骤，文档只声明 1 个
        let node = node_json(
            "base",
            &format!("{},{}", keyframes_json(2), keyframes_json(2)),
        );
        let json = document_json(1, 1, &[node]);
        match load_document_str(&json, &LoaderConfig::default()) {
            Err(EngineError::StepCountMismatch(_)) => {}
            other => panic!("expected StepCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_keyframe_count_mismatch_rejected() {
        let nodes = [
            node_json("a", &keyframes_json(3)),
            node_json("b", &keyframes_json(2)),
        ];
        let json = document_json(1, 1, &nodes);
        match load_document_str(&json, &LoaderConfig::default()) {
            Err(EngineError::StepCountMismatch(_)) => {}
            other => panic!("expected StepCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_static_nodes_exempt_from_keyframe_check() {
        // 0 或 1 个关键帧的节点不参与一致性校验
        let nodes = [
            node_json("animated", &keyframes_json(3)),
            node_json("static", &keyframes_json(1)),
            node_json("empty", &keyframes_json(0)),
        ];
        let json = document_json(1, 1, &nodes);
        let document = load_document_str(&json, &LoaderConfig::default()).unwrap();
        assert_eq!(document.reference_keyframe_count(0), 3);
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let frame = r#"{"keyframes":[{"position":{"x":0.0,"y":0.0,"z":0.0},"quaternion":[0.0,0.0,0.0,1.0],"scale":{"x":0.0,"y":1.0,"z":1.0},"visible":true}]}"#;
        let json = document_json(1, 1, &[node_json("base", frame)]);
        match load_document_str(&json, &LoaderConfig::default()) {
            Err(EngineError::MalformedPayload(message)) => {
                assert!(message.contains("scale"));
            }
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_quaternion_rejected() {
        let frame = r#"{"keyframes":[{"position":{"x":0.0,"y":0.0,"z":0.0},"quaternion":[0.0,0.0,0.0,0.0],"scale":{"x":1.0,"y":1.0,"z":1.0},"visible":true}]}"#;
        let json = document_json(1, 1, &[node_json("base", frame)]);
        match load_document_str(&json, &LoaderConfig::default()) {
            Err(EngineError::MalformedPayload(message)) => {
                assert!(message.contains("quaternion"));
            }
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_axis_remap_z_up_to_y_up() {
        let frame = r#"{"keyframes":[{"position":{"x":1.0,"y":2.0,"z":3.0},"quaternion":[0.1,0.2,0.3,0.9],"scale":{"x":1.0,"y":1.0,"z":1.0},"visible":true}]}"#;
        let json = document_json(1, 1, &[node_json("base", frame)]);
        let config = LoaderConfig {
            axis: AxisConvention::ZUpToYUp,
        };
        let document = load_document_str(&json, &config).unwrap();
        let keyframe = &document.find_node("base").unwrap().keyframes_for_step(0)[0];

        // (x,y,z) → (-z,x,y)
        assert_eq!(keyframe.position, Vec3::new(-3.0, 1.0, 2.0));

        // (x,y,z,w) → (x,z,-y,w)，加载时归一化
        let expected = Quat::from_xyzw(0.1, 0.3, -0.2, 0.9).normalize();
        assert!((keyframe.rotation.x - expected.x).abs() < 1e-6);
        assert!((keyframe.rotation.y - expected.y).abs() < 1e-6);
        assert!((keyframe.rotation.z - expected.z).abs() < 1e-6);
        assert!((keyframe.rotation.w - expected.w).abs() < 1e-6);
    }

    #[test]
    fn test_axis_as_authored_is_identity() {
        let json = document_json(1, 1, &[node_json("base", &keyframes_json(2))]);
        let document = load_document_str(&json, &LoaderConfig::default()).unwrap();
        let keyframe = &document.find_node("base").unwrap().keyframes_for_step(0)[0];
        assert_eq!(keyframe.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(keyframe.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_gzip_payload_inflated() {
        let json = document_json(1, 1, &[node_json("base", &keyframes_json(2))]);

        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(json.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let document = load_document(&compressed, &LoaderConfig::default()).unwrap();
        assert_eq!(document.step_count(), 1);
    }

    #[test]
    fn test_plain_bytes_payload() {
        let json = document_json(1, 1, &[node_json("base", &keyframes_json(2))]);
        let document = load_document(json.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(document.step_count(), 1);
    }

    #[test]
    fn test_env_passthrough() {
        let env = r#"{"version":1,"zenithColor":[0.1,0.2,0.3],"nadirColor":[0.4,0.5,0.6],"useGradientBg":true,"rotationDeg":90.0,"envIntensity":1.0,"bgIntensity":0.8,"bgBlur":0.5,"toneMappingExposure":1.2,"toneMap":1,"envMapUrl":"https://cdn.example/env.hdr"}"#;
        let json = format!(
            r#"{{"version":1,"steps":[{}],"nodes":[{}],"env":{}}}"#,
            step_json(),
            node_json("base", &keyframes_json(2)),
            env
        );
        let document = load_document_str(&json, &LoaderConfig::default()).unwrap();
        let env = document.env.unwrap();
        assert_eq!(env.zenith_color, [0.1, 0.2, 0.3]);
        assert!(env.use_gradient_bg);
        assert_eq!(env.env_map_url, "https://cdn.example/env.hdr");
    }
}
