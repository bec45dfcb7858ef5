//! 测试用场景图

use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec3};

use super::SceneGraph;

/// 记录每次写入的内存场景图
#[derive(Default)]
pub(crate) struct MockScene {
    known: HashSet<String>,
    transforms: HashMap<String, Vec<(Vec3, Quat, Vec3)>>,
    visibility: HashMap<String, Vec<bool>>,
}

impl MockScene {
    pub(crate) fn with_nodes(names: &[&str]) -> Self {
        Self {
            known: names.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }

    /// 某节点收到的全部变换写入，按次序
    pub(crate) fn transforms(&self, name: &str) -> &[(Vec3, Quat, Vec3)] {
        self.transforms.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 某节点收到的全部可见性写入，按次序
    pub(crate) fn visibility(&self, name: &str) -> &[bool] {
        self.visibility.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 最后一次写入的位置
    pub(crate) fn last_position(&self, name: &str) -> Option<Vec3> {
        self.transforms(name).last().map(|(position, _, _)| *position)
    }
}

impl SceneGraph for MockScene {
    type Handle = String;

    fn find_by_name(&mut self, name: &str) -> Option<String> {
        self.known.contains(name).then(|| name.to_string())
    }

    fn set_transform(&mut self, handle: &String, position: Vec3, rotation: Quat, scale: Vec3) {
        self.transforms
            .entry(handle.clone())
            .or_default()
            .push((position, rotation, scale));
    }

    fn set_visible(&mut self, handle: &String, visible: bool) {
        self.visibility.entry(handle.clone()).or_default().push(visible);
    }
}
