use std::collections::HashSet;
use std::path::Path;

use nalgebra_glm as glm;
use thiserror::Error;

use crate::morph::MorphTargetSet;
use crate::scene::{Aabb, Node, NodeId, NodeKind, SceneGraph};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read model: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("model contains no scene")]
    MissingScene,
}

/// Reads a glTF/GLB avatar into a [`SceneGraph`]. Only the node graph is
/// consumed: names, transforms, skin joints, morph channel names and the
/// accessor bounds; geometry buffers stay untouched.
pub fn load_scene(path: impl AsRef<Path>) -> Result<SceneGraph, SceneError> {
    let document = gltf::Gltf::open(path.as_ref())?;

    let joints: HashSet<usize> = document
        .skins()
        .flat_map(|skin| skin.joints().map(|joint| joint.index()))
        .collect();

    let source = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(SceneError::MissingScene)?;

    let mut scene = SceneGraph::new();
    for root in source.nodes() {
        add_node(&mut scene, &root, None, &joints);
    }
    Ok(scene)
}

fn add_node(
    scene: &mut SceneGraph,
    source: &gltf::Node,
    parent: Option<NodeId>,
    joints: &HashSet<usize>,
) {
    let kind = if source.mesh().is_some() {
        NodeKind::Mesh
    } else if joints.contains(&source.index()) {
        NodeKind::Bone
    } else {
        NodeKind::Other
    };

    let mut node = Node::new(source.name().unwrap_or_default(), kind);
    let (position, rotation, scale) = source.transform().decomposed();
    node.position = glm::vec3(position[0], position[1], position[2]);
    node.rotation = glm::quat(rotation[0], rotation[1], rotation[2], rotation[3]);
    node.scale = glm::vec3(scale[0], scale[1], scale[2]);

    if let Some(mesh) = source.mesh() {
        node.aabb = mesh_bounds(&mesh);
        node.morph = mesh_morph_targets(&mesh);
    }

    let id = scene.add_node(node, parent);
    for child in source.children() {
        add_node(scene, &child, Some(id), joints);
    }
}

fn mesh_bounds(mesh: &gltf::Mesh) -> Option<Aabb> {
    let mut merged: Option<Aabb> = None;
    for primitive in mesh.primitives() {
        let bounds = primitive.bounding_box();
        let min = glm::vec3(bounds.min[0], bounds.min[1], bounds.min[2]);
        let max = glm::vec3(bounds.max[0], bounds.max[1], bounds.max[2]);
        match merged.as_mut() {
            Some(merged) => {
                merged.merge_point(&min);
                merged.merge_point(&max);
            }
            None => merged = Some(Aabb::new(min, max)),
        }
    }
    merged
}

fn mesh_morph_targets(mesh: &gltf::Mesh) -> Option<MorphTargetSet> {
    let count = mesh
        .primitives()
        .map(|primitive| primitive.morph_targets().count())
        .max()
        .unwrap_or(0);
    if count == 0 {
        return None;
    }

    let names = morph_target_names(mesh.extras().as_deref().map(|raw| raw.get()), count);
    let mut weights = vec![0.0; count];
    if let Some(defaults) = mesh.weights() {
        for (weight, default) in weights.iter_mut().zip(defaults) {
            *weight = default.clamp(0.0, 1.0);
        }
    }
    Some(MorphTargetSet::new(names, weights))
}

/// Channel names come from the exporter's `extras.targetNames`; channels the
/// asset leaves unnamed get the `morphTarget{i}` placeholder.
fn morph_target_names(extras_json: Option<&str>, count: usize) -> Vec<String> {
    let mut names: Vec<String> = (0..count).map(|i| format!("morphTarget{i}")).collect();
    let Some(raw) = extras_json else {
        return names;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        log::warn!("mesh extras are not valid JSON; morph channels stay unnamed");
        return names;
    };
    if let Some(list) = value.get("targetNames").and_then(|v| v.as_array()) {
        for (slot, name) in names.iter_mut().zip(list) {
            if let Some(name) = name.as_str() {
                *slot = name.to_string();
            }
        }
    }
    names
}
