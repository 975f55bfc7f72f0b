use nalgebra_glm as glm;
use resources::morph::MorphTargetSet;
use resources::scene::{NodeId, NodeKind, SceneGraph};

use super::{BlinkTarget, BoneRole, MouthChannel, RigHandles};

// Rest pose offsets: upper arms dropped from the T-pose, forearms slightly
// bent. Applied once, never animated.
const ARM_DROP: f32 = 1.25;
const FOREARM_BEND: f32 = 0.3;

/// Walks the loaded graph exactly once and produces the rig handles, also
/// applying the bundled one-time normalizations: mesh render flags, scene
/// centering and the rest posture. Anything the model lacks is left `None`
/// and logged here, never at frame time.
pub fn resolve(scene: &mut SceneGraph) -> RigHandles {
    let mut handles = RigHandles {
        root: scene.roots().first().copied(),
        ..RigHandles::default()
    };

    let mut eye_left: Option<(NodeId, f32)> = None;
    let mut eye_right: Option<(NodeId, f32)> = None;
    let mut unified_blink: Option<(NodeId, usize)> = None;

    for id in scene.walk() {
        let node = scene.node_mut(id);

        for role in BoneRole::ALL {
            if role.aliases().contains(&node.name.as_str()) {
                handles.set_bone(role, id);
            }
        }

        if node.kind != NodeKind::Mesh {
            continue;
        }
        // The avatar must stay fully rendered regardless of camera framing.
        node.cast_shadow = true;
        node.frustum_culled = false;

        if eye_left.is_none() && node.name.contains("EyeLeft") {
            eye_left = Some((id, node.scale.y));
        }
        if eye_right.is_none() && node.name.contains("EyeRight") {
            eye_right = Some((id, node.scale.y));
        }

        let Some(morph) = &node.morph else { continue };

        let open = morph.index_of("mouthOpen");
        let smile = morph.index_of("mouthSmile");
        if open.is_some() || smile.is_some() {
            handles.mouth.push(MouthChannel { node: id, open, smile });
        }

        if handles.blink.is_none() {
            if let Some((left, right)) = blink_pair(morph) {
                handles.blink = Some(BlinkTarget::Morph {
                    node: id,
                    left,
                    right,
                });
            }
        }
        if unified_blink.is_none() {
            unified_blink = morph
                .names()
                .find(|(_, name)| {
                    name.eq_ignore_ascii_case("blink") || name.eq_ignore_ascii_case("eyesclosed")
                })
                .map(|(index, _)| (id, index));
        }
    }

    if handles.blink.is_none() {
        if let Some((node, index)) = unified_blink {
            handles.blink = Some(BlinkTarget::Morph {
                node,
                left: index,
                right: index,
            });
        }
    }
    if handles.blink.is_none() {
        if let (Some((left, left_rest_y)), Some((right, right_rest_y))) = (eye_left, eye_right) {
            handles.blink = Some(BlinkTarget::EyeScale {
                left,
                right,
                left_rest_y,
                right_rest_y,
            });
        }
    }

    center(scene);
    apply_posture(scene, &handles);

    handles.spine_rest = handles.spine.map(|id| scene.node(id).rotation);
    handles.neck_rest = handles.neck.map(|id| scene.node(id).rotation);
    handles.root_rest_y = handles
        .root
        .map(|id| scene.node(id).position.y)
        .unwrap_or(0.0);

    report_missing(&handles);
    handles
}

/// Side-specific blink channels: a blink-ish name crossed with a side
/// marker. Returns morph indices (left, right).
fn blink_pair(morph: &MorphTargetSet) -> Option<(usize, usize)> {
    let left = morph
        .names()
        .find(|(_, name)| is_blink_name(name) && is_left(name))
        .map(|(index, _)| index);
    let right = morph
        .names()
        .find(|(_, name)| is_blink_name(name) && is_right(name))
        .map(|(index, _)| index);
    match (left, right) {
        (Some(left), Some(right)) => Some((left, right)),
        _ => None,
    }
}

fn is_blink_name(name: &str) -> bool {
    name.contains("blink") || name.contains("Blink") || name.contains("closed")
}

fn is_left(name: &str) -> bool {
    name.contains("Left") || name.contains("left") || name.ends_with('L')
}

fn is_right(name: &str) -> bool {
    name.contains("Right") || name.contains("right") || name.ends_with('R')
}

/// One-time normalization: horizontal center at the origin, vertical
/// position lifted by half the bounding-box height so the head sits near
/// the origin with feet-relative placement.
fn center(scene: &mut SceneGraph) {
    let Some(aabb) = scene.world_aabb() else { return };
    let center = aabb.center();
    let size = aabb.size();
    for root in scene.roots().to_vec() {
        let node = scene.node_mut(root);
        node.position.x -= center.x;
        node.position.z -= center.z;
        node.position.y += size.y * 0.5;
    }
}

fn apply_posture(scene: &mut SceneGraph, handles: &RigHandles) {
    let z_axis = glm::vec3(0.0, 0.0, 1.0);
    let offsets = [
        (handles.left_arm, ARM_DROP),
        (handles.right_arm, -ARM_DROP),
        (handles.left_fore_arm, FOREARM_BEND),
        (handles.right_fore_arm, -FOREARM_BEND),
    ];
    for (bone, angle) in offsets {
        let Some(bone) = bone else { continue };
        let node = scene.node_mut(bone);
        node.rotation = glm::quat_normalize(&(node.rotation * glm::quat_angle_axis(angle, &z_axis)));
    }
}

fn report_missing(handles: &RigHandles) {
    for role in BoneRole::ALL {
        if handles.bone(role).is_none() {
            log::warn!("rig: no {role:?} bone in this model, its animation is skipped");
        }
    }
    if handles.mouth.is_empty() {
        log::warn!("rig: no mouthOpen/mouthSmile channels, lip-sync and smile are skipped");
    }
    match handles.blink {
        None => log::warn!("rig: no blink channels or eye meshes, blinking is skipped"),
        Some(BlinkTarget::EyeScale { .. }) => {
            log::debug!("rig: no blink morphs, falling back to eye mesh scaling")
        }
        Some(BlinkTarget::Morph { .. }) => {}
    }
}
