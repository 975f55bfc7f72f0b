use nalgebra_glm as glm;
use resources::scene::SceneGraph;

use crate::rig::RigHandles;

/// Idle torso sway and breathing, a pure function of elapsed time. The sine
/// frequencies are deliberately incommensurate so the motion never reads as
/// periodic.
pub fn apply(scene: &mut SceneGraph, handles: &RigHandles, elapsed: f32) {
    if let (Some(spine), Some(rest)) = (handles.spine, handles.spine_rest) {
        let rx = elapsed.sin() * 0.03 + (elapsed * 2.5).sin() * 0.01;
        let ry = (elapsed * 0.7).sin() * 0.02;
        scene.node_mut(spine).rotation = swayed(&rest, rx, ry);
    }

    if let (Some(neck), Some(rest)) = (handles.neck, handles.neck_rest) {
        let rx = (elapsed * 1.3).sin() * 0.015 + (elapsed * 3.1).sin() * 0.008;
        let ry = (elapsed * 0.9).sin() * 0.01;
        scene.node_mut(neck).rotation = swayed(&rest, rx, ry);
    }

    if let Some(root) = handles.root {
        scene.node_mut(root).position.y = handles.root_rest_y + (elapsed * 1.2).sin() * 0.02;
    }
}

fn swayed(rest: &glm::Quat, rx: f32, ry: f32) -> glm::Quat {
    let sway = glm::quat_angle_axis(ry, &glm::vec3(0.0, 1.0, 0.0))
        * glm::quat_angle_axis(rx, &glm::vec3(1.0, 0.0, 0.0));
    glm::quat_normalize(&(rest * sway))
}
