use nalgebra_glm as glm;
use resources::scene::SceneGraph;

use crate::rig::RigHandles;

use super::DriverConfig;

/// Turns the head toward the viewer with smooth, lagged tracking. The
/// orientation is rebuilt every frame relative to the head's rest frame, so
/// the clamped yaw/pitch bound the total neck rotation and can never be
/// exceeded through accumulation.
pub fn apply(
    scene: &mut SceneGraph,
    handles: &RigHandles,
    viewer: &glm::Vec3,
    config: &DriverConfig,
) {
    let Some(head) = handles.head else { return };

    let parent_world = match scene.node(head).parent {
        Some(parent) => scene.world_transform(parent),
        None => glm::Mat4::identity(),
    };
    let local = glm::inverse(&parent_world) * glm::vec4(viewer.x, viewer.y, viewer.z, 1.0);
    let to_viewer = glm::vec4_to_vec3(&local) - scene.node(head).position;

    let (yaw, pitch) = aim_angles(&to_viewer, config);
    let target = glm::quat_angle_axis(yaw, &glm::vec3(0.0, 1.0, 0.0))
        * glm::quat_angle_axis(-pitch, &glm::vec3(1.0, 0.0, 0.0));

    let node = scene.node_mut(head);
    node.rotation =
        glm::quat_normalize(&glm::quat_slerp(&node.rotation, &target, config.gaze_smoothing));
}

/// Yaw/pitch of the viewer direction in head-local space, clamped to the
/// anatomical limits. The pitch bias compensates for the camera sitting
/// above the avatar's eye line.
pub fn aim_angles(to_viewer: &glm::Vec3, config: &DriverConfig) -> (f32, f32) {
    let yaw = to_viewer.x.atan2(to_viewer.z);
    let pitch = to_viewer.y.atan2(to_viewer.z) + config.gaze_pitch_bias;
    (
        yaw.clamp(-config.gaze_yaw_limit, config.gaze_yaw_limit),
        pitch.clamp(-config.gaze_pitch_limit, config.gaze_pitch_limit),
    )
}
