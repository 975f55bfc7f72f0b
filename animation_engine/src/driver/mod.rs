pub mod blink;
pub mod expression;
pub mod gaze;
pub mod idle;

use std::sync::Arc;

use nalgebra_glm as glm;
use rand::rngs::StdRng;
use rand::SeedableRng;
use resources::scene::SceneGraph;
use serde::{Deserialize, Serialize};

use crate::mood::MoodCell;
use crate::rig::{BlinkTarget, RigHandles};

use blink::BlinkState;

/// Tunables of the per-frame driver. Defaults are the tuned values; the
/// settings file may override any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Radians, anatomical neck limits for gaze tracking.
    pub gaze_yaw_limit: f32,
    pub gaze_pitch_limit: f32,
    /// Upward bias compensating the camera sitting above the eye line.
    pub gaze_pitch_bias: f32,
    /// Per-frame slerp factor toward the gaze target.
    pub gaze_smoothing: f32,

    /// Blink speed in influence units per second.
    pub blink_rate: f32,
    /// Uniform draw range, seconds, for the pause between blinks.
    pub blink_interval_min: f32,
    pub blink_interval_max: f32,
    pub first_blink_delay: f32,
    /// Redraw the pause when a blink finishes instead of keeping the value
    /// drawn when it started.
    pub reset_on_interrupt: bool,

    /// Per-frame lerp factors; the mouth is snappy, the smile deliberately
    /// slow.
    pub mouth_open_rate: f32,
    pub smile_rate: f32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            gaze_yaw_limit: 0.5,
            gaze_pitch_limit: 0.25,
            gaze_pitch_bias: 0.15,
            gaze_smoothing: 0.1,
            blink_rate: 15.0,
            blink_interval_min: 2.0,
            blink_interval_max: 5.0,
            first_blink_delay: 2.5,
            reset_on_interrupt: false,
            mouth_open_rate: 0.2,
            smile_rate: 0.05,
        }
    }
}

/// Per-frame animation of one mounted avatar. Owns all mutable animation
/// state; the only shared input is the mood cell the conversation side
/// writes into. Each effect runs independently and only when its rig handle
/// resolved, so a sparse model degrades feature by feature instead of
/// erroring.
pub struct AnimationDriver {
    handles: RigHandles,
    config: DriverConfig,
    blink: BlinkState,
    mood: Arc<MoodCell>,
    rng: StdRng,
}

impl AnimationDriver {
    pub fn new(handles: RigHandles, config: DriverConfig, mood: Arc<MoodCell>) -> Self {
        Self::with_rng(handles, config, mood, StdRng::from_entropy())
    }

    pub fn with_rng(
        handles: RigHandles,
        config: DriverConfig,
        mood: Arc<MoodCell>,
        rng: StdRng,
    ) -> Self {
        let blink = BlinkState::new(config.first_blink_delay);
        Self {
            handles,
            config,
            blink,
            mood,
            rng,
        }
    }

    pub fn handles(&self) -> &RigHandles {
        &self.handles
    }

    /// Runs once per rendered frame. `elapsed` is monotonic seconds since
    /// start, `delta` the seconds since the previous frame; a negative delta
    /// from a clock glitch is treated as zero.
    pub fn update(&mut self, scene: &mut SceneGraph, viewer: &glm::Vec3, elapsed: f32, delta: f32) {
        let delta = delta.max(0.0);
        let mood = self.mood.load();

        idle::apply(scene, &self.handles, elapsed);
        gaze::apply(scene, &self.handles, viewer, &self.config);

        self.blink.tick(delta, &mut self.rng, &self.config);
        apply_blink(scene, &self.handles, self.blink.value());

        expression::apply(scene, &self.handles, mood, elapsed, &self.config);
    }
}

fn apply_blink(scene: &mut SceneGraph, handles: &RigHandles, value: f32) {
    match handles.blink {
        Some(BlinkTarget::Morph { node, left, right }) => {
            if let Some(morph) = scene.node_mut(node).morph.as_mut() {
                morph.set_weight(left, value);
                morph.set_weight(right, value);
            }
        }
        Some(BlinkTarget::EyeScale {
            left,
            right,
            left_rest_y,
            right_rest_y,
        }) => {
            // 1 = open, ~0.1 of the rest height = fully squashed
            let squash = 1.0 - 0.9 * value;
            scene.node_mut(left).scale.y = left_rest_y * squash;
            scene.node_mut(right).scale.y = right_rest_y * squash;
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::{Emotion, Mood};
    use crate::rig::resolver::resolve;
    use resources::morph::MorphTargetSet;
    use resources::scene::{Node, NodeId, NodeKind};

    fn avatar_scene() -> (SceneGraph, RigHandles) {
        let mut scene = SceneGraph::new();
        let root = scene.add_node(Node::new("Armature", NodeKind::Other), None);
        let spine = scene.add_node(Node::new("mixamorigSpine", NodeKind::Bone), Some(root));
        let neck = scene.add_node(Node::new("mixamorigNeck", NodeKind::Bone), Some(spine));
        let mut head = Node::new("mixamorigHead", NodeKind::Bone);
        head.position = glm::vec3(0.0, 1.6, 0.0);
        scene.add_node(head, Some(neck));

        let mut face = Node::new("Wolf3D_Head", NodeKind::Mesh);
        face.morph = Some(MorphTargetSet::new(
            vec![
                "mouthOpen".to_string(),
                "mouthSmile".to_string(),
                "eyeBlinkLeft".to_string(),
                "eyeBlinkRight".to_string(),
            ],
            vec![0.0; 4],
        ));
        scene.add_node(face, Some(root));

        let handles = resolve(&mut scene);
        (scene, handles)
    }

    fn driver_for(handles: RigHandles, seed: u64) -> (AnimationDriver, Arc<MoodCell>) {
        let mood = Arc::new(MoodCell::default());
        let driver = AnimationDriver::with_rng(
            handles,
            DriverConfig::default(),
            mood.clone(),
            StdRng::seed_from_u64(seed),
        );
        (driver, mood)
    }

    fn simulate(driver: &mut AnimationDriver, scene: &mut SceneGraph, seconds: f32) {
        let viewer = glm::vec3(0.0, 1.6, 2.5);
        let dt = 1.0 / 60.0;
        let frames = (seconds / dt) as usize;
        for frame in 0..frames {
            driver.update(scene, &viewer, frame as f32 * dt, dt);
        }
    }

    #[test]
    fn head_rotation_stays_inside_the_gaze_limits() {
        let (mut scene, handles) = avatar_scene();
        let head = handles.head.unwrap();
        let (mut driver, _mood) = driver_for(handles, 3);

        // viewer far off to the side and below: raw angles way out of range
        let viewer = glm::vec3(50.0, -20.0, 0.5);
        let dt = 1.0 / 60.0;
        for frame in 0..1200 {
            driver.update(&mut scene, &viewer, frame as f32 * dt, dt);
            let config = DriverConfig::default();
            let bound = config.gaze_yaw_limit + config.gaze_pitch_limit;
            assert!(glm::quat_angle(&scene.node(head).rotation) <= bound + 1e-4);
        }
    }

    #[test]
    fn blink_reaches_both_eye_channels() {
        let (mut scene, handles) = avatar_scene();
        let face = handles.mouth[0].node;
        let (mut driver, _mood) = driver_for(handles, 11);

        simulate(&mut driver, &mut scene, 8.0);
        // after 8 s at least one blink happened and weights stayed bounded
        let morph = scene.node(face).morph.as_ref().unwrap();
        for index in 0..morph.len() {
            assert!((0.0..=1.0).contains(&morph.weight(index)));
        }
    }

    #[test]
    fn missing_blink_target_is_a_per_frame_no_op() {
        let mut scene = SceneGraph::new();
        let mut face = Node::new("Face", NodeKind::Mesh);
        face.morph = Some(MorphTargetSet::new(
            vec!["mouthOpen".to_string()],
            vec![0.0],
        ));
        let face_id = scene.add_node(face, None);
        let handles = resolve(&mut scene);
        assert!(handles.blink.is_none());

        let (mut driver, _mood) = driver_for(handles, 1);
        simulate(&mut driver, &mut scene, 6.0);
        // only the mouth channel exists and nothing panicked
        assert_eq!(scene.node(face_id).morph.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn speaking_and_emotion_flow_from_the_cell() {
        let (mut scene, handles) = avatar_scene();
        let channel = handles.mouth[0];
        let (mut driver, mood) = driver_for(handles, 9);

        mood.store(Mood {
            emotion: Emotion::Happy,
            speaking: true,
        });
        simulate(&mut driver, &mut scene, 4.0);

        let morph = scene.node(channel.node).morph.as_ref().unwrap();
        assert!(morph.weight(channel.smile.unwrap()) > 0.4);
        // mouth oscillates while speaking; it was recently nonzero
        mood.store(Mood {
            emotion: Emotion::Happy,
            speaking: false,
        });
        simulate(&mut driver, &mut scene, 2.0);
        let morph = scene.node(channel.node).morph.as_ref().unwrap();
        assert!(morph.weight(channel.open.unwrap()) < 0.01);
    }

    #[test]
    fn eye_scale_fallback_squashes_and_recovers() {
        let mut scene = SceneGraph::new();
        let mut left = Node::new("EyeLeft", NodeKind::Mesh);
        left.scale.y = 2.0;
        let left_id = scene.add_node(left, None);
        scene.add_node(Node::new("EyeRight", NodeKind::Mesh), None);
        let handles = resolve(&mut scene);

        let (mut driver, _mood) = driver_for(handles, 21);
        let viewer = glm::vec3(0.0, 1.6, 2.5);
        let dt = 1.0 / 60.0;
        let mut min_scale = f32::MAX;
        let mut max_after_min = 0.0f32;
        for frame in 0..(10 * 60) {
            driver.update(&mut scene, &viewer, frame as f32 * dt, dt);
            let y = scene.node(left_id).scale.y;
            assert!(y <= 2.0 + 1e-6);
            assert!(y >= 2.0 * 0.1 - 1e-6);
            if y < min_scale {
                min_scale = y;
                max_after_min = 0.0;
            } else {
                max_after_min = max_after_min.max(y);
            }
        }
        // a blink actually squashed the eye and it reopened afterwards
        assert!(min_scale < 1.0);
        assert!(max_after_min > 1.9);
    }

    #[test]
    fn negative_delta_does_not_break_anything() {
        let (mut scene, handles) = avatar_scene();
        let face: NodeId = handles.mouth[0].node;
        let (mut driver, _mood) = driver_for(handles, 2);
        let viewer = glm::vec3(0.0, 1.6, 2.5);
        driver.update(&mut scene, &viewer, 1.0, -0.5);
        let morph = scene.node(face).morph.as_ref().unwrap();
        for index in 0..morph.len() {
            assert!((0.0..=1.0).contains(&morph.weight(index)));
        }
    }
}
