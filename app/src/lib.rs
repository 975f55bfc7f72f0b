pub mod bridge;
pub mod my_time;
pub mod setting;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use nalgebra_glm as glm;

use animation_engine::driver::AnimationDriver;
use animation_engine::mood::{Emotion, MoodCell};
use animation_engine::rig::resolver::resolve;
use resources::cache::ModelCache;

use crate::bridge::{ConversationBridge, ScriptedTherapist};
use crate::my_time::Time;
use crate::setting::Setting;

/// User lines of the demo session and when they are "typed", seconds into
/// the session.
const SCRIPT: &[(f32, &str)] = &[
    (1.0, "hello"),
    (8.0, "I had a really good day today"),
    (16.0, "but now I am quite tired"),
    (24.0, "thank you for listening"),
];

/// Headless session: load and resolve the avatar once, then run the frame
/// loop against a scripted conversation. Everything a renderer would do per
/// frame happens here except drawing.
pub fn run(setting: Setting) -> Result<()> {
    let mut cache = ModelCache::new();
    let template = cache
        .load(&setting.model_path)
        .with_context(|| format!("loading avatar model {}", setting.model_path.display()))?;

    let mut scene = (*template).clone();
    for root in scene.roots().to_vec() {
        scene.node_mut(root).scale *= setting.avatar_scale;
    }
    let handles = resolve(&mut scene);

    let mood = Arc::new(MoodCell::default());
    let mut driver = AnimationDriver::new(handles, setting.driver.clone(), mood.clone());
    let bridge = ConversationBridge::new(mood);
    let therapist = ScriptedTherapist::new();

    let viewer = glm::vec3(
        setting.camera_position[0],
        setting.camera_position[1],
        setting.camera_position[2],
    );
    let dt = 1.0 / setting.frame_rate;
    let frames = (setting.session_seconds * setting.frame_rate) as u32;

    let mut time = Time::new();
    let mut elapsed = 0.0f32;
    let mut next_line = 0;
    let mut speaking_until: Option<(f32, Emotion)> = None;

    for _ in 0..frames {
        let delta = if setting.realtime {
            std::thread::sleep(Duration::from_secs_f32(dt));
            time.update();
            time.delta()
        } else {
            dt
        };
        elapsed += delta;

        if let Some((until, emotion)) = speaking_until {
            if elapsed >= until {
                bridge.speech_finished(emotion);
                speaking_until = None;
            }
        }
        if next_line < SCRIPT.len() && elapsed >= SCRIPT[next_line].0 && speaking_until.is_none() {
            let (_, user_line) = SCRIPT[next_line];
            next_line += 1;
            let reply = bridge.deliver(&therapist.reply(user_line));
            log::info!("user: {user_line}");
            log::info!("therapist [{:?}]: {}", reply.emotion, reply.text);
            speaking_until = Some((elapsed + reply.speak_for, reply.emotion));
        }

        driver.update(&mut scene, &viewer, elapsed, delta);

        if time.is_more_then_1s() {
            log::debug!(
                "t={elapsed:.2}s speaking={}",
                speaking_until.is_some()
            );
        }
    }

    log::info!(
        "session complete: {frames} frames over {:.1}s simulated, {:.2}s wall time",
        setting.session_seconds,
        time.current()
    );
    Ok(())
}
