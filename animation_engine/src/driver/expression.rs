use resources::scene::SceneGraph;

use crate::mood::Mood;
use crate::rig::RigHandles;

use super::DriverConfig;

/// Lip-sync and emotion blending. The mouth-open target is a fast synthetic
/// oscillation while speech plays, an approximation standing in for
/// phoneme-driven lip-sync. Each channel eases toward its target at its own
/// rate: the mouth snappy, the smile slow so expression does not flicker.
pub fn apply(
    scene: &mut SceneGraph,
    handles: &RigHandles,
    mood: Mood,
    elapsed: f32,
    config: &DriverConfig,
) {
    let open_target = if mood.speaking {
        (elapsed * 12.0).sin().abs() * 0.6 + 0.1
    } else {
        0.0
    };
    let smile_target = mood.emotion.smile_target();

    for channel in &handles.mouth {
        let Some(morph) = scene.node_mut(channel.node).morph.as_mut() else {
            continue;
        };
        if let Some(open) = channel.open {
            let current = morph.weight(open);
            morph.set_weight(open, current + (open_target - current) * config.mouth_open_rate);
        }
        if let Some(smile) = channel.smile {
            let current = morph.weight(smile);
            morph.set_weight(smile, current + (smile_target - current) * config.smile_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Emotion;
    use crate::rig::resolver::resolve;
    use resources::morph::MorphTargetSet;
    use resources::scene::{Node, NodeKind};

    fn face_scene() -> (SceneGraph, RigHandles) {
        let mut scene = SceneGraph::new();
        let mut face = Node::new("Wolf3D_Head", NodeKind::Mesh);
        face.morph = Some(MorphTargetSet::new(
            vec!["mouthOpen".to_string(), "mouthSmile".to_string()],
            vec![0.0, 0.0],
        ));
        scene.add_node(face, None);
        let handles = resolve(&mut scene);
        (scene, handles)
    }

    fn smile_of(scene: &SceneGraph, handles: &RigHandles) -> f32 {
        let channel = handles.mouth[0];
        scene
            .node(channel.node)
            .morph
            .as_ref()
            .unwrap()
            .weight(channel.smile.unwrap())
    }

    fn mouth_of(scene: &SceneGraph, handles: &RigHandles) -> f32 {
        let channel = handles.mouth[0];
        scene
            .node(channel.node)
            .morph
            .as_ref()
            .unwrap()
            .weight(channel.open.unwrap())
    }

    #[test]
    fn smile_converges_to_happy_without_overshoot() {
        let (mut scene, handles) = face_scene();
        let config = DriverConfig::default();
        let mood = Mood {
            emotion: Emotion::Happy,
            speaking: false,
        };

        let mut previous = smile_of(&scene, &handles);
        for frame in 0..600 {
            apply(&mut scene, &handles, mood, frame as f32 / 60.0, &config);
            let current = smile_of(&scene, &handles);
            assert!(current >= previous);
            assert!(current <= 0.7 + 1e-6);
            previous = current;
        }
        assert!((previous - 0.7).abs() < 0.01);
    }

    #[test]
    fn mouth_decays_once_speech_stops() {
        let (mut scene, handles) = face_scene();
        let config = DriverConfig::default();
        let channel = handles.mouth[0];
        scene
            .node_mut(channel.node)
            .morph
            .as_mut()
            .unwrap()
            .set_weight(channel.open.unwrap(), 0.5);

        let silent = Mood {
            emotion: Emotion::Neutral,
            speaking: false,
        };
        apply(&mut scene, &handles, silent, 10.0, &config);
        let after_one = mouth_of(&scene, &handles);
        assert!((after_one - 0.5 * (1.0 - config.mouth_open_rate)).abs() < 1e-6);

        for frame in 0..300 {
            apply(&mut scene, &handles, silent, 10.0 + frame as f32 / 60.0, &config);
        }
        assert!(mouth_of(&scene, &handles) < 0.01);
    }

    #[test]
    fn speaking_keeps_the_mouth_moving() {
        let (mut scene, handles) = face_scene();
        let config = DriverConfig::default();
        let talking = Mood {
            emotion: Emotion::Neutral,
            speaking: true,
        };
        let mut peak: f32 = 0.0;
        for frame in 0..300 {
            apply(&mut scene, &handles, talking, frame as f32 / 60.0, &config);
            peak = peak.max(mouth_of(&scene, &handles));
        }
        assert!(peak > 0.2);
    }
}
