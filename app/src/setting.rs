use std::path::{Path, PathBuf};

use animation_engine::driver::DriverConfig;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Setting {
    pub model_path: PathBuf,
    pub avatar_scale: f32,
    /// Viewer world position the avatar's gaze tracks, the original scene's
    /// camera placement at face level.
    pub camera_position: [f32; 3],
    pub frame_rate: f32,
    pub session_seconds: f32,
    /// Pace the loop against the wall clock instead of simulating frames as
    /// fast as possible.
    pub realtime: bool,
    pub driver: DriverConfig,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("data/avatar.glb"),
            avatar_scale: 1.15,
            camera_position: [0.0, 1.6, 2.5],
            frame_rate: 60.0,
            session_seconds: 30.0,
            realtime: false,
            driver: DriverConfig::default(),
        }
    }
}

impl Setting {
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|err| {
                log::warn!("setting file is invalid ({err}), using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match toml::to_string_pretty(self) {
            Ok(text) => {
                if let Err(err) = std::fs::write(path, text) {
                    log::warn!("could not save settings to {}: {err}", path.display());
                }
            }
            Err(err) => log::warn!("could not serialize settings: {err}"),
        }
    }
}
