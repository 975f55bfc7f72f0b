use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::load_scene::{load_scene, SceneError};
use crate::scene::SceneGraph;

/// Parse-once model store. Every mount of the same asset gets a handle to
/// the same parsed graph; callers clone it when they need a mutable
/// per-instance copy to animate.
#[derive(Debug, Default)]
pub struct ModelCache {
    scenes: HashMap<PathBuf, Arc<SceneGraph>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Arc<SceneGraph>, SceneError> {
        let path = path.as_ref();
        if let Some(scene) = self.scenes.get(path) {
            return Ok(scene.clone());
        }
        let scene = Arc::new(load_scene(path)?);
        log::info!("loaded model {}: {} nodes", path.display(), scene.len());
        self.scenes.insert(path.to_path_buf(), scene.clone());
        Ok(scene)
    }
}
