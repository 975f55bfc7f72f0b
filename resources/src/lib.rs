pub mod scene;
pub mod morph;
pub mod load_scene;
pub mod cache;
