pub mod driver;
pub mod mood;
pub mod rig;
