pub mod camera;
pub mod core;
pub mod loading;
pub mod math;
pub mod morph;
pub mod particles;
pub mod scene;
pub mod systems;
