/// Runtime scene configuration, relative to the asset root.
pub const SCENE_CONFIG_PATH: &str = "config/scene.config.json";
