use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Resource)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

/// Per-frame ordering of the runtime systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Keyboard, pointer and landmark input.
    Input,
    /// Morph requests and progress easing.
    Morph,
    /// Photo list changes, picking and drag.
    Interaction,
    /// Scene rotation, particles and ornaments.
    Animate,
    /// Materials, cursor and frontend notifications.
    Output,
}

#[derive(Component)]
pub struct FpsText;
