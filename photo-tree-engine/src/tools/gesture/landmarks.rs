use bevy::prelude::*;
use constants::gesture::{LANDMARK_COUNT, WRIST};
use serde::{Deserialize, Serialize};

/// One landmark in normalised image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A complete hand: exactly 21 finite landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// `None` for short or non-finite input, never a partially filled hand.
    pub fn from_points(landmarks: &[Landmark]) -> Option<Self> {
        if landmarks.len() < LANDMARK_COUNT {
            return None;
        }
        let mut points = [Vec3::ZERO; LANDMARK_COUNT];
        for (point, landmark) in points.iter_mut().zip(landmarks) {
            *point = Vec3::new(landmark.x, landmark.y, landmark.z);
            if !point.is_finite() {
                return None;
            }
        }
        Some(Self { points })
    }

    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    pub fn wrist_x(&self) -> f32 {
        self.points[WRIST].x
    }
}

/// One output frame of the external landmark model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
}

impl LandmarkFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Only the first reported hand is considered.
    pub fn primary_hand(&self) -> Option<HandLandmarks> {
        self.hands.first().and_then(|hand| HandLandmarks::from_points(hand))
    }
}
