//! Trailing camera and spawn placement.
//!
//! The camera does not rotate with the player: it keeps a fixed offset above
//! and behind (+z) the resolved position every frame. `spawn_position`
//! places a new player a fixed distance along the camera's view direction.

use crate::settings::CameraSettings;
use bevy::prelude::*;

/// Marker for the camera that trails the player.
#[derive(Component, Debug, Default)]
pub struct FollowCamera;

/// Receives the trailing camera's position each frame.
pub trait CameraSink {
    fn follow(&mut self, position: Vec3);
}

impl CameraSink for Transform {
    fn follow(&mut self, position: Vec3) {
        self.translation = position;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub height: f32,
    pub distance: f32,
    pub spawn_distance: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::from(&CameraSettings::default())
    }
}

impl From<&CameraSettings> for CameraRig {
    fn from(s: &CameraSettings) -> Self {
        Self {
            height: s.height,
            distance: s.distance,
            spawn_distance: s.spawn_distance,
        }
    }
}

impl CameraRig {
    /// Camera-relative offset from the player.
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        Vec3::new(0.0, self.height, self.distance)
    }
}

/// Where the camera sits for a player at `target`.
#[must_use]
pub fn trailing_camera_position(target: Vec3, rig: &CameraRig) -> Vec3 {
    target + rig.offset()
}

/// Spawn point `rig.spawn_distance` in front of a camera at `camera_pos`
/// looking along `camera_forward`.
///
/// A zero `camera_forward` spawns at the camera itself.
#[must_use]
pub fn spawn_position(camera_pos: Vec3, camera_forward: Vec3, rig: &CameraRig) -> Vec3 {
    camera_pos + camera_forward.normalize_or_zero() * rig.spawn_distance
}
