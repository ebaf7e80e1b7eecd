//! Player components and the per-frame controller pipeline.
//!
//! One frame runs, in order: `movement` (input -> intent and facing),
//! `physics` (gravity, jump, grounded horizontal speed), `collision`
//! (swept per-axis resolution against the level), `action` (state machine
//! and clip selection through `animation`), then `camera` (trailing camera)
//! and the transform write-back. `controller` owns that order.
//!
//! # Example:
//!
//! ```
//! use bevy::math::Vec3;
//! use brawler::player::EntityPhysicsState;
//!
//! let state = EntityPhysicsState::spawn_at(Vec3::new(0.0, 5.0, 0.0));
//! assert!(!state.on_ground);
//! assert_eq!(state.velocity, Vec3::ZERO);
//! ```
pub mod action;
pub mod animation;
pub mod camera;
pub mod collision;
pub mod controller;
pub mod movement;
pub mod physics;

use bevy::prelude::*;

pub use action::*;
pub use animation::*;
pub use camera::*;
pub use collision::*;
pub use controller::*;
pub use movement::*;
pub use physics::*;

/// Marker for the controlled player entity.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Authoritative physical state of the controlled entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntityPhysicsState {
    /// World position of the entity's feet.
    pub position: Vec3,
    /// Velocity in world units per second.
    pub velocity: Vec3,
    /// Whether the last resolve found a floor under the entity.
    pub on_ground: bool,
}

impl EntityPhysicsState {
    /// Fresh state at `position`: at rest and airborne until the first
    /// resolve finds ground.
    #[must_use]
    pub fn spawn_at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            on_ground: false,
        }
    }
}
