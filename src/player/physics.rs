//! Player physics: gravity, jumping and grounded horizontal movement.
//!
//! `integrate` advances velocity for one frame and proposes a displacement.
//! It never moves the entity; the proposal goes to the collision resolver,
//! which decides where the entity actually ends up and whether it is on
//! the ground.

use crate::player::EntityPhysicsState;
use crate::player::movement::IntentFlags;
use crate::settings::PhysicsSettings;
use bevy::prelude::*;

pub const GRAVITY: f32 = 20.0;
pub const JUMP_SPEED: f32 = 10.0;
pub const MOVE_SPEED: f32 = 10.0;

/// Integration constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    pub gravity: f32,
    pub jump_speed: f32,
    pub move_speed: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            move_speed: MOVE_SPEED,
        }
    }
}

impl From<&PhysicsSettings> for PhysicsParams {
    fn from(s: &PhysicsSettings) -> Self {
        Self {
            gravity: s.gravity,
            jump_speed: s.jump_speed,
            move_speed: s.move_speed,
        }
    }
}

/// A proposed move for the resolver: `new_position == old_position + displacement`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proposal {
    pub old_position: Vec3,
    pub new_position: Vec3,
    pub displacement: Vec3,
}

/// Unit horizontal direction for a facing yaw; yaw 0 faces +x.
#[must_use]
pub fn facing_direction(yaw: f32) -> Vec3 {
    let (sin, cos) = yaw.sin_cos();
    Vec3::new(cos, 0.0, sin)
}

/// Advance velocity by one frame and propose the resulting move.
///
/// While grounded, horizontal velocity is replaced by the facing direction
/// at `move_speed` (or zero without move intent); airborne, it is left as
/// it was at take-off. A jump clears `on_ground` and launches at
/// `jump_speed`. Gravity is then applied unconditionally, including on the
/// ground; the resolver re-establishes ground contact.
///
/// # Arguments
/// * `state` - velocity and `on_ground` are updated; position is not
/// * `intent` - this frame's intent flags
/// * `facing_yaw` - current facing, used only with move intent on the ground
/// * `delta` - frame time in seconds, expected `> 0`
pub fn integrate(
    state: &mut EntityPhysicsState,
    intent: IntentFlags,
    facing_yaw: f32,
    delta: f32,
    params: &PhysicsParams,
) -> Proposal {
    let grounded = state.on_ground;

    if grounded {
        let horizontal = if intent.contains(IntentFlags::MOVE) {
            facing_direction(facing_yaw) * params.move_speed
        } else {
            Vec3::ZERO
        };
        state.velocity.x = horizontal.x;
        state.velocity.z = horizontal.z;

        if intent.contains(IntentFlags::JUMP) {
            state.on_ground = false;
            state.velocity.y = params.jump_speed;
        }
    }

    state.velocity.y -= params.gravity * delta;

    let displacement = state.velocity * delta;
    Proposal {
        old_position: state.position,
        new_position: state.position + displacement,
        displacement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grounded_at(position: Vec3) -> EntityPhysicsState {
        EntityPhysicsState { position, velocity: Vec3::ZERO, on_ground: true }
    }

    #[test]
    fn gravity_decreases_vertical_velocity_while_airborne() {
        let params = PhysicsParams::default();
        let mut state = EntityPhysicsState {
            position: Vec3::new(0.0, 10.0, 0.0),
            velocity: Vec3::new(0.0, 3.0, 0.0),
            on_ground: false,
        };
        for delta in [0.016, 0.1, 0.5, 1.0] {
            let before = state.velocity.y;
            integrate(&mut state, IntentFlags::empty(), 0.0, delta, &params);
            assert_abs_diff_eq!(state.velocity.y, before - GRAVITY * delta, epsilon = 1e-5);
            assert!(state.velocity.y < before);
        }
    }

    #[test]
    fn falling_proposal_from_rest() {
        let params = PhysicsParams::default();
        let mut state = EntityPhysicsState::spawn_at(Vec3::new(0.0, 5.0, 0.0));

        let p = integrate(&mut state, IntentFlags::empty(), 0.0, 1.0, &params);
        assert_eq!(state.velocity, Vec3::new(0.0, -20.0, 0.0));
        assert_eq!(p.old_position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(p.new_position, Vec3::new(0.0, -15.0, 0.0));
        assert_eq!(p.displacement, Vec3::new(0.0, -20.0, 0.0));
        // integrate never moves the entity itself
        assert_eq!(state.position, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn grounded_move_uses_facing_and_speed() {
        let params = PhysicsParams::default();
        let mut state = grounded_at(Vec3::ZERO);

        let p = integrate(&mut state, IntentFlags::MOVE, 0.0, 0.1, &params);
        assert_abs_diff_eq!(state.velocity.x, 10.0);
        assert_abs_diff_eq!(state.velocity.z, 0.0);
        assert_abs_diff_eq!(p.displacement.x, 1.0, epsilon = 1e-6);

        // W faces -z
        integrate(&mut state, IntentFlags::MOVE, -1.5708, 0.1, &params);
        assert_abs_diff_eq!(state.velocity.x, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(state.velocity.z, -10.0, epsilon = 1e-3);
    }

    #[test]
    fn grounded_without_move_stops_horizontally() {
        let params = PhysicsParams::default();
        let mut state = grounded_at(Vec3::ZERO);
        state.velocity = Vec3::new(7.0, 0.0, -3.0);

        integrate(&mut state, IntentFlags::empty(), 0.0, 0.1, &params);
        assert_eq!(state.velocity.x, 0.0);
        assert_eq!(state.velocity.z, 0.0);
    }

    #[test]
    fn jump_launches_and_leaves_ground() {
        let params = PhysicsParams::default();
        let mut state = grounded_at(Vec3::new(0.0, 1.0, 0.0));

        let p = integrate(&mut state, IntentFlags::JUMP, 0.0, 0.1, &params);
        assert!(!state.on_ground);
        assert_abs_diff_eq!(state.velocity.y, JUMP_SPEED - GRAVITY * 0.1, epsilon = 1e-5);
        assert!(p.displacement.y > 0.0);
    }

    #[test]
    fn airborne_horizontal_velocity_is_frozen() {
        let params = PhysicsParams::default();
        let mut state = grounded_at(Vec3::ZERO);

        // take off while moving toward +x
        integrate(&mut state, IntentFlags::MOVE | IntentFlags::JUMP, 0.0, 0.1, &params);
        let takeoff = state.velocity;
        assert_abs_diff_eq!(takeoff.x, MOVE_SPEED);

        // steering and releasing keys mid-air changes nothing horizontally
        integrate(&mut state, IntentFlags::MOVE, 3.1416, 0.1, &params);
        integrate(&mut state, IntentFlags::empty(), 0.0, 0.1, &params);
        assert_eq!(state.velocity.x, takeoff.x);
        assert_eq!(state.velocity.z, takeoff.z);
    }

    #[test]
    fn airborne_jump_intent_is_ignored() {
        let params = PhysicsParams::default();
        let mut state = EntityPhysicsState::spawn_at(Vec3::new(0.0, 4.0, 0.0));

        integrate(&mut state, IntentFlags::JUMP, 0.0, 0.1, &params);
        assert_abs_diff_eq!(state.velocity.y, -GRAVITY * 0.1, epsilon = 1e-6);
    }
}
