//! Swept per-axis collision against static boxes.
//!
//! For every obstacle box, in query order, the axes are visited x, y, z.
//! An axis is clamped when the proposed move crosses one of the box's faces
//! on that axis and, at the moment of crossing, the entity's body strictly
//! overlaps the box on the other two axes. The body spans `body_offset`
//! either side of the position horizontally and `body_height` up from the
//! feet. Later boxes and axes see the already clamped move, so deep corner
//! penetrations can be under-resolved.
//!
//! A box whose top is within `skin` of the feet at the start of the move is
//! ground underfoot: it never blocks horizontally, so walking across flush
//! floor tiles does not catch on their side faces.

use crate::level::BoundingBox;
use crate::settings::PhysicsSettings;
use bevy::prelude::*;

pub const EPSILON: f32 = 0.0;
pub const BODY_OFFSET: Vec3 = Vec3::new(0.3, 0.0, 0.3);
pub const BODY_HEIGHT: f32 = 1.7;
pub const SKIN: f32 = 0.05;

const UP: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverParams {
    /// Half-extent of the entity per axis; widens obstacles on the cross axes.
    pub body_offset: Vec3,
    /// Height of the body above the feet.
    pub body_height: f32,
    /// Gap left between a clamped entity and the face it hit.
    pub epsilon: f32,
    /// How close a box top must be to the feet to count as ground underfoot.
    pub skin: f32,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            body_offset: BODY_OFFSET,
            body_height: BODY_HEIGHT,
            epsilon: EPSILON,
            skin: SKIN,
        }
    }
}

impl From<&PhysicsSettings> for ResolverParams {
    fn from(s: &PhysicsSettings) -> Self {
        Self {
            body_offset: Vec3::from(s.body_offset),
            body_height: s.body_height,
            epsilon: s.epsilon,
            skin: s.skin,
        }
    }
}

/// What one sweep ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contacts {
    /// Set only by a downward vertical contact with a box top.
    pub on_ground: bool,
    /// An upward vertical contact with a box bottom.
    pub ceiling: bool,
    /// Axes clamped at least once during the sweep.
    pub blocked: BVec3,
}

impl Contacts {
    /// Whether the sweep touched anything at all.
    #[must_use]
    pub fn any(&self) -> bool {
        self.on_ground || self.ceiling || self.blocked.any()
    }
}

/// Clamp a proposed move against `boxes`.
///
/// `new_position` and `displacement` are corrected in place; on every
/// clamped axis `old_position + displacement == new_position` holds exactly.
/// Axes without motion are skipped, so a zero displacement never divides
/// and never reports contact.
pub fn resolve<'a>(
    old_position: Vec3,
    new_position: &mut Vec3,
    displacement: &mut Vec3,
    boxes: impl IntoIterator<Item = &'a BoundingBox>,
    params: &ResolverParams,
) -> Contacts {
    let mut contacts = Contacts::default();
    let feet = old_position.y - params.body_offset.y;

    for bb in boxes {
        let underfoot = (bb.bound_max.y - feet).abs() <= params.skin;

        for axis in 0..3 {
            let d = displacement[axis];
            if d == 0.0 || (axis != UP && underfoot) {
                continue;
            }

            let face = if d < 0.0 {
                // moving down the axis: only the max face can be crossed
                let face = bb.bound_max[axis];
                if !(new_position[axis] <= face && face <= old_position[axis]) {
                    continue;
                }
                face
            } else {
                let face = bb.bound_min[axis];
                if !(old_position[axis] <= face && face <= new_position[axis]) {
                    continue;
                }
                face
            };

            let t = ((face - old_position[axis]) / d).abs();
            if !overlaps_at(bb, old_position, *displacement, t, axis, params) {
                continue;
            }

            let target = if d < 0.0 { face + params.epsilon } else { face - params.epsilon };
            displacement[axis] = target - old_position[axis];
            new_position[axis] = old_position[axis] + displacement[axis];

            match axis {
                0 => contacts.blocked.x = true,
                UP => contacts.blocked.y = true,
                _ => contacts.blocked.z = true,
            }
            if axis == UP {
                if d < 0.0 {
                    contacts.on_ground = true;
                } else {
                    contacts.ceiling = true;
                }
            }
        }
    }

    contacts
}

// Whether the body, at fraction `t` of its move, strictly overlaps `bb` on
// both axes other than `axis`.
fn overlaps_at(bb: &BoundingBox, old: Vec3, displacement: Vec3, t: f32, axis: usize, params: &ResolverParams) -> bool {
    (0..3).filter(|&j| j != axis).all(|j| {
        let p = old[j] + displacement[j] * t;
        let top = if j == UP { params.body_height } else { 0.0 };
        let offset = params.body_offset[j];
        p - offset < bb.bound_max[j] && bb.bound_min[j] < p + offset + top
    })
}
