//! Static level geometry and the geometry query used by collision.
//!
//! A `Level` is an ordered list of `Obstacle`s, each carrying one or more
//! axis-aligned `BoundingBox`es. The order matters: the collision resolver
//! relaxes against boxes one after another, so the same boxes in a
//! different order can resolve a corner differently.
//!
//! # Example:
//!
//! ```
//! use bevy::math::Vec3;
//! use brawler::level::{BoundingBox, GeometryQuery, Level, Obstacle};
//!
//! let mut level = Level::default();
//! level.obstacles.push(Obstacle::new(
//!     "floor",
//!     vec![BoundingBox::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0))],
//! ));
//! assert_eq!(level.bounding_boxes().count(), 1);
//! ```

use crate::error::ControllerError;
use bevy::prelude::*;

pub mod loader;

/// An axis-aligned box with `bound_min[i] <= bound_max[i]` on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub bound_min: Vec3,
    pub bound_max: Vec3,
}

impl BoundingBox {
    /// Build a box from two opposite corners, in any order.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            bound_min: a.min(b),
            bound_max: a.max(b),
        }
    }

    /// Build a box from explicit corners, rejecting inverted extents.
    ///
    /// # Errors
    /// Returns `ControllerError::InvalidBoundingBox` when `min` is greater
    /// than `max` on any axis.
    pub fn try_new(name: &str, min: Vec3, max: Vec3) -> Result<Self, ControllerError> {
        if min.cmpgt(max).any() {
            return Err(ControllerError::InvalidBoundingBox {
                name: name.to_string(),
                min,
                max,
            });
        }
        Ok(Self { bound_min: min, bound_max: max })
    }

    #[must_use]
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            bound_min: center - half,
            bound_max: center + half,
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.bound_min + self.bound_max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.bound_max - self.bound_min
    }
}

/// Anything that can hand the resolver a sequence of boxes to test against.
///
/// The iteration order is the order the resolver will relax in.
pub trait GeometryQuery {
    fn bounding_boxes(&self) -> impl Iterator<Item = &BoundingBox> + '_;
}

impl GeometryQuery for [BoundingBox] {
    fn bounding_boxes(&self) -> impl Iterator<Item = &BoundingBox> + '_ {
        self.iter()
    }
}

/// A named piece of static geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub name: String,
    pub boxes: Vec<BoundingBox>,
}

impl Obstacle {
    #[must_use]
    pub fn new(name: impl Into<String>, boxes: Vec<BoundingBox>) -> Self {
        Self { name: name.into(), boxes }
    }
}

impl GeometryQuery for Obstacle {
    fn bounding_boxes(&self) -> impl Iterator<Item = &BoundingBox> + '_ {
        self.boxes.iter()
    }
}

/// The `Level` resource: all obstacles of the active stage plus an optional
/// authored spawn point.
///
/// # Fields
/// * `name` - level identifier from the RON file
/// * `spawn` - where to place the player; `None` spawns in front of the camera
/// * `obstacles` - static geometry in query order
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Level {
    pub name: String,
    pub spawn: Option<Vec3>,
    pub obstacles: Vec<Obstacle>,
}

impl Level {
    /// Total number of boxes across all obstacles.
    #[must_use]
    pub fn box_count(&self) -> usize {
        self.obstacles.iter().map(|o| o.boxes.len()).sum()
    }

    /// The arena used when no level file could be loaded. Kept identical to
    /// the shipped `data/levels/arena.ron`: a floor slab, a step, a raised
    /// platform, a wall and a crate resting on the floor.
    #[must_use]
    pub fn arena() -> Self {
        Self {
            name: "arena".to_string(),
            spawn: None,
            obstacles: vec![
                Obstacle::new(
                    "floor",
                    vec![BoundingBox::new(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(20.0, 0.0, 20.0))],
                ),
                Obstacle::new(
                    "step",
                    vec![BoundingBox::new(Vec3::new(3.0, -1.0, -2.0), Vec3::new(5.0, 0.5, 2.0))],
                ),
                Obstacle::new(
                    "platform",
                    vec![
                        BoundingBox::new(Vec3::new(-8.0, -1.0, -8.0), Vec3::new(-4.0, 2.0, -4.0)),
                        BoundingBox::new(Vec3::new(-4.0, -1.0, -8.0), Vec3::new(-2.0, 1.0, -4.0)),
                    ],
                ),
                Obstacle::new(
                    "wall",
                    vec![BoundingBox::new(Vec3::new(-20.0, -1.0, -12.0), Vec3::new(20.0, 4.0, -11.0))],
                ),
                Obstacle::new(
                    "crate",
                    vec![BoundingBox::new(Vec3::new(6.0, 0.0, 4.0), Vec3::new(7.5, 1.5, 5.5))],
                ),
            ],
        }
    }
}

impl GeometryQuery for Level {
    fn bounding_boxes(&self) -> impl Iterator<Item = &BoundingBox> + '_ {
        self.obstacles.iter().flat_map(|o| o.boxes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_corners() {
        let b = BoundingBox::new(Vec3::new(1.0, -2.0, 3.0), Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(b.bound_min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.bound_max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn try_new_rejects_inverted_axis() {
        let err = BoundingBox::try_new("bad", Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, ControllerError::InvalidBoundingBox { ref name, .. } if name == "bad"));

        let flat = BoundingBox::try_new("flat", Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        assert!(flat.is_ok());
    }

    #[test]
    fn from_center_spans_half_extents() {
        let b = BoundingBox::from_center(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, -0.5, 2.0));
        assert_eq!(b.bound_min, Vec3::new(-1.0, 0.5, -2.0));
        assert_eq!(b.bound_max, Vec3::new(1.0, 1.5, 2.0));
        assert_eq!(b.center(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(b.size(), Vec3::new(2.0, 1.0, 4.0));
    }

    #[test]
    fn level_query_follows_obstacle_then_box_order() {
        let a0 = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
        let a1 = BoundingBox::new(Vec3::ONE, Vec3::splat(2.0));
        let b0 = BoundingBox::new(Vec3::splat(-2.0), Vec3::splat(-1.0));
        let level = Level {
            name: "order".into(),
            spawn: None,
            obstacles: vec![Obstacle::new("a", vec![a0, a1]), Obstacle::new("b", vec![b0])],
        };

        let boxes: Vec<BoundingBox> = level.bounding_boxes().copied().collect();
        assert_eq!(boxes, vec![a0, a1, b0]);
        assert_eq!(level.box_count(), 3);
    }

    #[test]
    fn arena_boxes_are_well_formed() {
        let level = Level::arena();
        assert!(level.box_count() >= 4);
        for b in level.bounding_boxes() {
            assert!(b.bound_min.cmple(b.bound_max).all());
        }
    }
}
