//! Setup-time errors.
//!
//! Everything that runs inside a frame is total over well-formed input, so
//! the only failures the crate reports are configuration problems found
//! while building a controller or loading level data.

use bevy::math::Vec3;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// A state needs a clip that the animation bindings do not provide.
    #[error("missing animation binding '{0}'")]
    MissingAnimation(String),

    /// A bounding box whose min corner is above its max corner on some axis.
    #[error("invalid bounding box '{name}': min {min:?} exceeds max {max:?}")]
    InvalidBoundingBox { name: String, min: Vec3, max: Vec3 },

    /// A tuning value outside its allowed range.
    #[error("invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}
