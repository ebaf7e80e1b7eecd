pub mod level;
pub mod setup;

pub use level::sync_level_meshes;
pub use setup::{setup, spawn_player};
