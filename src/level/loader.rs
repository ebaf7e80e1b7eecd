//! Level loader and watcher.
//!
//! Levels are authored as RON files under `data/levels/`:
//!
//! ```ron
//! (
//!     name: "arena",
//!     spawn: Some((0.0, 1.0, 0.0)),
//!     obstacles: [
//!         (name: "floor", boxes: [(min: (-20.0, -1.0, -20.0), max: (20.0, 0.0, 20.0))]),
//!     ],
//! )
//! ```
//!
//! Box corners are validated on load; a level with an inverted box is
//! rejected as a whole rather than loaded with that box dropped.

use super::{BoundingBox, Level, Obstacle};
use crate::error::ControllerError;
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const LEVEL_DIR: &str = "data/levels";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxDef {
    pub min: (f32, f32, f32),
    pub max: (f32, f32, f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleDef {
    pub name: String,
    #[serde(default)]
    pub boxes: Vec<BoxDef>,
}

/// On-disk level document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    #[serde(default)]
    pub spawn: Option<(f32, f32, f32)>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
}

fn vec3(t: (f32, f32, f32)) -> Vec3 {
    Vec3::new(t.0, t.1, t.2)
}

impl LevelDef {
    /// Convert into a runtime `Level`, validating every box.
    ///
    /// # Errors
    /// `ControllerError::InvalidBoundingBox` naming the offending obstacle.
    pub fn into_level(self) -> Result<Level, ControllerError> {
        let mut obstacles = Vec::with_capacity(self.obstacles.len());
        for def in self.obstacles {
            let boxes = def
                .boxes
                .iter()
                .map(|b| BoundingBox::try_new(&def.name, vec3(b.min), vec3(b.max)))
                .collect::<Result<Vec<_>, _>>()?;
            obstacles.push(Obstacle::new(def.name, boxes));
        }

        Ok(Level {
            name: self.name,
            spawn: self.spawn.map(vec3),
            obstacles,
        })
    }
}

/// Load the first valid level from `path`, falling back to `Level::arena()`.
///
/// Files are tried in file-name order; one that parses but fails box
/// validation is logged and skipped.
#[must_use]
pub fn load_level_from_dir(path: &str) -> Level {
    let defs: Vec<LevelDef> = load_ron_files(path);
    for def in defs {
        let name = def.name.clone();
        match def.into_level() {
            Ok(level) => {
                info!("loaded level '{}' ({} boxes)", level.name, level.box_count());
                return level;
            }
            Err(e) => error!("rejected level '{name}': {e}"),
        }
    }

    info!("no level found in '{path}', using built-in arena");
    Level::arena()
}

#[derive(Resource)]
pub struct LevelWatcher(pub crate::ron::RonWatcher);

impl LevelWatcher {
    #[must_use]
    pub fn stub() -> Self {
        LevelWatcher(crate::ron::RonWatcher::stub())
    }
}

/// Watch the level directory for hot reload.
///
/// # Errors
/// Returns a `notify::Error` if the file watcher could not be created.
pub fn setup_level_watcher(path: &str) -> Result<LevelWatcher, notify::Error> {
    setup_ron_watcher(path).map(LevelWatcher)
}

/// Reload the `Level` resource when a level file changes.
///
/// Obstacles are only read by the player controller, so swapping the
/// resource between frames is safe; the player keeps its position.
#[allow(clippy::needless_pass_by_value)]
pub fn check_level_changes(watcher: Res<LevelWatcher>, mut level: ResMut<Level>) {
    if watcher.0.take_changed() {
        info!("level files changed, reloading...");
        *level = load_level_from_dir(LEVEL_DIR);
    }
}
