//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If
//! several files are present the first one (by file name) that parses and
//! validates is used; otherwise the defaults are.
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;
use bevy::prelude::*;

pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub crate::ron::RonWatcher);

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(crate::ron::RonWatcher::stub())
    }
}

/// Load settings from `path` (directory).
///
/// A file that parses but fails `Settings::validate` is logged and skipped,
/// so a typo in a tuning value never reaches the controller.
///
/// # Example
/// ```
/// let settings = brawler::settings::loader::load_settings_from_dir("data/settings");
/// assert!(settings.validate().is_ok());
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    for candidate in items {
        match candidate.validate() {
            Ok(()) => return candidate,
            Err(e) => error!("ignoring settings file: {e}"),
        }
    }
    Settings::defaults()
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns a `notify::Error` if the file watcher could not be created.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Reload the `Settings` resource when a settings file changes.
///
/// The player controller picks the new values up through
/// `player::controller::sync_session_settings`.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.0.take_changed() {
        info!("settings changed, reloading...");
        *settings = load_settings_from_dir(SETTINGS_DIR);
    }
}
