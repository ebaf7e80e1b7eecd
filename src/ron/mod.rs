//! Loading RON files and watching directories for changes.
//!
//! Settings and level files are plain RON documents in a data directory.
//! `load_ron_files` reads every `.ron` file in a directory (sorted by file
//! name so "first file wins" is stable across platforms) and `RonWatcher`
//! raises a shared flag when something in the directory is modified, which
//! the reload systems poll once per frame.

use bevy::prelude::{Resource, warn};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// File-watcher resource for RON hot-reload.
#[derive(Resource)]
pub struct RonWatcher {
    changed: Arc<Mutex<bool>>,
    _watcher: Option<RecommendedWatcher>, // kept alive for as long as the resource
}

impl RonWatcher {
    /// A watcher with no OS backing; `take_changed` always reports `false`
    /// unless `mark_changed` is called. Used when watcher creation fails.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(Mutex::new(false)),
            _watcher: None,
        }
    }

    /// Return whether a change was seen since the last call and clear the flag.
    pub fn take_changed(&self) -> bool {
        let mut flag = match self.changed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("ron watcher flag was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        std::mem::take(&mut *flag)
    }

    /// Raise the change flag by hand (tests and forced reloads).
    pub fn mark_changed(&self) {
        set_flag(&self.changed);
    }
}

fn set_flag(flag: &Mutex<bool>) {
    match flag.lock() {
        Ok(mut guard) => *guard = true,
        Err(poisoned) => *poisoned.into_inner() = true,
    }
}

/// List `.ron` files directly under `path`, sorted by file name.
fn ron_paths(path: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();
    paths
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// # Arguments
/// * `path` - Directory path to scan for `.ron` files.
///
/// # Return
/// Every successfully parsed document, in file-name order. Unreadable or
/// unparsable files are skipped with a warning.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let mut items = Vec::new();

    for file in ron_paths(path) {
        let content = match std::fs::read_to_string(&file) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to read {}: {e}", file.display());
                continue;
            }
        };
        match ron::from_str::<T>(&content) {
            Ok(item) => items.push(item),
            Err(e) => warn!("failed to parse {}: {e}", file.display()),
        }
    }

    items
}

/// Create a `RonWatcher` that flags modifications under `path`.
///
/// # Errors
/// Returns a `notify::Error` if the OS watcher cannot be created or the
/// directory cannot be registered.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = changed.clone();
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p)
                        .unwrap_or_else(|_| p.clone())
                        .starts_with(&watched_path)
                });
                if relevant {
                    set_flag(&changed_clone);
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}
