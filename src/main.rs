use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use brawler::debug::DebugDumpPlugin;
use brawler::level::loader as level_loader;
use brawler::player::{GameSession, InputBindings, advance_clips, drive_player, sync_session_settings};
use brawler::settings::loader as settings_loader;
use brawler::ui::{
    render_obstacle_bounds, setup_debug_overlay, spawn_debug_overlay, toggle_debug_bounds,
    toggle_debug_overlay, update_debug_overlay,
};

mod app;
use app::{setup, spawn_player, sync_level_meshes};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let level = level_loader::load_level_from_dir(level_loader::LEVEL_DIR);
    let level_watcher = level_loader::setup_level_watcher(level_loader::LEVEL_DIR)
        .unwrap_or_else(|_| level_loader::LevelWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "brawler".into(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(LogDiagnosticsPlugin::default())
        .add_plugins(DebugDumpPlugin);

    app.insert_resource(InputBindings::from_settings(&settings.controls));
    app.insert_resource(settings);
    app.insert_resource(settings_watcher);
    app.insert_resource(level);
    app.insert_resource(level_watcher);

    app.add_systems(Startup, setup_debug_overlay);
    app.add_systems(Startup, spawn_debug_overlay);
    app.add_systems(Startup, (setup, spawn_player).chain());

    // one frame of the player pipeline, in order
    app.add_systems(
        Update,
        (
            settings_loader::check_settings_changes,
            level_loader::check_level_changes,
            sync_session_settings.run_if(resource_exists::<GameSession>),
            advance_clips,
            drive_player.run_if(resource_exists::<GameSession>),
        )
            .chain(),
    );

    app.add_systems(Update, sync_level_meshes);
    app.add_systems(Update, toggle_debug_overlay);
    app.add_systems(Update, toggle_debug_bounds);
    app.add_systems(Update, update_debug_overlay);
    app.add_systems(Update, render_obstacle_bounds);

    app.run();
}
