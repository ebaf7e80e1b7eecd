//! Startup systems: scene, trailing camera and the controlled player.
//!
//! `setup` spawns lights and the follow camera. `spawn_player` runs after it,
//! builds the `SessionContext` from the loaded settings and places the
//! player either at the level's authored spawn point or in front of the
//! camera. A setup error is logged and ends the app instead of leaving a
//! half-initialized player behind.
use bevy::prelude::*;
use brawler::level::Level;
use brawler::player::{ClipPlayer, FollowCamera, GameSession, Player, PlayerController, SessionContext};
use brawler::settings::Settings;

/// Spawn lights and the trailing camera.
///
/// The camera keeps this orientation for the whole session; only its
/// position follows the player.
///
/// # Arguments
/// - `commands`: Commands used to spawn entities and insert resources.
/// - `settings`: camera offsets for the initial placement.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(mut commands: Commands, settings: Res<Settings>) {
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: true,
            illuminance: 8000.0,
            ..default()
        },
        transform: Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });

    let cam = &settings.camera;
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(0.0, cam.height, cam.distance)
                .looking_at(Vec3::ZERO, Vec3::Y),
            ..default()
        },
        FollowCamera,
    ));
}

/// Build the player controller and spawn the player entity.
///
/// # Arguments
/// - `settings`: tuning and animation bindings for the `SessionContext`.
/// - `level`: may carry an authored spawn point.
/// - `cameras`: the follow camera, for spawning in front of it.
/// - `exit`: sent with `AppExit::error()` when the context cannot be built.
#[allow(clippy::needless_pass_by_value)]
pub fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
    level: Res<Level>,
    cameras: Query<&Transform, With<FollowCamera>>,
    mut exit: EventWriter<AppExit>,
) {
    let ctx = match SessionContext::from_settings(&settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("cannot start player controller: {e}");
            exit.send(AppExit::error());
            return;
        }
    };

    let controller = match level.spawn {
        Some(spawn) => PlayerController::new(ctx, spawn),
        None => {
            let cam = cameras.get_single().copied().unwrap_or_default();
            PlayerController::in_front_of_camera(ctx, cam.translation, *cam.forward())
        }
    };

    let mut transform = Transform::default();
    controller.place(&mut transform);
    info!("player spawned at {:?}", controller.physics().position);

    let body = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.35, 0.2),
        perceptual_roughness: 0.7,
        ..default()
    });
    let nose = materials.add(StandardMaterial {
        base_color: Color::srgb(0.95, 0.9, 0.8),
        ..default()
    });

    // unscaled model: feet at the origin, facing local +x
    commands
        .spawn((SpatialBundle::from_transform(transform), Player, ClipPlayer::default()))
        .with_children(|p| {
            p.spawn(PbrBundle {
                mesh: meshes.add(Cuboid::new(1.2, 3.6, 1.2)),
                material: body,
                transform: Transform::from_xyz(0.0, 1.8, 0.0),
                ..default()
            });
            p.spawn(PbrBundle {
                mesh: meshes.add(Cuboid::new(0.5, 0.4, 0.4)),
                material: nose,
                transform: Transform::from_xyz(0.8, 2.9, 0.0),
                ..default()
            });
        });

    commands.insert_resource(GameSession::new(controller));
}
