//! Level geometry meshes.
//!
//! Keeps one cuboid mesh per obstacle box in sync with the `Level`
//! resource, so a hot-reloaded level file is visible immediately.
use bevy::prelude::*;
use brawler::level::Level;

#[derive(Component)]
pub struct LevelGeometry;

/// Rebuild the level meshes whenever `Level` changes (including the first frame).
#[allow(clippy::needless_pass_by_value)]
pub fn sync_level_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    level: Res<Level>,
    existing: Query<Entity, With<LevelGeometry>>,
) {
    if !level.is_changed() {
        return;
    }

    for e in &existing {
        commands.entity(e).despawn_recursive();
    }

    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.58, 0.62),
        perceptual_roughness: 0.9,
        ..default()
    });

    for obstacle in &level.obstacles {
        for bb in &obstacle.boxes {
            commands.spawn((
                PbrBundle {
                    mesh: meshes.add(Cuboid::from_size(bb.size())),
                    material: material.clone(),
                    transform: Transform::from_translation(bb.center()),
                    ..default()
                },
                LevelGeometry,
                Name::new(obstacle.name.clone()),
            ));
        }
    }
    info!("level '{}' meshed: {} boxes", level.name, level.box_count());
}
