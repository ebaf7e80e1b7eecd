//! User interface helpers: debug overlay and obstacle bounds.
//!
//! The overlay (F1) periodically shows FPS, the player's action state,
//! position, velocity, ground contact and facing. The bounds view (F2)
//! outlines every obstacle box with gizmos, and the player's own collision
//! margin, so resolver behaviour can be checked by eye.

use crate::level::{GeometryQuery, Level};
use crate::player::{ClipPlayer, GameSession, Player};
use crate::settings::Settings;
use bevy::diagnostic::{Diagnostic, DiagnosticsStore};
use bevy::prelude::*;

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    /// Whether the overlay is currently visible.
    pub visible: bool,
}

#[derive(Resource, Default)]
pub struct DebugOverlayTimer(pub Timer);

#[derive(Resource, Default)]
pub struct DebugBoundsVisible(pub bool);

#[derive(Component)]
pub struct DebugOverlayText;

/// Insert debug overlay resources.
///
/// # Arguments
/// * `commands` - `Commands` to insert resources (timer, state, bounds visibility)
pub fn setup_debug_overlay(mut commands: Commands) {
    commands.insert_resource(DebugOverlayTimer(Timer::from_seconds(
        0.25,
        TimerMode::Repeating,
    )));
    commands.insert_resource(DebugOverlayState::default());
    commands.insert_resource(DebugBoundsVisible::default());
}

/// Toggle the debug overlay when the `toggle_overlay` key (F1) is pressed.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    mut state: ResMut<DebugOverlayState>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(settings.controls.key("toggle_overlay", KeyCode::F1)) {
        state.visible = !state.visible;
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_bounds(
    mut bounds: ResMut<DebugBoundsVisible>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(settings.controls.key("toggle_bounds", KeyCode::F2)) {
        bounds.0 = !bounds.0;
    }
}

/// Compass label for a facing yaw. W faces north (-z), A faces east (+x).
#[must_use]
pub fn compass(yaw: f32) -> &'static str {
    const LABELS: [&str; 8] = ["E →", "NE ↗", "N ↑", "NW ↖", "W ←", "SW ↙", "S ↓", "SE ↘"];
    // angle of the facing direction measured counter-clockwise from east, seen from above
    let angle = (-yaw).to_degrees().rem_euclid(360.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = ((angle + 22.5) / 45.0) as usize % 8;
    LABELS[sector]
}

/// Grouped parameters for `update_debug_overlay`.
#[derive(bevy::ecs::system::SystemParam)]
pub struct DebugOverlayCtx<'w, 's> {
    pub diagnostics: Res<'w, DiagnosticsStore>,
    pub state: Res<'w, DebugOverlayState>,
    pub session: Option<Res<'w, GameSession>>,
    pub level: Option<Res<'w, Level>>,
    pub time: Res<'w, Time>,
    pub timer: ResMut<'w, DebugOverlayTimer>,
    pub query: Query<'w, 's, &'static mut Text, With<DebugOverlayText>>,
    pub clips: Query<'w, 's, &'static ClipPlayer, With<Player>>,
}

/// Refresh the overlay text on a fixed interval.
pub fn update_debug_overlay(mut ctx: DebugOverlayCtx<'_, '_>) {
    if !ctx.timer.0.tick(ctx.time.delta()).just_finished() {
        return;
    }

    let Ok(mut text) = ctx.query.get_single_mut() else { return };

    if !ctx.state.visible {
        text.sections[0].value = String::new();
        return;
    }

    let fps = ctx
        .diagnostics
        .get(&bevy::diagnostic::FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let player = match ctx.session.as_deref() {
        Some(session) => {
            let c = &session.controller;
            let p = c.physics();
            let contacts = session
                .last_report
                .map(|r| r.contacts)
                .unwrap_or_default();
            format!(
                "State: {}\nPos: ({:.2}, {:.2}, {:.2})\nVel: ({:.2}, {:.2}, {:.2})\nGround: {} | Blocked: x={} z={}\nFacing: {}",
                c.action().label(),
                p.position.x,
                p.position.y,
                p.position.z,
                p.velocity.x,
                p.velocity.y,
                p.velocity.z,
                p.on_ground,
                contacts.blocked.x,
                contacts.blocked.z,
                compass(c.yaw()),
            )
        }
        None => "State: N/A".to_string(),
    };

    let clip = ctx
        .clips
        .get_single()
        .ok()
        .and_then(|c| c.clip_name().map(|name| format!("{name} {:.2}s", c.time)))
        .unwrap_or_else(|| "-".to_string());

    let level = ctx
        .level
        .as_deref()
        .map_or_else(|| "N/A".to_string(), |l| format!("{} ({} boxes)", l.name, l.box_count()));

    text.sections[0].value = format!("FPS: {fps:.1}\n{player}\nClip: {clip}\nLevel: {level}");
}

/// Spawn the overlay text node.
pub fn spawn_debug_overlay(mut commands: Commands) {
    commands.spawn((
        TextBundle {
            text: Text::from_section(
                "",
                TextStyle {
                    font_size: 18.0,
                    color: Color::srgb(1.0, 1.0, 0.0),
                    ..default()
                },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        DebugOverlayText,
    ));
}

/// Outline every obstacle box, and the player's collision margin.
///
/// # Arguments
/// * `bounds` - `DebugBoundsVisible` resource controlling whether outlines are drawn
/// * `gizmos` - gizmo drawing context
/// * `level` - obstacle geometry
/// * `session` - for the player position and margin
#[allow(clippy::needless_pass_by_value)]
pub fn render_obstacle_bounds(
    bounds: Res<DebugBoundsVisible>,
    mut gizmos: Gizmos,
    level: Res<Level>,
    session: Option<Res<GameSession>>,
) {
    if !bounds.0 {
        return;
    }

    let green = Color::srgb(0.0, 1.0, 0.0);
    for bb in level.bounding_boxes() {
        gizmos.cuboid(Transform::from_translation(bb.center()).with_scale(bb.size()), green);
    }

    if let Some(session) = session {
        let c = &session.controller;
        let resolver = c.params().resolver;
        let margin = resolver.body_offset;
        let feet = c.physics().position - Vec3::Y * margin.y;
        // the body the resolver sweeps, standing on the feet
        let size = Vec3::new(margin.x * 2.0, (resolver.body_height + margin.y * 2.0).max(0.01), margin.z * 2.0);
        let color = if c.physics().on_ground { Color::srgb(0.2, 0.6, 1.0) } else { Color::srgb(1.0, 0.3, 0.3) };
        gizmos.cuboid(Transform::from_translation(feet + Vec3::Y * size.y * 0.5).with_scale(size), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_follows_facing_table() {
        assert_eq!(compass(-1.5708), "N ↑");
        assert_eq!(compass(1.5708), "S ↓");
        assert_eq!(compass(0.0), "E →");
        assert_eq!(compass(3.1416), "W ←");
        assert_eq!(compass(-0.7854), "NE ↗");
        assert_eq!(compass(3.9270), "NW ↖");
        assert_eq!(compass(0.7854), "SE ↘");
        assert_eq!(compass(2.3562), "SW ↙");
    }
}
