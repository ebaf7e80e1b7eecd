//! Debug utilities, including a system (F3 default) to dump the player
//! controller state, the last frame's collision result, the active level and
//! frame diagnostics to a timestamped text file in './debug-dumps/'.
//!
//! Useful for capturing exactly why the player stuck to a wall or missed a
//! landing without attaching a debugger.
use crate::level::Level;
use crate::player::GameSession;
use crate::settings::Settings;
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;

pub const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_input_system);
    }
}

/// Frame diagnostics captured alongside the controller state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpStats {
    pub fps: f64,
    pub frame_time_ms: f64,
    pub entities: usize,
}

/// Render the dump text.
///
/// # Arguments
/// * `session` - the running session, if the player was spawned
/// * `level` - active level geometry
/// * `stats` - frame diagnostics
/// * `at` - dump time, used for the header
#[must_use]
pub fn dump_text(session: Option<&GameSession>, level: &Level, stats: &DumpStats, at: DateTime<Utc>) -> String {
    let mut out = String::new();
    writeln!(out, "Debug dump: {}", at.timestamp()).ok();
    writeln!(out, "Timestamp: {}", at.format("%Y-%m-%d %H:%M:%S")).ok();
    writeln!(out, "FPS: {:.1}, frame_time: {:.4} ms", stats.fps, stats.frame_time_ms).ok();
    writeln!(out, "Entities: {}", stats.entities).ok();

    writeln!(out, "\nPlayer:").ok();
    match session {
        Some(session) => {
            let c = &session.controller;
            let p = c.physics();
            writeln!(out, "  action: {} (transitions: {})", c.action().label(), c.transitions()).ok();
            writeln!(out, "  position: {:?}", p.position).ok();
            writeln!(out, "  velocity: {:?}", p.velocity).ok();
            writeln!(out, "  on_ground: {}", p.on_ground).ok();
            writeln!(out, "  yaw: {:.4} rad", c.yaw()).ok();
            writeln!(out, "  frames stepped: {}", session.frames).ok();

            let params = c.params();
            writeln!(
                out,
                "  params: gravity={} jump_speed={} move_speed={} epsilon={} body_offset={:?} body_height={} skin={}",
                params.physics.gravity,
                params.physics.jump_speed,
                params.physics.move_speed,
                params.resolver.epsilon,
                params.resolver.body_offset,
                params.resolver.body_height,
                params.resolver.skin,
            )
            .ok();

            if let Some(r) = &session.last_report {
                writeln!(out, "  last frame:").ok();
                writeln!(out, "    intent: {:?} yaw: {:?}", r.intent.flags, r.intent.yaw).ok();
                writeln!(out, "    proposed: {:?} -> {:?}", r.proposal.old_position, r.proposal.new_position).ok();
                writeln!(out, "    resolved: {:?}", r.resolved).ok();
                writeln!(
                    out,
                    "    contacts: ground={} ceiling={} blocked={:?}",
                    r.contacts.on_ground, r.contacts.ceiling, r.contacts.blocked
                )
                .ok();
                if let Some(t) = r.transition {
                    writeln!(out, "    transition: {} -> {}", t.from.label(), t.to.label()).ok();
                }
            }
        }
        None => {
            writeln!(out, "  (no player session)").ok();
        }
    }

    writeln!(
        out,
        "\nLevel '{}': {} obstacles, {} boxes",
        level.name,
        level.obstacles.len(),
        level.box_count()
    )
    .ok();
    for obstacle in &level.obstacles {
        writeln!(out, "  {}:", obstacle.name).ok();
        for bb in &obstacle.boxes {
            writeln!(out, "    {:?} .. {:?}", bb.bound_min, bb.bound_max).ok();
        }
    }
    out
}

/// Write a dump when the bound key (`dump_debug`, default F3) is pressed.
#[allow(clippy::needless_pass_by_value)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    diagnostics: Res<DiagnosticsStore>,
    query_entities: Query<Entity>,
    session: Option<Res<GameSession>>,
    level: Option<Res<Level>>,
) {
    if !keys.just_pressed(settings.controls.key("dump_debug", KeyCode::F3)) {
        return;
    }

    let stats = DumpStats {
        fps: diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(Diagnostic::smoothed)
            .unwrap_or(0.0),
        frame_time_ms: diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
            .and_then(Diagnostic::smoothed)
            .unwrap_or(0.0),
        entities: query_entities.iter().count(),
    };

    let now = Utc::now();
    let empty = Level::default();
    let out = dump_text(session.as_deref(), level.as_deref().unwrap_or(&empty), &stats, now);
    let fname = format!("{}/debug-{}.txt", DUMP_DIR, now.timestamp());

    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{}': {}", DUMP_DIR, e);
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {}: {}", fname, e);
    } else {
        info!("wrote debug dump: {}", fname);
    }
}
