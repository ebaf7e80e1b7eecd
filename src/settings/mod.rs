//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are
//! hot-reloadable through the RON watcher (see `ron::setup_ron_watcher`).
//! Every field has a serde default, so a settings file only needs to name
//! the values it changes:
//!
//! ```ron
//! (physics: (gravity: 30.0), camera: (distance: 14.0))
//! ```
use crate::error::ControllerError;
use bevy::prelude::{KeyCode, MouseButton, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Integration and collision tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSettings {
    #[serde(default = "PhysicsSettings::default_gravity")]
    pub gravity: f32, // Downward acceleration in units/s^2, applied every frame.
    #[serde(default = "PhysicsSettings::default_jump_speed")]
    pub jump_speed: f32, // Vertical velocity set on take-off.
    #[serde(default = "PhysicsSettings::default_move_speed")]
    pub move_speed: f32, // Horizontal speed while grounded with move intent.
    #[serde(default = "PhysicsSettings::default_epsilon")]
    pub epsilon: f32, // Bias added when clamping against a box face.
    #[serde(default = "PhysicsSettings::default_body_offset")]
    pub body_offset: (f32, f32, f32), // Player half-extent used on the cross axes of a sweep.
    #[serde(default = "PhysicsSettings::default_body_height")]
    pub body_height: f32, // Player height above the feet.
    #[serde(default = "PhysicsSettings::default_skin")]
    pub skin: f32, // A box top this close to the feet is ground, never a wall.
}

impl PhysicsSettings {
    fn default_gravity() -> f32 { 20.0 }
    fn default_jump_speed() -> f32 { 10.0 }
    fn default_move_speed() -> f32 { 10.0 }
    fn default_epsilon() -> f32 { 0.0 }
    fn default_body_offset() -> (f32, f32, f32) { (0.3, 0.0, 0.3) }
    fn default_body_height() -> f32 { 1.7 }
    fn default_skin() -> f32 { 0.05 }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            jump_speed: Self::default_jump_speed(),
            move_speed: Self::default_move_speed(),
            epsilon: Self::default_epsilon(),
            body_offset: Self::default_body_offset(),
            body_height: Self::default_body_height(),
            skin: Self::default_skin(),
        }
    }
}

/// Trailing camera placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_height")]
    pub height: f32, // Camera height above the player.
    #[serde(default = "CameraSettings::default_distance")]
    pub distance: f32, // Camera distance behind the player (+z).
    #[serde(default = "CameraSettings::default_spawn_distance")]
    pub spawn_distance: f32, // How far in front of the camera the player spawns.
}

impl CameraSettings {
    fn default_height() -> f32 { 5.0 }
    fn default_distance() -> f32 { 10.0 }
    fn default_spawn_distance() -> f32 { 5.0 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            height: Self::default_height(),
            distance: Self::default_distance(),
            spawn_distance: Self::default_spawn_distance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSettings {
    #[serde(default = "PlayerSettings::default_scale")]
    pub scale: f32, // Uniform model scale applied at spawn.
}

impl PlayerSettings {
    fn default_scale() -> f32 { 0.5 }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self { scale: Self::default_scale() }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default = "ControlsSettings::default_wheel_moves")]
    pub wheel_moves: bool, // Mouse wheel up/down acts as forward/back for that frame.
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Action name -> key or mouse button identifier.
}

impl ControlsSettings {
    fn default_wheel_moves() -> bool { true }

    fn default_keybinds() -> HashMap<String, String> {
        [
            ("forward", "W"),
            ("back", "S"),
            ("left", "A"),
            ("right", "D"),
            ("jump", "Space"),
            ("punch", "MouseLeft"),
            ("kick", "MouseRight"),
            ("toggle_overlay", "F1"),
            ("toggle_bounds", "F2"),
            ("dump_debug", "F3"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

impl ControlsSettings {
    /// Keyboard key bound to `action`, or `fallback` when unbound or not a key.
    #[must_use]
    pub fn key(&self, action: &str, fallback: KeyCode) -> KeyCode {
        self.keybinds
            .get(action)
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(fallback)
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            wheel_moves: Self::default_wheel_moves(),
            keybinds: Self::default_keybinds(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClipSettings {
    pub duration: f32, // Clip length in seconds at speed 1.0.
}

/// Logical animation clips available to the action state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSettings {
    #[serde(default = "AnimationSettings::default_clips")]
    pub clips: HashMap<String, ClipSettings>,
}

impl AnimationSettings {
    fn default_clips() -> HashMap<String, ClipSettings> {
        [
            ("idle", 2.0),
            ("walk", 1.0),
            ("jump", 1.0),
            ("jump_kick", 0.8),
            ("punch", 1.0),
            ("kick", 0.9),
        ]
        .into_iter()
        .map(|(name, duration)| (name.to_string(), ClipSettings { duration }))
        .collect()
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self { clips: Self::default_clips() }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub physics: PhysicsSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub player: PlayerSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub animation: AnimationSettings,
}

fn require(ok: bool, field: &'static str, reason: impl Into<String>) -> Result<(), ControllerError> {
    if ok {
        Ok(())
    } else {
        Err(ControllerError::InvalidSetting { field, reason: reason.into() })
    }
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Check tuning values before they reach the controller.
    ///
    /// Clip presence is not checked here; the controller checks its
    /// bindings against the clips its states need.
    ///
    /// # Errors
    /// `ControllerError::InvalidSetting` naming the first bad field.
    pub fn validate(&self) -> Result<(), ControllerError> {
        let p = &self.physics;
        require(p.gravity > 0.0, "physics.gravity", format!("must be positive, got {}", p.gravity))?;
        require(p.jump_speed > 0.0, "physics.jump_speed", format!("must be positive, got {}", p.jump_speed))?;
        require(p.move_speed > 0.0, "physics.move_speed", format!("must be positive, got {}", p.move_speed))?;
        require(p.epsilon >= 0.0, "physics.epsilon", format!("must not be negative, got {}", p.epsilon))?;
        let (ox, oy, oz) = p.body_offset;
        require(
            ox >= 0.0 && oy >= 0.0 && oz >= 0.0,
            "physics.body_offset",
            format!("components must not be negative, got {:?}", p.body_offset),
        )?;
        require(p.body_height >= 0.0, "physics.body_height", format!("must not be negative, got {}", p.body_height))?;
        require(
            p.skin >= p.epsilon,
            "physics.skin",
            format!("must be at least epsilon ({}), got {}", p.epsilon, p.skin),
        )?;
        require(self.player.scale > 0.0, "player.scale", format!("must be positive, got {}", self.player.scale))?;

        for (name, clip) in &self.animation.clips {
            require(
                clip.duration > 0.0,
                "animation.clips",
                format!("clip '{name}' has non-positive duration {}", clip.duration),
            )?;
        }
        Ok(())
    }

    /// Convert a key identifier from `controls.keybinds` into a `KeyCode`.
    ///
    /// # Arguments
    /// * `name` - identifier such as "W", "Space", "F1" (case-insensitive)
    ///
    /// # Returns
    /// The matching `KeyCode`, or `None` for unknown names.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        let s = name.to_ascii_uppercase();
        if let [c] = s.as_bytes() {
            return match *c {
                b'A' => Some(KeyCode::KeyA),
                b'B' => Some(KeyCode::KeyB),
                b'C' => Some(KeyCode::KeyC),
                b'D' => Some(KeyCode::KeyD),
                b'E' => Some(KeyCode::KeyE),
                b'F' => Some(KeyCode::KeyF),
                b'G' => Some(KeyCode::KeyG),
                b'H' => Some(KeyCode::KeyH),
                b'I' => Some(KeyCode::KeyI),
                b'J' => Some(KeyCode::KeyJ),
                b'K' => Some(KeyCode::KeyK),
                b'L' => Some(KeyCode::KeyL),
                b'M' => Some(KeyCode::KeyM),
                b'N' => Some(KeyCode::KeyN),
                b'O' => Some(KeyCode::KeyO),
                b'P' => Some(KeyCode::KeyP),
                b'Q' => Some(KeyCode::KeyQ),
                b'R' => Some(KeyCode::KeyR),
                b'S' => Some(KeyCode::KeyS),
                b'T' => Some(KeyCode::KeyT),
                b'U' => Some(KeyCode::KeyU),
                b'V' => Some(KeyCode::KeyV),
                b'W' => Some(KeyCode::KeyW),
                b'X' => Some(KeyCode::KeyX),
                b'Y' => Some(KeyCode::KeyY),
                b'Z' => Some(KeyCode::KeyZ),
                b'0' => Some(KeyCode::Digit0),
                b'1' => Some(KeyCode::Digit1),
                b'2' => Some(KeyCode::Digit2),
                b'3' => Some(KeyCode::Digit3),
                b'4' => Some(KeyCode::Digit4),
                b'5' => Some(KeyCode::Digit5),
                b'6' => Some(KeyCode::Digit6),
                b'7' => Some(KeyCode::Digit7),
                b'8' => Some(KeyCode::Digit8),
                b'9' => Some(KeyCode::Digit9),
                _ => None,
            };
        }

        Some(match s.as_str() {
            "F1" => KeyCode::F1,
            "F2" => KeyCode::F2,
            "F3" => KeyCode::F3,
            "F4" => KeyCode::F4,
            "F5" => KeyCode::F5,
            "F6" => KeyCode::F6,
            "F7" => KeyCode::F7,
            "F8" => KeyCode::F8,
            "F9" => KeyCode::F9,
            "F10" => KeyCode::F10,
            "F11" => KeyCode::F11,
            "F12" => KeyCode::F12,

            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,

            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" | "BACK" => KeyCode::Backspace,

            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,

            _ => return None,
        })
    }

    /// Convert a mouse identifier ("MouseLeft", "MouseRight", "MouseMiddle")
    /// into a `MouseButton`.
    #[must_use]
    pub fn mouse_button_from_str(name: &str) -> Option<MouseButton> {
        match name.to_ascii_uppercase().as_str() {
            "MOUSELEFT" | "LMB" => Some(MouseButton::Left),
            "MOUSERIGHT" | "RMB" => Some(MouseButton::Right),
            "MOUSEMIDDLE" | "MMB" => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

pub mod loader;
