//! Input normalization: raw keys to intent flags and facing.
//!
//! Raw input is first reduced to an `InputSnapshot` (which direction keys
//! and action buttons are down this frame), then `resolve_intent` turns that
//! into `IntentFlags` plus an optional new facing yaw. Facing comes from a
//! fixed table indexed by the pressed-direction bitmask; opposing keys
//! cancel on their axis, and a mask with no direction left keeps the
//! previous facing.

use crate::settings::{ControlsSettings, Settings};
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bitflags::bitflags;

bitflags! {
    /// What the player wants to do this frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IntentFlags: u8 {
        const MOVE  = 1 << 0;
        const JUMP  = 1 << 1;
        const PUNCH = 1 << 2;
        const KICK  = 1 << 3;
    }
}

bitflags! {
    /// Direction keys held this frame (W/S/A/D by default).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirectionKeys: u8 {
        const FORWARD = 1 << 0;
        const BACK    = 1 << 1;
        const LEFT    = 1 << 2;
        const RIGHT   = 1 << 3;
    }
}

// Yaw (radians) per direction bitmask, indexed by `DirectionKeys::bits()`.
// Masks holding both keys of an axis never reach the table.
const FACING_TABLE: [Option<f32>; 16] = [
    None,            // none
    Some(-1.5708),   // W
    Some(1.5708),    // S
    None,            // W+S
    Some(0.0),       // A
    Some(-0.7854),   // W+A
    Some(0.7854),    // S+A
    None,            // W+S+A
    Some(3.1416),    // D
    Some(3.9270),    // W+D
    Some(2.3562),    // S+D
    None,            // W+S+D
    None,            // A+D
    None,            // W+A+D
    None,            // S+A+D
    None,            // all
];

impl DirectionKeys {
    /// Drop both keys of any axis where the opposing keys are both held.
    #[must_use]
    pub fn cancel_opposing(self) -> Self {
        let mut keys = self;
        if keys.contains(Self::FORWARD | Self::BACK) {
            keys.remove(Self::FORWARD | Self::BACK);
        }
        if keys.contains(Self::LEFT | Self::RIGHT) {
            keys.remove(Self::LEFT | Self::RIGHT);
        }
        keys
    }
}

/// Look up the facing yaw for a set of direction keys.
///
/// Returns `None` when no direction survives cancellation; the caller keeps
/// its previous facing in that case.
#[must_use]
pub fn facing_yaw(keys: DirectionKeys) -> Option<f32> {
    FACING_TABLE[usize::from(keys.cancel_opposing().bits())]
}

/// Normalized raw input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub directions: DirectionKeys,
    pub jump: bool,
    pub punch: bool,
    pub kick: bool,
}

/// Intent derived from one `InputSnapshot`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub flags: IntentFlags,
    /// New facing, or `None` to keep the current one.
    pub yaw: Option<f32>,
}

/// Turn a snapshot into intent flags and facing.
#[must_use]
pub fn resolve_intent(input: &InputSnapshot) -> Intent {
    let yaw = facing_yaw(input.directions);
    let mut flags = IntentFlags::empty();
    flags.set(IntentFlags::MOVE, yaw.is_some());
    flags.set(IntentFlags::JUMP, input.jump);
    flags.set(IntentFlags::PUNCH, input.punch);
    flags.set(IntentFlags::KICK, input.kick);
    Intent { flags, yaw }
}

/// A single bound control: a key or a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Key(KeyCode),
    Mouse(MouseButton),
}

impl Binding {
    /// Parse a keybind identifier, trying keys first and mouse buttons second.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Settings::keycode_from_str(name)
            .map(Binding::Key)
            .or_else(|| Settings::mouse_button_from_str(name).map(Binding::Mouse))
    }

    #[must_use]
    pub fn pressed(self, keys: &ButtonInput<KeyCode>, mouse: &ButtonInput<MouseButton>) -> bool {
        match self {
            Binding::Key(k) => keys.pressed(k),
            Binding::Mouse(b) => mouse.pressed(b),
        }
    }
}

/// Controls resolved from `ControlsSettings`, with built-in fallbacks for
/// missing or unparsable entries.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct InputBindings {
    pub forward: Binding,
    pub back: Binding,
    pub left: Binding,
    pub right: Binding,
    pub jump: Binding,
    pub punch: Binding,
    pub kick: Binding,
    pub wheel_moves: bool,
}

impl InputBindings {
    #[must_use]
    pub fn from_settings(controls: &ControlsSettings) -> Self {
        let map = |name: &str, default: Binding| {
            controls
                .keybinds
                .get(name)
                .and_then(|s| Binding::parse(s))
                .unwrap_or(default)
        };

        Self {
            forward: map("forward", Binding::Key(KeyCode::KeyW)),
            back: map("back", Binding::Key(KeyCode::KeyS)),
            left: map("left", Binding::Key(KeyCode::KeyA)),
            right: map("right", Binding::Key(KeyCode::KeyD)),
            jump: map("jump", Binding::Key(KeyCode::Space)),
            punch: map("punch", Binding::Mouse(MouseButton::Left)),
            kick: map("kick", Binding::Mouse(MouseButton::Right)),
            wheel_moves: controls.wheel_moves,
        }
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_settings(&ControlsSettings::default())
    }
}

/// Poll bevy's input state into an `InputSnapshot`.
///
/// # Arguments
/// * `keys`, `mouse` - button state for this frame
/// * `wheel_y` - summed vertical wheel motion this frame; positive is "up"
/// * `bindings` - resolved controls
#[must_use]
pub fn sample_input(
    keys: &ButtonInput<KeyCode>,
    mouse: &ButtonInput<MouseButton>,
    wheel_y: f32,
    bindings: &InputBindings,
) -> InputSnapshot {
    let mut directions = DirectionKeys::empty();
    let wheel_up = bindings.wheel_moves && wheel_y > 0.0;
    let wheel_down = bindings.wheel_moves && wheel_y < 0.0;

    directions.set(DirectionKeys::FORWARD, bindings.forward.pressed(keys, mouse) || wheel_up);
    directions.set(DirectionKeys::BACK, bindings.back.pressed(keys, mouse) || wheel_down);
    directions.set(DirectionKeys::LEFT, bindings.left.pressed(keys, mouse));
    directions.set(DirectionKeys::RIGHT, bindings.right.pressed(keys, mouse));

    InputSnapshot {
        directions,
        jump: bindings.jump.pressed(keys, mouse),
        punch: bindings.punch.pressed(keys, mouse),
        kick: bindings.kick.pressed(keys, mouse),
    }
}

/// Sum the vertical wheel motion of this frame's events.
pub fn wheel_delta(events: &mut EventReader<MouseWheel>) -> f32 {
    events.read().map(|ev| ev.y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn keys(list: &[DirectionKeys]) -> DirectionKeys {
        list.iter().fold(DirectionKeys::empty(), |acc, k| acc | *k)
    }

    #[test]
    fn eight_way_table() {
        use DirectionKeys as K;
        let cases: [(DirectionKeys, f32); 8] = [
            (keys(&[K::FORWARD]), -1.5708),
            (keys(&[K::BACK]), 1.5708),
            (keys(&[K::LEFT]), 0.0),
            (keys(&[K::RIGHT]), 3.1416),
            (keys(&[K::FORWARD, K::LEFT]), -0.7854),
            (keys(&[K::FORWARD, K::RIGHT]), 3.9270),
            (keys(&[K::BACK, K::LEFT]), 0.7854),
            (keys(&[K::BACK, K::RIGHT]), 2.3562),
        ];
        for (mask, expected) in cases {
            let yaw = facing_yaw(mask).expect("direction resolves");
            assert_abs_diff_eq!(yaw, expected);
        }
    }

    #[test]
    fn opposing_keys_cancel() {
        use DirectionKeys as K;
        assert_eq!(facing_yaw(K::empty()), None);
        assert_eq!(facing_yaw(K::FORWARD | K::BACK), None);
        assert_eq!(facing_yaw(K::LEFT | K::RIGHT), None);
        assert_eq!(facing_yaw(K::all()), None);
        // the surviving axis still steers
        assert_eq!(facing_yaw(K::FORWARD | K::BACK | K::LEFT), Some(0.0));
        assert_eq!(facing_yaw(K::LEFT | K::RIGHT | K::BACK), Some(1.5708));
    }

    #[test]
    fn intent_flags_follow_snapshot() {
        let idle = resolve_intent(&InputSnapshot::default());
        assert_eq!(idle.flags, IntentFlags::empty());
        assert_eq!(idle.yaw, None);

        let snapshot = InputSnapshot {
            directions: DirectionKeys::RIGHT,
            jump: true,
            punch: false,
            kick: true,
        };
        let intent = resolve_intent(&snapshot);
        assert_eq!(intent.flags, IntentFlags::MOVE | IntentFlags::JUMP | IntentFlags::KICK);
        assert_eq!(intent.yaw, Some(3.1416));

        let cancelled = InputSnapshot {
            directions: DirectionKeys::FORWARD | DirectionKeys::BACK,
            ..InputSnapshot::default()
        };
        assert!(!resolve_intent(&cancelled).flags.contains(IntentFlags::MOVE));
    }

    #[test]
    fn sampling_uses_bindings_and_wheel() {
        let bindings = InputBindings::default();
        let mut keys = ButtonInput::<KeyCode>::default();
        let mut mouse = ButtonInput::<MouseButton>::default();
        keys.press(KeyCode::KeyA);
        keys.press(KeyCode::Space);
        mouse.press(MouseButton::Left);

        let snap = sample_input(&keys, &mouse, 1.0, &bindings);
        assert_eq!(snap.directions, DirectionKeys::LEFT | DirectionKeys::FORWARD);
        assert!(snap.jump);
        assert!(snap.punch);
        assert!(!snap.kick);

        let no_wheel = InputBindings { wheel_moves: false, ..bindings };
        let snap = sample_input(&keys, &mouse, -1.0, &no_wheel);
        assert_eq!(snap.directions, DirectionKeys::LEFT);
    }

    #[test]
    fn bindings_fall_back_on_bad_names() {
        let mut controls = ControlsSettings::default();
        controls.keybinds.insert("jump".into(), "NotAKey".into());
        controls.keybinds.insert("kick".into(), "K".into());
        controls.keybinds.remove("forward");

        let b = InputBindings::from_settings(&controls);
        assert_eq!(b.jump, Binding::Key(KeyCode::Space));
        assert_eq!(b.kick, Binding::Key(KeyCode::KeyK));
        assert_eq!(b.forward, Binding::Key(KeyCode::KeyW));
    }
}
