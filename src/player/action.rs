//! Action state machine: idle, move, jump, jump-kick, punch and kick.
//!
//! The transition function is a pure table over `ActionInput`; the
//! surrounding `ActionStateMachine` evaluates it once per frame and plays
//! the entry clip of a state exactly once, on the frame it is entered.

use crate::player::animation::{AnimationBindings, AnimationDriver, ClipName, ClipRequest};
use crate::player::movement::IntentFlags;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionState {
    /// Before the first update.
    #[default]
    None,
    Idle,
    Move,
    Jump,
    JumpKick,
    Punch,
    Kick,
}

/// Everything a transition may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionInput {
    pub on_ground: bool,
    pub intent: IntentFlags,
    /// The current one-shot clip has played to its end.
    pub animation_finished: bool,
}

impl ActionState {
    pub const ALL: [ActionState; 7] = [
        ActionState::None,
        ActionState::Idle,
        ActionState::Move,
        ActionState::Jump,
        ActionState::JumpKick,
        ActionState::Punch,
        ActionState::Kick,
    ];

    /// State for the next frame. Total: every pair not listed self-loops.
    #[must_use]
    pub fn next(self, input: &ActionInput) -> ActionState {
        use ActionState::*;

        let moving = input.intent.contains(IntentFlags::MOVE);
        let punch = input.intent.contains(IntentFlags::PUNCH);
        let kick = input.intent.contains(IntentFlags::KICK);

        match self {
            None => Idle,
            Idle | Move if !input.on_ground => Jump,
            Idle if moving => Move,
            Move if !moving => Idle,
            Idle | Move if punch => Punch,
            Idle | Move if kick => Kick,
            Jump | JumpKick if input.on_ground => Idle,
            Jump if punch || kick => JumpKick,
            Punch | Kick if input.animation_finished => Idle,
            s => s,
        }
    }

    /// Clip played when the state is entered.
    #[must_use]
    pub fn entry_clip(self) -> Option<ClipRequest> {
        let req = match self {
            ActionState::None => return Option::None,
            ActionState::Idle => ClipRequest::new(ClipName::Idle).looping().speed(0.3),
            ActionState::Move => ClipRequest::new(ClipName::Walk).looping(),
            ActionState::Jump => ClipRequest::new(ClipName::Jump),
            ActionState::JumpKick => ClipRequest::new(ClipName::JumpKick),
            ActionState::Punch => ClipRequest::new(ClipName::Punch).trim(0.5, 1.0),
            ActionState::Kick => ClipRequest::new(ClipName::Kick),
        };
        Some(req)
    }

    /// Intents the player may act on while in this state. Attacks lock out
    /// movement and jumping until they finish; a jump cannot be chained.
    #[must_use]
    pub fn allowed(self) -> IntentFlags {
        match self {
            ActionState::Idle | ActionState::Move => IntentFlags::all(),
            ActionState::Jump => IntentFlags::all().difference(IntentFlags::JUMP),
            ActionState::None | ActionState::JumpKick | ActionState::Punch | ActionState::Kick => {
                IntentFlags::empty()
            }
        }
    }

    #[must_use]
    pub fn allows(self, intent: IntentFlags) -> bool {
        self.allowed().contains(intent)
    }

    /// Whether directional input may change the facing.
    #[must_use]
    pub fn can_turn(self) -> bool {
        matches!(self, ActionState::Idle | ActionState::Move | ActionState::Jump)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ActionState::None => "none",
            ActionState::Idle => "idle",
            ActionState::Move => "move",
            ActionState::Jump => "jump",
            ActionState::JumpKick => "jump_kick",
            ActionState::Punch => "punch",
            ActionState::Kick => "kick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ActionState,
    pub to: ActionState,
}

/// Owns the current `ActionState` and runs entry actions.
#[derive(Debug, Clone, Default)]
pub struct ActionStateMachine {
    state: ActionState,
    transitions: u64,
}

impl ActionStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in `state` without running its entry action.
    #[must_use]
    pub fn starting_in(state: ActionState) -> Self {
        Self { state, transitions: 0 }
    }

    #[must_use]
    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Number of transitions taken so far.
    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Evaluate one frame. On a transition the new state's clip is handed
    /// to `driver`; self-loop frames touch nothing.
    pub fn update(
        &mut self,
        on_ground: bool,
        intent: IntentFlags,
        driver: &mut impl AnimationDriver,
        bindings: &AnimationBindings,
    ) -> Option<Transition> {
        let input = ActionInput {
            on_ground,
            intent,
            animation_finished: driver.is_finished(),
        };

        let next = self.state.next(&input);
        if next == self.state {
            return None;
        }

        let transition = Transition { from: self.state, to: next };
        self.state = next;
        self.transitions += 1;
        debug!("action {} -> {}", transition.from.label(), transition.to.label());

        if let Some(req) = next.entry_clip() {
            driver.play(bindings.get(req.clip), &req);
        }
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::animation::ClipInfo;
    use crate::settings::AnimationSettings;

    #[derive(Default)]
    struct Recorder {
        played: Vec<ClipRequest>,
        finished: bool,
    }

    impl AnimationDriver for Recorder {
        fn play(&mut self, _clip: &ClipInfo, request: &ClipRequest) {
            self.played.push(*request);
            self.finished = false;
        }

        fn is_finished(&self) -> bool {
            self.finished
        }
    }

    fn bindings() -> AnimationBindings {
        AnimationBindings::from_settings(&AnimationSettings::default()).expect("defaults bind")
    }

    fn every_input() -> Vec<ActionInput> {
        let mut out = Vec::new();
        for bits in 0..16u8 {
            for on_ground in [false, true] {
                for animation_finished in [false, true] {
                    out.push(ActionInput {
                        on_ground,
                        intent: IntentFlags::from_bits_truncate(bits),
                        animation_finished,
                    });
                }
            }
        }
        out
    }

    #[test]
    fn transition_table_is_total_and_deterministic() {
        for state in ActionState::ALL {
            for input in every_input() {
                let a = state.next(&input);
                let b = state.next(&input);
                assert_eq!(a, b);
                assert!(ActionState::ALL.contains(&a));
                assert_ne!(a, ActionState::None);
            }
        }
    }

    #[test]
    fn table_rows() {
        use ActionState::*;
        let ground = |intent| ActionInput { on_ground: true, intent, animation_finished: false };
        let air = |intent| ActionInput { on_ground: false, intent, animation_finished: false };
        let none = IntentFlags::empty();

        assert_eq!(None.next(&air(none)), Idle);

        assert_eq!(Idle.next(&air(IntentFlags::MOVE)), Jump);
        assert_eq!(Idle.next(&ground(IntentFlags::MOVE | IntentFlags::PUNCH)), Move);
        assert_eq!(Idle.next(&ground(IntentFlags::PUNCH | IntentFlags::KICK)), Punch);
        assert_eq!(Idle.next(&ground(IntentFlags::KICK)), Kick);
        assert_eq!(Idle.next(&ground(IntentFlags::JUMP)), Idle);

        assert_eq!(Move.next(&air(IntentFlags::MOVE)), Jump);
        assert_eq!(Move.next(&ground(IntentFlags::PUNCH)), Idle);
        assert_eq!(Move.next(&ground(IntentFlags::MOVE | IntentFlags::PUNCH)), Punch);
        assert_eq!(Move.next(&ground(IntentFlags::MOVE | IntentFlags::KICK)), Kick);
        assert_eq!(Move.next(&ground(IntentFlags::MOVE)), Move);

        assert_eq!(Jump.next(&ground(IntentFlags::KICK)), Idle);
        assert_eq!(Jump.next(&air(IntentFlags::PUNCH)), JumpKick);
        assert_eq!(Jump.next(&air(IntentFlags::KICK)), JumpKick);
        assert_eq!(Jump.next(&air(IntentFlags::MOVE)), Jump);

        assert_eq!(JumpKick.next(&air(IntentFlags::PUNCH)), JumpKick);
        assert_eq!(JumpKick.next(&ground(none)), Idle);

        // attacks ignore ground and intent until the clip ends
        assert_eq!(Punch.next(&air(IntentFlags::MOVE)), Punch);
        assert_eq!(Kick.next(&ground(IntentFlags::all())), Kick);
        let done = ActionInput { animation_finished: true, ..air(none) };
        assert_eq!(Punch.next(&done), Idle);
        assert_eq!(Kick.next(&done), Idle);
    }

    #[test]
    fn capabilities_per_state() {
        use ActionState::*;
        for s in [Idle, Move] {
            assert!(s.allows(IntentFlags::all()));
            assert!(s.can_turn());
        }

        assert!(Jump.allows(IntentFlags::MOVE | IntentFlags::PUNCH | IntentFlags::KICK));
        assert!(!Jump.allows(IntentFlags::JUMP));
        assert!(Jump.can_turn());

        for s in [None, JumpKick, Punch, Kick] {
            assert_eq!(s.allowed(), IntentFlags::empty());
            assert!(!s.allows(IntentFlags::MOVE));
            assert!(!s.can_turn());
        }
    }

    #[test]
    fn entry_clip_plays_once_per_transition() {
        let b = bindings();
        let mut driver = Recorder::default();
        let mut sm = ActionStateMachine::new();

        let t = sm.update(true, IntentFlags::empty(), &mut driver, &b);
        assert_eq!(t, Some(Transition { from: ActionState::None, to: ActionState::Idle }));
        for _ in 0..5 {
            assert_eq!(sm.update(true, IntentFlags::empty(), &mut driver, &b), None);
        }
        assert_eq!(driver.played.len(), 1);
        assert_eq!(driver.played[0].clip, ClipName::Idle);
        assert!(driver.played[0].looping);

        sm.update(true, IntentFlags::MOVE, &mut driver, &b);
        sm.update(true, IntentFlags::MOVE, &mut driver, &b);
        assert_eq!(driver.played.len(), 2);
        assert_eq!(driver.played[1].clip, ClipName::Walk);
        assert_eq!(sm.transitions(), 2);
    }

    #[test]
    fn punch_holds_until_finished() {
        let b = bindings();
        let mut driver = Recorder::default();
        let mut sm = ActionStateMachine::starting_in(ActionState::Idle);

        sm.update(true, IntentFlags::PUNCH, &mut driver, &b);
        assert_eq!(sm.state(), ActionState::Punch);
        let punch = driver.played[0];
        assert_eq!((punch.start, punch.end), (Some(0.5), Some(1.0)));

        for _ in 0..10 {
            assert_eq!(sm.update(true, IntentFlags::MOVE, &mut driver, &b), None);
            assert_eq!(sm.state(), ActionState::Punch);
        }

        driver.finished = true;
        let t = sm.update(true, IntentFlags::empty(), &mut driver, &b);
        assert_eq!(t, Some(Transition { from: ActionState::Punch, to: ActionState::Idle }));
        assert_eq!(sm.update(true, IntentFlags::empty(), &mut driver, &b), None);
        assert_eq!(driver.played.len(), 2);
    }
}
