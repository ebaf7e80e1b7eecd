//! Frame controller: runs one frame of the player pipeline in fixed order.
//!
//! `PlayerController::update` is host-independent: it takes an
//! `InputSnapshot`, a geometry query and the three output sinks. The bevy
//! side is `GameSession` plus the `drive_player` and `sync_session_settings`
//! systems at the bottom of this file.

use crate::error::ControllerError;
use crate::level::{GeometryQuery, Level};
use crate::player::action::{ActionState, ActionStateMachine, Transition};
use crate::player::animation::{AnimationBindings, AnimationDriver, ClipPlayer};
use crate::player::camera::{CameraRig, CameraSink, FollowCamera, spawn_position, trailing_camera_position};
use crate::player::collision::{Contacts, ResolverParams, resolve};
use crate::player::movement::{InputBindings, Intent, InputSnapshot, resolve_intent, sample_input, wheel_delta};
use crate::player::physics::{PhysicsParams, Proposal, integrate};
use crate::player::{EntityPhysicsState, Player};
use crate::settings::Settings;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

/// Receives the entity's resolved pose.
pub trait TransformSink {
    fn set_position(&mut self, position: Vec3);
    /// Facing yaw in radians; 0 faces +x.
    fn set_yaw(&mut self, yaw: f32);
    fn set_scale(&mut self, scale: f32);
}

impl TransformSink for Transform {
    fn set_position(&mut self, position: Vec3) {
        self.translation = position;
    }

    // bevy turns counter-clockwise seen from above; facing yaw turns +x toward +z
    fn set_yaw(&mut self, yaw: f32) {
        self.rotation = Quat::from_rotation_y(-yaw);
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = Vec3::splat(scale);
    }
}

/// Tuning the controller reads every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerParams {
    pub physics: PhysicsParams,
    pub resolver: ResolverParams,
    pub camera: CameraRig,
    pub scale: f32,
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            physics: PhysicsParams::default(),
            resolver: ResolverParams::default(),
            camera: CameraRig::default(),
            scale: 0.5,
        }
    }
}

impl ControllerParams {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            physics: PhysicsParams::from(&settings.physics),
            resolver: ResolverParams::from(&settings.physics),
            camera: CameraRig::from(&settings.camera),
            scale: settings.player.scale,
        }
    }
}

/// Everything a controller needs from the session, passed in explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub params: ControllerParams,
    pub bindings: AnimationBindings,
}

impl SessionContext {
    /// Validate `settings` and resolve the animation bindings.
    ///
    /// # Errors
    /// `ControllerError::InvalidSetting` for out-of-range tuning and
    /// `ControllerError::MissingAnimation` for an unbound clip.
    pub fn from_settings(settings: &Settings) -> Result<Self, ControllerError> {
        settings.validate()?;
        Ok(Self {
            params: ControllerParams::from_settings(settings),
            bindings: AnimationBindings::from_settings(&settings.animation)?,
        })
    }
}

/// What happened during one `update`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Intent after the current state's capabilities were applied.
    pub intent: Intent,
    /// The integrator's move, before collision.
    pub proposal: Proposal,
    /// Where the entity ended up.
    pub resolved: Vec3,
    pub contacts: Contacts,
    pub transition: Option<Transition>,
}

/// Physics, facing and action state of one controlled entity.
#[derive(Debug, Clone)]
pub struct PlayerController {
    ctx: SessionContext,
    physics: EntityPhysicsState,
    yaw: f32,
    actions: ActionStateMachine,
}

impl PlayerController {
    /// Controller for an entity at `spawn`, airborne and in `ActionState::None`.
    #[must_use]
    pub fn new(ctx: SessionContext, spawn: Vec3) -> Self {
        Self {
            ctx,
            physics: EntityPhysicsState::spawn_at(spawn),
            yaw: 0.0,
            actions: ActionStateMachine::new(),
        }
    }

    /// Controller spawned in front of the main camera.
    #[must_use]
    pub fn in_front_of_camera(ctx: SessionContext, camera_pos: Vec3, camera_forward: Vec3) -> Self {
        let spawn = spawn_position(camera_pos, camera_forward, &ctx.params.camera);
        Self::new(ctx, spawn)
    }

    /// Write the initial pose: position, facing and scale.
    pub fn place(&self, transform: &mut impl TransformSink) {
        transform.set_position(self.physics.position);
        transform.set_yaw(self.yaw);
        transform.set_scale(self.ctx.params.scale);
    }

    /// Run one frame.
    ///
    /// Returns `None` and leaves every piece of state untouched when
    /// `delta` is not a positive finite number.
    pub fn update<G>(
        &mut self,
        delta: f32,
        input: &InputSnapshot,
        geometry: &G,
        driver: &mut impl AnimationDriver,
        transform: &mut impl TransformSink,
        camera: &mut impl CameraSink,
    ) -> Option<FrameReport>
    where
        G: GeometryQuery + ?Sized,
    {
        if !(delta.is_finite() && delta > 0.0) {
            debug!("skipping player update with delta {delta}");
            return None;
        }
        let params = self.ctx.params;

        // the state at the start of the frame gates what the input may do
        let state = self.actions.state();
        let mut intent = resolve_intent(input);
        intent.flags &= state.allowed();
        if !state.can_turn() {
            intent.yaw = None;
        }
        if let Some(yaw) = intent.yaw {
            self.yaw = yaw;
        }

        let proposal = integrate(&mut self.physics, intent.flags, self.yaw, delta, &params.physics);

        let mut resolved = proposal.new_position;
        let mut displacement = proposal.displacement;
        let contacts = resolve(
            proposal.old_position,
            &mut resolved,
            &mut displacement,
            geometry.bounding_boxes(),
            &params.resolver,
        );

        self.physics.position = resolved;
        self.physics.on_ground = contacts.on_ground;
        if contacts.on_ground {
            self.physics.velocity.y = 0.0;
        }

        let transition = self
            .actions
            .update(contacts.on_ground, intent.flags, driver, &self.ctx.bindings);

        transform.set_position(resolved);
        transform.set_yaw(self.yaw);
        camera.follow(trailing_camera_position(resolved, &params.camera));

        Some(FrameReport {
            intent,
            proposal,
            resolved,
            contacts,
            transition,
        })
    }

    /// Swap in new tuning; state is kept.
    pub fn apply_params(&mut self, params: ControllerParams) {
        self.ctx.params = params;
    }

    /// Swap in new animation bindings; the playing clip is left alone.
    pub fn set_bindings(&mut self, bindings: AnimationBindings) {
        self.ctx.bindings = bindings;
    }

    #[must_use]
    pub fn physics(&self) -> &EntityPhysicsState {
        &self.physics
    }

    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[must_use]
    pub fn action(&self) -> ActionState {
        self.actions.state()
    }

    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.actions.transitions()
    }

    #[must_use]
    pub fn params(&self) -> &ControllerParams {
        &self.ctx.params
    }
}

/// The running session: the one controlled player plus what the debug
/// tooling reads back.
#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    pub controller: PlayerController,
    pub last_report: Option<FrameReport>,
    pub frames: u64,
}

impl GameSession {
    #[must_use]
    pub fn new(controller: PlayerController) -> Self {
        Self {
            controller,
            last_report: None,
            frames: 0,
        }
    }
}

/// Sample input and step the controller once, writing the player and
/// camera transforms.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
pub fn drive_player(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut wheel: EventReader<MouseWheel>,
    bindings: Res<InputBindings>,
    level: Res<Level>,
    mut session: ResMut<GameSession>,
    mut players: Query<(&mut Transform, &mut ClipPlayer), (With<Player>, Without<FollowCamera>)>,
    mut cameras: Query<&mut Transform, (With<FollowCamera>, Without<Player>)>,
) {
    let input = sample_input(&keys, &mouse, wheel_delta(&mut wheel), &bindings);

    let Ok((mut player_tf, mut clips)) = players.get_single_mut() else { return };
    let Ok(mut camera_tf) = cameras.get_single_mut() else { return };

    let session = &mut *session;
    let report = session.controller.update(
        time.delta_seconds(),
        &input,
        &*level,
        &mut *clips,
        &mut *player_tf,
        &mut *camera_tf,
    );
    if report.is_some() {
        session.frames += 1;
        session.last_report = report;
    }
}

/// Push reloaded settings into the running session and the input bindings.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_session_settings(
    settings: Res<Settings>,
    mut session: ResMut<GameSession>,
    mut bindings: ResMut<InputBindings>,
    mut players: Query<&mut Transform, With<Player>>,
) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }

    let params = ControllerParams::from_settings(&settings);
    session.controller.apply_params(params);
    *bindings = InputBindings::from_settings(&settings.controls);

    match AnimationBindings::from_settings(&settings.animation) {
        Ok(clips) => session.controller.set_bindings(clips),
        Err(e) => warn!("keeping previous animation bindings: {e}"),
    }

    for mut tf in &mut players {
        tf.set_scale(params.scale);
    }
    info!("player settings applied");
}
