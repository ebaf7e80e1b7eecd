//! Animation clips: logical names, bindings and a timeline-only player.
//!
//! The action state machine only ever names clips through `ClipName`; the
//! `AnimationBindings` built at startup resolve every name to a `ClipInfo`,
//! so a missing clip is a setup error and never a mid-game surprise.
//! `ClipPlayer` is the host's `AnimationDriver`: it tracks playback time and
//! completion without any skeletal data.

use crate::error::ControllerError;
use crate::settings::AnimationSettings;
use bevy::prelude::*;

/// Logical clip names the action states play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipName {
    Idle,
    Walk,
    Jump,
    JumpKick,
    Punch,
    Kick,
}

impl ClipName {
    pub const ALL: [ClipName; 6] = [
        ClipName::Idle,
        ClipName::Walk,
        ClipName::Jump,
        ClipName::JumpKick,
        ClipName::Punch,
        ClipName::Kick,
    ];

    /// Key used in `settings.animation.clips`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ClipName::Idle => "idle",
            ClipName::Walk => "walk",
            ClipName::Jump => "jump",
            ClipName::JumpKick => "jump_kick",
            ClipName::Punch => "punch",
            ClipName::Kick => "kick",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// How a state wants its clip played.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRequest {
    pub clip: ClipName,
    pub looping: bool,
    pub speed: f32,
    /// Trim start in seconds; `None` plays from 0.
    pub start: Option<f32>,
    /// Trim end in seconds; `None` plays to the clip's end.
    pub end: Option<f32>,
    /// Cross-fade time from the previous clip, in seconds.
    pub blend: f32,
}

impl ClipRequest {
    #[must_use]
    pub const fn new(clip: ClipName) -> Self {
        Self {
            clip,
            looping: false,
            speed: 1.0,
            start: None,
            end: None,
            blend: 0.1,
        }
    }

    #[must_use]
    pub const fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    #[must_use]
    pub const fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub const fn trim(mut self, start: f32, end: f32) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }
}

/// A loaded clip the bindings resolve to.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    pub name: String,
    /// Length at speed 1.0, seconds.
    pub duration: f32,
}

/// Plays clips for the controlled entity.
pub trait AnimationDriver {
    /// Start `clip` as described by `request`, replacing whatever was playing.
    fn play(&mut self, clip: &ClipInfo, request: &ClipRequest);

    /// Whether the current non-looping clip has reached its end.
    fn is_finished(&self) -> bool;
}

/// Every `ClipName` resolved to a clip. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationBindings {
    clips: [ClipInfo; 6],
}

impl AnimationBindings {
    /// Resolve all logical clips from the animation settings.
    ///
    /// # Errors
    /// `ControllerError::MissingAnimation` naming the first clip without a
    /// binding.
    pub fn from_settings(settings: &AnimationSettings) -> Result<Self, ControllerError> {
        Self::from_lookup(|name| settings.clips.get(name).map(|c| c.duration))
    }

    /// Resolve all logical clips through `lookup`, which maps a clip key to
    /// its duration.
    ///
    /// # Errors
    /// `ControllerError::MissingAnimation` naming the first unresolved clip.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<f32>) -> Result<Self, ControllerError> {
        let resolve = |clip: ClipName| {
            let name = clip.as_str();
            lookup(name)
                .map(|duration| ClipInfo { name: name.to_string(), duration })
                .ok_or_else(|| ControllerError::MissingAnimation(name.to_string()))
        };

        Ok(Self {
            clips: [
                resolve(ClipName::Idle)?,
                resolve(ClipName::Walk)?,
                resolve(ClipName::Jump)?,
                resolve(ClipName::JumpKick)?,
                resolve(ClipName::Punch)?,
                resolve(ClipName::Kick)?,
            ],
        })
    }

    #[must_use]
    pub fn get(&self, clip: ClipName) -> &ClipInfo {
        &self.clips[clip.index()]
    }
}

/// Timeline-only clip playback attached to the player entity.
#[derive(Component, Debug, Clone, Default)]
pub struct ClipPlayer {
    pub current: Option<(ClipInfo, ClipRequest)>,
    /// Playback position within the clip, seconds.
    pub time: f32,
    pub finished: bool,
    blend_left: f32,
}

impl ClipPlayer {
    /// Advance playback by `dt` seconds of wall time.
    pub fn tick(&mut self, dt: f32) {
        let Some((clip, req)) = &self.current else { return };
        self.blend_left = (self.blend_left - dt).max(0.0);
        if self.finished {
            return;
        }

        let start = req.start.unwrap_or(0.0);
        let end = req.end.unwrap_or(clip.duration).max(start);
        self.time += dt * req.speed;

        if self.time >= end {
            let span = end - start;
            if req.looping && span > 0.0 {
                self.time = start + (self.time - start) % span;
            } else {
                self.time = end;
                self.finished = true;
            }
        }
    }

    /// Weight of the current clip against the one it replaced, 0..=1.
    #[must_use]
    pub fn blend_weight(&self) -> f32 {
        match &self.current {
            Some((_, req)) if req.blend > 0.0 => 1.0 - self.blend_left / req.blend,
            _ => 1.0,
        }
    }

    #[must_use]
    pub fn clip_name(&self) -> Option<&str> {
        self.current.as_ref().map(|(clip, _)| clip.name.as_str())
    }
}

impl AnimationDriver for ClipPlayer {
    fn play(&mut self, clip: &ClipInfo, request: &ClipRequest) {
        self.time = request.start.unwrap_or(0.0);
        self.finished = false;
        self.blend_left = request.blend;
        self.current = Some((clip.clone(), *request));
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Advance every `ClipPlayer` by the frame time.
#[allow(clippy::needless_pass_by_value)]
pub fn advance_clips(time: Res<Time>, mut players: Query<&mut ClipPlayer>) {
    let dt = time.delta_seconds();
    for mut player in &mut players {
        player.tick(dt);
    }
}
