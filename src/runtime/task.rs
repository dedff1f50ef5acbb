//! Behavior commands
//!
//! [`TaskIssuer`] has one method per command the host scheduler understands.
//! Every method validates its arguments first and fails with
//! [`ArgumentError`] without touching the host. A successful call issues the
//! command and returns immediately; the actor carries it out over the
//! following frames, replacing whatever it was doing in the same task slot.
//! Use [`TaskStatus`](super::status::TaskStatus) to find out how it went.
//!
//! An issuer obtained from [`TaskSequence::tasks`](super::sequence::TaskSequence::tasks)
//! records into that sequence instead of driving an actor.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::ops::BitOr;
use std::time::{Duration, Instant};

use super::ScriptContext;
use super::error::{ArgumentError, ArgumentResult, Result};
use super::handle::{ActorRef, Vec3, VehicleRef};
use super::native::{NativeArg, NativeHash, joaat};
use super::sequence::TaskSequence;

/// Most points a point route can hold
pub const MAX_ROUTE_POINTS: usize = 8;

/// Seat in a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleSeat(pub i32);

impl VehicleSeat {
    /// First free seat; only valid when entering normally
    pub const ANY: VehicleSeat = VehicleSeat(-2);
    pub const DRIVER: VehicleSeat = VehicleSeat(-1);
    pub const PASSENGER: VehicleSeat = VehicleSeat(0);
    pub const LEFT_REAR: VehicleSeat = VehicleSeat(1);
    pub const RIGHT_REAR: VehicleSeat = VehicleSeat(2);
    /// Highest seat index the host accepts
    pub const MAX: VehicleSeat = VehicleSeat(15);
}

/// Playback options for animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AnimationFlags(pub u32);

impl AnimationFlags {
    pub const NONE: AnimationFlags = AnimationFlags(0);
    pub const LOOP: AnimationFlags = AnimationFlags(1);
    pub const STAY_IN_END_FRAME: AnimationFlags = AnimationFlags(2);
    pub const UPPER_BODY: AnimationFlags = AnimationFlags(16);
    /// Play in the secondary task slot so the primary task keeps running
    pub const SECONDARY: AnimationFlags = AnimationFlags(32);
    pub const ALLOW_ROTATION: AnimationFlags = AnimationFlags(256);

    /// Whether every bit of `other` is set
    pub fn contains(self, other: AnimationFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AnimationFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        AnimationFlags(self.0 | rhs.0)
    }
}

/// How an actor exits a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LeaveVehicleFlags(pub i32);

impl LeaveVehicleFlags {
    pub const NONE: LeaveVehicleFlags = LeaveVehicleFlags(0);
    pub const WARP_OUT: LeaveVehicleFlags = LeaveVehicleFlags(16);
    pub const LEAVE_DOOR_OPEN: LeaveVehicleFlags = LeaveVehicleFlags(256);
    pub const BAIL_OUT: LeaveVehicleFlags = LeaveVehicleFlags(4096);
}

impl BitOr for LeaveVehicleFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        LeaveVehicleFlags(self.0 | rhs.0)
    }
}

/// How an actor enters a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EnterVehicleFlags(pub i32);

impl EnterVehicleFlags {
    pub const NONE: EnterVehicleFlags = EnterVehicleFlags(0);
    pub const WARP_TO_DOOR: EnterVehicleFlags = EnterVehicleFlags(2);
    pub const JACK_ANYONE: EnterVehicleFlags = EnterVehicleFlags(8);
    pub const WARP_IN: EnterVehicleFlags = EnterVehicleFlags(16);
}

impl BitOr for EnterVehicleFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        EnterVehicleFlags(self.0 | rhs.0)
    }
}

/// Driving behavior bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrivingStyle(pub i32);

impl DrivingStyle {
    pub const NORMAL: DrivingStyle = DrivingStyle(786_603);
    pub const AVOID_TRAFFIC: DrivingStyle = DrivingStyle(786_468);
    pub const RUSHED: DrivingStyle = DrivingStyle(1_074_528_293);
    pub const IGNORE_LIGHTS: DrivingStyle = DrivingStyle(2_883_621);
}

impl Default for DrivingStyle {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Weapon firing pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FiringPattern(pub u32);

impl FiringPattern {
    pub const DEFAULT: FiringPattern = FiringPattern(joaat("FIRING_PATTERN_DEFAULT"));
    pub const FULL_AUTO: FiringPattern = FiringPattern(joaat("FIRING_PATTERN_FULL_AUTO"));
    pub const BURST_FIRE: FiringPattern = FiringPattern(joaat("FIRING_PATTERN_BURST_FIRE"));
    pub const SINGLE_SHOT: FiringPattern = FiringPattern(joaat("FIRING_PATTERN_SINGLE_SHOT"));
}

impl Default for FiringPattern {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters of [`TaskIssuer::play_animation`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationOptions {
    pub blend_in_speed: f32,
    pub blend_out_speed: f32,
    /// Milliseconds, `-1` to play the clip's natural length
    pub duration_ms: i32,
    pub flags: AnimationFlags,
    /// Start phase, `0.0..=1.0`
    pub start_phase: f32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            blend_in_speed: 8.0,
            blend_out_speed: -8.0,
            duration_ms: -1,
            flags: AnimationFlags::NONE,
            start_phase: 0.0,
        }
    }
}

fn require_actor(actor: ActorRef, what: &'static str) -> ArgumentResult<()> {
    if actor.is_null() {
        Err(ArgumentError::MissingReference(what))
    } else {
        Ok(())
    }
}

fn require_vehicle(vehicle: VehicleRef) -> ArgumentResult<()> {
    if vehicle.is_null() {
        Err(ArgumentError::MissingReference("vehicle"))
    } else {
        Ok(())
    }
}

fn require_finite(value: f32, what: &'static str) -> ArgumentResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ArgumentError::InvalidValue {
            what,
            detail: format!("{} is not finite", value),
        })
    }
}

fn require_position(position: Vec3, what: &'static str) -> ArgumentResult<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(ArgumentError::InvalidValue {
            what,
            detail: format!("{} is not finite", position),
        })
    }
}

fn require_positive(value: f32, what: &'static str) -> ArgumentResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ArgumentError::InvalidValue {
            what,
            detail: format!("{} must be positive", value),
        })
    }
}

fn require_non_negative(value: f32, what: &'static str) -> ArgumentResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ArgumentError::InvalidValue {
            what,
            detail: format!("{} must not be negative", value),
        })
    }
}

/// Durations are milliseconds, `-1` meaning "until replaced"
fn require_duration(duration_ms: i32, what: &'static str) -> ArgumentResult<()> {
    if duration_ms >= -1 {
        Ok(())
    } else {
        Err(ArgumentError::InvalidValue {
            what,
            detail: format!("{} ms (use -1 for no limit)", duration_ms),
        })
    }
}

fn require_non_empty(value: &str, what: &'static str) -> ArgumentResult<()> {
    if value.trim().is_empty() {
        Err(ArgumentError::Empty(what))
    } else {
        Ok(())
    }
}

fn require_seat(seat: VehicleSeat, min: VehicleSeat) -> ArgumentResult<()> {
    if seat.0 < min.0 || seat.0 > VehicleSeat::MAX.0 {
        Err(ArgumentError::IndexOutOfRange {
            what: "seat",
            index: seat.0 as i64,
            min: min.0 as i64,
            max: VehicleSeat::MAX.0 as i64,
        })
    } else {
        Ok(())
    }
}

fn position_args(position: Vec3) -> [NativeArg; 3] {
    [position.x.into(), position.y.into(), position.z.into()]
}

/// Issues commands to one actor, or records them into an open sequence
pub struct TaskIssuer<'a> {
    ctx: &'a ScriptContext,
    target: ActorRef,
    recorded: Option<&'a Cell<usize>>,
}

impl<'a> TaskIssuer<'a> {
    pub(crate) fn for_actor(ctx: &'a ScriptContext, target: ActorRef) -> Self {
        Self {
            ctx,
            target,
            recorded: None,
        }
    }

    /// Issuer bound to the sentinel handle, counting into `recorded`
    pub(crate) fn recording(ctx: &'a ScriptContext, recorded: &'a Cell<usize>) -> Self {
        Self {
            ctx,
            target: ActorRef::SENTINEL,
            recorded: Some(recorded),
        }
    }

    /// The actor commands go to; the sentinel while recording
    pub fn target(&self) -> ActorRef {
        self.target
    }

    /// Whether this issuer records into a sequence
    pub fn is_recording(&self) -> bool {
        self.recorded.is_some()
    }

    /// Refuse to name the commanded actor as its own target
    fn require_other(&self, other: ActorRef, what: &'static str) -> ArgumentResult<()> {
        require_actor(other, what)?;
        if !self.target.is_null() && other == self.target {
            return Err(ArgumentError::InvalidValue {
                what,
                detail: format!("{} cannot target itself", self.target),
            });
        }
        Ok(())
    }

    /// Bind a command to the target and send it
    fn issue(&self, hash: NativeHash, rest: &[NativeArg]) -> Result<()> {
        let mut args = Vec::with_capacity(rest.len() + 1);
        args.push(self.target.into());
        args.extend_from_slice(rest);
        self.ctx.invoke(hash, &args)?;

        if let Some(recorded) = self.recorded {
            recorded.set(recorded.get() + 1);
        }
        tracing::debug!(
            actor = %self.target,
            command = ?hash,
            recording = self.is_recording(),
            "task issued"
        );
        Ok(())
    }

    /// Poll `ready` once per host frame until it holds or the configured
    /// deadline passes. Returns whether it held.
    fn wait_until(&self, mut ready: impl FnMut() -> Result<bool>) -> Result<bool> {
        let timeout = Duration::from_millis(self.ctx.config().resource_load_timeout_ms);
        let deadline = Instant::now() + timeout;
        loop {
            if ready()? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            self.ctx.bridge().yield_frame();
        }
    }

    // ------------------------------------------------------------------
    // Standing and waiting

    /// Stand in place for `duration_ms` (`-1`: until replaced)
    pub fn stand_still(&self, duration_ms: i32) -> Result<()> {
        require_duration(duration_ms, "duration_ms")?;
        self.issue(NativeHash::TaskStandStill, &[duration_ms.into()])
    }

    /// Do nothing for `duration_ms`
    pub fn wait(&self, duration_ms: i32) -> Result<()> {
        if duration_ms < 0 {
            return Err(ArgumentError::InvalidValue {
                what: "duration_ms",
                detail: format!("{} ms must not be negative", duration_ms),
            }
            .into());
        }
        self.issue(NativeHash::TaskPause, &[duration_ms.into()])
    }

    /// Guard the current position
    pub fn guard_current_position(&self) -> Result<()> {
        self.issue(
            NativeHash::TaskGuardCurrentPosition,
            &[15.0f32.into(), 10.0f32.into(), true.into()],
        )
    }

    /// Cower for `duration_ms`
    pub fn cower(&self, duration_ms: i32) -> Result<()> {
        require_duration(duration_ms, "duration_ms")?;
        self.issue(NativeHash::TaskCower, &[duration_ms.into()])
    }

    /// Raise hands for `duration_ms`
    pub fn hands_up(&self, duration_ms: i32) -> Result<()> {
        require_duration(duration_ms, "duration_ms")?;
        self.issue(
            NativeHash::TaskHandsUp,
            &[duration_ms.into(), 0.into(), (-1).into(), false.into()],
        )
    }

    // ------------------------------------------------------------------
    // Movement

    /// Walk to `position` along the navigation mesh
    pub fn go_to(&self, position: Vec3) -> Result<()> {
        require_position(position, "position")?;
        self.follow_nav_mesh(position, 1.0)
    }

    /// Run to `position`, optionally in a straight line ignoring the mesh
    pub fn run_to(&self, position: Vec3, ignore_paths: bool) -> Result<()> {
        require_position(position, "position")?;
        if ignore_paths {
            self.go_straight_to(position, 4.0, -1, 0.0, 0.0)
        } else {
            self.follow_nav_mesh(position, 4.0)
        }
    }

    fn follow_nav_mesh(&self, position: Vec3, speed: f32) -> Result<()> {
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskFollowNavMeshToCoord,
            &[
                x,
                y,
                z,
                speed.into(),
                (-1).into(),
                0.0f32.into(),
                0.into(),
                0.0f32.into(),
            ],
        )
    }

    /// Walk to another actor, giving up after `timeout_ms`
    pub fn go_to_entity(&self, target: ActorRef, timeout_ms: i32) -> Result<()> {
        self.require_other(target, "target")?;
        require_duration(timeout_ms, "timeout_ms")?;
        self.issue(
            NativeHash::TaskGoToEntity,
            &[
                target.into(),
                timeout_ms.into(),
                2.0f32.into(),
                1.0f32.into(),
                0.0f32.into(),
                0.into(),
            ],
        )
    }

    /// Move in a straight line to `position`
    pub fn go_straight_to(
        &self,
        position: Vec3,
        speed: f32,
        timeout_ms: i32,
        target_heading: f32,
        distance_to_slide: f32,
    ) -> Result<()> {
        require_position(position, "position")?;
        require_positive(speed, "speed")?;
        require_duration(timeout_ms, "timeout_ms")?;
        require_finite(target_heading, "target_heading")?;
        require_non_negative(distance_to_slide, "distance_to_slide")?;
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskGoStraightToCoord,
            &[
                x,
                y,
                z,
                speed.into(),
                timeout_ms.into(),
                target_heading.into(),
                distance_to_slide.into(),
            ],
        )
    }

    /// Slide to `position`, ending at `heading`
    pub fn slide_to(&self, position: Vec3, heading: f32) -> Result<()> {
        require_position(position, "position")?;
        require_finite(heading, "heading")?;
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskPedSlideToCoord,
            &[x, y, z, heading.into(), 0.7f32.into()],
        )
    }

    /// Follow a route of 1 to [`MAX_ROUTE_POINTS`] points.
    ///
    /// The host builds routes in a shared buffer, so this flushes and extends
    /// it before issuing the follow command.
    pub fn follow_point_route(&self, points: &[Vec3]) -> Result<()> {
        if points.is_empty() {
            return Err(ArgumentError::Empty("points").into());
        }
        if points.len() > MAX_ROUTE_POINTS {
            return Err(ArgumentError::IndexOutOfRange {
                what: "route point",
                index: points.len() as i64 - 1,
                min: 0,
                max: MAX_ROUTE_POINTS as i64 - 1,
            }
            .into());
        }
        for point in points {
            require_position(*point, "points")?;
        }

        self.ctx.invoke(NativeHash::TaskFlushRoute, &[])?;
        for point in points {
            self.ctx
                .invoke(NativeHash::TaskExtendRoute, &position_args(*point))?;
        }
        self.issue(NativeHash::TaskFollowPointRoute, &[1.0f32.into(), 0.into()])
    }

    /// Keep a fixed offset from another actor
    pub fn follow_to_offset_from(
        &self,
        target: ActorRef,
        offset: Vec3,
        speed: f32,
        timeout_ms: i32,
        stopping_range: f32,
        persist: bool,
    ) -> Result<()> {
        self.require_other(target, "target")?;
        require_position(offset, "offset")?;
        require_positive(speed, "speed")?;
        require_duration(timeout_ms, "timeout_ms")?;
        require_non_negative(stopping_range, "stopping_range")?;
        let [x, y, z] = position_args(offset);
        self.issue(
            NativeHash::TaskFollowToOffsetOfEntity,
            &[
                target.into(),
                x,
                y,
                z,
                speed.into(),
                timeout_ms.into(),
                stopping_range.into(),
                persist.into(),
            ],
        )
    }

    /// Wander around the map
    pub fn wander_around(&self) -> Result<()> {
        self.issue(NativeHash::TaskWanderStandard, &[10.0f32.into(), 10.into()])
    }

    /// Wander inside a circle
    pub fn wander_in_area(&self, center: Vec3, radius: f32) -> Result<()> {
        require_position(center, "center")?;
        require_positive(radius, "radius")?;
        let [x, y, z] = position_args(center);
        self.issue(
            NativeHash::TaskWanderInArea,
            &[x, y, z, radius.into(), 0.0f32.into(), 0.0f32.into()],
        )
    }

    /// Jump
    pub fn jump(&self) -> Result<()> {
        self.issue(
            NativeHash::TaskJump,
            &[true.into(), false.into(), false.into()],
        )
    }

    /// Climb the obstacle ahead
    pub fn climb(&self) -> Result<()> {
        self.issue(NativeHash::TaskClimb, &[true.into()])
    }

    /// Climb the nearest ladder
    pub fn climb_ladder(&self) -> Result<()> {
        self.issue(NativeHash::TaskClimbLadder, &[1.into()])
    }

    /// Skydive from the current position
    pub fn sky_dive(&self) -> Result<()> {
        self.issue(NativeHash::TaskSkyDive, &[false.into()])
    }

    /// Steer an open parachute towards `position`
    pub fn parachute_to(&self, position: Vec3) -> Result<()> {
        require_position(position, "position")?;
        self.issue(NativeHash::TaskParachuteToTarget, &position_args(position))
    }

    // ------------------------------------------------------------------
    // Facing and looking

    /// Turn to `heading` degrees
    pub fn achieve_heading(&self, heading: f32, timeout_ms: i32) -> Result<()> {
        require_finite(heading, "heading")?;
        require_duration(timeout_ms, "timeout_ms")?;
        self.issue(
            NativeHash::TaskAchieveHeading,
            &[heading.into(), timeout_ms.into()],
        )
    }

    /// Turn to face another actor
    pub fn turn_to_entity(&self, target: ActorRef, duration_ms: i32) -> Result<()> {
        self.require_other(target, "target")?;
        require_duration(duration_ms, "duration_ms")?;
        self.issue(
            NativeHash::TaskTurnPedToFaceEntity,
            &[target.into(), duration_ms.into()],
        )
    }

    /// Turn to face a position
    pub fn turn_to_coord(&self, position: Vec3, duration_ms: i32) -> Result<()> {
        require_position(position, "position")?;
        require_duration(duration_ms, "duration_ms")?;
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskTurnPedToFaceCoord,
            &[x, y, z, duration_ms.into()],
        )
    }

    /// Look at another actor (secondary task)
    pub fn look_at_entity(&self, target: ActorRef, duration_ms: i32) -> Result<()> {
        self.require_other(target, "target")?;
        require_duration(duration_ms, "duration_ms")?;
        self.issue(
            NativeHash::TaskLookAtEntity,
            &[target.into(), duration_ms.into(), 0.into(), 2.into()],
        )
    }

    /// Look at a position (secondary task)
    pub fn look_at_coord(&self, position: Vec3, duration_ms: i32) -> Result<()> {
        require_position(position, "position")?;
        require_duration(duration_ms, "duration_ms")?;
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskLookAtCoord,
            &[x, y, z, duration_ms.into(), 0.into(), 2.into()],
        )
    }

    // ------------------------------------------------------------------
    // Weapons and combat

    /// Aim at another actor
    pub fn aim_at_entity(&self, target: ActorRef, duration_ms: i32) -> Result<()> {
        self.require_other(target, "target")?;
        require_duration(duration_ms, "duration_ms")?;
        self.issue(
            NativeHash::TaskAimGunAtEntity,
            &[target.into(), duration_ms.into(), false.into()],
        )
    }

    /// Aim at a position
    pub fn aim_at_coord(&self, position: Vec3, duration_ms: i32) -> Result<()> {
        require_position(position, "position")?;
        require_duration(duration_ms, "duration_ms")?;
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskAimGunAtCoord,
            &[x, y, z, duration_ms.into(), false.into(), false.into()],
        )
    }

    /// Shoot at another actor
    pub fn shoot_at_entity(
        &self,
        target: ActorRef,
        duration_ms: i32,
        pattern: FiringPattern,
    ) -> Result<()> {
        self.require_other(target, "target")?;
        require_duration(duration_ms, "duration_ms")?;
        self.issue(
            NativeHash::TaskShootAtEntity,
            &[target.into(), duration_ms.into(), pattern.0.into()],
        )
    }

    /// Shoot at a position
    pub fn shoot_at_coord(
        &self,
        position: Vec3,
        duration_ms: i32,
        pattern: FiringPattern,
    ) -> Result<()> {
        require_position(position, "position")?;
        require_duration(duration_ms, "duration_ms")?;
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskShootAtCoord,
            &[x, y, z, duration_ms.into(), pattern.0.into()],
        )
    }

    /// Reload the current weapon
    pub fn reload_weapon(&self) -> Result<()> {
        self.issue(NativeHash::TaskReloadWeapon, &[true.into()])
    }

    /// Switch to the next weapon
    pub fn swap_weapon(&self) -> Result<()> {
        self.issue(NativeHash::TaskSwapWeapon, &[false.into()])
    }

    /// Fight another actor
    pub fn fight_against(&self, target: ActorRef) -> Result<()> {
        self.require_other(target, "target")?;
        self.issue(
            NativeHash::TaskCombatPed,
            &[target.into(), 0.into(), 16.into()],
        )
    }

    /// Fight every hated actor within `radius`
    pub fn fight_against_hated_targets(&self, radius: f32) -> Result<()> {
        require_positive(radius, "radius")?;
        self.issue(
            NativeHash::TaskCombatHatedTargetsAroundPed,
            &[radius.into(), 0.into()],
        )
    }

    /// Arrest another actor
    pub fn arrest(&self, target: ActorRef) -> Result<()> {
        self.require_other(target, "target")?;
        self.issue(NativeHash::TaskArrestPed, &[target.into()])
    }

    /// Flee from another actor
    pub fn flee_from(&self, target: ActorRef, duration_ms: i32) -> Result<()> {
        self.require_other(target, "target")?;
        require_duration(duration_ms, "duration_ms")?;
        self.issue(
            NativeHash::TaskSmartFleePed,
            &[
                target.into(),
                100.0f32.into(),
                duration_ms.into(),
                false.into(),
                false.into(),
            ],
        )
    }

    /// Flee from a position
    pub fn flee_from_coord(&self, position: Vec3, duration_ms: i32) -> Result<()> {
        require_position(position, "position")?;
        require_duration(duration_ms, "duration_ms")?;
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskSmartFleeCoord,
            &[
                x,
                y,
                z,
                100.0f32.into(),
                duration_ms.into(),
                false.into(),
                false.into(),
            ],
        )
    }

    /// Flinch, then flee from another actor
    pub fn react_and_flee(&self, target: ActorRef) -> Result<()> {
        self.require_other(target, "target")?;
        self.issue(NativeHash::TaskReactAndFleePed, &[target.into()])
    }

    // ------------------------------------------------------------------
    // Social

    /// Chat to another actor
    pub fn chat_to(&self, target: ActorRef) -> Result<()> {
        self.require_other(target, "target")?;
        self.issue(
            NativeHash::TaskChatToPed,
            &[
                target.into(),
                16.into(),
                0.0f32.into(),
                0.0f32.into(),
                0.0f32.into(),
                0.0f32.into(),
                0.0f32.into(),
            ],
        )
    }

    /// Play a named scenario where the actor stands
    pub fn start_scenario(&self, name: &str, play_enter_anim: bool) -> Result<()> {
        require_non_empty(name, "name")?;
        self.issue(
            NativeHash::TaskStartScenarioInPlace,
            &[name.into(), 0.into(), play_enter_anim.into()],
        )
    }

    /// Take out and use a mobile phone
    pub fn use_mobile_phone(&self) -> Result<()> {
        self.issue(NativeHash::TaskUseMobilePhone, &[true.into()])
    }

    /// Put the mobile phone away
    pub fn put_away_mobile_phone(&self) -> Result<()> {
        self.issue(NativeHash::TaskUseMobilePhone, &[false.into()])
    }

    // ------------------------------------------------------------------
    // Animation

    /// Play an animation clip.
    ///
    /// Requests the dictionary and waits, yielding a frame at a time, until
    /// the host has loaded it. If it is still missing when the configured
    /// deadline passes the command is skipped without an error.
    pub fn play_animation(
        &self,
        dictionary: &str,
        name: &str,
        options: &AnimationOptions,
    ) -> Result<()> {
        require_non_empty(dictionary, "dictionary")?;
        require_non_empty(name, "name")?;
        require_finite(options.blend_in_speed, "blend_in_speed")?;
        require_finite(options.blend_out_speed, "blend_out_speed")?;
        require_duration(options.duration_ms, "duration_ms")?;
        if !(0.0..=1.0).contains(&options.start_phase) {
            return Err(ArgumentError::InvalidValue {
                what: "start_phase",
                detail: format!("{} is outside 0.0..=1.0", options.start_phase),
            }
            .into());
        }

        self.ctx
            .invoke(NativeHash::RequestAnimDict, &[dictionary.into()])?;
        let loaded = self.wait_until(|| {
            Ok(self
                .ctx
                .invoke(NativeHash::HasAnimDictLoaded, &[dictionary.into()])?
                .as_bool())
        })?;
        if !loaded {
            tracing::debug!(
                actor = %self.target,
                dictionary,
                "animation dictionary not loaded in time, skipping"
            );
            return Ok(());
        }

        self.issue(
            NativeHash::TaskPlayAnim,
            &[
                dictionary.into(),
                name.into(),
                options.blend_in_speed.into(),
                options.blend_out_speed.into(),
                options.duration_ms.into(),
                options.flags.0.into(),
                options.start_phase.into(),
                false.into(),
                false.into(),
                false.into(),
            ],
        )
    }

    /// Stop a playing animation clip
    pub fn clear_animation(&self, dictionary: &str, name: &str) -> Result<()> {
        require_non_empty(dictionary, "dictionary")?;
        require_non_empty(name, "name")?;
        self.issue(
            NativeHash::StopAnimTask,
            &[dictionary.into(), name.into(), (-4.0f32).into()],
        )
    }

    // ------------------------------------------------------------------
    // Vehicles

    /// Walk to and enter a vehicle
    pub fn enter_vehicle(
        &self,
        vehicle: VehicleRef,
        seat: VehicleSeat,
        timeout_ms: i32,
        speed: f32,
        flags: EnterVehicleFlags,
    ) -> Result<()> {
        require_vehicle(vehicle)?;
        require_seat(seat, VehicleSeat::ANY)?;
        require_duration(timeout_ms, "timeout_ms")?;
        require_positive(speed, "speed")?;
        self.issue(
            NativeHash::TaskEnterVehicle,
            &[
                vehicle.into(),
                timeout_ms.into(),
                seat.0.into(),
                speed.into(),
                flags.0.into(),
                0.into(),
            ],
        )
    }

    /// Teleport into a specific seat
    pub fn warp_into_vehicle(&self, vehicle: VehicleRef, seat: VehicleSeat) -> Result<()> {
        require_vehicle(vehicle)?;
        require_seat(seat, VehicleSeat::DRIVER)?;
        self.issue(
            NativeHash::TaskWarpPedIntoVehicle,
            &[vehicle.into(), seat.0.into()],
        )
    }

    /// Leave whatever vehicle the actor is in
    pub fn leave_vehicle(&self, flags: LeaveVehicleFlags) -> Result<()> {
        self.issue(NativeHash::TaskLeaveAnyVehicle, &[0.into(), flags.0.into()])
    }

    /// Leave a specific vehicle
    pub fn leave_vehicle_of(&self, vehicle: VehicleRef, flags: LeaveVehicleFlags) -> Result<()> {
        require_vehicle(vehicle)?;
        self.issue(
            NativeHash::TaskLeaveVehicle,
            &[vehicle.into(), flags.0.into()],
        )
    }

    /// Teleport out of a vehicle
    pub fn warp_out_of_vehicle(&self, vehicle: VehicleRef) -> Result<()> {
        self.leave_vehicle_of(vehicle, LeaveVehicleFlags::WARP_OUT)
    }

    /// Move to the next seat
    pub fn shuffle_to_next_seat(&self, vehicle: VehicleRef) -> Result<()> {
        require_vehicle(vehicle)?;
        self.issue(
            NativeHash::TaskShuffleToNextVehicleSeat,
            &[vehicle.into(), 0.into()],
        )
    }

    /// Make every occupant leave a vehicle. The command goes to the vehicle
    /// rather than the target actor, so it cannot be recorded.
    pub fn everyone_leave_vehicle(&self, vehicle: VehicleRef) -> Result<()> {
        require_vehicle(vehicle)?;
        if self.is_recording() {
            return Err(ArgumentError::InvalidValue {
                what: "vehicle",
                detail: "vehicle-wide commands cannot be recorded into a sequence".to_string(),
            }
            .into());
        }
        self.ctx
            .invoke(NativeHash::TaskEveryoneLeaveVehicle, &[vehicle.into()])?;
        tracing::debug!(%vehicle, "everyone leave vehicle issued");
        Ok(())
    }

    /// Drive around aimlessly
    pub fn cruise_with_vehicle(
        &self,
        vehicle: VehicleRef,
        speed: f32,
        style: DrivingStyle,
    ) -> Result<()> {
        require_vehicle(vehicle)?;
        require_positive(speed, "speed")?;
        self.issue(
            NativeHash::TaskVehicleDriveWander,
            &[vehicle.into(), speed.into(), style.0.into()],
        )
    }

    /// Drive to `position`, stopping within `radius`
    pub fn drive_to(
        &self,
        vehicle: VehicleRef,
        position: Vec3,
        radius: f32,
        speed: f32,
        style: DrivingStyle,
    ) -> Result<()> {
        require_vehicle(vehicle)?;
        require_position(position, "position")?;
        require_positive(radius, "radius")?;
        require_positive(speed, "speed")?;
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskVehicleDriveToCoord,
            &[
                vehicle.into(),
                x,
                y,
                z,
                speed.into(),
                0.into(),
                0.into(),
                style.0.into(),
                radius.into(),
                true.into(),
            ],
        )
    }

    /// Park at `position` facing `heading`
    pub fn park_vehicle(
        &self,
        vehicle: VehicleRef,
        position: Vec3,
        heading: f32,
        radius: f32,
    ) -> Result<()> {
        require_vehicle(vehicle)?;
        require_position(position, "position")?;
        require_finite(heading, "heading")?;
        require_positive(radius, "radius")?;
        let [x, y, z] = position_args(position);
        self.issue(
            NativeHash::TaskVehiclePark,
            &[
                vehicle.into(),
                x,
                y,
                z,
                heading.into(),
                0.into(),
                radius.into(),
                false.into(),
            ],
        )
    }

    /// Chase another actor in the current vehicle
    pub fn chase_with_ground_vehicle(&self, target: ActorRef) -> Result<()> {
        self.require_other(target, "target")?;
        self.issue(NativeHash::TaskVehicleChase, &[target.into()])
    }

    // ------------------------------------------------------------------
    // Sequences and clearing

    /// Run a recorded sequence.
    ///
    /// Closes the sequence if it is still open, clears the actor's current
    /// tasks, then attaches the sequence. The host runs the recorded commands
    /// in order over the following frames.
    pub fn perform_sequence(&self, sequence: &mut TaskSequence<'_>) -> Result<()> {
        if self.is_recording() {
            return Err(ArgumentError::InvalidValue {
                what: "sequence",
                detail: "sequences cannot be recorded into other sequences".to_string(),
            }
            .into());
        }
        let handle = sequence.prepare_for_perform()?;
        self.clear_all()?;
        self.issue(NativeHash::TaskPerformSequence, &[handle.into()])
    }

    /// Stop all tasks, letting the current animation blend out
    pub fn clear_all(&self) -> Result<()> {
        self.issue(NativeHash::ClearPedTasks, &[])
    }

    /// Stop all tasks at once
    pub fn clear_all_immediately(&self) -> Result<()> {
        self.issue(NativeHash::ClearPedTasksImmediately, &[])
    }

    /// Stop the secondary task
    pub fn clear_secondary(&self) -> Result<()> {
        self.issue(NativeHash::ClearPedSecondaryTask, &[])
    }

    /// Stop looking at anything
    pub fn clear_look_at(&self) -> Result<()> {
        self.issue(NativeHash::TaskClearLookAt, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::{ScriptError, VersionError};
    use crate::runtime::sim::SimulatedHost;
    use crate::runtime::version::HostVersion;
    use crate::runtime::ScriptConfig;
    use std::sync::Arc;

    fn context_with(config: ScriptConfig) -> (Arc<SimulatedHost>, ScriptContext) {
        let host = Arc::new(SimulatedHost::new(Some(HostVersion::latest())));
        let ctx = ScriptContext::new(host.clone(), config).unwrap();
        (host, ctx)
    }

    fn context() -> (Arc<SimulatedHost>, ScriptContext) {
        context_with(ScriptConfig::default())
    }

    #[test]
    fn test_null_actor_rejected() {
        let (_host, ctx) = context();
        assert!(matches!(
            ctx.tasks(ActorRef(0)),
            Err(ScriptError::Argument(ArgumentError::MissingReference("actor")))
        ));
    }

    #[test]
    fn test_validation_issues_no_calls() {
        let (host, ctx) = context();
        let actor = host.spawn_actor();
        let tasks = ctx.tasks(actor).unwrap();
        let before = host.call_count();

        assert!(tasks.wait(-5).is_err());
        assert!(tasks.stand_still(-2).is_err());
        assert!(tasks.fight_against(ActorRef(0)).is_err());
        assert!(tasks.fight_against(actor).is_err());
        assert!(tasks.go_to(Vec3::new(f32::NAN, 0.0, 0.0)).is_err());
        assert!(tasks.start_scenario("  ", true).is_err());
        assert!(tasks.wander_in_area(Vec3::zero(), 0.0).is_err());
        assert!(tasks.cruise_with_vehicle(VehicleRef(0), 10.0, DrivingStyle::NORMAL).is_err());

        assert_eq!(host.call_count(), before);
    }

    #[test]
    fn test_seat_index_range() {
        let (host, ctx) = context();
        let actor = host.spawn_actor();
        let tasks = ctx.tasks(actor).unwrap();
        let vehicle = VehicleRef(900);

        let err = tasks
            .warp_into_vehicle(vehicle, VehicleSeat::ANY)
            .unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Argument(ArgumentError::IndexOutOfRange { what: "seat", index: -2, .. })
        ));
        assert!(tasks.warp_into_vehicle(vehicle, VehicleSeat(16)).is_err());
        assert!(tasks.warp_into_vehicle(vehicle, VehicleSeat::DRIVER).is_ok());
        assert!(tasks
            .enter_vehicle(vehicle, VehicleSeat::ANY, -1, 1.0, EnterVehicleFlags::NONE)
            .is_ok());
    }

    #[test]
    fn test_command_is_one_call_bound_to_actor() {
        let (host, ctx) = context();
        let actor = host.spawn_actor();
        let before = host.call_count();

        ctx.tasks(actor).unwrap().wait(500).unwrap();

        let calls = host.calls();
        assert_eq!(calls.len(), before + 1);
        let last = calls.last().unwrap();
        assert_eq!(last.hash, NativeHash::TaskPause);
        assert_eq!(last.args, vec![NativeArg::Int(actor.raw()), NativeArg::Int(500)]);
        assert_eq!(host.current_task(actor), Some(NativeHash::TaskPause));
    }

    #[test]
    fn test_point_route_limits() {
        let (host, ctx) = context();
        let actor = host.spawn_actor();
        let tasks = ctx.tasks(actor).unwrap();

        assert!(matches!(
            tasks.follow_point_route(&[]),
            Err(ScriptError::Argument(ArgumentError::Empty("points")))
        ));
        let too_many = vec![Vec3::zero(); MAX_ROUTE_POINTS + 1];
        assert!(tasks.follow_point_route(&too_many).is_err());
        assert_eq!(host.calls_to(NativeHash::TaskFlushRoute), 0);

        let route = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        tasks.follow_point_route(&route).unwrap();
        assert_eq!(host.calls_to(NativeHash::TaskFlushRoute), 1);
        assert_eq!(host.calls_to(NativeHash::TaskExtendRoute), 2);
        assert_eq!(host.calls_to(NativeHash::TaskFollowPointRoute), 1);
    }

    #[test]
    fn test_play_animation_waits_for_dictionary() {
        let (host, ctx) = context();
        host.set_anim_load_frames(Some(3));
        let actor = host.spawn_actor();
        let start = host.frame();

        ctx.tasks(actor)
            .unwrap()
            .play_animation("amb@world_human_smoking@male", "idle_a", &AnimationOptions::default())
            .unwrap();

        assert!(host.frame() >= start + 3);
        assert_eq!(host.calls_to(NativeHash::TaskPlayAnim), 1);
        assert_eq!(host.current_task(actor), Some(NativeHash::TaskPlayAnim));
    }

    #[test]
    fn test_play_animation_timeout_is_silent_noop() {
        let (host, ctx) = context_with(ScriptConfig {
            resource_load_timeout_ms: 20,
            ..ScriptConfig::default()
        });
        host.set_anim_load_frames(None);
        let actor = host.spawn_actor();

        let result = ctx.tasks(actor).unwrap().play_animation(
            "missing@dict",
            "clip",
            &AnimationOptions::default(),
        );

        assert!(result.is_ok());
        assert_eq!(host.calls_to(NativeHash::RequestAnimDict), 1);
        assert_eq!(host.calls_to(NativeHash::TaskPlayAnim), 0);
    }

    #[test]
    fn test_secondary_slot_kept_by_primary_command() {
        let (host, ctx) = context();
        let actor = host.spawn_actor();
        let other = host.spawn_actor();
        let tasks = ctx.tasks(actor).unwrap();

        tasks.look_at_entity(other, -1).unwrap();
        tasks.go_to(Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert_eq!(host.current_task(actor), Some(NativeHash::TaskFollowNavMeshToCoord));
        assert_eq!(host.secondary_task(actor), Some(NativeHash::TaskLookAtEntity));

        tasks.clear_look_at().unwrap();
        assert_eq!(host.secondary_task(actor), None);
        tasks.clear_all().unwrap();
        assert_eq!(host.current_task(actor), None);
    }

    #[test]
    fn test_gated_command_on_old_build() {
        let host = Arc::new(SimulatedHost::new(Some(HostVersion::V1_0_877_1)));
        let ctx = ScriptContext::new(host.clone(), ScriptConfig::default()).unwrap();
        let actor = host.spawn_actor();
        let before = host.call_count();

        let err = ctx.tasks(actor).unwrap().climb_ladder().unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Version(VersionError::UnsupportedInVersion {
                since: HostVersion::V1_0_1011_1,
                ..
            })
        ));
        assert_eq!(host.call_count(), before);
    }

    #[test]
    fn test_flag_helpers() {
        let flags = AnimationFlags::LOOP | AnimationFlags::UPPER_BODY;
        assert!(flags.contains(AnimationFlags::LOOP));
        assert!(!flags.contains(AnimationFlags::SECONDARY));
        assert_eq!((LeaveVehicleFlags::WARP_OUT | LeaveVehicleFlags::BAIL_OUT).0, 4112);
    }
}
