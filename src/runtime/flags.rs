//! Actor behavior flags
//!
//! The host keeps two disjoint flag spaces per actor:
//! - [`ConfigFlag`]: persistent, stays set until unset (or until a host
//!   lifecycle event documented on the flag clears it)
//! - [`ResetFlag`]: volatile, the host clears every reset flag at the start of
//!   each simulated frame; a caller that wants the behavior must set it again
//!   every frame
//!
//! They are separate types with separate natives so one can never be passed
//! where the other is expected. Reset flag reads come back wrapped in
//! [`ThisTick`] because the value says nothing about any other frame.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ScriptContext;
use super::error::Result;
use super::handle::ActorRef;
use super::native::NativeHash;
use super::version::HostVersion;

/// Catalog entry for a named flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagInfo<F> {
    /// The flag
    pub flag: F,
    /// Logical name
    pub name: &'static str,
    /// First host build that knows the flag, if not all of them
    pub since: Option<HostVersion>,
}

/// Persistent behavior flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigFlag(pub i32);

impl ConfigFlag {
    pub const NO_CRITICAL_HITS: ConfigFlag = ConfigFlag(2);
    pub const DROWNS_IN_WATER: ConfigFlag = ConfigFlag(3);
    /// Cleared by the host when the actor is removed from its group.
    pub const NEVER_LEAVES_GROUP: ConfigFlag = ConfigFlag(13);
    pub const BLOCK_NON_TEMPORARY_EVENTS: ConfigFlag = ConfigFlag(17);
    pub const CAN_FLY_THROUGH_WINDSCREEN: ConfigFlag = ConfigFlag(32);
    pub const DIES_BY_RAGDOLL: ConfigFlag = ConfigFlag(33);
    pub const PUT_ON_MOTORCYCLE_HELMET: ConfigFlag = ConfigFlag(35);
    /// Maintained by the host; writes are overwritten on the next update.
    pub const IS_SHOOTING: ConfigFlag = ConfigFlag(58);
    /// Maintained by the host; writes are overwritten on the next update.
    pub const IS_ON_GROUND: ConfigFlag = ConfigFlag(60);
    pub const DISABLE_MELEE: ConfigFlag = ConfigFlag(122);
    pub const DISABLE_LADDER_CLIMBING: ConfigFlag = ConfigFlag(146);
    pub const PREVENT_AUTO_SHUFFLE_TO_DRIVER_SEAT: ConfigFlag = ConfigFlag(184);
    /// Cleared by the host when the actor dies.
    pub const NO_WRITHE: ConfigFlag = ConfigFlag(281);
    pub const DISABLE_SHOCKING_EVENTS: ConfigFlag = ConfigFlag(294);
    pub const IGNORE_BEING_ON_FIRE: ConfigFlag = ConfigFlag(430);
    pub const DISABLE_STARTING_VEHICLE_ENGINE: ConfigFlag = ConfigFlag(458);

    /// Named flags known to this crate
    pub const CATALOG: &'static [FlagInfo<ConfigFlag>] = &[
        FlagInfo { flag: Self::NO_CRITICAL_HITS, name: "NoCriticalHits", since: None },
        FlagInfo { flag: Self::DROWNS_IN_WATER, name: "DrownsInWater", since: None },
        FlagInfo { flag: Self::NEVER_LEAVES_GROUP, name: "NeverLeavesGroup", since: None },
        FlagInfo {
            flag: Self::BLOCK_NON_TEMPORARY_EVENTS,
            name: "BlockNonTemporaryEvents",
            since: None,
        },
        FlagInfo {
            flag: Self::CAN_FLY_THROUGH_WINDSCREEN,
            name: "CanFlyThroughWindscreen",
            since: None,
        },
        FlagInfo { flag: Self::DIES_BY_RAGDOLL, name: "DiesByRagdoll", since: None },
        FlagInfo {
            flag: Self::PUT_ON_MOTORCYCLE_HELMET,
            name: "PutOnMotorcycleHelmet",
            since: None,
        },
        FlagInfo { flag: Self::IS_SHOOTING, name: "IsShooting", since: None },
        FlagInfo { flag: Self::IS_ON_GROUND, name: "IsOnGround", since: None },
        FlagInfo { flag: Self::DISABLE_MELEE, name: "DisableMelee", since: None },
        FlagInfo {
            flag: Self::DISABLE_LADDER_CLIMBING,
            name: "DisableLadderClimbing",
            since: None,
        },
        FlagInfo {
            flag: Self::PREVENT_AUTO_SHUFFLE_TO_DRIVER_SEAT,
            name: "PreventAutoShuffleToDriverSeat",
            since: None,
        },
        FlagInfo { flag: Self::NO_WRITHE, name: "NoWrithe", since: None },
        FlagInfo {
            flag: Self::DISABLE_SHOCKING_EVENTS,
            name: "DisableShockingEvents",
            since: Some(HostVersion::V1_0_573_1),
        },
        FlagInfo {
            flag: Self::IGNORE_BEING_ON_FIRE,
            name: "IgnoreBeingOnFire",
            since: Some(HostVersion::V1_0_1604_0),
        },
        FlagInfo {
            flag: Self::DISABLE_STARTING_VEHICLE_ENGINE,
            name: "DisableStartingVehicleEngine",
            since: Some(HostVersion::V1_0_2060_0),
        },
    ];

    /// Numeric code sent to the host
    pub fn code(self) -> i32 {
        self.0
    }

    /// Catalog entry, if this flag is named
    pub fn info(self) -> Option<&'static FlagInfo<ConfigFlag>> {
        Self::CATALOG.iter().find(|info| info.flag == self)
    }

    /// Look a flag up by logical name (case-insensitive)
    pub fn by_name(name: &str) -> Option<ConfigFlag> {
        Self::CATALOG
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .map(|info| info.flag)
    }
}

impl fmt::Display for ConfigFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.info() {
            Some(info) => write!(f, "{}({})", info.name, self.0),
            None => write!(f, "ConfigFlag({})", self.0),
        }
    }
}

/// Per-frame behavior flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResetFlag(pub i32);

impl ResetFlag {
    pub const DISABLE_PLAYER_JUMPING: ResetFlag = ResetFlag(46);
    pub const DISABLE_SECONDARY_ANIMATION_TASKS: ResetFlag = ResetFlag(58);
    pub const SUPPRESS_IN_AIR_EVENT: ResetFlag = ResetFlag(64);
    pub const DISABLE_PLAYER_VAULTING: ResetFlag = ResetFlag(102);
    pub const DISABLE_TAKE_OFF_PARACHUTE_PACK: ResetFlag = ResetFlag(124);
    pub const PREVENT_ALL_MELEE_TAUNTS: ResetFlag = ResetFlag(169);
    pub const DISABLE_ACTION_MODE: ResetFlag = ResetFlag(200);
    pub const DISABLE_DYNAMIC_CAPSULE_RADIUS: ResetFlag = ResetFlag(310);

    /// Named flags known to this crate
    pub const CATALOG: &'static [FlagInfo<ResetFlag>] = &[
        FlagInfo {
            flag: Self::DISABLE_PLAYER_JUMPING,
            name: "DisablePlayerJumping",
            since: None,
        },
        FlagInfo {
            flag: Self::DISABLE_SECONDARY_ANIMATION_TASKS,
            name: "DisableSecondaryAnimationTasks",
            since: None,
        },
        FlagInfo {
            flag: Self::SUPPRESS_IN_AIR_EVENT,
            name: "SuppressInAirEvent",
            since: None,
        },
        FlagInfo {
            flag: Self::DISABLE_PLAYER_VAULTING,
            name: "DisablePlayerVaulting",
            since: None,
        },
        FlagInfo {
            flag: Self::DISABLE_TAKE_OFF_PARACHUTE_PACK,
            name: "DisableTakeOffParachutePack",
            since: None,
        },
        FlagInfo {
            flag: Self::PREVENT_ALL_MELEE_TAUNTS,
            name: "PreventAllMeleeTaunts",
            since: None,
        },
        FlagInfo {
            flag: Self::DISABLE_ACTION_MODE,
            name: "DisableActionMode",
            since: Some(HostVersion::V1_0_877_1),
        },
        FlagInfo {
            flag: Self::DISABLE_DYNAMIC_CAPSULE_RADIUS,
            name: "DisableDynamicCapsuleRadius",
            since: Some(HostVersion::V1_0_1604_0),
        },
    ];

    /// Numeric code sent to the host
    pub fn code(self) -> i32 {
        self.0
    }

    /// Catalog entry, if this flag is named
    pub fn info(self) -> Option<&'static FlagInfo<ResetFlag>> {
        Self::CATALOG.iter().find(|info| info.flag == self)
    }

    /// Look a flag up by logical name (case-insensitive)
    pub fn by_name(name: &str) -> Option<ResetFlag> {
        Self::CATALOG
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .map(|info| info.flag)
    }
}

impl fmt::Display for ResetFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.info() {
            Some(info) => write!(f, "{}({})", info.name, self.0),
            None => write!(f, "ResetFlag({})", self.0),
        }
    }
}

/// A value that is only meaningful on the frame it was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThisTick<T> {
    value: T,
    frame: u64,
}

impl<T: Copy> ThisTick<T> {
    /// Frame the value was read on
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The value as of [`ThisTick::frame`]
    pub fn value(&self) -> T {
        self.value
    }

    /// The value, if the host is still on the frame it was read
    pub fn get(&self, ctx: &ScriptContext) -> Option<T> {
        self.is_current(ctx).then_some(self.value)
    }

    /// Whether the host is still on the frame the value was read
    pub fn is_current(&self, ctx: &ScriptContext) -> bool {
        ctx.frame_count() == self.frame
    }
}

/// Flag access for one actor
pub struct BehaviorFlags<'a> {
    ctx: &'a ScriptContext,
    actor: ActorRef,
}

impl<'a> BehaviorFlags<'a> {
    pub(crate) fn new(ctx: &'a ScriptContext, actor: ActorRef) -> Self {
        Self { ctx, actor }
    }

    /// Actor these flags belong to
    pub fn actor(&self) -> ActorRef {
        self.actor
    }

    /// Read a persistent flag
    pub fn config(&self, flag: ConfigFlag) -> Result<bool> {
        self.gate_config(flag)?;
        Ok(self
            .ctx
            .invoke(
                NativeHash::GetPedConfigFlag,
                &[self.actor.into(), flag.code().into(), true.into()],
            )?
            .as_bool())
    }

    /// Set or clear a persistent flag
    pub fn set_config(&self, flag: ConfigFlag, value: bool) -> Result<()> {
        self.gate_config(flag)?;
        tracing::trace!(actor = %self.actor, %flag, value, "set config flag");
        self.ctx.invoke(
            NativeHash::SetPedConfigFlag,
            &[self.actor.into(), flag.code().into(), value.into()],
        )?;
        Ok(())
    }

    /// Read a per-frame flag. The result only describes the current frame.
    pub fn reset(&self, flag: ResetFlag) -> Result<ThisTick<bool>> {
        self.gate_reset(flag)?;
        let frame = self.ctx.frame_count();
        let value = self
            .ctx
            .invoke(
                NativeHash::GetPedResetFlag,
                &[self.actor.into(), flag.code().into()],
            )?
            .as_bool();
        Ok(ThisTick { value, frame })
    }

    /// Set a per-frame flag for the current frame only
    pub fn set_reset(&self, flag: ResetFlag, value: bool) -> Result<()> {
        self.gate_reset(flag)?;
        self.ctx.invoke(
            NativeHash::SetPedResetFlag,
            &[self.actor.into(), flag.code().into(), value.into()],
        )?;
        Ok(())
    }

    fn gate_config(&self, flag: ConfigFlag) -> Result<()> {
        if let Some(since) = flag.info().and_then(|info| info.since) {
            self.ctx.version().require(flag.to_string(), since)?;
        }
        Ok(())
    }

    fn gate_reset(&self, flag: ResetFlag) -> Result<()> {
        if let Some(since) = flag.info().and_then(|info| info.since) {
            self.ctx.version().require(flag.to_string(), since)?;
        }
        Ok(())
    }
}
