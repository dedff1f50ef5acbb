//! AI perception events
//!
//! [`EventKind`] is listed in canonical (latest build) order. Build 1.0.877.1
//! inserted two members into the middle of the host's numbering and build
//! 1.0.2060.0 appended one, so codes must go through [`EVENT_TRANSLATOR`]
//! before they reach an older host.

use serde::{Deserialize, Serialize};

use super::ScriptContext;
use super::error::Result;
use super::handle::ActorRef;
use super::native::NativeHash;
use super::version::{HostVersion, InsertionPoint, OrdinalTranslator};

/// Event group holding events raised for script-controlled AI
pub const SCRIPT_AI_EVENT_GROUP: i32 = 0;

macro_rules! event_kinds {
    ($($name:ident = $value:literal,)*) => {
        /// AI perception event types, canonical numbering
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(i32)]
        pub enum EventKind {
            $($name = $value,)*
        }

        impl EventKind {
            /// Every member in canonical order
            pub const ALL: &'static [EventKind] = &[$(EventKind::$name,)*];

            /// Member with the given canonical value
            pub fn from_canonical(value: i32) -> Option<Self> {
                match value {
                    $($value => Some(EventKind::$name),)*
                    _ => None,
                }
            }
        }
    };
}

event_kinds! {
    AcquaintancePedDislike = 0,
    AcquaintancePedHate = 1,
    AcquaintancePedLike = 2,
    AcquaintancePedRespect = 3,
    AcquaintancePedWanted = 4,
    AcquaintancePedDead = 5,
    Agitated = 6,
    AgitatedAction = 7,
    EncroachingPed = 8,
    CallForCover = 9,
    CarUndriveable = 10,
    ClimbLadderOnRoute = 11,
    ClimbNavmeshOnRoute = 12,
    CombatTaunt = 13,
    CommunicateEvent = 14,
    CopCarBeingStolen = 15,
    CrimeReported = 16,
    Damage = 17,
    DeadPedFound = 18,
    Death = 19,
    DraggedOutCar = 20,
    DummyConversion = 21,
    Explosion = 22,
    ExplosionHeard = 23,
    FireNearby = 24,
    FlushTasks = 25,
    FootStepHeard = 26,
    GetOutOfWater = 27,
    GivePedTask = 28,
    GunAimedAt = 29,
    HelpAmbientFriend = 30,
    InjuredCryForHelp = 31,
    CrimeCryForHelp = 32,
    InAir = 33,
    InWater = 34,
    Incapacitated = 35,
    LeaderEnteredCarAsDriver = 36,
    LeaderEnteredCover = 37,
    LeaderExitedCarAsDriver = 38,
    LeaderHolsteredWeapon = 39,
    LeaderLeftCover = 40,
    LeaderUnholsteredWeapon = 41,
    MeleeAction = 42,
    MustLeaveBoat = 43,
    NewTask = 44,
    ObjectCollision = 45,
    OnFire = 46,
    OpenDoor = 47,
    ShovePed = 48,
    PedCollisionWithPed = 49,
    PedCollisionWithPlayer = 50,
    PedEnteredMyVehicle = 51,
    PedJackingMyVehicle = 52,
    PedOnCarRoof = 53,
    PedToChase = 54,
    PedToFlee = 55,
    PlayerCollisionWithPed = 56,
    PlayerLockOnTarget = 57,
    PotentialBeWalkedInto = 58,
    PotentialBlast = 59,
    PotentialGetRunOver = 60,
    PotentialWalkIntoFire = 61,
    PotentialWalkIntoObject = 62,
    PotentialWalkIntoVehicle = 63,
    ProvidingCover = 64,
    RadioTargetPosition = 65,
    RanOverPed = 66,
    ReactionEnemyPed = 67,
    ReactionInvestigateDeadPed = 68,
    ReactionInvestigateThreat = 69,
    RequestHelpWithConfrontation = 70,
    RespondedToThreat = 71,
    Revived = 72,
    ScriptCommand = 73,
    ShockingBrokenGlass = 74,
    ShockingCarAlarm = 75,
    ShockingCarCrash = 76,
    ShockingDeadBody = 77,
    ShockingFire = 78,
    ShockingGunFight = 79,
    ShockingSeenPedKilled = 80,
    ShockingPedShot = 81,
}

/// Where the host's event numbering changed
pub const EVENT_INSERTIONS: &[InsertionPoint] = &[
    InsertionPoint {
        ordinal: EventKind::EncroachingPed as i32,
        count: 1,
        since: HostVersion::V1_0_877_1,
    },
    InsertionPoint {
        ordinal: EventKind::Incapacitated as i32,
        count: 1,
        since: HostVersion::V1_0_877_1,
    },
    InsertionPoint {
        ordinal: EventKind::ShockingPedShot as i32,
        count: 1,
        since: HostVersion::V1_0_2060_0,
    },
];

/// Translator for [`EventKind`] codes
pub const EVENT_TRANSLATOR: OrdinalTranslator = OrdinalTranslator::new(
    "EventKind",
    EventKind::ShockingPedShot as i32 + 1,
    EVENT_INSERTIONS,
);

impl EventKind {
    /// Canonical value
    pub fn canonical(self) -> i32 {
        self as i32
    }

    /// Code `version` uses for this event
    pub fn to_host(self, version: HostVersion) -> Result<i32> {
        Ok(EVENT_TRANSLATOR.to_host(self.canonical(), version)?)
    }

    /// Event for a code reported by `version`
    pub fn from_host(code: i32, version: HostVersion) -> Option<Self> {
        EVENT_TRANSLATOR
            .to_canonical(code, version)
            .and_then(Self::from_canonical)
    }
}

/// Poll access to the host's event queues
pub struct EventQueue<'a> {
    ctx: &'a ScriptContext,
}

impl<'a> EventQueue<'a> {
    pub(crate) fn new(ctx: &'a ScriptContext) -> Self {
        Self { ctx }
    }

    /// Whether `actor` received an event of `kind` this frame
    pub fn has_received(&self, actor: ActorRef, kind: EventKind) -> Result<bool> {
        let code = kind.to_host(self.ctx.version())?;
        Ok(self
            .ctx
            .invoke(NativeHash::HasPedReceivedEvent, &[actor.into(), code.into()])?
            .as_bool())
    }

    /// Events pending in the script AI group, in queue order.
    ///
    /// Codes this crate cannot map for the detected build are skipped.
    pub fn pending(&self) -> Result<Vec<EventKind>> {
        let count = self
            .ctx
            .invoke(NativeHash::GetNumberOfEvents, &[SCRIPT_AI_EVENT_GROUP.into()])?
            .as_int();

        let mut events = Vec::with_capacity(count.max(0) as usize);
        for index in 0..count {
            let code = self
                .ctx
                .invoke(
                    NativeHash::GetEventAtIndex,
                    &[SCRIPT_AI_EVENT_GROUP.into(), index.into()],
                )?
                .as_int();
            match EventKind::from_host(code, self.ctx.version()) {
                Some(kind) => events.push(kind),
                None => tracing::debug!(code, "skipping unmapped event code"),
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD: HostVersion = HostVersion::V1_0_791_2;

    #[test]
    fn test_all_is_dense() {
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.canonical(), i as i32);
        }
        assert_eq!(EVENT_TRANSLATOR.len(), EventKind::ALL.len() as i32);
    }

    #[test]
    fn test_before_both_insertions_unchanged() {
        assert_eq!(EventKind::Agitated.to_host(OLD).unwrap(), 6);
    }

    #[test]
    fn test_between_insertions_shift_by_one() {
        assert_eq!(EventKind::CallForCover.to_host(OLD).unwrap(), 8);
        assert_eq!(EventKind::InWater.to_host(OLD).unwrap(), 33);
    }

    #[test]
    fn test_after_both_insertions_shift_by_two() {
        assert_eq!(EventKind::LeaderEnteredCarAsDriver.to_host(OLD).unwrap(), 34);
        assert_eq!(EventKind::ShockingSeenPedKilled.to_host(OLD).unwrap(), 78);
    }

    #[test]
    fn test_inserted_members_unsupported_on_old_build() {
        assert!(EventKind::EncroachingPed.to_host(OLD).is_err());
        assert!(EventKind::Incapacitated.to_host(OLD).is_err());
        assert!(EventKind::EncroachingPed.to_host(HostVersion::V1_0_877_1).is_ok());
    }

    #[test]
    fn test_append_never_shifts() {
        let pre_append = HostVersion::V1_0_1868_0;
        assert_eq!(EventKind::ShockingSeenPedKilled.to_host(pre_append).unwrap(), 80);
        assert!(EventKind::ShockingPedShot.to_host(pre_append).is_err());
        assert_eq!(
            EventKind::ShockingPedShot.to_host(HostVersion::V1_0_2060_0).unwrap(),
            81
        );
    }

    #[test]
    fn test_from_host_reverses() {
        assert_eq!(EventKind::from_host(34, OLD), Some(EventKind::LeaderEnteredCarAsDriver));
        assert_eq!(EventKind::from_host(8, OLD), Some(EventKind::CallForCover));
        assert_eq!(EventKind::from_host(79, OLD), None);
    }
}
