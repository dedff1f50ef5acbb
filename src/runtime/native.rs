//! Native call boundary
//!
//! Every operation in this crate ends in one or more calls through
//! [`NativeBridge`], a synchronous `call(opcode, args...)` primitive provided by
//! whatever hosts the script. The bridge never fails loudly: a call that could
//! not be carried out returns the host's sentinel (zero, false, void).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::handle::{ActorRef, GroupRef, VehicleRef};
use super::version::HostVersion;

/// Opcodes of the host's native table used by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u64)]
pub enum NativeHash {
    // Tasks
    TaskPause = 0xE73A266DB0CA9042,
    TaskStandStill = 0x919BE13EED931959,
    TaskFollowNavMeshToCoord = 0x15D3A79D4E44B913,
    TaskGoToEntity = 0x6A071245EB0D1882,
    TaskGoStraightToCoord = 0xD76B57B44F1E6F8B,
    TaskPedSlideToCoord = 0xD04FE6765D990A06,
    TaskAchieveHeading = 0x93B93A37987F1F3D,
    TaskTurnPedToFaceEntity = 0x5AD23D40115353AC,
    TaskTurnPedToFaceCoord = 0x1DDA930A0AC38571,
    TaskLookAtEntity = 0x69F4BE8C8CC4796C,
    TaskLookAtCoord = 0x6FA46612594F7973,
    TaskAimGunAtEntity = 0x9B53BB6E8943AF53,
    TaskAimGunAtCoord = 0x6671F3EEC681BDA1,
    TaskShootAtEntity = 0x08DA95E8298AE772,
    TaskShootAtCoord = 0x46A6CC01E0826106,
    TaskReloadWeapon = 0x62D2916F56B9CD2D,
    TaskSwapWeapon = 0xA21C51255B205245,
    TaskArrestPed = 0xF3B9A78A178572B1,
    TaskChatToPed = 0x8C338E0263E4FD19,
    TaskJump = 0x0AE4086104E067B1,
    TaskClimb = 0x89D9FCC2435112F1,
    TaskClimbLadder = 0xB6C987F9285A3814,
    TaskCower = 0x3EB1FE9E8E908E15,
    TaskHandsUp = 0xF2EAB31979A7F910,
    TaskGuardCurrentPosition = 0x4A58A47A72E3FCB4,
    TaskWanderStandard = 0xBB9CE077274F6A1B,
    TaskWanderInArea = 0xE054346CA3A0F315,
    TaskStartScenarioInPlace = 0x142A02425FF02BD9,
    TaskUseMobilePhone = 0xBD2A8EC3AF4DE7DB,
    TaskPlayAnim = 0xEA47FE3719165B94,
    StopAnimTask = 0x97FF36A1D40EA00A,
    TaskFlushRoute = 0x841142A1376E9006,
    TaskExtendRoute = 0x1E7889778264843A,
    TaskFollowPointRoute = 0x595583281858626E,
    TaskFollowToOffsetOfEntity = 0x304AE42E357B8C7E,
    TaskCombatPed = 0xF166E48407BAC484,
    TaskCombatHatedTargetsAroundPed = 0x7BF835BB9E2698C8,
    TaskSmartFleePed = 0x22B0D0E37CCB840D,
    TaskSmartFleeCoord = 0x94587F17E9C365D5,
    TaskReactAndFleePed = 0x72C896464915D1B1,
    TaskEnterVehicle = 0xC20E50AA46D09CA8,
    TaskWarpPedIntoVehicle = 0x9A7D091411C5F684,
    TaskLeaveAnyVehicle = 0x504D54DF3F6F2247,
    TaskLeaveVehicle = 0xD3DBCE61A490BE02,
    TaskShuffleToNextVehicleSeat = 0x7AA80209BDA643EB,
    TaskEveryoneLeaveVehicle = 0x7F93691AB4B92272,
    TaskVehicleDriveWander = 0x480142959D337D00,
    TaskVehicleDriveToCoord = 0xE2A2AA2F659D77A7,
    TaskVehiclePark = 0x0F3E34E968EA374E,
    TaskVehicleChase = 0x3C08A8E30363B353,
    TaskSkyDive = 0x601736CFE536B0A0,
    TaskParachuteToTarget = 0xB33E291AFA6BD03A,
    TaskPerformSequence = 0x5ABA3986D90D8A3B,
    ClearPedTasks = 0xE1EF3C1216AFF2CD,
    ClearPedTasksImmediately = 0xAAA34F8A7CB32098,
    ClearPedSecondaryTask = 0x176CECF6F920D707,
    TaskClearLookAt = 0x0F804F1DB19B9689,

    // Resources
    RequestAnimDict = 0xD3BD40951412FEF6,
    HasAnimDictLoaded = 0xD031FA9D1E4CE5D1,

    // Sequences
    OpenSequenceTask = 0xE8854A4326B9E12B,
    CloseSequenceTask = 0x39E72BC99E6360CB,
    SetSequenceToRepeat = 0x58C70CF3A41E4AE7,
    ClearSequenceTask = 0x3841422E9C488D8C,
    GetSequenceProgress = 0x00A9010CFE1E3533,

    // Status
    GetScriptTaskStatus = 0x77F1BEB8863288D5,
    GetFrameCount = 0xFC8202EFC642E6F2,

    // Behavior flags
    SetPedConfigFlag = 0x1913FE4CBF41C463,
    GetPedConfigFlag = 0x7EE53118C892B513,
    SetPedResetFlag = 0xC1E8A365BF3B29F2,
    GetPedResetFlag = 0xAF9E59B1B1FBF2A0,

    // Groups
    CreateGroup = 0x90370EBE0FEE1A3D,
    RemoveGroup = 0x8EB2F69076AF7053,
    DoesGroupExist = 0x7C6B0C22F9F40BBE,
    GetPedGroupIndex = 0xF162E133B4E7A675,
    GetGroupSize = 0x8DE69FE35CA09A45,
    GetPedAsGroupLeader = 0x5CCE68DBD5FE93EC,
    GetPedAsGroupMember = 0x51455483CF23ED97,
    SetPedAsGroupLeader = 0x2A7819605465FBCE,
    SetPedAsGroupMember = 0x9F3480FE65DB31B5,
    RemovePedFromGroup = 0xED74007FFB146BC2,
    IsPedGroupMember = 0x9BB01E3834671191,
    SetGroupSeparationRange = 0x4102C7858CFEE4E4,
    SetGroupFormation = 0xCE2F5FC3AF7E8C1E,

    // Events
    HasPedReceivedEvent = 0x8507BCB710FA6DC0,
    GetNumberOfEvents = 0x5F92A689A06620AA,
    GetEventAtIndex = 0xD8F66A3A60C62153,
}

impl NativeHash {
    /// Raw opcode value
    pub fn raw(self) -> u64 {
        self as u64
    }

    /// First host build that exports this native, if it is not in every build
    pub fn introduced_in(self) -> Option<HostVersion> {
        match self {
            NativeHash::TaskClimbLadder => Some(HostVersion::V1_0_1011_1),
            _ => None,
        }
    }

    /// Name of the script task this command starts, as the status query
    /// expects it. Non-task natives have none.
    pub fn script_task_name(self) -> Option<&'static str> {
        let name = match self {
            NativeHash::TaskPause => "SCRIPT_TASK_PAUSE",
            NativeHash::TaskStandStill => "SCRIPT_TASK_STAND_STILL",
            NativeHash::TaskFollowNavMeshToCoord => "SCRIPT_TASK_FOLLOW_NAV_MESH_TO_COORD",
            NativeHash::TaskGoToEntity => "SCRIPT_TASK_GOTO_ENTITY",
            NativeHash::TaskGoStraightToCoord => "SCRIPT_TASK_GO_STRAIGHT_TO_COORD",
            NativeHash::TaskPedSlideToCoord => "SCRIPT_TASK_PED_SLIDE_TO_COORD",
            NativeHash::TaskAchieveHeading => "SCRIPT_TASK_ACHIEVE_HEADING",
            NativeHash::TaskTurnPedToFaceEntity => "SCRIPT_TASK_TURN_PED_TO_FACE_ENTITY",
            NativeHash::TaskTurnPedToFaceCoord => "SCRIPT_TASK_TURN_PED_TO_FACE_COORD",
            NativeHash::TaskLookAtEntity => "SCRIPT_TASK_LOOK_AT_ENTITY",
            NativeHash::TaskLookAtCoord => "SCRIPT_TASK_LOOK_AT_COORD",
            NativeHash::TaskAimGunAtEntity => "SCRIPT_TASK_AIM_GUN_AT_ENTITY",
            NativeHash::TaskAimGunAtCoord => "SCRIPT_TASK_AIM_GUN_AT_COORD",
            NativeHash::TaskShootAtEntity => "SCRIPT_TASK_SHOOT_AT_ENTITY",
            NativeHash::TaskShootAtCoord => "SCRIPT_TASK_SHOOT_AT_COORD",
            NativeHash::TaskReloadWeapon => "SCRIPT_TASK_RELOAD_WEAPON",
            NativeHash::TaskSwapWeapon => "SCRIPT_TASK_SWAP_WEAPON",
            NativeHash::TaskArrestPed => "SCRIPT_TASK_ARREST_PED",
            NativeHash::TaskChatToPed => "SCRIPT_TASK_CHAT_TO_PED",
            NativeHash::TaskJump => "SCRIPT_TASK_JUMP",
            NativeHash::TaskClimb => "SCRIPT_TASK_CLIMB",
            NativeHash::TaskClimbLadder => "SCRIPT_TASK_CLIMB_LADDER",
            NativeHash::TaskCower => "SCRIPT_TASK_COWER",
            NativeHash::TaskHandsUp => "SCRIPT_TASK_HANDS_UP",
            NativeHash::TaskGuardCurrentPosition => "SCRIPT_TASK_GUARD_CURRENT_POSITION",
            NativeHash::TaskWanderStandard => "SCRIPT_TASK_WANDER_STANDARD",
            NativeHash::TaskWanderInArea => "SCRIPT_TASK_WANDER_IN_AREA",
            NativeHash::TaskStartScenarioInPlace => "SCRIPT_TASK_START_SCENARIO_IN_PLACE",
            NativeHash::TaskUseMobilePhone => "SCRIPT_TASK_USE_MOBILE_PHONE",
            NativeHash::TaskPlayAnim => "SCRIPT_TASK_PLAY_ANIM",
            NativeHash::TaskFollowPointRoute => "SCRIPT_TASK_FOLLOW_POINT_ROUTE",
            NativeHash::TaskFollowToOffsetOfEntity => "SCRIPT_TASK_FOLLOW_TO_OFFSET_OF_ENTITY",
            NativeHash::TaskCombatPed => "SCRIPT_TASK_COMBAT",
            NativeHash::TaskCombatHatedTargetsAroundPed => {
                "SCRIPT_TASK_COMBAT_HATED_TARGETS_AROUND_PED"
            }
            NativeHash::TaskSmartFleePed => "SCRIPT_TASK_SMART_FLEE_PED",
            NativeHash::TaskSmartFleeCoord => "SCRIPT_TASK_SMART_FLEE_POINT",
            NativeHash::TaskReactAndFleePed => "SCRIPT_TASK_REACT_AND_FLEE_PED",
            NativeHash::TaskEnterVehicle => "SCRIPT_TASK_ENTER_VEHICLE",
            NativeHash::TaskWarpPedIntoVehicle => "SCRIPT_TASK_WARP_PED_INTO_VEHICLE",
            NativeHash::TaskLeaveAnyVehicle => "SCRIPT_TASK_LEAVE_ANY_VEHICLE",
            NativeHash::TaskLeaveVehicle => "SCRIPT_TASK_LEAVE_VEHICLE",
            NativeHash::TaskShuffleToNextVehicleSeat => "SCRIPT_TASK_SHUFFLE_TO_NEXT_VEHICLE_SEAT",
            NativeHash::TaskEveryoneLeaveVehicle => "SCRIPT_TASK_EVERYONE_LEAVE_VEHICLE",
            NativeHash::TaskVehicleDriveWander => "SCRIPT_TASK_VEHICLE_DRIVE_WANDER",
            NativeHash::TaskVehicleDriveToCoord => "SCRIPT_TASK_VEHICLE_DRIVE_TO_COORD",
            NativeHash::TaskVehiclePark => "SCRIPT_TASK_VEHICLE_PARK",
            NativeHash::TaskVehicleChase => "SCRIPT_TASK_VEHICLE_CHASE",
            NativeHash::TaskSkyDive => "SCRIPT_TASK_SKY_DIVE",
            NativeHash::TaskParachuteToTarget => "SCRIPT_TASK_PARACHUTE_TO_TARGET",
            NativeHash::TaskPerformSequence => "SCRIPT_TASK_PERFORM_SEQUENCE",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for NativeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(0x{:016X})", self, self.raw())
    }
}

/// Jenkins one-at-a-time hash of a lowercased name, the host's identifier hash
pub const fn joaat(name: &str) -> u32 {
    let bytes = name.as_bytes();
    let mut hash: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        hash = hash.wrapping_add(bytes[i].to_ascii_lowercase() as u32);
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
        i += 1;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash
}

/// One marshalled argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NativeArg {
    /// Integer or handle
    Int(i32),
    /// Float
    Float(f32),
    /// Boolean
    Bool(bool),
    /// String
    Str(String),
}

impl From<i32> for NativeArg {
    fn from(value: i32) -> Self {
        NativeArg::Int(value)
    }
}

impl From<u32> for NativeArg {
    fn from(value: u32) -> Self {
        NativeArg::Int(value as i32)
    }
}

impl From<f32> for NativeArg {
    fn from(value: f32) -> Self {
        NativeArg::Float(value)
    }
}

impl From<bool> for NativeArg {
    fn from(value: bool) -> Self {
        NativeArg::Bool(value)
    }
}

impl From<&str> for NativeArg {
    fn from(value: &str) -> Self {
        NativeArg::Str(value.to_string())
    }
}

impl From<ActorRef> for NativeArg {
    fn from(value: ActorRef) -> Self {
        NativeArg::Int(value.raw())
    }
}

impl From<VehicleRef> for NativeArg {
    fn from(value: VehicleRef) -> Self {
        NativeArg::Int(value.raw())
    }
}

impl From<GroupRef> for NativeArg {
    fn from(value: GroupRef) -> Self {
        NativeArg::Int(value.raw())
    }
}

impl NativeArg {
    /// Integer payload, if any
    pub fn as_int(&self) -> Option<i32> {
        match self {
            NativeArg::Int(v) => Some(*v),
            NativeArg::Bool(b) => Some(*b as i32),
            _ => None,
        }
    }

    /// Float payload, if any
    pub fn as_float(&self) -> Option<f32> {
        match self {
            NativeArg::Float(v) => Some(*v),
            NativeArg::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Boolean payload, if any
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeArg::Bool(b) => Some(*b),
            NativeArg::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// String payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeArg::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Typed result of a native call
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum NativeValue {
    /// No return value
    #[default]
    Void,
    /// Integer or handle
    Int(i32),
    /// Float
    Float(f32),
    /// Boolean
    Bool(bool),
}

impl NativeValue {
    /// Integer view; sentinel `0` for anything else
    pub fn as_int(self) -> i32 {
        match self {
            NativeValue::Int(v) => v,
            NativeValue::Bool(b) => b as i32,
            _ => 0,
        }
    }

    /// Boolean view; sentinel `false` for anything else
    pub fn as_bool(self) -> bool {
        match self {
            NativeValue::Bool(b) => b,
            NativeValue::Int(v) => v != 0,
            _ => false,
        }
    }

    /// Float view; sentinel `0.0` for anything else
    pub fn as_float(self) -> f32 {
        match self {
            NativeValue::Float(v) => v,
            NativeValue::Int(v) => v as f32,
            _ => 0.0,
        }
    }
}

/// The host's call table as seen from a script.
///
/// Natives with out-parameters report the out value as their result.
pub trait NativeBridge: Send + Sync {
    /// Call a native synchronously
    fn invoke(&self, hash: NativeHash, args: &[NativeArg]) -> NativeValue;

    /// Hand control back to the host until its next frame
    fn yield_frame(&self);

    /// Build identifier of the running host, if it could be detected
    fn host_version(&self) -> Option<HostVersion>;

    /// Base address of an entity's native object, `0` when unavailable
    fn entity_address(&self, handle: i32) -> u64;

    /// Read a float from host memory
    fn read_f32(&self, address: u64) -> f32;

    /// Write a float to host memory
    fn write_f32(&self, address: u64, value: f32);
}
