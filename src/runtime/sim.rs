//! In-process host simulation
//!
//! [`SimulatedHost`] implements [`NativeBridge`] over a small model of the
//! host scheduler: actors with flag sets and a primary and secondary task
//! slot, recorded sequences, groups with sparse member slots, an event queue
//! and a flat float memory. Every call is logged so tests can assert on what
//! reached the host.
//!
//! Each frame is 100 ms of simulated time. Timed tasks finish after their
//! duration, navigation finishes after three frames, open-ended tasks
//! (wandering, combat, scenarios, cruising) never finish on their own and
//! everything else takes one frame.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

use super::flags::ConfigFlag;
use super::group::MAX_GROUP_MEMBERS;
use super::handle::{ActorRef, GroupRef};
use super::native::{NativeArg, NativeBridge, NativeHash, NativeValue};
use super::status::ScriptTask;
use super::task::AnimationFlags;
use super::version::HostVersion;

/// Simulated milliseconds per frame
pub const MS_PER_FRAME: u64 = 100;

/// Frames a navigation command takes to arrive
const NAVIGATION_FRAMES: u64 = 3;

/// Status codes the host reports for script tasks
const STATUS_WAITING_TO_START: i32 = 0;
const STATUS_PERFORMING: i32 = 1;
const STATUS_FINISHED: i32 = 7;

const ADDRESS_BASE: u64 = 0x7FF6_0000_0000;

/// A native call as the host received it
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    /// Host frame the call arrived on
    pub frame: u64,
    pub hash: NativeHash,
    pub args: Vec<NativeArg>,
}

#[derive(Debug, Clone)]
struct Command {
    hash: NativeHash,
    args: Vec<NativeArg>,
}

#[derive(Debug)]
struct RunningTask {
    hash: NativeHash,
    started: u64,
    /// Frames left; `None` runs until replaced
    remaining: Option<u64>,
}

impl RunningTask {
    fn start(command: &Command, frame: u64) -> Self {
        Self {
            hash: command.hash,
            started: frame,
            remaining: frames_for(command),
        }
    }
}

#[derive(Debug)]
struct RunningSequence {
    commands: Vec<Command>,
    progress: usize,
    repeat: bool,
    started: u64,
}

#[derive(Debug, Default)]
struct SimActor {
    config_flags: HashSet<i32>,
    reset_flags: HashSet<i32>,
    primary: Option<RunningTask>,
    secondary: Option<NativeHash>,
    sequence: Option<RunningSequence>,
    received: HashSet<i32>,
    address: u64,
}

#[derive(Debug, Default)]
struct SimSequence {
    commands: Vec<Command>,
    open: bool,
    repeat: bool,
}

#[derive(Debug, Default)]
struct SimGroup {
    leader: Option<i32>,
    slots: [Option<i32>; MAX_GROUP_MEMBERS],
    separation_range: f32,
    formation: i32,
}

impl SimGroup {
    fn contains(&self, actor: i32) -> bool {
        self.leader == Some(actor) || self.slots.contains(&Some(actor))
    }

    fn remove(&mut self, actor: i32) {
        if self.leader == Some(actor) {
            self.leader = None;
        }
        for slot in self.slots.iter_mut() {
            if *slot == Some(actor) {
                *slot = None;
            }
        }
    }
}

#[derive(Debug)]
struct SimState {
    frame: u64,
    next_handle: i32,
    actors: HashMap<i32, SimActor>,
    sequences: HashMap<i32, SimSequence>,
    recording: Option<i32>,
    sequence_capacity: usize,
    groups: HashMap<i32, SimGroup>,
    group_capacity: usize,
    events: Vec<i32>,
    anim_load_frames: Option<u64>,
    anim_requests: HashMap<String, u64>,
    route: Vec<[f32; 3]>,
    memory: HashMap<u64, f32>,
    memory_writes: usize,
    calls: Vec<CallRecord>,
}

/// Simulated host for tests and the demo binary
pub struct SimulatedHost {
    version: Option<HostVersion>,
    state: Mutex<SimState>,
}

impl SimulatedHost {
    /// Create a host reporting `version`; `None` simulates a build that
    /// cannot be detected
    pub fn new(version: Option<HostVersion>) -> Self {
        Self {
            version,
            state: Mutex::new(SimState {
                frame: 1,
                next_handle: 1,
                actors: HashMap::new(),
                sequences: HashMap::new(),
                recording: None,
                sequence_capacity: 256,
                groups: HashMap::new(),
                group_capacity: 64,
                events: Vec::new(),
                anim_load_frames: Some(0),
                anim_requests: HashMap::new(),
                route: Vec::new(),
                memory: HashMap::new(),
                memory_writes: 0,
                calls: Vec::new(),
            }),
        }
    }

    /// Add an actor and return its handle
    pub fn spawn_actor(&self) -> ActorRef {
        let mut state = self.state.lock();
        let handle = state.alloc_handle();
        let actor = SimActor {
            address: ADDRESS_BASE + handle as u64 * 0x2000,
            ..SimActor::default()
        };
        state.actors.insert(handle, actor);
        ActorRef(handle)
    }

    /// Current frame number
    pub fn frame(&self) -> u64 {
        self.state.lock().frame
    }

    /// Run one host frame
    pub fn advance_frame(&self) {
        self.state.lock().step();
    }

    /// Run `n` host frames
    pub fn advance_frames(&self, n: u64) {
        let mut state = self.state.lock();
        for _ in 0..n {
            state.step();
        }
    }

    /// Number of native calls received so far
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Every native call received so far, in order
    pub fn calls(&self) -> Vec<CallRecord> {
        self.state.lock().calls.clone()
    }

    /// How many times `hash` was called
    pub fn calls_to(&self, hash: NativeHash) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.hash == hash)
            .count()
    }

    /// Frames an animation dictionary takes to load after it is requested;
    /// `None` never loads it
    pub fn set_anim_load_frames(&self, frames: Option<u64>) {
        self.state.lock().anim_load_frames = frames;
    }

    /// Most sequences the host holds at once
    pub fn set_sequence_capacity(&self, capacity: usize) {
        self.state.lock().sequence_capacity = capacity;
    }

    /// Most groups the host holds at once
    pub fn set_group_capacity(&self, capacity: usize) {
        self.state.lock().group_capacity = capacity;
    }

    /// Number of commands recorded in a live sequence
    pub fn sequence_len(&self, handle: i32) -> Option<usize> {
        self.state
            .lock()
            .sequences
            .get(&handle)
            .map(|sequence| sequence.commands.len())
    }

    /// Create a group with the given leader and member slots, empty slots
    /// included
    pub fn create_group_with(&self, leader: Option<ActorRef>, slots: &[Option<ActorRef>]) -> GroupRef {
        let mut state = self.state.lock();
        let handle = state.alloc_handle();
        let mut group = SimGroup {
            leader: leader.map(ActorRef::raw),
            ..SimGroup::default()
        };
        for (slot, actor) in group.slots.iter_mut().zip(slots) {
            *slot = actor.map(ActorRef::raw);
        }
        state.groups.insert(handle, group);
        GroupRef(handle)
    }

    /// Empty a member slot without going through a native
    pub fn vacate_member_slot(&self, group: GroupRef, index: usize) {
        if let Some(slot) = self
            .state
            .lock()
            .groups
            .get_mut(&group.raw())
            .and_then(|group| group.slots.get_mut(index))
        {
            *slot = None;
        }
    }

    /// Queue an event code in the script AI group until the next frame
    pub fn push_event(&self, code: i32) {
        self.state.lock().events.push(code);
    }

    /// Deliver an event code to one actor until the next frame
    pub fn deliver_event(&self, actor: ActorRef, code: i32) {
        if let Some(actor) = self.state.lock().actors.get_mut(&actor.raw()) {
            actor.received.insert(code);
        }
    }

    /// Command in the actor's primary slot
    pub fn current_task(&self, actor: ActorRef) -> Option<NativeHash> {
        self.state
            .lock()
            .actors
            .get(&actor.raw())
            .and_then(|actor| actor.primary.as_ref())
            .map(|task| task.hash)
    }

    /// Command in the actor's secondary slot
    pub fn secondary_task(&self, actor: ActorRef) -> Option<NativeHash> {
        self.state
            .lock()
            .actors
            .get(&actor.raw())
            .and_then(|actor| actor.secondary)
    }

    /// Points of the route buffer
    pub fn route(&self) -> Vec<[f32; 3]> {
        self.state.lock().route.clone()
    }

    /// Separation range and formation code of a live group
    pub fn group_settings(&self, group: GroupRef) -> Option<(f32, i32)> {
        self.state
            .lock()
            .groups
            .get(&group.raw())
            .map(|group| (group.separation_range, group.formation))
    }

    /// Override an actor's object address; `0` makes it unavailable
    pub fn set_entity_address(&self, actor: ActorRef, address: u64) {
        if let Some(actor) = self.state.lock().actors.get_mut(&actor.raw()) {
            actor.address = address;
        }
    }

    /// Number of memory writes received
    pub fn memory_writes(&self) -> usize {
        self.state.lock().memory_writes
    }
}

impl NativeBridge for SimulatedHost {
    fn invoke(&self, hash: NativeHash, args: &[NativeArg]) -> NativeValue {
        let mut state = self.state.lock();
        let frame = state.frame;
        state.calls.push(CallRecord {
            frame,
            hash,
            args: args.to_vec(),
        });
        state.dispatch(hash, args)
    }

    fn yield_frame(&self) {
        self.advance_frame();
    }

    fn host_version(&self) -> Option<HostVersion> {
        self.version
    }

    fn entity_address(&self, handle: i32) -> u64 {
        self.state
            .lock()
            .actors
            .get(&handle)
            .map_or(0, |actor| actor.address)
    }

    fn read_f32(&self, address: u64) -> f32 {
        self.state
            .lock()
            .memory
            .get(&address)
            .copied()
            .unwrap_or(0.0)
    }

    fn write_f32(&self, address: u64, value: f32) {
        let mut state = self.state.lock();
        state.memory.insert(address, value);
        state.memory_writes += 1;
    }
}

fn int(args: &[NativeArg], index: usize) -> i32 {
    args.get(index).and_then(NativeArg::as_int).unwrap_or(0)
}

fn float(args: &[NativeArg], index: usize) -> f32 {
    args.get(index).and_then(NativeArg::as_float).unwrap_or(0.0)
}

fn boolean(args: &[NativeArg], index: usize) -> bool {
    args.get(index).and_then(NativeArg::as_bool).unwrap_or(false)
}

fn string(args: &[NativeArg], index: usize) -> String {
    args.get(index)
        .and_then(NativeArg::as_str)
        .unwrap_or_default()
        .to_string()
}

fn ms_to_frames(ms: i32) -> u64 {
    (ms.max(0) as u64).div_ceil(MS_PER_FRAME).max(1)
}

fn frames_for(command: &Command) -> Option<u64> {
    match command.hash {
        NativeHash::TaskPause => Some(ms_to_frames(int(&command.args, 1))),
        NativeHash::TaskStandStill | NativeHash::TaskCower | NativeHash::TaskHandsUp => {
            match int(&command.args, 1) {
                -1 => None,
                ms => Some(ms_to_frames(ms)),
            }
        }
        NativeHash::TaskFollowNavMeshToCoord
        | NativeHash::TaskGoStraightToCoord
        | NativeHash::TaskFollowPointRoute => Some(NAVIGATION_FRAMES),
        NativeHash::TaskGuardCurrentPosition
        | NativeHash::TaskWanderStandard
        | NativeHash::TaskWanderInArea
        | NativeHash::TaskStartScenarioInPlace
        | NativeHash::TaskCombatPed
        | NativeHash::TaskCombatHatedTargetsAroundPed
        | NativeHash::TaskVehicleDriveWander
        | NativeHash::TaskVehicleChase => None,
        _ => Some(1),
    }
}

/// Natives whose first argument is the actor the command is for
fn is_actor_command(hash: NativeHash) -> bool {
    hash.script_task_name().is_some()
        || matches!(
            hash,
            NativeHash::ClearPedTasks
                | NativeHash::ClearPedTasksImmediately
                | NativeHash::ClearPedSecondaryTask
                | NativeHash::TaskClearLookAt
                | NativeHash::StopAnimTask
        )
}

impl SimState {
    fn alloc_handle(&mut self) -> i32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn step(&mut self) {
        self.frame += 1;
        self.events.clear();
        let frame = self.frame;

        for actor in self.actors.values_mut() {
            actor.reset_flags.clear();
            actor.received.clear();

            let finished = match actor.primary.as_mut().and_then(|task| task.remaining.as_mut()) {
                Some(remaining) => {
                    *remaining = remaining.saturating_sub(1);
                    *remaining == 0
                }
                None => false,
            };
            if !finished {
                continue;
            }

            actor.primary = None;
            if let Some(sequence) = actor.sequence.as_mut() {
                sequence.progress += 1;
                if sequence.progress >= sequence.commands.len() && sequence.repeat {
                    sequence.progress = 0;
                }
                if let Some(next) = sequence.commands.get(sequence.progress) {
                    actor.primary = Some(RunningTask::start(next, frame));
                }
            }
        }
    }

    fn dispatch(&mut self, hash: NativeHash, args: &[NativeArg]) -> NativeValue {
        match hash {
            NativeHash::GetFrameCount => NativeValue::Int(self.frame as i32),

            NativeHash::SetPedConfigFlag => {
                if let Some(actor) = self.actors.get_mut(&int(args, 0)) {
                    set_flag(&mut actor.config_flags, int(args, 1), boolean(args, 2));
                }
                NativeValue::Void
            }
            NativeHash::GetPedConfigFlag => NativeValue::Bool(
                self.actors
                    .get(&int(args, 0))
                    .is_some_and(|actor| actor.config_flags.contains(&int(args, 1))),
            ),
            NativeHash::SetPedResetFlag => {
                if let Some(actor) = self.actors.get_mut(&int(args, 0)) {
                    set_flag(&mut actor.reset_flags, int(args, 1), boolean(args, 2));
                }
                NativeValue::Void
            }
            NativeHash::GetPedResetFlag => NativeValue::Bool(
                self.actors
                    .get(&int(args, 0))
                    .is_some_and(|actor| actor.reset_flags.contains(&int(args, 1))),
            ),

            NativeHash::OpenSequenceTask => {
                if self.recording.is_some() || self.sequences.len() >= self.sequence_capacity {
                    return NativeValue::Int(0);
                }
                let handle = self.alloc_handle();
                self.sequences.insert(
                    handle,
                    SimSequence {
                        open: true,
                        ..SimSequence::default()
                    },
                );
                self.recording = Some(handle);
                NativeValue::Int(handle)
            }
            NativeHash::SetSequenceToRepeat => {
                if let Some(sequence) = self.sequences.get_mut(&int(args, 0)) {
                    sequence.repeat = boolean(args, 1);
                }
                NativeValue::Void
            }
            NativeHash::CloseSequenceTask => {
                let handle = int(args, 0);
                if let Some(sequence) = self.sequences.get_mut(&handle) {
                    sequence.open = false;
                }
                if self.recording == Some(handle) {
                    self.recording = None;
                }
                NativeValue::Void
            }
            NativeHash::ClearSequenceTask => {
                let handle = int(args, 0);
                self.sequences.remove(&handle);
                if self.recording == Some(handle) {
                    self.recording = None;
                }
                NativeValue::Void
            }
            NativeHash::GetSequenceProgress => {
                let progress = self
                    .actors
                    .get(&int(args, 0))
                    .and_then(|actor| actor.sequence.as_ref())
                    .map_or(-1, |sequence| sequence.progress as i32);
                NativeValue::Int(progress)
            }
            NativeHash::GetScriptTaskStatus => {
                NativeValue::Int(self.script_task_status(int(args, 0), int(args, 1) as u32))
            }

            NativeHash::RequestAnimDict => {
                let frame = self.frame;
                self.anim_requests.entry(string(args, 0)).or_insert(frame);
                NativeValue::Void
            }
            NativeHash::HasAnimDictLoaded => {
                let loaded = match (self.anim_load_frames, self.anim_requests.get(&string(args, 0))) {
                    (Some(frames), Some(requested)) => self.frame >= requested + frames,
                    _ => false,
                };
                NativeValue::Bool(loaded)
            }

            NativeHash::TaskFlushRoute => {
                self.route.clear();
                NativeValue::Void
            }
            NativeHash::TaskExtendRoute => {
                self.route
                    .push([float(args, 0), float(args, 1), float(args, 2)]);
                NativeValue::Void
            }

            NativeHash::CreateGroup => {
                if self.groups.len() >= self.group_capacity {
                    return NativeValue::Int(0);
                }
                let handle = self.alloc_handle();
                self.groups.insert(handle, SimGroup::default());
                NativeValue::Int(handle)
            }
            NativeHash::RemoveGroup => {
                self.groups.remove(&int(args, 0));
                NativeValue::Void
            }
            NativeHash::DoesGroupExist => NativeValue::Bool(self.groups.contains_key(&int(args, 0))),
            NativeHash::GetPedGroupIndex => {
                let actor = int(args, 0);
                let group = self
                    .groups
                    .iter()
                    .find(|(_, group)| group.contains(actor))
                    .map_or(0, |(handle, _)| *handle);
                NativeValue::Int(group)
            }
            NativeHash::GetGroupSize => {
                let size = self
                    .groups
                    .get(&int(args, 0))
                    .map_or(0, |group| group.slots.iter().flatten().count());
                NativeValue::Int(size as i32)
            }
            NativeHash::GetPedAsGroupLeader => NativeValue::Int(
                self.groups
                    .get(&int(args, 0))
                    .and_then(|group| group.leader)
                    .unwrap_or(0),
            ),
            NativeHash::GetPedAsGroupMember => {
                let index = int(args, 1);
                let member = self
                    .groups
                    .get(&int(args, 0))
                    .and_then(|group| usize::try_from(index).ok().and_then(|i| group.slots.get(i)))
                    .copied()
                    .flatten()
                    .unwrap_or(0);
                NativeValue::Int(member)
            }
            NativeHash::SetPedAsGroupLeader => {
                let (actor, handle) = (int(args, 0), int(args, 1));
                if self.actors.contains_key(&actor) && self.groups.contains_key(&handle) {
                    self.leave_groups(actor);
                    if let Some(group) = self.groups.get_mut(&handle) {
                        group.leader = Some(actor);
                    }
                }
                NativeValue::Void
            }
            NativeHash::SetPedAsGroupMember => {
                let (actor, handle) = (int(args, 0), int(args, 1));
                let joinable = self.actors.contains_key(&actor)
                    && self
                        .groups
                        .get(&handle)
                        .is_some_and(|group| !group.contains(actor) && group.slots.contains(&None));
                if joinable {
                    self.leave_groups(actor);
                    if let Some(slot) = self
                        .groups
                        .get_mut(&handle)
                        .and_then(|group| group.slots.iter_mut().find(|slot| slot.is_none()))
                    {
                        *slot = Some(actor);
                    }
                }
                NativeValue::Void
            }
            NativeHash::RemovePedFromGroup => {
                let actor = int(args, 0);
                self.leave_groups(actor);
                if let Some(actor) = self.actors.get_mut(&actor) {
                    actor.config_flags.remove(&ConfigFlag::NEVER_LEAVES_GROUP.code());
                }
                NativeValue::Void
            }
            NativeHash::IsPedGroupMember => NativeValue::Bool(
                self.groups
                    .get(&int(args, 1))
                    .is_some_and(|group| group.contains(int(args, 0))),
            ),
            NativeHash::SetGroupSeparationRange => {
                if let Some(group) = self.groups.get_mut(&int(args, 0)) {
                    group.separation_range = float(args, 1);
                }
                NativeValue::Void
            }
            NativeHash::SetGroupFormation => {
                if let Some(group) = self.groups.get_mut(&int(args, 0)) {
                    group.formation = int(args, 1);
                }
                NativeValue::Void
            }

            NativeHash::HasPedReceivedEvent => NativeValue::Bool(
                self.actors
                    .get(&int(args, 0))
                    .is_some_and(|actor| actor.received.contains(&int(args, 1))),
            ),
            NativeHash::GetNumberOfEvents => NativeValue::Int(self.events.len() as i32),
            NativeHash::GetEventAtIndex => {
                let code = usize::try_from(int(args, 1))
                    .ok()
                    .and_then(|index| self.events.get(index))
                    .copied()
                    .unwrap_or(-1);
                NativeValue::Int(code)
            }

            hash if is_actor_command(hash) => {
                let command = Command {
                    hash,
                    args: args.to_vec(),
                };
                match int(args, 0) {
                    0 => {
                        if let Some(sequence) = self
                            .recording
                            .and_then(|handle| self.sequences.get_mut(&handle))
                        {
                            sequence.commands.push(command);
                        }
                    }
                    actor => self.apply(actor, command),
                }
                NativeValue::Void
            }

            _ => NativeValue::Void,
        }
    }

    fn leave_groups(&mut self, actor: i32) {
        for group in self.groups.values_mut() {
            group.remove(actor);
        }
    }

    fn apply(&mut self, handle: i32, command: Command) {
        let frame = self.frame;
        let Some(actor) = self.actors.get_mut(&handle) else {
            return;
        };

        match command.hash {
            NativeHash::ClearPedTasks | NativeHash::ClearPedTasksImmediately => {
                actor.primary = None;
                actor.sequence = None;
            }
            NativeHash::ClearPedSecondaryTask | NativeHash::TaskClearLookAt => {
                actor.secondary = None;
            }
            NativeHash::StopAnimTask => {
                if actor.primary.as_ref().is_some_and(|task| task.hash == NativeHash::TaskPlayAnim) {
                    actor.primary = None;
                }
                if actor.secondary == Some(NativeHash::TaskPlayAnim) {
                    actor.secondary = None;
                }
            }
            NativeHash::TaskLookAtEntity | NativeHash::TaskLookAtCoord => {
                actor.secondary = Some(command.hash);
            }
            NativeHash::TaskPlayAnim
                if AnimationFlags(int(&command.args, 6) as u32).contains(AnimationFlags::SECONDARY) =>
            {
                actor.secondary = Some(command.hash);
            }
            NativeHash::TaskPerformSequence => {
                let Some(sequence) = self.sequences.get(&int(&command.args, 1)) else {
                    return;
                };
                if sequence.open || sequence.commands.is_empty() {
                    return;
                }
                actor.primary = Some(RunningTask::start(&sequence.commands[0], frame));
                actor.sequence = Some(RunningSequence {
                    commands: sequence.commands.clone(),
                    progress: 0,
                    repeat: sequence.repeat,
                    started: frame,
                });
            }
            _ => {
                actor.sequence = None;
                actor.primary = Some(RunningTask::start(&command, frame));
            }
        }
    }

    fn script_task_status(&self, handle: i32, task: u32) -> i32 {
        let Some(actor) = self.actors.get(&handle) else {
            return STATUS_FINISHED;
        };
        let task = ScriptTask(task);

        if task == ScriptTask::PERFORM_SEQUENCE {
            return match &actor.sequence {
                Some(sequence) if sequence.progress < sequence.commands.len() => {
                    if sequence.started == self.frame {
                        STATUS_WAITING_TO_START
                    } else {
                        STATUS_PERFORMING
                    }
                }
                _ => STATUS_FINISHED,
            };
        }

        if let Some(primary) = &actor.primary {
            if actor.sequence.is_none() && ScriptTask::of(primary.hash) == Some(task) {
                return if primary.started == self.frame {
                    STATUS_WAITING_TO_START
                } else {
                    STATUS_PERFORMING
                };
            }
        }
        if actor.secondary.and_then(ScriptTask::of) == Some(task) {
            return STATUS_PERFORMING;
        }
        STATUS_FINISHED
    }
}

fn set_flag(flags: &mut HashSet<i32>, code: i32, value: bool) {
    if value {
        flags.insert(code);
    } else {
        flags.remove(&code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_are_logged_in_order() {
        let host = SimulatedHost::new(None);
        host.invoke(NativeHash::GetFrameCount, &[]);
        host.invoke(NativeHash::TaskFlushRoute, &[]);

        let calls = host.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].hash, NativeHash::GetFrameCount);
        assert_eq!(calls[1].hash, NativeHash::TaskFlushRoute);
        assert_eq!(host.calls_to(NativeHash::TaskFlushRoute), 1);
    }

    #[test]
    fn test_reset_flags_cleared_each_frame() {
        let host = SimulatedHost::new(None);
        let actor = host.spawn_actor();
        let args: [NativeArg; 3] = [actor.into(), 46.into(), true.into()];
        host.invoke(NativeHash::SetPedResetFlag, &args);
        host.invoke(NativeHash::SetPedConfigFlag, &args);

        host.advance_frame();
        let query: [NativeArg; 2] = [actor.into(), 46.into()];
        assert!(!host.invoke(NativeHash::GetPedResetFlag, &query).as_bool());
        assert!(host.invoke(NativeHash::GetPedConfigFlag, &query).as_bool());
    }

    #[test]
    fn test_timed_task_finishes() {
        let host = SimulatedHost::new(None);
        let actor = host.spawn_actor();
        host.invoke(NativeHash::TaskPause, &[actor.into(), 250.into()]);

        host.advance_frames(2);
        assert_eq!(host.current_task(actor), Some(NativeHash::TaskPause));
        host.advance_frame();
        assert_eq!(host.current_task(actor), None);
    }

    #[test]
    fn test_open_ended_task_keeps_running() {
        let host = SimulatedHost::new(None);
        let actor = host.spawn_actor();
        host.invoke(NativeHash::TaskWanderStandard, &[actor.into(), 10.0f32.into(), 10.into()]);
        host.advance_frames(50);
        assert_eq!(host.current_task(actor), Some(NativeHash::TaskWanderStandard));
    }

    #[test]
    fn test_anim_dictionary_load_delay() {
        let host = SimulatedHost::new(None);
        host.set_anim_load_frames(Some(2));
        let dict: [NativeArg; 1] = ["dict".into()];
        host.invoke(NativeHash::RequestAnimDict, &dict);
        assert!(!host.invoke(NativeHash::HasAnimDictLoaded, &dict).as_bool());
        host.advance_frames(2);
        assert!(host.invoke(NativeHash::HasAnimDictLoaded, &dict).as_bool());
    }

    #[test]
    fn test_removal_clears_never_leaves_group() {
        let host = SimulatedHost::new(None);
        let actor = host.spawn_actor();
        let group = host.create_group_with(None, &[Some(actor)]);
        host.invoke(
            NativeHash::SetPedConfigFlag,
            &[actor.into(), ConfigFlag::NEVER_LEAVES_GROUP.code().into(), true.into()],
        );

        host.invoke(NativeHash::RemovePedFromGroup, &[actor.into()]);
        assert!(!host
            .invoke(NativeHash::IsPedGroupMember, &[actor.into(), group.into()])
            .as_bool());
        assert!(!host
            .invoke(
                NativeHash::GetPedConfigFlag,
                &[actor.into(), ConfigFlag::NEVER_LEAVES_GROUP.code().into(), true.into()],
            )
            .as_bool());
    }
}
