//! Script context and public API
//!
//! This module provides [`ScriptContext`], the object a script holds for its
//! whole lifetime. It owns the native bridge, the detected host build and the
//! recording slot, and hands out the per-actor command, flag and status views.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

// Submodules
pub mod config;
pub mod error;
pub mod event;
pub mod flags;
pub mod group;
pub mod handle;
pub mod memory;
pub mod native;
pub mod sequence;
pub mod sim;
pub mod status;
pub mod task;
pub mod version;

use error::{ArgumentError, Result, ScriptError, SequenceError};
use event::EventQueue;
use flags::BehaviorFlags;
use group::Group;
use handle::{ActorRef, GroupRef};
use memory::{ActorMemory, OffsetResolver};
use native::{NativeArg, NativeBridge, NativeHash, NativeValue};
use sequence::TaskSequence;
use status::TaskStatus;
use task::TaskIssuer;
use version::HostVersion;

/// Default deadline for resource-dependent commands
pub const DEFAULT_RESOURCE_LOAD_TIMEOUT_MS: u64 = 1000;

/// Configuration for a script context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// How long resource-dependent commands wait for their resource (ms)
    pub resource_load_timeout_ms: u64,

    /// Force a host build instead of asking the bridge
    pub host_version: Option<HostVersion>,

    /// Enable debug tracing of every native call
    pub debug: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            resource_load_timeout_ms: DEFAULT_RESOURCE_LOAD_TIMEOUT_MS,
            host_version: None,
            debug: false,
        }
    }
}

/// Identity of a script context, used to correlate log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptId(pub Uuid);

impl ScriptId {
    /// Create a new random ScriptId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScriptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A running script's view of the host
pub struct ScriptContext {
    id: ScriptId,
    config: ScriptConfig,
    bridge: Arc<dyn NativeBridge>,
    version: HostVersion,
    /// Handle of the sequence currently recording, if any
    recording: Mutex<Option<i32>>,
}

impl ScriptContext {
    /// Create a context over `bridge`.
    ///
    /// The host build comes from the config override, then the bridge. An
    /// undetectable build is treated as the latest known one.
    pub fn new(bridge: Arc<dyn NativeBridge>, config: ScriptConfig) -> Result<Self> {
        if config.resource_load_timeout_ms == 0 {
            return Err(ScriptError::Config(
                "resource_load_timeout_ms must be greater than zero".to_string(),
            ));
        }

        let id = ScriptId::new();
        let version = match config.host_version.or_else(|| bridge.host_version()) {
            Some(version) => version,
            None => {
                tracing::warn!(script = %id, "host version not detected, assuming latest");
                HostVersion::latest()
            }
        };

        tracing::info!(script = %id, version = %version, "script context created");

        Ok(Self {
            id,
            config,
            bridge,
            version,
            recording: Mutex::new(None),
        })
    }

    /// Context identity
    pub fn id(&self) -> ScriptId {
        self.id
    }

    /// Get the current configuration
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Host build this context translates for
    pub fn version(&self) -> HostVersion {
        self.version
    }

    /// The underlying bridge
    pub fn bridge(&self) -> &dyn NativeBridge {
        self.bridge.as_ref()
    }

    /// Host frame counter
    pub fn frame_count(&self) -> u64 {
        self.bridge.invoke(NativeHash::GetFrameCount, &[]).as_int().max(0) as u64
    }

    /// Call a native, refusing those the detected build does not export
    pub(crate) fn invoke(&self, hash: NativeHash, args: &[NativeArg]) -> Result<NativeValue> {
        if let Some(since) = hash.introduced_in() {
            self.version.require(format!("{:?}", hash), since)?;
        }
        if self.config.debug {
            tracing::debug!(script = %self.id, native = %hash, ?args, "invoke");
        }
        Ok(self.bridge.invoke(hash, args))
    }

    /// Command issuer bound to a real actor
    pub fn tasks(&self, actor: ActorRef) -> Result<TaskIssuer<'_>> {
        require_actor(actor)?;
        Ok(TaskIssuer::for_actor(self, actor))
    }

    /// Behavior flags of an actor
    pub fn flags(&self, actor: ActorRef) -> Result<BehaviorFlags<'_>> {
        require_actor(actor)?;
        Ok(BehaviorFlags::new(self, actor))
    }

    /// Task status queries for an actor
    pub fn status(&self, actor: ActorRef) -> Result<TaskStatus<'_>> {
        require_actor(actor)?;
        Ok(TaskStatus::new(self, actor))
    }

    /// Memory-backed properties of an actor
    pub fn memory<'a>(
        &'a self,
        actor: ActorRef,
        resolver: &'a dyn OffsetResolver,
    ) -> Result<ActorMemory<'a>> {
        require_actor(actor)?;
        Ok(ActorMemory::new(self, actor, resolver))
    }

    /// The script AI event queue
    pub fn events(&self) -> EventQueue<'_> {
        EventQueue::new(self)
    }

    /// Open a new sequence for recording
    pub fn open_sequence(&self) -> Result<TaskSequence<'_>> {
        TaskSequence::open(self)
    }

    /// Handle to an existing group
    pub fn group(&self, group: GroupRef) -> Group<'_> {
        Group::new(self, group)
    }

    /// Create a new group. `None` if the host has no free group slot.
    pub fn create_group(&self) -> Result<Option<Group<'_>>> {
        let raw = self.invoke(NativeHash::CreateGroup, &[0.into()])?.as_int();
        Ok((raw != 0).then(|| Group::new(self, GroupRef(raw))))
    }

    /// The group an actor belongs to, if any
    pub fn group_of(&self, actor: ActorRef) -> Result<Option<Group<'_>>> {
        require_actor(actor)?;
        let raw = self
            .invoke(NativeHash::GetPedGroupIndex, &[actor.into()])?
            .as_int();
        if raw == 0 {
            return Ok(None);
        }
        let group = Group::new(self, GroupRef(raw));
        Ok(group.exists()?.then_some(group))
    }

    /// Claim the recording slot, asking the host for a sequence via `request`.
    ///
    /// The slot stays locked across the host call so a second recorder can
    /// never reach the host while one is open.
    pub(crate) fn claim_recording(&self, request: impl FnOnce() -> Result<i32>) -> Result<i32> {
        let mut recording = self.recording.lock();
        if let Some(open) = *recording {
            return Err(SequenceError::AlreadyRecording { open }.into());
        }
        let handle = request()?;
        if handle == 0 {
            return Err(SequenceError::SlotUnavailable.into());
        }
        *recording = Some(handle);
        Ok(handle)
    }

    /// Release the recording slot if `handle` holds it
    pub(crate) fn end_recording(&self, handle: i32) {
        let mut recording = self.recording.lock();
        if *recording == Some(handle) {
            *recording = None;
        }
    }

    /// Handle of the sequence currently recording
    pub fn recording_sequence(&self) -> Option<i32> {
        *self.recording.lock()
    }
}

fn require_actor(actor: ActorRef) -> std::result::Result<(), ArgumentError> {
    if actor.is_null() {
        Err(ArgumentError::MissingReference("actor"))
    } else {
        Ok(())
    }
}

// Re-export commonly used types
pub use handle::{Vec3, VehicleRef};
pub use sim::SimulatedHost;
