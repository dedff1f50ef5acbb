//! Poll-only task feedback
//!
//! Commands are fire-and-forget; the only way to learn what an actor is doing
//! is to ask on a later frame.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ScriptContext;
use super::error::Result;
use super::handle::ActorRef;
use super::native::{NativeHash, joaat};

/// Identifier of a script-issued task as the status query expects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptTask(pub u32);

impl ScriptTask {
    pub const PERFORM_SEQUENCE: ScriptTask = ScriptTask::from_name("SCRIPT_TASK_PERFORM_SEQUENCE");
    pub const PLAY_ANIM: ScriptTask = ScriptTask::from_name("SCRIPT_TASK_PLAY_ANIM");
    pub const PAUSE: ScriptTask = ScriptTask::from_name("SCRIPT_TASK_PAUSE");

    /// Hash a script task name
    pub const fn from_name(name: &str) -> Self {
        Self(joaat(name))
    }

    /// The task started by a command native, if it starts one
    pub fn of(hash: NativeHash) -> Option<Self> {
        hash.script_task_name().map(Self::from_name)
    }
}

impl fmt::Display for ScriptTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Status of a script task on an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptTaskStatus {
    /// Accepted but not started
    WaitingToStart,
    /// Running
    Performing,
    /// Waiting on a precondition
    DormantPreconditions,
    /// Not running (finished, replaced, or never issued)
    Finished,
}

impl ScriptTaskStatus {
    /// Decode the host's status code
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ScriptTaskStatus::WaitingToStart,
            1 => ScriptTaskStatus::Performing,
            2 => ScriptTaskStatus::DormantPreconditions,
            _ => ScriptTaskStatus::Finished,
        }
    }

    /// Whether the task is still pending or running
    pub fn is_active(self) -> bool {
        !matches!(self, ScriptTaskStatus::Finished)
    }
}

/// Status queries for one actor
pub struct TaskStatus<'a> {
    ctx: &'a ScriptContext,
    actor: ActorRef,
}

impl<'a> TaskStatus<'a> {
    pub(crate) fn new(ctx: &'a ScriptContext, actor: ActorRef) -> Self {
        Self { ctx, actor }
    }

    /// Index of the command the actor's sequence is on, `None` when no
    /// sequence is running
    pub fn sequence_progress(&self) -> Result<Option<u32>> {
        let progress = self
            .ctx
            .invoke(NativeHash::GetSequenceProgress, &[self.actor.into()])?
            .as_int();
        Ok(u32::try_from(progress).ok())
    }

    /// Status of a script task
    pub fn script_task(&self, task: ScriptTask) -> Result<ScriptTaskStatus> {
        let code = self
            .ctx
            .invoke(
                NativeHash::GetScriptTaskStatus,
                &[self.actor.into(), task.0.into()],
            )?
            .as_int();
        Ok(ScriptTaskStatus::from_code(code))
    }

    /// Whether the task a command native started is still active
    pub fn is_performing(&self, command: NativeHash) -> Result<bool> {
        match ScriptTask::of(command) {
            Some(task) => Ok(self.script_task(task)?.is_active()),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ScriptTaskStatus::from_code(1), ScriptTaskStatus::Performing);
        assert_eq!(ScriptTaskStatus::from_code(7), ScriptTaskStatus::Finished);
        assert!(!ScriptTaskStatus::Finished.is_active());
        assert!(ScriptTaskStatus::WaitingToStart.is_active());
    }

    #[test]
    fn test_script_task_of_command() {
        assert_eq!(
            ScriptTask::of(NativeHash::TaskPerformSequence),
            Some(ScriptTask::PERFORM_SEQUENCE)
        );
        assert_eq!(ScriptTask::of(NativeHash::GetFrameCount), None);
    }
}
