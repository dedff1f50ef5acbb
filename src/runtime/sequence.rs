//! Task sequences
//!
//! A sequence is an ordered list of commands recorded once and later attached
//! to an actor, which runs them one after another. Recording goes through the
//! issuer returned by [`TaskSequence::tasks`]; it is bound to no actor, and
//! its commands land in this sequence and nowhere else.
//!
//! A context records at most one sequence at a time. Opening a second one
//! while the first is still open fails with
//! [`SequenceError::AlreadyRecording`](super::error::SequenceError::AlreadyRecording).

use serde::{Deserialize, Serialize};
use std::cell::Cell;

use super::ScriptContext;
use super::error::{ArgumentError, Result};
use super::native::NativeHash;
use super::task::TaskIssuer;

/// Lifecycle of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceState {
    /// Accepting commands
    Open,
    /// Frozen, can be performed
    Closed,
    /// Returned to the host
    Released,
}

/// A recorded command list owned by the host
pub struct TaskSequence<'ctx> {
    ctx: &'ctx ScriptContext,
    handle: i32,
    state: SequenceState,
    repeat: bool,
    count: Cell<usize>,
}

impl<'ctx> TaskSequence<'ctx> {
    pub(crate) fn open(ctx: &'ctx ScriptContext) -> Result<Self> {
        let handle = ctx.claim_recording(|| {
            Ok(ctx.invoke(NativeHash::OpenSequenceTask, &[])?.as_int())
        })?;

        tracing::debug!(script = %ctx.id(), handle, "sequence opened");

        Ok(Self {
            ctx,
            handle,
            state: SequenceState::Open,
            repeat: false,
            count: Cell::new(0),
        })
    }

    /// Host handle
    pub fn handle(&self) -> i32 {
        self.handle
    }

    /// Current lifecycle state
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Whether commands can still be added
    pub fn is_open(&self) -> bool {
        self.state == SequenceState::Open
    }

    /// Whether the sequence was closed with repeat set
    pub fn repeats(&self) -> bool {
        self.repeat
    }

    /// Number of commands recorded so far
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Issuer that records into this sequence.
    ///
    /// Fails once the sequence is closed, before any host call.
    pub fn tasks(&self) -> Result<TaskIssuer<'_>> {
        if self.state != SequenceState::Open {
            return Err(ArgumentError::SequenceNotOpen {
                handle: self.handle,
            }
            .into());
        }
        Ok(TaskIssuer::recording(self.ctx, &self.count))
    }

    /// Stop recording. With `repeat` the actor loops the sequence until its
    /// tasks are cleared. Closing a closed sequence does nothing.
    pub fn close(&mut self, repeat: bool) -> Result<()> {
        match self.state {
            SequenceState::Open => {}
            SequenceState::Closed => return Ok(()),
            SequenceState::Released => {
                return Err(ArgumentError::SequenceReleased {
                    handle: self.handle,
                }
                .into());
            }
        }

        let result = self.finish(repeat);
        self.state = SequenceState::Closed;
        self.repeat = repeat;
        self.ctx.end_recording(self.handle);

        tracing::debug!(
            handle = self.handle,
            commands = self.count(),
            repeat,
            "sequence closed"
        );
        result
    }

    fn finish(&self, repeat: bool) -> Result<()> {
        self.ctx.invoke(
            NativeHash::SetSequenceToRepeat,
            &[self.handle.into(), repeat.into()],
        )?;
        self.ctx
            .invoke(NativeHash::CloseSequenceTask, &[self.handle.into()])?;
        Ok(())
    }

    /// Return the sequence to the host, closing it first if needed.
    /// Actors already performing it keep going. Releasing twice does nothing.
    pub fn release(&mut self) -> Result<()> {
        if self.state == SequenceState::Released {
            return Ok(());
        }
        if self.state == SequenceState::Open {
            self.close(false)?;
        }

        self.state = SequenceState::Released;
        self.ctx
            .invoke(NativeHash::ClearSequenceTask, &[self.handle.into()])?;
        tracing::debug!(handle = self.handle, "sequence released");
        Ok(())
    }

    /// Close if still open and hand back the handle to perform
    pub(crate) fn prepare_for_perform(&mut self) -> Result<i32> {
        match self.state {
            SequenceState::Released => Err(ArgumentError::SequenceReleased {
                handle: self.handle,
            }
            .into()),
            SequenceState::Open => {
                self.close(false)?;
                Ok(self.handle)
            }
            SequenceState::Closed => Ok(self.handle),
        }
    }
}

impl Drop for TaskSequence<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(handle = self.handle, error = %e, "failed to release sequence");
        }
    }
}
