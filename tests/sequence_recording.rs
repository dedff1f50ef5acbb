//! Integration tests for sequence recording and performance
//!
//! Tests the flow from opening a sequence through recording, closing and
//! attaching it to an actor, observed only by polling.

use std::sync::Arc;

use taskline::runtime::error::{ArgumentError, ScriptError};
use taskline::runtime::native::NativeHash;
use taskline::runtime::sequence::SequenceState;
use taskline::runtime::status::{ScriptTask, ScriptTaskStatus};
use taskline::runtime::version::HostVersion;
use taskline::runtime::{ScriptConfig, ScriptContext, SimulatedHost, Vec3};

fn setup() -> (Arc<SimulatedHost>, ScriptContext) {
    let host = Arc::new(SimulatedHost::new(Some(HostVersion::latest())));
    let ctx = ScriptContext::new(host.clone(), ScriptConfig::default()).unwrap();
    (host, ctx)
}

#[test]
fn test_progress_is_monotonic_through_every_step() {
    let (host, ctx) = setup();
    let actor = host.spawn_actor();

    let mut sequence = ctx.open_sequence().unwrap();
    {
        let tasks = sequence.tasks().unwrap();
        tasks.wait(500).unwrap();
        tasks.go_to(Vec3::new(0.0, 0.0, 0.0)).unwrap();
        tasks.wait(500).unwrap();
    }
    sequence.close(false).unwrap();
    assert_eq!(sequence.count(), 3);

    ctx.tasks(actor).unwrap().perform_sequence(&mut sequence).unwrap();

    let status = ctx.status(actor).unwrap();
    let mut observed = Vec::new();
    for _ in 0..20 {
        observed.push(status.sequence_progress().unwrap().unwrap());
        host.advance_frame();
    }

    for pair in observed.windows(2) {
        assert!(pair[1] >= pair[0], "progress regressed: {:?}", observed);
        assert!(pair[1] - pair[0] <= 1, "progress skipped: {:?}", observed);
    }
    let mut distinct = observed.clone();
    distinct.dedup();
    assert_eq!(distinct, vec![0, 1, 2, 3]);
    assert_eq!(
        status.script_task(ScriptTask::PERFORM_SEQUENCE).unwrap(),
        ScriptTaskStatus::Finished
    );
}

#[test]
fn test_perform_reports_status_by_polling_only() {
    let (host, ctx) = setup();
    let actor = host.spawn_actor();

    let mut sequence = ctx.open_sequence().unwrap();
    sequence.tasks().unwrap().wait(200).unwrap();
    ctx.tasks(actor).unwrap().perform_sequence(&mut sequence).unwrap();

    let status = ctx.status(actor).unwrap();
    assert_eq!(
        status.script_task(ScriptTask::PERFORM_SEQUENCE).unwrap(),
        ScriptTaskStatus::WaitingToStart
    );
    host.advance_frame();
    assert_eq!(
        status.script_task(ScriptTask::PERFORM_SEQUENCE).unwrap(),
        ScriptTaskStatus::Performing
    );
    host.advance_frame();
    assert!(!status.is_performing(NativeHash::TaskPerformSequence).unwrap());
}

#[test]
fn test_repeating_sequence_wraps() {
    let (host, ctx) = setup();
    let actor = host.spawn_actor();

    let mut sequence = ctx.open_sequence().unwrap();
    {
        let tasks = sequence.tasks().unwrap();
        tasks.wait(100).unwrap();
        tasks.wait(100).unwrap();
    }
    sequence.close(true).unwrap();
    ctx.tasks(actor).unwrap().perform_sequence(&mut sequence).unwrap();

    let status = ctx.status(actor).unwrap();
    assert_eq!(status.sequence_progress().unwrap(), Some(0));
    host.advance_frame();
    assert_eq!(status.sequence_progress().unwrap(), Some(1));
    host.advance_frame();
    assert_eq!(status.sequence_progress().unwrap(), Some(0));
    assert!(status.is_performing(NativeHash::TaskPerformSequence).unwrap());

    ctx.tasks(actor).unwrap().clear_all().unwrap();
    assert_eq!(status.sequence_progress().unwrap(), None);
}

#[test]
fn test_released_sequence_keeps_running() {
    let (host, ctx) = setup();
    let actor = host.spawn_actor();

    let mut sequence = ctx.open_sequence().unwrap();
    {
        let tasks = sequence.tasks().unwrap();
        tasks.wait(100).unwrap();
        tasks.stand_still(200).unwrap();
    }
    ctx.tasks(actor).unwrap().perform_sequence(&mut sequence).unwrap();
    sequence.release().unwrap();
    assert_eq!(sequence.state(), SequenceState::Released);

    host.advance_frame();
    assert_eq!(host.current_task(actor), Some(NativeHash::TaskStandStill));
    assert_eq!(ctx.status(actor).unwrap().sequence_progress().unwrap(), Some(1));
}

#[test]
fn test_one_sequence_performed_by_two_actors() {
    let (host, ctx) = setup();
    let first = host.spawn_actor();
    let second = host.spawn_actor();

    let mut sequence = ctx.open_sequence().unwrap();
    sequence.tasks().unwrap().cower(300).unwrap();
    sequence.close(false).unwrap();

    ctx.tasks(first).unwrap().perform_sequence(&mut sequence).unwrap();
    host.advance_frame();
    ctx.tasks(second).unwrap().perform_sequence(&mut sequence).unwrap();

    assert_eq!(host.current_task(first), Some(NativeHash::TaskCower));
    assert_eq!(host.current_task(second), Some(NativeHash::TaskCower));
    host.advance_frames(2);
    assert_eq!(host.current_task(first), None);
    assert_eq!(host.current_task(second), Some(NativeHash::TaskCower));
}

#[test]
fn test_recorded_commands_do_not_touch_actors() {
    let (host, ctx) = setup();
    let actor = host.spawn_actor();
    ctx.tasks(actor).unwrap().wander_around().unwrap();

    let mut sequence = ctx.open_sequence().unwrap();
    sequence.tasks().unwrap().jump().unwrap();
    sequence.close(false).unwrap();

    assert_eq!(host.current_task(actor), Some(NativeHash::TaskWanderStandard));
    assert_eq!(host.sequence_len(sequence.handle()), Some(1));
}

#[test]
fn test_add_after_close_issues_no_calls() {
    let (host, ctx) = setup();
    let mut sequence = ctx.open_sequence().unwrap();
    sequence.close(false).unwrap();
    let before = host.call_count();

    for _ in 0..3 {
        assert!(matches!(
            sequence.tasks().err(),
            Some(ScriptError::Argument(ArgumentError::SequenceNotOpen { .. }))
        ));
    }
    sequence.close(true).unwrap();
    assert_eq!(host.call_count(), before);
    assert!(!sequence.repeats());
}

#[test]
fn test_contexts_record_independently() {
    let host = Arc::new(SimulatedHost::new(None));
    let first = ScriptContext::new(host.clone(), ScriptConfig::default()).unwrap();
    let second = ScriptContext::new(host.clone(), ScriptConfig::default()).unwrap();

    let mut open = first.open_sequence().unwrap();
    // The host itself has a single recording slot
    assert!(second.open_sequence().is_err());
    assert_eq!(second.recording_sequence(), None);

    open.close(false).unwrap();
    assert!(second.open_sequence().is_ok());
}
