//! Integration tests for behavior flags
//!
//! Persistent flags survive frames; per-frame flags must be reapplied every
//! frame to stay set.

use std::sync::Arc;

use taskline::runtime::flags::{ConfigFlag, ResetFlag};
use taskline::runtime::handle::ActorRef;
use taskline::runtime::version::HostVersion;
use taskline::runtime::{ScriptConfig, ScriptContext, SimulatedHost};

fn setup(version: HostVersion) -> (Arc<SimulatedHost>, ScriptContext) {
    let host = Arc::new(SimulatedHost::new(Some(version)));
    let ctx = ScriptContext::new(host.clone(), ScriptConfig::default()).unwrap();
    (host, ctx)
}

#[test]
fn test_reset_flag_lapses_after_one_frame() {
    let (host, ctx) = setup(HostVersion::latest());
    let actor = host.spawn_actor();
    let flags = ctx.flags(actor).unwrap();

    flags.set_reset(ResetFlag::DISABLE_PLAYER_VAULTING, true).unwrap();
    assert!(flags.reset(ResetFlag::DISABLE_PLAYER_VAULTING).unwrap().value());

    host.advance_frame();
    assert!(!flags.reset(ResetFlag::DISABLE_PLAYER_VAULTING).unwrap().value());
}

#[test]
fn test_reset_flag_held_by_reapplying_each_frame() {
    let (host, ctx) = setup(HostVersion::latest());
    let actor = host.spawn_actor();
    let flags = ctx.flags(actor).unwrap();

    for _ in 0..5 {
        flags.set_reset(ResetFlag::PREVENT_ALL_MELEE_TAUNTS, true).unwrap();
        let read = flags.reset(ResetFlag::PREVENT_ALL_MELEE_TAUNTS).unwrap();
        assert_eq!(read.get(&ctx), Some(true));
        host.advance_frame();
    }
}

#[test]
fn test_tick_value_tags_read_frame() {
    let (host, ctx) = setup(HostVersion::latest());
    let actor = host.spawn_actor();
    let flags = ctx.flags(actor).unwrap();

    let before = flags.reset(ResetFlag::SUPPRESS_IN_AIR_EVENT).unwrap();
    host.advance_frames(2);
    let after = flags.reset(ResetFlag::SUPPRESS_IN_AIR_EVENT).unwrap();

    assert_eq!(after.frame(), before.frame() + 2);
    assert!(!before.is_current(&ctx));
    assert!(after.is_current(&ctx));
}

#[test]
fn test_config_and_reset_spaces_are_disjoint() {
    let (host, ctx) = setup(HostVersion::latest());
    let actor = host.spawn_actor();
    let flags = ctx.flags(actor).unwrap();

    // Same numeric code in both spaces
    assert_eq!(ConfigFlag::IS_SHOOTING.code(), ResetFlag::DISABLE_SECONDARY_ANIMATION_TASKS.code());
    flags.set_config(ConfigFlag::IS_SHOOTING, true).unwrap();

    assert!(flags.config(ConfigFlag::IS_SHOOTING).unwrap());
    assert!(!flags
        .reset(ResetFlag::DISABLE_SECONDARY_ANIMATION_TASKS)
        .unwrap()
        .value());
}

#[test]
fn test_host_clears_config_flag_on_group_removal() {
    let (host, ctx) = setup(HostVersion::latest());
    let leader = host.spawn_actor();
    let member = host.spawn_actor();
    let group = ctx.create_group().unwrap().unwrap();
    group.set_leader(leader).unwrap();
    group.add_member(member).unwrap();

    let flags = ctx.flags(member).unwrap();
    flags.set_config(ConfigFlag::NEVER_LEAVES_GROUP, true).unwrap();
    host.advance_frames(10);
    assert!(flags.config(ConfigFlag::NEVER_LEAVES_GROUP).unwrap());

    group.remove_member(member).unwrap();
    assert!(!flags.config(ConfigFlag::NEVER_LEAVES_GROUP).unwrap());
}

#[test]
fn test_gating_follows_detected_build() {
    let (host, ctx) = setup(HostVersion::V1_0_791_2);
    let actor = host.spawn_actor();
    let flags = ctx.flags(actor).unwrap();

    assert!(flags.set_config(ConfigFlag::DISABLE_SHOCKING_EVENTS, true).is_ok());
    assert!(flags.set_reset(ResetFlag::DISABLE_ACTION_MODE, true).is_err());
    // Unnamed codes carry no gate
    assert!(flags.set_config(ConfigFlag(500), true).is_ok());
}

#[test]
fn test_null_actor_has_no_flags() {
    let (_host, ctx) = setup(HostVersion::latest());
    assert!(ctx.flags(ActorRef(0)).is_err());
}
