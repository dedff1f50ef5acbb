//! Integration tests for host build compatibility
//!
//! Event codes shifted when members were inserted mid-enumeration; these
//! tests check the translation table and its use by the event queue.

use proptest::prelude::*;
use std::sync::Arc;

use taskline::runtime::error::{ScriptError, VersionError};
use taskline::runtime::event::{EVENT_TRANSLATOR, EventKind};
use taskline::runtime::version::HostVersion;
use taskline::runtime::{ScriptConfig, ScriptContext, SimulatedHost};

const PRE_INSERTION: HostVersion = HostVersion::V1_0_757_2;

#[test]
fn test_code_before_both_insertions_unchanged() {
    let kind = EventKind::AcquaintancePedDead;
    assert_eq!(kind.to_host(PRE_INSERTION).unwrap(), kind.canonical());
}

#[test]
fn test_code_between_insertions_minus_one() {
    let kind = EventKind::Explosion;
    assert_eq!(kind.to_host(PRE_INSERTION).unwrap(), kind.canonical() - 1);
}

#[test]
fn test_code_after_insertions_minus_two() {
    let kind = EventKind::ShovePed;
    assert_eq!(kind.to_host(PRE_INSERTION).unwrap(), kind.canonical() - 2);
}

#[test]
fn test_inserted_code_unsupported() {
    let err = EventKind::Incapacitated.to_host(PRE_INSERTION).unwrap_err();
    assert!(matches!(
        err,
        ScriptError::Version(VersionError::UnsupportedInVersion {
            since: HostVersion::V1_0_877_1,
            ..
        })
    ));
}

#[test]
fn test_event_queue_translates_both_ways() {
    let host = Arc::new(SimulatedHost::new(Some(PRE_INSERTION)));
    let ctx = ScriptContext::new(host.clone(), ScriptConfig::default()).unwrap();
    let actor = host.spawn_actor();

    // Host codes as the old build reports them
    host.push_event(EventKind::Agitated.canonical());
    host.push_event(EventKind::ShockingFire.canonical() - 2);
    host.push_event(999);
    host.deliver_event(actor, EventKind::InWater.canonical() - 1);

    let events = ctx.events();
    assert_eq!(
        events.pending().unwrap(),
        vec![EventKind::Agitated, EventKind::ShockingFire]
    );
    assert!(events.has_received(actor, EventKind::InWater).unwrap());
    assert!(!events.has_received(actor, EventKind::InAir).unwrap());
    assert!(events.has_received(actor, EventKind::EncroachingPed).is_err());

    host.advance_frame();
    assert!(events.pending().unwrap().is_empty());
}

#[test]
fn test_undetected_build_treated_as_latest() {
    let host = Arc::new(SimulatedHost::new(None));
    let ctx = ScriptContext::new(host, ScriptConfig::default()).unwrap();
    assert_eq!(ctx.version(), HostVersion::latest());
    assert_eq!(
        EventKind::ShockingPedShot.to_host(ctx.version()).unwrap(),
        EventKind::ShockingPedShot.canonical()
    );
}

#[test]
fn test_config_override_wins_over_bridge() {
    let host = Arc::new(SimulatedHost::new(Some(HostVersion::latest())));
    let config = ScriptConfig {
        host_version: Some(PRE_INSERTION),
        ..ScriptConfig::default()
    };
    let ctx = ScriptContext::new(host, config).unwrap();
    assert_eq!(ctx.version(), PRE_INSERTION);
}

fn any_version() -> impl Strategy<Value = HostVersion> {
    (0..HostVersion::ALL.len()).prop_map(|i| HostVersion::ALL[i])
}

fn any_event() -> impl Strategy<Value = EventKind> {
    (0..EventKind::ALL.len()).prop_map(|i| EventKind::ALL[i])
}

proptest! {
    /// Property: the latest build never shifts anything
    #[test]
    fn prop_latest_is_identity(kind in any_event()) {
        prop_assert_eq!(kind.to_host(HostVersion::latest()).unwrap(), kind.canonical());
    }

    /// Property: a translated code maps back to the same event
    #[test]
    fn prop_reverse_recovers_event(kind in any_event(), version in any_version()) {
        if let Ok(code) = kind.to_host(version) {
            prop_assert_eq!(EventKind::from_host(code, version), Some(kind));
        }
    }

    /// Property: translation keeps canonical order among supported members
    #[test]
    fn prop_order_preserved(a in any_event(), b in any_event(), version in any_version()) {
        if let (Ok(x), Ok(y)) = (a.to_host(version), b.to_host(version)) {
            prop_assert_eq!(a.cmp(&b), x.cmp(&y));
        }
    }

    /// Property: shift never exceeds the number of missing insertions
    #[test]
    fn prop_shift_bounded(kind in any_event(), version in any_version()) {
        if let Ok(code) = kind.to_host(version) {
            let shift = kind.canonical() - code;
            prop_assert!((0..=2).contains(&shift));
        }
    }

    /// Property: out-of-range values are rejected, never wrapped
    #[test]
    fn prop_out_of_range_rejected(value in EVENT_TRANSLATOR.len()..1000, version in any_version()) {
        prop_assert!(EVENT_TRANSLATOR.to_host(value, version).is_err());
    }
}
