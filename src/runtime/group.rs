//! Actor groups
//!
//! A group has an optional leader and up to [`MAX_GROUP_MEMBERS`] member
//! slots. Slots can be empty while the group is live, so member lookups
//! return `None` rather than ending a walk.

use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use super::ScriptContext;
use super::error::{ArgumentError, Result};
use super::handle::{ActorRef, GroupRef};
use super::native::NativeHash;

/// Member slots per group, not counting the leader
pub const MAX_GROUP_MEMBERS: usize = 7;

/// How members arrange themselves around the leader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formation(pub i32);

impl Formation {
    pub const DEFAULT: Formation = Formation(0);
    pub const CIRCLE_AROUND_LEADER: Formation = Formation(1);
    pub const ALTERNATIVE_CIRCLE_AROUND_LEADER: Formation = Formation(2);
    pub const LINE_ABREAST: Formation = Formation(3);
    pub const SINGLE_FILE: Formation = Formation(4);
}

impl Default for Formation {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A host group
pub struct Group<'a> {
    ctx: &'a ScriptContext,
    group: GroupRef,
}

impl<'a> Group<'a> {
    pub(crate) fn new(ctx: &'a ScriptContext, group: GroupRef) -> Self {
        Self { ctx, group }
    }

    /// Host handle
    pub fn handle(&self) -> GroupRef {
        self.group
    }

    /// Whether the host still knows this group
    pub fn exists(&self) -> Result<bool> {
        Ok(self
            .ctx
            .invoke(NativeHash::DoesGroupExist, &[self.group.into()])?
            .as_bool())
    }

    /// The leader, if one is set
    pub fn leader(&self) -> Result<Option<ActorRef>> {
        let raw = self
            .ctx
            .invoke(NativeHash::GetPedAsGroupLeader, &[self.group.into()])?
            .as_int();
        Ok(ActorRef::from_raw(raw))
    }

    /// Number of members, not counting the leader
    pub fn member_count(&self) -> Result<usize> {
        let count = self
            .ctx
            .invoke(NativeHash::GetGroupSize, &[self.group.into()])?
            .as_int();
        Ok(count.max(0) as usize)
    }

    /// Actor in member slot `index`. An empty slot is `None`.
    pub fn member(&self, index: usize) -> Result<Option<ActorRef>> {
        if index >= MAX_GROUP_MEMBERS {
            return Err(ArgumentError::IndexOutOfRange {
                what: "group member",
                index: index as i64,
                min: 0,
                max: MAX_GROUP_MEMBERS as i64 - 1,
            }
            .into());
        }
        let raw = self
            .ctx
            .invoke(
                NativeHash::GetPedAsGroupMember,
                &[self.group.into(), (index as i32).into()],
            )?
            .as_int();
        Ok(ActorRef::from_raw(raw))
    }

    /// Walk the leader (optionally) and members, one host lookup per step.
    ///
    /// The member count is read now; each slot is looked up only when the
    /// walk reaches it. Empty slots are skipped.
    pub fn members(&self, include_leader: bool) -> Result<GroupMembers<'_>> {
        let count = self.member_count()?.min(MAX_GROUP_MEMBERS);
        Ok(GroupMembers {
            group: self,
            leader_pending: include_leader,
            next_index: 0,
            end: count,
        })
    }

    /// Whether `actor` is the leader or a member
    pub fn contains(&self, actor: ActorRef) -> Result<bool> {
        if actor.is_null() {
            return Ok(false);
        }
        Ok(self
            .ctx
            .invoke(
                NativeHash::IsPedGroupMember,
                &[actor.into(), self.group.into()],
            )?
            .as_bool())
    }

    /// Put `actor` in the first free member slot
    pub fn add_member(&self, actor: ActorRef) -> Result<()> {
        require_actor(actor)?;
        self.ctx.invoke(
            NativeHash::SetPedAsGroupMember,
            &[actor.into(), self.group.into()],
        )?;
        tracing::debug!(group = %self.group, %actor, "member added");
        Ok(())
    }

    /// Make `actor` the leader
    pub fn set_leader(&self, actor: ActorRef) -> Result<()> {
        require_actor(actor)?;
        self.ctx.invoke(
            NativeHash::SetPedAsGroupLeader,
            &[actor.into(), self.group.into()],
        )?;
        Ok(())
    }

    /// Remove `actor` from this group. Does nothing if it is not in it.
    pub fn remove_member(&self, actor: ActorRef) -> Result<()> {
        require_actor(actor)?;
        if !self.contains(actor)? {
            return Ok(());
        }
        self.ctx
            .invoke(NativeHash::RemovePedFromGroup, &[actor.into()])?;
        tracing::debug!(group = %self.group, %actor, "member removed");
        Ok(())
    }

    /// Distance at which members stop following the leader
    pub fn set_separation_range(&self, range: f32) -> Result<()> {
        if !(range.is_finite() && range > 0.0) {
            return Err(ArgumentError::InvalidValue {
                what: "range",
                detail: format!("{} must be positive", range),
            }
            .into());
        }
        self.ctx.invoke(
            NativeHash::SetGroupSeparationRange,
            &[self.group.into(), range.into()],
        )?;
        Ok(())
    }

    pub fn set_formation(&self, formation: Formation) -> Result<()> {
        self.ctx.invoke(
            NativeHash::SetGroupFormation,
            &[self.group.into(), formation.0.into()],
        )?;
        Ok(())
    }

    /// Delete the group. Its actors become ungrouped.
    pub fn delete(self) -> Result<()> {
        self.ctx
            .invoke(NativeHash::RemoveGroup, &[self.group.into()])?;
        tracing::debug!(group = %self.group, "group deleted");
        Ok(())
    }
}

fn require_actor(actor: ActorRef) -> std::result::Result<(), ArgumentError> {
    if actor.is_null() {
        Err(ArgumentError::MissingReference("actor"))
    } else {
        Ok(())
    }
}

/// Lazy walk over a group's leader and members
pub struct GroupMembers<'g> {
    group: &'g Group<'g>,
    leader_pending: bool,
    next_index: usize,
    end: usize,
}

impl Iterator for GroupMembers<'_> {
    type Item = Result<ActorRef>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.leader_pending {
            self.leader_pending = false;
            match self.group.leader() {
                Ok(Some(leader)) => return Some(Ok(leader)),
                Ok(None) => {}
                Err(e) => {
                    self.next_index = self.end;
                    return Some(Err(e));
                }
            }
        }

        while self.next_index < self.end {
            let index = self.next_index;
            self.next_index += 1;
            match self.group.member(index) {
                Ok(Some(actor)) => return Some(Ok(actor)),
                Ok(None) => {
                    tracing::trace!(group = %self.group.handle(), index, "empty member slot");
                }
                Err(e) => {
                    self.next_index = self.end;
                    return Some(Err(e));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = (self.end - self.next_index) + self.leader_pending as usize;
        (0, Some(upper))
    }
}

impl FusedIterator for GroupMembers<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::ScriptError;
    use crate::runtime::sim::SimulatedHost;
    use crate::runtime::ScriptConfig;
    use std::sync::Arc;

    fn context() -> (Arc<SimulatedHost>, ScriptContext) {
        let host = Arc::new(SimulatedHost::new(None));
        let ctx = ScriptContext::new(host.clone(), ScriptConfig::default()).unwrap();
        (host, ctx)
    }

    #[test]
    fn test_member_index_validated() {
        let (host, ctx) = context();
        let group = ctx.create_group().unwrap().unwrap();
        let before = host.call_count();

        assert!(matches!(
            group.member(MAX_GROUP_MEMBERS),
            Err(ScriptError::Argument(ArgumentError::IndexOutOfRange { .. }))
        ));
        assert_eq!(host.call_count(), before);
    }

    #[test]
    fn test_membership_lifecycle() {
        let (host, ctx) = context();
        let leader = host.spawn_actor();
        let member = host.spawn_actor();
        let group = ctx.create_group().unwrap().unwrap();

        group.set_leader(leader).unwrap();
        group.add_member(member).unwrap();
        assert_eq!(group.leader().unwrap(), Some(leader));
        assert_eq!(group.member_count().unwrap(), 1);
        assert!(group.contains(member).unwrap());
        assert_eq!(
            ctx.group_of(member).unwrap().map(|g| g.handle()),
            Some(group.handle())
        );

        group.remove_member(member).unwrap();
        assert!(!group.contains(member).unwrap());
        assert!(ctx.group_of(member).unwrap().is_none());

        let handle = group.handle();
        group.delete().unwrap();
        assert!(!ctx.group(handle).exists().unwrap());
    }

    #[test]
    fn test_group_settings() {
        let (host, ctx) = context();
        let group = ctx.create_group().unwrap().unwrap();

        assert!(group.set_separation_range(0.0).is_err());
        group.set_separation_range(25.0).unwrap();
        group.set_formation(Formation::LINE_ABREAST).unwrap();
        assert_eq!(host.group_settings(group.handle()), Some((25.0, 3)));
    }

    #[test]
    fn test_no_free_group_slot() {
        let (host, ctx) = context();
        host.set_group_capacity(0);
        assert!(ctx.create_group().unwrap().is_none());
    }

    #[test]
    fn test_walk_skips_empty_slot() {
        let (host, ctx) = context();
        let leader = host.spawn_actor();
        let a = host.spawn_actor();
        let b = host.spawn_actor();
        let raw = host.create_group_with(Some(leader), &[None, Some(a), Some(b)]);
        let group = ctx.group(raw);

        let members: Vec<_> = group
            .members(true)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        // Two members counted, slot 0 empty: the walk covers slots 0 and 1
        assert_eq!(members, vec![leader, a]);
    }

    #[test]
    fn test_size_hint_bound() {
        let (host, ctx) = context();
        let a = host.spawn_actor();
        let raw = host.create_group_with(None, &[Some(a)]);
        let group = ctx.group(raw);

        let walk = group.members(true).unwrap();
        assert_eq!(walk.size_hint(), (0, Some(2)));
        assert_eq!(walk.count(), 1);
    }
}
