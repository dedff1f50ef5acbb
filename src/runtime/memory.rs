//! Memory-backed actor properties
//!
//! Some actor properties have no native and are read straight from the
//! actor's host object. Field offsets move between builds and come from an
//! [`OffsetResolver`]; an offset of `0` means the field is not known for the
//! running build. Reads then return the field's default and writes are
//! skipped.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ScriptContext;
use super::error::{ArgumentError, Result};
use super::handle::ActorRef;
use super::version::HostVersion;

/// A memory-backed actor field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryField {
    /// Health below which the actor goes down injured
    InjuryThreshold,
    /// Health below which an injury becomes fatal
    FatalInjuryThreshold,
}

impl MemoryField {
    /// Value reported when the field cannot be read
    pub fn default_value(self) -> f32 {
        match self {
            MemoryField::InjuryThreshold => 100.0,
            MemoryField::FatalInjuryThreshold => 100.0,
        }
    }
}

impl fmt::Display for MemoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Source of field offsets. Return `0` for fields unknown on `version`.
pub trait OffsetResolver {
    fn offset(&self, field: MemoryField, version: HostVersion) -> u32;
}

/// One offset, valid from `since` until a later row replaces it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRow {
    pub field: MemoryField,
    pub since: HostVersion,
    pub offset: u32,
}

/// Offset table kept in memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticOffsets {
    rows: Vec<OffsetRow>,
}

impl StaticOffsets {
    /// Empty table; every field resolves to `0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Offsets known for released builds
    pub fn builtin() -> Self {
        Self::new()
            .with(MemoryField::InjuryThreshold, HostVersion::V1_0_877_1, 0x13B0)
            .with(MemoryField::InjuryThreshold, HostVersion::V1_0_1604_0, 0x1480)
            .with(MemoryField::InjuryThreshold, HostVersion::V1_0_2060_0, 0x14B0)
            .with(MemoryField::InjuryThreshold, HostVersion::V1_0_2699_0, 0x1510)
            .with(MemoryField::FatalInjuryThreshold, HostVersion::V1_0_877_1, 0x13B4)
            .with(MemoryField::FatalInjuryThreshold, HostVersion::V1_0_1604_0, 0x1484)
            .with(MemoryField::FatalInjuryThreshold, HostVersion::V1_0_2060_0, 0x14B4)
            .with(MemoryField::FatalInjuryThreshold, HostVersion::V1_0_2699_0, 0x1514)
    }

    /// Add a row
    pub fn with(mut self, field: MemoryField, since: HostVersion, offset: u32) -> Self {
        self.rows.push(OffsetRow {
            field,
            since,
            offset,
        });
        self
    }

    /// All rows in insertion order
    pub fn rows(&self) -> &[OffsetRow] {
        &self.rows
    }
}

impl OffsetResolver for StaticOffsets {
    fn offset(&self, field: MemoryField, version: HostVersion) -> u32 {
        self.rows
            .iter()
            .filter(|row| row.field == field && row.since <= version)
            .max_by_key(|row| row.since)
            .map_or(0, |row| row.offset)
    }
}

/// Memory-backed properties of one actor
pub struct ActorMemory<'a> {
    ctx: &'a ScriptContext,
    actor: ActorRef,
    resolver: &'a dyn OffsetResolver,
}

impl<'a> ActorMemory<'a> {
    pub(crate) fn new(
        ctx: &'a ScriptContext,
        actor: ActorRef,
        resolver: &'a dyn OffsetResolver,
    ) -> Self {
        Self {
            ctx,
            actor,
            resolver,
        }
    }

    /// Address of `field`, if both the offset and the actor are available
    fn address(&self, field: MemoryField) -> Option<u64> {
        let offset = self.resolver.offset(field, self.ctx.version());
        if offset == 0 {
            tracing::debug!(%field, version = %self.ctx.version(), "no offset for field");
            return None;
        }
        let base = self.ctx.bridge().entity_address(self.actor.raw());
        if base == 0 {
            tracing::debug!(actor = %self.actor, "actor has no address");
            return None;
        }
        Some(base + offset as u64)
    }

    /// Read a field, falling back to its default
    pub fn read(&self, field: MemoryField) -> f32 {
        match self.address(field) {
            Some(address) => self.ctx.bridge().read_f32(address),
            None => field.default_value(),
        }
    }

    /// Write a field. Returns whether the write reached the host.
    pub fn write(&self, field: MemoryField, value: f32) -> Result<bool> {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ArgumentError::InvalidValue {
                what: "value",
                detail: format!("{} must be a non-negative number", value),
            }
            .into());
        }
        match self.address(field) {
            Some(address) => {
                self.ctx.bridge().write_f32(address, value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn injury_threshold(&self) -> f32 {
        self.read(MemoryField::InjuryThreshold)
    }

    pub fn set_injury_threshold(&self, value: f32) -> Result<bool> {
        self.write(MemoryField::InjuryThreshold, value)
    }

    pub fn fatal_injury_threshold(&self) -> f32 {
        self.read(MemoryField::FatalInjuryThreshold)
    }

    pub fn set_fatal_injury_threshold(&self, value: f32) -> Result<bool> {
        self.write(MemoryField::FatalInjuryThreshold, value)
    }
}
